//! HTML to PDF rasterization
//!
//! Two engines sit behind [`PdfRasterizer`]:
//! - [`LopdfRasterizer`] parses the HTML with `scraper` and lays the page out
//!   directly with `lopdf`, using embedded DejaVu Sans faces so any Unicode
//!   text survives. It understands the handful of tags the renderer emits
//!   (headings, paragraphs, bold, links, line breaks) and ignores styling.
//! - [`CommandRasterizer`] pipes the HTML through an external engine such as
//!   `weasyprint - -` or `wkhtmltopdf - -` and returns whatever it writes to stdout.

mod fonts;
mod layout;

use std::process::Stdio;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error};

use crate::types::{AppError, AppResult};
use fonts::FontSet;
use layout::{parse_blocks, wrap_block, Block};

#[async_trait]
pub trait PdfRasterizer: Send + Sync {
    async fn rasterize(&self, html: &str) -> AppResult<Vec<u8>>;
}

// US Letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 56.0;

/// Built-in engine, no external dependencies
#[derive(Debug, Clone, Default)]
pub struct LopdfRasterizer;

#[async_trait]
impl PdfRasterizer for LopdfRasterizer {
    async fn rasterize(&self, html: &str) -> AppResult<Vec<u8>> {
        let html = html.to_string();
        tokio::task::spawn_blocking(move || {
            let blocks = parse_blocks(&html);
            debug!(blocks = blocks.len(), "Laying out PDF");
            build_pdf(&blocks)
        })
        .await
        .map_err(|e| AppError::Render(format!("PDF task failed: {}", e)))?
    }
}

fn build_pdf(blocks: &[Block]) -> AppResult<Vec<u8>> {
    let mut fonts = FontSet::load()?;
    let max_width = PAGE_WIDTH - 2.0 * MARGIN;
    let mut pages: Vec<Vec<Operation>> = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for block in blocks {
        let size = block.style.font_size();
        let leading = size * 1.4;
        y -= block.style.space_before();

        for line in wrap_block(block, max_width, &fonts) {
            if y - leading < MARGIN {
                pages.push(std::mem::take(&mut ops));
                y = PAGE_HEIGHT - MARGIN;
            }
            y -= leading;

            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
            for run in line {
                ops.push(Operation::new("Tf", vec![run.face().resource_name().into(), size.into()]));
                ops.push(Operation::new("Tj", vec![fonts.text_operand(&run.text)]));
            }
            ops.push(Operation::new("ET", vec![]));
        }
    }
    pages.push(ops);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| AppError::Render(format!("failed to encode page: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    // Fonts go in last: the code table is only complete once every page is laid out
    let font_dict = fonts.write(&mut doc);
    doc.objects.insert(resources_id, Object::Dictionary(dictionary! { "Font" => font_dict }));

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AppError::Render(format!("failed to write PDF: {}", e)))?;
    Ok(buffer)
}

/// External engine reading HTML on stdin and writing PDF to stdout
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: String,
    args: Vec<String>,
}

impl CommandRasterizer {
    /// Parse a whitespace-separated command line such as `weasyprint - -`
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self { program, args: parts.collect() })
    }
}

#[async_trait]
impl PdfRasterizer for CommandRasterizer {
    async fn rasterize(&self, html: &str) -> AppResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Render(format!("failed to start {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::Render("PDF engine stdin unavailable".to_string()))?;
        let input = html.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AppError::Render(format!("PDF engine failed: {}", e)))?;
        if let Ok(Err(e)) = writer.await {
            debug!(error = %e, "PDF engine closed stdin early");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(program = %self.program, status = %output.status, "PDF engine exited with error");
            return Err(AppError::Render(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(AppError::Render(format!("{} produced no output", self.program)));
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn rendered_text(html: &str) -> String {
        let bytes = LopdfRasterizer.rasterize(html).await.unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        doc.extract_text(&pages).unwrap()
    }

    #[tokio::test]
    async fn test_lopdf_rasterizer_produces_loadable_pdf() {
        let html = format!("<h1>Title</h1>{}", "<p>Lorem ipsum dolor sit amet.</p>".repeat(200));
        let bytes = LopdfRasterizer.rasterize(&html).await.unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[tokio::test]
    async fn test_lopdf_rasterizer_handles_empty_html() {
        let bytes = LopdfRasterizer.rasterize("").await.unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[tokio::test]
    async fn test_non_latin_text_survives() {
        let text = rendered_text(
            "<h2>Facebook Post 1</h2><p>🌱 Plants → oxygen! Dose <strong>≥ 5 μg</strong> daily.</p>",
        )
        .await;

        assert!(text.contains("Facebook Post 1"));
        assert!(text.contains("🌱 Plants → oxygen!"));
        assert!(text.contains("≥ 5 μg"));
        assert!(!text.contains('?'));
    }

    #[tokio::test]
    async fn test_entities_render_as_characters() {
        let text = rendered_text("<p>Caf&eacute; &#8217;quoted&#8217; &amp; &lt;b&gt;</p>").await;
        assert!(text.contains("Café ’quoted’ & <b>"));
        assert!(!text.contains("&eacute;"));
    }

    #[tokio::test]
    async fn test_codes_shared_across_pages() {
        let html = format!("<p>αβγ</p>{}<p>γβα</p>", "<p>filler line</p>".repeat(120));
        let bytes = LopdfRasterizer.rasterize(&html).await.unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        let last = *pages.keys().last().unwrap();

        assert!(last > 1);
        assert!(doc.extract_text(&[1]).unwrap().starts_with("αβγ"));
        assert!(doc.extract_text(&[last]).unwrap().contains("γβα"));
    }

    #[test]
    fn test_command_line_parsing() {
        let engine = CommandRasterizer::from_command_line("weasyprint  - -").unwrap();
        assert_eq!(engine.program, "weasyprint");
        assert_eq!(engine.args, vec!["-", "-"]);
        assert!(CommandRasterizer::from_command_line("   ").is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_rasterizer_passes_stdin_through() {
        let engine = CommandRasterizer::from_command_line("cat").unwrap();
        let out = engine.rasterize("<p>hi</p>").await.unwrap();
        assert_eq!(out, b"<p>hi</p>");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_rasterizer_failure() {
        let engine = CommandRasterizer::from_command_line("false").unwrap();
        let err = engine.rasterize("<p>hi</p>").await.unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
    }
}
