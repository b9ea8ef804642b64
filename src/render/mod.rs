//! Output rendering
//!
//! Turns the model's rewrite text into a standalone HTML page, and optionally
//! rasterizes that same page into a PDF.

pub mod markdown;
pub mod pdf;
pub mod template;

use std::sync::Arc;

use tracing::{error, info};

use crate::config::Config;
use crate::types::AppResult;
use markdown::markdown_to_html;
use pdf::{CommandRasterizer, LopdfRasterizer, PdfRasterizer};
use template::{render_page, PageContext};

/// Requested artifact type. Anything other than `pdf` falls back to HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Pdf,
}

impl OutputFormat {
    pub fn from_form_value(value: Option<&str>) -> Self {
        match value {
            Some("pdf") => OutputFormat::Pdf,
            _ => OutputFormat::Html,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> mime::Mime {
        match self {
            OutputFormat::Html => mime::TEXT_HTML,
            OutputFormat::Pdf => mime::APPLICATION_PDF,
        }
    }

    /// Format of a previously rendered file, by its extension
    pub fn from_filename(filename: &str) -> Self {
        if filename.ends_with(".pdf") {
            OutputFormat::Pdf
        } else {
            OutputFormat::Html
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedOutput {
    Html(String),
    Pdf(Vec<u8>),
}

impl RenderedOutput {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RenderedOutput::Html(html) => html.as_bytes(),
            RenderedOutput::Pdf(bytes) => bytes,
        }
    }
}

pub struct Renderer {
    originals_base_url: String,
    rasterizer: Arc<dyn PdfRasterizer>,
}

impl Renderer {
    pub fn new(originals_base_url: impl Into<String>, rasterizer: Arc<dyn PdfRasterizer>) -> Self {
        Self {
            originals_base_url: originals_base_url.into().trim_end_matches('/').to_string(),
            rasterizer,
        }
    }

    /// Renderer using the configured PDF engine, or the built-in one
    pub fn from_config(config: &Config) -> Self {
        let rasterizer: Arc<dyn PdfRasterizer> = match config
            .render
            .pdf_engine
            .as_deref()
            .and_then(CommandRasterizer::from_command_line)
        {
            Some(engine) => {
                info!(engine = ?engine, "Using external PDF engine");
                Arc::new(engine)
            }
            None => Arc::new(LopdfRasterizer),
        };
        Self::new(config.storage.originals_base_url.clone(), rasterizer)
    }

    /// Public URL of an archived original
    pub fn original_url(&self, link_filename: &str) -> String {
        format!("{}/{}", self.originals_base_url, link_filename)
    }

    pub fn render_html(
        &self,
        rewrite: &str,
        original_filename: &str,
        link_filename: Option<&str>,
    ) -> String {
        let processed_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.render_html_at(rewrite, original_filename, link_filename, &processed_at)
    }

    pub fn render_html_at(
        &self,
        rewrite: &str,
        original_filename: &str,
        link_filename: Option<&str>,
        processed_at: &str,
    ) -> String {
        let original_url = self.original_url(link_filename.unwrap_or(original_filename));
        let content_html = markdown_to_html(rewrite);
        render_page(&PageContext {
            original_filename,
            processed_at,
            original_url: &original_url,
            content_html: &content_html,
        })
    }

    pub async fn render_pdf(
        &self,
        rewrite: &str,
        original_filename: &str,
        link_filename: Option<&str>,
    ) -> AppResult<Vec<u8>> {
        let html = self.render_html(rewrite, original_filename, link_filename);
        self.rasterizer.rasterize(&html).await.map_err(|e| {
            error!(error = %e, "Error generating PDF");
            e
        })
    }

    pub async fn render(
        &self,
        format: OutputFormat,
        rewrite: &str,
        original_filename: &str,
        link_filename: Option<&str>,
    ) -> AppResult<RenderedOutput> {
        match format {
            OutputFormat::Html => Ok(RenderedOutput::Html(self.render_html(
                rewrite,
                original_filename,
                link_filename,
            ))),
            OutputFormat::Pdf => Ok(RenderedOutput::Pdf(
                self.render_pdf(rewrite, original_filename, link_filename).await?,
            )),
        }
    }
}
