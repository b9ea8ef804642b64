//! Text extraction for uploaded papers (PDF and plain text)

use std::path::Path;

use lopdf::Document;
use tracing::{error, info};

use crate::types::{AppError, AppResult};

/// Minimum number of characters (after trimming) a paper must yield
pub const MIN_TEXT_CHARS: usize = 100;

/// Declared upload type, derived from the filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Txt,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> AppResult<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" => Ok(DocumentKind::Txt),
            other => Err(AppError::UnsupportedType(other.to_string())),
        }
    }

    /// Kind of an upload, judged by the text after the last `.`
    pub fn from_filename(filename: &str) -> AppResult<Self> {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Err(AppError::UnsupportedType(String::new())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> mime::Mime {
        match self {
            DocumentKind::Pdf => mime::APPLICATION_PDF,
            DocumentKind::Txt => mime::TEXT_PLAIN,
        }
    }

    /// Kind of an archived original when serving it back; non-PDF is plain text
    pub fn for_serving(filename: &str) -> Self {
        if filename.ends_with(".pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Txt
        }
    }
}

pub struct TextExtractor;

impl TextExtractor {
    pub async fn extract(path: &Path, kind: DocumentKind) -> AppResult<String> {
        info!(path = %path.display(), kind = kind.extension(), "Extracting text from file");

        match kind {
            DocumentKind::Pdf => {
                let path = path.to_path_buf();
                tokio::task::spawn_blocking(move || Self::extract_pdf(&path))
                    .await
                    .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))?
            }
            DocumentKind::Txt => {
                let bytes = tokio::fs::read(path).await?;
                String::from_utf8(bytes).map_err(|e| {
                    error!(error = %e, "Text file is not valid UTF-8");
                    AppError::Extraction(format!("file is not valid UTF-8: {}", e))
                })
            }
        }
    }

    /// Every page in order, each followed by a newline
    pub fn extract_pdf(path: &Path) -> AppResult<String> {
        let doc = Document::load(path).map_err(|e| {
            error!(error = %e, "Error extracting text from PDF");
            AppError::Extraction(format!("could not parse PDF: {}", e))
        })?;

        if doc.is_encrypted() {
            return Err(AppError::Extraction("PDF is encrypted".to_string()));
        }

        let mut text = String::new();
        for (page_num, _page_id) in doc.get_pages() {
            let page_text = doc.extract_text(&[page_num]).map_err(|e| {
                error!(page = page_num, error = %e, "Error extracting text from PDF page");
                AppError::Extraction(format!("could not read page {}: {}", page_num, e))
            })?;
            text.push_str(&page_text);
            text.push('\n');
        }

        Ok(text)
    }

    pub fn has_sufficient_text(text: &str) -> bool {
        text.trim().chars().count() >= MIN_TEXT_CHARS
    }
}
