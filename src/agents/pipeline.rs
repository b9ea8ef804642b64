//! Simplify Pipeline
//!
//! Drives one upload through validation, storage, extraction, generation,
//! rendering and persistence. Each request owns its own token and files.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::extraction::{DocumentKind, TextExtractor};
use crate::agents::rewrite::{RewriteAgent, RewriteParams};
use crate::config::Config;
use crate::llm::provider::LLMAdapter;
use crate::models::{ScpCommands, SimplifyResponse};
use crate::render::{OutputFormat, Renderer};
use crate::storage::{output_filename, stored_upload_name, DocumentStore};
use crate::types::{AppError, AppResult};
use crate::utils::{file_stem, sanitize_filename};

pub const NO_FILE_UPLOADED: &str = "No file uploaded";
pub const NO_FILE_SELECTED: &str = "No file selected";
pub const FILE_TYPE_NOT_ALLOWED: &str = "File type not allowed. Please upload PDF or TXT files.";
pub const INSUFFICIENT_TEXT: &str =
    "Could not extract sufficient text from the file. Please ensure the file contains readable text.";

/// The `file` part of a simplify request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

pub struct SimplifyPipeline {
    store: DocumentStore,
    rewriter: RewriteAgent,
    renderer: Renderer,
    max_upload_bytes: usize,
    scp_target: String,
}

impl SimplifyPipeline {
    pub fn new(
        store: DocumentStore,
        rewriter: RewriteAgent,
        renderer: Renderer,
        max_upload_bytes: usize,
        scp_target: impl Into<String>,
    ) -> Self {
        Self {
            store,
            rewriter,
            renderer,
            max_upload_bytes,
            scp_target: scp_target.into(),
        }
    }

    pub fn from_config(config: &Config, llm: Arc<dyn LLMAdapter>) -> Self {
        Self::new(
            DocumentStore::from_config(&config.storage),
            RewriteAgent::new(llm, RewriteParams::from(&config.llm)),
            Renderer::from_config(config),
            config.server.max_upload_bytes,
            config.deploy.scp_target.clone(),
        )
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Check the upload before anything touches the disk
    pub fn validate(&self, file: Option<&UploadedFile>) -> AppResult<DocumentKind> {
        let file = file.ok_or_else(|| AppError::Validation(NO_FILE_UPLOADED.to_string()))?;

        if file.filename.is_empty() {
            return Err(AppError::Validation(NO_FILE_SELECTED.to_string()));
        }

        let kind = DocumentKind::from_filename(&file.filename)
            .map_err(|_| AppError::Validation(FILE_TYPE_NOT_ALLOWED.to_string()))?;

        if file.data.len() > self.max_upload_bytes {
            return Err(AppError::Validation(format!(
                "File is too large. Maximum size is {}MB.",
                self.max_upload_bytes / (1024 * 1024)
            )));
        }

        Ok(kind)
    }

    pub async fn run(
        &self,
        file: Option<UploadedFile>,
        format: OutputFormat,
    ) -> AppResult<SimplifyResponse> {
        let kind = self.validate(file.as_ref())?;
        let Some(file) = file else {
            return Err(AppError::Validation(NO_FILE_UPLOADED.to_string()));
        };

        let filename = local_filename(&file.filename, kind);
        let token = Uuid::new_v4().to_string();
        let stored_name = stored_upload_name(&token, &filename);
        let upload = self.store.store_upload(&stored_name, &file.data).await?;
        info!(%token, %filename, "File uploaded");

        info!(%token, "Extracting text from file...");
        let paper_text = match TextExtractor::extract(&upload.working_path, kind).await {
            Ok(text) if TextExtractor::has_sufficient_text(&text) => text,
            Ok(text) => {
                warn!(%token, chars = text.trim().chars().count(), "Insufficient text extracted");
                self.store.remove_working(&upload).await;
                return Err(AppError::Extraction(INSUFFICIENT_TEXT.to_string()));
            }
            Err(e) => {
                warn!(%token, error = %e, "Text extraction failed");
                self.store.remove_working(&upload).await;
                return Err(AppError::Extraction(INSUFFICIENT_TEXT.to_string()));
            }
        };

        info!(%token, "Simplifying paper with AI...");
        let rewrite = self.rewriter.generate(&paper_text).await?;

        let output_name = output_filename(&token, file_stem(&filename), format);
        let rendered = self
            .renderer
            .render(format, &rewrite, &filename, Some(&stored_name))
            .await?;
        let output_path = self.store.write_output(&output_name, rendered.as_bytes()).await?;

        let absolute = std::path::absolute(&output_path).unwrap_or(output_path);
        info!(%token, output = %output_name, format = format.extension(), "Simplification complete");

        Ok(SimplifyResponse {
            success: true,
            download_url: format!("/api/download/{}", output_name),
            filename: output_name,
            original_paper_url: self.renderer.original_url(&stored_name),
            scp_commands: ScpCommands {
                simplified: self.scp_command(&absolute),
                note: self.scp_note(),
            },
        })
    }

    /// Informational only; never executed
    fn scp_command(&self, output_path: &Path) -> String {
        format!("scp {} {}", output_path.display(), self.scp_target)
    }

    /// Points at the `user@host` part of the configured target
    fn scp_note(&self) -> String {
        let login = self
            .scp_target
            .split_once(':')
            .map(|(login, _)| login)
            .unwrap_or(self.scp_target.as_str());
        format!(
            "Replace \"{}\" with your actual SSH credentials. Original paper is already deployed.",
            login
        )
    }
}

/// Sanitized name used on disk. Falls back to `document.{ext}` when
/// sanitizing strips the stem or the allowed extension.
fn local_filename(raw: &str, kind: DocumentKind) -> String {
    let name = sanitize_filename(raw);
    let keeps_kind = DocumentKind::from_filename(&name).map(|k| k == kind).unwrap_or(false);
    if keeps_kind && !file_stem(&name).is_empty() {
        name
    } else {
        format!("document.{}", kind.extension())
    }
}
