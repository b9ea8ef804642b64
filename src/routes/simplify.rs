use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use crate::agents::pipeline::{UploadedFile, NO_FILE_UPLOADED};
use crate::models::AppState;
use crate::render::OutputFormat;
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/simplify", post(simplify))
        .with_state(state)
}

/// POST /api/simplify - multipart `file` plus optional `format` (`html` | `pdf`)
async fn simplify(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let verbose = state.config.server.verbose_errors;

    let multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            warn!(error = %rejection, "Simplify request without a multipart body");
            return AppError::Validation(NO_FILE_UPLOADED.to_string()).into_response_with(verbose);
        }
    };

    let (file, format) = match read_form(multipart, state.config.server.max_upload_bytes).await {
        Ok(form) => form,
        Err(e) => return e.into_response_with(verbose),
    };

    info!(
        filename = file.as_ref().map(|f| f.filename.as_str()).unwrap_or(""),
        format = format.extension(),
        "Simplify request received"
    );

    match state.pipeline.run(file, format).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response_with(verbose),
    }
}

async fn read_form(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> AppResult<(Option<UploadedFile>, OutputFormat)> {
    let mut file = None;
    let mut format = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            // Parts without a filename are plain form values, not files
            Some("file") if file.is_none() && field.file_name().is_some() => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_upload_bytes))?;
                file = Some(UploadedFile { filename, data });
            }
            Some("format") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_upload_bytes))?;
                format = Some(value);
            }
            _ => {}
        }
    }

    Ok((file, OutputFormat::from_form_value(format.as_deref())))
}

fn multipart_error(e: MultipartError, max_upload_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(format!(
            "File is too large. Maximum size is {}MB.",
            max_upload_bytes / (1024 * 1024)
        ))
    } else {
        AppError::Validation(format!("Invalid upload: {}", e.body_text()))
    }
}
