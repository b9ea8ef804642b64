use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::types::LLMProvider;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub storage: StorageConfig,
    pub render: RenderConfig,
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub max_upload_bytes: usize,
    /// Echo internal error text on 500 responses
    pub verbose_errors: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Externally web-served directory holding copies of original uploads
    pub originals_dir: PathBuf,
    pub originals_base_url: String,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// External HTML-to-PDF command, e.g. `weasyprint - -`. Built-in renderer when unset.
    pub pdf_engine: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    pub scp_target: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let provider: LLMProvider = env_or("LLM_PROVIDER", "openai")
            .parse()
            .map_err(|e| anyhow::anyhow!("LLM_PROVIDER: {}", e))?;

        Ok(Self {
            server: ServerConfig {
                port: parse_env("PORT", 5000)?,
                host: env_or("HOST", "0.0.0.0"),
                max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
                verbose_errors: parse_env("VERBOSE_ERRORS", true)?,
            },
            llm: LLMConfig {
                provider,
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                api_base: env::var("OPENAI_API_BASE").ok().filter(|s| !s.trim().is_empty()),
                model: env_or("LLM_MODEL", "gpt-4o-mini"),
                temperature: parse_env("LLM_TEMPERATURE", 0.7)?,
                max_tokens: parse_env("LLM_MAX_TOKENS", 8000)?,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from(env_or("UPLOAD_FOLDER", "uploads")),
                output_dir: PathBuf::from(env_or("OUTPUT_FOLDER", "outputs")),
                originals_dir: PathBuf::from(env_or(
                    "ORIGINAL_PAPERS_FOLDER",
                    "/var/www/test.mbiri.net/html/original_papers/sst_uploads",
                )),
                originals_base_url: env_or(
                    "ORIGINAL_PAPERS_BASE_URL",
                    "https://test.mbiri.net/original_papers/sst_uploads",
                )
                .trim_end_matches('/')
                .to_string(),
                static_dir: PathBuf::from(env_or("STATIC_DIR", "static")),
            },
            render: RenderConfig {
                pdf_engine: env::var("PDF_ENGINE").ok().filter(|s| !s.trim().is_empty()),
            },
            deploy: DeployConfig {
                scp_target: env_or("SCP_TARGET", "user@server:/var/www/test.mbiri.net/html/"),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}
