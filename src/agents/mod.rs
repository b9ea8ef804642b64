//! Agent System
//!
//! The components that turn an uploaded paper into simplified content:
//!
//! - **Text Extraction**: reads PDF pages or UTF-8 text from the stored upload
//! - **Rewrite Agent**: asks the generation service for six audience-specific rewrites
//! - **Simplify Pipeline**: validates, stores, and drives the steps below in order
//!
//! ## Pipeline Overview
//!
//! ```text
//! Upload (multipart)
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Validate   │  → 400 on missing file / bad extension / too large
//! │  + Store    │  → uploads/{token}_{name} and archive copy
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Extract    │  → 400 and working copy removed if < 100 chars
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Rewrite    │  → single LLM call, no retry
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Render     │  → outputs/simplified_{token}_{stem}.{html|pdf}
//! └─────────────┘
//!      │
//!      ▼
//!  JSON descriptor
//! ```

pub mod extraction;
pub mod pipeline;
pub mod rewrite;

pub use extraction::{DocumentKind, TextExtractor};
pub use pipeline::{SimplifyPipeline, UploadedFile};
pub use rewrite::{RewriteAgent, RewriteParams};
