//! Description generator: drafts portfolio copy for a project.
//!
//! This module provides:
//! - `GeneratedDescription` - the four generated fields, reshaped for the form
//! - `DescriptionGenerator` - the seam the dashboard calls through
//! - `HttpGenerator` / `LocalGenerator` - HTTP and in-process implementations
//! - `CompletionBackend`, `OpenAiBackend` - the raw text-completion backend
//! - prompt building and brace-delimited JSON extraction

mod backend;
mod client;
mod extract;
mod prompt;

pub use backend::{BackendConfig, CannedBackend, CompletionBackend, OpenAiBackend};
pub use client::{HttpGenerator, LocalGenerator};
pub use extract::{extract_json_object, parse_generated};
pub use prompt::build_prompt;

use crate::project::ProjectDetails;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generated project copy, shaped the way the edit form consumes it.
///
/// Transient: merged into the edit buffer wholesale, never persisted on its
/// own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDescription {
    pub description: String,
    pub details: ProjectDetails,
}

/// Seam between the dashboard and whichever generation path is wired in.
///
/// Callers must only invoke `generate` with non-empty title and kind; the
/// endpoint rejects anything else server-side as well.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(
        &self,
        title: &str,
        kind: &str,
        tools: &[String],
    ) -> Result<GeneratedDescription>;
}
