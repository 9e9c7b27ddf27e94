//! # contract: capability interfaces for the capture pipeline
//!
//! This module defines the traits the snapshot pipeline needs from its
//! external collaborators: a browser-level context ([`Browser`]) and the
//! page-level resource it hands out ([`Page`]). Production code implements
//! them over CDP (see [`crate::browser`]); tests use the generated mocks.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.
//!
//! ## Resource discipline
//! - A `Page` is exclusively owned by one capture job and must be closed on
//!   every exit path before the job returns; the `Browser` itself is shared
//!   read-only across jobs.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;

/// Opaque identifier for a remotely hosted conversation, extracted from a
/// share URL. Equality is exact string equality.
pub type ConversationId = String;

/// A finished snapshot ready to be written into the archive.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Archive filename, `"<id> - <title>.html"`.
    pub filename: String,
    /// Fully inlined, post-processed HTML document.
    pub content: String,
}

/// Error taxonomy for a single capture job.
///
/// Each variant tags the pipeline stage that failed; the executor records
/// these per id and never lets them abort sibling jobs.
#[derive(Debug)]
pub enum CaptureError {
    /// Browser/page bring-up or URL navigation failed.
    Navigation(String),
    /// The readiness marker never appeared within the configured timeout.
    Timeout { selector: String },
    /// Script evaluation or serialization produced no usable result.
    Extraction(String),
    /// Writing the artifact (or other filesystem work) failed.
    Io(std::io::Error),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Navigation(msg) => write!(f, "navigation failed: {msg}"),
            CaptureError::Timeout { selector } => {
                write!(f, "timed out waiting for selector {selector:?}")
            }
            CaptureError::Extraction(msg) => write!(f, "extraction failed: {msg}"),
            CaptureError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<std::io::Error> for CaptureError {
    fn from(e: std::io::Error) -> Self {
        CaptureError::Io(e)
    }
}

/// Browser-level context shared across capture jobs.
///
/// Implementors hand out isolated page-level resources with content-security
/// restrictions disabled, so injected scripts can run on any origin.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Browser: Send + Sync {
    /// Open a fresh, isolated page. The caller owns it and must close it.
    async fn open_page(&self) -> Result<Box<dyn Page>, CaptureError>;
}

/// One exclusively-owned page-level resource.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Page: Send + Sync {
    /// Register a script that runs before any page script on every
    /// navigation. Must be called before [`Page::navigate`]: late injection
    /// silently yields an incomplete artifact rather than an error.
    async fn inject_script(&self, source: &str) -> Result<(), CaptureError>;

    /// Navigate to the given URL and wait for the load to commit.
    async fn navigate(&self, url: &str) -> Result<(), CaptureError>;

    /// Block until an element matching `selector` exists, bounded by
    /// `timeout`; fails with [`CaptureError::Timeout`] otherwise.
    async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CaptureError>;

    /// Evaluate a script in page context and return its JSON-serializable
    /// result (`null` when the script yields nothing).
    async fn evaluate(&self, expression: &str)
        -> Result<serde_json::Value, CaptureError>;

    /// Release the page. Idempotent from the caller's perspective; invoked
    /// on every exit path of a capture job.
    async fn close(&self) -> Result<(), CaptureError>;
}
