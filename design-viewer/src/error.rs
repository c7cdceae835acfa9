//! Error types for the viewer host.

use design_core::DesignError;
use design_renderer::RenderError;
use thiserror::Error;

/// Result type for viewer operations.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors raised by the viewer host.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// No document has been loaded yet.
    #[error("No document loaded")]
    NotLoaded,

    /// The document cannot be replaced in the current mode.
    #[error("Document is read-only in runtime mode")]
    ReadOnly,

    /// An interaction step could not be parsed.
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// No document key was configured.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document lookup or decoding failed.
    #[error(transparent)]
    Document(#[from] DesignError),

    /// Composition failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
