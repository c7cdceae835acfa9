//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while composing a document.
///
/// Bad document content never lands here; it renders nothing instead.
/// These are caller errors about the surface being rendered into.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Viewport dimensions cannot hold a render.
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    /// Canvas dimensions cannot be scaled.
    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    /// Encoding a visual tree failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
