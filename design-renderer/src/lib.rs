//! # Design Renderer
//!
//! Turns design documents and the logical frames of their mounted
//! components into a scaled, paint-ordered visual tree for a host surface.
//!
//! ## Presentation Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           PresentationBackend               │
//! ├──────────────────────┬──────────────────────┤
//! │ DOM                  │ Native               │
//! │ CSS properties,      │ camelCase styles,    │
//! │ CSS transitions      │ animation descriptors│
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod compose;
pub mod error;
pub mod node;
pub mod style;

pub use backend::dom::DomBackend;
pub use backend::native::NativeBackend;
pub use backend::PresentationBackend;
pub use compose::{render_list, route, Composition, Compositor, Layout, Route, Unhandled, Viewport};
pub use error::{RenderError, RenderResult};
pub use node::{Action, Animation, AnimationKind, NodeKind, Style, VisualNode};
pub use style::{style_of, VisualAttributes};

use design_core::{Document, InstanceTable};
use serde::{Deserialize, Serialize};

/// Configuration for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    /// Backend to present with.
    pub preferred_backend: BackendType,
    /// Color of text objects without a fill.
    pub text_color: String,
    /// Color of line objects without a stroke.
    pub line_color: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::Dom,
            text_color: "#000000".to_string(),
            line_color: "#000000".to_string(),
        }
    }
}

/// Available presentation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// CSS-styled DOM (web).
    #[default]
    Dom,
    /// Native views and animation primitives (mobile).
    Native,
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn PresentationBackend>,
    frame_count: u64,
}

impl Renderer {
    /// Create a renderer for the configured backend.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let backend = Self::create_backend(&config);
        tracing::debug!("Renderer using {:?} backend", backend.backend_type());
        Self {
            config,
            backend,
            frame_count: 0,
        }
    }

    fn create_backend(config: &RendererConfig) -> Box<dyn PresentationBackend> {
        match config.preferred_backend {
            BackendType::Dom => Box::new(DomBackend::new(config.clone())),
            BackendType::Native => Box::new(NativeBackend::new(config.clone())),
        }
    }

    /// Compose a frame of the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the viewport or canvas cannot be scaled.
    pub fn render(
        &mut self,
        document: &Document,
        viewport: Viewport,
        instances: &InstanceTable,
    ) -> RenderResult<Composition> {
        let composition = Compositor::new(self.backend.as_ref()).compose(document, viewport, instances)?;
        self.frame_count += 1;
        Ok(composition)
    }

    /// Number of frames composed so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

/// Design renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use design_core::Canvas;

    #[test]
    fn test_backend_follows_config() {
        let native = Renderer::new(RendererConfig {
            preferred_backend: BackendType::Native,
            ..RendererConfig::default()
        });
        assert_eq!(native.active_backend(), BackendType::Native);
        assert_eq!(Renderer::new(RendererConfig::default()).active_backend(), BackendType::Dom);
    }

    #[test]
    fn test_render_counts_frames() {
        let mut renderer = Renderer::new(RendererConfig::default());
        let doc = Document::new(Canvas::new(375.0, 667.0));
        let composition = renderer
            .render(&doc, Viewport::new(750.0, 1000.0), &InstanceTable::new())
            .expect("render");
        assert!((composition.layout.scale - 2.0).abs() < f32::EPSILON);
        assert!(renderer.render(&doc, Viewport::width_only(0.0), &InstanceTable::new()).is_err());
        assert_eq!(renderer.frame_count(), 1);
    }
}
