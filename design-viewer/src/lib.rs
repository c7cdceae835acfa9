//! # Design Viewer
//!
//! Host for interactive design documents. Looks a document up, mounts one
//! component instance per interactive object, owns their timers, and
//! composes frames through the renderer.
//!
//! ## Usage
//!
//! ```bash
//! design-viewer --docs-dir ./designs --id onboarding --step tap:card --step wait:3000
//! design-viewer --docs-dir ./designs --share-token k3x9 --mode runtime --platform native
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   LoadState   ┌────────────────────────────────┐
//! │DocumentSource│──────────────►│ Viewer                         │
//! └──────────────┘               │  InstanceTable ── Lifecycle ─┐ │
//!        triggers ──────────────►│  TimerSet per instance ◄─────┘ │
//!                                │  Renderer ──► Composition      │
//!                                └────────────────────────────────┘
//! ```
//!
//! - `CliArgs` - command-line arguments parsed with clap
//! - `ViewerConfig` - viewport, platform, mode and scripted steps
//! - `Viewer` - the host itself

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod script;
pub mod source;
pub mod timers;
pub mod viewer;

pub use error::{ViewerError, ViewerResult};
pub use script::{parse_trigger, ScriptStep};
pub use source::FileSource;
pub use timers::{TimerEvent, TimerSet};
pub use viewer::Viewer;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use design_core::DocumentKey;
use design_renderer::{BackendType, RendererConfig, Viewport};

/// Default viewport width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 375.0;

/// Command-line arguments for design-viewer.
#[derive(Debug, Clone, Parser)]
#[command(name = "design-viewer")]
#[command(about = "Preview and run interactive design documents")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding `<id>.json` records and `shares.json`
    #[arg(long, env = "DESIGN_DOCS_DIR", default_value = ".")]
    pub docs_dir: PathBuf,

    /// Document id to open
    #[arg(long, conflicts_with = "share_token", required_unless_present = "share_token")]
    pub id: Option<String>,

    /// Share token to open
    #[arg(long)]
    pub share_token: Option<String>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = DEFAULT_VIEWPORT_WIDTH)]
    pub viewport_width: f32,

    /// Viewport height in pixels (omit for a top-aligned, unbounded viewport)
    #[arg(long)]
    pub viewport_height: Option<f32>,

    /// Presentation platform
    #[arg(long, env = "DESIGN_PLATFORM", value_enum, default_value_t = Platform::Auto)]
    pub platform: Platform,

    /// Preview (editable) or runtime (published) mode
    #[arg(long, value_enum, default_value_t = Mode::Preview)]
    pub mode: Mode,

    /// Interaction step, repeatable: tap:<object>[:<target>], wait:<ms>, reload
    #[arg(long = "step")]
    pub steps: Vec<ScriptStep>,
}

/// Target presentation platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Platform {
    /// CSS-styled DOM.
    Web,
    /// Native views.
    Native,
    /// Native on mobile targets, web elsewhere.
    #[default]
    Auto,
}

impl Platform {
    /// Backend used for this platform on the current target.
    #[must_use]
    pub const fn backend(self) -> BackendType {
        match self {
            Self::Web => BackendType::Dom,
            Self::Native => BackendType::Native,
            Self::Auto => {
                if cfg!(any(target_os = "ios", target_os = "android")) {
                    BackendType::Native
                } else {
                    BackendType::Dom
                }
            }
        }
    }
}

/// Whether the host may change the document after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Editor preview; the document can be replaced while instances keep state.
    #[default]
    Preview,
    /// Published view; the document is fixed.
    Runtime,
}

/// Viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Document directory.
    pub docs_dir: PathBuf,
    /// Document to open.
    pub key: Option<DocumentKey>,
    /// Space available to the canvas.
    pub viewport: Viewport,
    /// Presentation platform.
    pub platform: Platform,
    /// Host mode.
    pub mode: Mode,
    /// Scripted steps to run after load.
    pub steps: Vec<ScriptStep>,
    /// Renderer defaults. The backend is overridden by `platform`.
    pub renderer: RendererConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs_dir: PathBuf::from("."),
            key: None,
            viewport: Viewport::width_only(DEFAULT_VIEWPORT_WIDTH),
            platform: Platform::Auto,
            mode: Mode::Preview,
            steps: Vec::new(),
            renderer: RendererConfig::default(),
        }
    }

    /// Renderer configuration with the platform's backend.
    #[must_use]
    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            preferred_backend: self.platform.backend(),
            ..self.renderer.clone()
        }
    }
}

impl From<CliArgs> for ViewerConfig {
    fn from(args: CliArgs) -> Self {
        let key = match (args.id, args.share_token) {
            (Some(id), _) => Some(DocumentKey::Id(id)),
            (None, Some(token)) => Some(DocumentKey::ShareToken(token)),
            (None, None) => None,
        };
        Self {
            docs_dir: args.docs_dir,
            key,
            viewport: Viewport {
                width: args.viewport_width,
                height: args.viewport_height,
            },
            platform: args.platform,
            mode: args.mode,
            steps: args.steps,
            renderer: RendererConfig::default(),
        }
    }
}

/// Design viewer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
