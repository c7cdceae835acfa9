//! # Design Core
//!
//! Document model and interaction logic for interactive design documents.
//! Everything here is pure: no clock, no rendering surface, no I/O beyond
//! the [`DocumentSource`] seam.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 design-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Document Model  │  Interaction Kinds       │
//! │  - Canvas        │  - Typed configs         │
//! │  - Objects       │  - State machines        │
//! │  - Groups/slots  │  - Logical frames        │
//! ├─────────────────────────────────────────────┤
//! │  Instances       │  Lookup                  │
//! │  - Mount/unmount │  - Id / share token      │
//! │  - Timer effects │  - Load state            │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod error;
pub mod frame;
pub mod instance;
pub mod interaction;
pub mod kinds;
pub mod lookup;
pub mod machine;
pub mod object;
pub mod slots;

pub use document::{Canvas, Document, DocumentRecord};
pub use error::{DesignError, DesignResult};
pub use frame::{Accent, Control, ControlKind, Enter, Frame, Layer, Rect, Transition, Visual};
pub use instance::{ComponentInstance, ComponentState, InstanceId, InstanceTable, Lifecycle};
pub use interaction::{
    millis, BottomSheetConfig, CarouselConfig, Easing, EntranceAnimation, EntranceConfig,
    ExpandableConfig, FlipAxis, FlipCardConfig, Interaction, InteractionKind, QuizConfig, Side,
    TabPosition, TabStyle, TabsConfig,
};
pub use lookup::{load, DocumentKey, DocumentSource, LoadState, MemorySource};
pub use machine::{Effect, Fragment, StateMachine, Step, TimerKey, Trigger};
pub use object::{
    DesignObject, Geometry, Group, ImageObject, InteractiveObject, LineObject, ObjectId,
    ShapeObject, TextObject,
};
pub use slots::{role_family, Slot, Slots};

/// Design core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
