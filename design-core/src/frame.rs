//! Platform-agnostic logical view of an interactive component.
//!
//! A [`Frame`] says *what* a component shows in its current state: which
//! children sit in which layer, the target visual values, and how long the
//! host should take to get there. Presentation backends translate frames
//! into DOM styles or native views; they never decide behaviour.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::interaction::Easing;
use crate::{ObjectId, Trigger};

/// Axis-aligned rectangle in component-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Animatable visual values of a layer or control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    /// Alpha multiplier.
    pub opacity: f32,
    /// Horizontal offset in pixels.
    pub translate_x: f32,
    /// Vertical offset in pixels.
    pub translate_y: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Rotation around the X axis in degrees.
    pub rotate_x: f32,
    /// Rotation around the Y axis in degrees.
    pub rotate_y: f32,
    /// In-plane rotation in degrees.
    pub rotate: f32,
}

impl Visual {
    /// Fully opaque, untransformed.
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotate_x: 0.0,
        rotate_y: 0.0,
        rotate: 0.0,
    };

    /// Identity with the given opacity.
    #[must_use]
    pub const fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity,
            ..Self::IDENTITY
        }
    }

    /// Whether any transform component differs from identity.
    #[must_use]
    pub fn has_transform(&self) -> bool {
        self.translate_x != 0.0
            || self.translate_y != 0.0
            || (self.scale - 1.0).abs() > f32::EPSILON
            || self.rotate_x != 0.0
            || self.rotate_y != 0.0
            || self.rotate != 0.0
    }
}

impl Default for Visual {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Timing of a requested transition. The host interpolates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Transition length.
    pub duration: Duration,
    /// Delay before the transition starts.
    pub delay: Duration,
    /// Motion curve.
    pub easing: Easing,
}

impl Transition {
    /// Transition with no delay.
    #[must_use]
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    /// Set the start delay.
    #[must_use]
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One-shot animation from `from` to the layer's own visual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enter {
    /// Starting visual values.
    pub from: Visual,
    /// Timing.
    pub timing: Transition,
}

/// Emphasis applied to a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accent {
    /// No emphasis.
    #[default]
    None,
    /// Underlined when active.
    Underline,
    /// Filled pill when active.
    Pill,
    /// Bordered box, filled when active.
    Boxed,
    /// Positive outcome.
    Correct,
    /// Negative outcome.
    Incorrect,
}

/// Kind of built-in affordance drawn by a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    /// Previous-slide arrow.
    PreviousArrow,
    /// Next-slide arrow.
    NextArrow,
    /// Slide position dot.
    Dot,
    /// Tab header.
    TabHeader,
    /// Sheet close button.
    CloseButton,
    /// Sheet drag handle.
    Handle,
    /// Expand/collapse chevron.
    Chevron,
    /// Quiz prompt text.
    Prompt,
    /// Quiz answer option.
    AnswerOption,
    /// Quiz confirm button.
    Confirm,
    /// Quiz feedback message.
    Message,
    /// Quiz retry button.
    TryAgain,
}

/// A built-in affordance such as an arrow, dot or button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// What the control is.
    pub kind: ControlKind,
    /// Bounds relative to the owning layer.
    pub bounds: Rect,
    /// Text label.
    pub label: Option<String>,
    /// Whether the control is in its active/selected/enabled state.
    pub active: bool,
    /// Emphasis style.
    pub accent: Accent,
    /// Accent color, if the component configures one.
    pub accent_color: Option<String>,
    /// Trigger fired when tapped.
    pub action: Option<Trigger>,
    /// Target visual values.
    pub visual: Visual,
    /// Transition towards `visual`.
    pub transition: Option<Transition>,
}

impl Control {
    /// Create an inactive control with no action.
    #[must_use]
    pub fn new(kind: ControlKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            label: None,
            active: false,
            accent: Accent::None,
            accent_color: None,
            action: None,
            visual: Visual::IDENTITY,
            transition: None,
        }
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the tap action.
    #[must_use]
    pub fn with_action(mut self, trigger: Trigger) -> Self {
        self.action = Some(trigger);
        self
    }

    /// Set the active flag.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set the accent.
    #[must_use]
    pub const fn with_accent(mut self, accent: Accent) -> Self {
        self.accent = accent;
        self
    }
}

/// A stacked region of a component holding children and controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name, e.g. `front`, `backdrop`, `slide`.
    pub name: String,
    /// Bounds relative to the component.
    pub bounds: Rect,
    /// Child ids drawn in this layer, positioned relative to `bounds`.
    pub children: Vec<ObjectId>,
    /// Built-in controls drawn above the children.
    pub controls: Vec<Control>,
    /// Target visual values.
    pub visual: Visual,
    /// Transition towards `visual` and `bounds`.
    pub transition: Option<Transition>,
    /// One-shot enter animation.
    pub enter: Option<Enter>,
    /// Trigger fired when the layer is tapped.
    pub action: Option<Trigger>,
    /// Let taps fall through to whatever is below.
    pub passthrough: bool,
    /// Clip children to `bounds`.
    pub clip: bool,
    /// Hide the layer when rotated away from the viewer.
    pub backface_hidden: bool,
    /// Background fill.
    pub fill: Option<String>,
    /// Corner radius of the background.
    pub corner_radius: f32,
}

impl Layer {
    /// Create a plain layer.
    #[must_use]
    pub fn new(name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            name: name.into(),
            bounds,
            children: Vec::new(),
            controls: Vec::new(),
            visual: Visual::IDENTITY,
            transition: None,
            enter: None,
            action: None,
            passthrough: false,
            clip: false,
            backface_hidden: false,
            fill: None,
            corner_radius: 0.0,
        }
    }

    /// Set the children.
    #[must_use]
    pub fn with_children(mut self, children: &[ObjectId]) -> Self {
        self.children = children.to_vec();
        self
    }

    /// Set the target visual.
    #[must_use]
    pub const fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = visual;
        self
    }

    /// Set the transition.
    #[must_use]
    pub const fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Set the tap action.
    #[must_use]
    pub fn with_action(mut self, trigger: Trigger) -> Self {
        self.action = Some(trigger);
        self
    }

    /// Add a control.
    #[must_use]
    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }
}

/// Logical view of a component in one state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Current component width.
    pub width: f32,
    /// Current component height (expandables grow).
    pub height: f32,
    /// Clip everything to the component box.
    pub clip: bool,
    /// Transition of the component box size.
    pub transition: Option<Transition>,
    /// Trigger fired by a tap anywhere on the component.
    pub action: Option<Trigger>,
    /// Layers, bottom to top.
    pub layers: Vec<Layer>,
}

impl Frame {
    /// Frame with no content.
    #[must_use]
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Layer by name.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Every child id shown by any layer, bottom to top.
    #[must_use]
    pub fn visible_children(&self) -> Vec<&ObjectId> {
        self.layers.iter().flat_map(|l| l.children.iter()).collect()
    }

    /// Every control, bottom to top.
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.layers.iter().flat_map(|l| l.controls.iter())
    }
}
