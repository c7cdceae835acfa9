//! Presentation backends.
//!
//! A backend only spells things: it turns resolved static attributes and
//! interactive [`Frame`]s into its own style vocabulary. The walk over a
//! frame's layers and controls is shared, so both backends present the
//! same state machine output identically apart from property names.

pub mod dom;
pub mod native;

use design_core::{
    Accent, Canvas, Control, ControlKind, DesignObject, Enter, Frame, InteractiveObject, Layer,
    ObjectId, Transition, Visual,
};

use crate::compose::Layout;
use crate::node::{Action, NodeKind, Style, VisualNode};
use crate::style::{style_of, Border, Radius, VisualAttributes};
use crate::{BackendType, RendererConfig};

/// Point a transform pivots around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Top-left corner (static objects).
    TopLeft,
    /// Center of the box (layers and controls).
    Center,
}

/// Background and hit-testing flags of a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Background fill.
    pub fill: Option<String>,
    /// Corner rounding.
    pub radius: Radius,
    /// Clip children to the box.
    pub clip: bool,
    /// Let taps fall through.
    pub passthrough: bool,
    /// Hide when rotated away.
    pub backface_hidden: bool,
}

impl Surface {
    fn of_layer(layer: &Layer) -> Self {
        Self {
            fill: layer.fill.clone(),
            radius: if layer.corner_radius > 0.0 {
                Radius::Px(layer.corner_radius)
            } else {
                Radius::None
            },
            clip: layer.clip,
            passthrough: layer.passthrough,
            backface_hidden: layer.backface_hidden,
        }
    }
}

/// Decoration of a built-in control, shared by every backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlLook {
    /// Background fill.
    pub background: Option<String>,
    /// Text/glyph color.
    pub color: Option<String>,
    /// Full border.
    pub border: Option<Border>,
    /// Bottom border only.
    pub underline: Option<Border>,
    /// Corner rounding.
    pub radius: Radius,
    /// Text drawn when the control carries no label.
    pub glyph: Option<&'static str>,
}

const MUTED: &str = "#6b7280";
const NEUTRAL: &str = "#d1d5db";
const PRIMARY: &str = "#3b82f6";
const WHITE: &str = "#ffffff";
const CORRECT: &str = "#16a34a";
const INCORRECT: &str = "#dc2626";

impl ControlLook {
    fn plain() -> Self {
        Self {
            background: None,
            color: None,
            border: None,
            underline: None,
            radius: Radius::None,
            glyph: None,
        }
    }

    /// Resolve the look of a control in its current state.
    #[must_use]
    pub fn of(control: &Control) -> Self {
        let accent = control
            .accent_color
            .clone()
            .unwrap_or_else(|| PRIMARY.to_string());
        let solid = |width: f32, color: &str| {
            Some(Border {
                width,
                color: color.to_string(),
            })
        };
        let mut look = Self::plain();
        match control.kind {
            ControlKind::PreviousArrow | ControlKind::NextArrow => {
                look.background = Some("rgba(0, 0, 0, 0.4)".into());
                look.color = Some(WHITE.into());
                look.radius = Radius::Full;
                look.glyph = Some(if control.kind == ControlKind::PreviousArrow {
                    "‹"
                } else {
                    "›"
                });
            }
            ControlKind::Dot => {
                look.background = Some(if control.active {
                    WHITE.into()
                } else {
                    "rgba(255, 255, 255, 0.5)".into()
                });
                look.radius = Radius::Full;
            }
            ControlKind::TabHeader => {
                look.color = Some(if control.active { accent.clone() } else { MUTED.into() });
                match control.accent {
                    Accent::Underline if control.active => look.underline = solid(2.0, &accent),
                    Accent::Pill if control.active => {
                        look.background = Some(accent);
                        look.color = Some(WHITE.into());
                        look.radius = Radius::Full;
                    }
                    Accent::Boxed => {
                        look.border = solid(1.0, &accent);
                        if control.active {
                            look.background = Some(accent);
                            look.color = Some(WHITE.into());
                        }
                    }
                    _ => {}
                }
            }
            ControlKind::CloseButton => {
                look.color = Some(MUTED.into());
                look.glyph = Some("×");
            }
            ControlKind::Handle => {
                look.background = Some(NEUTRAL.into());
                look.radius = Radius::Full;
            }
            ControlKind::Chevron => {
                look.color = Some(MUTED.into());
                look.glyph = Some("⌄");
            }
            ControlKind::Prompt => look.color = Some("#111827".into()),
            ControlKind::AnswerOption => {
                look.radius = Radius::Px(8.0);
                if control.active {
                    look.border = solid(2.0, &accent);
                    look.background = Some("#eff6ff".into());
                } else {
                    look.border = solid(1.0, NEUTRAL);
                }
            }
            ControlKind::Confirm => {
                look.radius = Radius::Px(8.0);
                look.color = Some(WHITE.into());
                look.background = Some(if control.active { accent } else { "#9ca3af".into() });
            }
            ControlKind::Message => {
                look.color = Some(match control.accent {
                    Accent::Incorrect => INCORRECT.into(),
                    _ => CORRECT.into(),
                });
            }
            ControlKind::TryAgain => {
                look.radius = Radius::Px(8.0);
                look.border = solid(1.0, &accent);
                look.color = Some(accent);
            }
        }
        look
    }
}

/// Backend seam: how composed output is spelled for one platform.
pub trait PresentationBackend: Send + Sync {
    /// Backend type.
    fn backend_type(&self) -> BackendType;

    /// Renderer options this backend was created with.
    fn config(&self) -> &RendererConfig;

    /// Spell a static object's resolved attributes as a node.
    fn paint_static(&self, attrs: &VisualAttributes) -> VisualNode;

    /// Absolute position and size.
    fn paint_bounds(&self, style: &mut Style, x: f32, y: f32, width: f32, height: f32);

    /// Target visual values, and the transition towards them.
    fn paint_visual(
        &self,
        node: &mut VisualNode,
        visual: &Visual,
        origin: Origin,
        transition: Option<&Transition>,
    );

    /// One-shot enter animation.
    fn paint_enter(&self, node: &mut VisualNode, enter: &Enter);

    /// Background, clipping and hit-testing flags.
    fn paint_surface(&self, style: &mut Style, surface: &Surface);

    /// Built-in control decoration.
    fn paint_control(&self, style: &mut Style, look: &ControlLook);

    /// Wrap the painted objects in a viewport container holding the scaled
    /// canvas.
    fn root(&self, canvas: &Canvas, layout: &Layout, children: Vec<VisualNode>) -> VisualNode;

    /// Static mapper entry point. `None` for non-static or unknown kinds.
    fn style_static(&self, object: &DesignObject) -> Option<VisualNode> {
        let attrs = style_of(object, self.config())?;
        tracing::trace!(
            "{:?} static {} {} at ({}, {}) size {}x{}",
            self.backend_type(),
            object.kind_name(),
            attrs.id,
            attrs.x,
            attrs.y,
            attrs.width,
            attrs.height
        );
        Some(self.paint_static(&attrs))
    }

    /// Present an interactive component in the state described by `frame`.
    fn present(&self, component: &InteractiveObject, frame: &Frame) -> VisualNode {
        present_frame(self, component, frame)
    }
}

fn action(object: &ObjectId, trigger: Option<&design_core::Trigger>) -> Option<Action> {
    trigger.map(|t| Action {
        object: object.clone(),
        trigger: t.clone(),
    })
}

fn present_frame<B: PresentationBackend + ?Sized>(
    backend: &B,
    component: &InteractiveObject,
    frame: &Frame,
) -> VisualNode {
    let id = &component.geometry.id;
    let geometry = &component.geometry;

    let mut node = VisualNode::new(id.as_str(), NodeKind::View);
    backend.paint_bounds(&mut node.style, geometry.x, geometry.y, frame.width, frame.height);
    let visual = Visual {
        opacity: geometry.opacity,
        rotate: geometry.rotation,
        ..Visual::IDENTITY
    };
    backend.paint_visual(&mut node, &visual, Origin::TopLeft, frame.transition.as_ref());
    backend.paint_surface(
        &mut node.style,
        &Surface {
            fill: None,
            radius: Radius::None,
            clip: frame.clip,
            passthrough: false,
            backface_hidden: false,
        },
    );
    node.action = action(id, frame.action.as_ref());

    for layer in &frame.layers {
        node.children.push(present_layer(backend, component, layer));
    }
    node
}

fn present_layer<B: PresentationBackend + ?Sized>(
    backend: &B,
    component: &InteractiveObject,
    layer: &Layer,
) -> VisualNode {
    let id = &component.geometry.id;
    let key = format!("{id}/{}", layer.name);
    let b = layer.bounds;

    let mut node = VisualNode::new(key.as_str(), NodeKind::View);
    backend.paint_bounds(&mut node.style, b.x, b.y, b.width, b.height);
    backend.paint_visual(&mut node, &layer.visual, Origin::Center, layer.transition.as_ref());
    if let Some(enter) = &layer.enter {
        backend.paint_enter(&mut node, enter);
    }
    backend.paint_surface(&mut node.style, &Surface::of_layer(layer));
    node.action = action(id, layer.action.as_ref());

    for child_id in &layer.children {
        match component.child(child_id).and_then(|c| backend.style_static(c)) {
            Some(child) => node.children.push(child),
            None => tracing::debug!("Layer {key} skips child {child_id}"),
        }
    }

    for (index, control) in layer.controls.iter().enumerate() {
        node.children
            .push(present_control(backend, id, &key, index, control));
    }
    node
}

fn control_name(kind: ControlKind) -> &'static str {
    match kind {
        ControlKind::PreviousArrow => "previous",
        ControlKind::NextArrow => "next",
        ControlKind::Dot => "dot",
        ControlKind::TabHeader => "tab",
        ControlKind::CloseButton => "close",
        ControlKind::Handle => "handle",
        ControlKind::Chevron => "chevron",
        ControlKind::Prompt => "prompt",
        ControlKind::AnswerOption => "option",
        ControlKind::Confirm => "confirm",
        ControlKind::Message => "message",
        ControlKind::TryAgain => "try-again",
    }
}

fn present_control<B: PresentationBackend + ?Sized>(
    backend: &B,
    object: &ObjectId,
    layer_key: &str,
    index: usize,
    control: &Control,
) -> VisualNode {
    let look = ControlLook::of(control);
    let content = control
        .label
        .clone()
        .or_else(|| look.glyph.map(str::to_string));
    let kind = if content.is_some() {
        NodeKind::Text
    } else {
        NodeKind::View
    };

    let key = format!("{layer_key}/{}-{index}", control_name(control.kind));
    let mut node = VisualNode::new(key, kind);
    let b = control.bounds;
    backend.paint_bounds(&mut node.style, b.x, b.y, b.width, b.height);
    backend.paint_visual(&mut node, &control.visual, Origin::Center, control.transition.as_ref());
    backend.paint_control(&mut node.style, &look);
    node.content = content;
    node.action = action(object, control.action.as_ref());
    node
}
