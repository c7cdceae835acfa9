//! DOM backend: CSS property names and values.
//!
//! Transitions are left to the browser (`transition: all ...`); enter
//! animations are emitted as a CSS `animation` shorthand plus an
//! [`Animation`] descriptor the host turns into `@keyframes`.

use design_core::{Canvas, Easing, Enter, Transition, Visual};

use super::{ControlLook, Origin, PresentationBackend, Surface};
use crate::compose::Layout;
use crate::node::{Animation, AnimationKind, NodeKind, Style, VisualNode};
use crate::style::{Radius, VisualAttributes};
use crate::{BackendType, RendererConfig};

/// Perspective applied to 3D rotations so flips read as depth.
const PERSPECTIVE_PX: u32 = 1000;

fn px(value: f32) -> String {
    format!("{value}px")
}

fn ms(duration: std::time::Duration) -> u128 {
    duration.as_millis()
}

/// CSS timing function for an easing curve.
#[must_use]
pub const fn css_easing(easing: Easing) -> &'static str {
    match easing {
        Easing::Linear => "linear",
        Easing::EaseIn => "ease-in",
        Easing::EaseOut => "ease-out",
        Easing::EaseInOut => "ease-in-out",
        Easing::Overshoot => "cubic-bezier(0.34, 1.56, 0.64, 1)",
    }
}

/// CSS `transform` value. `canonical` writes every function so two values
/// interpolate component-wise.
fn css_transform(visual: &Visual, canonical: bool) -> Option<String> {
    if canonical {
        return Some(format!(
            "perspective({PERSPECTIVE_PX}px) translate({}, {}) scale({}) rotateX({}deg) rotateY({}deg) rotate({}deg)",
            px(visual.translate_x),
            px(visual.translate_y),
            visual.scale,
            visual.rotate_x,
            visual.rotate_y,
            visual.rotate
        ));
    }
    let mut parts = Vec::new();
    if visual.rotate_x != 0.0 || visual.rotate_y != 0.0 {
        parts.push(format!("perspective({PERSPECTIVE_PX}px)"));
    }
    if visual.translate_x != 0.0 || visual.translate_y != 0.0 {
        parts.push(format!(
            "translate({}, {})",
            px(visual.translate_x),
            px(visual.translate_y)
        ));
    }
    if (visual.scale - 1.0).abs() > f32::EPSILON {
        parts.push(format!("scale({})", visual.scale));
    }
    if visual.rotate_x != 0.0 {
        parts.push(format!("rotateX({}deg)", visual.rotate_x));
    }
    if visual.rotate_y != 0.0 {
        parts.push(format!("rotateY({}deg)", visual.rotate_y));
    }
    if visual.rotate != 0.0 {
        parts.push(format!("rotate({}deg)", visual.rotate));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn visual_style(visual: &Visual, canonical: bool) -> Style {
    let mut style = Style::new();
    style.set("opacity", visual.opacity.to_string());
    style.set(
        "transform",
        css_transform(visual, canonical).unwrap_or_else(|| "none".to_string()),
    );
    style
}

fn radius(radius: Radius) -> Option<String> {
    match radius {
        Radius::None => None,
        Radius::Px(r) => Some(px(r)),
        Radius::Full => Some("50%".to_string()),
    }
}

/// Name of the keyframes that play from `from` to identity.
fn keyframes_name(from: &Visual) -> String {
    // Rounded to keep names stable across float noise.
    #[allow(clippy::cast_possible_truncation)]
    let part = |v: f32| (v * 100.0).round() as i64;
    format!(
        "enter-o{}-x{}-y{}-s{}",
        part(from.opacity),
        part(from.translate_x),
        part(from.translate_y),
        part(from.scale)
    )
}

/// CSS-flavoured presentation backend.
#[derive(Debug, Clone, Default)]
pub struct DomBackend {
    config: RendererConfig,
}

impl DomBackend {
    /// Create a DOM backend.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }
}

impl PresentationBackend for DomBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Dom
    }

    fn config(&self) -> &RendererConfig {
        &self.config
    }

    fn paint_static(&self, attrs: &VisualAttributes) -> VisualNode {
        let mut node = VisualNode::new(attrs.id.as_str(), attrs.kind);
        let style = &mut node.style;
        self.paint_bounds(style, attrs.x, attrs.y, attrs.width, attrs.height);
        if attrs.rotation != 0.0 {
            style.set("transform", format!("rotate({}deg)", attrs.rotation));
            style.set("transform-origin", "top left");
        }
        if (attrs.opacity - 1.0).abs() > f32::EPSILON {
            style.set("opacity", attrs.opacity.to_string());
        }
        if let Some(fill) = &attrs.background {
            style.set("background-color", fill.as_str());
        }
        if let Some(border) = &attrs.border {
            style.set("border", format!("{} solid {}", px(border.width), border.color));
            style.set("box-sizing", "border-box");
        }
        if let Some(r) = radius(attrs.radius) {
            style.set("border-radius", r);
        }
        if attrs.clip {
            style.set("overflow", "hidden");
        }
        if let Some(text) = &attrs.text {
            style.set("font-size", px(text.font_size));
            style.set("font-family", text.font_family.as_str());
            style.set("font-weight", if text.bold { "bold" } else { "normal" });
            style.set("font-style", if text.italic { "italic" } else { "normal" });
            style.set("text-align", text.align.as_str());
            style.set("line-height", px(text.line_height));
            style.set("color", text.color.as_str());
            style.set("white-space", "pre-wrap");
            node.content = Some(text.content.clone());
        }
        if attrs.kind == NodeKind::Image {
            node.style.set("object-fit", "cover");
            node.source.clone_from(&attrs.source);
        }
        node
    }

    fn paint_bounds(&self, style: &mut Style, x: f32, y: f32, width: f32, height: f32) {
        style.set("position", "absolute");
        style.set("left", px(x));
        style.set("top", px(y));
        style.set("width", px(width));
        style.set("height", px(height));
    }

    fn paint_visual(
        &self,
        node: &mut VisualNode,
        visual: &Visual,
        origin: Origin,
        transition: Option<&Transition>,
    ) {
        let animated = transition.is_some();
        if animated || visual.has_transform() {
            if let Some(transform) = css_transform(visual, animated && origin == Origin::Center) {
                node.style.set("transform", transform);
            }
            if origin == Origin::TopLeft {
                node.style.set("transform-origin", "top left");
            }
        }
        if animated || (visual.opacity - 1.0).abs() > f32::EPSILON {
            node.style.set("opacity", visual.opacity.to_string());
        }
        if let Some(t) = transition {
            node.style.set(
                "transition",
                format!(
                    "all {}ms {} {}ms",
                    ms(t.duration),
                    css_easing(t.easing),
                    ms(t.delay)
                ),
            );
        }
    }

    fn paint_enter(&self, node: &mut VisualNode, enter: &Enter) {
        let name = keyframes_name(&enter.from);
        let timing = &enter.timing;
        node.style.set(
            "animation",
            format!(
                "{name} {}ms {} {}ms both",
                ms(timing.duration),
                css_easing(timing.easing),
                ms(timing.delay)
            ),
        );
        node.animations.push(Animation {
            name,
            kind: AnimationKind::Enter,
            from: visual_style(&enter.from, false),
            to: visual_style(&Visual::IDENTITY, false),
            duration_ms: u64::try_from(timing.duration.as_millis()).unwrap_or(u64::MAX),
            delay_ms: u64::try_from(timing.delay.as_millis()).unwrap_or(u64::MAX),
            easing: css_easing(timing.easing).to_string(),
        });
    }

    fn paint_surface(&self, style: &mut Style, surface: &Surface) {
        if let Some(fill) = &surface.fill {
            style.set("background-color", fill.as_str());
        }
        if let Some(r) = radius(surface.radius) {
            style.set("border-radius", r);
        }
        if surface.clip {
            style.set("overflow", "hidden");
        }
        if surface.passthrough {
            style.set("pointer-events", "none");
        }
        if surface.backface_hidden {
            style.set("backface-visibility", "hidden");
            style.set("-webkit-backface-visibility", "hidden");
        }
    }

    fn paint_control(&self, style: &mut Style, look: &ControlLook) {
        style.set("display", "flex");
        style.set("align-items", "center");
        style.set("justify-content", "center");
        style.set("cursor", "pointer");
        if let Some(background) = &look.background {
            style.set("background-color", background.as_str());
        }
        if let Some(color) = &look.color {
            style.set("color", color.as_str());
        }
        if let Some(border) = &look.border {
            style.set("border", format!("{} solid {}", px(border.width), border.color));
            style.set("box-sizing", "border-box");
        }
        if let Some(underline) = &look.underline {
            style.set(
                "border-bottom",
                format!("{} solid {}", px(underline.width), underline.color),
            );
        }
        if let Some(r) = radius(look.radius) {
            style.set("border-radius", r);
        }
    }

    fn root(&self, canvas: &Canvas, layout: &Layout, children: Vec<VisualNode>) -> VisualNode {
        let mut surface = VisualNode::new("canvas", NodeKind::View);
        surface.style = Style::new()
            .with("position", "absolute")
            .with("left", "0px")
            .with("top", px(layout.offset_y))
            .with("width", px(canvas.width))
            .with("height", px(canvas.height))
            .with("background-color", canvas.background_color.as_str())
            .with("transform", format!("scale({})", layout.scale))
            .with("transform-origin", "top left")
            .with("overflow", "hidden");
        surface.children = children;

        VisualNode::new("viewport", NodeKind::View)
            .with_style(
                Style::new()
                    .with("position", "relative")
                    .with("width", px(layout.viewport_width))
                    .with("height", px(layout.container_height()))
                    .with("overflow-x", "hidden")
                    .with("overflow-y", if layout.scrollable { "auto" } else { "hidden" }),
            )
            .with_child(surface)
    }
}
