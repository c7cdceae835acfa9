//! Native backend: camelCase style keys with numeric values, and explicit
//! animation descriptors for the platform's animation primitives.

use design_core::{Canvas, Easing, Enter, Transition, Visual};
use serde_json::{json, Value};

use super::{ControlLook, Origin, PresentationBackend, Surface};
use crate::compose::Layout;
use crate::node::{Animation, AnimationKind, NodeKind, Style, VisualNode};
use crate::style::{Radius, VisualAttributes};
use crate::{BackendType, RendererConfig};

const PERSPECTIVE: f32 = 1000.0;

/// Native curve name for an easing.
#[must_use]
pub const fn native_easing(easing: Easing) -> &'static str {
    match easing {
        Easing::Linear => "linear",
        Easing::EaseIn => "easeIn",
        Easing::EaseOut => "easeOut",
        Easing::EaseInOut => "easeInOut",
        Easing::Overshoot => "back",
    }
}

fn deg(value: f32) -> String {
    format!("{value}deg")
}

fn transform(visual: &Visual) -> Value {
    let mut parts = Vec::new();
    if visual.rotate_x != 0.0 || visual.rotate_y != 0.0 {
        parts.push(json!({ "perspective": PERSPECTIVE }));
    }
    if visual.translate_x != 0.0 {
        parts.push(json!({ "translateX": visual.translate_x }));
    }
    if visual.translate_y != 0.0 {
        parts.push(json!({ "translateY": visual.translate_y }));
    }
    if (visual.scale - 1.0).abs() > f32::EPSILON {
        parts.push(json!({ "scale": visual.scale }));
    }
    if visual.rotate_x != 0.0 {
        parts.push(json!({ "rotateX": deg(visual.rotate_x) }));
    }
    if visual.rotate_y != 0.0 {
        parts.push(json!({ "rotateY": deg(visual.rotate_y) }));
    }
    if visual.rotate != 0.0 {
        parts.push(json!({ "rotate": deg(visual.rotate) }));
    }
    Value::Array(parts)
}

/// Animated values of a visual, one key per channel.
fn channels(visual: &Visual) -> Style {
    Style::new()
        .with("opacity", visual.opacity)
        .with("translateX", visual.translate_x)
        .with("translateY", visual.translate_y)
        .with("scale", visual.scale)
        .with("rotateX", visual.rotate_x)
        .with("rotateY", visual.rotate_y)
        .with("rotate", visual.rotate)
}

fn millis_u64(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn radius_value(radius: Radius, style: &Style) -> Option<f64> {
    match radius {
        Radius::None => None,
        Radius::Px(r) => Some(f64::from(r)),
        Radius::Full => style.get_f64("width").map(|w| w / 2.0),
    }
}

/// Native-flavoured presentation backend.
#[derive(Debug, Clone, Default)]
pub struct NativeBackend {
    config: RendererConfig,
}

impl NativeBackend {
    /// Create a native backend.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }
}

impl PresentationBackend for NativeBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Native
    }

    fn config(&self) -> &RendererConfig {
        &self.config
    }

    fn paint_static(&self, attrs: &VisualAttributes) -> VisualNode {
        let mut node = VisualNode::new(attrs.id.as_str(), attrs.kind);
        let style = &mut node.style;
        self.paint_bounds(style, attrs.x, attrs.y, attrs.width, attrs.height);
        if attrs.rotation != 0.0 {
            style.set("transform", json!([{ "rotate": deg(attrs.rotation) }]));
            style.set("transformOrigin", "top left");
        }
        if (attrs.opacity - 1.0).abs() > f32::EPSILON {
            style.set("opacity", attrs.opacity);
        }
        if let Some(fill) = &attrs.background {
            style.set("backgroundColor", fill.as_str());
        }
        if let Some(border) = &attrs.border {
            style.set("borderWidth", border.width);
            style.set("borderColor", border.color.as_str());
        }
        if let Some(r) = radius_value(attrs.radius, style) {
            style.set("borderRadius", r);
        }
        if attrs.clip {
            style.set("overflow", "hidden");
        }
        if let Some(text) = &attrs.text {
            style.set("fontSize", text.font_size);
            style.set("fontFamily", text.font_family.as_str());
            style.set("fontWeight", if text.bold { "bold" } else { "normal" });
            style.set("fontStyle", if text.italic { "italic" } else { "normal" });
            style.set("textAlign", text.align.as_str());
            style.set("lineHeight", text.line_height);
            style.set("color", text.color.as_str());
            node.content = Some(text.content.clone());
        }
        if attrs.kind == NodeKind::Image {
            node.style.set("resizeMode", "cover");
            node.source.clone_from(&attrs.source);
        }
        node
    }

    fn paint_bounds(&self, style: &mut Style, x: f32, y: f32, width: f32, height: f32) {
        style.set("position", "absolute");
        style.set("left", x);
        style.set("top", y);
        style.set("width", width);
        style.set("height", height);
    }

    fn paint_visual(
        &self,
        node: &mut VisualNode,
        visual: &Visual,
        origin: Origin,
        transition: Option<&Transition>,
    ) {
        if visual.has_transform() {
            node.style.set("transform", transform(visual));
            if origin == Origin::TopLeft {
                node.style.set("transformOrigin", "top left");
            }
        }
        if transition.is_some() || (visual.opacity - 1.0).abs() > f32::EPSILON {
            node.style.set("opacity", visual.opacity);
        }
        let Some(t) = transition else { return };

        let mut to = channels(visual);
        for key in ["left", "top", "width", "height"] {
            if let Some(value) = node.style.get(key) {
                to.set(key, value.clone());
            }
        }
        node.animations.push(Animation {
            name: format!("{}-transition", node.key),
            kind: AnimationKind::Transition,
            from: Style::new(),
            to,
            duration_ms: millis_u64(t.duration),
            delay_ms: millis_u64(t.delay),
            easing: native_easing(t.easing).to_string(),
        });
    }

    fn paint_enter(&self, node: &mut VisualNode, enter: &Enter) {
        let timing = &enter.timing;
        node.animations.push(Animation {
            name: format!("{}-enter", node.key),
            kind: AnimationKind::Enter,
            from: channels(&enter.from),
            to: channels(&Visual::IDENTITY),
            duration_ms: millis_u64(timing.duration),
            delay_ms: millis_u64(timing.delay),
            easing: native_easing(timing.easing).to_string(),
        });
    }

    fn paint_surface(&self, style: &mut Style, surface: &Surface) {
        if let Some(fill) = &surface.fill {
            style.set("backgroundColor", fill.as_str());
        }
        if let Some(r) = radius_value(surface.radius, style) {
            style.set("borderRadius", r);
        }
        if surface.clip {
            style.set("overflow", "hidden");
        }
        if surface.passthrough {
            style.set("pointerEvents", "none");
        }
        if surface.backface_hidden {
            style.set("backfaceVisibility", "hidden");
        }
    }

    fn paint_control(&self, style: &mut Style, look: &ControlLook) {
        style.set("alignItems", "center");
        style.set("justifyContent", "center");
        if let Some(background) = &look.background {
            style.set("backgroundColor", background.as_str());
        }
        if let Some(color) = &look.color {
            style.set("color", color.as_str());
        }
        if let Some(border) = &look.border {
            style.set("borderWidth", border.width);
            style.set("borderColor", border.color.as_str());
        }
        if let Some(underline) = &look.underline {
            style.set("borderBottomWidth", underline.width);
            style.set("borderBottomColor", underline.color.as_str());
        }
        if let Some(r) = radius_value(look.radius, style) {
            style.set("borderRadius", r);
        }
    }

    fn root(&self, canvas: &Canvas, layout: &Layout, children: Vec<VisualNode>) -> VisualNode {
        let mut surface = VisualNode::new("canvas", NodeKind::View);
        surface.style = Style::new()
            .with("position", "absolute")
            .with("left", 0.0)
            .with("top", layout.offset_y)
            .with("width", canvas.width)
            .with("height", canvas.height)
            .with("backgroundColor", canvas.background_color.as_str())
            .with("transform", json!([{ "scale": layout.scale }]))
            .with("transformOrigin", "top left")
            .with("overflow", "hidden");
        surface.children = children;

        VisualNode::new("viewport", NodeKind::View)
            .with_style(
                Style::new()
                    .with("width", layout.viewport_width)
                    .with("height", layout.container_height())
                    .with("overflow", if layout.scrollable { "scroll" } else { "hidden" }),
            )
            .with_child(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_core::{millis, DesignObject, Geometry, ShapeObject};

    #[test]
    fn test_ellipse_radius_is_half_width() {
        let ellipse = DesignObject::Ellipse(ShapeObject {
            geometry: Geometry::new("e", 0.0, 0.0, 80.0, 40.0),
            fill: Some("#00ff00".into()),
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 4.0,
        });
        let node = NativeBackend::default().style_static(&ellipse).expect("static");
        assert_eq!(node.style.get_f64("borderRadius"), Some(40.0));
        assert_eq!(node.style.get_str("backgroundColor"), Some("#00ff00"));
    }

    #[test]
    fn test_transition_becomes_animation_descriptor() {
        let mut node = VisualNode::new("sheet", NodeKind::View);
        NativeBackend::default().paint_bounds(&mut node.style, 0.0, 200.0, 300.0, 200.0);
        let visual = Visual {
            translate_y: 200.0,
            ..Visual::IDENTITY
        };
        NativeBackend::default().paint_visual(
            &mut node,
            &visual,
            Origin::Center,
            Some(&Transition::new(millis(300), Easing::EaseOut)),
        );

        let animation = &node.animations[0];
        assert_eq!(animation.kind, AnimationKind::Transition);
        assert_eq!(animation.duration_ms, 300);
        assert_eq!(animation.easing, "easeOut");
        assert_eq!(animation.to.get_f64("translateY"), Some(200.0));
        assert_eq!(animation.to.get_f64("height"), Some(200.0));
        assert!(animation.from.is_empty());
    }

    #[test]
    fn test_enter_starts_from_hidden_channels() {
        let mut node = VisualNode::new("child", NodeKind::View);
        let enter = Enter {
            from: Visual {
                scale: 0.5,
                opacity: 0.0,
                ..Visual::IDENTITY
            },
            timing: Transition::new(millis(400), Easing::Overshoot),
        };
        NativeBackend::default().paint_enter(&mut node, &enter);
        let animation = &node.animations[0];
        assert_eq!(animation.from.get_f64("scale"), Some(0.5));
        assert_eq!(animation.to.get_f64("opacity"), Some(1.0));
        assert_eq!(animation.easing, "back");
    }
}
