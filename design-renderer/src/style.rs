//! Static object visual mapping.
//!
//! [`style_of`] is the pure, platform-neutral half of the static mapper:
//! it resolves defaults and per-kind rules into [`VisualAttributes`].
//! Each presentation backend then spells those attributes in its own
//! property vocabulary.

use design_core::{DesignObject, Geometry, ObjectId};
use serde::Serialize;

use crate::node::NodeKind;
use crate::RendererConfig;

/// Corner rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Radius {
    /// Square corners.
    None,
    /// Fixed radius in pixels.
    Px(f32),
    /// Fully rounded (ellipse); half the box on each axis.
    Full,
}

/// Stroke drawn around a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Border {
    /// Width in pixels.
    pub width: f32,
    /// Color.
    pub color: String,
}

/// Typography of a text object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAttributes {
    /// Content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font family.
    pub font_family: String,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Horizontal alignment.
    pub align: String,
    /// Line height in pixels.
    pub line_height: f32,
    /// Text color.
    pub color: String,
}

/// Everything needed to draw one static object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualAttributes {
    /// Source object id.
    pub id: ObjectId,
    /// Node kind to create.
    pub kind: NodeKind,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Drawn width.
    pub width: f32,
    /// Drawn height.
    pub height: f32,
    /// Rotation in degrees around the top-left corner.
    pub rotation: f32,
    /// Alpha multiplier.
    pub opacity: f32,
    /// Background fill.
    pub background: Option<String>,
    /// Border stroke.
    pub border: Option<Border>,
    /// Corner rounding.
    pub radius: Radius,
    /// Text typography, for text objects.
    pub text: Option<TextAttributes>,
    /// Image source, for image objects.
    pub source: Option<String>,
    /// Clip content to the box.
    pub clip: bool,
}

impl VisualAttributes {
    fn boxed(geometry: &Geometry, kind: NodeKind) -> Self {
        Self {
            id: geometry.id.clone(),
            kind,
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            rotation: geometry.rotation,
            opacity: geometry.opacity,
            background: None,
            border: None,
            radius: Radius::None,
            text: None,
            source: None,
            clip: false,
        }
    }
}

fn border(stroke: Option<&String>, width: f32) -> Option<Border> {
    match stroke {
        Some(color) if width > 0.0 => Some(Border {
            width,
            color: color.clone(),
        }),
        _ => None,
    }
}

/// Map a static object to its visual attributes.
///
/// Returns `None` for interactive components (not static) and unknown
/// kinds (render nothing).
#[must_use]
pub fn style_of(object: &DesignObject, config: &RendererConfig) -> Option<VisualAttributes> {
    match object {
        DesignObject::Rect(shape) | DesignObject::Ellipse(shape) => {
            let mut attrs = VisualAttributes::boxed(&shape.geometry, NodeKind::View);
            attrs.background.clone_from(&shape.fill);
            attrs.border = border(shape.stroke.as_ref(), shape.stroke_width);
            attrs.radius = if matches!(object, DesignObject::Ellipse(_)) {
                Radius::Full
            } else if shape.corner_radius > 0.0 {
                Radius::Px(shape.corner_radius)
            } else {
                Radius::None
            };
            Some(attrs)
        }
        DesignObject::Text(text) => {
            let mut attrs = VisualAttributes::boxed(&text.geometry, NodeKind::Text);
            attrs.clip = true;
            attrs.text = Some(TextAttributes {
                content: text.text.clone(),
                font_size: text.font_size,
                font_family: text.font_family.clone(),
                bold: text.is_bold(),
                italic: text.is_italic(),
                align: text.align.clone(),
                line_height: text.font_size * text.line_height,
                color: text
                    .fill
                    .clone()
                    .unwrap_or_else(|| config.text_color.clone()),
            });
            Some(attrs)
        }
        DesignObject::Image(image) => {
            let mut attrs = VisualAttributes::boxed(&image.geometry, NodeKind::Image);
            attrs.source = Some(image.src.clone());
            attrs.clip = true;
            Some(attrs)
        }
        DesignObject::Line(line) => {
            let mut attrs = VisualAttributes::boxed(&line.geometry, NodeKind::View);
            attrs.width = line.length();
            attrs.height = line.stroke_width;
            attrs.background = Some(
                line.stroke
                    .clone()
                    .unwrap_or_else(|| config.line_color.clone()),
            );
            Some(attrs)
        }
        DesignObject::Interactive(_) => None,
        DesignObject::Unknown => {
            tracing::trace!("No static mapping for unknown object kind");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_core::{ImageObject, LineObject, ShapeObject};

    fn shape(corner_radius: f32) -> ShapeObject {
        ShapeObject {
            geometry: Geometry::new("s", 10.0, 20.0, 100.0, 40.0),
            fill: Some("#ff0000".into()),
            stroke: Some("#000000".into()),
            stroke_width: 2.0,
            corner_radius,
        }
    }

    fn text(font_style: &str) -> DesignObject {
        serde_json::from_value(serde_json::json!({
            "type": "text", "id": "t", "x": 0, "y": 0, "width": 120, "height": 30,
            "text": "Hello", "fontSize": 20, "fontStyle": font_style
        }))
        .expect("valid text")
    }

    #[test]
    fn test_rect_keeps_radius_and_border() {
        let attrs = style_of(&DesignObject::Rect(shape(8.0)), &RendererConfig::default())
            .expect("static");
        assert_eq!(attrs.radius, Radius::Px(8.0));
        assert_eq!(attrs.background.as_deref(), Some("#ff0000"));
        assert_eq!(
            attrs.border,
            Some(Border {
                width: 2.0,
                color: "#000000".into()
            })
        );
    }

    #[test]
    fn test_ellipse_ignores_corner_radius() {
        let attrs = style_of(&DesignObject::Ellipse(shape(8.0)), &RendererConfig::default())
            .expect("static");
        assert_eq!(attrs.radius, Radius::Full);
    }

    #[test]
    fn test_zero_width_stroke_draws_no_border() {
        let mut s = shape(0.0);
        s.stroke_width = 0.0;
        let attrs = style_of(&DesignObject::Rect(s), &RendererConfig::default()).expect("static");
        assert!(attrs.border.is_none());
        assert_eq!(attrs.radius, Radius::None);
    }

    #[test]
    fn test_text_style_flags_are_independent() {
        let config = RendererConfig::default();
        let both = style_of(&text("bold italic"), &config).expect("static");
        let t = both.text.expect("text");
        assert!(t.bold && t.italic);
        assert!((t.line_height - 24.0).abs() < f32::EPSILON);
        assert_eq!(t.color, config.text_color);
        assert!(both.clip);

        let plain = style_of(&text("normal"), &config).expect("static");
        let t = plain.text.expect("text");
        assert!(!t.bold && !t.italic);
    }

    #[test]
    fn test_image_covers_box() {
        let image = DesignObject::Image(ImageObject {
            geometry: Geometry::new("i", 0.0, 0.0, 50.0, 50.0),
            src: "https://cdn.example.com/a.png".into(),
        });
        let attrs = style_of(&image, &RendererConfig::default()).expect("static");
        assert_eq!(attrs.kind, NodeKind::Image);
        assert_eq!(attrs.source.as_deref(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_line_is_thin_rect_with_defaults() {
        let line = DesignObject::Line(LineObject {
            geometry: Geometry::new("l", 5.0, 5.0, 0.0, 0.0),
            stroke: None,
            stroke_width: 2.0,
        });
        let attrs = style_of(&line, &RendererConfig::default()).expect("static");
        assert!((attrs.width - LineObject::DEFAULT_LENGTH).abs() < f32::EPSILON);
        assert!((attrs.height - 2.0).abs() < f32::EPSILON);
        assert!(attrs.background.is_some());
    }

    #[test]
    fn test_rotation_and_opacity_carry_through() {
        let mut s = shape(0.0);
        s.geometry.rotation = 30.0;
        s.geometry.opacity = 0.25;
        let attrs = style_of(&DesignObject::Rect(s), &RendererConfig::default()).expect("static");
        assert!((attrs.rotation - 30.0).abs() < f32::EPSILON);
        assert!((attrs.opacity - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_static_kinds_map_to_nothing() {
        assert!(style_of(&DesignObject::Unknown, &RendererConfig::default()).is_none());
    }
}
