//! Design objects - the static primitives and interactive components of a document.

use serde::{Deserialize, Serialize};

use crate::interaction::Interaction;

/// Identifier of an object, unique within its document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attributes shared by every object kind.
///
/// Coordinates are absolute in the canvas space, except for children of an
/// interactive component whose coordinates are relative to the component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    /// Object identifier.
    pub id: ObjectId,
    /// X position (pixels from left).
    #[serde(default)]
    pub x: f32,
    /// Y position (pixels from top).
    #[serde(default)]
    pub y: f32,
    /// Width in pixels.
    #[serde(default)]
    pub width: f32,
    /// Height in pixels.
    #[serde(default)]
    pub height: f32,
    /// Rotation in degrees, around the top-left corner.
    #[serde(default)]
    pub rotation: f32,
    /// Opacity from 0 to 1.
    #[serde(default = "Geometry::default_opacity")]
    pub opacity: f32,
    /// Hidden objects stay in the document but are never rendered.
    #[serde(default = "Geometry::default_visible")]
    pub visible: bool,
}

impl Geometry {
    const fn default_opacity() -> f32 {
        1.0
    }

    const fn default_visible() -> bool {
        true
    }

    /// Geometry at the given position and size with default attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: ObjectId::new(id),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
        }
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Rectangle or ellipse attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeObject {
    /// Common attributes.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Fill color.
    #[serde(default)]
    pub fill: Option<String>,
    /// Stroke color.
    #[serde(default)]
    pub stroke: Option<String>,
    /// Stroke width in pixels.
    #[serde(default)]
    pub stroke_width: f32,
    /// Corner radius in pixels (ignored for ellipses).
    #[serde(default)]
    pub corner_radius: f32,
}

/// Text attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    /// Common attributes.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Text content.
    #[serde(default)]
    pub text: String,
    /// Font size in pixels.
    #[serde(default = "TextObject::default_font_size")]
    pub font_size: f32,
    /// Font family name.
    #[serde(default = "TextObject::default_font_family")]
    pub font_family: String,
    /// Space separated style flags, e.g. `"bold italic"`.
    #[serde(default)]
    pub font_style: String,
    /// Horizontal alignment (`left`, `center`, `right`).
    #[serde(default = "TextObject::default_align")]
    pub align: String,
    /// Line height as a multiple of the font size.
    #[serde(default = "TextObject::default_line_height")]
    pub line_height: f32,
    /// Text color.
    #[serde(default)]
    pub fill: Option<String>,
}

impl TextObject {
    const fn default_font_size() -> f32 {
        16.0
    }

    fn default_font_family() -> String {
        "Inter".to_string()
    }

    fn default_align() -> String {
        "left".to_string()
    }

    const fn default_line_height() -> f32 {
        1.2
    }

    /// Whether the style flags include bold.
    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.font_style.contains("bold")
    }

    /// Whether the style flags include italic.
    #[must_use]
    pub fn is_italic(&self) -> bool {
        self.font_style.contains("italic")
    }
}

/// Image attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageObject {
    /// Common attributes.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Image source URI, resolved by the host platform.
    #[serde(default)]
    pub src: String,
}

/// Line attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineObject {
    /// Common attributes. A zero width means the default length.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Line color.
    #[serde(default)]
    pub stroke: Option<String>,
    /// Line thickness in pixels.
    #[serde(default = "LineObject::default_stroke_width")]
    pub stroke_width: f32,
}

impl LineObject {
    /// Length used when the object declares no width.
    pub const DEFAULT_LENGTH: f32 = 200.0;

    const fn default_stroke_width() -> f32 {
        2.0
    }

    /// Drawn length of the line.
    #[must_use]
    pub fn length(&self) -> f32 {
        if self.geometry.width > 0.0 {
            self.geometry.width
        } else {
            Self::DEFAULT_LENGTH
        }
    }
}

/// A named subset of a component's children filling one semantic slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Slot role, e.g. `front`, `trigger`, `slide-0`.
    pub role: String,
    /// Child ids belonging to this slot.
    #[serde(default)]
    pub object_ids: Vec<ObjectId>,
    /// Optional display label (used for tab headers).
    #[serde(default)]
    pub label: Option<String>,
}

impl Group {
    /// Create a group for a role with the given member ids.
    #[must_use]
    pub fn new(role: impl Into<String>, ids: &[&str]) -> Self {
        Self {
            role: role.into(),
            object_ids: ids.iter().map(|id| ObjectId::new(*id)).collect(),
            label: None,
        }
    }

    /// Set the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A composite object backing one interaction pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawInteractive", into = "RawInteractive")]
pub struct InteractiveObject {
    /// Common attributes.
    pub geometry: Geometry,
    /// Interaction kind with its typed configuration.
    pub interaction: Interaction,
    /// Child objects, positioned relative to this component.
    pub children: Vec<DesignObject>,
    /// Role-tagged child groups.
    pub groups: Vec<Group>,
}

impl InteractiveObject {
    /// Create a component with no children or groups.
    #[must_use]
    pub fn new(geometry: Geometry, interaction: Interaction) -> Self {
        Self {
            geometry,
            interaction,
            children: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Add a child object.
    #[must_use]
    pub fn with_child(mut self, child: DesignObject) -> Self {
        self.children.push(child);
        self
    }

    /// Add a group.
    #[must_use]
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Find a child by id.
    #[must_use]
    pub fn child(&self, id: &ObjectId) -> Option<&DesignObject> {
        self.children.iter().find(|c| c.id() == Some(id))
    }
}

/// Wire shape of an interactive component; the config is decoded by tag.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInteractive {
    #[serde(flatten)]
    geometry: Geometry,
    interaction_type: String,
    #[serde(default)]
    interaction_config: serde_json::Value,
    #[serde(default)]
    children: Vec<DesignObject>,
    #[serde(default)]
    groups: Vec<Group>,
}

impl From<RawInteractive> for InteractiveObject {
    fn from(raw: RawInteractive) -> Self {
        let interaction = Interaction::decode(&raw.interaction_type, &raw.interaction_config);
        Self {
            geometry: raw.geometry,
            interaction,
            children: raw.children,
            groups: raw.groups,
        }
    }
}

impl From<InteractiveObject> for RawInteractive {
    fn from(object: InteractiveObject) -> Self {
        Self {
            interaction_type: object.interaction.tag().to_string(),
            interaction_config: object.interaction.config_value(),
            geometry: object.geometry,
            children: object.children,
            groups: object.groups,
        }
    }
}

/// Any object that can appear in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DesignObject {
    /// Filled rounded rectangle.
    Rect(ShapeObject),
    /// Ellipse inscribed in its box.
    Ellipse(ShapeObject),
    /// Text box.
    Text(TextObject),
    /// Image covering its box.
    Image(ImageObject),
    /// Horizontal line drawn as a thin rectangle.
    Line(LineObject),
    /// Interactive component with children and groups.
    Interactive(InteractiveObject),
    /// Kind this renderer does not know; renders nothing.
    #[serde(other)]
    Unknown,
}

impl DesignObject {
    /// Common attributes, if the kind is known.
    #[must_use]
    pub fn geometry(&self) -> Option<&Geometry> {
        match self {
            Self::Rect(s) | Self::Ellipse(s) => Some(&s.geometry),
            Self::Text(t) => Some(&t.geometry),
            Self::Image(i) => Some(&i.geometry),
            Self::Line(l) => Some(&l.geometry),
            Self::Interactive(c) => Some(&c.geometry),
            Self::Unknown => None,
        }
    }

    /// Object id, if the kind is known.
    #[must_use]
    pub fn id(&self) -> Option<&ObjectId> {
        self.geometry().map(|g| &g.id)
    }

    /// Whether this object should be rendered. Unknown kinds count as
    /// visible so they reach the dispatcher's unhandled branch.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.geometry().map_or(true, |g| g.visible)
    }

    /// Whether this is one of the static primitive kinds.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        matches!(
            self,
            Self::Rect(_) | Self::Ellipse(_) | Self::Text(_) | Self::Image(_) | Self::Line(_)
        )
    }

    /// Short kind name used in logs.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Rect(_) => "rect",
            Self::Ellipse(_) => "ellipse",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Line(_) => "line",
            Self::Interactive(_) => "interactive",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rect_with_defaults() {
        let json = r##"{"type":"rect","id":"r1","x":10,"y":20,"width":100,"height":50,"fill":"#ff0000"}"##;
        let object: DesignObject = serde_json::from_str(json).expect("should parse");

        let DesignObject::Rect(rect) = &object else {
            panic!("Expected rect");
        };
        assert_eq!(rect.geometry.id.as_str(), "r1");
        assert!((rect.geometry.opacity - 1.0).abs() < f32::EPSILON);
        assert!(rect.geometry.visible);
        assert_eq!(rect.fill.as_deref(), Some("#ff0000"));
        assert!(rect.stroke_width.abs() < f32::EPSILON);
    }

    #[test]
    fn test_unknown_kind_parses_as_unknown() {
        let json = r#"{"type":"star","id":"s1","points":5}"#;
        let object: DesignObject = serde_json::from_str(json).expect("should parse");
        assert_eq!(object, DesignObject::Unknown);
        assert!(object.id().is_none());
        assert!(object.is_visible());
    }

    #[test]
    fn test_text_style_flags_combine() {
        let json = r#"{"type":"text","id":"t1","text":"Hi","fontStyle":"italic bold"}"#;
        let DesignObject::Text(text) = serde_json::from_str(json).expect("should parse") else {
            panic!("Expected text");
        };
        assert!(text.is_bold());
        assert!(text.is_italic());
        assert!((text.font_size - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_line_defaults() {
        let json = r#"{"type":"line","id":"l1"}"#;
        let DesignObject::Line(line) = serde_json::from_str(json).expect("should parse") else {
            panic!("Expected line");
        };
        assert!((line.stroke_width - 2.0).abs() < f32::EPSILON);
        assert!((line.length() - LineObject::DEFAULT_LENGTH).abs() < f32::EPSILON);
    }

    #[test]
    fn test_interactive_round_trips_through_raw_shape() {
        let json = r#"{
            "type": "interactive",
            "id": "card",
            "width": 200,
            "height": 300,
            "interactionType": "flip-card",
            "interactionConfig": {"flipDuration": 400},
            "children": [{"type":"rect","id":"a","width":10,"height":10}],
            "groups": [{"role":"front","objectIds":["a"]}]
        }"#;
        let object: DesignObject = serde_json::from_str(json).expect("should parse");
        let DesignObject::Interactive(component) = &object else {
            panic!("Expected interactive");
        };
        assert_eq!(component.interaction.tag(), "flip-card");
        assert!(component.child(&ObjectId::new("a")).is_some());

        let encoded = serde_json::to_value(&object).expect("should encode");
        assert_eq!(encoded["interactionType"], "flip-card");
        assert_eq!(encoded["interactionConfig"]["flipDuration"], 400);
    }
}
