//! Design documents - a fixed canvas and its ordered object list.

use serde::{Deserialize, Serialize};

use crate::{DesignObject, DesignResult, ObjectId};

/// Coordinate space all object geometry is absolute within.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Background color.
    #[serde(default = "Canvas::default_background")]
    pub background_color: String,
}

impl Canvas {
    fn default_background() -> String {
        "#ffffff".to_string()
    }

    /// Create a canvas with a white background.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            background_color: Self::default_background(),
        }
    }
}

/// A complete serialized design.
///
/// Documents are immutable input: renderers never write interaction state
/// back into them. Object order is paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Canvas dimensions and background.
    pub canvas: Canvas,
    /// Objects in paint order (later objects draw on top).
    #[serde(default)]
    pub objects: Vec<DesignObject>,
}

impl Document {
    /// Create an empty document on the given canvas.
    #[must_use]
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            objects: Vec::new(),
        }
    }

    /// Append an object on top of the existing ones.
    #[must_use]
    pub fn with_object(mut self, object: DesignObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Find a top-level object by id.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&DesignObject> {
        self.objects.iter().find(|o| o.id() == Some(id))
    }

    /// Visible objects in paint order.
    pub fn visible_objects(&self) -> impl Iterator<Item = &DesignObject> {
        self.objects.iter().filter(|o| o.is_visible())
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DesignResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a document.
    pub fn from_json(json: &str) -> DesignResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A stored design as returned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Stored document identifier.
    pub id: String,
    /// Human readable title.
    #[serde(default)]
    pub title: String,
    /// The design itself.
    pub doc: Document,
    /// Optional thumbnail URI.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Owner identifier.
    #[serde(default)]
    pub owner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, ShapeObject};

    fn rect(id: &str, visible: bool) -> DesignObject {
        let mut geometry = Geometry::new(id, 0.0, 0.0, 10.0, 10.0);
        geometry.visible = visible;
        DesignObject::Rect(ShapeObject {
            geometry,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
        })
    }

    #[test]
    fn test_visible_objects_keep_order() {
        let doc = Document::new(Canvas::new(400.0, 800.0))
            .with_object(rect("a", true))
            .with_object(rect("b", false))
            .with_object(rect("c", true));

        let ids: Vec<_> = doc
            .visible_objects()
            .filter_map(|o| o.id().map(ObjectId::as_str))
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(doc.object(&ObjectId::new("b")).is_some());
    }

    #[test]
    fn test_document_json_round_trip() {
        let json = r##"{
            "canvas": {"width": 375, "height": 667, "backgroundColor": "#101010"},
            "objects": [
                {"type": "text", "id": "title", "text": "Hello", "width": 200, "height": 40}
            ]
        }"##;
        let doc = Document::from_json(json).expect("should parse");
        assert_eq!(doc.canvas.background_color, "#101010");
        assert_eq!(doc.objects.len(), 1);

        let again = Document::from_json(&doc.to_json().expect("should encode")).expect("reparse");
        assert_eq!(doc, again);
    }
}
