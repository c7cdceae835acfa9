//! Document walker and compositor.
//!
//! Walks a document in paint order, skips hidden objects, routes every
//! survivor to the static mapper or its mounted component instance, and
//! wraps the result in a container scaled to the viewport. Scaling happens
//! once at the root; every object keeps document-space geometry.

use std::collections::HashSet;

use design_core::{
    Canvas, DesignObject, Document, Interaction, InstanceTable, InteractiveObject, ObjectId,
};
use serde::{Deserialize, Serialize};

use crate::backend::PresentationBackend;
use crate::node::VisualNode;
use crate::{RenderError, RenderResult};

/// Space available to the composed canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Available width in pixels.
    pub width: f32,
    /// Available height, if bounded. `None` means top-aligned.
    pub height: Option<f32>,
}

impl Viewport {
    /// Viewport with a known height.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height: Some(height),
        }
    }

    /// Viewport with an unbounded height.
    #[must_use]
    pub const fn width_only(width: f32) -> Self {
        Self {
            width,
            height: None,
        }
    }
}

/// How the canvas sits inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Uniform scale, `viewport.width / canvas.width`.
    pub scale: f32,
    /// Canvas width after scaling.
    pub scaled_width: f32,
    /// Canvas height after scaling.
    pub scaled_height: f32,
    /// Vertical offset that centers a short canvas.
    pub offset_y: f32,
    /// Whether the container must scroll to show the whole canvas.
    pub scrollable: bool,
    /// Viewport width.
    pub viewport_width: f32,
    /// Viewport height, if bounded.
    pub viewport_height: Option<f32>,
}

impl Layout {
    /// Fit a canvas to a viewport.
    ///
    /// # Errors
    ///
    /// Returns an error if either width is not a positive finite number.
    pub fn fit(canvas: &Canvas, viewport: Viewport) -> RenderResult<Self> {
        if !(viewport.width.is_finite() && viewport.width > 0.0) {
            return Err(RenderError::InvalidViewport(format!(
                "width must be positive, got {}",
                viewport.width
            )));
        }
        if !(canvas.width.is_finite() && canvas.width > 0.0) {
            return Err(RenderError::InvalidCanvas(format!(
                "width must be positive, got {}",
                canvas.width
            )));
        }

        let scale = viewport.width / canvas.width;
        let scaled_height = canvas.height * scale;
        let (offset_y, scrollable) = match viewport.height {
            Some(height) if scaled_height < height => ((height - scaled_height) / 2.0, false),
            Some(_) => (0.0, true),
            None => (0.0, false),
        };

        Ok(Self {
            scale,
            scaled_width: viewport.width,
            scaled_height,
            offset_y,
            scrollable,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
        })
    }

    /// Height of the outer container.
    #[must_use]
    pub fn container_height(&self) -> f32 {
        self.viewport_height.unwrap_or(self.scaled_height)
    }
}

/// Where one visible object goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route<'a> {
    /// Static primitive handled by the visual mapper.
    Static(&'a DesignObject),
    /// Interactive component with a supported kind.
    Interactive(&'a InteractiveObject),
    /// Nothing can render this object.
    Unhandled {
        /// Object id, when the kind is known well enough to have one.
        id: Option<&'a ObjectId>,
        /// Why it is skipped.
        reason: Unhandled,
    },
}

/// Reason an object renders nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Unhandled {
    /// Object kind not known to this renderer.
    UnknownObject,
    /// Interaction type not known to this renderer.
    UnsupportedInteraction,
    /// Interaction config could not be decoded.
    MalformedConfig,
    /// Supported component with no mounted instance.
    NotMounted,
    /// Interactive object whose id an earlier component already uses.
    DuplicateId,
}

/// Classify one object. Total over every object shape.
#[must_use]
pub fn route(object: &DesignObject) -> Route<'_> {
    match object {
        DesignObject::Interactive(component) => match &component.interaction {
            Interaction::Unsupported { .. } => Route::Unhandled {
                id: Some(&component.geometry.id),
                reason: Unhandled::UnsupportedInteraction,
            },
            Interaction::Malformed { .. } => Route::Unhandled {
                id: Some(&component.geometry.id),
                reason: Unhandled::MalformedConfig,
            },
            _ => Route::Interactive(component),
        },
        DesignObject::Unknown => Route::Unhandled {
            id: None,
            reason: Unhandled::UnknownObject,
        },
        _ => Route::Static(object),
    }
}

/// Visible objects of a document in paint order, routed.
#[must_use]
pub fn render_list(document: &Document) -> Vec<Route<'_>> {
    document.visible_objects().map(route).collect()
}

/// An object that produced no output, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    /// Object id, when known.
    pub id: Option<ObjectId>,
    /// Reason.
    pub reason: Unhandled,
}

/// Result of composing a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    /// Canvas placement.
    pub layout: Layout,
    /// Viewport container holding the scaled canvas.
    pub root: VisualNode,
    /// Ids of rendered objects in paint order.
    pub rendered: Vec<ObjectId>,
    /// Objects that rendered nothing.
    pub skipped: Vec<Skipped>,
}

impl Composition {
    /// Top-level object nodes in paint order.
    #[must_use]
    pub fn objects(&self) -> &[VisualNode] {
        self.root
            .children
            .first()
            .map(|canvas| canvas.children.as_slice())
            .unwrap_or_default()
    }

    /// Encode for a host bridge.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Composes documents through one presentation backend.
pub struct Compositor<'b> {
    backend: &'b dyn PresentationBackend,
}

impl<'b> Compositor<'b> {
    /// Create a compositor.
    #[must_use]
    pub fn new(backend: &'b dyn PresentationBackend) -> Self {
        Self { backend }
    }

    /// Compose a document into a scaled, paint-ordered visual tree.
    ///
    /// # Errors
    ///
    /// Returns an error only for an unusable viewport or canvas size.
    pub fn compose(
        &self,
        document: &Document,
        viewport: Viewport,
        instances: &InstanceTable,
    ) -> RenderResult<Composition> {
        let layout = Layout::fit(&document.canvas, viewport)?;
        let mut nodes = Vec::new();
        let mut rendered = Vec::new();
        let mut skipped = Vec::new();
        let mut components: HashSet<&ObjectId> = HashSet::new();

        for entry in render_list(document) {
            let outcome = match entry {
                Route::Interactive(component) if !components.insert(&component.geometry.id) => {
                    Err(Unhandled::DuplicateId)
                }
                Route::Static(object) => self
                    .backend
                    .style_static(object)
                    .ok_or(Unhandled::UnknownObject),
                Route::Interactive(component) => instances
                    .get(&component.geometry.id)
                    .map(|instance| self.backend.present(component, &instance.frame()))
                    .ok_or(Unhandled::NotMounted),
                Route::Unhandled { reason, .. } => Err(reason),
            };
            let id = match entry {
                Route::Static(object) => object.id(),
                Route::Interactive(component) => Some(&component.geometry.id),
                Route::Unhandled { id, .. } => id,
            };

            match outcome {
                Ok(node) => {
                    rendered.extend(id.cloned());
                    nodes.push(node);
                }
                Err(reason) => {
                    tracing::warn!(
                        "Skipping {} ({reason:?})",
                        id.map_or("object without id", ObjectId::as_str)
                    );
                    skipped.push(Skipped {
                        id: id.cloned(),
                        reason,
                    });
                }
            }
        }

        tracing::debug!(
            "Composed {} objects ({} skipped) at scale {:.3}",
            rendered.len(),
            skipped.len(),
            layout.scale
        );
        let root = self.backend.root(&document.canvas, &layout, nodes);
        Ok(Composition {
            layout,
            root,
            rendered,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dom::DomBackend;
    use design_core::{Geometry, ShapeObject};

    fn document() -> Document {
        Document::new(Canvas::new(400.0, 800.0))
    }

    #[test]
    fn test_short_canvas_is_centered() {
        let layout = Layout::fit(&Canvas::new(400.0, 400.0), Viewport::new(200.0, 600.0))
            .expect("fits");
        assert!((layout.scale - 0.5).abs() < f32::EPSILON);
        assert!((layout.scaled_height - 200.0).abs() < f32::EPSILON);
        assert!((layout.offset_y - 200.0).abs() < f32::EPSILON);
        assert!(!layout.scrollable);
    }

    #[test]
    fn test_tall_canvas_is_top_aligned_and_scrolls() {
        let layout =
            Layout::fit(&Canvas::new(400.0, 1600.0), Viewport::new(400.0, 800.0)).expect("fits");
        assert!(layout.offset_y.abs() < f32::EPSILON);
        assert!(layout.scrollable);
    }

    #[test]
    fn test_unbounded_viewport_is_top_aligned() {
        let layout =
            Layout::fit(&Canvas::new(400.0, 100.0), Viewport::width_only(800.0)).expect("fits");
        assert!(layout.offset_y.abs() < f32::EPSILON);
        assert!((layout.container_height() - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_widths_are_rejected() {
        assert!(matches!(
            Layout::fit(&Canvas::new(400.0, 100.0), Viewport::width_only(0.0)),
            Err(RenderError::InvalidViewport(_))
        ));
        assert!(matches!(
            Layout::fit(&Canvas::new(0.0, 100.0), Viewport::width_only(100.0)),
            Err(RenderError::InvalidCanvas(_))
        ));
    }

    #[test]
    fn test_unmounted_component_is_skipped_not_fatal() {
        let component = InteractiveObject::new(
            Geometry::new("card", 0.0, 0.0, 100.0, 100.0),
            Interaction::decode("flip-card", &serde_json::Value::Null),
        );
        let doc = document()
            .with_object(DesignObject::Interactive(component))
            .with_object(DesignObject::Rect(ShapeObject {
                geometry: Geometry::new("after", 0.0, 0.0, 10.0, 10.0),
                fill: None,
                stroke: None,
                stroke_width: 0.0,
                corner_radius: 0.0,
            }));

        let backend = DomBackend::default();
        let composition = Compositor::new(&backend)
            .compose(&doc, Viewport::new(400.0, 800.0), &InstanceTable::new())
            .expect("compose");
        assert_eq!(composition.rendered, vec![ObjectId::new("after")]);
        assert_eq!(composition.skipped[0].reason, Unhandled::NotMounted);
    }

    #[test]
    fn test_duplicate_component_id_is_skipped() {
        let card = |x: f32| {
            DesignObject::Interactive(InteractiveObject::new(
                Geometry::new("card", x, 0.0, 100.0, 100.0),
                Interaction::decode("flip-card", &serde_json::Value::Null),
            ))
        };
        let doc = document().with_object(card(0.0)).with_object(card(200.0));
        let mut instances = InstanceTable::new();
        instances.sync(&doc);

        let backend = DomBackend::default();
        let composition = Compositor::new(&backend)
            .compose(&doc, Viewport::new(400.0, 800.0), &instances)
            .expect("compose");
        assert_eq!(composition.rendered, vec![ObjectId::new("card")]);
        assert_eq!(composition.objects()[0].style.get_str("left"), Some("0px"));
        assert_eq!(
            composition.skipped,
            vec![Skipped {
                id: Some(ObjectId::new("card")),
                reason: Unhandled::DuplicateId
            }]
        );
    }

    #[test]
    fn test_route_names_every_unhandled_branch() {
        let unsupported = DesignObject::Interactive(InteractiveObject::new(
            Geometry::new("x", 0.0, 0.0, 1.0, 1.0),
            Interaction::decode("hologram", &serde_json::Value::Null),
        ));
        let malformed = DesignObject::Interactive(InteractiveObject::new(
            Geometry::new("y", 0.0, 0.0, 1.0, 1.0),
            Interaction::decode("tabs", &serde_json::json!({"defaultTab": "first"})),
        ));
        assert!(matches!(
            route(&unsupported),
            Route::Unhandled {
                reason: Unhandled::UnsupportedInteraction,
                ..
            }
        ));
        assert!(matches!(
            route(&malformed),
            Route::Unhandled {
                reason: Unhandled::MalformedConfig,
                ..
            }
        ));
        assert!(matches!(
            route(&DesignObject::Unknown),
            Route::Unhandled {
                id: None,
                reason: Unhandled::UnknownObject
            }
        ));
    }
}
