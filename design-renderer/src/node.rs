//! Backend-neutral visual tree handed to the host surface.

use std::collections::BTreeMap;

use design_core::{ObjectId, Trigger};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a node draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Box that may hold children.
    View,
    /// Text run.
    Text,
    /// Image.
    Image,
}

/// Style properties keyed by backend-specific names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<String, Value>);

impl Style {
    /// Empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Builder form of [`Style::set`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Read a property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Read a string property.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Read a numeric property.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Whether a property is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether an animation retargets a property or plays once on appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// Animate from the presented value to `to`.
    Transition,
    /// Play from `from` to `to` once, when the node first appears.
    Enter,
}

/// Explicit animation request for the host's animation primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    /// Name, unique per distinct keyframe pair.
    pub name: String,
    /// Transition or enter.
    pub kind: AnimationKind,
    /// Start values; empty for transitions.
    pub from: Style,
    /// End values.
    pub to: Style,
    /// Length in milliseconds.
    pub duration_ms: u64,
    /// Start delay in milliseconds.
    pub delay_ms: u64,
    /// Backend-specific curve name.
    pub easing: String,
}

/// Tap target of a node: which trigger to dispatch to which component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Component to dispatch to.
    pub object: ObjectId,
    /// Trigger to dispatch.
    pub trigger: Trigger,
}

/// One node of a composed visual tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    /// Stable key, unique within the tree.
    pub key: String,
    /// What the node draws.
    pub kind: NodeKind,
    /// Style properties.
    pub style: Style,
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Image source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Tap action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// Animations to run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<Animation>,
    /// Child nodes, bottom to top.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    /// Create an empty node.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            key: key.into(),
            kind,
            style: Style::new(),
            content: None,
            source: None,
            action: None,
            animations: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Add a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search by key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Self> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }

    /// Every node in the subtree, depth first, this node included.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// Every tap action in the subtree, depth first.
    #[must_use]
    pub fn actions(&self) -> Vec<&Action> {
        self.descendants()
            .into_iter()
            .filter_map(|n| n.action.as_ref())
            .collect()
    }

    /// Encode as JSON for a DOM or native bridge.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::RenderResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
