//! Group slot resolution for interactive components.
//!
//! A component's groups name the semantic slots its interaction kind fills
//! ("front", "trigger", "slide-0", ...). Resolution drops ids that are not
//! visible static children of the component and lets a child claim at most one
//! group per role family, so a bad group never faults: it yields an empty
//! or smaller slot.

use std::collections::{HashMap, HashSet};

use crate::{InteractiveObject, ObjectId};

/// One resolved slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Slot {
    /// Group role.
    pub role: String,
    /// Optional display label.
    pub label: Option<String>,
    /// Member child ids, in child paint order.
    pub members: Vec<ObjectId>,
}

/// All slots of one component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Slots {
    slots: Vec<Slot>,
}

/// Family a role belongs to: `slide-3` is in `slide`, `front` is its own.
#[must_use]
pub fn role_family(role: &str) -> &str {
    match role.rsplit_once('-') {
        Some((prefix, suffix)) if suffix.parse::<usize>().is_ok() => prefix,
        _ => role,
    }
}

fn family_index(role: &str, prefix: &str) -> Option<usize> {
    let (head, suffix) = role.rsplit_once('-')?;
    if head == prefix {
        suffix.parse().ok()
    } else {
        None
    }
}

impl Slots {
    /// Resolve the groups of a component against its children.
    #[must_use]
    pub fn resolve(component: &InteractiveObject) -> Self {
        let mut slots: Vec<Slot> = Vec::new();
        let mut claimed: HashMap<&str, HashSet<&ObjectId>> = HashMap::new();

        for group in &component.groups {
            let wanted: HashSet<&ObjectId> = group.object_ids.iter().collect();
            let taken = claimed.entry(role_family(&group.role)).or_default();

            let mut members = Vec::new();
            for child in component
                .children
                .iter()
                .filter(|c| c.is_static() && c.is_visible())
            {
                let Some(id) = child.id() else { continue };
                if wanted.contains(id) && taken.insert(id) {
                    members.push(id.clone());
                }
            }

            if members.len() < wanted.len() {
                tracing::debug!(
                    "Group '{}' of {} resolved {} of {} ids",
                    group.role,
                    component.geometry.id,
                    members.len(),
                    wanted.len()
                );
            }

            if let Some(slot) = slots.iter_mut().find(|s| s.role == group.role) {
                slot.members.extend(members);
                if slot.label.is_none() {
                    slot.label.clone_from(&group.label);
                }
            } else {
                slots.push(Slot {
                    role: group.role.clone(),
                    label: group.label.clone(),
                    members,
                });
            }
        }

        Self { slots }
    }

    /// Slot for a role, if present.
    #[must_use]
    pub fn get(&self, role: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.role == role)
    }

    /// Members of a role; empty when the role is absent.
    #[must_use]
    pub fn members(&self, role: &str) -> &[ObjectId] {
        self.get(role).map(|s| s.members.as_slice()).unwrap_or_default()
    }

    /// Slots of a repeatable family (`slide-N`, `tab-N`) with their `N`,
    /// ordered by `N`. Gaps in the numbering are kept.
    #[must_use]
    pub fn numbered(&self, prefix: &str) -> Vec<(usize, &Slot)> {
        let mut indexed: Vec<(usize, &Slot)> = self
            .slots
            .iter()
            .filter_map(|s| family_index(&s.role, prefix).map(|n| (n, s)))
            .collect();
        indexed.sort_by_key(|(n, _)| *n);
        indexed
    }

    /// Slots of a repeatable family ordered by `N`, numbering gaps closed.
    #[must_use]
    pub fn family(&self, prefix: &str) -> Vec<&Slot> {
        self.numbered(prefix).into_iter().map(|(_, s)| s).collect()
    }

    /// The slot numbered `n` in a family, if that group exists.
    #[must_use]
    pub fn nth(&self, prefix: &str, n: usize) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|s| family_index(&s.role, prefix) == Some(n))
    }

    /// Number of resolved slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the component has no groups at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DesignObject, Geometry, Group, Interaction, ShapeObject};

    fn child(id: &str) -> DesignObject {
        DesignObject::Rect(ShapeObject {
            geometry: Geometry::new(id, 0.0, 0.0, 10.0, 10.0),
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
        })
    }

    fn component() -> InteractiveObject {
        InteractiveObject::new(
            Geometry::new("c", 0.0, 0.0, 100.0, 100.0),
            Interaction::decode("carousel", &serde_json::Value::Null),
        )
        .with_child(child("a"))
        .with_child(child("b"))
        .with_child(child("c1"))
    }

    #[test]
    fn test_missing_ids_yield_smaller_slot() {
        let slots = Slots::resolve(&component().with_group(Group::new("front", &["a", "ghost"])));
        assert_eq!(slots.members("front"), &[ObjectId::new("a")]);
        assert!(slots.members("back").is_empty());
    }

    #[test]
    fn test_child_claims_one_group_per_family() {
        let slots = Slots::resolve(
            &component()
                .with_group(Group::new("slide-0", &["a", "b"]))
                .with_group(Group::new("slide-1", &["b", "c1"])),
        );
        assert_eq!(slots.members("slide-0").len(), 2);
        assert_eq!(slots.members("slide-1"), &[ObjectId::new("c1")]);
    }

    #[test]
    fn test_family_orders_by_numeric_suffix() {
        let slots = Slots::resolve(
            &component()
                .with_group(Group::new("tab-10", &["c1"]))
                .with_group(Group::new("tab-2", &["b"]).with_label("Second"))
                .with_group(Group::new("tab-x", &["a"])),
        );
        let family = slots.family("tab");
        let roles: Vec<_> = family.iter().map(|s| s.role.as_str()).collect();
        assert_eq!(roles, vec!["tab-2", "tab-10"]);
        assert_eq!(family[0].label.as_deref(), Some("Second"));
    }

    #[test]
    fn test_hidden_children_never_fill_a_slot() {
        let mut hidden = child("b");
        if let DesignObject::Rect(shape) = &mut hidden {
            shape.geometry.visible = false;
        }
        let object = InteractiveObject::new(
            Geometry::new("c", 0.0, 0.0, 100.0, 100.0),
            Interaction::decode("flip-card", &serde_json::Value::Null),
        )
        .with_child(child("a"))
        .with_child(hidden)
        .with_group(Group::new("front", &["a", "b"]));
        assert_eq!(Slots::resolve(&object).members("front"), &[ObjectId::new("a")]);
    }

    #[test]
    fn test_numbered_family_keeps_gaps() {
        let slots = Slots::resolve(
            &component()
                .with_group(Group::new("tab-0", &["a"]))
                .with_group(Group::new("tab-2", &["c1"])),
        );
        let numbers: Vec<usize> = slots.numbered("tab").iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![0, 2]);
        assert_eq!(slots.nth("tab", 2).map(|s| s.members.as_slice()), Some(&[ObjectId::new("c1")][..]));
        assert!(slots.nth("tab", 1).is_none());
    }

    #[test]
    fn test_role_family() {
        assert_eq!(role_family("slide-3"), "slide");
        assert_eq!(role_family("feedback-correct"), "feedback-correct");
        assert_eq!(role_family("front"), "front");
    }
}
