//! Mounted component instances and their lifecycle.
//!
//! Runtime state lives here, never in the document. An instance is created
//! when its object becomes visible and dropped when it leaves; remounting
//! always starts from the kind's initial state with a fresh [`InstanceId`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interaction::{Interaction, InteractionKind};
use crate::kinds::{
    BottomSheet, Carousel, CarouselState, Entrance, EntranceState, ExpandState, Expandable,
    FlipCard, FlipState, Quiz, QuizState, SheetState, Tabs, TabsState,
};
use crate::{
    DesignObject, Document, Effect, Fragment, Frame, InteractiveObject, ObjectId, Slots,
    StateMachine, Step, Trigger,
};

/// Identity of one mount of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Create a new unique instance ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind-specific runtime state.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentState {
    /// Flip card.
    FlipCard(FlipState),
    /// Bottom sheet.
    BottomSheet(SheetState),
    /// Expandable.
    Expandable(ExpandState),
    /// Entrance.
    Entrance(EntranceState),
    /// Carousel.
    Carousel(CarouselState),
    /// Tabs.
    Tabs(TabsState),
    /// Quiz.
    Quiz(QuizState),
}

fn apply<M: StateMachine>(
    object_id: &ObjectId,
    state: &mut M::State,
    step: Step<M::State>,
) -> Vec<Effect> {
    if step.state != *state {
        tracing::debug!(
            "{} {object_id}: {:?} -> {:?}",
            M::KIND,
            state,
            step.state
        );
    }
    *state = step.state;
    step.effects
}

fn start<M: StateMachine>(
    config: &M::Config,
    fragment: &Fragment<'_>,
    wrap: fn(M::State) -> ComponentState,
) -> (ComponentState, Vec<Effect>) {
    let initial = M::init(config, fragment);
    let step = M::on_mount(config, fragment, &initial);
    (wrap(step.state), step.effects)
}

/// Run `$body` with the typed machine, config and state of an instance.
macro_rules! with_machine {
    ($state:expr, $interaction:expr, |$m:ident, $config:ident, $s:ident| $body:expr, $fallback:expr) => {
        match ($state, $interaction) {
            (ComponentState::FlipCard($s), Interaction::FlipCard($config)) => {
                type $m = FlipCard;
                $body
            }
            (ComponentState::BottomSheet($s), Interaction::BottomSheet($config)) => {
                type $m = BottomSheet;
                $body
            }
            (ComponentState::Expandable($s), Interaction::Expandable($config)) => {
                type $m = Expandable;
                $body
            }
            (ComponentState::Entrance($s), Interaction::Entrance($config)) => {
                type $m = Entrance;
                $body
            }
            (ComponentState::Carousel($s), Interaction::Carousel($config)) => {
                type $m = Carousel;
                $body
            }
            (ComponentState::Tabs($s), Interaction::Tabs($config)) => {
                type $m = Tabs;
                $body
            }
            (ComponentState::Quiz($s), Interaction::Quiz($config)) => {
                type $m = Quiz;
                $body
            }
            _ => $fallback,
        }
    };
}

/// One mounted interactive component.
#[derive(Debug, Clone)]
pub struct ComponentInstance {
    id: InstanceId,
    object: InteractiveObject,
    slots: Slots,
    state: ComponentState,
}

impl ComponentInstance {
    /// Mount a component. Returns `None` for unsupported or malformed kinds,
    /// which render nothing.
    #[must_use]
    pub fn mount(object: &InteractiveObject) -> Option<(Self, Vec<Effect>)> {
        let slots = Slots::resolve(object);
        let fragment = Fragment::new(object, &slots);

        let (state, effects) = match &object.interaction {
            Interaction::FlipCard(c) => start::<FlipCard>(c, &fragment, ComponentState::FlipCard),
            Interaction::BottomSheet(c) => {
                start::<BottomSheet>(c, &fragment, ComponentState::BottomSheet)
            }
            Interaction::Expandable(c) => {
                start::<Expandable>(c, &fragment, ComponentState::Expandable)
            }
            Interaction::Entrance(c) => start::<Entrance>(c, &fragment, ComponentState::Entrance),
            Interaction::Carousel(c) => start::<Carousel>(c, &fragment, ComponentState::Carousel),
            Interaction::Tabs(c) => start::<Tabs>(c, &fragment, ComponentState::Tabs),
            Interaction::Quiz(c) => start::<Quiz>(c, &fragment, ComponentState::Quiz),
            Interaction::Unsupported { .. } | Interaction::Malformed { .. } => return None,
        };

        let instance = Self {
            id: InstanceId::new(),
            object: object.clone(),
            slots,
            state,
        };
        tracing::info!(
            "Mounted {} {} as {}",
            object.interaction.tag(),
            object.geometry.id,
            instance.id
        );
        Some((instance, effects))
    }

    /// Instance identity.
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// Object id this instance renders.
    #[must_use]
    pub fn object_id(&self) -> &ObjectId {
        &self.object.geometry.id
    }

    /// Snapshot of the component this instance was mounted (or last
    /// reconfigured) with.
    #[must_use]
    pub const fn object(&self) -> &InteractiveObject {
        &self.object
    }

    /// Interaction kind.
    #[must_use]
    pub fn kind(&self) -> Option<InteractionKind> {
        self.object.interaction.kind()
    }

    /// Current runtime state.
    #[must_use]
    pub const fn state(&self) -> &ComponentState {
        &self.state
    }

    /// Apply a trigger and return the effects the host must perform.
    pub fn dispatch(&mut self, trigger: &Trigger) -> Vec<Effect> {
        let fragment = Fragment::new(&self.object, &self.slots);
        let object_id = &self.object.geometry.id;
        with_machine!(
            &mut self.state,
            &self.object.interaction,
            |M, config, state| {
                let step = M::step(config, &fragment, state, trigger);
                apply::<M>(object_id, state, step)
            },
            Vec::new()
        )
    }

    /// Whether `object` can replace this instance's snapshot without a
    /// remount: same kind, same children and groups.
    #[must_use]
    pub fn accepts(&self, object: &InteractiveObject) -> bool {
        self.object.interaction.kind() == object.interaction.kind()
            && self.object.children == object.children
            && self.object.groups == object.groups
    }

    /// Swap in an updated object (geometry/config only) and let the kind
    /// react to the configuration change.
    pub fn reconfigure(&mut self, object: &InteractiveObject) -> Vec<Effect> {
        let previous = std::mem::replace(&mut self.object, object.clone());
        let fragment = Fragment::new(&self.object, &self.slots);
        let object_id = &self.object.geometry.id;
        let effects = match (&mut self.state, &previous.interaction, &self.object.interaction) {
            (ComponentState::Carousel(state), Interaction::Carousel(old), Interaction::Carousel(new)) => {
                let step = Carousel::on_reconfigure(old, new, &fragment, state);
                apply::<Carousel>(object_id, state, step)
            }
            _ => Vec::new(),
        };
        tracing::debug!("Reconfigured {}", self.object.geometry.id);
        effects
    }

    /// Logical view of the current state.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let fragment = Fragment::new(&self.object, &self.slots);
        let geometry = &self.object.geometry;
        with_machine!(
            &self.state,
            &self.object.interaction,
            |M, config, state| M::frame(config, &fragment, state),
            Frame::empty(geometry.width, geometry.height)
        )
    }
}

/// Lifecycle change reported by [`InstanceTable::sync`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle {
    /// A new instance was created.
    Mounted {
        /// Object id.
        object_id: ObjectId,
        /// New instance.
        instance: InstanceId,
        /// Effects requested on mount.
        effects: Vec<Effect>,
    },
    /// An instance was discarded; all of its timers must be cancelled.
    Unmounted {
        /// Object id.
        object_id: ObjectId,
        /// Discarded instance.
        instance: InstanceId,
    },
    /// An instance kept its state but received a new configuration.
    Reconfigured {
        /// Object id.
        object_id: ObjectId,
        /// Instance kept.
        instance: InstanceId,
        /// Effects requested by the change.
        effects: Vec<Effect>,
    },
}

/// All instances currently on screen, at most one per object id.
#[derive(Debug, Clone, Default)]
pub struct InstanceTable {
    instances: HashMap<ObjectId, ComponentInstance>,
}

impl InstanceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the table in line with the visible interactive objects of a
    /// document. Unmounts are reported before mounts.
    pub fn sync(&mut self, document: &Document) -> Vec<Lifecycle> {
        let mut seen: HashSet<&ObjectId> = HashSet::new();
        let mut wanted: Vec<&InteractiveObject> = Vec::new();
        for object in document.visible_objects() {
            let DesignObject::Interactive(component) = object else {
                continue;
            };
            if component.interaction.kind().is_none() {
                continue;
            }
            if seen.insert(&component.geometry.id) {
                wanted.push(component);
            } else {
                tracing::warn!("Duplicate object id {}; ignoring", component.geometry.id);
            }
        }

        let mut changes = Vec::new();
        let stale: Vec<ObjectId> = self
            .instances
            .iter()
            .filter(|(id, instance)| {
                !wanted
                    .iter()
                    .any(|c| &c.geometry.id == *id && instance.accepts(c))
            })
            .map(|(id, _)| id.clone())
            .collect();
        for object_id in stale {
            if let Some(instance) = self.instances.remove(&object_id) {
                tracing::info!("Unmounted {object_id} ({})", instance.id);
                changes.push(Lifecycle::Unmounted {
                    object_id,
                    instance: instance.id,
                });
            }
        }

        for component in wanted {
            let object_id = &component.geometry.id;
            if let Some(instance) = self.instances.get_mut(object_id) {
                if instance.object != *component {
                    let effects = instance.reconfigure(component);
                    changes.push(Lifecycle::Reconfigured {
                        object_id: object_id.clone(),
                        instance: instance.id,
                        effects,
                    });
                }
            } else if let Some((instance, effects)) = ComponentInstance::mount(component) {
                changes.push(Lifecycle::Mounted {
                    object_id: object_id.clone(),
                    instance: instance.id,
                    effects,
                });
                self.instances.insert(object_id.clone(), instance);
            }
        }
        changes
    }

    /// Dispatch a trigger to the instance for `object_id`.
    ///
    /// Returns `None` when nothing is mounted for that id.
    pub fn dispatch(
        &mut self,
        object_id: &ObjectId,
        trigger: &Trigger,
    ) -> Option<(InstanceId, Vec<Effect>)> {
        let instance = self.instances.get_mut(object_id)?;
        let effects = instance.dispatch(trigger);
        Some((instance.id, effects))
    }

    /// Dispatch a trigger only if `object_id` is still mounted as `instance`.
    /// Timer firings use this so a stale timer never reaches a new mount.
    pub fn dispatch_to(
        &mut self,
        object_id: &ObjectId,
        instance: InstanceId,
        trigger: &Trigger,
    ) -> Option<Vec<Effect>> {
        let current = self.instances.get_mut(object_id)?;
        if current.id != instance {
            tracing::debug!("Dropping {trigger:?} for stale instance {instance}");
            return None;
        }
        Some(current.dispatch(trigger))
    }

    /// Instance for an object id.
    #[must_use]
    pub fn get(&self, object_id: &ObjectId) -> Option<&ComponentInstance> {
        self.instances.get(object_id)
    }

    /// Unmount everything.
    pub fn clear(&mut self) -> Vec<Lifecycle> {
        self.instances
            .drain()
            .map(|(object_id, instance)| Lifecycle::Unmounted {
                object_id,
                instance: instance.id,
            })
            .collect()
    }

    /// Number of mounted instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether nothing is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::fixtures::component;
    use crate::{Canvas, TimerKey};
    use serde_json::json;

    fn document(objects: Vec<InteractiveObject>) -> Document {
        objects
            .into_iter()
            .fold(Document::new(Canvas::new(400.0, 800.0)), |doc, o| {
                doc.with_object(DesignObject::Interactive(o))
            })
    }

    #[test]
    fn test_sync_mounts_visible_supported_components() {
        let mut hidden = component("tabs", json!({}), &["tab-0"]);
        hidden.geometry.visible = false;
        let doc = document(vec![
            component("flip-card", json!({}), &["front", "back"]),
            component("hologram", json!({}), &[]),
            hidden,
        ]);

        let mut table = InstanceTable::new();
        let changes = table.sync(&doc);
        assert_eq!(changes.len(), 1);
        assert_eq!(table.len(), 1);
        assert!(table.get(&ObjectId::new("flip-card-1")).is_some());
    }

    #[test]
    fn test_dispatch_updates_state_and_resync_keeps_it() {
        let doc = document(vec![component("flip-card", json!({}), &["front", "back"])]);
        let id = ObjectId::new("flip-card-1");
        let mut table = InstanceTable::new();
        table.sync(&doc);

        table.dispatch(&id, &Trigger::Tap).expect("mounted");
        assert!(table.sync(&doc).is_empty());
        assert_eq!(
            table.get(&id).expect("mounted").state(),
            &ComponentState::FlipCard(FlipState {
                side: crate::Side::Back
            })
        );
    }

    #[test]
    fn test_remount_resets_state_with_new_identity() {
        let card = component("flip-card", json!({}), &["front", "back"]);
        let id = ObjectId::new("flip-card-1");
        let mut table = InstanceTable::new();
        table.sync(&document(vec![card.clone()]));
        let (first, _) = table.dispatch(&id, &Trigger::Tap).expect("mounted");

        let removed = table.sync(&document(vec![]));
        assert_eq!(
            removed,
            vec![Lifecycle::Unmounted {
                object_id: id.clone(),
                instance: first
            }]
        );

        table.sync(&document(vec![card]));
        let instance = table.get(&id).expect("remounted");
        assert_ne!(instance.id(), first);
        assert_eq!(
            instance.state(),
            &ComponentState::FlipCard(FlipState {
                side: crate::Side::Front
            })
        );
    }

    #[test]
    fn test_config_change_reconfigures_in_place() {
        let carousel = component("carousel", json!({"autoPlay": true}), &["slide-0", "slide-1"]);
        let id = ObjectId::new("carousel-1");
        let mut table = InstanceTable::new();
        let mounted = table.sync(&document(vec![carousel.clone()]));
        assert!(matches!(&mounted[0], Lifecycle::Mounted { effects, .. } if effects.len() == 1));
        table.dispatch(&id, &Trigger::Next);

        let slower = InteractiveObject {
            interaction: Interaction::decode(
                "carousel",
                &json!({"autoPlay": true, "autoPlayInterval": 9000}),
            ),
            ..carousel
        };
        let changes = table.sync(&document(vec![slower]));
        let [Lifecycle::Reconfigured { effects, .. }] = changes.as_slice() else {
            panic!("Expected a single reconfigure, got {changes:?}");
        };
        assert_eq!(effects[0], Effect::Cancel(TimerKey::AutoPlay));
        let ComponentState::Carousel(state) = table.get(&id).expect("mounted").state() else {
            panic!("Expected carousel state");
        };
        assert_eq!(state.active, 1);
    }

    #[test]
    fn test_stale_timer_is_dropped() {
        let carousel = component("carousel", json!({}), &["slide-0", "slide-1"]);
        let id = ObjectId::new("carousel-1");
        let mut table = InstanceTable::new();
        table.sync(&document(vec![carousel]));
        let stale = InstanceId::new();
        assert!(table
            .dispatch_to(&id, stale, &Trigger::Timer(TimerKey::AutoPlay))
            .is_none());
        let current = table.get(&id).expect("mounted").id();
        assert!(table
            .dispatch_to(&id, current, &Trigger::Timer(TimerKey::AutoPlay))
            .is_some());
    }

    #[test]
    fn test_unmounted_id_dispatch_is_none() {
        let mut table = InstanceTable::new();
        assert!(table.dispatch(&ObjectId::new("nope"), &Trigger::Tap).is_none());
        assert!(table.clear().is_empty());
    }
}
