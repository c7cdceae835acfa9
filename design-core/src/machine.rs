//! Shared state-machine abstraction for interaction kinds.
//!
//! Every kind is a set of pure functions over
//! `(config, fragment, state, trigger) -> (state, effects)` plus a
//! `(config, fragment, state) -> Frame` view. Nothing here touches a clock
//! or a rendering surface; timers are requested through [`Effect`]s and
//! delivered back as [`Trigger::Timer`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::interaction::InteractionKind;
use crate::{Frame, InteractiveObject, ObjectId, Slots};

/// Named timer owned by a component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerKey {
    /// Carousel autoplay tick.
    AutoPlay,
    /// Carousel cross-fade content swap.
    CrossfadeMidpoint,
}

/// Logical input to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger", content = "value", rename_all = "kebab-case")]
pub enum Trigger {
    /// Tap anywhere on the component.
    Tap,
    /// Tap on the children of a group role.
    TapGroup(String),
    /// Tap on a backdrop.
    TapBackdrop,
    /// Explicit close affordance.
    Close,
    /// Previous item.
    Previous,
    /// Next item.
    Next,
    /// Jump to an item.
    GoTo(usize),
    /// Select a tab.
    SelectTab(usize),
    /// Select an answer option.
    SelectOption(usize),
    /// Confirm the pending answer.
    Confirm,
    /// Reset to the question.
    TryAgain,
    /// A scheduled timer fired.
    Timer(TimerKey),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Start (or restart) a timer. Scheduling an existing key replaces it.
    Schedule {
        /// Timer name.
        key: TimerKey,
        /// Delay before the first firing.
        delay: Duration,
        /// Keep firing every `delay`.
        repeat: bool,
    },
    /// Cancel a timer if it is pending.
    Cancel(TimerKey),
}

/// Result of applying a trigger: the next state and requested effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    /// Next state.
    pub state: S,
    /// Effects for the host.
    pub effects: Vec<Effect>,
}

impl<S> Step<S> {
    /// Move to a state with no effects.
    #[must_use]
    pub fn to(state: S) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    /// Add an effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// The part of a document one component instance may see.
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
    /// The component object.
    pub object: &'a InteractiveObject,
    /// Its resolved group slots.
    pub slots: &'a Slots,
}

impl<'a> Fragment<'a> {
    /// Create a fragment.
    #[must_use]
    pub const fn new(object: &'a InteractiveObject, slots: &'a Slots) -> Self {
        Self { object, slots }
    }

    /// Component width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.object.geometry.width
    }

    /// Component height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.object.geometry.height
    }

    /// Members of a role.
    #[must_use]
    pub fn members(&self, role: &str) -> &'a [ObjectId] {
        self.slots.members(role)
    }

    /// Lowest child edge (`max(y + height)`) across a role's members.
    ///
    /// Children are absolutely positioned, so this stands in for the
    /// intrinsic height of the slot.
    #[must_use]
    pub fn extent(&self, role: &str) -> f32 {
        self.members(role)
            .iter()
            .filter_map(|id| self.object.child(id))
            .filter_map(|child| child.geometry())
            .map(crate::Geometry::bottom)
            .fold(0.0, f32::max)
    }
}

/// One interaction kind as a pure state machine.
pub trait StateMachine {
    /// Kind implemented.
    const KIND: InteractionKind;

    /// Typed configuration.
    type Config;

    /// Transient runtime state.
    type State: Clone + PartialEq + std::fmt::Debug;

    /// State of a freshly created instance.
    fn init(config: &Self::Config, fragment: &Fragment<'_>) -> Self::State;

    /// Called once when the instance mounts.
    fn on_mount(
        _config: &Self::Config,
        _fragment: &Fragment<'_>,
        state: &Self::State,
    ) -> Step<Self::State> {
        Step::to(state.clone())
    }

    /// Apply a trigger. Triggers a kind does not use leave the state unchanged.
    fn step(
        config: &Self::Config,
        fragment: &Fragment<'_>,
        state: &Self::State,
        trigger: &Trigger,
    ) -> Step<Self::State>;

    /// Called when the configuration changes while the instance is mounted.
    fn on_reconfigure(
        _previous: &Self::Config,
        _config: &Self::Config,
        _fragment: &Fragment<'_>,
        state: &Self::State,
    ) -> Step<Self::State> {
        Step::to(state.clone())
    }

    /// Logical view of a state.
    fn frame(config: &Self::Config, fragment: &Fragment<'_>, state: &Self::State) -> Frame;
}
