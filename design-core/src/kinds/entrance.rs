//! Entrance: children of the content group animate in once, staggered.

use std::time::Duration;

use crate::interaction::{millis, Easing, EntranceAnimation, EntranceConfig, InteractionKind};
use crate::{Enter, Fragment, Frame, Layer, Rect, StateMachine, Step, Transition, Trigger, Visual};

/// Group role whose children animate in.
pub const CONTENT_ROLE: &str = "content";

/// Entrance state machine.
pub struct Entrance;

/// Whether the entrance has played for this mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntranceState {
    /// Set on mount; never cleared while mounted.
    pub entered: bool,
}

impl Entrance {
    /// Visual values a child starts from.
    #[must_use]
    pub fn hidden(animation: EntranceAnimation) -> Visual {
        let hidden = Visual::with_opacity(0.0);
        match animation {
            EntranceAnimation::FadeIn => hidden,
            EntranceAnimation::SlideUp => Visual {
                translate_y: 50.0,
                ..hidden
            },
            EntranceAnimation::ScaleUp => Visual {
                scale: 0.8,
                ..hidden
            },
            EntranceAnimation::Bounce => Visual {
                translate_y: -50.0,
                scale: 0.9,
                ..hidden
            },
        }
    }

    /// Motion curve of an animation style.
    #[must_use]
    pub const fn easing(animation: EntranceAnimation) -> Easing {
        match animation {
            EntranceAnimation::FadeIn => Easing::Linear,
            EntranceAnimation::SlideUp => Easing::EaseOut,
            EntranceAnimation::ScaleUp => Easing::EaseInOut,
            EntranceAnimation::Bounce => Easing::Overshoot,
        }
    }

    /// Start delay of the child at `index`.
    #[must_use]
    pub fn delay(config: &EntranceConfig, index: usize) -> Duration {
        millis(config.stagger_delay.saturating_mul(index as u64))
    }
}

impl StateMachine for Entrance {
    const KIND: InteractionKind = InteractionKind::Entrance;
    type Config = EntranceConfig;
    type State = EntranceState;

    fn init(_config: &EntranceConfig, _fragment: &Fragment<'_>) -> EntranceState {
        EntranceState::default()
    }

    fn on_mount(
        _config: &EntranceConfig,
        _fragment: &Fragment<'_>,
        _state: &EntranceState,
    ) -> Step<EntranceState> {
        Step::to(EntranceState { entered: true })
    }

    fn step(
        _config: &EntranceConfig,
        _fragment: &Fragment<'_>,
        state: &EntranceState,
        _trigger: &Trigger,
    ) -> Step<EntranceState> {
        Step::to(*state)
    }

    fn frame(config: &EntranceConfig, fragment: &Fragment<'_>, state: &EntranceState) -> Frame {
        let bounds = Rect::sized(fragment.width(), fragment.height());
        let hidden = Self::hidden(config.animation);

        let layers = fragment
            .members(CONTENT_ROLE)
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let layer = Layer::new(CONTENT_ROLE, bounds).with_children(std::slice::from_ref(id));
                if state.entered {
                    let mut layer = layer.with_visual(Visual::IDENTITY);
                    layer.enter = Some(Enter {
                        from: hidden,
                        timing: Transition::new(
                            millis(config.duration),
                            Self::easing(config.animation),
                        )
                        .delayed(Self::delay(config, index)),
                    });
                    layer
                } else {
                    layer.with_visual(hidden)
                }
            })
            .collect();

        Frame {
            width: bounds.width,
            height: bounds.height,
            layers,
            ..Frame::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::fixtures::{component, rect};
    use crate::{Group, Interaction, Slots};
    use serde_json::json;

    #[test]
    fn test_hidden_until_mount_then_staggered() {
        let object = component("entrance", json!({"animation": "slide-up", "staggerDelay": 150}), &[])
            .with_child(rect("a", 0.0, 10.0))
            .with_child(rect("b", 20.0, 10.0))
            .with_child(rect("c", 40.0, 10.0))
            .with_group(Group::new(CONTENT_ROLE, &["a", "b", "c"]));
        let Interaction::Entrance(cfg) = &object.interaction else {
            panic!("Expected entrance");
        };
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);

        let before = Entrance::init(cfg, &fragment);
        let frame = Entrance::frame(cfg, &fragment, &before);
        assert!(frame.layers.iter().all(|l| l.visual.opacity == 0.0 && l.enter.is_none()));

        let mounted = Entrance::on_mount(cfg, &fragment, &before).state;
        let frame = Entrance::frame(cfg, &fragment, &mounted);
        let delays: Vec<_> = frame
            .layers
            .iter()
            .map(|l| l.enter.expect("enter").timing.delay.as_millis())
            .collect();
        assert_eq!(delays, vec![0, 150, 300]);
        assert!((frame.layers[0].enter.expect("enter").from.translate_y - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_not_retriggerable_while_mounted() {
        let object = component("entrance", json!({}), &["content"]);
        let Interaction::Entrance(cfg) = &object.interaction else {
            panic!("Expected entrance");
        };
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let mounted = Entrance::on_mount(cfg, &fragment, &Entrance::init(cfg, &fragment)).state;
        for trigger in [Trigger::Tap, Trigger::Next, Trigger::TryAgain] {
            assert_eq!(Entrance::step(cfg, &fragment, &mounted, &trigger).state, mounted);
        }
    }

    #[test]
    fn test_each_animation_has_distinct_curve() {
        let curves: std::collections::HashSet<_> = [
            EntranceAnimation::FadeIn,
            EntranceAnimation::SlideUp,
            EntranceAnimation::ScaleUp,
            EntranceAnimation::Bounce,
        ]
        .into_iter()
        .map(|a| format!("{:?}", Entrance::easing(a)))
        .collect();
        assert_eq!(curves.len(), 4);
        assert_eq!(Entrance::easing(EntranceAnimation::Bounce), Easing::Overshoot);
    }
}
