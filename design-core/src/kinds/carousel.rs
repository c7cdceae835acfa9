//! Carousel: cross-fading slides with arrows, dots and optional autoplay.
//!
//! Navigation updates `active` immediately. The displayed slide (`shown`)
//! only swaps at the midpoint of the cross-fade, so the old slide fades out
//! and the new one fades in instead of popping.
//!
//! Slide indices are positions in the `slide-N` family ordered by `N`;
//! gaps in the numbering are closed so next/previous wrap over exactly the
//! slides present.

use crate::interaction::{millis, CarouselConfig, Easing, InteractionKind};
use crate::{
    Control, ControlKind, Effect, Fragment, Frame, Layer, Rect, StateMachine, Step, TimerKey,
    Transition, Trigger, Visual,
};

/// Role family prefix of slides (`slide-0`, `slide-1`, ...).
pub const SLIDE_FAMILY: &str = "slide";

const ARROW_SIZE: f32 = 32.0;
const DOT_SIZE: f32 = 8.0;
const DOT_SPACING: f32 = 16.0;

/// Carousel state machine.
pub struct Carousel;

/// Slide position and cross-fade progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselState {
    /// Logical current slide.
    pub active: usize,
    /// Slide whose content is on screen.
    pub shown: usize,
    /// The shown slide is fading out towards `active`.
    pub fading: bool,
}

impl Carousel {
    /// Number of slides.
    #[must_use]
    pub fn slide_count(fragment: &Fragment<'_>) -> usize {
        fragment.slots.family(SLIDE_FAMILY).len()
    }

    fn autoplay(config: &CarouselConfig, count: usize) -> Option<Effect> {
        (config.auto_play && count > 1).then(|| Effect::Schedule {
            key: TimerKey::AutoPlay,
            delay: millis(config.auto_play_interval),
            repeat: true,
        })
    }

    fn navigate(config: &CarouselConfig, state: &CarouselState, target: usize) -> Step<CarouselState> {
        if target == state.active {
            return Step::to(*state);
        }
        let half = millis(config.transition_duration / 2);
        if half.is_zero() {
            return Step::to(CarouselState {
                active: target,
                shown: target,
                fading: false,
            });
        }
        let next = CarouselState {
            active: target,
            fading: true,
            ..*state
        };
        if state.fading {
            // The pending midpoint swap will pick up the new target.
            Step::to(next)
        } else {
            Step::to(next).with_effect(Effect::Schedule {
                key: TimerKey::CrossfadeMidpoint,
                delay: half,
                repeat: false,
            })
        }
    }
}

impl StateMachine for Carousel {
    const KIND: InteractionKind = InteractionKind::Carousel;
    type Config = CarouselConfig;
    type State = CarouselState;

    fn init(_config: &CarouselConfig, _fragment: &Fragment<'_>) -> CarouselState {
        CarouselState::default()
    }

    fn on_mount(
        config: &CarouselConfig,
        fragment: &Fragment<'_>,
        state: &CarouselState,
    ) -> Step<CarouselState> {
        let step = Step::to(*state);
        match Self::autoplay(config, Self::slide_count(fragment)) {
            Some(effect) => step.with_effect(effect),
            None => step,
        }
    }

    fn step(
        config: &CarouselConfig,
        fragment: &Fragment<'_>,
        state: &CarouselState,
        trigger: &Trigger,
    ) -> Step<CarouselState> {
        let count = Self::slide_count(fragment);
        if count == 0 {
            return Step::to(*state);
        }
        match trigger {
            Trigger::Next | Trigger::Timer(TimerKey::AutoPlay) => {
                Self::navigate(config, state, (state.active + 1) % count)
            }
            Trigger::Previous => Self::navigate(config, state, (state.active + count - 1) % count),
            Trigger::GoTo(index) if *index < count => Self::navigate(config, state, *index),
            Trigger::Timer(TimerKey::CrossfadeMidpoint) => Step::to(CarouselState {
                shown: state.active,
                fading: false,
                ..*state
            }),
            _ => Step::to(*state),
        }
    }

    fn on_reconfigure(
        previous: &CarouselConfig,
        config: &CarouselConfig,
        fragment: &Fragment<'_>,
        state: &CarouselState,
    ) -> Step<CarouselState> {
        let step = Step::to(*state);
        if previous.auto_play == config.auto_play
            && previous.auto_play_interval == config.auto_play_interval
        {
            return step;
        }
        let step = step.with_effect(Effect::Cancel(TimerKey::AutoPlay));
        match Self::autoplay(config, Self::slide_count(fragment)) {
            Some(effect) => step.with_effect(effect),
            None => step,
        }
    }

    fn frame(config: &CarouselConfig, fragment: &Fragment<'_>, state: &CarouselState) -> Frame {
        let (width, height) = (fragment.width(), fragment.height());
        let slides = fragment.slots.family(SLIDE_FAMILY);
        let count = slides.len();
        if count == 0 {
            return Frame::empty(width, height);
        }

        let slide = Layer::new(SLIDE_FAMILY, Rect::sized(width, height))
            .with_children(slides.get(state.shown).map(|s| s.members.as_slice()).unwrap_or_default())
            .with_visual(Visual::with_opacity(if state.fading { 0.0 } else { 1.0 }))
            .with_transition(Transition::new(
                millis(config.transition_duration / 2),
                Easing::EaseInOut,
            ));

        let mut navigation = Layer::new("navigation", Rect::sized(width, height));
        navigation.passthrough = true;
        if count > 1 && config.show_arrows {
            let y = (height - ARROW_SIZE) / 2.0;
            navigation.controls.push(
                Control::new(ControlKind::PreviousArrow, Rect::new(8.0, y, ARROW_SIZE, ARROW_SIZE))
                    .with_label("‹")
                    .with_action(Trigger::Previous),
            );
            navigation.controls.push(
                Control::new(
                    ControlKind::NextArrow,
                    Rect::new(width - ARROW_SIZE - 8.0, y, ARROW_SIZE, ARROW_SIZE),
                )
                .with_label("›")
                .with_action(Trigger::Next),
            );
        }
        if count > 1 && config.show_dots {
            #[allow(clippy::cast_precision_loss)]
            let row = DOT_SPACING * (count - 1) as f32 + DOT_SIZE;
            let left = (width - row) / 2.0;
            for index in 0..count {
                #[allow(clippy::cast_precision_loss)]
                let x = left + DOT_SPACING * index as f32;
                navigation.controls.push(
                    Control::new(
                        ControlKind::Dot,
                        Rect::new(x, height - DOT_SIZE - 12.0, DOT_SIZE, DOT_SIZE),
                    )
                    .active(index == state.active)
                    .with_action(Trigger::GoTo(index)),
                );
            }
        }

        Frame {
            width,
            height,
            clip: true,
            layers: vec![slide, navigation],
            ..Frame::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::fixtures::component;
    use crate::{Interaction, InteractiveObject, ObjectId, Slots};
    use serde_json::json;

    fn carousel(config: serde_json::Value, slides: usize) -> InteractiveObject {
        let roles: Vec<String> = (0..slides).map(|i| format!("slide-{i}")).collect();
        let roles: Vec<&str> = roles.iter().map(String::as_str).collect();
        component("carousel", config, &roles)
    }

    fn config(object: &InteractiveObject) -> &CarouselConfig {
        match &object.interaction {
            Interaction::Carousel(c) => c,
            other => panic!("Expected carousel, got {other:?}"),
        }
    }

    #[test]
    fn test_forward_taps_wrap_modulo_count() {
        let object = carousel(json!({}), 3);
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let cfg = config(&object);

        let mut state = Carousel::init(cfg, &fragment);
        for taps in 1..=7 {
            state = Carousel::step(cfg, &fragment, &state, &Trigger::Next).state;
            assert_eq!(state.active, taps % 3);
        }
    }

    #[test]
    fn test_numbering_gaps_are_closed() {
        let object = component("carousel", json!({"transitionDuration": 0}), &["slide-0", "slide-2"]);
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let cfg = config(&object);
        assert_eq!(Carousel::slide_count(&fragment), 2);

        let state = Carousel::step(cfg, &fragment, &CarouselState::default(), &Trigger::GoTo(1)).state;
        let frame = Carousel::frame(cfg, &fragment, &state);
        let slide = frame.layer(SLIDE_FAMILY).expect("slide");
        assert_eq!(slide.children, vec![ObjectId::new("slide-2-child")]);
        let wrapped = Carousel::step(cfg, &fragment, &state, &Trigger::Next).state;
        assert_eq!(wrapped.active, 0);
    }

    #[test]
    fn test_previous_wraps_backwards() {
        let object = carousel(json!({}), 4);
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let cfg = config(&object);
        let state = Carousel::step(cfg, &fragment, &CarouselState::default(), &Trigger::Previous).state;
        assert_eq!(state.active, 3);
    }

    #[test]
    fn test_content_swaps_at_midpoint() {
        let object = carousel(json!({"transitionDuration": 400}), 2);
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let cfg = config(&object);

        let step = Carousel::step(cfg, &fragment, &CarouselState::default(), &Trigger::Next);
        assert_eq!(
            step.effects,
            vec![Effect::Schedule {
                key: TimerKey::CrossfadeMidpoint,
                delay: millis(200),
                repeat: false,
            }]
        );
        let fading = Carousel::frame(cfg, &fragment, &step.state);
        let slide = fading.layer(SLIDE_FAMILY).expect("slide");
        assert_eq!(slide.children, vec![ObjectId::new("slide-0-child")]);
        assert!(slide.visual.opacity.abs() < f32::EPSILON);

        let swapped = Carousel::step(
            cfg,
            &fragment,
            &step.state,
            &Trigger::Timer(TimerKey::CrossfadeMidpoint),
        )
        .state;
        let frame = Carousel::frame(cfg, &fragment, &swapped);
        let slide = frame.layer(SLIDE_FAMILY).expect("slide");
        assert_eq!(slide.children, vec![ObjectId::new("slide-1-child")]);
        assert!((slide.visual.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tap_during_fade_retargets_without_new_timer() {
        let object = carousel(json!({}), 3);
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let cfg = config(&object);

        let first = Carousel::step(cfg, &fragment, &CarouselState::default(), &Trigger::Next);
        let second = Carousel::step(cfg, &fragment, &first.state, &Trigger::Next);
        assert_eq!(second.state.active, 2);
        assert!(second.effects.is_empty());
        let swapped = Carousel::step(
            cfg,
            &fragment,
            &second.state,
            &Trigger::Timer(TimerKey::CrossfadeMidpoint),
        );
        assert_eq!(swapped.state.shown, 2);
    }

    #[test]
    fn test_autoplay_scheduled_on_mount_only_with_multiple_slides() {
        let object = carousel(json!({"autoPlay": true, "autoPlayInterval": 1500}), 2);
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let cfg = config(&object);
        let mounted = Carousel::on_mount(cfg, &fragment, &CarouselState::default());
        assert_eq!(
            mounted.effects,
            vec![Effect::Schedule {
                key: TimerKey::AutoPlay,
                delay: millis(1500),
                repeat: true,
            }]
        );

        let single = carousel(json!({"autoPlay": true}), 1);
        let slots = Slots::resolve(&single);
        let fragment = Fragment::new(&single, &slots);
        assert!(Carousel::on_mount(config(&single), &fragment, &CarouselState::default())
            .effects
            .is_empty());
    }

    #[test]
    fn test_interval_change_reschedules() {
        let object = carousel(json!({"autoPlay": true}), 2);
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let previous = config(&object).clone();
        let updated = CarouselConfig {
            auto_play_interval: 5000,
            ..previous.clone()
        };
        let step = Carousel::on_reconfigure(&previous, &updated, &fragment, &CarouselState::default());
        assert_eq!(step.effects[0], Effect::Cancel(TimerKey::AutoPlay));
        assert!(matches!(step.effects[1], Effect::Schedule { key: TimerKey::AutoPlay, .. }));
    }

    #[test]
    fn test_controls_hidden_for_single_slide_and_empty_carousel_is_inert() {
        let single = carousel(json!({}), 1);
        let slots = Slots::resolve(&single);
        let fragment = Fragment::new(&single, &slots);
        let frame = Carousel::frame(config(&single), &fragment, &CarouselState::default());
        assert_eq!(frame.controls().count(), 0);

        let empty = carousel(json!({}), 0);
        let slots = Slots::resolve(&empty);
        let fragment = Fragment::new(&empty, &slots);
        let step = Carousel::step(config(&empty), &fragment, &CarouselState::default(), &Trigger::Next);
        assert_eq!(step.state, CarouselState::default());
        assert!(Carousel::frame(config(&empty), &fragment, &step.state).layers.is_empty());
    }

    #[test]
    fn test_dots_mark_active_slide() {
        let object = carousel(json!({"showArrows": false}), 3);
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let state = CarouselState {
            active: 1,
            shown: 1,
            fading: false,
        };
        let frame = Carousel::frame(config(&object), &fragment, &state);
        let active: Vec<_> = frame.controls().map(|c| c.active).collect();
        assert_eq!(active, vec![false, true, false]);
    }
}
