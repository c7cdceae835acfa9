//! Flip card: a two-sided card that flips on tap.

use crate::interaction::{millis, Easing, FlipAxis, FlipCardConfig, InteractionKind, Side};
use crate::{Fragment, Frame, Layer, Rect, StateMachine, Step, Transition, Trigger, Visual};

/// Flip card state machine.
pub struct FlipCard;

/// Which face is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipState {
    /// Face currently shown.
    pub side: Side,
}

fn rotated(axis: FlipAxis, degrees: f32) -> Visual {
    match axis {
        FlipAxis::Horizontal => Visual {
            rotate_y: degrees,
            ..Visual::IDENTITY
        },
        FlipAxis::Vertical => Visual {
            rotate_x: degrees,
            ..Visual::IDENTITY
        },
    }
}

impl StateMachine for FlipCard {
    const KIND: InteractionKind = InteractionKind::FlipCard;
    type Config = FlipCardConfig;
    type State = FlipState;

    fn init(config: &FlipCardConfig, _fragment: &Fragment<'_>) -> FlipState {
        FlipState {
            side: config.default_side,
        }
    }

    fn step(
        _config: &FlipCardConfig,
        _fragment: &Fragment<'_>,
        state: &FlipState,
        trigger: &Trigger,
    ) -> Step<FlipState> {
        match trigger {
            Trigger::Tap => Step::to(FlipState {
                side: state.side.flipped(),
            }),
            _ => Step::to(*state),
        }
    }

    fn frame(config: &FlipCardConfig, fragment: &Fragment<'_>, state: &FlipState) -> Frame {
        let bounds = Rect::sized(fragment.width(), fragment.height());
        let front_angle = match state.side {
            Side::Front => 0.0,
            Side::Back => 180.0,
        };
        let transition = Transition::new(millis(config.flip_duration), Easing::EaseInOut);

        let face = |name: &str, angle: f32| {
            let mut layer = Layer::new(name, bounds)
                .with_children(fragment.members(name))
                .with_visual(rotated(config.flip_axis, angle))
                .with_transition(transition);
            layer.backface_hidden = true;
            layer
        };

        Frame {
            width: bounds.width,
            height: bounds.height,
            action: Some(Trigger::Tap),
            layers: vec![face("back", front_angle - 180.0), face("front", front_angle)],
            ..Frame::default()
        }
    }
}
