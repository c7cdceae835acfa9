//! Expandable: a header that toggles a body open and closed.

use crate::interaction::{millis, ExpandableConfig, InteractionKind};
use crate::{
    Control, ControlKind, Fragment, Frame, Layer, Rect, StateMachine, Step, Transition, Trigger,
    Visual,
};

/// Group role that toggles the body.
pub const HEADER_ROLE: &str = "header";
/// Group role revealed when expanded.
pub const BODY_ROLE: &str = "body";

const CHEVRON_SIZE: f32 = 24.0;

/// Expandable state machine.
pub struct Expandable;

/// Whether the body is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandState {
    /// Body expanded.
    pub expanded: bool,
}

impl Expandable {
    /// Natural height of the body.
    ///
    /// Body children are positioned relative to the body region, so the
    /// lowest child edge is the body height.
    #[must_use]
    pub fn body_height(fragment: &Fragment<'_>) -> f32 {
        fragment.extent(BODY_ROLE)
    }

    /// Height of the header region.
    #[must_use]
    pub fn header_height(fragment: &Fragment<'_>) -> f32 {
        fragment.extent(HEADER_ROLE)
    }
}

impl StateMachine for Expandable {
    const KIND: InteractionKind = InteractionKind::Expandable;
    type Config = ExpandableConfig;
    type State = ExpandState;

    fn init(config: &ExpandableConfig, _fragment: &Fragment<'_>) -> ExpandState {
        ExpandState {
            expanded: config.default_expanded,
        }
    }

    fn step(
        _config: &ExpandableConfig,
        _fragment: &Fragment<'_>,
        state: &ExpandState,
        trigger: &Trigger,
    ) -> Step<ExpandState> {
        match trigger {
            Trigger::TapGroup(role) if role == HEADER_ROLE => Step::to(ExpandState {
                expanded: !state.expanded,
            }),
            _ => Step::to(*state),
        }
    }

    fn frame(config: &ExpandableConfig, fragment: &Fragment<'_>, state: &ExpandState) -> Frame {
        let width = fragment.width();
        let header_height = Self::header_height(fragment);
        let body_height = if state.expanded {
            Self::body_height(fragment)
        } else {
            0.0
        };
        let transition = Transition::new(millis(config.expand_duration), config.easing);

        let mut header = Layer::new(HEADER_ROLE, Rect::sized(width, header_height))
            .with_children(fragment.members(HEADER_ROLE))
            .with_action(Trigger::TapGroup(HEADER_ROLE.to_string()));
        if config.show_chevron {
            let mut chevron = Control::new(
                ControlKind::Chevron,
                Rect::new(
                    width - CHEVRON_SIZE - 12.0,
                    ((header_height - CHEVRON_SIZE) / 2.0).max(0.0),
                    CHEVRON_SIZE,
                    CHEVRON_SIZE,
                ),
            )
            .with_label("⌄")
            .active(state.expanded);
            chevron.visual = Visual {
                rotate: if state.expanded { 180.0 } else { 0.0 },
                ..Visual::IDENTITY
            };
            chevron.transition = Some(transition);
            header.controls.push(chevron);
        }

        let mut body = Layer::new(BODY_ROLE, Rect::new(0.0, header_height, width, body_height))
            .with_children(fragment.members(BODY_ROLE))
            .with_transition(transition);
        body.clip = true;

        Frame {
            width,
            height: header_height + body_height,
            transition: Some(transition),
            layers: vec![header, body],
            ..Frame::default()
        }
    }
}
