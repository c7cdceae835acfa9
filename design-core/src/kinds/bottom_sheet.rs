//! Bottom sheet: a trigger that slides a sheet up over a dimmed backdrop.

use crate::interaction::{millis, BottomSheetConfig, Easing, InteractionKind};
use crate::{
    Control, ControlKind, Fragment, Frame, Layer, Rect, StateMachine, Step, Transition, Trigger,
    Visual,
};

/// Group role that opens the sheet.
pub const TRIGGER_ROLE: &str = "trigger";
/// Group role drawn inside the sheet.
pub const CONTENT_ROLE: &str = "content";

const CLOSE_SIZE: f32 = 32.0;
const HANDLE_WIDTH: f32 = 40.0;
const HANDLE_HEIGHT: f32 = 4.0;

/// Bottom sheet state machine.
pub struct BottomSheet;

/// Whether the sheet is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetState {
    /// Sheet open.
    pub open: bool,
}

impl BottomSheet {
    /// Sheet height for a component of the given height.
    #[must_use]
    pub fn sheet_height(config: &BottomSheetConfig, component_height: f32) -> f32 {
        component_height * config.sheet_height_percent / 100.0
    }
}

impl StateMachine for BottomSheet {
    const KIND: InteractionKind = InteractionKind::BottomSheet;
    type Config = BottomSheetConfig;
    type State = SheetState;

    fn init(_config: &BottomSheetConfig, _fragment: &Fragment<'_>) -> SheetState {
        SheetState::default()
    }

    fn step(
        config: &BottomSheetConfig,
        _fragment: &Fragment<'_>,
        state: &SheetState,
        trigger: &Trigger,
    ) -> Step<SheetState> {
        let open = match trigger {
            Trigger::TapGroup(role) if role == TRIGGER_ROLE => true,
            Trigger::TapBackdrop if config.dismiss_on_backdrop_tap => false,
            Trigger::Close => false,
            _ => state.open,
        };
        Step::to(SheetState { open })
    }

    fn frame(config: &BottomSheetConfig, fragment: &Fragment<'_>, state: &SheetState) -> Frame {
        let (width, height) = (fragment.width(), fragment.height());
        let sheet_height = Self::sheet_height(config, height);
        let slide = millis(config.slide_duration);

        let trigger = Layer::new(TRIGGER_ROLE, Rect::sized(width, height))
            .with_children(fragment.members(TRIGGER_ROLE))
            .with_action(Trigger::TapGroup(TRIGGER_ROLE.to_string()));

        let mut backdrop = Layer::new("backdrop", Rect::sized(width, height))
            .with_visual(Visual::with_opacity(if state.open {
                config.backdrop_opacity
            } else {
                0.0
            }))
            .with_transition(Transition::new(slide, Easing::Linear))
            .with_action(Trigger::TapBackdrop);
        backdrop.fill = Some("#000000".to_string());
        backdrop.passthrough = !state.open;

        let mut sheet = Layer::new(
            "sheet",
            Rect::new(0.0, height - sheet_height, width, sheet_height),
        )
        .with_children(fragment.members(CONTENT_ROLE))
        .with_visual(Visual {
            translate_y: if state.open { 0.0 } else { sheet_height },
            ..Visual::IDENTITY
        })
        .with_transition(Transition::new(slide, Easing::EaseOut))
        .with_control(
            Control::new(
                ControlKind::CloseButton,
                Rect::new(width - CLOSE_SIZE - 8.0, 8.0, CLOSE_SIZE, CLOSE_SIZE),
            )
            .with_label("×")
            .with_action(Trigger::Close),
        );
        if config.show_handle {
            sheet.controls.insert(
                0,
                Control::new(
                    ControlKind::Handle,
                    Rect::new((width - HANDLE_WIDTH) / 2.0, 8.0, HANDLE_WIDTH, HANDLE_HEIGHT),
                ),
            );
        }
        sheet.fill = Some(config.sheet_background.clone());
        sheet.corner_radius = config.corner_radius;
        sheet.clip = true;
        sheet.passthrough = !state.open;

        Frame {
            width,
            height,
            clip: true,
            layers: vec![trigger, backdrop, sheet],
            ..Frame::default()
        }
    }
}
