//! Quiz: single-choice question with optional feedback.

use crate::interaction::{InteractionKind, QuizConfig};
use crate::{Accent, Control, ControlKind, Fragment, Frame, Layer, Rect, StateMachine, Step, Trigger};

/// Group role shown while answering.
pub const QUESTION_ROLE: &str = "question";
/// Group role shown with any feedback.
pub const FEEDBACK_ROLE: &str = "feedback";
/// Group role shown only with correct feedback.
pub const FEEDBACK_CORRECT_ROLE: &str = "feedback-correct";
/// Group role shown only with incorrect feedback.
pub const FEEDBACK_INCORRECT_ROLE: &str = "feedback-incorrect";

const PADDING: f32 = 16.0;
const ROW_HEIGHT: f32 = 44.0;
const ROW_GAP: f32 = 8.0;
const PROMPT_HEIGHT: f32 = 40.0;

/// Quiz state machine.
pub struct Quiz;

/// Where the quiz is in its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// Answering, with an optional pending choice.
    Question {
        /// Pending option.
        selected: Option<usize>,
    },
    /// Answer locked in without feedback (feedback disabled).
    Answered {
        /// Chosen option.
        selected: usize,
    },
    /// Showing feedback for a confirmed answer.
    Feedback {
        /// Confirmed option.
        selected: usize,
    },
}

impl QuizState {
    /// Initial state: question with nothing selected.
    pub const START: Self = Self::Question { selected: None };

    /// The chosen option in any state.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        match *self {
            Self::Question { selected } => selected,
            Self::Answered { selected } | Self::Feedback { selected } => Some(selected),
        }
    }

    /// Whether the chosen option is correct.
    #[must_use]
    pub fn is_correct(&self, config: &QuizConfig) -> bool {
        self.selected() == Some(config.correct_index)
    }
}

impl Quiz {
    fn row(y: f32, width: f32) -> Rect {
        Rect::new(PADDING, y, (width - 2.0 * PADDING).max(0.0), ROW_HEIGHT)
    }

    fn question_layer(config: &QuizConfig, fragment: &Fragment<'_>, state: &QuizState) -> Layer {
        let (width, height) = (fragment.width(), fragment.height());
        let mut layer = Layer::new(QUESTION_ROLE, Rect::sized(width, height))
            .with_children(fragment.members(QUESTION_ROLE));

        let mut y = fragment.extent(QUESTION_ROLE);
        if !config.question.is_empty() {
            layer.controls.push(
                Control::new(
                    ControlKind::Prompt,
                    Rect::new(PADDING, y + PADDING, width - 2.0 * PADDING, PROMPT_HEIGHT),
                )
                .with_label(config.question.clone()),
            );
            y += PADDING + PROMPT_HEIGHT;
        }
        y += PADDING;

        let locked = matches!(state, QuizState::Answered { .. });
        for (index, option) in config.options.iter().enumerate() {
            let chosen = state.selected() == Some(index);
            let mut control = Control::new(ControlKind::AnswerOption, Self::row(y, width))
                .with_label(option.clone())
                .active(chosen);
            if !locked {
                control = control.with_action(Trigger::SelectOption(index));
            }
            layer.controls.push(control);
            y += ROW_HEIGHT + ROW_GAP;
        }

        if config.show_feedback {
            let pending = state.selected().is_some();
            let mut confirm = Control::new(ControlKind::Confirm, Self::row(y + ROW_GAP, width))
                .with_label("Check answer")
                .active(pending);
            if pending {
                confirm = confirm.with_action(Trigger::Confirm);
            }
            layer.controls.push(confirm);
        }
        layer
    }

    fn feedback_layer(config: &QuizConfig, fragment: &Fragment<'_>, state: &QuizState) -> Layer {
        let (width, height) = (fragment.width(), fragment.height());
        let correct = state.is_correct(config);
        let outcome_role = if correct {
            FEEDBACK_CORRECT_ROLE
        } else {
            FEEDBACK_INCORRECT_ROLE
        };

        let mut children = fragment.members(FEEDBACK_ROLE).to_vec();
        children.extend_from_slice(fragment.members(outcome_role));

        let top = fragment.extent(FEEDBACK_ROLE).max(fragment.extent(outcome_role)) + PADDING;
        let (message, accent) = if correct {
            (config.correct_feedback.clone(), Accent::Correct)
        } else {
            (config.incorrect_feedback.clone(), Accent::Incorrect)
        };

        let mut layer = Layer::new(FEEDBACK_ROLE, Rect::sized(width, height))
            .with_control(
                Control::new(ControlKind::Message, Self::row(top, width))
                    .with_label(message)
                    .active(correct)
                    .with_accent(accent),
            )
            .with_control(
                Control::new(
                    ControlKind::TryAgain,
                    Self::row(top + ROW_HEIGHT + ROW_GAP, width),
                )
                .with_label("Try again")
                .with_action(Trigger::TryAgain),
            );
        layer.children = children;
        layer
    }
}

impl StateMachine for Quiz {
    const KIND: InteractionKind = InteractionKind::Quiz;
    type Config = QuizConfig;
    type State = QuizState;

    fn init(_config: &QuizConfig, _fragment: &Fragment<'_>) -> QuizState {
        QuizState::START
    }

    fn step(
        config: &QuizConfig,
        _fragment: &Fragment<'_>,
        state: &QuizState,
        trigger: &Trigger,
    ) -> Step<QuizState> {
        let next = match (*state, trigger) {
            (QuizState::Question { .. }, Trigger::SelectOption(index))
                if *index < config.options.len() =>
            {
                if config.show_feedback {
                    QuizState::Question {
                        selected: Some(*index),
                    }
                } else {
                    QuizState::Answered { selected: *index }
                }
            }
            (
                QuizState::Question {
                    selected: Some(selected),
                },
                Trigger::Confirm,
            ) if config.show_feedback => QuizState::Feedback { selected },
            (QuizState::Feedback { .. }, Trigger::TryAgain) => QuizState::START,
            (current, _) => current,
        };
        Step::to(next)
    }

    fn frame(config: &QuizConfig, fragment: &Fragment<'_>, state: &QuizState) -> Frame {
        let layer = match state {
            QuizState::Feedback { .. } => Self::feedback_layer(config, fragment, state),
            QuizState::Question { .. } | QuizState::Answered { .. } => {
                Self::question_layer(config, fragment, state)
            }
        };
        Frame {
            width: fragment.width(),
            height: fragment.height(),
            layers: vec![layer],
            ..Frame::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::fixtures::{component, rect};
    use crate::{Group, Interaction, InteractiveObject, ObjectId, Slots};
    use serde_json::json;

    fn quiz(config: serde_json::Value) -> InteractiveObject {
        component("quiz", config, &["question", "feedback"])
            .with_child(rect("yay", 0.0, 10.0))
            .with_child(rect("nay", 0.0, 10.0))
            .with_group(Group::new(FEEDBACK_CORRECT_ROLE, &["yay"]))
            .with_group(Group::new(FEEDBACK_INCORRECT_ROLE, &["nay"]))
    }

    fn run(object: &InteractiveObject, triggers: &[Trigger]) -> QuizState {
        let Interaction::Quiz(cfg) = &object.interaction else {
            panic!("Expected quiz");
        };
        let slots = Slots::resolve(object);
        let fragment = Fragment::new(object, &slots);
        triggers.iter().fold(Quiz::init(cfg, &fragment), |state, trigger| {
            Quiz::step(cfg, &fragment, &state, trigger).state
        })
    }

    fn feedback_children(object: &InteractiveObject, state: &QuizState) -> Vec<ObjectId> {
        let Interaction::Quiz(cfg) = &object.interaction else {
            panic!("Expected quiz");
        };
        let slots = Slots::resolve(object);
        let fragment = Fragment::new(object, &slots);
        Quiz::frame(cfg, &fragment, state)
            .layer(FEEDBACK_ROLE)
            .expect("feedback layer")
            .children
            .clone()
    }

    #[test]
    fn test_correct_feedback_iff_correct_index() {
        let object = quiz(json!({"options": ["A", "B", "C"], "correctIndex": 1}));
        for i in 0..3 {
            let state = run(&object, &[Trigger::SelectOption(i), Trigger::Confirm]);
            assert_eq!(state, QuizState::Feedback { selected: i });
            let children = feedback_children(&object, &state);
            assert_eq!(children.contains(&ObjectId::new("yay")), i == 1);
            assert_eq!(children.contains(&ObjectId::new("nay")), i != 1);
            assert!(children.contains(&ObjectId::new("feedback-child")));
        }
    }

    #[test]
    fn test_try_again_resets_to_question() {
        let object = quiz(json!({"options": ["A", "B"]}));
        let state = run(
            &object,
            &[Trigger::SelectOption(1), Trigger::Confirm, Trigger::TryAgain],
        );
        assert_eq!(state, QuizState::START);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_confirm_without_selection_is_noop() {
        let object = quiz(json!({"options": ["A", "B"]}));
        assert_eq!(run(&object, &[Trigger::Confirm]), QuizState::START);
    }

    #[test]
    fn test_selection_is_terminal_without_feedback() {
        let object = quiz(json!({"options": ["A", "B"], "showFeedback": false}));
        let state = run(
            &object,
            &[Trigger::SelectOption(0), Trigger::Confirm, Trigger::SelectOption(1)],
        );
        assert_eq!(state, QuizState::Answered { selected: 0 });
    }

    #[test]
    fn test_question_frame_lists_options_and_confirm() {
        let object = quiz(json!({"question": "2 + 2?", "options": ["3", "4"]}));
        let Interaction::Quiz(cfg) = &object.interaction else {
            panic!("Expected quiz");
        };
        let slots = Slots::resolve(&object);
        let fragment = Fragment::new(&object, &slots);
        let state = QuizState::Question { selected: Some(1) };
        let frame = Quiz::frame(cfg, &fragment, &state);

        let kinds: Vec<_> = frame.controls().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ControlKind::Prompt,
                ControlKind::AnswerOption,
                ControlKind::AnswerOption,
                ControlKind::Confirm
            ]
        );
        let confirm = frame.controls().last().expect("confirm");
        assert_eq!(confirm.action, Some(Trigger::Confirm));
        assert_eq!(
            frame.layer(QUESTION_ROLE).expect("question").children,
            vec![ObjectId::new("question-child")]
        );
    }
}
