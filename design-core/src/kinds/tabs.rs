//! Tabs: a tab bar switching between `tab-N` content panes.
//!
//! Tabs are addressed by the `N` of their group, so `SelectTab(2)` always
//! means `tab-2` even when the numbering has gaps.

use crate::interaction::{InteractionKind, TabPosition, TabStyle, TabsConfig};
use crate::{Accent, Control, ControlKind, Fragment, Frame, Layer, Rect, StateMachine, Step, Trigger};

/// Role family prefix of tab panes (`tab-0`, `tab-1`, ...).
pub const TAB_FAMILY: &str = "tab";

/// Tabs state machine.
pub struct Tabs;

/// Selected tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabsState {
    /// Number of the selected `tab-N` group.
    pub active: usize,
}

impl Tabs {
    const fn accent(style: TabStyle) -> Accent {
        match style {
            TabStyle::Underline => Accent::Underline,
            TabStyle::Pill => Accent::Pill,
            TabStyle::Boxed => Accent::Boxed,
        }
    }
}

impl StateMachine for Tabs {
    const KIND: InteractionKind = InteractionKind::Tabs;
    type Config = TabsConfig;
    type State = TabsState;

    fn init(config: &TabsConfig, _fragment: &Fragment<'_>) -> TabsState {
        TabsState {
            active: config.default_tab,
        }
    }

    fn step(
        _config: &TabsConfig,
        fragment: &Fragment<'_>,
        state: &TabsState,
        trigger: &Trigger,
    ) -> Step<TabsState> {
        match trigger {
            Trigger::SelectTab(index) if fragment.slots.nth(TAB_FAMILY, *index).is_some() => {
                Step::to(TabsState { active: *index })
            }
            _ => Step::to(*state),
        }
    }

    fn frame(config: &TabsConfig, fragment: &Fragment<'_>, state: &TabsState) -> Frame {
        let (width, height) = (fragment.width(), fragment.height());
        let tabs = fragment.slots.numbered(TAB_FAMILY);
        if tabs.is_empty() {
            return Frame::empty(width, height);
        }

        let bar_height = config.tab_bar_height.min(height);
        let content_height = height - bar_height;
        let (bar_y, content_y) = match config.tab_position {
            TabPosition::Top => (0.0, bar_height),
            TabPosition::Bottom => (content_height, 0.0),
        };

        #[allow(clippy::cast_precision_loss)]
        let tab_width = width / tabs.len() as f32;
        let mut bar = Layer::new("tab-bar", Rect::new(0.0, bar_y, width, bar_height));
        for (position, (number, tab)) in tabs.iter().enumerate() {
            let label = tab
                .label
                .clone()
                .unwrap_or_else(|| format!("Tab {}", position + 1));
            #[allow(clippy::cast_precision_loss)]
            let x = tab_width * position as f32;
            let mut header = Control::new(ControlKind::TabHeader, Rect::new(x, 0.0, tab_width, bar_height))
                .with_label(label)
                .active(*number == state.active)
                .with_accent(Self::accent(config.tab_style))
                .with_action(Trigger::SelectTab(*number));
            header.accent_color = Some(config.active_color.clone());
            bar.controls.push(header);
        }

        let mut content = Layer::new("tab-content", Rect::new(0.0, content_y, width, content_height))
            .with_children(
                fragment
                    .slots
                    .nth(TAB_FAMILY, state.active)
                    .map(|t| t.members.as_slice())
                    .unwrap_or_default(),
            );
        content.clip = true;

        Frame {
            width,
            height,
            layers: vec![content, bar],
            ..Frame::default()
        }
    }
}
