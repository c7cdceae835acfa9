//! Interaction kinds and their typed configuration records.
//!
//! Documents carry `interactionType` as a string tag and `interactionConfig`
//! as a loosely shaped object. [`Interaction::decode`] turns the pair into a
//! tagged union so every renderer works with typed records. Unknown tags and
//! undecodable configs become named fallback variants that render nothing.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Whole-number config fields. Editors may write `600.0` for `600`, so
/// any non-negative number is accepted and the fraction truncated.
mod whole {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Number;

    fn from_number<E: Error>(number: &Number) -> Result<u64, E> {
        if let Some(n) = number.as_u64() {
            return Ok(n);
        }
        match number.as_f64() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(f) if f.is_finite() && f >= 0.0 => Ok(f as u64),
            _ => Err(E::custom(format!("expected a non-negative number, got {number}"))),
        }
    }

    pub fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        from_number(&Number::deserialize(deserializer)?)
    }

    pub fn de_usize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        let n = de_u64(deserializer)?;
        Ok(usize::try_from(n).unwrap_or(usize::MAX))
    }
}

/// The seven supported interaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Two-sided card that flips on tap.
    FlipCard,
    /// Sheet that slides up over a backdrop.
    BottomSheet,
    /// Header that expands or collapses a body.
    Expandable,
    /// One-shot staggered entrance animation.
    Entrance,
    /// Slides with arrows, dots and optional autoplay.
    Carousel,
    /// Tab bar switching between content panes.
    Tabs,
    /// Single-choice question with feedback.
    Quiz,
}

impl InteractionKind {
    /// Every supported kind.
    pub const ALL: [Self; 7] = [
        Self::FlipCard,
        Self::BottomSheet,
        Self::Expandable,
        Self::Entrance,
        Self::Carousel,
        Self::Tabs,
        Self::Quiz,
    ];

    /// Wire tag of this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::FlipCard => "flip-card",
            Self::BottomSheet => "bottom-sheet",
            Self::Expandable => "expandable",
            Self::Entrance => "entrance",
            Self::Carousel => "carousel",
            Self::Tabs => "tabs",
            Self::Quiz => "quiz",
        }
    }

    /// Look up a kind by wire tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which card face is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Front face.
    #[default]
    Front,
    /// Back face.
    Back,
}

impl Side {
    /// The opposite face.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

/// Rotation axis of a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    /// Flip left/right (rotation around the Y axis).
    #[default]
    Horizontal,
    /// Flip top/bottom (rotation around the X axis).
    Vertical,
}

/// Flip-card configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlipCardConfig {
    /// Flip animation duration in milliseconds.
    #[serde(deserialize_with = "whole::de_u64")]
    pub flip_duration: u64,
    /// Rotation axis.
    pub flip_axis: FlipAxis,
    /// Face shown on mount.
    pub default_side: Side,
}

impl Default for FlipCardConfig {
    fn default() -> Self {
        Self {
            flip_duration: 600,
            flip_axis: FlipAxis::Horizontal,
            default_side: Side::Front,
        }
    }
}

/// Bottom-sheet configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BottomSheetConfig {
    /// Slide animation duration in milliseconds.
    #[serde(deserialize_with = "whole::de_u64")]
    pub slide_duration: u64,
    /// Backdrop opacity when open.
    pub backdrop_opacity: f32,
    /// Sheet height as a percentage of the component height.
    pub sheet_height_percent: f32,
    /// Whether tapping the backdrop closes the sheet.
    pub dismiss_on_backdrop_tap: bool,
    /// Sheet background color.
    pub sheet_background: String,
    /// Radius of the sheet's top corners.
    pub corner_radius: f32,
    /// Whether to draw a drag handle at the top of the sheet.
    pub show_handle: bool,
}

impl Default for BottomSheetConfig {
    fn default() -> Self {
        Self {
            slide_duration: 300,
            backdrop_opacity: 0.5,
            sheet_height_percent: 50.0,
            dismiss_on_backdrop_tap: true,
            sheet_background: "#ffffff".to_string(),
            corner_radius: 16.0,
            show_handle: true,
        }
    }
}

/// Easing curve of a timed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Accelerate from rest.
    EaseIn,
    /// Decelerate towards the end.
    EaseOut,
    /// Accelerate then decelerate.
    #[default]
    EaseInOut,
    /// Overshoot the target, then settle.
    Overshoot,
}

/// Expandable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpandableConfig {
    /// Height animation duration in milliseconds.
    #[serde(deserialize_with = "whole::de_u64")]
    pub expand_duration: u64,
    /// Whether the body starts expanded.
    pub default_expanded: bool,
    /// Easing of the height animation.
    pub easing: Easing,
    /// Whether to draw a chevron in the header.
    pub show_chevron: bool,
}

impl Default for ExpandableConfig {
    fn default() -> Self {
        Self {
            expand_duration: 300,
            default_expanded: false,
            easing: Easing::EaseInOut,
            show_chevron: true,
        }
    }
}

/// Entrance animation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntranceAnimation {
    /// Opacity 0 to 1.
    #[default]
    FadeIn,
    /// Rise from below while fading in.
    SlideUp,
    /// Grow from a smaller scale while fading in.
    ScaleUp,
    /// Drop in and overshoot before settling.
    Bounce,
}

/// Entrance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntranceConfig {
    /// Animation style.
    pub animation: EntranceAnimation,
    /// Per-child animation duration in milliseconds.
    #[serde(deserialize_with = "whole::de_u64")]
    pub duration: u64,
    /// Extra delay per child index in milliseconds.
    #[serde(deserialize_with = "whole::de_u64")]
    pub stagger_delay: u64,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            animation: EntranceAnimation::FadeIn,
            duration: 500,
            stagger_delay: 100,
        }
    }
}

/// Carousel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    /// Advance automatically on a timer.
    pub auto_play: bool,
    /// Autoplay period in milliseconds.
    #[serde(deserialize_with = "whole::de_u64")]
    pub auto_play_interval: u64,
    /// Full cross-fade duration in milliseconds.
    #[serde(deserialize_with = "whole::de_u64")]
    pub transition_duration: u64,
    /// Draw previous/next arrows.
    pub show_arrows: bool,
    /// Draw position dots.
    pub show_dots: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_play: false,
            auto_play_interval: 3000,
            transition_duration: 300,
            show_arrows: true,
            show_dots: true,
        }
    }
}

/// Tab bar placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPosition {
    /// Above the content.
    #[default]
    Top,
    /// Below the content.
    Bottom,
}

/// Tab bar visual style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStyle {
    /// Active tab underlined.
    #[default]
    Underline,
    /// Active tab filled as a pill.
    Pill,
    /// Tabs drawn as bordered boxes.
    Boxed,
}

/// Tabs configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabsConfig {
    /// Tab bar placement.
    pub tab_position: TabPosition,
    /// Tab bar style.
    pub tab_style: TabStyle,
    /// Tab shown on mount.
    #[serde(deserialize_with = "whole::de_usize")]
    pub default_tab: usize,
    /// Accent color of the active tab.
    pub active_color: String,
    /// Height of the tab bar in pixels.
    pub tab_bar_height: f32,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            tab_position: TabPosition::Top,
            tab_style: TabStyle::Underline,
            default_tab: 0,
            active_color: "#3b82f6".to_string(),
            tab_bar_height: 44.0,
        }
    }
}

/// Quiz configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizConfig {
    /// Question text drawn above the options.
    pub question: String,
    /// Answer options.
    pub options: Vec<String>,
    /// Index of the correct option.
    #[serde(deserialize_with = "whole::de_usize")]
    pub correct_index: usize,
    /// Whether confirming shows feedback.
    pub show_feedback: bool,
    /// Message for a correct answer.
    pub correct_feedback: String,
    /// Message for an incorrect answer.
    pub incorrect_feedback: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: Vec::new(),
            correct_index: 0,
            show_feedback: true,
            correct_feedback: "Correct!".to_string(),
            incorrect_feedback: "Not quite. Try again!".to_string(),
        }
    }
}

/// Interaction kind with its typed configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Flip card.
    FlipCard(FlipCardConfig),
    /// Bottom sheet.
    BottomSheet(BottomSheetConfig),
    /// Expandable section.
    Expandable(ExpandableConfig),
    /// Entrance animation.
    Entrance(EntranceConfig),
    /// Carousel.
    Carousel(CarouselConfig),
    /// Tabs.
    Tabs(TabsConfig),
    /// Quiz.
    Quiz(QuizConfig),
    /// Tag not known to this renderer (e.g. from a newer editor).
    Unsupported {
        /// The unrecognized tag.
        tag: String,
    },
    /// Known tag whose configuration could not be decoded.
    Malformed {
        /// The interaction tag.
        tag: String,
        /// Decoder message.
        reason: String,
        /// The raw configuration, kept for re-encoding.
        config: serde_json::Value,
    },
}

impl Interaction {
    /// Decode a tag/config pair. Never fails: unknown tags and bad configs
    /// become [`Interaction::Unsupported`] and [`Interaction::Malformed`].
    #[must_use]
    pub fn decode(tag: &str, config: &serde_json::Value) -> Self {
        let Some(kind) = InteractionKind::from_tag(tag) else {
            tracing::warn!("Unsupported interaction type '{tag}'");
            return Self::Unsupported {
                tag: tag.to_string(),
            };
        };

        let result = match kind {
            InteractionKind::FlipCard => parse_config(config).map(Self::FlipCard),
            InteractionKind::BottomSheet => parse_config(config).map(Self::BottomSheet),
            InteractionKind::Expandable => parse_config(config).map(Self::Expandable),
            InteractionKind::Entrance => parse_config(config).map(Self::Entrance),
            InteractionKind::Carousel => parse_config(config).map(Self::Carousel),
            InteractionKind::Tabs => parse_config(config).map(Self::Tabs),
            InteractionKind::Quiz => parse_config(config).map(Self::Quiz),
        };

        result.unwrap_or_else(|err| {
            tracing::warn!("Malformed {tag} config: {err}");
            Self::Malformed {
                tag: tag.to_string(),
                reason: err.to_string(),
                config: config.clone(),
            }
        })
    }

    /// The supported kind, or `None` for the fallback variants.
    #[must_use]
    pub const fn kind(&self) -> Option<InteractionKind> {
        match self {
            Self::FlipCard(_) => Some(InteractionKind::FlipCard),
            Self::BottomSheet(_) => Some(InteractionKind::BottomSheet),
            Self::Expandable(_) => Some(InteractionKind::Expandable),
            Self::Entrance(_) => Some(InteractionKind::Entrance),
            Self::Carousel(_) => Some(InteractionKind::Carousel),
            Self::Tabs(_) => Some(InteractionKind::Tabs),
            Self::Quiz(_) => Some(InteractionKind::Quiz),
            Self::Unsupported { .. } | Self::Malformed { .. } => None,
        }
    }

    /// Wire tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Unsupported { tag } | Self::Malformed { tag, .. } => tag,
            _ => self.kind().map_or("", InteractionKind::tag),
        }
    }

    /// Re-encode the configuration as JSON.
    #[must_use]
    pub fn config_value(&self) -> serde_json::Value {
        let encoded = match self {
            Self::FlipCard(c) => serde_json::to_value(c),
            Self::BottomSheet(c) => serde_json::to_value(c),
            Self::Expandable(c) => serde_json::to_value(c),
            Self::Entrance(c) => serde_json::to_value(c),
            Self::Carousel(c) => serde_json::to_value(c),
            Self::Tabs(c) => serde_json::to_value(c),
            Self::Quiz(c) => serde_json::to_value(c),
            Self::Unsupported { .. } => Ok(serde_json::Value::Null),
            Self::Malformed { config, .. } => Ok(config.clone()),
        };
        encoded.unwrap_or(serde_json::Value::Null)
    }
}

fn parse_config<T: DeserializeOwned>(config: &serde_json::Value) -> Result<T, serde_json::Error> {
    if config.is_null() {
        serde_json::from_value(serde_json::Value::Object(serde_json::Map::new()))
    } else {
        serde_json::from_value(config.clone())
    }
}

/// Milliseconds from a config field as a [`Duration`].
#[must_use]
pub const fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_partial_config_fills_defaults() {
        let interaction = Interaction::decode("carousel", &json!({"autoPlay": true}));
        let Interaction::Carousel(config) = interaction else {
            panic!("Expected carousel");
        };
        assert!(config.auto_play);
        assert_eq!(config.auto_play_interval, 3000);
        assert!(config.show_dots);
    }

    #[test]
    fn test_decode_null_config_uses_defaults() {
        let interaction = Interaction::decode("flip-card", &serde_json::Value::Null);
        assert_eq!(interaction, Interaction::FlipCard(FlipCardConfig::default()));
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let interaction = Interaction::decode("hologram", &json!({}));
        assert_eq!(
            interaction,
            Interaction::Unsupported {
                tag: "hologram".to_string()
            }
        );
        assert!(interaction.kind().is_none());
        assert_eq!(interaction.tag(), "hologram");
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        let interaction = Interaction::decode("tabs", &json!({"defaultTab": "first"}));
        assert!(matches!(interaction, Interaction::Malformed { ref tag, .. } if tag == "tabs"));
        assert_eq!(interaction.config_value(), json!({"defaultTab": "first"}));
    }

    #[test]
    fn test_float_valued_numbers_decode() {
        let Interaction::FlipCard(flip) = Interaction::decode("flip-card", &json!({"flipDuration": 600.0}))
        else {
            panic!("Expected flip card");
        };
        assert_eq!(flip.flip_duration, 600);

        let Interaction::Quiz(quiz) =
            Interaction::decode("quiz", &json!({"correctIndex": 1.0, "options": ["a", "b"]}))
        else {
            panic!("Expected quiz");
        };
        assert_eq!(quiz.correct_index, 1);

        let Interaction::Entrance(entrance) =
            Interaction::decode("entrance", &json!({"duration": 450.7, "staggerDelay": 80}))
        else {
            panic!("Expected entrance");
        };
        assert_eq!((entrance.duration, entrance.stagger_delay), (450, 80));
    }

    #[test]
    fn test_negative_duration_is_malformed() {
        let interaction = Interaction::decode("carousel", &json!({"transitionDuration": -300}));
        assert!(matches!(interaction, Interaction::Malformed { .. }));
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in InteractionKind::ALL {
            assert_eq!(InteractionKind::from_tag(kind.tag()), Some(kind));
        }
    }
}
