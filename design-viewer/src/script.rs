//! Scripted interaction steps for headless runs.
//!
//! Grammar, one step per `--step` flag:
//!
//! ```text
//! tap:<object>               tap the component
//! tap:<object>:<target>      next | previous | backdrop | close | confirm |
//!                            try-again | dot=N | tab=N | option=N | group=<role>
//! wait:<ms>                  let timers run for <ms> milliseconds
//! reload                     re-read the document (preview mode)
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use design_core::{ObjectId, Trigger};

use crate::ViewerError;

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Deliver a trigger to a component.
    Tap {
        /// Target component.
        object: ObjectId,
        /// Trigger to deliver.
        trigger: Trigger,
    },
    /// Advance the clock, delivering timer firings.
    Wait(Duration),
    /// Re-read the document from its source.
    Reload,
}

fn index(value: &str, step: &str) -> Result<usize, ViewerError> {
    value
        .parse()
        .map_err(|_| ViewerError::InvalidStep(format!("{step}: '{value}' is not an index")))
}

/// Parse the target part of a `tap` step.
///
/// # Errors
///
/// Returns [`ViewerError::InvalidStep`] for an unknown target.
pub fn parse_trigger(target: &str) -> Result<Trigger, ViewerError> {
    let trigger = match target {
        "" | "tap" => Trigger::Tap,
        "next" => Trigger::Next,
        "previous" | "prev" => Trigger::Previous,
        "backdrop" => Trigger::TapBackdrop,
        "close" => Trigger::Close,
        "confirm" => Trigger::Confirm,
        "try-again" => Trigger::TryAgain,
        other => match other.split_once('=') {
            Some(("dot", n)) => Trigger::GoTo(index(n, target)?),
            Some(("tab", n)) => Trigger::SelectTab(index(n, target)?),
            Some(("option", n)) => Trigger::SelectOption(index(n, target)?),
            Some(("group", role)) if !role.is_empty() => Trigger::TapGroup(role.to_string()),
            _ => return Err(ViewerError::InvalidStep(format!("unknown target '{target}'"))),
        },
    };
    Ok(trigger)
}

impl FromStr for ScriptStep {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "reload" {
            return Ok(Self::Reload);
        }
        if let Some(ms) = s.strip_prefix("wait:") {
            let ms: u64 = ms
                .parse()
                .map_err(|_| ViewerError::InvalidStep(format!("'{s}' needs milliseconds")))?;
            return Ok(Self::Wait(Duration::from_millis(ms)));
        }
        let Some(rest) = s.strip_prefix("tap:") else {
            return Err(ViewerError::InvalidStep(format!("unknown step '{s}'")));
        };
        let (object, target) = rest.split_once(':').unwrap_or((rest, ""));
        if object.is_empty() {
            return Err(ViewerError::InvalidStep(format!("'{s}' names no object")));
        }
        Ok(Self::Tap {
            object: ObjectId::new(object),
            trigger: parse_trigger(target)?,
        })
    }
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap { object, trigger } => write!(f, "tap {object} ({trigger:?})"),
            Self::Wait(duration) => write!(f, "wait {}ms", duration.as_millis()),
            Self::Reload => write!(f, "reload"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tap_targets() {
        assert_eq!(
            "tap:card".parse::<ScriptStep>().expect("step"),
            ScriptStep::Tap {
                object: ObjectId::new("card"),
                trigger: Trigger::Tap
            }
        );
        assert_eq!(parse_trigger("dot=2").expect("dot"), Trigger::GoTo(2));
        assert_eq!(parse_trigger("tab=0").expect("tab"), Trigger::SelectTab(0));
        assert_eq!(
            parse_trigger("group=hotspot-1").expect("group"),
            Trigger::TapGroup("hotspot-1".into())
        );
        assert_eq!(parse_trigger("try-again").expect("reset"), Trigger::TryAgain);
    }

    #[test]
    fn test_parse_wait_and_reload() {
        assert_eq!(
            "wait:3000".parse::<ScriptStep>().expect("wait"),
            ScriptStep::Wait(Duration::from_secs(3))
        );
        assert_eq!("reload".parse::<ScriptStep>().expect("reload"), ScriptStep::Reload);
    }

    #[test]
    fn test_rejects_bad_steps() {
        for bad in ["jump:card", "tap:", "wait:soon", "tap:card:tab=x", "tap:card:group="] {
            assert!(
                matches!(bad.parse::<ScriptStep>(), Err(ViewerError::InvalidStep(_))),
                "{bad} should be rejected"
            );
        }
    }
}
