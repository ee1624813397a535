use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prefix for registry keys derived from a target identifier.
pub const KEY_PREFIX: &str = "smart-";

/// Registry key claimed by a widget attached to the whole screen.
pub const SCREEN_KEY: &str = "smart-screen";

/// Message restored by `reset()`.
pub const LOADING_TEXT: &str = "Loading...";

/// Default fade-in duration used by `show`.
pub const SHOW_FADE: Duration = Duration::from_millis(400);

/// Default fade-out duration used by `hide` and by dismissal.
pub const HIDE_FADE: Duration = Duration::from_millis(1500);

/// Lifecycle state of a widget's displayed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Final,
}

/// Terminal outcome shown once a widget reaches `Phase::Final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// What the dismiss control does when the user activates it.
///
/// The default only hides the widget; the registry entry stays claimed until
/// `destroy` is called explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissBehavior {
    #[default]
    HideOnly,
    Destroy,
}

/// What a widget attaches to: the whole screen, or a named region of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Screen,
    Region { id: String, area: Rect },
}

impl Target {
    pub fn region(id: impl Into<String>, area: Rect) -> Self {
        Target::Region { id: id.into(), area }
    }

    /// Registry key this target would claim, or `None` when the target has
    /// no usable identifier.
    pub fn registry_key(&self) -> Option<String> {
        match self {
            Target::Screen => Some(SCREEN_KEY.to_string()),
            Target::Region { id, .. } => {
                if id.is_empty() {
                    None
                } else {
                    Some(format!("{}{}", KEY_PREFIX, id))
                }
            }
        }
    }

    pub fn area(&self) -> Option<Rect> {
        match self {
            Target::Screen => None,
            Target::Region { area, .. } => Some(*area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_key_carries_prefix() {
        let t = Target::region("btn1", Rect::new(0, 0, 10, 3));
        assert_eq!(t.registry_key().as_deref(), Some("smart-btn1"));
    }

    #[test]
    fn empty_region_id_yields_no_key() {
        let t = Target::region("", Rect::new(0, 0, 10, 3));
        assert_eq!(t.registry_key(), None);
    }

    #[test]
    fn screen_target_uses_sentinel_key() {
        assert_eq!(Target::Screen.registry_key().as_deref(), Some(SCREEN_KEY));
    }
}
