use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// GestureName
// ---------------------------------------------------------------------------

/// The closed set of gestures the table can be keyed by.
///
/// `HandUp` and `HandDown` are accepted as table keys but no classifier rule
/// produces them; see [`GestureName::is_classifiable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureName {
    OneFingerUp,
    OneFingerDown,
    FistClosed,
    FistOpened,
    HandUp,
    HandDown,
}

impl GestureName {
    pub fn all() -> &'static [GestureName] {
        &[
            GestureName::OneFingerUp,
            GestureName::OneFingerDown,
            GestureName::FistClosed,
            GestureName::FistOpened,
            GestureName::HandUp,
            GestureName::HandDown,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GestureName::OneFingerUp => "one_finger_up",
            GestureName::OneFingerDown => "one_finger_down",
            GestureName::FistClosed => "fist_closed",
            GestureName::FistOpened => "fist_opened",
            GestureName::HandUp => "hand_up",
            GestureName::HandDown => "hand_down",
        }
    }

    /// Whether the classifier can ever emit this gesture.
    pub fn is_classifiable(self) -> bool {
        !matches!(self, GestureName::HandUp | GestureName::HandDown)
    }
}

impl fmt::Display for GestureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GestureName {
    type Err = crate::error::HandkeysError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GestureName::all()
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| crate::error::HandkeysError::UnknownGesture(s.to_string()))
    }
}
