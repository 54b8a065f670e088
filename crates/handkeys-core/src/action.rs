use crate::error::{HandkeysError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// The category an action was written under.
///
/// The labels are the exact strings stored in the `action_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "Open App")]
    OpenApp,
    #[serde(rename = "Accessibility Option")]
    Accessibility,
}

impl ActionType {
    pub fn all() -> &'static [ActionType] {
        &[ActionType::OpenApp, ActionType::Accessibility]
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionType::OpenApp => "Open App",
            ActionType::Accessibility => "Accessibility Option",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ActionType {
    type Err = HandkeysError;

    fn from_str(s: &str) -> Result<Self> {
        ActionType::all()
            .iter()
            .copied()
            .find(|t| t.label() == s)
            .ok_or_else(|| HandkeysError::UnknownActionType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// AccessibilityCommand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessibilityCommand {
    #[serde(rename = "Scroll Up")]
    ScrollUp,
    #[serde(rename = "Scroll Down")]
    ScrollDown,
    #[serde(rename = "Zoom In")]
    ZoomIn,
    #[serde(rename = "Zoom Out")]
    ZoomOut,
    #[serde(rename = "Volume Up")]
    VolumeUp,
    #[serde(rename = "Volume Down")]
    VolumeDown,
}

impl AccessibilityCommand {
    pub fn all() -> &'static [AccessibilityCommand] {
        &[
            AccessibilityCommand::ScrollUp,
            AccessibilityCommand::ScrollDown,
            AccessibilityCommand::ZoomIn,
            AccessibilityCommand::ZoomOut,
            AccessibilityCommand::VolumeUp,
            AccessibilityCommand::VolumeDown,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            AccessibilityCommand::ScrollUp => "Scroll Up",
            AccessibilityCommand::ScrollDown => "Scroll Down",
            AccessibilityCommand::ZoomIn => "Zoom In",
            AccessibilityCommand::ZoomOut => "Zoom Out",
            AccessibilityCommand::VolumeUp => "Volume Up",
            AccessibilityCommand::VolumeDown => "Volume Down",
        }
    }
}

impl fmt::Display for AccessibilityCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AccessibilityCommand {
    type Err = HandkeysError;

    /// Accepts the stored label ("Volume Up") as well as the kebab-case
    /// spelling used on the command line ("volume-up").
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        AccessibilityCommand::all()
            .iter()
            .copied()
            .find(|c| {
                c.label() == wanted || c.label().to_lowercase().replace(' ', "-") == wanted
            })
            .ok_or_else(|| HandkeysError::UnknownCommand(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// AppPreset
// ---------------------------------------------------------------------------

/// Well-known applications offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPreset {
    Browser,
    Terminal,
    FileManager,
    Editor,
}

impl AppPreset {
    pub fn all() -> &'static [AppPreset] {
        &[
            AppPreset::Browser,
            AppPreset::Terminal,
            AppPreset::FileManager,
            AppPreset::Editor,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppPreset::Browser => "browser",
            AppPreset::Terminal => "terminal",
            AppPreset::FileManager => "file-manager",
            AppPreset::Editor => "editor",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            AppPreset::Browser => "/usr/bin/firefox",
            AppPreset::Terminal => "/usr/bin/gnome-terminal",
            AppPreset::FileManager => "/usr/bin/nautilus",
            AppPreset::Editor => "/usr/bin/code",
        }
    }
}

impl std::str::FromStr for AppPreset {
    type Err = HandkeysError;

    fn from_str(s: &str) -> Result<Self> {
        AppPreset::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| HandkeysError::InvalidAction(format!("unknown app preset '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// ActionDescriptor
// ---------------------------------------------------------------------------

/// What to do when a gesture fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ActionDescriptor {
    /// Start the executable at this path.
    Launch(String),
    Accessibility(AccessibilityCommand),
    /// Stored text that matches no dispatch rule. Dispatching it is a no-op.
    Unrecognized(String),
}

impl ActionDescriptor {
    /// Tag `text` according to the type it is being written under.
    ///
    /// This is the write-time path: unknown accessibility commands and blank
    /// actions are rejected rather than stored.
    pub fn for_type(action_type: ActionType, text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(HandkeysError::InvalidAction("action must not be empty".into()));
        }
        match action_type {
            ActionType::OpenApp => Ok(ActionDescriptor::Launch(text.to_string())),
            ActionType::Accessibility => text.parse().map(ActionDescriptor::Accessibility),
        }
    }

    /// Rebuild a descriptor from a stored row.
    ///
    /// Known type labels decide the tag. Any other label falls back to
    /// [`ActionDescriptor::infer`].
    pub fn from_stored(type_label: &str, text: &str) -> Self {
        match type_label.parse::<ActionType>() {
            Ok(ActionType::OpenApp) => ActionDescriptor::Launch(text.to_string()),
            Ok(ActionType::Accessibility) => text
                .parse()
                .map(ActionDescriptor::Accessibility)
                .unwrap_or_else(|_| ActionDescriptor::Unrecognized(text.to_string())),
            Err(_) => ActionDescriptor::infer(text),
        }
    }

    /// Guess the tag from the text alone. Only used for rows without a
    /// recognised type label.
    pub fn infer(text: &str) -> Self {
        if text.starts_with('/') || Path::new(text).is_absolute() {
            return ActionDescriptor::Launch(text.to_string());
        }
        match text.parse() {
            Ok(cmd) => ActionDescriptor::Accessibility(cmd),
            Err(_) => ActionDescriptor::Unrecognized(text.to_string()),
        }
    }
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionDescriptor::Launch(path) => f.write_str(path),
            ActionDescriptor::Accessibility(cmd) => f.write_str(cmd.label()),
            ActionDescriptor::Unrecognized(text) => f.write_str(text),
        }
    }
}
