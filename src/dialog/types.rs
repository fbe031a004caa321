//! Core dialog types
//!
//! Requests, values, lifecycle states and errors shared by every part of the
//! modal core.

use crate::surface::SurfaceError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for dialog sessions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three modal flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogType {
    Alert,
    Confirm,
    Prompt,
}

impl DialogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Confirm => "confirm",
            Self::Prompt => "prompt",
        }
    }

    /// Confirm and prompt offer a Cancel button next to OK
    pub fn has_cancel(&self) -> bool {
        matches!(self, Self::Confirm | Self::Prompt)
    }

    /// Only prompt carries a text input
    pub fn has_input(&self) -> bool {
        matches!(self, Self::Prompt)
    }
}

impl FromStr for DialogType {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alert" => Ok(Self::Alert),
            "confirm" => Ok(Self::Confirm),
            "prompt" => Ok(Self::Prompt),
            other => Err(DialogError::UnknownDialogType(other.to_string())),
        }
    }
}

impl std::fmt::Display for DialogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller asked to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub dialog_type: DialogType,
    pub message: String,
    /// Initial input content, prompt only
    pub default_value: Option<String>,
}

impl DialogRequest {
    pub fn new(
        dialog_type: DialogType,
        message: impl Into<String>,
        default_value: Option<String>,
    ) -> Self {
        let default_value = if dialog_type.has_input() {
            Some(default_value.unwrap_or_default())
        } else {
            None
        };

        Self {
            dialog_type,
            message: message.into(),
            default_value,
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self::new(DialogType::Alert, message, None)
    }

    pub fn confirm(message: impl Into<String>) -> Self {
        Self::new(DialogType::Confirm, message, None)
    }

    pub fn prompt(message: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self::new(DialogType::Prompt, message, Some(default_value.into()))
    }

    /// Build a request from a type name, rejecting unknown names
    pub fn parse(
        dialog_type: &str,
        message: impl Into<String>,
        default_value: Option<String>,
    ) -> DialogResult<Self> {
        Ok(Self::new(dialog_type.parse()?, message, default_value))
    }
}

/// Final value of a dialog
///
/// `Undefined` and `Null` are distinct on purpose: alert never produces a
/// meaningful value, while confirm and prompt report Escape as `Null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Text(String),
}

impl DialogValue {
    /// Whether the caller should treat this as "the user backed out"
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// JSON rendition; `Undefined` has none
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Self::Undefined => None,
            Self::Null => Some(serde_json::Value::Null),
            Self::Bool(value) => Some(serde_json::Value::Bool(*value)),
            Self::Text(value) => Some(serde_json::Value::String(value.clone())),
        }
    }
}

impl std::fmt::Display for DialogValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{:?}", value),
        }
    }
}

/// Dialog session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    /// Elements are being created and inserted
    #[default]
    Building,
    /// Waiting for the user
    Open,
    /// A closing interaction is being processed
    Closing,
    /// Torn down, nothing left on the surface
    Closed,
}

impl DialogState {
    /// Transitions never skip a state
    pub fn can_transition_to(&self, next: DialogState) -> bool {
        matches!(
            (self, next),
            (Self::Building, Self::Open) | (Self::Open, Self::Closing) | (Self::Closing, Self::Closed)
        )
    }
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("Unknown dialog type '{0}'")]
    UnknownDialogType(String),

    #[error("A dialog is already open ({0})")]
    AlreadyOpen(DialogId),

    #[error("Dialog {0} was already completed")]
    AlreadyCompleted(DialogId),

    #[error("Invalid dialog transition from {from:?} to {to:?}")]
    InvalidTransition { from: DialogState, to: DialogState },

    #[error("Dialog {0} was dropped before it completed")]
    Abandoned(DialogId),

    #[error("Dialog host is not running")]
    HostUnavailable,

    #[error("No dialog handle has been installed")]
    NotInstalled,

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_type_parsing() {
        assert_eq!("alert".parse::<DialogType>(), Ok(DialogType::Alert));
        assert_eq!("confirm".parse::<DialogType>(), Ok(DialogType::Confirm));
        assert_eq!("prompt".parse::<DialogType>(), Ok(DialogType::Prompt));
        assert_eq!(
            "Prompt".parse::<DialogType>(),
            Err(DialogError::UnknownDialogType("Prompt".to_string()))
        );
    }

    #[test]
    fn test_request_drops_default_outside_prompt() {
        let request = DialogRequest::new(DialogType::Confirm, "Sure?", Some("x".to_string()));
        assert_eq!(request.default_value, None);

        let request = DialogRequest::new(DialogType::Prompt, "Name", None);
        assert_eq!(request.default_value.as_deref(), Some(""));

        assert!(DialogRequest::parse("modal", "hi", None).is_err());
    }

    #[test]
    fn test_value_json_and_cancellation() {
        assert_eq!(DialogValue::Undefined.to_json(), None);
        assert_eq!(DialogValue::Null.to_json(), Some(serde_json::Value::Null));
        assert_eq!(
            DialogValue::Text("hi".to_string()).to_json(),
            Some(serde_json::json!("hi"))
        );
        assert!(DialogValue::Null.is_cancelled());
        assert!(DialogValue::Undefined.is_cancelled());
        assert!(!DialogValue::Bool(false).is_cancelled());
        assert!(!DialogValue::Text(String::new()).is_cancelled());
    }

    #[test]
    fn test_state_transitions_are_sequential() {
        assert!(DialogState::Building.can_transition_to(DialogState::Open));
        assert!(DialogState::Open.can_transition_to(DialogState::Closing));
        assert!(DialogState::Closing.can_transition_to(DialogState::Closed));
        assert!(!DialogState::Building.can_transition_to(DialogState::Closed));
        assert!(!DialogState::Open.can_transition_to(DialogState::Closed));
        assert!(!DialogState::Closed.can_transition_to(DialogState::Open));
        assert_eq!(DialogState::default(), DialogState::Building);
    }
}
