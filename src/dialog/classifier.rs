//! Decides whether a raw interaction ends the dialog
//!
//! Pure: feed it synthetic interactions, no surface required.

use crate::surface::ElementId;

/// Normalized key identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    Enter,
    Other(String),
}

impl Key {
    /// Parse a key code name; anything unrecognized becomes `Other`
    pub fn from_code(code: &str) -> Self {
        match code {
            "Escape" => Self::Escape,
            "Space" => Self::Space,
            "Enter" => Self::Enter,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Escape => "Escape",
            Self::Space => "Space",
            Self::Enter => "Enter",
            Self::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Click,
    KeyUp,
}

/// One user action as delivered by the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInteraction {
    pub kind: InteractionKind,
    /// Clicked control, or the focused element for key events
    pub source: Option<ElementId>,
    pub key: Option<Key>,
}

impl RawInteraction {
    pub fn click(source: ElementId) -> Self {
        Self {
            kind: InteractionKind::Click,
            source: Some(source),
            key: None,
        }
    }

    pub fn key_up(key: Key, focused: Option<ElementId>) -> Self {
        Self {
            kind: InteractionKind::KeyUp,
            source: focused,
            key: Some(key),
        }
    }
}

/// How (and whether) an interaction closes the dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierResult {
    pub should_close: bool,
    /// Label of the control that closed the dialog, if any
    pub closing_control: Option<String>,
    pub closed_via_enter: bool,
    pub closed_via_control: bool,
}

impl ClassifierResult {
    fn via_control(label: &str) -> Self {
        Self {
            should_close: true,
            closing_control: Some(label.to_string()),
            closed_via_enter: false,
            closed_via_control: true,
        }
    }
}

/// Classify an interaction.
///
/// `closer` is the close designation of the interaction's source, i.e. the
/// label carried by the clicked or focused control. First matching rule wins:
/// click on a closer, Escape, Space on a closer, Enter.
pub fn classify(interaction: &RawInteraction, closer: Option<&str>) -> ClassifierResult {
    let closer = closer.filter(|label| !label.is_empty());

    if interaction.kind == InteractionKind::Click {
        if let Some(label) = closer {
            return ClassifierResult::via_control(label);
        }
    }

    match (&interaction.key, closer) {
        (Some(Key::Escape), _) => ClassifierResult {
            should_close: true,
            ..ClassifierResult::default()
        },
        (Some(Key::Space), Some(label)) => ClassifierResult::via_control(label),
        (Some(Key::Enter), _) => ClassifierResult {
            should_close: true,
            closed_via_enter: true,
            ..ClassifierResult::default()
        },
        _ => ClassifierResult::default(),
    }
}
