//! Computes a dialog's final value from how it was closed

use super::classifier::ClassifierResult;
use super::types::{DialogType, DialogValue};

/// Label of the affirmative control
pub const OK_LABEL: &str = "OK";
/// Label of the negative control
pub const CANCEL_LABEL: &str = "Cancel";

/// Value for a dialog closed by `closed`.
///
/// `input` is the text field content and only matters for prompts; a prompt
/// without one resolves affirmative closes to an empty string.
pub fn resolve_value(
    dialog_type: DialogType,
    closed: &ClassifierResult,
    input: Option<&str>,
) -> DialogValue {
    let accepted = if closed.closed_via_control {
        Some(closed.closing_control.as_deref() == Some(OK_LABEL))
    } else if closed.closed_via_enter {
        Some(true)
    } else {
        None
    };

    match (dialog_type, accepted) {
        (DialogType::Alert, _) => DialogValue::Undefined,
        (DialogType::Confirm, Some(accepted)) => DialogValue::Bool(accepted),
        (DialogType::Confirm, None) => DialogValue::Null,
        (DialogType::Prompt, Some(true)) => DialogValue::Text(input.unwrap_or_default().to_string()),
        (DialogType::Prompt, Some(false)) | (DialogType::Prompt, None) => DialogValue::Null,
    }
}

/// Value reported when a dialog ends without any control or Enter, i.e. Escape
pub fn dismissed_value(dialog_type: DialogType) -> DialogValue {
    resolve_value(
        dialog_type,
        &ClassifierResult {
            should_close: true,
            ..ClassifierResult::default()
        },
        None,
    )
}
