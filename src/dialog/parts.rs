//! Element factories for the pieces a modal is assembled from

use super::resolver::OK_LABEL;
use crate::surface::{ElementKind, ElementSpec, CLOSE_ATTR};

pub const DESCRIPTION_ID: &str = "data-dialog-description";
pub const INPUT_ID: &str = "data-prompt-input";
pub const DESCRIPTION_TEXT: &str = "alert dialog is open";

pub fn container() -> ElementSpec {
    ElementSpec::new(ElementKind::Dialog)
        .with_attribute("role", "alertdialog")
        .with_attribute("open", "true")
        .with_attribute("aria-describedby", DESCRIPTION_ID)
}

pub fn description() -> ElementSpec {
    ElementSpec::new(ElementKind::Paragraph)
        .with_attribute("id", DESCRIPTION_ID)
        .with_attribute("hidden", "true")
        .with_text(DESCRIPTION_TEXT)
}

pub fn label(message: &str) -> ElementSpec {
    ElementSpec::new(ElementKind::Label)
        .with_attribute("tabindex", "0")
        .with_attribute("for", INPUT_ID)
        .with_text(message)
}

pub fn input(value: &str) -> ElementSpec {
    ElementSpec::new(ElementKind::TextArea)
        .with_attribute("id", INPUT_ID)
        .with_value(value)
}

pub fn actions() -> ElementSpec {
    ElementSpec::new(ElementKind::Actions).with_attribute("data-dialogue-actions", "")
}

/// Push button that closes the dialog; OK is the primary action
pub fn button(label: &str) -> ElementSpec {
    let spec = ElementSpec::new(ElementKind::Button)
        .with_attribute("type", "button")
        .with_attribute("value", label)
        .with_attribute(CLOSE_ATTR, label)
        .with_text(label);

    if label == OK_LABEL {
        spec.with_attribute("data-primary", "true")
    } else {
        spec
    }
}

pub fn backdrop() -> ElementSpec {
    ElementSpec::new(ElementKind::Backdrop).with_attribute("role", "presentation")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_carry_close_designation() {
        let ok = button("OK");
        let cancel = button("Cancel");

        assert_eq!(ok.attributes.get(CLOSE_ATTR).map(String::as_str), Some("OK"));
        assert_eq!(ok.attributes.get("data-primary").map(String::as_str), Some("true"));
        assert_eq!(cancel.attributes.get(CLOSE_ATTR).map(String::as_str), Some("Cancel"));
        assert!(cancel.attributes.get("data-primary").is_none());
    }

    #[test]
    fn test_input_and_label_are_linked() {
        let label = label("Name?");
        let input = input("Ada");

        assert_eq!(label.attributes.get("for").map(String::as_str), Some(INPUT_ID));
        assert_eq!(input.attributes.get("id").map(String::as_str), Some(INPUT_ID));
        assert_eq!(input.value.as_deref(), Some("Ada"));
        assert_eq!(label.text.as_deref(), Some("Name?"));
    }
}
