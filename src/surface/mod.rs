//! UI surface abstraction
//!
//! The modal core never draws anything itself. It talks to a retained tree of
//! elements through the [`UiSurface`] trait: it creates and inserts elements
//! while a dialog is being built, registers listeners, and removes everything
//! again when the dialog closes. The headless [`Document`] implements the trait
//! for tests and is wrapped by the terminal surface for real rendering.

pub mod document;

pub use document::Document;

use std::collections::BTreeMap;

/// Attribute designating a control whose activation closes the dialog.
/// The attribute value is the control's label ("OK", "Cancel").
pub const CLOSE_ATTR: &str = "data-close-dialog";

/// Handle to an element living on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Kinds of elements a dialog is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// The dialog container
    Dialog,
    /// Screen-covering underlay behind the dialog
    Backdrop,
    /// Message label
    Label,
    /// Hidden description used by assistive technology
    Paragraph,
    /// Multi-line text input
    TextArea,
    /// Row holding the action buttons
    Actions,
    /// Push button
    Button,
}

impl ElementKind {
    /// Whether elements of this kind can take keyboard focus
    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Dialog | Self::TextArea | Self::Button)
    }
}

/// Description of an element to create
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub kind: ElementKind,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub value: Option<String>,
}

impl ElementSpec {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            text: None,
            value: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// What a listener is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    /// Click or activation of a specific control
    Activation(ElementId),
    /// Key releases anywhere on the surface
    DocumentKeyUp,
}

/// Result type for surface operations
pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// Surface-level failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("Element {0} not found")]
    NotFound(ElementId),

    #[error("Element {0} is not attached to the surface")]
    Detached(ElementId),

    #[error("Surface does not support {0}")]
    Unsupported(&'static str),

    #[error("Listener {0:?} is not registered")]
    UnknownListener(ListenerId),
}

/// Operations the modal core needs from whatever presents it
pub trait UiSurface {
    /// Create a detached element
    fn create(&mut self, spec: ElementSpec) -> ElementId;

    /// Append `child` as the last child of `parent`
    fn append(&mut self, parent: ElementId, child: ElementId) -> SurfaceResult<()>;

    /// Insert `child` as the first child of the surface root
    fn insert_root_front(&mut self, child: ElementId) -> SurfaceResult<()>;

    /// Detach and drop an element together with its subtree. An element that
    /// was no longer attached is dropped too and reported as `Detached`.
    fn remove(&mut self, id: ElementId) -> SurfaceResult<()>;

    /// Whether the element is currently attached to the root
    fn contains(&self, id: ElementId) -> bool;

    /// Move keyboard focus to an element
    fn focus(&mut self, id: ElementId) -> SurfaceResult<()>;

    /// Element currently holding focus
    fn focused(&self) -> Option<ElementId>;

    /// Select the whole content of a text input
    fn select_all(&mut self, id: ElementId) -> SurfaceResult<()> {
        let _ = id;
        Err(SurfaceError::Unsupported("text selection"))
    }

    /// Current content of a text input
    fn input_value(&self, id: ElementId) -> Option<String>;

    /// Attribute value of an element
    fn attribute(&self, id: ElementId, name: &str) -> Option<String>;

    /// Register a listener
    fn listen(&mut self, target: ListenTarget) -> ListenerId;

    /// Unregister a listener
    fn unlisten(&mut self, listener: ListenerId) -> SurfaceResult<()>;

    /// Whether a listener is still registered
    fn is_listening(&self, listener: ListenerId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_spec_builder() {
        let spec = ElementSpec::new(ElementKind::Button)
            .with_attribute(CLOSE_ATTR, "OK")
            .with_text("OK");

        assert_eq!(spec.kind, ElementKind::Button);
        assert_eq!(spec.attributes.get(CLOSE_ATTR).map(String::as_str), Some("OK"));
        assert_eq!(spec.text.as_deref(), Some("OK"));
        assert!(spec.value.is_none());
    }

    #[test]
    fn test_focusable_kinds() {
        assert!(ElementKind::Dialog.is_focusable());
        assert!(ElementKind::Button.is_focusable());
        assert!(ElementKind::TextArea.is_focusable());
        assert!(!ElementKind::Backdrop.is_focusable());
        assert!(!ElementKind::Label.is_focusable());
    }
}
