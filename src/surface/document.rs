//! Headless retained element tree
//!
//! `Document` keeps elements, their attachment to a single root, keyboard focus
//! and registered listeners. It renders nothing; the terminal surface wraps it
//! and draws whatever is attached.

use super::{
    ElementId, ElementKind, ElementSpec, ListenTarget, ListenerId, SurfaceError, SurfaceResult,
    UiSurface,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Node {
    spec: ElementSpec,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// In-memory UI surface
#[derive(Debug, Default)]
pub struct Document {
    nodes: HashMap<ElementId, Node>,
    /// Top-level elements, front to back
    root: Vec<ElementId>,
    focus: Option<ElementId>,
    selection: Option<ElementId>,
    listeners: HashMap<ListenerId, ListenTarget>,
    next_element: u64,
    next_listener: u64,
    focus_disabled: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document without focus support, for surfaces that cannot move focus
    pub fn without_focus() -> Self {
        Self {
            focus_disabled: true,
            ..Self::default()
        }
    }

    /// Top-level elements, front to back
    pub fn root_children(&self) -> &[ElementId] {
        &self.root
    }

    /// Children of an element
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.nodes.get(&id).map(|node| node.spec.kind)
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(&id).and_then(|node| node.spec.text.as_deref())
    }

    /// Overwrite the content of a text input, as typing would
    pub fn set_input_value(&mut self, id: ElementId, value: impl Into<String>) -> SurfaceResult<()> {
        let node = self.nodes.get_mut(&id).ok_or(SurfaceError::NotFound(id))?;
        node.spec.value = Some(value.into());
        Ok(())
    }

    /// Element whose content was last selected
    pub fn selected(&self) -> Option<ElementId> {
        self.selection
    }

    /// Number of elements alive on the surface, attached or not
    pub fn element_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Target of a registered listener
    pub fn listener_target(&self, listener: ListenerId) -> Option<ListenTarget> {
        self.listeners.get(&listener).copied()
    }

    /// Attached elements in document order (depth first, front to back)
    pub fn walk(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.root.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Focusable attached elements in document order
    pub fn focus_order(&self) -> Vec<ElementId> {
        self.walk()
            .into_iter()
            .filter(|id| self.kind(*id).map_or(false, |kind| kind.is_focusable()))
            .collect()
    }

    fn is_attached(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            match self.nodes.get(&current) {
                Some(node) => match node.parent {
                    Some(parent) => current = parent,
                    None => return self.root.contains(&current),
                },
                None => return false,
            }
        }
    }

    fn detach(&mut self, id: ElementId) {
        let parent = self.nodes.get(&id).and_then(|node| node.parent);
        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.retain(|child| *child != id);
                }
            }
            None => self.root.retain(|child| *child != id),
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
    }

    fn drop_subtree(&mut self, id: ElementId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
            if self.focus == Some(current) {
                self.focus = None;
            }
            if self.selection == Some(current) {
                self.selection = None;
            }
        }
    }
}

impl UiSurface for Document {
    fn create(&mut self, spec: ElementSpec) -> ElementId {
        self.next_element += 1;
        let id = ElementId(self.next_element);
        self.nodes.insert(
            id,
            Node {
                spec,
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    fn append(&mut self, parent: ElementId, child: ElementId) -> SurfaceResult<()> {
        if !self.nodes.contains_key(&parent) {
            return Err(SurfaceError::NotFound(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(SurfaceError::NotFound(child));
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    fn insert_root_front(&mut self, child: ElementId) -> SurfaceResult<()> {
        if !self.nodes.contains_key(&child) {
            return Err(SurfaceError::NotFound(child));
        }
        self.detach(child);
        self.root.insert(0, child);
        Ok(())
    }

    fn remove(&mut self, id: ElementId) -> SurfaceResult<()> {
        if !self.nodes.contains_key(&id) {
            return Err(SurfaceError::NotFound(id));
        }
        // A detached subtree is still discarded so nothing lingers in the store
        let attached = self.is_attached(id);
        self.detach(id);
        self.drop_subtree(id);
        if attached {
            Ok(())
        } else {
            Err(SurfaceError::Detached(id))
        }
    }

    fn contains(&self, id: ElementId) -> bool {
        self.is_attached(id)
    }

    fn focus(&mut self, id: ElementId) -> SurfaceResult<()> {
        if self.focus_disabled {
            return Err(SurfaceError::Unsupported("focus"));
        }
        if !self.nodes.contains_key(&id) {
            return Err(SurfaceError::NotFound(id));
        }
        if !self.is_attached(id) {
            return Err(SurfaceError::Detached(id));
        }
        self.focus = Some(id);
        Ok(())
    }

    fn focused(&self) -> Option<ElementId> {
        self.focus
    }

    fn select_all(&mut self, id: ElementId) -> SurfaceResult<()> {
        match self.kind(id) {
            Some(ElementKind::TextArea) => {
                self.selection = Some(id);
                Ok(())
            }
            Some(_) => Err(SurfaceError::Unsupported("selection outside text inputs")),
            None => Err(SurfaceError::NotFound(id)),
        }
    }

    fn input_value(&self, id: ElementId) -> Option<String> {
        self.nodes.get(&id).and_then(|node| node.spec.value.clone())
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.nodes
            .get(&id)
            .and_then(|node| node.spec.attributes.get(name).cloned())
    }

    fn listen(&mut self, target: ListenTarget) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, target);
        id
    }

    fn unlisten(&mut self, listener: ListenerId) -> SurfaceResult<()> {
        self.listeners
            .remove(&listener)
            .map(|_| ())
            .ok_or(SurfaceError::UnknownListener(listener))
    }

    fn is_listening(&self, listener: ListenerId) -> bool {
        self.listeners.contains_key(&listener)
    }
}
