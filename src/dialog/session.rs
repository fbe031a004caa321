//! One modal lifecycle, from building its elements to tearing them down
//!
//! A session moves strictly through `Building → Open → Closing → Closed`.
//! It owns every element and listener it creates on the surface and releases
//! all of them in the same call that completes its response.

use super::{
    classifier::{classify, InteractionKind, RawInteraction},
    parts,
    resolver::{resolve_value, CANCEL_LABEL, OK_LABEL},
    response::ResponseChannel,
    types::{DialogError, DialogId, DialogRequest, DialogResult, DialogState, DialogValue},
};
use crate::surface::{
    ElementId, ElementSpec, ListenTarget, ListenerId, SurfaceError, UiSurface, CLOSE_ATTR,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Elements created for one dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionElements {
    pub container: ElementId,
    pub backdrop: ElementId,
    pub description: ElementId,
    pub label: ElementId,
    pub input: Option<ElementId>,
    pub actions: ElementId,
    pub ok: ElementId,
    pub cancel: Option<ElementId>,
}

impl SessionElements {
    /// Every owned element, top-level ones first
    pub fn all(&self) -> Vec<ElementId> {
        let mut all = vec![self.container, self.backdrop, self.description, self.label];
        all.extend(self.input);
        all.push(self.actions);
        all.push(self.ok);
        all.extend(self.cancel);
        all
    }

    /// Controls whose activation closes the dialog
    pub fn closers(&self) -> Vec<ElementId> {
        std::iter::once(self.ok).chain(self.cancel).collect()
    }
}

/// A dialog on screen together with its pending response
#[derive(Debug)]
pub struct DialogSession {
    id: DialogId,
    request: DialogRequest,
    state: DialogState,
    channel: ResponseChannel,
    elements: SessionElements,
    listeners: Vec<(ListenTarget, ListenerId)>,
    opened_at: Instant,
}

impl DialogSession {
    /// Build the dialog on `surface` and start listening for interactions
    pub fn open<S>(request: DialogRequest, surface: &mut S) -> DialogResult<Self>
    where
        S: UiSurface + ?Sized,
    {
        let id = DialogId::new();
        debug!(dialog_id = %id, dialog_type = %request.dialog_type, "Building dialog");

        let mut created = Vec::new();
        let elements = match build(&request, surface, &mut created) {
            Ok(elements) => elements,
            Err(e) => {
                for element in created.into_iter().rev() {
                    let _ = surface.remove(element);
                }
                return Err(e.into());
            }
        };

        focus_initial(&id, &elements, surface);

        let mut listeners = Vec::new();
        for closer in elements.closers() {
            let target = ListenTarget::Activation(closer);
            listeners.push((target, surface.listen(target)));
        }
        listeners.push((
            ListenTarget::DocumentKeyUp,
            surface.listen(ListenTarget::DocumentKeyUp),
        ));

        let mut session = Self {
            channel: ResponseChannel::new(id.clone()),
            id,
            request,
            state: DialogState::Building,
            elements,
            listeners,
            opened_at: Instant::now(),
        };
        session.transition(DialogState::Open)?;
        info!(
            dialog_id = %session.id,
            dialog_type = %session.request.dialog_type,
            "Dialog opened"
        );

        Ok(session)
    }

    pub fn id(&self) -> &DialogId {
        &self.id
    }

    pub fn request(&self) -> &DialogRequest {
        &self.request
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn elements(&self) -> &SessionElements {
        &self.elements
    }

    /// Handle on the response, for callers to await
    pub fn channel(&self) -> ResponseChannel {
        self.channel.clone()
    }

    /// Time since the dialog opened
    pub fn elapsed(&self) -> Duration {
        self.opened_at.elapsed()
    }

    /// Whether an interaction reaches this session's handler
    pub fn accepts<S>(&self, interaction: &RawInteraction, surface: &S) -> bool
    where
        S: UiSurface + ?Sized,
    {
        self.listeners.iter().any(|(target, listener)| {
            let matches = match (target, interaction.kind) {
                (ListenTarget::Activation(control), InteractionKind::Click) => {
                    interaction.source == Some(*control)
                }
                (ListenTarget::DocumentKeyUp, InteractionKind::KeyUp) => true,
                _ => false,
            };
            matches && surface.is_listening(*listener)
        })
    }

    /// The session's interaction handler.
    ///
    /// Returns `true` when this interaction closed the dialog. Interactions
    /// that do not close it, or arrive once it is closing, change nothing.
    pub fn handle<S>(&mut self, interaction: &RawInteraction, surface: &mut S) -> DialogResult<bool>
    where
        S: UiSurface + ?Sized,
    {
        if self.state != DialogState::Open {
            debug!(dialog_id = %self.id, state = ?self.state, "Ignoring interaction outside open state");
            return Ok(false);
        }
        if !self.accepts(interaction, surface) {
            return Ok(false);
        }

        let closer = interaction
            .source
            .and_then(|source| surface.attribute(source, CLOSE_ATTR));
        let classified = classify(interaction, closer.as_deref());
        if !classified.should_close {
            return Ok(false);
        }

        self.transition(DialogState::Closing)?;
        let input = self
            .elements
            .input
            .and_then(|input| surface.input_value(input));
        let value = resolve_value(self.request.dialog_type, &classified, input.as_deref());
        debug!(
            dialog_id = %self.id,
            control = ?classified.closing_control,
            via_enter = classified.closed_via_enter,
            "Closing interaction"
        );

        self.finish(value, surface);
        Ok(true)
    }

    /// Close the dialog with an explicit value, e.g. on timeout
    pub fn close_with<S>(&mut self, value: DialogValue, surface: &mut S) -> DialogResult<()>
    where
        S: UiSurface + ?Sized,
    {
        self.transition(DialogState::Closing)?;
        self.finish(value, surface);
        Ok(())
    }

    /// Owned elements still attached to the surface
    pub fn leaked<S>(&self, surface: &S) -> Vec<ElementId>
    where
        S: UiSurface + ?Sized,
    {
        self.elements
            .all()
            .into_iter()
            .filter(|element| surface.contains(*element))
            .collect()
    }

    fn finish<S>(&mut self, value: DialogValue, surface: &mut S)
    where
        S: UiSurface + ?Sized,
    {
        if let Err(e) = self.channel.complete(value.clone()) {
            warn!(dialog_id = %self.id, "Dialog completed twice: {}", e);
        }

        let failures = self.teardown(surface);
        self.state = DialogState::Closed;
        info!(dialog_id = %self.id, %value, failures, "Dialog closed");
    }

    /// Unregister listeners, then detach elements. Keeps going past failures
    /// and returns how many steps failed.
    fn teardown<S>(&mut self, surface: &mut S) -> usize
    where
        S: UiSurface + ?Sized,
    {
        let mut failures = 0;

        for (target, listener) in self.listeners.drain(..) {
            if let Err(e) = surface.unlisten(listener) {
                warn!(dialog_id = %self.id, ?target, "Failed to remove listener: {}", e);
                failures += 1;
            }
        }

        // The container's subtree goes with it; the rest only matters when
        // something moved or already dropped an element.
        for element in self.elements.all() {
            match surface.remove(element) {
                Ok(()) => {}
                Err(SurfaceError::NotFound(_)) if !self.is_top_level(element) => {}
                Err(e) => {
                    warn!(dialog_id = %self.id, %element, "Failed to remove element: {}", e);
                    failures += 1;
                }
            }
        }

        failures
    }

    fn is_top_level(&self, element: ElementId) -> bool {
        element == self.elements.container || element == self.elements.backdrop
    }

    fn transition(&mut self, next: DialogState) -> DialogResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(DialogError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(dialog_id = %self.id, from = ?self.state, to = ?next, "Dialog state transition");
        self.state = next;
        Ok(())
    }
}

impl Drop for DialogSession {
    fn drop(&mut self) {
        if self.state != DialogState::Closed {
            warn!(dialog_id = %self.id, "Dialog dropped while {:?}", self.state);
            self.channel.abandon();
        }
    }
}

fn build<S>(
    request: &DialogRequest,
    surface: &mut S,
    created: &mut Vec<ElementId>,
) -> Result<SessionElements, SurfaceError>
where
    S: UiSurface + ?Sized,
{
    let mut make = |surface: &mut S, spec: ElementSpec| -> ElementId {
        let id = surface.create(spec);
        created.push(id);
        id
    };

    let container = make(surface, parts::container());
    let description = make(surface, parts::description());
    let label = make(surface, parts::label(&request.message));
    let input = if request.dialog_type.has_input() {
        let value = request.default_value.as_deref().unwrap_or_default();
        Some(make(surface, parts::input(value)))
    } else {
        None
    };
    let ok = make(surface, parts::button(OK_LABEL));
    let cancel = if request.dialog_type.has_cancel() {
        Some(make(surface, parts::button(CANCEL_LABEL)))
    } else {
        None
    };
    let actions = make(surface, parts::actions());
    let backdrop = make(surface, parts::backdrop());

    surface.append(container, description)?;
    surface.append(container, label)?;
    if let Some(input) = input {
        surface.append(container, input)?;
    }
    surface.append(actions, ok)?;
    if let Some(cancel) = cancel {
        surface.append(actions, cancel)?;
    }
    surface.append(container, actions)?;

    surface.insert_root_front(backdrop)?;
    surface.insert_root_front(container)?;

    Ok(SessionElements {
        container,
        backdrop,
        description,
        label,
        input,
        actions,
        ok,
        cancel,
    })
}

/// Prompt focuses its input with the text selected, the others the container.
/// A surface without focus support still gets a working dialog.
fn focus_initial<S>(id: &DialogId, elements: &SessionElements, surface: &mut S)
where
    S: UiSurface + ?Sized,
{
    let target = match elements.input {
        Some(input) => {
            if let Err(e) = surface.select_all(input) {
                debug!(dialog_id = %id, "Input selection unavailable: {}", e);
            }
            input
        }
        None => elements.container,
    };

    if let Err(e) = surface.focus(target) {
        warn!(dialog_id = %id, "Proceeding without focus: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::classifier::Key;
    use crate::surface::Document;

    fn open(request: DialogRequest, doc: &mut Document) -> DialogSession {
        DialogSession::open(request, doc).unwrap()
    }

    #[test]
    fn test_open_builds_confirm_dialog() {
        let mut doc = Document::new();
        let session = open(DialogRequest::confirm("Delete?"), &mut doc);
        let elements = session.elements().clone();

        assert_eq!(session.state(), DialogState::Open);
        assert_eq!(doc.root_children(), &[elements.container, elements.backdrop]);
        assert_eq!(doc.focused(), Some(elements.container));
        assert_eq!(elements.input, None);
        assert!(elements.cancel.is_some());
        assert_eq!(doc.text(elements.label), Some("Delete?"));
        assert_eq!(doc.children(elements.actions), &[elements.ok, elements.cancel.unwrap()]);
        assert_eq!(doc.listener_count(), 3);
    }

    #[test]
    fn test_alert_has_only_ok() {
        let mut doc = Document::new();
        let session = open(DialogRequest::alert("Saved"), &mut doc);

        assert_eq!(session.elements().cancel, None);
        assert_eq!(session.elements().closers(), vec![session.elements().ok]);
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn test_prompt_focuses_selected_input() {
        let mut doc = Document::new();
        let session = open(DialogRequest::prompt("Name", "Ada"), &mut doc);
        let input = session.elements().input.unwrap();

        assert_eq!(doc.focused(), Some(input));
        assert_eq!(doc.selected(), Some(input));
        assert_eq!(doc.input_value(input).as_deref(), Some("Ada"));
    }

    #[test]
    fn test_non_closing_interactions_leave_session_open() {
        let mut doc = Document::new();
        let mut session = open(DialogRequest::prompt("Name", ""), &mut doc);
        let input = session.elements().input.unwrap();
        let label = session.elements().label;

        let interactions = [
            RawInteraction::key_up(Key::from_code("KeyA"), Some(input)),
            RawInteraction::key_up(Key::Space, Some(input)),
            RawInteraction::click(input),
            RawInteraction::click(label),
        ];
        for interaction in &interactions {
            assert!(!session.handle(interaction, &mut doc).unwrap());
        }

        assert_eq!(session.state(), DialogState::Open);
        assert!(!session.channel().is_done());
        assert!(session.leaked(&doc).len() >= 7);
    }

    #[test]
    fn test_closing_tears_everything_down() {
        let mut doc = Document::new();
        let mut session = open(DialogRequest::confirm("Proceed?"), &mut doc);
        let cancel = session.elements().cancel.unwrap();

        assert!(session.handle(&RawInteraction::click(cancel), &mut doc).unwrap());

        assert_eq!(session.state(), DialogState::Closed);
        assert_eq!(session.channel().response().value, DialogValue::Bool(false));
        assert!(session.leaked(&doc).is_empty());
        assert_eq!(doc.element_count(), 0);
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn test_handler_is_inert_after_close() {
        let mut doc = Document::new();
        let mut session = open(DialogRequest::confirm("Proceed?"), &mut doc);
        let ok = session.elements().ok;
        let cancel = session.elements().cancel.unwrap();

        assert!(session.handle(&RawInteraction::click(ok), &mut doc).unwrap());
        assert!(!session.accepts(&RawInteraction::click(cancel), &doc));
        assert!(!session.handle(&RawInteraction::click(cancel), &mut doc).unwrap());
        assert!(!session
            .handle(&RawInteraction::key_up(Key::Escape, None), &mut doc)
            .unwrap());

        assert_eq!(session.channel().response().value, DialogValue::Bool(true));
    }

    #[test]
    fn test_space_on_focused_button_acts_as_click() {
        let mut doc = Document::new();
        let mut session = open(DialogRequest::prompt("Name", "Ada"), &mut doc);
        let ok = session.elements().ok;
        doc.focus(ok).unwrap();

        let closed = session
            .handle(&RawInteraction::key_up(Key::Space, doc.focused()), &mut doc)
            .unwrap();

        assert!(closed);
        assert_eq!(
            session.channel().response().value,
            DialogValue::Text("Ada".to_string())
        );
    }

    #[test]
    fn test_prompt_reads_edited_input() {
        let mut doc = Document::new();
        let mut session = open(DialogRequest::prompt("Name", ""), &mut doc);
        let input = session.elements().input.unwrap();
        doc.set_input_value(input, "Grace").unwrap();

        session
            .handle(&RawInteraction::key_up(Key::Enter, Some(input)), &mut doc)
            .unwrap();

        assert_eq!(
            session.channel().response().value,
            DialogValue::Text("Grace".to_string())
        );
    }

    #[test]
    fn test_teardown_survives_detached_elements() {
        let mut doc = Document::new();
        let mut session = open(DialogRequest::alert("Saved"), &mut doc);
        let backdrop = session.elements().backdrop;
        doc.remove(backdrop).unwrap();

        let closed = session
            .handle(&RawInteraction::key_up(Key::Escape, None), &mut doc)
            .unwrap();

        assert!(closed);
        assert_eq!(session.state(), DialogState::Closed);
        assert_eq!(session.channel().response().value, DialogValue::Undefined);
        assert_eq!(doc.element_count(), 0);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_open_without_focus_support() {
        let mut doc = Document::without_focus();
        let mut session = open(DialogRequest::confirm("Delete?"), &mut doc);

        assert_eq!(session.state(), DialogState::Open);
        assert_eq!(doc.focused(), None);
        session
            .handle(&RawInteraction::key_up(Key::Enter, None), &mut doc)
            .unwrap();
        assert_eq!(session.channel().response().value, DialogValue::Bool(true));
    }

    #[test]
    fn test_close_with_requires_open_state() {
        let mut doc = Document::new();
        let mut session = open(DialogRequest::confirm("Delete?"), &mut doc);

        session.close_with(DialogValue::Null, &mut doc).unwrap();
        let again = session.close_with(DialogValue::Bool(true), &mut doc);

        assert_eq!(
            again,
            Err(DialogError::InvalidTransition {
                from: DialogState::Closed,
                to: DialogState::Closing,
            })
        );
        assert_eq!(session.channel().response().value, DialogValue::Null);
    }

    #[tokio::test]
    async fn test_dropping_open_session_abandons_waiters() {
        let mut doc = Document::new();
        let session = open(DialogRequest::alert("bye"), &mut doc);
        let channel = session.channel();
        let id = session.id().clone();

        drop(session);

        assert_eq!(channel.wait().await, Err(DialogError::Abandoned(id)));
    }
}
