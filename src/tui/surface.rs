//! Terminal rendition of the dialog surface
//!
//! `TerminalSurface` keeps the element tree in a [`Document`] and draws it with
//! ratatui every frame. Crossterm input is translated into raw interactions;
//! editing keys go to the focused text area first and Enter on a focused
//! button presses it, the way a browser applies default behavior before
//! handlers run.

use super::{
    events::Event,
    keys::KeyMap,
    styles::Theme,
    utils::layout::{button_row, centered_rect, wrapped_height},
    Frame,
};
use crate::dialog::{Key, RawInteraction};
use crate::surface::{
    Document, ElementId, ElementKind, ElementSpec, ListenTarget, ListenerId, SurfaceResult,
    UiSurface, CLOSE_ATTR,
};
use crossterm::event::{KeyEventKind, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::collections::HashMap;
use tracing::debug;
use tui_textarea::{Input, TextArea};

const INPUT_HEIGHT: u16 = 5;
const BUTTON_HEIGHT: u16 = 3;

/// Dialog surface drawn on the terminal
pub struct TerminalSurface {
    document: Document,
    editors: HashMap<ElementId, TextArea<'static>>,
    /// Clickable regions recorded during the last render
    hit_areas: Vec<(ElementId, Rect)>,
    theme: Theme,
    key_map: KeyMap,
    width_percent: u16,
    mouse_enabled: bool,
}

impl TerminalSurface {
    pub fn new(theme: Theme, width_percent: u16, mouse_enabled: bool) -> Self {
        Self {
            document: Document::new(),
            editors: HashMap::new(),
            hit_areas: Vec::new(),
            theme,
            key_map: KeyMap::default(),
            width_percent: width_percent.clamp(20, 100),
            mouse_enabled,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Apply default surface behavior for an event and report the
    /// interaction the dialog handler should see, if any
    pub fn translate(&mut self, event: &Event) -> Option<RawInteraction> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if self.key_map.focus_next.matches(key) {
                    self.cycle_focus(true);
                } else if self.key_map.focus_prev.matches(key) {
                    self.cycle_focus(false);
                }

                let normalized = self.key_map.key_of(key);
                let editable = !matches!(normalized, Key::Escape | Key::Enter)
                    && !self.key_map.focus_next.matches(key)
                    && !self.key_map.focus_prev.matches(key);
                if editable {
                    if let Some(id) = self.focused_editor() {
                        self.edit(id, |editor| {
                            editor.input(Input::from(*key));
                        });
                    }
                }

                let focused = self.document.focused();
                // Enter activates a focused closing control
                if let (Key::Enter, Some(control)) = (&normalized, focused) {
                    if self.document.attribute(control, CLOSE_ATTR).is_some() {
                        return Some(RawInteraction::click(control));
                    }
                }

                Some(RawInteraction::key_up(normalized, focused))
            }
            Event::Mouse(mouse) if self.mouse_enabled => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    let target = self.hit_test(mouse.column, mouse.row)?;
                    if let Err(e) = self.document.focus(target) {
                        debug!(%target, "Click target not focusable: {}", e);
                    }
                    Some(RawInteraction::click(target))
                }
                _ => None,
            },
            Event::Paste(text) => {
                let id = self.focused_editor()?;
                self.edit(id, |editor| {
                    editor.insert_str(text);
                });
                None
            }
            _ => None,
        }
    }

    /// Draw every attached element, back to front
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        self.hit_areas.clear();

        let layers: Vec<ElementId> = self.document.root_children().iter().rev().copied().collect();
        for id in layers {
            match self.document.kind(id) {
                Some(ElementKind::Backdrop) => {
                    frame.render_widget(Clear, area);
                    frame.render_widget(Block::default().style(self.theme.backdrop_style()), area);
                }
                Some(ElementKind::Dialog) => self.render_dialog(frame, id, area),
                _ => {}
            }
        }
    }

    fn render_dialog(&mut self, frame: &mut Frame, dialog: ElementId, area: Rect) {
        let focused = self.document.focused();
        let width = (u32::from(area.width) * u32::from(self.width_percent) / 100) as u16;
        let inner_width = width.saturating_sub(2);

        let mut label = None;
        let mut input = None;
        let mut buttons = Vec::new();
        for child in self.document.children(dialog) {
            match self.document.kind(*child) {
                Some(ElementKind::Label) => label = Some(*child),
                Some(ElementKind::TextArea) => input = Some(*child),
                Some(ElementKind::Actions) => buttons.extend_from_slice(self.document.children(*child)),
                _ => {}
            }
        }

        let message = label
            .and_then(|id| self.document.text(id))
            .unwrap_or_default()
            .to_string();
        let label_height = wrapped_height(&message, inner_width);
        let input_height = if input.is_some() { INPUT_HEIGHT } else { 0 };
        let height = label_height
            .saturating_add(input_height)
            .saturating_add(BUTTON_HEIGHT)
            .saturating_add(1 + 2);

        let dialog_area = centered_rect(width, height, area);
        frame.render_widget(Clear, dialog_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(focused == Some(dialog)))
            .style(self.theme.base_style());
        let content = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(label_height),
                Constraint::Length(input_height),
                Constraint::Length(BUTTON_HEIGHT),
                Constraint::Length(1),
            ])
            .split(content);

        frame.render_widget(
            Paragraph::new(message)
                .style(self.theme.base_style())
                .wrap(Wrap { trim: false }),
            chunks[0],
        );

        if let Some(id) = input {
            self.render_input(frame, id, focused == Some(id), chunks[1]);
        }

        let labels: Vec<String> = buttons
            .iter()
            .map(|id| self.document.text(*id).unwrap_or_default().to_string())
            .collect();
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let rects = button_row(&label_refs, chunks[2]);
        for ((id, label), rect) in buttons.iter().zip(&labels).zip(rects) {
            if rect.is_empty() {
                continue;
            }
            let primary = self.document.attribute(*id, "data-primary").is_some();
            let style = self.theme.button_style(primary, focused == Some(*id));
            frame.render_widget(
                Paragraph::new(label.as_str())
                    .style(style)
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL).style(style)),
                rect,
            );
            self.hit_areas.push((*id, rect));
        }

        frame.render_widget(
            Paragraph::new(self.key_map.help_text())
                .style(self.theme.help_style())
                .alignment(Alignment::Center),
            chunks[3],
        );
    }

    fn render_input(&mut self, frame: &mut Frame, id: ElementId, focused: bool, area: Rect) {
        if area.is_empty() {
            return;
        }
        let border = self.theme.border_style(focused);
        let selection = self.theme.selection_style();
        let placeholder = self.theme.placeholder_style();
        if let Some(editor) = self.editors.get_mut(&id) {
            editor.set_block(Block::default().borders(Borders::ALL).border_style(border));
            editor.set_selection_style(selection);
            editor.set_placeholder_style(placeholder);
            frame.render_widget(editor.widget(), area);
        }
        self.hit_areas.push((id, area));
    }

    fn hit_test(&self, column: u16, row: u16) -> Option<ElementId> {
        self.hit_areas
            .iter()
            .rev()
            .find(|(_, rect)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(id, _)| *id)
    }

    fn focused_editor(&self) -> Option<ElementId> {
        self.document
            .focused()
            .filter(|id| self.editors.contains_key(id))
    }

    fn edit(&mut self, id: ElementId, apply: impl FnOnce(&mut TextArea<'static>)) {
        if let Some(editor) = self.editors.get_mut(&id) {
            apply(editor);
            let value = editor.lines().join("\n");
            let _ = self.document.set_input_value(id, value);
        }
    }

    /// Move focus among inputs and buttons, skipping the container
    fn cycle_focus(&mut self, forward: bool) {
        let order: Vec<ElementId> = self
            .document
            .focus_order()
            .into_iter()
            .filter(|id| self.document.kind(*id) != Some(ElementKind::Dialog))
            .collect();
        if order.is_empty() {
            return;
        }

        let position = self
            .document
            .focused()
            .and_then(|current| order.iter().position(|id| *id == current));
        let next = match (position, forward) {
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
            (None, true) => 0,
            (None, false) => order.len() - 1,
        };
        let _ = self.document.focus(order[next]);
    }
}

impl UiSurface for TerminalSurface {
    fn create(&mut self, spec: ElementSpec) -> ElementId {
        let editor = (spec.kind == ElementKind::TextArea).then(|| {
            let value = spec.value.clone().unwrap_or_default();
            let mut editor = TextArea::from(value.split('\n').map(str::to_string));
            editor.move_cursor(tui_textarea::CursorMove::Bottom);
            editor.move_cursor(tui_textarea::CursorMove::End);
            editor
        });

        let id = self.document.create(spec);
        if let Some(editor) = editor {
            self.editors.insert(id, editor);
        }
        id
    }

    fn append(&mut self, parent: ElementId, child: ElementId) -> SurfaceResult<()> {
        self.document.append(parent, child)
    }

    fn insert_root_front(&mut self, child: ElementId) -> SurfaceResult<()> {
        self.document.insert_root_front(child)
    }

    fn remove(&mut self, id: ElementId) -> SurfaceResult<()> {
        let result = self.document.remove(id);
        let document = &self.document;
        self.editors.retain(|id, _| document.kind(*id).is_some());
        self.hit_areas.retain(|(id, _)| document.kind(*id).is_some());
        result
    }

    fn contains(&self, id: ElementId) -> bool {
        self.document.contains(id)
    }

    fn focus(&mut self, id: ElementId) -> SurfaceResult<()> {
        self.document.focus(id)
    }

    fn focused(&self) -> Option<ElementId> {
        self.document.focused()
    }

    fn select_all(&mut self, id: ElementId) -> SurfaceResult<()> {
        self.document.select_all(id)?;
        if let Some(editor) = self.editors.get_mut(&id) {
            editor.select_all();
        }
        Ok(())
    }

    fn input_value(&self, id: ElementId) -> Option<String> {
        self.document.input_value(id)
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.document.attribute(id, name)
    }

    fn listen(&mut self, target: ListenTarget) -> ListenerId {
        self.document.listen(target)
    }

    fn unlisten(&mut self, listener: ListenerId) -> SurfaceResult<()> {
        self.document.unlisten(listener)
    }

    fn is_listening(&self, listener: ListenerId) -> bool {
        self.document.is_listening(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{DialogHost, DialogRequest, DialogValue};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn host() -> DialogHost<TerminalSurface> {
        DialogHost::new(TerminalSurface::new(Theme::dark(), 60, true))
    }

    fn send(host: &mut DialogHost<TerminalSurface>, event: Event) -> bool {
        match host.surface_mut().translate(&event) {
            Some(interaction) => host.dispatch(&interaction).unwrap(),
            None => false,
        }
    }

    fn draw(host: &mut DialogHost<TerminalSurface>) -> Terminal<TestBackend> {
        draw_sized(host, 80, 24)
    }

    fn draw_sized(
        host: &mut DialogHost<TerminalSurface>,
        width: u16,
        height: u16,
    ) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| host.surface_mut().render(frame))
            .unwrap();
        terminal
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_typing_edits_prompt_input() {
        let mut host = host();
        let channel = host.open(DialogRequest::prompt("Name", "")).unwrap();

        for c in ['A', 'd', 'a', ' ', 'L'] {
            assert!(!send(&mut host, key(KeyCode::Char(c))));
        }
        assert!(send(&mut host, key(KeyCode::Enter)));

        assert_eq!(channel.response().value, DialogValue::Text("Ada L".to_string()));
        assert_eq!(host.surface().document().element_count(), 0);
    }

    #[test]
    fn test_tab_then_space_presses_cancel() {
        let mut host = host();
        let channel = host.open(DialogRequest::confirm("Proceed?")).unwrap();

        // Container -> OK -> Cancel
        assert!(!send(&mut host, key(KeyCode::Tab)));
        assert!(!send(&mut host, key(KeyCode::Tab)));
        assert!(send(&mut host, key(KeyCode::Char(' '))));

        assert_eq!(channel.response().value, DialogValue::Bool(false));
    }

    #[test]
    fn test_enter_on_focused_cancel_presses_it() {
        let mut host = host();
        let channel = host.open(DialogRequest::confirm("Delete?")).unwrap();

        assert!(!send(&mut host, key(KeyCode::Tab)));
        assert!(!send(&mut host, key(KeyCode::Tab)));
        assert!(send(&mut host, key(KeyCode::Enter)));

        assert_eq!(channel.response().value, DialogValue::Bool(false));
    }

    #[test]
    fn test_enter_on_focused_cancel_cancels_prompt() {
        let mut host = host();
        let channel = host.open(DialogRequest::prompt("Name", "Ada")).unwrap();

        // Input -> OK -> Cancel
        assert!(!send(&mut host, key(KeyCode::Tab)));
        assert!(!send(&mut host, key(KeyCode::Tab)));
        assert!(send(&mut host, key(KeyCode::Enter)));

        assert_eq!(channel.response().value, DialogValue::Null);
    }

    #[test]
    fn test_enter_on_focused_ok_accepts() {
        let mut host = host();
        let channel = host.open(DialogRequest::confirm("Proceed?")).unwrap();

        assert!(!send(&mut host, key(KeyCode::Tab)));
        assert!(send(&mut host, key(KeyCode::Enter)));

        assert_eq!(channel.response().value, DialogValue::Bool(true));
    }

    #[test]
    fn test_escape_cancels_prompt() {
        let mut host = host();
        let channel = host.open(DialogRequest::prompt("Name", "x")).unwrap();

        assert!(send(&mut host, key(KeyCode::Esc)));
        assert_eq!(channel.response().value, DialogValue::Null);
    }

    #[test]
    fn test_render_shows_message_and_buttons() {
        let mut host = host();
        host.open(DialogRequest::confirm("Delete this item?")).unwrap();

        let terminal = draw(&mut host);
        let text = screen(&terminal);

        assert!(text.contains("Delete this item?"));
        assert!(text.contains("OK"));
        assert!(text.contains("Cancel"));
    }

    #[test]
    fn test_render_on_narrow_terminal() {
        let mut host = host();
        host.open(DialogRequest::confirm("Proceed?")).unwrap();
        draw_sized(&mut host, 20, 10);

        let area = Rect::new(0, 0, 20, 10);
        assert!(host
            .surface()
            .hit_areas
            .iter()
            .all(|(_, rect)| rect.right() <= area.right() && rect.bottom() <= area.bottom()));

        host.dismiss().unwrap();
        host.open(DialogRequest::prompt("Name", "Ada")).unwrap();
        draw_sized(&mut host, 8, 4);
    }

    #[test]
    fn test_render_huge_message() {
        let mut host = host();
        host.open(DialogRequest::alert("\n".repeat(70_000))).unwrap();

        draw(&mut host);

        assert!(!host.is_idle());
        assert!(send(&mut host, key(KeyCode::Enter)));
    }

    #[test]
    fn test_click_on_rendered_button() {
        let mut host = host();
        let channel = host.open(DialogRequest::confirm("Proceed?")).unwrap();
        draw(&mut host);

        let (_, ok_area) = host
            .surface()
            .hit_areas
            .iter()
            .copied()
            .find(|(id, _)| host.surface().document().text(*id) == Some("OK"))
            .unwrap();
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: ok_area.x + 1,
            row: ok_area.y + 1,
            modifiers: KeyModifiers::NONE,
        });

        assert!(send(&mut host, click));
        assert_eq!(channel.response().value, DialogValue::Bool(true));
    }

    #[test]
    fn test_click_outside_controls_is_ignored() {
        let mut host = host();
        host.open(DialogRequest::alert("Saved")).unwrap();
        draw(&mut host);

        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });

        assert!(!send(&mut host, click));
        assert!(!host.is_idle());
    }

    #[test]
    fn test_paste_goes_to_input() {
        let mut host = host();
        let channel = host.open(DialogRequest::prompt("Name", "")).unwrap();

        assert!(!send(&mut host, Event::Paste("Grace".to_string())));
        assert!(send(&mut host, key(KeyCode::Enter)));

        assert_eq!(channel.response().value, DialogValue::Text("Grace".to_string()));
    }
}
