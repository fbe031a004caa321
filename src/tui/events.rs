use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Terminal events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Bracketed paste
    Paste(String),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,
}

/// Event handler reading terminal input on a blocking worker
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,

    /// Tick interval for periodic events
    tick_interval: Duration,

    /// Stops the reader once the handler is dropped
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            tick_interval,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start reading terminal events
    pub fn start(&self) {
        let sender = self.sender.clone();
        let stop = self.stop.clone();
        let poll_interval = self.tick_interval.min(Duration::from_millis(50));

        tokio::task::spawn_blocking(move || {
            while !stop.load(Ordering::Relaxed) {
                match crossterm::event::poll(poll_interval) {
                    Ok(true) => match crossterm::event::read() {
                        Ok(event) => {
                            let Some(event) = convert_crossterm_event(event) else {
                                continue;
                            };
                            if sender.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Failed to read terminal event: {}", e);
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Failed to poll terminal events: {}", e);
                        break;
                    }
                }
            }
            debug!("Terminal event reader stopped");
        });
    }

    /// Get the next event, or a tick when input is quiet
    pub async fn next(&mut self) -> Option<Event> {
        tokio::select! {
            event = self.receiver.recv() => event,
            _ = tokio::time::sleep(self.tick_interval) => Some(Event::Tick),
        }
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Convert crossterm events to surface events. Terminals report key presses,
/// which stand in for key releases; explicit releases are dropped so a key is
/// never seen twice.
fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Release => None,
        CrosstermEvent::Key(key_event) => Some(Event::Key(key_event)),
        CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        CrosstermEvent::Paste(text) => Some(Event::Paste(text)),
        CrosstermEvent::FocusGained | CrosstermEvent::FocusLost => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn test_key_releases_are_dropped() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        let press = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);

        assert!(convert_crossterm_event(CrosstermEvent::Key(release)).is_none());
        assert!(matches!(
            convert_crossterm_event(CrosstermEvent::Key(press)),
            Some(Event::Key(_))
        ));
        assert!(convert_crossterm_event(CrosstermEvent::FocusLost).is_none());
    }

    #[tokio::test]
    async fn test_next_ticks_when_idle() {
        let mut handler = EventHandler::new(Duration::from_millis(5));
        assert!(matches!(handler.next().await, Some(Event::Tick)));

        handler.sender().send(Event::Resize(80, 24)).unwrap();
        assert!(matches!(handler.next().await, Some(Event::Resize(80, 24))));
    }
}
