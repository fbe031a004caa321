//! Terminal front end for the dialog host using ratatui

mod events;
mod keys;
mod styles;
mod surface;
mod utils;

pub use events::{Event, EventHandler};
pub use keys::KeyMap;
pub use styles::Theme;
pub use surface::TerminalSurface;

use crate::config::Config;
use crate::dialog::{facade, DialogHost, Dialogs};
use anyhow::{anyhow, Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::future::Future;
use std::io;
use std::time::Duration;
use tracing::{debug, info};

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Initialize the terminal for TUI mode
pub fn init_terminal(mouse: bool) -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>, mouse: bool) -> Result<()> {
    disable_raw_mode()?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Best-effort terminal reset for paths that have no `Terminal` handle,
/// such as the panic hook
pub fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen,
        crossterm::cursor::Show
    );
}

/// Run `app` while the terminal hosts its dialogs.
///
/// A process-wide [`Dialogs`] handle is installed first, so `app` opens
/// dialogs through [`facade`]. The loop keeps drawing and reading input while
/// `app` is suspended on a dialog, and returns `app`'s output once it ends.
pub async fn run<F, T>(config: &Config, app: F) -> Result<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let (dialogs, commands) = Dialogs::channel();
    if !facade::install(dialogs) {
        return Err(anyhow!("A dialog host is already installed in this process"));
    }

    let mut terminal = init_terminal(config.mouse_enabled).context("Failed to set up terminal")?;
    let result = run_app(&mut terminal, config, commands, app).await;
    restore_terminal(&mut terminal, config.mouse_enabled).context("Failed to restore terminal")?;
    result
}

/// Main application loop
async fn run_app<F, T>(
    terminal: &mut Terminal<Backend>,
    config: &Config,
    mut commands: tokio::sync::mpsc::UnboundedReceiver<crate::dialog::HostCommand>,
    app: F,
) -> Result<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let theme = Theme::from_name(&config.theme).unwrap_or_default();
    let surface = TerminalSurface::new(theme, config.width_percent, config.mouse_enabled);
    let mut host = DialogHost::new(surface).with_timeout(config.timeout());
    let mut events = EventHandler::new(TICK_INTERVAL);
    events.start();

    let mut app = tokio::spawn(app);
    info!("Dialog host running");

    loop {
        terminal.draw(|frame| host.surface_mut().render(frame))?;

        tokio::select! {
            output = &mut app => {
                host.dismiss()?;
                debug!(closed = host.closed_count(), "Application finished");
                return output.context("Application task failed");
            }
            Some(command) = commands.recv() => host.handle_command(command),
            Some(event) = events.next() => handle_event(&mut host, event)?,
        }
    }
}

fn handle_event(host: &mut DialogHost<TerminalSurface>, event: Event) -> Result<()> {
    match event {
        Event::Tick => {
            host.check_timeout()?;
        }
        Event::Key(key) if host.surface().key_map().is_interrupt(&key) => {
            debug!("Interrupt pressed, dismissing dialog");
            host.dismiss()?;
        }
        Event::Resize(width, height) => {
            debug!(width, height, "Terminal resized");
        }
        event => {
            if let Some(interaction) = host.surface_mut().translate(&event) {
                host.dispatch(&interaction)?;
            }
        }
    }
    Ok(())
}
