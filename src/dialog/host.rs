//! Dialog host: owns the surface and the one dialog open on it
//!
//! The host is driven by whatever loop owns the surface. It opens sessions on
//! request, routes each interaction to the open session in delivery order and
//! drops the session once it has closed.

use super::{
    classifier::RawInteraction,
    resolver::dismissed_value,
    response::ResponseChannel,
    session::DialogSession,
    types::{DialogError, DialogRequest, DialogResult},
};
use crate::surface::UiSurface;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Requests sent from façade handles to the loop that owns the host
#[derive(Debug)]
pub enum HostCommand {
    /// Open a dialog and reply with its response channel
    Open {
        request: DialogRequest,
        reply: oneshot::Sender<DialogResult<ResponseChannel>>,
    },
}

/// Owner of a surface and at most one open dialog
pub struct DialogHost<S: UiSurface> {
    surface: S,
    active: Option<DialogSession>,
    timeout: Option<Duration>,
    closed_count: usize,
}

impl<S: UiSurface> DialogHost<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            active: None,
            timeout: None,
            closed_count: 0,
        }
    }

    /// Dismiss dialogs left open longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The open dialog, if any
    pub fn active(&self) -> Option<&DialogSession> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Number of dialogs closed so far
    pub fn closed_count(&self) -> usize {
        self.closed_count
    }

    /// Open a dialog. Only one dialog may be open at a time.
    pub fn open(&mut self, request: DialogRequest) -> DialogResult<ResponseChannel> {
        if let Some(active) = &self.active {
            warn!(
                active = %active.id(),
                dialog_type = %request.dialog_type,
                "Rejecting dialog while another is open"
            );
            return Err(DialogError::AlreadyOpen(active.id().clone()));
        }

        let session = DialogSession::open(request, &mut self.surface)?;
        let channel = session.channel();
        self.active = Some(session);
        Ok(channel)
    }

    /// Execute a command from a façade handle
    pub fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::Open { request, reply } => {
                let result = self.open(request);
                if reply.send(result).is_err() {
                    debug!("Dialog requester went away before the dialog opened");
                }
            }
        }
    }

    /// Route an interaction to the open dialog. Returns `true` if it closed it.
    pub fn dispatch(&mut self, interaction: &RawInteraction) -> DialogResult<bool> {
        let Some(session) = self.active.as_mut() else {
            return Ok(false);
        };

        let closed = session.handle(interaction, &mut self.surface)?;
        if closed {
            self.release();
        }
        Ok(closed)
    }

    /// Dismiss the open dialog if it outlived the timeout
    pub fn check_timeout(&mut self) -> DialogResult<bool> {
        let (Some(timeout), Some(session)) = (self.timeout, self.active.as_ref()) else {
            return Ok(false);
        };
        if session.elapsed() < timeout {
            return Ok(false);
        }

        info!(dialog_id = %session.id(), ?timeout, "Dialog timed out");
        self.dismiss()?;
        Ok(true)
    }

    /// Close the open dialog as if Escape was pressed
    pub fn dismiss(&mut self) -> DialogResult<()> {
        if let Some(session) = self.active.as_mut() {
            let value = dismissed_value(session.request().dialog_type);
            session.close_with(value, &mut self.surface)?;
            self.release();
        }
        Ok(())
    }

    fn release(&mut self) {
        if let Some(session) = self.active.take() {
            let leaked = session.leaked(&self.surface);
            if !leaked.is_empty() {
                warn!(dialog_id = %session.id(), ?leaked, "Dialog left elements behind");
            }
            self.closed_count += 1;
        }
    }
}
