//! Awaitable `alert`, `confirm` and `prompt`
//!
//! A [`Dialogs`] handle can be cloned freely and used from any task. Each call
//! asks the loop owning the [`DialogHost`](super::host::DialogHost) to open a
//! dialog, then suspends the caller until the user answers. The loop itself is
//! never blocked.

use super::{
    host::HostCommand,
    types::{DialogError, DialogRequest, DialogResult, DialogValue},
};
use std::sync::OnceLock;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Handle for opening dialogs on a running host
#[derive(Debug, Clone)]
pub struct Dialogs {
    commands: mpsc::UnboundedSender<HostCommand>,
}

impl Dialogs {
    pub fn new(commands: mpsc::UnboundedSender<HostCommand>) -> Self {
        Self { commands }
    }

    /// A handle plus the command stream its host should consume
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HostCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Open any dialog and wait for its raw value
    pub async fn open(&self, request: DialogRequest) -> DialogResult<DialogValue> {
        debug!(dialog_type = %request.dialog_type, "Requesting dialog");
        let (reply, receiver) = oneshot::channel();
        self.commands
            .send(HostCommand::Open { request, reply })
            .map_err(|_| DialogError::HostUnavailable)?;

        let channel = receiver.await.map_err(|_| DialogError::HostUnavailable)??;
        channel.wait().await
    }

    /// Show a message and wait until it is dismissed
    pub async fn alert(&self, message: impl Into<String>) -> DialogResult<()> {
        self.open(DialogRequest::alert(message)).await.map(|_| ())
    }

    /// Ask a yes/no question. `None` means the user pressed Escape.
    pub async fn confirm(&self, message: impl Into<String>) -> DialogResult<Option<bool>> {
        let value = self.open(DialogRequest::confirm(message)).await?;
        Ok(value.as_bool())
    }

    /// Ask for a line of text. `None` means the user cancelled.
    pub async fn prompt(
        &self,
        message: impl Into<String>,
        default_value: impl Into<String>,
    ) -> DialogResult<Option<String>> {
        let value = self.open(DialogRequest::prompt(message, default_value)).await?;
        Ok(match value {
            DialogValue::Text(text) => Some(text),
            _ => None,
        })
    }
}

static INSTALLED: OnceLock<Dialogs> = OnceLock::new();

/// Register the process-wide handle. Only the first install takes effect.
pub fn install(dialogs: Dialogs) -> bool {
    match INSTALLED.set(dialogs) {
        Ok(()) => {
            info!("Installed process-wide dialog handle");
            true
        }
        Err(_) => {
            warn!("Dialog handle already installed, keeping the existing one");
            false
        }
    }
}

/// The process-wide handle, if installed
pub fn installed() -> Option<&'static Dialogs> {
    INSTALLED.get()
}

fn global() -> DialogResult<&'static Dialogs> {
    installed().ok_or(DialogError::NotInstalled)
}

pub async fn open(request: DialogRequest) -> DialogResult<DialogValue> {
    global()?.open(request).await
}

pub async fn alert(message: impl Into<String>) -> DialogResult<()> {
    global()?.alert(message).await
}

pub async fn confirm(message: impl Into<String>) -> DialogResult<Option<bool>> {
    global()?.confirm(message).await
}

pub async fn prompt(
    message: impl Into<String>,
    default_value: impl Into<String>,
) -> DialogResult<Option<String>> {
    global()?.prompt(message, default_value).await
}
