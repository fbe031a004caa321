use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use dialogue::config::Config;
use dialogue::dialog::{facade, DialogRequest, DialogType, DialogValue};
use dialogue::tui;

/// Exit status for a positive answer
pub const EXIT_ACCEPTED: i32 = 0;
/// Exit status when the dialog was cancelled
pub const EXIT_CANCELLED: i32 = 1;
/// Exit status when no answer could be obtained
pub const EXIT_ERROR: i32 = 2;

/// Dialogue - awaitable alert, confirm and prompt dialogs for the terminal
#[derive(Parser)]
#[command(
    name = "dialogue",
    version,
    about = "Awaitable alert, confirm and prompt dialogs for the terminal",
    long_about = r#"Dialogue shows a modal dialog in the terminal and waits for the answer.
The answer is printed to stdout as JSON and reflected in the exit code.

Examples:
  dialogue alert "Build finished"             # Wait for OK
  dialogue confirm "Deploy to production?"    # Prints true, false or null
  dialogue prompt "Branch name" --default main # Prints the entered text"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Dismiss the dialog after this many seconds
    #[arg(short = 't', long = "timeout", global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a message with an OK button
    Alert {
        /// Message to show
        message: String,
    },

    /// Ask a question answered with OK or Cancel
    Confirm {
        /// Question to ask
        message: String,
    },

    /// Ask for a line of text
    Prompt {
        /// Question to ask
        message: String,

        /// Text the input starts with
        #[arg(long = "default", default_value = "")]
        default: String,
    },
}

impl Commands {
    fn request(self) -> DialogRequest {
        match self {
            Self::Alert { message } => DialogRequest::alert(message),
            Self::Confirm { message } => DialogRequest::confirm(message),
            Self::Prompt { message, default } => DialogRequest::prompt(message, default),
        }
    }
}

impl Cli {
    /// Run the command and return the process exit status
    pub async fn execute(self, mut config: Config) -> Result<i32> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
        config.validate()?;

        let request = self.command.request();
        let dialog_type = request.dialog_type;
        info!(%dialog_type, "Opening dialog");

        let value = tui::run(&config, facade::open(request))
            .await?
            .context("Dialog did not complete")?;

        if let Some(output) = render_output(dialog_type, &value)? {
            println!("{}", output);
        }

        Ok(exit_code(&value))
    }
}

/// The line printed for `value`, if any. Alerts print nothing.
pub fn render_output(dialog_type: DialogType, value: &DialogValue) -> Result<Option<String>> {
    if dialog_type == DialogType::Alert {
        return Ok(None);
    }
    value
        .to_json()
        .map(|json| serde_json::to_string(&json))
        .transpose()
        .context("Failed to encode dialog value")
}

/// Map a resolved value onto the process exit status
pub fn exit_code(value: &DialogValue) -> i32 {
    match value {
        DialogValue::Null | DialogValue::Bool(false) => EXIT_CANCELLED,
        DialogValue::Undefined | DialogValue::Bool(true) | DialogValue::Text(_) => EXIT_ACCEPTED,
    }
}
