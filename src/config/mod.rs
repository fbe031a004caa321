use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const ENV_PREFIX: &str = "DIALOGUE_";

/// Dialog host configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Color theme, `dark` or `light`
    pub theme: String,

    /// Whether mouse clicks reach the dialog
    pub mouse_enabled: bool,

    /// Dialog width as a percentage of the terminal
    pub width_percent: u16,

    /// Dismiss an unanswered dialog after this many seconds
    pub timeout_secs: Option<u64>,

    /// Write logs here instead of the user cache directory
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            mouse_enabled: true,
            width_percent: 60,
            timeout_secs: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Initialize configuration from files and the environment
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match Self::load_from_file(&Self::config_paths()).await? {
            Some(config) => config,
            None => Self::default(),
        };
        config.load_from_vars(std::env::vars())?;

        Ok(config)
    }

    /// Candidate configuration files, highest priority first:
    /// 1. ./.dialogue.json
    /// 2. ./dialogue.json
    /// 3. $CONFIG_DIR/dialogue/dialogue.json
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.dialogue.json"),
            PathBuf::from("./dialogue.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dialogue").join("dialogue.json"));
        }

        paths
    }

    /// Load the first configuration file that exists
    pub async fn load_from_file(paths: &[PathBuf]) -> Result<Option<Self>> {
        for path in paths {
            if path.exists() {
                debug!("Loading configuration from: {}", path.display());
                return Self::read(path).await.map(Some);
            }
        }
        Ok(None)
    }

    async fn read(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Apply `DIALOGUE_*` variables on top of this configuration
    pub fn load_from_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match name {
                "THEME" => self.theme = value,
                "MOUSE" => self.mouse_enabled = parse_var(&key, &value)?,
                "WIDTH" => self.width_percent = parse_var(&key, &value)?,
                "TIMEOUT" => self.timeout_secs = Some(parse_var(&key, &value)?),
                "LOG_FILE" => self.log_file = Some(PathBuf::from(value)),
                _ => debug!("Ignoring unknown variable {}", key),
            }
        }
        Ok(())
    }

    /// Where logs go: the configured file, else `dialogue.log` in the user
    /// cache directory. `None` means stderr.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::cache_dir().map(|dir| dir.join("dialogue").join("dialogue.log"))
        })
    }

    /// Dialog timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(20..=100).contains(&self.width_percent) {
            return Err(anyhow!(
                "width_percent must be between 20 and 100, got {}",
                self.width_percent
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be greater than 0"));
        }

        if crate::tui::Theme::from_name(&self.theme).is_none() {
            return Err(anyhow!(
                "Unknown theme '{}', expected 'dark' or 'light'",
                self.theme
            ));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid value for {}: '{}'", key, value))
}
