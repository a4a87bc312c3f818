use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that switches on verbose diagnostics.
pub const DEBUG_ENV: &str = "MEDIACTL_DEBUG";

/// Runtime settings, read from `config.toml` and handed to the
/// controller and dispatcher when they are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log every bridge call and its stderr
    #[serde(default)]
    pub verbose: bool,
    /// Upper bound for one PowerShell round trip
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// PowerShell executable (`powershell.exe`, `pwsh`, or a full path)
    #[serde(default = "default_powershell")]
    pub powershell: String,
    /// Also append diagnostics to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_powershell() -> String {
    "powershell.exe".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            timeout_secs: default_timeout_secs(),
            powershell: default_powershell(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn get_config_dir() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("mediactl")
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    /// Load the user config, falling back to defaults when there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Default config as TOML, for `--generate-config`.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default config")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Turn on verbose output when the debug variable asks for it.
    pub fn apply_env(&mut self) {
        let from_env = |key: &str| std::env::var(key).ok();
        if debug_requested(from_env(DEBUG_ENV).as_deref(), from_env("DEBUG").as_deref()) {
            self.verbose = true;
        }
    }
}

/// `MEDIACTL_DEBUG=1` or the older `DEBUG=mediactl` form.
fn debug_requested(mediactl_debug: Option<&str>, debug: Option<&str>) -> bool {
    let explicit = mediactl_debug
        .map(|v| !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(false);
    let legacy = debug
        .map(|v| v.split(',').any(|part| part.trim() == "mediactl"))
        .unwrap_or(false);
    explicit || legacy
}
