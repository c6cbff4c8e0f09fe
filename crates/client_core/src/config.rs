use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_CONFIG_FILE: &str = "console.toml";
const CONFIG_DIR_NAME: &str = "bus_admin_console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSettings {
    pub api_base_url: String,
    pub log_filter: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".into(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    log_filter: Option<String>,
}

impl ConsoleSettings {
    /// Overlays values from a TOML document.
    pub fn apply_toml(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid console config")?;
        if let Some(v) = file_cfg.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
        Ok(())
    }

    /// Overlays environment variables; `APP__*` names win over the short ones.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CONSOLE_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("APP__API_BASE_URL") {
            self.api_base_url = v;
        }

        if let Some(v) = lookup("CONSOLE_LOG") {
            self.log_filter = v;
        }
        if let Some(v) = lookup("APP__LOG_FILTER") {
            self.log_filter = v;
        }
    }

    pub fn base_url(&self) -> Result<Url, ClientError> {
        parse_base_url(&self.api_base_url)
    }
}

/// Loads settings from defaults, the first config file found, then the process environment.
///
/// An explicit path must exist; the fallback candidates are skipped when absent.
pub fn load_settings(
    explicit_path: Option<&Path>,
    fallback_paths: &[PathBuf],
) -> anyhow::Result<ConsoleSettings> {
    let mut settings = ConsoleSettings::default();

    if let Some(path) = explicit_path {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        settings
            .apply_toml(&raw)
            .with_context(|| format!("in config file '{}'", path.display()))?;
    } else if let Some((path, raw)) = fallback_paths
        .iter()
        .find_map(|path| fs::read_to_string(path).ok().map(|raw| (path, raw)))
    {
        settings
            .apply_toml(&raw)
            .with_context(|| format!("in config file '{}'", path.display()))?;
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

/// `console.toml` in the working directory, then in the per-user config directory.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(CONFIG_DIR_NAME).join(DEFAULT_CONFIG_FILE));
    }
    paths
}

pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let raw = raw.trim();
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}
