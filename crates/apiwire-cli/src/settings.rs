//! Configuration resolution and the saved configuration file.
//!
//! Precedence, lowest first: saved configuration, `--config` file,
//! command-line flags and environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use apiwire::{ClientConfig, TlsTrust};

use crate::cli::GlobalArgs;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Get the saved configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "apiwire").context("Could not determine config directory")?;

    Ok(dirs.config_dir().join("config.json"))
}

fn read_config(path: &Path) -> Result<ClientConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    ClientConfig::from_json_str(&json)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

/// Load the saved configuration, if any.
pub fn load_saved() -> Result<Option<ClientConfig>> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    read_config(&path).map(Some)
}

/// Save a configuration as the default for later invocations.
pub fn save(config: &ClientConfig) -> Result<PathBuf> {
    let path = config_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(&path, &json).context("Failed to write config file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(path)
}

/// Resolve the effective client configuration.
pub fn resolve(args: &GlobalArgs) -> Result<ClientConfig> {
    let base = match &args.config {
        Some(path) => Some(read_config(path)?),
        None => load_saved()?,
    };

    let mut config = match (base, &args.base_url) {
        (Some(config), Some(url)) => ClientConfig {
            base_url: url.clone(),
            ..config
        },
        (Some(config), None) => config,
        (None, Some(url)) => ClientConfig::new(url.clone()),
        (None, None) => anyhow::bail!(
            "No base URL. Pass --base-url, set APIWIRE_BASE_URL, or save one with 'apiwire config --save'."
        ),
    };

    if let Some(timeout) = args.timeout {
        config = config.with_timeout(timeout);
    }
    if args.insecure {
        config = config.with_tls(TlsTrust::TrustAll);
    }
    if let Some(level) = args.http_log {
        config = config.with_log_level(level.into());
    }

    Ok(config)
}
