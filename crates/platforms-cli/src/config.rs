//! Where the platform registry layers live.
//!
//! Layers, lowest precedence first:
//! 1. site: `PLATFORMS_SITE_CONFIG` or `/etc/platforms/platforms.toml`
//! 2. user: `PLATFORMS_USER_CONFIG`, else `$XDG_CONFIG_HOME/platforms/platforms.toml`,
//!    else `~/.config/platforms/platforms.toml`
//! 3. any `--config` paths, in the order given

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use platforms_core::PlatformRegistry;

pub const SITE_CONFIG_ENV: &str = "PLATFORMS_SITE_CONFIG";
pub const USER_CONFIG_ENV: &str = "PLATFORMS_USER_CONFIG";
const DEFAULT_SITE_CONFIG: &str = "/etc/platforms/platforms.toml";
const CONFIG_FILE: &str = "platforms.toml";

/// Site-wide registry layer.
pub fn site_config_path() -> PathBuf {
    std::env::var_os(SITE_CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SITE_CONFIG))
}

/// Per-user registry layer.
///
/// Always XDG layout, including on macOS.
pub fn user_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(USER_CONFIG_ENV) {
        return PathBuf::from(path);
    }
    user_config_dir().join(CONFIG_FILE)
}

fn user_config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("platforms");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("platforms")
}

/// All layers in precedence order (lowest first).
pub fn layer_paths(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = vec![site_config_path(), user_config_path()];
    paths.extend(extra.iter().cloned());
    paths
}

/// Load the registry from the default layers plus `extra`.
///
/// Default layers may be missing; explicitly requested ones may not.
pub fn load_registry(extra: &[PathBuf]) -> Result<PlatformRegistry> {
    for path in extra {
        ensure_exists(path)?;
    }
    let paths = layer_paths(extra);
    PlatformRegistry::load_layers(paths).context("failed to load platform registry")
}

fn ensure_exists(path: &Path) -> Result<()> {
    anyhow::ensure!(
        path.exists(),
        "platform config {} does not exist",
        path.display()
    );
    Ok(())
}
