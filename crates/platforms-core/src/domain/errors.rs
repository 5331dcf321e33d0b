//! Errors raised while loading the registry, resolving platforms and picking hosts.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Resolution of a task to a platform failed.
///
/// Lookups are deterministic: retrying with the same registry and task
/// configuration gives the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformLookupError {
    /// An explicit platform name matched none of the registry patterns.
    #[error("No matching platform \"{name}\" found")]
    NoMatchingPlatform { name: String },

    /// Legacy host / batch-system settings matched no registry entry.
    #[error("No platform found matching your task")]
    NoLegacyMatch,

    /// An explicit platform was mixed with legacy host / batch-system settings.
    #[error(
        "A mixture of legacy (host) and current (platform) configuration should not be used. \
         In this case the task \"{task_id}\" has the following settings which are not \
         compatible:\n{}",
        render_conflicts(.conflicts)
    )]
    Conflict {
        task_id: String,
        conflicts: Vec<Conflict>,
    },
}

/// One legacy setting that clashes with an explicit `platform`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub platform: String,
    pub section: &'static str,
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "platform = {} AND [{}]{} = {}",
            self.platform, self.section, self.key, self.value
        )
    }
}

fn render_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!(" * {c}\n"))
        .collect()
}

/// Picking a host from a resolved platform failed.
///
/// These are caller errors rather than configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostSelectionError {
    #[error("method {0} is not a valid host selection method")]
    UnsupportedMethod(String),

    #[error("platform \"{platform}\" has no hosts to select from")]
    NoHosts { platform: String },
}

/// Building or loading a [`PlatformRegistry`](crate::registry::PlatformRegistry) failed.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid platform pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read platform config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse platform config: {0}")]
    Toml(#[from] toml::de::Error),
}
