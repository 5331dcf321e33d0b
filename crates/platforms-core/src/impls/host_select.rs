//! Host selection strategies（RandomHost, FirstHost）と文字列による選択

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;

use crate::domain::{HostSelectionError, PlatformDefinition};
use crate::ports::HostSelector;

/// Uniformly random host. Not memoized: repeated calls may differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomHost;

impl HostSelector for RandomHost {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select<'p>(
        &self,
        platform: &'p PlatformDefinition,
    ) -> Result<&'p str, HostSelectionError> {
        platform
            .hosts
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .ok_or_else(|| no_hosts(platform))
    }
}

/// First listed host.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstHost;

impl HostSelector for FirstHost {
    fn name(&self) -> &'static str {
        "first"
    }

    fn select<'p>(
        &self,
        platform: &'p PlatformDefinition,
    ) -> Result<&'p str, HostSelectionError> {
        platform
            .hosts
            .first()
            .map(String::as_str)
            .ok_or_else(|| no_hosts(platform))
    }
}

fn no_hosts(platform: &PlatformDefinition) -> HostSelectionError {
    HostSelectionError::NoHosts {
        platform: platform.name.clone(),
    }
}

/// Host selection methods known by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostSelectionMethod {
    #[default]
    Random,
    First,
}

impl HostSelectionMethod {
    pub fn selector(self) -> &'static dyn HostSelector {
        match self {
            HostSelectionMethod::Random => &RandomHost,
            HostSelectionMethod::First => &FirstHost,
        }
    }
}

impl FromStr for HostSelectionMethod {
    type Err = HostSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(HostSelectionMethod::Random),
            "first" => Ok(HostSelectionMethod::First),
            other => Err(HostSelectionError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for HostSelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector().name())
    }
}

/// Pick a host from `platform` using the named method (`None` means random).
pub fn select_host(
    platform: &PlatformDefinition,
    method: Option<&str>,
) -> Result<String, HostSelectionError> {
    let method = method
        .map(str::parse::<HostSelectionMethod>)
        .transpose()?
        .unwrap_or_default();
    let host = method.selector().select(platform)?;
    tracing::debug!(platform = %platform.name, host, method = %method, "selected host");
    Ok(host.to_string())
}
