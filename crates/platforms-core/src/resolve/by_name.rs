//! Resolve an explicit platform name against the registry.

use crate::domain::{PlatformDefinition, PlatformLookupError, keys};
use crate::registry::PlatformRegistry;

/// Platform for `name`, or the localhost platform when `name` is `None`.
///
/// Patterns are tried from highest to lowest precedence and the first full
/// match wins. The matched template is cloned; `name` is set to the name that
/// was looked up, and a template without hosts gets `hosts = [name]` so that
/// every name matching a broad pattern is its own host.
pub fn platform_from_name(
    registry: &PlatformRegistry,
    name: Option<&str>,
) -> Result<PlatformDefinition, PlatformLookupError> {
    let Some(name) = name else {
        let mut platform = registry.localhost().clone();
        // 設定で上書きされた localhost に hosts が無い場合も補完する
        if platform.hosts.is_empty() {
            platform.hosts = vec![keys::LOCALHOST.to_string()];
        }
        platform.name = keys::LOCALHOST.to_string();
        return Ok(platform);
    };

    let entry = registry
        .by_precedence()
        .find(|entry| entry.matches(name))
        .ok_or_else(|| PlatformLookupError::NoMatchingPlatform {
            name: name.to_string(),
        })?;

    tracing::debug!(platform = name, pattern = entry.pattern(), "matched platform by name");

    let mut platform = entry.template().clone();
    if platform.hosts.is_empty() {
        platform.hosts = vec![name.to_string()];
    }
    platform.name = name.to_string();
    Ok(platform)
}
