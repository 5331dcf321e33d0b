//! Infer a platform name from legacy `[job]` / `[remote]` settings.
//!
//! Walk the registry from highest to lowest precedence. An entry is a
//! candidate when every setting it shares with the task (other than host and
//! batch system) has the same value. For a candidate, in order:
//!
//! 1. task host `localhost` with the `background` batch system gives `localhost`;
//! 2. the entry lists the task host and has the task's batch system: the
//!    entry's pattern is the platform;
//! 3. the entry's pattern matches the task host and the batch systems agree:
//!    the host itself is the platform.
//!
//! The task's sections are only read, never modified.

use crate::domain::task_config::truthy_text;
use crate::domain::{PlatformLookupError, Section, keys};
use crate::registry::{PlatformRegistry, RegistryEntry};

/// Platform name for a task configured with legacy host / batch-system settings.
pub fn platform_from_job_info(
    registry: &PlatformRegistry,
    job: &Section,
    remote: &Section,
) -> Result<String, PlatformLookupError> {
    let task_host =
        truthy_text(remote.get(keys::HOST)).unwrap_or_else(|| keys::LOCALHOST.to_string());
    let task_batch_system = truthy_text(job.get(keys::BATCH_SYSTEM))
        .unwrap_or_else(|| keys::BACKGROUND.to_string());

    for entry in registry.by_precedence() {
        if !generic_settings_match(entry, job, remote) {
            continue;
        }
        let template = entry.template();

        if task_host == keys::LOCALHOST && task_batch_system == keys::BACKGROUND {
            return Ok(keys::LOCALHOST.to_string());
        }
        if template.hosts.contains(&task_host) && template.batch_system == task_batch_system {
            tracing::debug!(
                host = %task_host,
                batch_system = %task_batch_system,
                platform = entry.pattern(),
                "legacy settings matched platform hosts"
            );
            return Ok(entry.pattern().to_string());
        }
        if entry.matches(&task_host) && template.batch_system == task_batch_system {
            tracing::debug!(
                host = %task_host,
                batch_system = %task_batch_system,
                pattern = entry.pattern(),
                "legacy host matched platform pattern"
            );
            return Ok(task_host);
        }
    }

    Err(PlatformLookupError::NoLegacyMatch)
}

/// Settings the task and the template both define, host and batch system
/// aside, must be equal. No shared settings is a match.
fn generic_settings_match(entry: &RegistryEntry, job: &Section, remote: &Section) -> bool {
    job.iter()
        .chain(remote.iter())
        .filter(|(key, _)| key.as_str() != keys::HOST && key.as_str() != keys::BATCH_SYSTEM)
        .all(|(key, value)| match entry.template().attribute(key) {
            Some(expected) => expected == *value,
            None => true,
        })
}
