//! Legacy settings that must not be combined with an explicit `platform`.

use serde_json::Value;

use crate::domain::task_config::display_value;
use crate::domain::{Conflict, PlatformLookupError, TaskConfig, keys};

/// A legacy `[section]key` and the values it may hold without implying a
/// platform. `None` stands for an unset (null) value.
#[derive(Debug, Clone, Copy)]
pub struct ForbiddenPair {
    pub section: &'static str,
    pub key: &'static str,
    pub allowed: &'static [Option<&'static str>],
}

impl ForbiddenPair {
    /// The task's value for this setting, if it is present and not one of the
    /// allowed defaults.
    pub fn triggered_by<'a>(&self, conf: &'a TaskConfig) -> Option<&'a Value> {
        let value = conf.section(self.section)?.get(self.key)?;
        let allowed = self.allowed.iter().any(|default| match (default, value) {
            (None, Value::Null) => true,
            (Some(expected), Value::String(actual)) => *expected == actual.as_str(),
            _ => false,
        });
        (!allowed).then_some(value)
    }
}

pub const FORBIDDEN_WITH_PLATFORM: &[ForbiddenPair] = &[
    ForbiddenPair {
        section: keys::REMOTE,
        key: keys::HOST,
        allowed: &[Some(keys::LOCALHOST), None],
    },
    ForbiddenPair {
        section: keys::JOB,
        key: keys::BATCH_SYSTEM,
        allowed: &[None],
    },
    ForbiddenPair {
        section: keys::JOB,
        key: keys::BATCH_SUBMIT_COMMAND_TEMPLATE,
        allowed: &[None],
    },
];

/// Fail if `conf` sets a platform and also a legacy host / batch-system setting.
///
/// Without an explicit platform there is nothing to conflict with.
pub fn check_conflict(conf: &TaskConfig, task_id: &str) -> Result<(), PlatformLookupError> {
    let Some(platform) = conf.explicit_platform() else {
        return Ok(());
    };

    let conflicts: Vec<Conflict> = FORBIDDEN_WITH_PLATFORM
        .iter()
        .filter_map(|pair| {
            pair.triggered_by(conf).map(|value| Conflict {
                platform: platform.to_string(),
                section: pair.section,
                key: pair.key,
                value: display_value(value),
            })
        })
        .collect();

    if conflicts.is_empty() {
        return Ok(());
    }
    Err(PlatformLookupError::Conflict {
        task_id: task_id.to_string(),
        conflicts,
    })
}
