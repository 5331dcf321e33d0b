//! Platform resolution - タスク設定からプラットフォームを解決する
//!
//! [`PlatformResolver::resolve`] は設定の形で経路を選ぶ:
//! - 設定なし: localhost
//! - 名前のみ、または `platform` 付きの fragment: 名前で検索（fragment は先に衝突チェック）
//! - legacy host / batch-system 付きの fragment: そこから名前を推定して検索。
//!   warn-only モードでは解決せず deprecation を返す（報告は呼び出し側）

mod by_job_info;
mod by_name;
mod conflict;

use std::sync::Arc;

pub use self::by_job_info::platform_from_job_info;
pub use self::by_name::platform_from_name;
pub use self::conflict::{FORBIDDEN_WITH_PLATFORM, ForbiddenPair, check_conflict};

use crate::domain::task_config::display_value;
use crate::domain::{
    Deprecation, PlatformDefinition, PlatformLookupError, TaskConfig, TaskPlatform,
};
use crate::registry::PlatformRegistry;

/// What to do with legacy host / batch-system settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Infer the platform from them.
    #[default]
    Strict,
    /// Report them as deprecations instead of resolving.
    WarnOnly,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Platform(PlatformDefinition),
    /// Warn-only mode found legacy settings; no platform was resolved.
    Deprecated(Vec<Deprecation>),
}

impl Resolution {
    pub fn platform(&self) -> Option<&PlatformDefinition> {
        match self {
            Resolution::Platform(platform) => Some(platform),
            Resolution::Deprecated(_) => None,
        }
    }

    pub fn into_platform(self) -> Option<PlatformDefinition> {
        match self {
            Resolution::Platform(platform) => Some(platform),
            Resolution::Deprecated(_) => None,
        }
    }
}

/// Resolves tasks to platforms against a shared, read-only registry.
#[derive(Debug, Clone)]
pub struct PlatformResolver {
    registry: Arc<PlatformRegistry>,
}

impl PlatformResolver {
    pub fn new(registry: Arc<PlatformRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Resolve the platform for one task.
    pub fn resolve(
        &self,
        task: Option<&TaskPlatform>,
        task_id: &str,
        mode: ResolveMode,
    ) -> Result<Resolution, PlatformLookupError> {
        let conf = match task {
            None => return self.by_name(None).map(Resolution::Platform),
            Some(TaskPlatform::ByName(name)) => {
                return self.by_name(Some(name.as_str())).map(Resolution::Platform);
            }
            Some(TaskPlatform::ByTaskFragment(conf)) => conf,
        };

        if let Some(platform) = conf.explicit_platform() {
            check_conflict(conf, task_id)?;
            return self.by_name(Some(platform)).map(Resolution::Platform);
        }

        let deprecations = legacy_settings(conf, task_id);
        if deprecations.is_empty() {
            return self.by_name(None).map(Resolution::Platform);
        }

        match mode {
            ResolveMode::WarnOnly => {
                for d in &deprecations {
                    tracing::debug!(
                        task = task_id,
                        section = d.section,
                        key = d.key,
                        value = %d.value,
                        "deprecated legacy platform setting"
                    );
                }
                Ok(Resolution::Deprecated(deprecations))
            }
            ResolveMode::Strict => {
                let name = self.by_job_info(conf)?;
                tracing::debug!(
                    task = task_id,
                    platform = %name,
                    "inferred platform from legacy settings"
                );
                self.by_name(Some(name.as_str())).map(Resolution::Platform)
            }
        }
    }

    /// See [`platform_from_name`].
    pub fn by_name(
        &self,
        name: Option<&str>,
    ) -> Result<PlatformDefinition, PlatformLookupError> {
        platform_from_name(&self.registry, name)
    }

    /// See [`platform_from_job_info`].
    pub fn by_job_info(&self, conf: &TaskConfig) -> Result<String, PlatformLookupError> {
        platform_from_job_info(&self.registry, &conf.job, &conf.remote)
    }
}

/// Legacy settings on `conf` that imply a platform other than localhost.
fn legacy_settings(conf: &TaskConfig, task_id: &str) -> Vec<Deprecation> {
    FORBIDDEN_WITH_PLATFORM
        .iter()
        .filter_map(|pair| {
            pair.triggered_by(conf).map(|value| Deprecation {
                task_id: task_id.to_string(),
                section: pair.section,
                key: pair.key,
                value: display_value(value),
            })
        })
        .collect()
}
