//! The slice of a task's configuration that platform resolution reads.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::keys;

/// A `[job]` or `[remote]` section: ordered key/value settings.
pub type Section = IndexMap<String, Value>;

/// How a task names its platform.
///
/// Deserializes from either a bare string (a platform name) or a table
/// (a task configuration fragment). A task with no configuration at all is
/// represented by `Option::None` at the call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskPlatform {
    ByName(String),
    ByTaskFragment(TaskConfig),
}

/// Task configuration fragment.
///
/// `platform` is the current way to pick a platform; `job` and `remote` carry
/// the legacy host / batch-system settings. Other task settings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub job: Section,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub remote: Section,
}

impl TaskConfig {
    pub fn with_platform(name: impl Into<String>) -> Self {
        Self {
            platform: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_job(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.job.insert(key.into(), value.into());
        self
    }

    pub fn with_remote(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.remote.insert(key.into(), value.into());
        self
    }

    /// The explicit platform name, if one is set and non-empty.
    pub fn explicit_platform(&self) -> Option<&str> {
        self.platform.as_deref().filter(|p| !p.is_empty())
    }

    /// Section by its configuration name (`job` or `remote`).
    pub fn section(&self, name: &str) -> Option<&Section> {
        match name {
            keys::JOB => Some(&self.job),
            keys::REMOTE => Some(&self.remote),
            _ => None,
        }
    }
}

/// A legacy setting found on a task resolved in warn-only mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    pub task_id: String,
    pub section: &'static str,
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task {}: deprecated setting [runtime][{}][{}]{} = {} will be removed, upgrade to platform",
            self.task_id, self.task_id, self.section, self.key, self.value
        )
    }
}

/// Render a setting value for messages: strings without quotes, JSON otherwise.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A setting's value if it is "set": not null, `false`, zero or empty.
pub(crate) fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(display_value(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn bare_string_is_a_platform_name() {
        let parsed: TaskPlatform = serde_json::from_str("\"hpc\"").expect("deserialize");
        assert_eq!(parsed, TaskPlatform::ByName("hpc".into()));
    }

    #[test]
    fn table_is_a_task_fragment() {
        let json = r#"
        {
          "job": { "batch-system": "slurm" },
          "remote": { "host": "sugar" },
          "script": "echo hello"
        }"#;
        let parsed: TaskPlatform = serde_json::from_str(json).expect("deserialize");
        let TaskPlatform::ByTaskFragment(conf) = parsed else {
            panic!("expected a task fragment");
        };
        assert_eq!(conf.platform, None);
        assert_eq!(conf.job["batch-system"], Value::from("slurm"));
        assert_eq!(conf.remote["host"], Value::from("sugar"));
    }

    #[rstest]
    #[case::unset(None, None)]
    #[case::empty(Some(""), None)]
    #[case::named(Some("hpc"), Some("hpc"))]
    fn explicit_platform_ignores_empty_names(
        #[case] platform: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let conf = TaskConfig {
            platform: platform.map(str::to_string),
            ..TaskConfig::default()
        };
        assert_eq!(conf.explicit_platform(), expected);
    }

    #[rstest]
    #[case::missing(None, None)]
    #[case::null(Some(Value::Null), None)]
    #[case::empty(Some(Value::from("")), None)]
    #[case::falsy(Some(Value::from(false)), None)]
    #[case::text(Some(Value::from("hpc1")), Some("hpc1"))]
    #[case::number(Some(Value::from(7)), Some("7"))]
    #[case::zero(Some(Value::from(0)), None)]
    #[case::float_zero(Some(Value::from(0.0)), None)]
    #[case::empty_list(Some(serde_json::json!([])), None)]
    #[case::empty_table(Some(serde_json::json!({})), None)]
    #[case::list(Some(serde_json::json!(["hpc1"])), Some(r#"["hpc1"]"#))]
    fn truthy_text_follows_setting_semantics(
        #[case] value: Option<Value>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(truthy_text(value.as_ref()).as_deref(), expected);
    }

    #[test]
    fn deprecation_names_task_section_key_and_value() {
        let d = Deprecation {
            task_id: "foo".into(),
            section: "remote",
            key: "host",
            value: "hpc1".into(),
        };
        let msg = d.to_string();
        assert!(msg.contains("[runtime][foo][remote]host = hpc1"));
        assert!(msg.contains("upgrade to platform"));
    }
}
