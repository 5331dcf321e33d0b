//! Platform definitions.
//!
//! A registry stores one [`PlatformDefinition`] per pattern as a *template*.
//! Resolution hands out clones of those templates with `name` and `hosts`
//! filled in, so callers never share state with the registry.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::keys;

/// A named execution target: host list, batch system and submission settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformDefinition {
    /// Filled in at resolution time with the name that was looked up.
    /// Empty on registry templates.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Hosts jobs may be submitted to. Configuration may give a single string.
    #[serde(default, deserialize_with = "one_or_many")]
    pub hosts: Vec<String>,

    #[serde(default = "default_batch_system")]
    pub batch_system: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_submit_command_template: Option<String>,

    /// Everything else, passed through untouched.
    #[serde(flatten)]
    pub settings: IndexMap<String, Value>,
}

impl PlatformDefinition {
    pub fn new(batch_system: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            hosts: Vec::new(),
            batch_system: batch_system.into(),
            batch_submit_command_template: None,
            settings: IndexMap::new(),
        }
    }

    /// The built-in `localhost` template.
    pub fn localhost() -> Self {
        Self::new(keys::BACKGROUND).with_hosts([keys::LOCALHOST])
    }

    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Look up a setting by its configuration key, typed fields included.
    ///
    /// Unset optional fields and an empty host list count as absent. The
    /// batch system always has a value.
    pub fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            keys::HOSTS if self.hosts.is_empty() => None,
            keys::HOSTS => Some(Value::from(self.hosts.clone())),
            keys::BATCH_SYSTEM => Some(Value::from(self.batch_system.clone())),
            keys::BATCH_SUBMIT_COMMAND_TEMPLATE => {
                self.batch_submit_command_template.clone().map(Value::from)
            }
            "name" => None,
            other => self.settings.get(other).cloned(),
        }
    }
}

fn default_batch_system() -> String {
    keys::BACKGROUND.to_string()
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(host)) if host.is_empty() => Vec::new(),
        Some(OneOrMany::One(host)) => vec![host],
        Some(OneOrMany::Many(hosts)) => hosts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts_accept_a_single_string() {
        let def: PlatformDefinition =
            toml::from_str("hosts = \"localhost\"\nbatch-system = \"slurm\"").expect("parse");
        assert_eq!(def.hosts, vec!["localhost"]);
        assert_eq!(def.batch_system, "slurm");
    }

    #[test]
    fn missing_fields_take_defaults_and_extras_pass_through() {
        let def: PlatformDefinition =
            toml::from_str("shell = \"/bin/fish\"\nretries = 3").expect("parse");
        assert!(def.hosts.is_empty());
        assert_eq!(def.batch_system, "background");
        assert_eq!(def.batch_submit_command_template, None);
        assert_eq!(def.settings["shell"], Value::from("/bin/fish"));
        assert_eq!(def.settings["retries"], Value::from(3));
    }

    #[test]
    fn attribute_covers_typed_fields_and_settings() {
        let def = PlatformDefinition::new("pbs")
            .with_hosts(["hpc1", "hpc2"])
            .with_setting("shell", "/bin/bash");

        assert_eq!(def.attribute("batch-system"), Some(Value::from("pbs")));
        assert_eq!(
            def.attribute("hosts"),
            Some(serde_json::json!(["hpc1", "hpc2"]))
        );
        assert_eq!(def.attribute("shell"), Some(Value::from("/bin/bash")));
        assert_eq!(def.attribute("batch-submit-command-template"), None);
        assert_eq!(def.attribute("owner"), None);
    }

    #[test]
    fn empty_host_list_is_not_an_attribute() {
        assert_eq!(PlatformDefinition::new("slurm").attribute("hosts"), None);
    }
}
