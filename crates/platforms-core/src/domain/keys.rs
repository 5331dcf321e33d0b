//! Well-known configuration keys and values.
//!
//! Keys are kebab-case, matching the TOML layout of the platform registry and
//! the `[job]` / `[remote]` sections of a task configuration.

/// Name of the platform that must exist in every registry.
pub const LOCALHOST: &str = "localhost";

/// Batch system used when none is configured.
pub const BACKGROUND: &str = "background";

pub const JOB: &str = "job";
pub const REMOTE: &str = "remote";

/// `[remote]host`
pub const HOST: &str = "host";
/// `[job]batch-system`
pub const BATCH_SYSTEM: &str = "batch-system";
/// `[job]batch-submit-command-template`
pub const BATCH_SUBMIT_COMMAND_TEMPLATE: &str = "batch-submit-command-template";

pub const HOSTS: &str = "hosts";
