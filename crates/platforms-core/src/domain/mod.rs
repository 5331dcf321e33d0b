//! ドメインモデル（platform definitions, task configuration, errors）

pub mod errors;
pub mod keys;
pub mod platform;
pub mod task_config;

pub use self::errors::{Conflict, HostSelectionError, PlatformLookupError, RegistryError};
pub use self::platform::PlatformDefinition;
pub use self::task_config::{Deprecation, Section, TaskConfig, TaskPlatform};
