//! Loading registry layers from TOML.
//!
//! ```toml
//! [platforms.localhost]
//! hosts = "localhost"
//!
//! [platforms."desktop[0-9]{2}|laptop[0-9]{2}"]
//! batch-system = "background"
//! ```
//!
//! Each file is one layer. Layers are applied in order, so entries from a
//! later layer (the user's) take precedence over an earlier one (the site's).

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use super::PlatformRegistry;
use crate::domain::{PlatformDefinition, RegistryError};

#[derive(Debug, Default, Deserialize)]
struct PlatformsFile {
    #[serde(default)]
    platforms: IndexMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Registry built from a single TOML layer on top of the built-in localhost.
    pub fn from_toml_str(contents: &str) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.merge_toml_str(contents)?;
        Ok(registry)
    }

    /// Apply one TOML layer, in document order.
    pub fn merge_toml_str(&mut self, contents: &str) -> Result<(), RegistryError> {
        let file: PlatformsFile = toml::from_str(contents)?;
        for (pattern, template) in file.platforms {
            tracing::debug!(pattern = %pattern, "loaded platform definition");
            self.insert(pattern, template)?;
        }
        Ok(())
    }

    /// Apply one layer from disk. A missing file is skipped.
    ///
    /// Returns whether the file existed.
    pub fn merge_file(&mut self, path: &Path) -> Result<bool, RegistryError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "platform config not found, skipping");
                return Ok(false);
            }
            Err(source) => {
                return Err(RegistryError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.merge_toml_str(&contents)?;
        tracing::info!(path = %path.display(), platforms = self.len(), "loaded platform config");
        Ok(true)
    }

    /// Registry from layers applied lowest precedence first.
    pub fn load_layers<I, P>(paths: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut registry = Self::new();
        for path in paths {
            registry.merge_file(&path.into())?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = r#"
        [platforms."desktop[0-9]{2}|laptop[0-9]{2}"]
        batch-system = "background"

        [platforms.sugar]
        hosts = "localhost"
        batch-system = "slurm"

        [platforms.hpc]
        hosts = ["hpc1", "hpc2"]
        batch-system = "pbs"
    "#;

    #[test]
    fn document_order_is_preserved() {
        let registry = PlatformRegistry::from_toml_str(SITE).expect("load");
        let order: Vec<_> = registry.entries().iter().map(|e| e.pattern()).collect();
        assert_eq!(
            order,
            vec!["localhost", "desktop[0-9]{2}|laptop[0-9]{2}", "sugar", "hpc"]
        );
        assert_eq!(registry.get("sugar").unwrap().hosts, vec!["localhost"]);
    }

    #[test]
    fn user_layer_appends_after_site_layer() {
        let mut registry = PlatformRegistry::from_toml_str(SITE).expect("site");
        registry
            .merge_toml_str("[platforms.\"hpc.*\"]\nbatch-system = \"slurm\"\n")
            .expect("user");
        assert_eq!(registry.by_precedence().next().unwrap().pattern(), "hpc.*");
    }

    #[test]
    fn empty_document_yields_localhost_only() {
        let registry = PlatformRegistry::from_toml_str("").expect("load");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = PlatformRegistry::from_toml_str("[platforms.hpc\n").unwrap_err();
        assert!(matches!(err, RegistryError::Toml(_)));
    }

    #[test]
    fn bad_pattern_in_document_is_an_error() {
        let err = PlatformRegistry::from_toml_str("[platforms.\"hpc(\"]\n").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { .. }));
    }

    #[test]
    fn layers_from_disk_skip_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let site = dir.path().join("site.toml");
        let user = dir.path().join("user.toml");
        std::fs::write(&site, SITE).expect("write site");
        std::fs::write(&user, "[platforms.hpc]\nhosts = \"hpc9\"\nbatch-system = \"slurm\"\n")
            .expect("write user");

        let registry = PlatformRegistry::load_layers([
            site,
            dir.path().join("missing.toml"),
            user,
        ])
        .expect("load");

        let hpc = registry.get("hpc").unwrap();
        assert_eq!(hpc.hosts, vec!["hpc9"]);
        assert_eq!(hpc.batch_system, "slurm");
        assert_eq!(registry.len(), 4);
    }
}
