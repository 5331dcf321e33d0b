//! PlatformRegistry - パターンをキーとする順序付きプラットフォームテンプレート
//!
//! 各エントリのキーはプラットフォーム名全体にマッチする正規表現。
//! 挿入順が優先順位: site → user の順に読み込み、検索は末尾から行うので
//! パターンが重なる場合は後のエントリが勝つ。
//!
//! 解決中は読み取り専用。呼び出し側には常にテンプレートの clone を渡す。

mod loader;

use regex::Regex;

use crate::domain::{PlatformDefinition, RegistryError, keys};

/// One registry entry: the source pattern, its compiled full-match regex and
/// the template it selects.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pattern: String,
    matcher: Regex,
    template: PlatformDefinition,
}

impl RegistryEntry {
    pub fn new(
        pattern: impl Into<String>,
        template: PlatformDefinition,
    ) -> Result<Self, RegistryError> {
        let pattern = pattern.into();
        let matcher = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            RegistryError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            }
        })?;
        Ok(Self {
            pattern,
            matcher,
            template,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn template(&self) -> &PlatformDefinition {
        &self.template
    }

    /// Does the pattern match the whole of `name`?
    pub fn matches(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }
}

/// Ordered mapping from platform-name pattern to platform template.
///
/// A `localhost` entry always exists: [`PlatformRegistry::new`] seeds the
/// built-in one, and configuration can only replace it.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    entries: Vec<RegistryEntry>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        let localhost = RegistryEntry::new(keys::LOCALHOST, PlatformDefinition::localhost())
            .expect("localhost is a valid pattern");
        Self {
            entries: vec![localhost],
        }
    }

    /// Add a template under `pattern`.
    ///
    /// A new pattern goes to the back (highest precedence). A pattern already
    /// present keeps its position and has its template replaced.
    pub fn insert(
        &mut self,
        pattern: impl Into<String>,
        template: PlatformDefinition,
    ) -> Result<(), RegistryError> {
        let pattern = pattern.into();
        if let Some(existing) = self.entries.iter_mut().find(|e| e.pattern == pattern) {
            existing.template = template;
            return Ok(());
        }
        self.entries.push(RegistryEntry::new(pattern, template)?);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(
        mut self,
        pattern: impl Into<String>,
        template: PlatformDefinition,
    ) -> Result<Self, RegistryError> {
        self.insert(pattern, template)?;
        Ok(self)
    }

    /// The stored `localhost` template.
    pub fn localhost(&self) -> &PlatformDefinition {
        self.get(keys::LOCALHOST)
            .expect("registry always holds a localhost entry")
    }

    /// Template stored under exactly this pattern (no regex matching).
    pub fn get(&self, pattern: &str) -> Option<&PlatformDefinition> {
        self.entries
            .iter()
            .find(|e| e.pattern == pattern)
            .map(|e| &e.template)
    }

    /// Entries from highest to lowest precedence (reverse insertion order).
    pub fn by_precedence(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter().rev()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}
