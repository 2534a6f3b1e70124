//! Resolver configuration.
//!
//! ```json
//! {
//!   "resources": { "male": "data/male.txt", "demonyms": "data/demonyms.tsv" },
//!   "sieves": ["exact_string", "precise_constructs", "pronoun"],
//!   "pronoun_window": 3
//! }
//! ```
//!
//! Every field is optional; the defaults enable all sieves.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sieve::SieveKind;
use crate::{Error, Result};

/// Default number of preceding sentences searched for pronoun antecedents.
pub const DEFAULT_PRONOUN_WINDOW: usize = 3;

/// Paths of the resource table files. Unset tables load empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePaths {
    /// Male names/nouns, one per line.
    pub male: Option<PathBuf>,
    /// Female names/nouns.
    pub female: Option<PathBuf>,
    /// Neuter nouns.
    pub neutral: Option<PathBuf>,
    /// Animate nouns.
    pub animate: Option<PathBuf>,
    /// Inanimate nouns.
    pub inanimate: Option<PathBuf>,
    /// Plural-only nouns.
    pub plural: Option<PathBuf>,
    /// Singular-only nouns.
    pub singular: Option<PathBuf>,
    /// Tab-separated place/demonym file.
    pub demonyms: Option<PathBuf>,
}

impl ResourcePaths {
    /// Resolve relative paths against `base` (the config file's directory).
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        for p in [
            &mut self.male,
            &mut self.female,
            &mut self.neutral,
            &mut self.animate,
            &mut self.inanimate,
            &mut self.plural,
            &mut self.singular,
            &mut self.demonyms,
        ] {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
        self
    }
}

/// Construction-time options of a [`Resolver`](crate::Resolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Resource table files.
    pub resources: ResourcePaths,
    /// Enabled sieve names. They always run in canonical order.
    pub sieves: Vec<String>,
    /// Preceding sentences searched by the pronoun sieve.
    pub pronoun_window: usize,
    /// Window for first/second person pronouns with a known speaker;
    /// `None` searches the whole preceding document.
    pub speaker_window: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            resources: ResourcePaths::default(),
            sieves: SieveKind::ALL.iter().map(|k| k.name().to_string()).collect(),
            pronoun_window: DEFAULT_PRONOUN_WINDOW,
            speaker_window: None,
        }
    }
}

impl ResolverConfig {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file. Relative resource paths are taken
    /// relative to the file's directory.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&text)?;
        if let Some(dir) = path.parent() {
            config.resources = config.resources.relative_to(dir);
        }
        Ok(config)
    }

    /// Restrict to the named sieves.
    #[must_use]
    pub fn with_sieves<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sieves = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pronoun window.
    #[must_use]
    pub fn with_pronoun_window(mut self, window: usize) -> Self {
        self.pronoun_window = window;
        self
    }

    /// Validate the sieve list and return the enabled sieves in canonical
    /// order.
    pub fn enabled_sieves(&self) -> Result<Vec<SieveKind>> {
        if self.sieves.is_empty() {
            return Err(Error::config("no sieves enabled"));
        }
        let mut kinds = Vec::with_capacity(self.sieves.len());
        for name in &self.sieves {
            let kind: SieveKind = name.parse()?;
            if kinds.contains(&kind) {
                return Err(Error::config(format!("sieve '{}' listed twice", name)));
            }
            kinds.push(kind);
        }
        kinds.sort();
        Ok(kinds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let config = ResolverConfig::default();
        assert_eq!(config.enabled_sieves().unwrap(), SieveKind::ALL.to_vec());
        assert_eq!(config.pronoun_window, 3);
        assert_eq!(config.speaker_window, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ResolverConfig::from_json(r#"{"pronoun_window": 1}"#).unwrap();
        assert_eq!(config.pronoun_window, 1);
        assert_eq!(config.sieves.len(), SieveKind::ALL.len());
        assert!(config.resources.male.is_none());
    }

    #[test]
    fn test_sieves_run_in_canonical_order() {
        let config = ResolverConfig::default().with_sieves(["pronoun", "exact_string"]);
        assert_eq!(
            config.enabled_sieves().unwrap(),
            vec![SieveKind::ExactString, SieveKind::Pronoun]
        );
    }

    #[test]
    fn test_bad_sieve_lists() {
        let unknown = ResolverConfig::default().with_sieves(["exact_string", "magic"]);
        assert!(matches!(unknown.enabled_sieves(), Err(Error::Config(_))));

        let dup = ResolverConfig::default().with_sieves(["pronoun", "pronoun"]);
        assert!(matches!(dup.enabled_sieves(), Err(Error::Config(_))));

        let empty = ResolverConfig::default().with_sieves(Vec::<String>::new());
        assert!(matches!(empty.enabled_sieves(), Err(Error::Config(_))));
    }

    #[test]
    fn test_relative_resource_paths() {
        let paths = ResourcePaths {
            male: Some(PathBuf::from("male.txt")),
            female: Some(PathBuf::from("/abs/female.txt")),
            ..ResourcePaths::default()
        }
        .relative_to(Path::new("/etc/coref"));
        assert_eq!(paths.male, Some(PathBuf::from("/etc/coref/male.txt")));
        assert_eq!(paths.female, Some(PathBuf::from("/abs/female.txt")));
    }
}
