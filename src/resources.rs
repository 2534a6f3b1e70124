//! Static linguistic resource tables.
//!
//! Gender, animacy, number and demonym lists are loaded once per process and
//! shared read-only by every resolution. A missing or malformed file is a
//! fatal [`Error::Resource`](crate::Error::Resource) raised before any
//! document is processed.
//!
//! # File format
//!
//! UTF-8 text, one entry per line. Blank lines and lines starting with `#`
//! are skipped and entries are lower-cased. The demonym file is tab
//! separated: a place name followed by one or more demonyms.
//!
//! ```text
//! # place<TAB>demonym...
//! America	American	Americans
//! France	French	Frenchman
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use log::info;

use crate::config::ResourcePaths;
use crate::{Error, Result};

// =============================================================================
// WordList
// =============================================================================

/// Set of lower-cased words with a provenance label.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
    source: String,
}

impl WordList {
    /// Empty list with the given source identifier.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            words: HashSet::new(),
            source: source.into(),
        }
    }

    /// Create from words; entries are lower-cased.
    pub fn from_words<I, S>(source: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new(source);
        for w in words {
            list.insert(w.as_ref());
        }
        list
    }

    /// Parse the one-entry-per-line format.
    #[must_use]
    pub fn parse(source: impl Into<String>, text: &str) -> Self {
        Self::from_words(source, entries(text))
    }

    /// Load a list from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_resource(path)?;
        Ok(Self::parse(path.display().to_string(), &text))
    }

    /// Add a word.
    pub fn insert(&mut self, word: &str) {
        let w = word.trim().to_lowercase();
        if !w.is_empty() {
            self.words.insert(w);
        }
    }

    /// Case-insensitive membership.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        !self.words.is_empty() && self.words.contains(&word.to_lowercase())
    }

    /// Where the list came from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// =============================================================================
// DemonymTable
// =============================================================================

/// Place name to demonyms (`america` -> `american`, `americans`).
#[derive(Debug, Clone, Default)]
pub struct DemonymTable {
    by_place: HashMap<String, HashSet<String>>,
    demonyms: HashSet<String>,
}

impl DemonymTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register demonyms for a place.
    pub fn insert<I, S>(&mut self, place: &str, demonyms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self
            .by_place
            .entry(place.trim().to_lowercase())
            .or_default();
        for d in demonyms {
            let d = d.as_ref().trim().to_lowercase();
            if !d.is_empty() {
                entry.insert(d.clone());
                self.demonyms.insert(d);
            }
        }
    }

    /// Parse the tab-separated format. `path` only labels errors.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let mut table = Self::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t').map(str::trim).filter(|f| !f.is_empty());
            let place = fields.next().unwrap_or_default();
            let demonyms: Vec<&str> = fields.collect();
            if demonyms.is_empty() {
                return Err(Error::resource(
                    path,
                    format!("line {}: expected place<TAB>demonym", lineno + 1),
                ));
            }
            table.insert(place, demonyms);
        }
        Ok(table)
    }

    /// Load the table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_resource(path)?;
        Self::parse(path, &text)
    }

    /// True if `word` names an inhabitant of `place`.
    #[must_use]
    pub fn is_demonym_of(&self, place: &str, word: &str) -> bool {
        self.by_place
            .get(&place.to_lowercase())
            .map_or(false, |set| set.contains(&word.to_lowercase()))
    }

    /// True if `word` is any known demonym.
    #[must_use]
    pub fn is_demonym(&self, word: &str) -> bool {
        self.demonyms.contains(&word.to_lowercase())
    }

    /// Number of places.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_place.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_place.is_empty()
    }
}

// =============================================================================
// ResourceTables
// =============================================================================

/// Every lookup table the feature extractor consults.
#[derive(Debug, Clone, Default)]
pub struct ResourceTables {
    /// Male first names and nouns.
    pub male: WordList,
    /// Female first names and nouns.
    pub female: WordList,
    /// Neuter nouns.
    pub neutral: WordList,
    /// Animate nouns.
    pub animate: WordList,
    /// Inanimate nouns.
    pub inanimate: WordList,
    /// Plural-only nouns.
    pub plural: WordList,
    /// Singular-only nouns.
    pub singular: WordList,
    /// Place/demonym pairs.
    pub demonyms: DemonymTable,
}

macro_rules! with_list {
    ($method:ident, $field:ident) => {
        #[doc = concat!("Replace the `", stringify!($field), "` list.")]
        #[must_use]
        pub fn $method<I, S>(mut self, words: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: AsRef<str>,
        {
            self.$field = WordList::from_words(stringify!($field), words);
            self
        }
    };
}

impl ResourceTables {
    /// Empty tables; every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    with_list!(with_male, male);
    with_list!(with_female, female);
    with_list!(with_neutral, neutral);
    with_list!(with_animate, animate);
    with_list!(with_inanimate, inanimate);
    with_list!(with_plural, plural);
    with_list!(with_singular, singular);

    /// Add demonyms for a place.
    #[must_use]
    pub fn with_demonyms<I, S>(mut self, place: &str, demonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.demonyms.insert(place, demonyms);
        self
    }

    /// Load every configured table. Unset paths leave the table empty.
    pub fn load(paths: &ResourcePaths) -> Result<Self> {
        let list = |p: &Option<std::path::PathBuf>, name: &str| -> Result<WordList> {
            match p {
                Some(path) => WordList::load(path),
                None => Ok(WordList::new(name)),
            }
        };
        let tables = Self {
            male: list(&paths.male, "male")?,
            female: list(&paths.female, "female")?,
            neutral: list(&paths.neutral, "neutral")?,
            animate: list(&paths.animate, "animate")?,
            inanimate: list(&paths.inanimate, "inanimate")?,
            plural: list(&paths.plural, "plural")?,
            singular: list(&paths.singular, "singular")?,
            demonyms: match &paths.demonyms {
                Some(path) => DemonymTable::load(path)?,
                None => DemonymTable::new(),
            },
        };
        info!(
            "Loaded resource tables: male={} female={} neutral={} animate={} inanimate={} plural={} singular={} demonym places={}",
            tables.male.len(),
            tables.female.len(),
            tables.neutral.len(),
            tables.animate.len(),
            tables.inanimate.len(),
            tables.plural.len(),
            tables.singular.len(),
            tables.demonyms.len()
        );
        Ok(tables)
    }
}

fn read_resource(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::resource(path, e.to_string()))
}

fn entries(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}
