//! Reserved keyword set used to validate schema object names.
//!
//! The default set is data, not code: it is read from `reserved_keywords.txt`
//! (bundled at compile time) and can be extended at runtime or replaced by a
//! TOML document:
//!
//! ```toml
//! # Keep the bundled words and add two more.
//! extend_defaults = true
//! keywords = ["graph", "materialized"]
//! ```

use crate::error::CqlResult;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::LazyLock;

const BUNDLED_KEYWORDS: &str = include_str!("reserved_keywords.txt");

static CQL_KEYWORDS: LazyLock<KeywordSet> =
    LazyLock::new(|| KeywordSet::from_words(parse_keyword_list(BUNDLED_KEYWORDS)));

/// A case-insensitive set of reserved words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    // Stored upper-cased.
    words: HashSet<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordFile {
    #[serde(default = "default_extend")]
    extend_defaults: bool,
    #[serde(default)]
    keywords: Vec<String>,
}

fn default_extend() -> bool {
    true
}

fn parse_keyword_list(data: &str) -> impl Iterator<Item = &str> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

impl KeywordSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled CQL reserved words.
    pub fn cql() -> &'static KeywordSet {
        &CQL_KEYWORDS
    }

    /// Build a set from arbitrary words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend(words);
        set
    }

    /// Load a set from a TOML document with `keywords` and `extend_defaults` keys.
    ///
    /// When `extend_defaults` is true (the default) the bundled words are kept.
    pub fn from_toml_str(s: &str) -> CqlResult<Self> {
        let file: KeywordFile = toml::from_str(s)?;
        let mut set = if file.extend_defaults {
            Self::cql().clone()
        } else {
            Self::new()
        };
        set.extend(&file.keywords);
        Ok(set)
    }

    /// Add words to the set.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                self.words.insert(word.to_ascii_uppercase());
            }
        }
    }

    /// Add one word, builder style.
    pub fn with_keyword(mut self, word: &str) -> Self {
        self.extend([word]);
        self
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
