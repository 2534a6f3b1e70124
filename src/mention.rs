//! Mentions and their linguistic attributes.
//!
//! A [`Mention`] is a token span inside one sentence. Mentions live in a
//! [`MentionSet`] arena and are addressed by [`MentionId`], a dense 1-based
//! index assigned in document order, so the earliest mention always carries
//! the smallest id.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Dense, 1-based mention identifier in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionId(u32);

impl MentionId {
    /// Wrap a raw id. Ids start at 1.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Id of the mention at arena position `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Arena position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for MentionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Agreement behaviour shared by all mention attributes.
///
/// The unknown value agrees with everything. Merging two values keeps the
/// known one; two different known values collapse to unknown.
pub trait Feature: Clone + PartialEq {
    /// True for the unknown value.
    fn is_unknown(&self) -> bool;

    /// The unknown value.
    fn unknown() -> Self;

    /// Compatible when either side is unknown or both are equal.
    fn agrees(&self, other: &Self) -> bool {
        self.is_unknown() || other.is_unknown() || self == other
    }

    /// Aggregate two values for a merged cluster.
    fn merge(&self, other: &Self) -> Self {
        if self.is_unknown() {
            other.clone()
        } else if other.is_unknown() || self == other {
            self.clone()
        } else {
            Self::unknown()
        }
    }
}

macro_rules! unit_feature {
    ($ty:ident) => {
        impl Feature for $ty {
            fn is_unknown(&self) -> bool {
                matches!(self, $ty::Unknown)
            }

            fn unknown() -> Self {
                $ty::Unknown
            }
        }
    };
}

/// Mention category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionType {
    /// Personal, possessive, reflexive or relative pronoun.
    Pronoun,
    /// Proper-noun phrase or named entity.
    Proper,
    /// Common noun phrase.
    Nominal,
}

impl MentionType {
    /// Lower-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MentionType::Pronoun => "pronoun",
            MentionType::Proper => "proper",
            MentionType::Nominal => "nominal",
        }
    }
}

/// Grammatical gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Masculine.
    Male,
    /// Feminine.
    Female,
    /// Neuter.
    Neutral,
    /// Not determined.
    Unknown,
}
unit_feature!(Gender);

/// Grammatical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Number {
    /// One entity.
    Singular,
    /// Several entities.
    Plural,
    /// Not determined.
    Unknown,
}
unit_feature!(Number);

/// Whether the referent can act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animacy {
    /// Person or animal.
    Animate,
    /// Object, place, organization.
    Inanimate,
    /// Not determined.
    Unknown,
}
unit_feature!(Animacy);

/// Grammatical person. Non-pronominal mentions are third person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Person {
    /// I, we.
    First,
    /// You.
    Second,
    /// Everything else.
    Third,
}

/// Coarse named-entity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// PERSON / PER.
    Person,
    /// ORGANIZATION / ORG.
    Organization,
    /// LOCATION / LOC / GPE.
    Location,
    /// Any other non-empty tag (MISC, DATE, ...), upper-cased.
    Other(String),
    /// No entity tag.
    Unknown,
}

impl Feature for EntityType {
    fn is_unknown(&self) -> bool {
        matches!(self, EntityType::Unknown)
    }

    fn unknown() -> Self {
        EntityType::Unknown
    }
}

/// Tags whose spans are quantities rather than referents.
const NUMERIC_TAGS: &[&str] = &[
    "NUMBER", "PERCENT", "MONEY", "QUANTITY", "ORDINAL", "CARDINAL",
];

/// Strip a BIO/BIOES prefix from a tag.
#[must_use]
pub fn strip_bio(tag: &str) -> &str {
    match tag.split_once('-') {
        Some((prefix, rest)) if matches!(prefix, "B" | "I" | "E" | "S" | "L" | "U") => rest,
        _ => tag,
    }
}

impl EntityType {
    /// Map a named-entity tag (`PERSON`, `B-PER`, `I-LOC`, `O`, ...) to a
    /// coarse type.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let label = strip_bio(tag.trim());
        match label.to_uppercase().as_str() {
            "" | "O" => EntityType::Unknown,
            "PER" | "PERSON" => EntityType::Person,
            "ORG" | "ORGANIZATION" => EntityType::Organization,
            "LOC" | "LOCATION" | "GPE" => EntityType::Location,
            other => EntityType::Other(other.to_string()),
        }
    }

    /// True for quantity-like tags (numbers, percentages, money).
    #[must_use]
    pub fn is_numeric_tag(tag: &str) -> bool {
        let label = strip_bio(tag.trim()).to_uppercase();
        NUMERIC_TAGS.contains(&label.as_str())
    }

    /// Display label.
    #[must_use]
    pub fn as_label(&self) -> &str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Organization => "ORGANIZATION",
            EntityType::Location => "LOCATION",
            EntityType::Other(s) => s,
            EntityType::Unknown => "O",
        }
    }
}

/// The agreement attributes aggregated per cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Gender.
    pub gender: Gender,
    /// Number.
    pub number: Number,
    /// Animacy.
    pub animacy: Animacy,
    /// Coarse entity type.
    pub entity_type: EntityType,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            gender: Gender::Unknown,
            number: Number::Unknown,
            animacy: Animacy::Unknown,
            entity_type: EntityType::Unknown,
        }
    }
}

impl Attributes {
    /// True when every attribute agrees.
    #[must_use]
    pub fn agrees(&self, other: &Self) -> bool {
        self.gender.agrees(&other.gender)
            && self.number.agrees(&other.number)
            && self.animacy.agrees(&other.animacy)
            && self.entity_type.agrees(&other.entity_type)
    }

    /// Attribute-wise merge; conflicts downgrade to unknown.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            gender: self.gender.merge(&other.gender),
            number: self.number.merge(&other.number),
            animacy: self.animacy.merge(&other.animacy),
            entity_type: self.entity_type.merge(&other.entity_type),
        }
    }
}

// =============================================================================
// Mention
// =============================================================================

/// A candidate referring expression.
#[derive(Debug, Clone)]
pub struct Mention {
    /// Document-order id.
    pub id: MentionId,
    /// Sentence index.
    pub sentence: usize,
    /// First token (inclusive).
    pub start: usize,
    /// Last token (exclusive).
    pub end: usize,
    /// Head token index within the sentence.
    pub head: usize,
    /// Category.
    pub mention_type: MentionType,
    /// Gender, number, animacy, entity type.
    pub attributes: Attributes,
    /// Grammatical person.
    pub person: Person,
    /// Speaker of the utterance containing the mention.
    pub speaker: Option<String>,
    /// Surface text.
    pub text: String,
    /// Lower-cased head word.
    pub head_word: String,
    /// Lower-cased words of the span.
    pub words: Vec<String>,
    /// Lower-cased nouns, adjectives and numbers of the head phrase other
    /// than the head itself, on either side of it.
    pub modifiers: Vec<String>,
    /// Parse node standing for the span, when the sentence has a parse.
    pub node: Option<usize>,
    /// Reflexive pronoun (himself, themselves, ...).
    pub reflexive: bool,
    /// Relative pronoun heading a relative clause.
    pub relative: bool,
    /// Starts with an indefinite determiner or quantifier.
    pub indefinite: bool,
}

impl Mention {
    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Never true; mentions cover at least one token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True for pronoun mentions.
    #[must_use]
    pub fn is_pronoun(&self) -> bool {
        self.mention_type == MentionType::Pronoun
    }

    /// `(sentence, start, end)`, the document-order key.
    #[must_use]
    pub fn position(&self) -> (usize, usize, usize) {
        (self.sentence, self.start, self.end)
    }

    /// True if `other` lies strictly inside this mention's span.
    #[must_use]
    pub fn contains(&self, other: &Mention) -> bool {
        self.sentence == other.sentence
            && self.start <= other.start
            && other.end <= self.end
            && (self.start, self.end) != (other.start, other.end)
    }
}

// =============================================================================
// MentionSet
// =============================================================================

/// Arena of a document's mentions in document order.
#[derive(Debug, Clone, Default)]
pub struct MentionSet {
    mentions: Vec<Mention>,
    by_sentence: Vec<Range<usize>>,
    /// `containers[i]`: arena positions of mentions properly containing `i`.
    containers: Vec<Vec<usize>>,
}

impl MentionSet {
    /// Build from mentions already sorted by position with ids assigned.
    ///
    /// `sentences` is the sentence count of the document, so every sentence
    /// gets a (possibly empty) range.
    #[must_use]
    pub fn new(mentions: Vec<Mention>, sentences: usize) -> Self {
        let mut by_sentence = Vec::with_capacity(sentences);
        let mut cursor = 0;
        for s in 0..sentences {
            let begin = cursor;
            while cursor < mentions.len() && mentions[cursor].sentence == s {
                cursor += 1;
            }
            by_sentence.push(begin..cursor);
        }

        let mut containers = vec![Vec::new(); mentions.len()];
        for range in &by_sentence {
            for i in range.clone() {
                for j in range.clone() {
                    if i != j && mentions[j].contains(&mentions[i]) {
                        containers[i].push(j);
                    }
                }
            }
        }

        Self {
            mentions,
            by_sentence,
            containers,
        }
    }

    /// Number of mentions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// True when the document produced no mentions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Mention by id.
    #[must_use]
    pub fn get(&self, id: MentionId) -> &Mention {
        &self.mentions[id.index()]
    }

    /// All mentions in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Mention> {
        self.mentions.iter()
    }

    /// Mentions of one sentence in document order.
    #[must_use]
    pub fn in_sentence(&self, sentence: usize) -> &[Mention] {
        match self.by_sentence.get(sentence) {
            Some(range) => &self.mentions[range.clone()],
            None => &[],
        }
    }

    /// True if `outer` properly contains `inner`.
    #[must_use]
    pub fn embeds(&self, outer: MentionId, inner: MentionId) -> bool {
        self.containers[inner.index()].contains(&outer.index())
    }

    /// True if either mention contains the other.
    #[must_use]
    pub fn nested(&self, a: MentionId, b: MentionId) -> bool {
        self.embeds(a, b) || self.embeds(b, a)
    }
}
