//! The ordered matching rules.
//!
//! A [`Sieve`] decides whether an anaphor may take a candidate antecedent.
//! [`run_pass`] drives one sieve over the whole document: each mention that
//! heads its cluster searches its candidates in [`candidate_order`] and
//! merges with the first one the sieve accepts and [`compatible`] allows.
//!
//! | Sieve | Links |
//! |-------|-------|
//! | `exact_string` | identical text, leading determiners ignored |
//! | `relaxed_string` | identical text up to the head |
//! | `precise_constructs` | apposition, role apposition, predicate nominative, acronym, relative pronoun, demonym |
//! | `strict_head_1..3` | same head with word inclusion and/or compatible modifiers |
//! | `proper_head` | proper names with the same head |
//! | `pronoun` | agreeing antecedent inside the sentence window |

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cluster::ClusterStore;
use crate::config::ResolverConfig;
use crate::document::Document;
use crate::lexicon;
use crate::mention::{Mention, MentionId, MentionSet, Person};
use crate::resources::ResourceTables;
use crate::syntax::{candidate_order, SyntacticRelations};
use crate::tree::ParseTree;
use crate::Error;

pub mod head_match;
pub mod precise;
pub mod pronoun;
pub mod string_match;

pub use head_match::{ProperHeadMatch, StrictHeadMatch, StrictVariant};
pub use precise::PreciseConstructs;
pub use pronoun::PronounMatch;
pub use string_match::{ExactStringMatch, RelaxedStringMatch};

// =============================================================================
// SieveKind
// =============================================================================

/// The sieves, in their fixed run order (the `Ord` impl follows it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SieveKind {
    /// Exact string match.
    ExactString,
    /// Relaxed string match.
    RelaxedString,
    /// Precise syntactic constructs.
    PreciseConstructs,
    /// Head match with word inclusion and compatible modifiers.
    StrictHead1,
    /// Head match with word inclusion.
    StrictHead2,
    /// Head match with compatible modifiers.
    StrictHead3,
    /// Proper-noun head match.
    ProperHead,
    /// Pronoun resolution.
    Pronoun,
}

impl SieveKind {
    /// All sieves in run order.
    pub const ALL: [SieveKind; 8] = [
        SieveKind::ExactString,
        SieveKind::RelaxedString,
        SieveKind::PreciseConstructs,
        SieveKind::StrictHead1,
        SieveKind::StrictHead2,
        SieveKind::StrictHead3,
        SieveKind::ProperHead,
        SieveKind::Pronoun,
    ];

    /// Configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SieveKind::ExactString => "exact_string",
            SieveKind::RelaxedString => "relaxed_string",
            SieveKind::PreciseConstructs => "precise_constructs",
            SieveKind::StrictHead1 => "strict_head_1",
            SieveKind::StrictHead2 => "strict_head_2",
            SieveKind::StrictHead3 => "strict_head_3",
            SieveKind::ProperHead => "proper_head",
            SieveKind::Pronoun => "pronoun",
        }
    }

    /// One-line description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            SieveKind::ExactString => "identical mention text, leading determiners ignored",
            SieveKind::RelaxedString => "identical text up to the head word",
            SieveKind::PreciseConstructs => {
                "apposition, role apposition, predicate nominative, acronym, relative pronoun, demonym"
            }
            SieveKind::StrictHead1 => "same head, word inclusion, compatible modifiers",
            SieveKind::StrictHead2 => "same head, word inclusion",
            SieveKind::StrictHead3 => "same head, compatible modifiers",
            SieveKind::ProperHead => "proper names sharing a head word",
            SieveKind::Pronoun => "pronoun to nearest agreeing antecedent",
        }
    }

    /// Instantiate the sieve.
    #[must_use]
    pub fn build(self) -> Box<dyn Sieve> {
        match self {
            SieveKind::ExactString => Box::new(ExactStringMatch),
            SieveKind::RelaxedString => Box::new(RelaxedStringMatch),
            SieveKind::PreciseConstructs => Box::new(PreciseConstructs),
            SieveKind::StrictHead1 => Box::new(StrictHeadMatch::new(StrictVariant::Full)),
            SieveKind::StrictHead2 => Box::new(StrictHeadMatch::new(StrictVariant::WordInclusion)),
            SieveKind::StrictHead3 => Box::new(StrictHeadMatch::new(StrictVariant::Modifiers)),
            SieveKind::ProperHead => Box::new(ProperHeadMatch),
            SieveKind::Pronoun => Box::new(PronounMatch),
        }
    }
}

impl fmt::Display for SieveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SieveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SieveKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s.trim())
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown sieve '{}' (expected one of: {})",
                    s,
                    SieveKind::ALL.map(SieveKind::name).join(", ")
                ))
            })
    }
}

// =============================================================================
// Sieve trait
// =============================================================================

/// How a sieve justified a link, which selects the checks applied on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Full attribute agreement and i-within-i apply.
    Agreeing,
    /// Lexical relation (demonym): attribute agreement is not required.
    Lexical,
    /// Role apposition: the antecedent may contain the anaphor.
    Embedded,
}

/// Read-only state shared by every sieve while resolving one document.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The document being resolved.
    pub document: &'a Document,
    /// Its mentions.
    pub mentions: &'a MentionSet,
    /// Parse trees per sentence (`None` where unusable).
    pub trees: &'a [Option<ParseTree>],
    /// Syntactic constructs between mentions.
    pub relations: &'a SyntacticRelations,
    /// Resource tables.
    pub tables: &'a ResourceTables,
    /// Resolver options.
    pub config: &'a ResolverConfig,
}

/// One matching rule.
pub trait Sieve: Send + Sync {
    /// Which sieve this is.
    fn kind(&self) -> SieveKind;

    /// Configuration name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Whether `anaphor` starts a search in this pass.
    fn initiates(&self, ctx: &Context<'_>, anaphor: &Mention) -> bool;

    /// Earlier sentences searched; `None` is the whole preceding document.
    fn window(&self, _ctx: &Context<'_>, _anaphor: &Mention) -> Option<usize> {
        None
    }

    /// Whether `candidate` is an acceptable antecedent under this rule.
    fn link(
        &self,
        ctx: &Context<'_>,
        clusters: &ClusterStore,
        anaphor: &Mention,
        candidate: &Mention,
    ) -> Option<Link>;
}

// =============================================================================
// Pass driver
// =============================================================================

/// Run one sieve over the document; returns the number of merges.
pub fn run_pass(sieve: &dyn Sieve, ctx: &Context<'_>, clusters: &mut ClusterStore) -> usize {
    let mut merges = 0;
    for anaphor in ctx.mentions.iter() {
        if clusters.find(anaphor.id) != anaphor.id || !sieve.initiates(ctx, anaphor) {
            continue;
        }
        let window = sieve.window(ctx, anaphor);
        for candidate_id in candidate_order(ctx.mentions, ctx.trees, anaphor, window) {
            if clusters.linked(anaphor.id, candidate_id) {
                continue;
            }
            let candidate = ctx.mentions.get(candidate_id);
            let Some(link) = sieve.link(ctx, clusters, anaphor, candidate) else {
                continue;
            };
            if !compatible(ctx, clusters, anaphor.id, candidate_id, link) {
                continue;
            }
            let root = clusters.merge(anaphor.id, candidate_id);
            debug!(
                "{}: {} '{}' -> {} '{}' (chain {})",
                sieve.name(),
                anaphor.id,
                anaphor.text,
                candidate.id,
                candidate.text,
                root
            );
            merges += 1;
            break;
        }
    }
    debug!("{}: {} merge(s)", sieve.name(), merges);
    merges
}

/// Checks every sieve applies before merging two clusters.
///
/// Rejects already linked pairs, disagreeing aggregated attributes (unless
/// the link is lexical), any member pair in an i-within-i relation and any
/// member pair whose person and speaker cannot match. A role apposition
/// exempts only the linked pair itself from the i-within-i check.
#[must_use]
pub fn compatible(
    ctx: &Context<'_>,
    clusters: &ClusterStore,
    anaphor: MentionId,
    candidate: MentionId,
    link: Link,
) -> bool {
    if clusters.linked(anaphor, candidate) {
        return false;
    }
    if link != Link::Lexical && !clusters.attributes(anaphor).agrees(clusters.attributes(candidate))
    {
        return false;
    }
    for a in clusters.members(anaphor) {
        for b in clusters.members(candidate) {
            let sanctioned = link == Link::Embedded && a == anaphor && b == candidate;
            if !sanctioned && ctx.mentions.nested(a, b) {
                return false;
            }
            if !person_compatible(ctx.mentions.get(a), ctx.mentions.get(b)) {
                return false;
            }
        }
    }
    true
}

/// Person and speaker agreement between two mentions.
///
/// - third person pronouns go with anything third person,
/// - first person pronouns of the same known speaker match, as do "I" and
///   "you" across a speaker change,
/// - a first person pronoun matches a name only when the name is its
///   speaker's,
/// - second person pronouns never take a non-pronominal antecedent.
#[must_use]
pub fn person_compatible(a: &Mention, b: &Mention) -> bool {
    match (a.is_pronoun(), b.is_pronoun()) {
        (false, false) => true,
        (true, false) => pronoun_matches_name(a, b),
        (false, true) => pronoun_matches_name(b, a),
        (true, true) => match (a.person, b.person) {
            (Person::Third, Person::Third) => true,
            (p, q) if p == q => match (&a.speaker, &b.speaker) {
                (Some(x), Some(y)) => x == y,
                _ => true,
            },
            (Person::First, Person::Second) | (Person::Second, Person::First) => {
                matches!((&a.speaker, &b.speaker), (Some(x), Some(y)) if x != y)
            }
            _ => false,
        },
    }
}

fn pronoun_matches_name(pronoun: &Mention, other: &Mention) -> bool {
    match pronoun.person {
        Person::Third => true,
        Person::First => pronoun
            .speaker
            .as_deref()
            .map_or(false, |s| names_speaker(other, s)),
        Person::Second => false,
    }
}

fn names_speaker(m: &Mention, speaker: &str) -> bool {
    let speaker = speaker.to_lowercase();
    m.text.to_lowercase() == speaker || speaker.split_whitespace().any(|w| w == m.head_word)
}

fn location_modifiers(m: &Mention) -> HashSet<&str> {
    m.words
        .iter()
        .map(String::as_str)
        .filter(|w| lexicon::is_location_modifier(w))
        .collect()
}

fn numerals(m: &Mention) -> HashSet<&str> {
    m.words
        .iter()
        .map(String::as_str)
        .filter(|w| w.chars().any(|c| c.is_ascii_digit()))
        .collect()
}

/// Location modifiers must be identical and every number in the anaphor
/// must appear in the candidate ("Northern Ireland" is not "Ireland",
/// "Apollo 13" is not "Apollo 11").
#[must_use]
pub fn modifiers_agree(anaphor: &Mention, candidate: &Mention) -> bool {
    location_modifiers(anaphor) == location_modifiers(candidate)
        && numerals(anaphor).is_subset(&numerals(candidate))
}

/// Lower-cased words with leading determiners removed.
#[must_use]
pub fn normalized_words(words: &[String]) -> &[String] {
    let skip = words
        .iter()
        .take_while(|w| lexicon::is_determiner(w))
        .count();
    &words[skip..]
}

/// Lower-cased text with leading determiners removed.
#[must_use]
pub fn normalized_text(m: &Mention) -> String {
    normalized_words(&m.words).join(" ")
}

/// Document preparation shared by the sieve unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::document::{Sentence, Token};
    use crate::extract::{extract, sentence_tree};
    use crate::features::build_mentions;

    pub(crate) fn tok(word: &str, pos: &str, ner: &str) -> Token {
        Token::new(word, pos).with_ner(ner)
    }

    pub(crate) fn sentence(tokens: &[(&str, &str, &str)], parse: Option<&str>) -> Sentence {
        let s = Sentence::new(tokens.iter().map(|&(w, p, n)| tok(w, p, n)).collect());
        match parse {
            Some(p) => s.with_parse(p),
            None => s,
        }
    }

    /// "Apollo <number> <verb>", tagged MISC, with a parse.
    pub(crate) fn apollo(number: &str, verb: &str) -> Sentence {
        let parse = format!("(ROOT (S (NP (NNP Apollo) (CD {})) (VP (VBD {}))))", number, verb);
        sentence(
            &[("Apollo", "NNP", "MISC"), (number, "CD", "MISC"), (verb, "VBD", "O")],
            Some(parse.as_str()),
        )
    }

    /// A document with its mentions, trees and relations extracted.
    pub(crate) struct Prepared {
        pub document: Document,
        pub trees: Vec<Option<ParseTree>>,
        pub mentions: MentionSet,
        pub relations: SyntacticRelations,
        pub tables: ResourceTables,
        pub config: ResolverConfig,
    }

    impl Prepared {
        pub(crate) fn new(sentences: Vec<Sentence>, tables: ResourceTables) -> Self {
            let document = Document::new(sentences);
            let trees: Vec<_> = document
                .sentences
                .iter()
                .enumerate()
                .map(|(i, s)| sentence_tree(i, s))
                .collect();
            let spans = extract(&document, &trees);
            let mentions = build_mentions(&document, &trees, spans, &tables);
            let relations = SyntacticRelations::find(&mentions, &trees);
            Self {
                document,
                trees,
                mentions,
                relations,
                tables,
                config: ResolverConfig::default(),
            }
        }

        pub(crate) fn ctx(&self) -> Context<'_> {
            Context {
                document: &self.document,
                mentions: &self.mentions,
                trees: &self.trees,
                relations: &self.relations,
                tables: &self.tables,
                config: &self.config,
            }
        }

        /// Id of the mention spanning `[start, end)` of `sentence`.
        pub(crate) fn id(&self, sentence: usize, start: usize, end: usize) -> MentionId {
            match self
                .mentions
                .in_sentence(sentence)
                .iter()
                .find(|m| (m.start, m.end) == (start, end))
            {
                Some(m) => m.id,
                None => panic!("no mention at {}:{}-{}", sentence, start, end),
            }
        }

        /// Clusters after one pass of `kind` over singletons.
        pub(crate) fn run(&self, kind: SieveKind) -> ClusterStore {
            let mut clusters = ClusterStore::new(&self.mentions);
            run_pass(kind.build().as_ref(), &self.ctx(), &mut clusters);
            clusters
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for kind in SieveKind::ALL {
            assert_eq!(kind.name().parse::<SieveKind>().unwrap(), kind);
            assert_eq!(kind.build().kind(), kind);
        }
        assert!("bogus".parse::<SieveKind>().is_err());
    }

    #[test]
    fn test_canonical_order() {
        let mut shuffled = vec![SieveKind::Pronoun, SieveKind::ExactString, SieveKind::StrictHead2];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![SieveKind::ExactString, SieveKind::StrictHead2, SieveKind::Pronoun]
        );
    }

    fn his_chairman() -> Prepared {
        Prepared::new(
            vec![sentence(
                &[
                    ("his", "PRP$", "O"),
                    ("chairman", "NN", "O"),
                    ("Bill", "NNP", "PERSON"),
                    ("Gates", "NNP", "PERSON"),
                ],
                Some("(ROOT (NP (NP (PRP$ his) (NN chairman)) (NP (NNP Bill) (NNP Gates))))"),
            )],
            ResourceTables::new(),
        )
    }

    #[test]
    fn test_role_apposition_exempts_only_the_linked_pair() {
        let p = his_chairman();
        let (his, role, whole) = (p.id(0, 0, 1), p.id(0, 0, 2), p.id(0, 0, 4));
        let ctx = p.ctx();
        let mut clusters = ClusterStore::new(&p.mentions);
        assert!(compatible(&ctx, &clusters, whole, role, Link::Embedded));
        assert!(!compatible(&ctx, &clusters, whole, role, Link::Agreeing));

        clusters.merge(his, whole);
        // "his" lies inside "his chairman" and is not part of the role link
        assert!(!compatible(&ctx, &clusters, whole, role, Link::Embedded));
    }

    #[test]
    fn test_compatible_rejects_linked_and_disagreeing() {
        let p = Prepared::new(
            vec![
                sentence(&[("Dan", "NNP", "PERSON"), ("left", "VBD", "O")], None),
                sentence(&[("Mary", "NNP", "PERSON"), ("stayed", "VBD", "O")], None),
                sentence(&[("Ed", "NNP", "PERSON"), ("came", "VBD", "O")], None),
            ],
            ResourceTables::new().with_male(["dan", "ed"]).with_female(["mary"]),
        );
        let (dan, mary, ed) = (p.id(0, 0, 1), p.id(1, 0, 1), p.id(2, 0, 1));
        let ctx = p.ctx();
        let mut clusters = ClusterStore::new(&p.mentions);
        assert!(!compatible(&ctx, &clusters, mary, dan, Link::Agreeing));
        assert!(compatible(&ctx, &clusters, mary, dan, Link::Lexical));
        assert!(compatible(&ctx, &clusters, ed, dan, Link::Agreeing));
        clusters.merge(ed, dan);
        assert!(!compatible(&ctx, &clusters, ed, dan, Link::Agreeing));
    }

    #[test]
    fn test_normalized_words() {
        let words: Vec<String> = ["the", "big", "city"].iter().map(|s| s.to_string()).collect();
        assert_eq!(normalized_words(&words), &words[1..]);
        let only: Vec<String> = vec!["this".to_string()];
        assert!(normalized_words(&only).is_empty());
    }
}
