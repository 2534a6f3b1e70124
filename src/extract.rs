//! Mention extraction.
//!
//! Candidate spans come from four sources:
//!
//! - pronouns (`PRP`, `PRP$` tokens found in the pronoun lexicon),
//! - named-entity spans from the token tags,
//! - maximal proper-noun runs, widened to the named-entity boundary they
//!   overlap,
//! - `NP` nodes of the parse, plus relative pronouns heading a `WHNP` inside
//!   a relative clause.
//!
//! Duplicates are merged and spurious candidates (pleonastic *it*,
//! existential *there*, quantities, nested spans sharing a head) are dropped.
//! A sentence without a usable parse still yields pronoun and named-entity
//! mentions.

use std::collections::BTreeMap;

use log::{trace, warn};

use crate::document::{Document, Sentence, Token};
use crate::features::head_index;
use crate::lexicon;
use crate::mention::{strip_bio, EntityType};
use crate::tree::ParseTree;

/// A candidate mention span before feature extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSpan {
    /// Sentence index.
    pub sentence: usize,
    /// First token.
    pub start: usize,
    /// One past the last token.
    pub end: usize,
    /// Relative pronoun heading a relative clause.
    pub relative: bool,
}

/// Parse a sentence's bracketed tree, if present and consistent with its
/// tokens. Malformed trees are logged and ignored.
#[must_use]
pub fn sentence_tree(index: usize, sentence: &Sentence) -> Option<ParseTree> {
    let text = sentence.parse.as_deref()?;
    match ParseTree::parse(text) {
        Ok(tree) if tree.leaf_count() == sentence.len() => Some(tree),
        Ok(tree) => {
            warn!(
                "sentence {}: parse has {} leaves for {} tokens, ignoring parse",
                index,
                tree.leaf_count(),
                sentence.len()
            );
            None
        }
        Err(e) => {
            warn!("sentence {}: {}, ignoring parse", index, e);
            None
        }
    }
}

/// Extract the mention spans of a whole document in document order.
#[must_use]
pub fn extract(doc: &Document, trees: &[Option<ParseTree>]) -> Vec<MentionSpan> {
    doc.sentences
        .iter()
        .enumerate()
        .flat_map(|(i, s)| extract_sentence(i, s, trees.get(i).and_then(Option::as_ref)))
        .collect()
}

/// Extract the mention spans of one sentence, ordered by `(start, end)`.
#[must_use]
pub fn extract_sentence(
    index: usize,
    sentence: &Sentence,
    tree: Option<&ParseTree>,
) -> Vec<MentionSpan> {
    let tokens = &sentence.tokens;
    let entities = entity_spans(tokens);

    // (start, end) -> relative
    let mut spans: BTreeMap<(usize, usize), bool> = BTreeMap::new();

    for (i, tok) in tokens.iter().enumerate() {
        if matches!(tok.pos.as_str(), "PRP" | "PRP$") && lexicon::is_personal_pronoun(&tok.word) {
            spans.insert((i, i + 1), false);
        }
    }

    for e in &entities {
        if !e.numeric {
            spans.entry((e.start, e.end)).or_insert(false);
        }
    }

    for (start, end) in proper_runs(tokens, &entities) {
        spans.entry((start, end)).or_insert(false);
    }

    if let Some(tree) = tree {
        for node in tree.preorder() {
            if tree.label(node) != "NP" || tree.is_preterminal(node) {
                continue;
            }
            let n = tree.node(node);
            if n.start >= n.end || inside_entity(&entities, n.start, n.end) {
                continue;
            }
            spans.entry((n.start, n.end)).or_insert(false);
        }
        for i in relative_pronouns(tree, tokens) {
            spans.insert((i, i + 1), true);
        }
    }

    let candidates: Vec<(usize, usize, bool)> =
        spans.into_iter().map(|((s, e), r)| (s, e, r)).collect();
    let kept = remove_spurious(tokens, candidates);

    trace!("sentence {}: {} mention(s)", index, kept.len());
    kept.into_iter()
        .map(|(start, end, relative)| MentionSpan {
            sentence: index,
            start,
            end,
            relative,
        })
        .collect()
}

#[derive(Debug)]
struct EntitySpan {
    start: usize,
    end: usize,
    label: String,
    numeric: bool,
}

fn entity_label(tok: &Token) -> String {
    strip_bio(&tok.ner).to_uppercase()
}

fn entity_spans(tokens: &[Token]) -> Vec<EntitySpan> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !tokens[i].is_entity() {
            i += 1;
            continue;
        }
        let label = entity_label(&tokens[i]);
        let mut j = i + 1;
        while j < tokens.len()
            && tokens[j].is_entity()
            && !tokens[j].ner.starts_with("B-")
            && entity_label(&tokens[j]) == label
        {
            j += 1;
        }
        out.push(EntitySpan {
            start: i,
            end: j,
            numeric: EntityType::is_numeric_tag(&label),
            label,
        });
        i = j;
    }
    out
}

fn inside_entity(entities: &[EntitySpan], start: usize, end: usize) -> bool {
    entities
        .iter()
        .any(|e| e.start <= start && end <= e.end && (e.start, e.end) != (start, end))
}

fn is_proper_tag(pos: &str) -> bool {
    pos == "NNP" || pos == "NNPS"
}

/// Maximal NNP/NNPS runs, widened to cover each overlapping entity whose
/// label agrees with every tagged token of the run.
fn proper_runs(tokens: &[Token], entities: &[EntitySpan]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !is_proper_tag(&tokens[i].pos) {
            i += 1;
            continue;
        }
        let mut end = i + 1;
        while end < tokens.len() && is_proper_tag(&tokens[end].pos) {
            end += 1;
        }
        let mut start = i;
        let run_end = end;
        for e in entities.iter().filter(|e| !e.numeric) {
            if e.end <= i || e.start >= run_end {
                continue;
            }
            let consistent = tokens[i..run_end]
                .iter()
                .filter(|t| t.is_entity())
                .all(|t| entity_label(t) == e.label);
            if consistent {
                start = start.min(e.start);
                end = end.max(e.end);
            }
        }
        out.push((start, end));
        i = run_end;
    }
    out
}

/// Token indices of relative pronouns: `NP < (SBAR < (WHNP < WP|WDT|WP$))`.
fn relative_pronouns(tree: &ParseTree, tokens: &[Token]) -> Vec<usize> {
    let mut out = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        if !matches!(tok.pos.as_str(), "WP" | "WDT" | "WP$") || !lexicon::is_relative_pronoun(&tok.word) {
            continue;
        }
        let Some(pre) = tree.preterminal(i) else { continue };
        let mut up = tree.ancestors(pre);
        let (Some(whnp), Some(sbar), Some(np)) = (up.next(), up.next(), up.next()) else {
            continue;
        };
        if tree.label(whnp) == "WHNP" && tree.label(sbar) == "SBAR" && tree.label(np) == "NP" {
            out.push(i);
        }
    }
    out
}

/// Pleonastic *it*: "it seems that", "it is likely to", "it is raining".
#[must_use]
pub fn is_pleonastic(tokens: &[Token], index: usize) -> bool {
    if tokens.get(index).map(Token::lower).as_deref() != Some("it") {
        return false;
    }
    let lower_at = |k: usize| tokens.get(k).map(Token::lower);
    let complementizer = |k: usize| matches!(lower_at(k).as_deref(), Some("that" | "to"));

    let Some(verb) = tokens.get(index + 1) else {
        return false;
    };
    if lexicon::is_raising_verb(&verb.word) {
        return complementizer(index + 2);
    }
    if lexicon::is_weather_word(&verb.word) {
        return true;
    }
    if lexicon::is_copula(&verb.word) {
        let mut k = index + 2;
        while tokens.get(k).map_or(false, |t| t.pos.starts_with("RB")) {
            k += 1;
        }
        let Some(pred) = tokens.get(k) else {
            return false;
        };
        if lexicon::is_weather_word(&pred.word) {
            return true;
        }
        if pred.pos.starts_with("JJ") || pred.pos == "VBN" {
            return complementizer(k + 1);
        }
    }
    false
}

fn remove_spurious(
    tokens: &[Token],
    candidates: Vec<(usize, usize, bool)>,
) -> Vec<(usize, usize, bool)> {
    let heads: Vec<usize> = candidates
        .iter()
        .map(|&(s, e, _)| head_index(tokens, s, e))
        .collect();

    let mut keep = vec![true; candidates.len()];
    for (i, &(start, end, relative)) in candidates.iter().enumerate() {
        let single = end - start == 1;
        if single && !relative && is_pleonastic(tokens, start) {
            keep[i] = false;
        } else if single && tokens[start].pos == "EX" {
            keep[i] = false;
        } else if EntityType::is_numeric_tag(&tokens[heads[i]].ner) {
            keep[i] = false;
        } else if tokens[start..end].iter().all(|t| t.pos == "CD") {
            keep[i] = false;
        }
    }

    // inner mention sharing its head with an enclosing one
    for (i, &(s_in, e_in, _)) in candidates.iter().enumerate() {
        let nested = candidates.iter().enumerate().any(|(j, &(s_out, e_out, _))| {
            i != j
                && s_out <= s_in
                && e_in <= e_out
                && (s_out, e_out) != (s_in, e_in)
                && heads[i] == heads[j]
        });
        if !nested {
            continue;
        }
        let followed_by_boundary = tokens
            .get(e_in)
            .map_or(false, |t| matches!(t.pos.as_str(), "," | "CC" | "WDT" | "WP" | "WP$"));
        if !followed_by_boundary {
            keep[i] = false;
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect()
}
