//! Per-mention feature extraction.
//!
//! Turns [`MentionSpan`]s into fully described [`Mention`]s: head, type,
//! gender, number, animacy, person, entity type and speaker. Every attribute
//! ends up either concrete or explicitly unknown; sieves treat unknown as
//! compatible with anything.

use crate::document::{Document, Sentence, Token};
use crate::extract::MentionSpan;
use crate::lexicon::{self, PronounInfo};
use crate::mention::{
    Animacy, Attributes, EntityType, Gender, Mention, MentionId, MentionSet, MentionType, Number,
    Person,
};
use crate::resources::ResourceTables;
use crate::tree::ParseTree;

/// POS tags that open a post-head modifier (PP, relative clause, ...).
fn is_trailing_modifier(pos: &str) -> bool {
    matches!(
        pos,
        "IN" | "TO" | "," | ":" | "WDT" | "WP" | "WP$" | "MD" | "-LRB-"
    ) || pos.starts_with("VB")
}

fn is_noun_tag(pos: &str) -> bool {
    pos.starts_with("NN") || pos.starts_with("PRP")
}

/// End of the head phrase of `[start, end)`: the first post-head modifier,
/// or a conjunction following a noun, else `end`.
fn head_phrase_end(tokens: &[Token], start: usize, end: usize) -> usize {
    let end = end.min(tokens.len());
    if start + 1 >= end {
        return end.max(start + 1);
    }
    (start + 1..end)
        .find(|&i| {
            is_trailing_modifier(&tokens[i].pos)
                || (tokens[i].pos == "CC" && is_noun_tag(&tokens[i - 1].pos))
        })
        .unwrap_or(end)
}

/// Head token of `[start, end)`.
///
/// The span is cut at the end of its head phrase; the head is the rightmost
/// noun or pronoun before the cut, else the rightmost number, else the last
/// token before the cut.
#[must_use]
pub fn head_index(tokens: &[Token], start: usize, end: usize) -> usize {
    if start + 1 >= end.min(tokens.len()) {
        return start;
    }
    let limit = head_phrase_end(tokens, start, end);
    (start..limit)
        .rev()
        .find(|&i| is_noun_tag(&tokens[i].pos))
        .or_else(|| (start..limit).rev().find(|&i| tokens[i].pos == "CD"))
        .unwrap_or(limit - 1)
}

/// Build the document's mention arena from extracted spans.
///
/// Spans must already be in document order; ids are assigned from 1.
#[must_use]
pub fn build_mentions(
    doc: &Document,
    trees: &[Option<ParseTree>],
    spans: Vec<MentionSpan>,
    tables: &ResourceTables,
) -> MentionSet {
    let mentions = spans
        .into_iter()
        .enumerate()
        .map(|(i, span)| {
            let sentence = &doc.sentences[span.sentence];
            let tree = trees.get(span.sentence).and_then(Option::as_ref);
            describe(MentionId::from_index(i), &span, sentence, tree, tables)
        })
        .collect();
    MentionSet::new(mentions, doc.sentences.len())
}

fn pronoun_info(span: &MentionSpan, tokens: &[Token]) -> Option<&'static PronounInfo> {
    if span.end - span.start != 1 {
        return None;
    }
    let tok = &tokens[span.start];
    let info = lexicon::pronoun(&tok.word)?;
    if span.relative {
        return info.relative.then_some(info);
    }
    (!info.relative && tok.pos.starts_with("PRP")).then_some(info)
}

fn describe(
    id: MentionId,
    span: &MentionSpan,
    sentence: &Sentence,
    tree: Option<&ParseTree>,
    tables: &ResourceTables,
) -> Mention {
    let tokens = &sentence.tokens;
    let (start, end) = (span.start, span.end);
    let info = pronoun_info(span, tokens);
    let head = if info.is_some() {
        start
    } else {
        head_index(tokens, start, end)
    };
    let head_tok = &tokens[head];
    let head_word = head_tok.lower();
    let head_lemma = head_tok.lemma.as_deref().map(str::to_lowercase);
    let forms: Vec<&str> = std::iter::once(head_word.as_str())
        .chain(head_lemma.as_deref())
        .collect();
    let node = tree.and_then(|t| {
        t.highest_node_with_span(start, end)
            .or_else(|| t.covering_node(start, end))
    });

    let mention_type = if info.is_some() {
        MentionType::Pronoun
    } else if head_tok.pos.starts_with("NNP") || head_tok.is_entity() {
        MentionType::Proper
    } else {
        MentionType::Nominal
    };

    let (attributes, person) = match info {
        Some(p) => (
            Attributes {
                gender: p.gender,
                number: p.number,
                animacy: p.animacy,
                entity_type: EntityType::Unknown,
            },
            p.person,
        ),
        None => {
            let entity_type = EntityType::from_tag(&head_tok.ner);
            let attrs = Attributes {
                number: number_of(tokens, start, head, &entity_type, tree, node, tables),
                gender: gender_of(tokens, start, end, &forms, &entity_type, tables),
                animacy: animacy_of(&forms, &entity_type, tables),
                entity_type,
            };
            (attrs, Person::Third)
        }
    };

    // every other content word of the head phrase, "Apollo [13]" included
    let modifiers = if info.is_some() {
        Vec::new()
    } else {
        (start..head_phrase_end(tokens, start, end))
            .filter(|&i| i != head)
            .map(|i| &tokens[i])
            .filter(|t| t.pos.starts_with("NN") || t.pos.starts_with("JJ") || t.pos == "CD")
            .map(Token::lower)
            .collect()
    };

    Mention {
        id,
        sentence: span.sentence,
        start,
        end,
        head,
        mention_type,
        attributes,
        person,
        speaker: sentence.speaker_at(head).map(str::to_string),
        text: sentence.span_text(start, end),
        head_word,
        words: tokens[start..end].iter().map(Token::lower).collect(),
        modifiers,
        node,
        reflexive: info.map_or(false, |p| p.reflexive),
        relative: span.relative,
        indefinite: info.is_none() && lexicon::is_indefinite(&tokens[start].word),
    }
}

/// `NP` node with a conjunction between two `NP` children.
fn is_coordinated(tree: &ParseTree, node: usize) -> bool {
    if tree.label(node) != "NP" {
        return false;
    }
    let children = &tree.node(node).children;
    let nps = children.iter().filter(|&&c| tree.label(c) == "NP").count();
    nps >= 2 && children.iter().any(|&c| tree.label(c) == "CC")
}

fn number_of(
    tokens: &[Token],
    start: usize,
    head: usize,
    entity: &EntityType,
    tree: Option<&ParseTree>,
    node: Option<usize>,
    tables: &ResourceTables,
) -> Number {
    if *entity == EntityType::Organization {
        return Number::Unknown;
    }
    if let (Some(tree), Some(node)) = (tree, node) {
        if is_coordinated(tree, node) {
            return Number::Plural;
        }
    }
    let head_word = &tokens[head].word;
    if tables.plural.contains(head_word) {
        return Number::Plural;
    }
    if tables.singular.contains(head_word) {
        return Number::Singular;
    }
    if start < head {
        let n = lexicon::determiner_number(&tokens[start].word);
        if n != Number::Unknown {
            return n;
        }
    }
    match tokens[head].pos.as_str() {
        "NNS" | "NNPS" => Number::Plural,
        "NN" | "NNP" => Number::Singular,
        _ => Number::Unknown,
    }
}

fn gender_of(
    tokens: &[Token],
    start: usize,
    end: usize,
    forms: &[&str],
    entity: &EntityType,
    tables: &ResourceTables,
) -> Gender {
    let lookup = |w: &str| {
        if tables.male.contains(w) {
            Gender::Male
        } else if tables.female.contains(w) {
            Gender::Female
        } else if tables.neutral.contains(w) {
            Gender::Neutral
        } else {
            Gender::Unknown
        }
    };

    if *entity == EntityType::Person {
        // first name decides
        let first = tokens[start..end]
            .iter()
            .find(|t| EntityType::from_tag(&t.ner) == EntityType::Person);
        if let Some(first) = first {
            let g = lookup(&first.word);
            if g != Gender::Unknown {
                return g;
            }
        }
    }
    let g = forms
        .iter()
        .map(|w| lookup(w))
        .find(|g| *g != Gender::Unknown)
        .unwrap_or(Gender::Unknown);
    if g != Gender::Unknown {
        return g;
    }
    match entity {
        EntityType::Unknown | EntityType::Person => Gender::Unknown,
        _ => Gender::Neutral,
    }
}

fn animacy_of(forms: &[&str], entity: &EntityType, tables: &ResourceTables) -> Animacy {
    match entity {
        EntityType::Person => return Animacy::Animate,
        _ if forms.iter().any(|w| tables.demonyms.is_demonym(w)) => return Animacy::Animate,
        EntityType::Organization | EntityType::Location => return Animacy::Inanimate,
        _ => {}
    }
    for w in forms {
        if tables.animate.contains(w) {
            return Animacy::Animate;
        }
        if tables.inanimate.contains(w) {
            return Animacy::Inanimate;
        }
    }
    Animacy::Unknown
}
