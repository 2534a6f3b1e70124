//! Shared documents, tables and proptest strategies for integration tests.

#![allow(dead_code)]

use proptest::prelude::*;
use sieve_coref::{Document, ResourceTables, Sentence, Token};

/// Build a sentence from `(word, pos, ner)` triples.
pub fn sentence(tokens: &[(&str, &str, &str)], parse: Option<&str>) -> Sentence {
    let tokens = tokens
        .iter()
        .map(|&(w, p, n)| Token::new(w, p).with_ner(n))
        .collect();
    let s = Sentence::new(tokens);
    match parse {
        Some(p) => s.with_parse(p),
        None => s,
    }
}

/// Small gender tables covering the scenario documents.
pub fn tables() -> ResourceTables {
    ResourceTables::new()
        .with_male(["dan", "ed", "john", "bill"])
        .with_female(["mom", "mary"])
        .with_inanimate(["city", "company"])
        .with_demonyms("america", ["american", "americans"])
}

/// "Dan Ramage is working for Microsoft. He's in Seattle! At least, he used
/// to be. Ed is not in Seattle."
pub fn scenario_a() -> Document {
    Document::new(vec![
        sentence(
            &[
                ("Dan", "NNP", "PERSON"),
                ("Ramage", "NNP", "PERSON"),
                ("is", "VBZ", "O"),
                ("working", "VBG", "O"),
                ("for", "IN", "O"),
                ("Microsoft", "NNP", "ORGANIZATION"),
                (".", ".", "O"),
            ],
            Some("(ROOT (S (NP (NNP Dan) (NNP Ramage)) (VP (VBZ is) (VP (VBG working) (PP (IN for) (NP (NNP Microsoft))))) (. .)))"),
        ),
        sentence(
            &[
                ("He", "PRP", "O"),
                ("'s", "VBZ", "O"),
                ("in", "IN", "O"),
                ("Seattle", "NNP", "LOCATION"),
                ("!", ".", "O"),
            ],
            Some("(ROOT (S (NP (PRP He)) (VP (VBZ 's) (PP (IN in) (NP (NNP Seattle)))) (. !)))"),
        ),
        sentence(
            &[
                ("At", "IN", "O"),
                ("least", "JJS", "O"),
                (",", ",", "O"),
                ("he", "PRP", "O"),
                ("used", "VBD", "O"),
                ("to", "TO", "O"),
                ("be", "VB", "O"),
                (".", ".", "O"),
            ],
            Some("(ROOT (S (ADVP (IN At) (JJS least)) (, ,) (NP (PRP he)) (VP (VBD used) (S (VP (TO to) (VP (VB be))))) (. .)))"),
        ),
        sentence(
            &[
                ("Ed", "NNP", "PERSON"),
                ("is", "VBZ", "O"),
                ("not", "RB", "O"),
                ("in", "IN", "O"),
                ("Seattle", "NNP", "LOCATION"),
                (".", ".", "O"),
            ],
            Some("(ROOT (S (NP (NNP Ed)) (VP (VBZ is) (RB not) (PP (IN in) (NP (NNP Seattle)))) (. .)))"),
        ),
    ])
}

/// "Your mom thinks she lives in Denver, but it's a big city. She actually
/// lives outside of Denver."
pub fn scenario_b() -> Document {
    Document::new(vec![
        sentence(
            &[
                ("Your", "PRP$", "O"),
                ("mom", "NN", "O"),
                ("thinks", "VBZ", "O"),
                ("she", "PRP", "O"),
                ("lives", "VBZ", "O"),
                ("in", "IN", "O"),
                ("Denver", "NNP", "LOCATION"),
                (",", ",", "O"),
                ("but", "CC", "O"),
                ("it", "PRP", "O"),
                ("'s", "VBZ", "O"),
                ("a", "DT", "O"),
                ("big", "JJ", "O"),
                ("city", "NN", "O"),
                (".", ".", "O"),
            ],
            Some("(ROOT (S (S (NP (PRP$ Your) (NN mom)) (VP (VBZ thinks) (SBAR (S (NP (PRP she)) (VP (VBZ lives) (PP (IN in) (NP (NNP Denver)))))))) (, ,) (CC but) (S (NP (PRP it)) (VP (VBZ 's) (NP (DT a) (JJ big) (NN city)))) (. .)))"),
        ),
        sentence(
            &[
                ("She", "PRP", "O"),
                ("actually", "RB", "O"),
                ("lives", "VBZ", "O"),
                ("outside", "IN", "O"),
                ("of", "IN", "O"),
                ("Denver", "NNP", "LOCATION"),
                (".", ".", "O"),
            ],
            Some("(ROOT (S (NP (PRP She)) (ADVP (RB actually)) (VP (VBZ lives) (PP (IN outside) (PP (IN of) (NP (NNP Denver))))) (. .)))"),
        ),
    ])
}

/// Scenario A with every parse removed.
pub fn without_parses(mut doc: Document) -> Document {
    for s in &mut doc.sentences {
        s.parse = None;
    }
    doc
}

// =============================================================================
// Strategies
// =============================================================================

/// A noun phrase: its tokens and its bracketed form.
#[derive(Debug, Clone)]
pub struct Phrase {
    /// `(word, pos, ner)` per token.
    pub tokens: Vec<(&'static str, &'static str, &'static str)>,
}

impl Phrase {
    fn bracketed(&self) -> String {
        let inner: Vec<String> = self
            .tokens
            .iter()
            .map(|(w, p, _)| format!("({} {})", p, w))
            .collect();
        format!("(NP {})", inner.join(" "))
    }
}

const PRONOUNS: &[&str] = &["he", "she", "it", "they", "i", "you", "we"];
const NAMES: &[(&str, &str)] = &[
    ("Dan", "PERSON"),
    ("Mary", "PERSON"),
    ("Ed", "PERSON"),
    ("Seattle", "LOCATION"),
    ("Microsoft", "ORGANIZATION"),
];
const NOUNS: &[&str] = &["dog", "city", "company", "mom", "doctor"];
const DETERMINERS: &[&str] = &["the", "a", "this"];
const POSSESSIVES: &[&str] = &["his", "her", "its", "their", "my"];
const VERBS: &[&str] = &["saw", "liked", "called", "left"];

/// A random noun phrase.
pub fn phrase_strategy() -> impl Strategy<Value = Phrase> {
    prop_oneof![
        prop::sample::select(PRONOUNS).prop_map(|w| Phrase {
            tokens: vec![(w, "PRP", "O")],
        }),
        prop::sample::select(NAMES).prop_map(|(w, ner)| Phrase {
            tokens: vec![(w, "NNP", ner)],
        }),
        (prop::sample::select(DETERMINERS), prop::sample::select(NOUNS)).prop_map(|(d, n)| {
            Phrase {
                tokens: vec![(d, "DT", "O"), (n, "NN", "O")],
            }
        }),
        (prop::sample::select(POSSESSIVES), prop::sample::select(NOUNS)).prop_map(|(p, n)| {
            Phrase {
                tokens: vec![(p, "PRP$", "O"), (n, "NN", "O")],
            }
        }),
    ]
}

/// Subject, verb, optional object; the parse is sometimes left out.
pub fn sentence_strategy() -> impl Strategy<Value = Sentence> {
    (
        phrase_strategy(),
        prop::sample::select(VERBS),
        prop::option::of(phrase_strategy()),
        prop::bool::weighted(0.8),
    )
        .prop_map(|(subject, verb, object, parsed)| {
            let mut tokens = subject.tokens.clone();
            tokens.push((verb, "VBD", "O"));
            let vp = match &object {
                Some(o) => {
                    tokens.extend(o.tokens.iter().copied());
                    format!("(VP (VBD {}) {})", verb, o.bracketed())
                }
                None => format!("(VP (VBD {}))", verb),
            };
            tokens.push((".", ".", "O"));
            let parse = format!("(ROOT (S {} {} (. .)))", subject.bracketed(), vp);
            sentence(&tokens, parsed.then_some(parse.as_str()))
        })
}

/// A document of up to six generated sentences.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::vec(sentence_strategy(), 0..6).prop_map(Document::new)
}
