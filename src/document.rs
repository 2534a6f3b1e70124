//! Pre-annotated input documents.
//!
//! Tokenization, tagging, named-entity recognition and parsing happen
//! upstream. A [`Document`] is the record those stages hand over: sentences
//! of tokens, each token carrying its part-of-speech and named-entity tags,
//! plus an optional bracketed parse and speaker per sentence.
//!
//! Every per-token attribute is a named field. The only field written by
//! resolution is [`Token::coref_chain`].

use serde::{Deserialize, Serialize};

use crate::mention::strip_bio;

/// Named-entity tag for tokens outside any entity.
pub const OUTSIDE: &str = "O";

/// A single annotated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form.
    pub word: String,
    /// Penn Treebank part-of-speech tag.
    pub pos: String,
    /// Named-entity tag (`O` outside entities; `B-`/`I-` prefixes accepted).
    #[serde(default = "outside")]
    pub ner: String,
    /// Lemma, when the upstream stemmer provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    /// Speaker of the utterance this token belongs to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Chain id written back by resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coref_chain: Option<u32>,
}

fn outside() -> String {
    OUTSIDE.to_string()
}

impl Token {
    /// Create a token with a word and POS tag, outside any entity.
    #[must_use]
    pub fn new(word: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            pos: pos.into(),
            ner: outside(),
            lemma: None,
            speaker: None,
            coref_chain: None,
        }
    }

    /// Set the named-entity tag.
    #[must_use]
    pub fn with_ner(mut self, ner: impl Into<String>) -> Self {
        self.ner = ner.into();
        self
    }

    /// Set the lemma.
    #[must_use]
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    /// Lower-cased surface form.
    #[must_use]
    pub fn lower(&self) -> String {
        self.word.to_lowercase()
    }

    /// True if the token is inside a named entity. A bare prefix such as
    /// `B-` carries no label and counts as outside.
    #[must_use]
    pub fn is_entity(&self) -> bool {
        let label = strip_bio(self.ner.trim());
        !label.is_empty() && !label.eq_ignore_ascii_case(OUTSIDE)
    }
}

/// One sentence: tokens plus optional parse and speaker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Tokens in order.
    pub tokens: Vec<Token>,
    /// Penn Treebank bracketed parse, e.g. `(ROOT (S (NP (PRP He)) ...))`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    /// Speaker of the whole sentence, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl Sentence {
    /// Create a sentence without a parse.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            parse: None,
            speaker: None,
        }
    }

    /// Attach a bracketed parse.
    #[must_use]
    pub fn with_parse(mut self, parse: impl Into<String>) -> Self {
        self.parse = Some(parse.into());
        self
    }

    /// Attach a speaker.
    #[must_use]
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if the sentence has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Speaker of the token at `index`, falling back to the sentence speaker.
    #[must_use]
    pub fn speaker_at(&self, index: usize) -> Option<&str> {
        self.tokens
            .get(index)
            .and_then(|t| t.speaker.as_deref())
            .or(self.speaker.as_deref())
    }

    /// Space-joined surface text of `[start, end)`.
    #[must_use]
    pub fn span_text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.tokens.len());
        if start >= end {
            return String::new();
        }
        self.tokens[start..end]
            .iter()
            .map(|t| t.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A document: ordered sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Optional identifier, carried through to output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Sentences in order.
    pub sentences: Vec<Sentence>,
}

impl Document {
    /// Create a document from sentences.
    #[must_use]
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { id: None, sentences }
    }

    /// Parse a document from its JSON form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total token count.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    /// Clear every chain annotation.
    pub fn clear_chains(&mut self) {
        for token in self.sentences.iter_mut().flat_map(|s| s.tokens.iter_mut()) {
            token.coref_chain = None;
        }
    }

    /// Chain id stamped on a token, if any.
    #[must_use]
    pub fn chain_at(&self, sentence: usize, token: usize) -> Option<u32> {
        self.sentences
            .get(sentence)
            .and_then(|s| s.tokens.get(token))
            .and_then(|t| t.coref_chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_text() {
        let s = Sentence::new(vec![
            Token::new("Dan", "NNP"),
            Token::new("Ramage", "NNP"),
            Token::new("works", "VBZ"),
        ]);
        assert_eq!(s.span_text(0, 2), "Dan Ramage");
        assert_eq!(s.span_text(2, 2), "");
        assert_eq!(s.span_text(1, 10), "Ramage works");
    }

    #[test]
    fn test_ner_defaults_to_outside() {
        let json = r#"{"sentences":[{"tokens":[{"word":"it","pos":"PRP"}]}]}"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.sentences[0].tokens[0].ner, "O");
        assert!(!doc.sentences[0].tokens[0].is_entity());
        assert_eq!(doc.token_count(), 1);
    }

    #[test]
    fn test_bare_bio_prefix_is_outside() {
        assert!(Token::new("Paris", "NNP").with_ner("B-LOC").is_entity());
        assert!(Token::new("Paris", "NNP").with_ner("LOCATION").is_entity());
        assert!(!Token::new("Paris", "NNP").with_ner("B-").is_entity());
        assert!(!Token::new("Paris", "NNP").with_ner("I-O").is_entity());
        assert!(!Token::new("Paris", "NNP").with_ner("").is_entity());
    }

    #[test]
    fn test_speaker_fallback() {
        let mut s = Sentence::new(vec![Token::new("I", "PRP"), Token::new("left", "VBD")])
            .with_speaker("Alice");
        s.tokens[1].speaker = Some("Bob".to_string());
        assert_eq!(s.speaker_at(0), Some("Alice"));
        assert_eq!(s.speaker_at(1), Some("Bob"));
    }

    #[test]
    fn test_clear_chains() {
        let mut doc = Document::new(vec![Sentence::new(vec![Token::new("He", "PRP")])]);
        doc.sentences[0].tokens[0].coref_chain = Some(3);
        assert_eq!(doc.chain_at(0, 0), Some(3));
        doc.clear_chains();
        assert_eq!(doc.chain_at(0, 0), None);
    }
}
