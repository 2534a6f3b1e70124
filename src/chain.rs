//! Frozen resolution output.
//!
//! After the last sieve, [`build_chains`] projects the cluster store onto
//! [`Chain`]s: one per cluster (singletons included), id equal to the
//! representative mention's id, members in document order. The per-token
//! view stamps every covered token with the chain of the innermost mention
//! covering it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterStore;
use crate::document::Document;
use crate::mention::{MentionSet, MentionType};

/// A chain member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMention {
    /// Mention id (1-based, document order).
    pub mention_id: u32,
    /// Id of the chain containing the mention.
    pub chain_id: u32,
    /// Sentence index.
    pub sentence: usize,
    /// First token.
    pub start: usize,
    /// One past the last token.
    pub end: usize,
    /// Head token.
    pub head: usize,
    /// Surface text.
    pub text: String,
    /// Mention category.
    pub mention_type: MentionType,
}

/// Mentions referring to one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// Chain id, the id of its earliest mention.
    pub id: u32,
    /// Members in document order.
    pub mentions: Vec<ChainMention>,
}

impl Chain {
    /// Number of mentions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// Never true for a built chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// The earliest mention.
    #[must_use]
    pub fn representative(&self) -> Option<&ChainMention> {
        self.mentions.first()
    }

    /// True if a member spans exactly `[start, end)` of `sentence`.
    #[must_use]
    pub fn has_span(&self, sentence: usize, start: usize, end: usize) -> bool {
        self.mentions
            .iter()
            .any(|m| (m.sentence, m.start, m.end) == (sentence, start, end))
    }
}

/// Chains plus the per-token projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Chains keyed by id.
    pub chains: BTreeMap<u32, Chain>,
    /// `token_chains[sentence][token]`: chain of the innermost covering
    /// mention.
    pub token_chains: Vec<Vec<Option<u32>>>,
}

/// Project final clusters onto chains.
#[must_use]
pub fn build_chains(doc: &Document, mentions: &MentionSet, clusters: &ClusterStore) -> Resolution {
    let mut chains: BTreeMap<u32, Chain> = BTreeMap::new();
    for rep in clusters.representatives() {
        let id = rep.get();
        let members = clusters
            .members(rep)
            .map(|m| {
                let m = mentions.get(m);
                ChainMention {
                    mention_id: m.id.get(),
                    chain_id: id,
                    sentence: m.sentence,
                    start: m.start,
                    end: m.end,
                    head: m.head,
                    text: m.text.clone(),
                    mention_type: m.mention_type,
                }
            })
            .collect();
        chains.insert(id, Chain { id, mentions: members });
    }

    let mut token_chains: Vec<Vec<Option<u32>>> =
        doc.sentences.iter().map(|s| vec![None; s.len()]).collect();

    // longest first, so inner mentions overwrite outer ones
    let mut order: Vec<&ChainMention> = chains.values().flat_map(|c| &c.mentions).collect();
    order.sort_by(|a, b| {
        (b.end - b.start)
            .cmp(&(a.end - a.start))
            .then(a.mention_id.cmp(&b.mention_id))
    });
    for m in order {
        if let Some(row) = token_chains.get_mut(m.sentence) {
            for slot in row.iter_mut().take(m.end).skip(m.start) {
                *slot = Some(m.chain_id);
            }
        }
    }

    Resolution {
        chains,
        token_chains,
    }
}

impl Resolution {
    /// Resolution of a document without mentions.
    #[must_use]
    pub fn empty(doc: &Document) -> Self {
        Self {
            chains: BTreeMap::new(),
            token_chains: doc.sentences.iter().map(|s| vec![None; s.len()]).collect(),
        }
    }

    /// Number of chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// True if no mention was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Chain by id.
    #[must_use]
    pub fn chain(&self, id: u32) -> Option<&Chain> {
        self.chains.get(&id)
    }

    /// Chains with more than one mention.
    pub fn coreferent_chains(&self) -> impl Iterator<Item = &Chain> {
        self.chains.values().filter(|c| c.len() > 1)
    }

    /// Chain stamped on a token.
    #[must_use]
    pub fn chain_of_token(&self, sentence: usize, token: usize) -> Option<u32> {
        self.token_chains
            .get(sentence)
            .and_then(|row| row.get(token).copied().flatten())
    }

    /// Chain of the mention spanning exactly `[start, end)`.
    #[must_use]
    pub fn chain_of_span(&self, sentence: usize, start: usize, end: usize) -> Option<u32> {
        self.chains
            .values()
            .find(|c| c.has_span(sentence, start, end))
            .map(|c| c.id)
    }

    /// Mention spans `(sentence, start, end)` per chain, for scoring.
    #[must_use]
    pub fn span_chains(&self) -> Vec<Vec<(usize, usize, usize)>> {
        self.chains
            .values()
            .map(|c| c.mentions.iter().map(|m| (m.sentence, m.start, m.end)).collect())
            .collect()
    }

    /// Write chain ids onto the document's tokens, clearing stale ones.
    pub fn apply(&self, doc: &mut Document) {
        for (s, sentence) in doc.sentences.iter_mut().enumerate() {
            for (t, token) in sentence.tokens.iter_mut().enumerate() {
                token.coref_chain = self.chain_of_token(s, t);
            }
        }
    }
}
