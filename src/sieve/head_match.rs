//! Head-match sieves.
//!
//! The strict variants compare clusters: the anaphor's head must be the head
//! of some non-pronominal mention in the candidate's cluster, optionally
//! with every content word of the anaphor's cluster present in the
//! candidate's cluster (word inclusion) and every modifier in the anaphor's
//! head phrase found among the candidate cluster's words (compatible
//! modifiers). Numbers and location modifiers must agree in every variant,
//! and indefinite mentions never start a head match.

use std::collections::HashSet;

use super::{modifiers_agree, Context, Link, Sieve, SieveKind};
use crate::cluster::ClusterStore;
use crate::lexicon;
use crate::mention::{Feature, Mention, MentionId, MentionSet, MentionType};

/// Which extra conditions a strict head match requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrictVariant {
    /// Word inclusion and compatible modifiers.
    Full,
    /// Word inclusion only.
    WordInclusion,
    /// Compatible modifiers only.
    Modifiers,
}

/// Cluster-level head match.
#[derive(Debug, Clone, Copy)]
pub struct StrictHeadMatch {
    variant: StrictVariant,
}

impl StrictHeadMatch {
    /// Create a strict head match sieve.
    #[must_use]
    pub fn new(variant: StrictVariant) -> Self {
        Self { variant }
    }
}

fn nominal_members<'a>(
    mentions: &'a MentionSet,
    clusters: &'a ClusterStore,
    id: MentionId,
) -> impl Iterator<Item = &'a Mention> + 'a {
    clusters
        .members(id)
        .map(move |m| mentions.get(m))
        .filter(|m| !m.is_pronoun())
}

fn cluster_words<'a>(
    mentions: &'a MentionSet,
    clusters: &'a ClusterStore,
    id: MentionId,
) -> HashSet<&'a str> {
    nominal_members(mentions, clusters, id)
        .flat_map(|m| m.words.iter().map(String::as_str))
        .filter(|w| !lexicon::is_stop_word(w))
        .collect()
}

impl Sieve for StrictHeadMatch {
    fn kind(&self) -> SieveKind {
        match self.variant {
            StrictVariant::Full => SieveKind::StrictHead1,
            StrictVariant::WordInclusion => SieveKind::StrictHead2,
            StrictVariant::Modifiers => SieveKind::StrictHead3,
        }
    }

    fn initiates(&self, _ctx: &Context<'_>, anaphor: &Mention) -> bool {
        !anaphor.is_pronoun() && !anaphor.indefinite
    }

    fn link(
        &self,
        ctx: &Context<'_>,
        clusters: &ClusterStore,
        anaphor: &Mention,
        candidate: &Mention,
    ) -> Option<Link> {
        if candidate.is_pronoun() {
            return None;
        }
        let head_match = nominal_members(ctx.mentions, clusters, candidate.id)
            .any(|m| m.head_word == anaphor.head_word);
        if !head_match || !modifiers_agree(anaphor, candidate) {
            return None;
        }

        let candidate_words = cluster_words(ctx.mentions, clusters, candidate.id);
        let word_inclusion = || {
            cluster_words(ctx.mentions, clusters, anaphor.id)
                .iter()
                .all(|w| candidate_words.contains(w))
        };
        let modifiers = || {
            anaphor
                .modifiers
                .iter()
                .all(|w| candidate_words.contains(w.as_str()))
        };

        let ok = match self.variant {
            StrictVariant::Full => word_inclusion() && modifiers(),
            StrictVariant::WordInclusion => word_inclusion(),
            StrictVariant::Modifiers => modifiers(),
        };
        ok.then_some(Link::Agreeing)
    }
}

/// Proper names sharing a head word, with matching numbers and location
/// modifiers ("Northern Ireland" is not "Ireland").
#[derive(Debug, Clone, Copy, Default)]
pub struct ProperHeadMatch;

impl Sieve for ProperHeadMatch {
    fn kind(&self) -> SieveKind {
        SieveKind::ProperHead
    }

    fn initiates(&self, _ctx: &Context<'_>, anaphor: &Mention) -> bool {
        anaphor.mention_type == MentionType::Proper && !anaphor.indefinite
    }

    fn link(
        &self,
        _ctx: &Context<'_>,
        _clusters: &ClusterStore,
        anaphor: &Mention,
        candidate: &Mention,
    ) -> Option<Link> {
        if candidate.mention_type != MentionType::Proper || candidate.head_word != anaphor.head_word
        {
            return None;
        }
        if !anaphor
            .attributes
            .number
            .agrees(&candidate.attributes.number)
        {
            return None;
        }
        modifiers_agree(anaphor, candidate).then_some(Link::Agreeing)
    }
}
