//! Precise syntactic and lexical constructs.
//!
//! Each link here needs a specific relation between the two mentions, not
//! just agreement: an apposition, a role apposition, a copula, a relative
//! clause, an acronym, or a place and its demonym.

use super::{normalized_text, Context, Link, Sieve, SieveKind};
use crate::cluster::ClusterStore;
use crate::lexicon;
use crate::mention::{Mention, MentionType};

/// Apposition, role apposition, predicate nominative, relative pronoun,
/// acronym and demonym links.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreciseConstructs;

/// `IBM` vs `International Business Machines`.
#[must_use]
pub fn is_acronym(a: &Mention, b: &Mention) -> bool {
    if a.mention_type != MentionType::Proper || b.mention_type != MentionType::Proper {
        return false;
    }
    let check = |short: &Mention, long: &Mention| {
        let words: Vec<&str> = short.text.split_whitespace().collect();
        if words.len() != 1 || !lexicon::is_acronym_token(words[0]) {
            return false;
        }
        let initials: String = long
            .text
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .filter(char::is_ascii_uppercase)
            .collect();
        initials.len() >= 2 && initials == lexicon::acronym_letters(words[0])
    };
    check(a, b) || check(b, a)
}

fn is_demonym(ctx: &Context<'_>, a: &Mention, b: &Mention) -> bool {
    if a.is_pronoun() || b.is_pronoun() {
        return false;
    }
    let (ta, tb) = (normalized_text(a), normalized_text(b));
    let demonyms = &ctx.tables.demonyms;
    demonyms.is_demonym_of(&ta, &tb) || demonyms.is_demonym_of(&tb, &ta)
}

impl Sieve for PreciseConstructs {
    fn kind(&self) -> SieveKind {
        SieveKind::PreciseConstructs
    }

    fn initiates(&self, _ctx: &Context<'_>, _anaphor: &Mention) -> bool {
        true
    }

    fn link(
        &self,
        ctx: &Context<'_>,
        _clusters: &ClusterStore,
        anaphor: &Mention,
        candidate: &Mention,
    ) -> Option<Link> {
        let rel = ctx.relations;
        let (a, c) = (anaphor.id, candidate.id);
        if rel.is_apposition(a, c) || rel.is_predicate_nominative(a, c) || rel.is_relative_pronoun(a, c)
        {
            return Some(Link::Agreeing);
        }
        if rel.is_role_apposition(a, c) {
            return Some(Link::Embedded);
        }
        if is_acronym(anaphor, candidate) {
            return Some(Link::Agreeing);
        }
        if is_demonym(ctx, anaphor, candidate) {
            return Some(Link::Lexical);
        }
        None
    }
}
