//! Pronoun resolution.
//!
//! A personal pronoun takes the first candidate in search order that agrees
//! with it and satisfies binding. The search covers the pronoun's sentence
//! and `pronoun_window` earlier sentences; first and second person pronouns
//! with a known speaker use `speaker_window` instead.

use super::{Context, Link, Sieve, SieveKind};
use crate::cluster::ClusterStore;
use crate::mention::{Mention, Person};
use crate::syntax::binding_allows;

/// Pronoun-to-antecedent linking.
#[derive(Debug, Clone, Copy, Default)]
pub struct PronounMatch;

impl Sieve for PronounMatch {
    fn kind(&self) -> SieveKind {
        SieveKind::Pronoun
    }

    fn initiates(&self, _ctx: &Context<'_>, anaphor: &Mention) -> bool {
        anaphor.is_pronoun() && !anaphor.relative
    }

    fn window(&self, ctx: &Context<'_>, anaphor: &Mention) -> Option<usize> {
        let speaker_bound = matches!(anaphor.person, Person::First | Person::Second)
            && anaphor.speaker.is_some();
        if speaker_bound {
            ctx.config.speaker_window
        } else {
            Some(ctx.config.pronoun_window)
        }
    }

    fn link(
        &self,
        ctx: &Context<'_>,
        _clusters: &ClusterStore,
        anaphor: &Mention,
        candidate: &Mention,
    ) -> Option<Link> {
        if candidate.relative || !binding_allows(ctx.trees, anaphor, candidate) {
            return None;
        }
        Some(Link::Agreeing)
    }
}
