//! String-match sieves.

use super::{
    modifiers_agree, normalized_text, normalized_words, Context, Link, Sieve, SieveKind,
};
use crate::cluster::ClusterStore;
use crate::mention::Mention;

/// Identical mention text, case-insensitive, leading determiners ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactStringMatch;

impl Sieve for ExactStringMatch {
    fn kind(&self) -> SieveKind {
        SieveKind::ExactString
    }

    fn initiates(&self, _ctx: &Context<'_>, anaphor: &Mention) -> bool {
        !anaphor.is_pronoun()
    }

    fn link(
        &self,
        _ctx: &Context<'_>,
        _clusters: &ClusterStore,
        anaphor: &Mention,
        candidate: &Mention,
    ) -> Option<Link> {
        if candidate.is_pronoun() {
            return None;
        }
        let text = normalized_text(anaphor);
        (!text.is_empty() && text == normalized_text(candidate)).then_some(Link::Agreeing)
    }
}

/// Text up to and including the head, so "the man who left" matches
/// "the man". Numbers and location modifiers must still agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedStringMatch;

fn relaxed_text(m: &Mention) -> String {
    let upto = (m.head - m.start + 1).min(m.words.len());
    normalized_words(&m.words[..upto]).join(" ")
}

impl Sieve for RelaxedStringMatch {
    fn kind(&self) -> SieveKind {
        SieveKind::RelaxedString
    }

    fn initiates(&self, _ctx: &Context<'_>, anaphor: &Mention) -> bool {
        !anaphor.is_pronoun()
    }

    fn link(
        &self,
        _ctx: &Context<'_>,
        _clusters: &ClusterStore,
        anaphor: &Mention,
        candidate: &Mention,
    ) -> Option<Link> {
        if candidate.is_pronoun() {
            return None;
        }
        let text = relaxed_text(anaphor);
        let matched = !text.is_empty() && text == relaxed_text(candidate);
        (matched && modifiers_agree(anaphor, candidate)).then_some(Link::Agreeing)
    }
}

#[cfg(test)]
mod tests {
    use crate::resources::ResourceTables;
    use crate::sieve::testing::{apollo, sentence, Prepared};
    use crate::sieve::SieveKind;

    #[test]
    fn test_exact_string_ignores_determiners() {
        let p = Prepared::new(
            vec![
                sentence(
                    &[("The", "DT", "O"), ("company", "NN", "O"), ("grew", "VBD", "O")],
                    Some("(ROOT (S (NP (DT The) (NN company)) (VP (VBD grew))))"),
                ),
                sentence(
                    &[
                        ("Analysts", "NNS", "O"),
                        ("praised", "VBD", "O"),
                        ("the", "DT", "O"),
                        ("company", "NN", "O"),
                    ],
                    Some("(ROOT (S (NP (NNS Analysts)) (VP (VBD praised) (NP (DT the) (NN company)))))"),
                ),
                sentence(
                    &[("A", "DT", "O"), ("firm", "NN", "O"), ("failed", "VBD", "O")],
                    Some("(ROOT (S (NP (DT A) (NN firm)) (VP (VBD failed))))"),
                ),
            ],
            ResourceTables::new(),
        );
        let clusters = p.run(SieveKind::ExactString);
        assert!(clusters.linked(p.id(0, 0, 2), p.id(1, 2, 4)));
        assert!(!clusters.linked(p.id(0, 0, 2), p.id(2, 0, 2)));
        assert!(!clusters.linked(p.id(1, 0, 1), p.id(1, 2, 4)));
    }

    #[test]
    fn test_relaxed_string_matches_up_to_head() {
        let p = Prepared::new(
            vec![
                sentence(
                    &[
                        ("The", "DT", "O"),
                        ("man", "NN", "O"),
                        ("who", "WP", "O"),
                        ("left", "VBD", "O"),
                        ("returned", "VBD", "O"),
                    ],
                    Some("(ROOT (S (NP (NP (DT The) (NN man)) (SBAR (WHNP (WP who)) (S (VP (VBD left))))) (VP (VBD returned))))"),
                ),
                sentence(
                    &[
                        ("Everyone", "NN", "O"),
                        ("saw", "VBD", "O"),
                        ("the", "DT", "O"),
                        ("man", "NN", "O"),
                    ],
                    Some("(ROOT (S (NP (NN Everyone)) (VP (VBD saw) (NP (DT the) (NN man)))))"),
                ),
            ],
            ResourceTables::new(),
        );
        let whole = p.id(0, 0, 4);
        let clusters = p.run(SieveKind::RelaxedString);
        assert!(clusters.linked(p.id(1, 2, 4), whole));
        // "The man" sits inside "The man who left" and stays apart
        assert!(!clusters.linked(p.id(0, 0, 2), whole));
        // exact match needs the full text
        let exact = p.run(SieveKind::ExactString);
        assert!(!exact.linked(p.id(1, 2, 4), whole));
    }

    #[test]
    fn test_relaxed_string_respects_numbers() {
        let p = Prepared::new(
            vec![
                apollo("11", "landed"),
                apollo("13", "failed"),
                apollo("11", "returned"),
            ],
            ResourceTables::new(),
        );
        let (first, second, third) = (p.id(0, 0, 2), p.id(1, 0, 2), p.id(2, 0, 2));
        let clusters = p.run(SieveKind::RelaxedString);
        assert!(!clusters.linked(first, second));
        assert!(!clusters.linked(third, second));
        assert!(clusters.linked(third, first));

        for kind in [SieveKind::StrictHead1, SieveKind::StrictHead2, SieveKind::StrictHead3] {
            assert!(!p.run(kind).linked(first, second), "{}", kind);
        }
    }
}
