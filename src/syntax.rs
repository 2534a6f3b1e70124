//! Tree-derived relations between mentions.
//!
//! Three things the sieves need from the parse live here:
//!
//! - the structural constructs linked by the precise-constructs sieve
//!   (appositions, role appositions, predicate nominatives, relative
//!   pronouns),
//! - the antecedent search order,
//! - binding constraints for pronouns.

use std::collections::{HashMap, HashSet};

use crate::lexicon;
use crate::mention::{EntityType, Mention, MentionId, MentionSet, MentionType};
use crate::tree::ParseTree;

const CLAUSE_LABELS: &[&str] = &["S", "SQ", "SINV", "SBARQ"];

const AUXILIARIES: &[&str] = &["has", "have", "had", "having", "will", "would", "to"];

// =============================================================================
// Constructs
// =============================================================================

/// Mention pairs joined by a syntactic construct. Pairs are stored as
/// `(earlier, later)`.
#[derive(Debug, Clone, Default)]
pub struct SyntacticRelations {
    appositions: HashSet<(MentionId, MentionId)>,
    role_appositions: HashSet<(MentionId, MentionId)>,
    predicate_nominatives: HashSet<(MentionId, MentionId)>,
    relative_pronouns: HashSet<(MentionId, MentionId)>,
}

fn ordered(a: MentionId, b: MentionId) -> (MentionId, MentionId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl SyntacticRelations {
    /// Scan every sentence's tree for constructs between existing mentions.
    #[must_use]
    pub fn find(mentions: &MentionSet, trees: &[Option<ParseTree>]) -> Self {
        let mut rel = Self::default();
        for (s, tree) in trees.iter().enumerate() {
            let Some(tree) = tree else { continue };
            let by_span: HashMap<(usize, usize), &Mention> = mentions
                .in_sentence(s)
                .iter()
                .map(|m| ((m.start, m.end), m))
                .collect();
            let at = |node: usize| {
                let n = tree.node(node);
                by_span.get(&(n.start, n.end)).copied()
            };

            for node in tree.preorder() {
                match tree.label(node) {
                    "NP" => rel.scan_np(tree, node, &at),
                    l if CLAUSE_LABELS.contains(&l) => rel.scan_clause(tree, node, &at),
                    _ => {}
                }
            }
        }
        rel
    }

    fn scan_np<'m>(
        &mut self,
        tree: &ParseTree,
        node: usize,
        at: &impl Fn(usize) -> Option<&'m Mention>,
    ) {
        let children = &tree.node(node).children;
        let labels: Vec<&str> = children.iter().map(|&c| tree.label(c)).collect();
        let coordinated = labels.contains(&"CC");

        for k in 0..children.len() {
            // NP , NP
            if !coordinated
                && k + 2 < children.len()
                && labels[k] == "NP"
                && labels[k + 1] == ","
                && labels[k + 2] == "NP"
                && labels.get(k + 3).map_or(true, |l| matches!(*l, "," | "."))
            {
                if let (Some(a), Some(b)) = (at(children[k]), at(children[k + 2])) {
                    self.appositions.insert(ordered(a.id, b.id));
                }
            }

            // NP(role) NP(name) inside NP(whole)
            if k + 1 < children.len() && labels[k] == "NP" && labels[k + 1] == "NP" {
                let name = tree.node(children[k + 1]);
                let is_person_name = at(children[k + 1])
                    .map(|m| m.attributes.entity_type == EntityType::Person)
                    .unwrap_or(false)
                    || at(node).map_or(false, |m| {
                        m.attributes.entity_type == EntityType::Person && m.head >= name.start
                    });
                if let (Some(role), Some(whole), true) = (at(children[k]), at(node), is_person_name)
                {
                    if role.mention_type == MentionType::Nominal && role.id != whole.id {
                        self.role_appositions.insert(ordered(role.id, whole.id));
                    }
                }
            }

            // NP SBAR(WHNP ...)
            if k + 1 < children.len() && labels[k] == "NP" && labels[k + 1] == "SBAR" {
                let sbar = tree.node(children[k + 1]);
                let whnp = sbar
                    .children
                    .first()
                    .copied()
                    .filter(|&w| tree.label(w) == "WHNP");
                if let Some(whnp) = whnp {
                    let relative = tree.node(whnp).children.iter().find_map(|&c| {
                        at(c).filter(|m| m.relative)
                    });
                    if let (Some(np), Some(rel_pron)) = (at(children[k]), relative) {
                        self.relative_pronouns.insert(ordered(np.id, rel_pron.id));
                    }
                }
            }
        }
    }

    fn scan_clause<'m>(
        &mut self,
        tree: &ParseTree,
        node: usize,
        at: &impl Fn(usize) -> Option<&'m Mention>,
    ) {
        let children = &tree.node(node).children;
        let Some(vp_pos) = children.iter().position(|&c| tree.label(c) == "VP") else {
            return;
        };
        let Some(subject) = children[..vp_pos]
            .iter()
            .rev()
            .find(|&&c| tree.label(c) == "NP")
            .and_then(|&c| at(c))
        else {
            return;
        };

        let mut vp = children[vp_pos];
        loop {
            let kids = &tree.node(vp).children;
            let Some(verb) = kids.iter().copied().find(|&c| tree.is_preterminal(c)) else {
                return;
            };
            let word = tree.node(verb).word.as_deref().unwrap_or_default();
            if lexicon::is_copula(word) {
                let predicate = kids
                    .iter()
                    .copied()
                    .skip_while(|&c| c != verb)
                    .find(|&c| tree.label(c) == "NP")
                    .and_then(|c| at(c));
                if let Some(pred) = predicate {
                    self.predicate_nominatives.insert(ordered(subject.id, pred.id));
                }
                return;
            }
            let auxiliary =
                tree.label(verb) == "MD" || AUXILIARIES.contains(&word.to_lowercase().as_str());
            match kids.iter().copied().find(|&c| tree.label(c) == "VP") {
                Some(inner) if auxiliary => vp = inner,
                _ => return,
            }
        }
    }

    /// `A , B` apposition.
    #[must_use]
    pub fn is_apposition(&self, a: MentionId, b: MentionId) -> bool {
        self.appositions.contains(&ordered(a, b))
    }

    /// Role noun phrase inside a person's name phrase (`[chairman] [Bill Gates]`).
    #[must_use]
    pub fn is_role_apposition(&self, a: MentionId, b: MentionId) -> bool {
        self.role_appositions.contains(&ordered(a, b))
    }

    /// Subject and predicate of a copula.
    #[must_use]
    pub fn is_predicate_nominative(&self, a: MentionId, b: MentionId) -> bool {
        self.predicate_nominatives.contains(&ordered(a, b))
    }

    /// Noun phrase and the relative pronoun of its relative clause.
    #[must_use]
    pub fn is_relative_pronoun(&self, a: MentionId, b: MentionId) -> bool {
        self.relative_pronouns.contains(&ordered(a, b))
    }

    /// Total number of pairs found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.appositions.len()
            + self.role_appositions.len()
            + self.predicate_nominatives.len()
            + self.relative_pronouns.len()
    }

    /// True if no construct was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Search order
// =============================================================================

fn depth_key(tree: Option<&ParseTree>, m: &Mention) -> (usize, usize, usize) {
    let depth = match (tree, m.node) {
        (Some(t), Some(n)) => t.node(n).depth,
        _ => 0,
    };
    (depth, m.start, m.end)
}

/// Antecedent candidates for `anaphor`, most preferred first.
///
/// Same-sentence candidates are visited by walking up from the anaphor: at
/// each ancestor, the not yet visited preceding mentions below it are taken
/// breadth-first, left to right. Earlier sentences follow nearest first, each
/// breadth-first left to right. Without a parse the anaphor's sentence is
/// scanned right to left and earlier sentences left to right.
///
/// `window` bounds how many earlier sentences are searched; `None` searches
/// them all.
#[must_use]
pub fn candidate_order(
    mentions: &MentionSet,
    trees: &[Option<ParseTree>],
    anaphor: &Mention,
    window: Option<usize>,
) -> Vec<MentionId> {
    let tree_of = |s: usize| trees.get(s).and_then(Option::as_ref);
    let mut order = Vec::new();

    let preceding: Vec<&Mention> = mentions
        .in_sentence(anaphor.sentence)
        .iter()
        .filter(|m| m.id < anaphor.id)
        .collect();

    match (tree_of(anaphor.sentence), anaphor.node) {
        (Some(tree), Some(node)) => {
            let mut seen: HashSet<MentionId> = HashSet::new();
            for anc in tree.ancestors(node) {
                let mut batch: Vec<&Mention> = preceding
                    .iter()
                    .copied()
                    .filter(|m| !seen.contains(&m.id))
                    .filter(|m| m.node.map_or(false, |n| tree.dominates(anc, n)))
                    .collect();
                batch.sort_by_key(|m| depth_key(Some(tree), m));
                for m in batch {
                    seen.insert(m.id);
                    order.push(m.id);
                }
            }
            let mut rest: Vec<&Mention> = preceding
                .iter()
                .copied()
                .filter(|m| !seen.contains(&m.id))
                .collect();
            rest.sort_by(|a, b| b.start.cmp(&a.start).then(a.end.cmp(&b.end)));
            order.extend(rest.into_iter().map(|m| m.id));
        }
        _ => {
            let mut same = preceding;
            same.sort_by(|a, b| b.start.cmp(&a.start).then(a.end.cmp(&b.end)));
            order.extend(same.into_iter().map(|m| m.id));
        }
    }

    let lowest = match window {
        Some(w) => anaphor.sentence.saturating_sub(w),
        None => 0,
    };
    for s in (lowest..anaphor.sentence).rev() {
        let tree = tree_of(s);
        let mut batch: Vec<&Mention> = mentions.in_sentence(s).iter().collect();
        batch.sort_by_key(|m| depth_key(tree, m));
        order.extend(batch.into_iter().map(|m| m.id));
    }
    order
}

// =============================================================================
// Binding
// =============================================================================

/// Nearest clause dominating `node` (excluding the node itself).
#[must_use]
pub fn clause_of(tree: &ParseTree, node: usize) -> Option<usize> {
    tree.ancestors(node)
        .find(|&a| CLAUSE_LABELS.contains(&tree.label(a)))
}

/// True if `node` is a direct argument of `clause`: every node between them
/// is a `VP`.
#[must_use]
pub fn is_argument(tree: &ParseTree, node: usize, clause: usize) -> bool {
    tree.ancestors(node)
        .take_while(|&a| a != clause)
        .all(|a| tree.label(a) == "VP")
}

/// Binding constraints between a pronoun and a candidate antecedent.
///
/// A reflexive needs an antecedent in its own clause. Any other pronoun
/// cannot take a co-argument of the same clause.
#[must_use]
pub fn binding_allows(trees: &[Option<ParseTree>], anaphor: &Mention, candidate: &Mention) -> bool {
    let same_sentence = anaphor.sentence == candidate.sentence;
    let tree = trees.get(anaphor.sentence).and_then(Option::as_ref);
    let clauses = match (tree, anaphor.node, candidate.node) {
        (Some(t), Some(a), Some(c)) if same_sentence => {
            Some((t, a, c, clause_of(t, a), clause_of(t, c)))
        }
        _ => None,
    };

    if anaphor.reflexive {
        return match clauses {
            Some((_, _, _, ca, cc)) => ca == cc,
            None => same_sentence,
        };
    }
    if let Some((t, a, c, Some(ca), Some(cc))) = clauses {
        if ca == cc && is_argument(t, a, ca) && is_argument(t, c, cc) {
            return false;
        }
    }
    true
}
