//! Scoring predicted chains against gold chains.
//!
//! Chains are compared as sets of mention spans keyed by
//! `(sentence, start, end)`. Only mentions present on both sides count, so
//! extraction errors do not leak into link scores.
//!
//! | Metric | Focus |
//! |--------|-------|
//! | **MUC** | links; ignores singletons |
//! | **B³** | per-mention overlap |
//! | **Pairwise** | coreferent mention pairs |
//!
//! ```rust
//! use sieve_coref::eval::{muc_score, SpanKey};
//!
//! let gold: Vec<Vec<SpanKey>> = vec![vec![(0, 0, 2), (1, 0, 1)]];
//! let (_, _, f1) = muc_score(&gold, &gold);
//! assert!((f1 - 1.0).abs() < 1e-9);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chain::Resolution;
use crate::{Error, Result};

/// A mention span: sentence, first token, one past the last token.
pub type SpanKey = (usize, usize, usize);

/// Precision, recall and F1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CorefScores {
    /// Precision
    pub precision: f64,
    /// Recall
    pub recall: f64,
    /// F1 score
    pub f1: f64,
}

impl CorefScores {
    /// Scores from precision and recall.
    #[must_use]
    pub fn new(precision: f64, recall: f64) -> Self {
        Self {
            precision,
            recall,
            f1: harmonic(precision, recall),
        }
    }

    /// Create from tuple.
    #[must_use]
    pub fn from_tuple((p, r, f1): (f64, f64, f64)) -> Self {
        Self {
            precision: p,
            recall: r,
            f1,
        }
    }
}

/// Every metric for one prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CorefEvaluation {
    /// MUC metric
    pub muc: CorefScores,
    /// B-cubed metric
    pub b_cubed: CorefScores,
    /// Pairwise link metric
    pub pairwise: CorefScores,
    /// Unweighted mean of the three F1 scores
    pub average_f1: f64,
}

impl CorefEvaluation {
    /// Compute all metrics.
    #[must_use]
    pub fn compute(predicted: &[Vec<SpanKey>], gold: &[Vec<SpanKey>]) -> Self {
        let muc = CorefScores::from_tuple(muc_score(predicted, gold));
        let b_cubed = CorefScores::from_tuple(b_cubed_score(predicted, gold));
        let pairwise = CorefScores::from_tuple(pairwise_score(predicted, gold));
        Self {
            muc,
            b_cubed,
            pairwise,
            average_f1: (muc.f1 + b_cubed.f1 + pairwise.f1) / 3.0,
        }
    }

    /// Score a resolution against gold chains.
    #[must_use]
    pub fn of_resolution(resolution: &Resolution, gold: &[Vec<SpanKey>]) -> Self {
        Self::compute(&resolution.span_chains(), gold)
    }
}

impl fmt::Display for CorefEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, s) in [
            ("MUC", &self.muc),
            ("B³", &self.b_cubed),
            ("Pairwise", &self.pairwise),
        ] {
            writeln!(
                f,
                "  {:<9} P={:.1}%  R={:.1}%  F1={:.1}%",
                format!("{}:", name),
                s.precision * 100.0,
                s.recall * 100.0,
                s.f1 * 100.0
            )?;
        }
        write!(f, "  Average:  F1={:.1}%", self.average_f1 * 100.0)
    }
}

/// Chain file contents: either a resolver output or bare span lists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChainFile {
    Resolution(Resolution),
    Spans(Vec<Vec<SpanKey>>),
}

/// Parse chains from JSON: a serialized [`Resolution`] or a list of chains,
/// each a list of `[sentence, start, end]` triples.
///
/// Empty chains and spans with `end <= start` are rejected.
pub fn chains_from_json(json: &str) -> Result<Vec<Vec<SpanKey>>> {
    let chains = match serde_json::from_str::<ChainFile>(json)? {
        ChainFile::Resolution(r) => r.span_chains(),
        ChainFile::Spans(chains) => chains,
    };
    for (i, chain) in chains.iter().enumerate() {
        if chain.is_empty() {
            return Err(Error::invalid_input(format!("chain {} is empty", i)));
        }
        if let Some(&(s, start, end)) = chain.iter().find(|&&(_, start, end)| end <= start) {
            return Err(Error::invalid_input(format!(
                "chain {}: span [{}, {}, {}] covers no tokens",
                i, s, start, end
            )));
        }
    }
    Ok(chains)
}

fn harmonic(p: f64, r: f64) -> f64 {
    if p + r > 0.0 {
        2.0 * p * r / (p + r)
    } else {
        0.0
    }
}

fn mention_index(chains: &[Vec<SpanKey>]) -> HashMap<SpanKey, usize> {
    let mut index = HashMap::new();
    for (i, chain) in chains.iter().enumerate() {
        for &span in chain {
            index.insert(span, i);
        }
    }
    index
}

fn common_mentions(pred: &[Vec<SpanKey>], gold: &[Vec<SpanKey>]) -> HashSet<SpanKey> {
    let p: HashSet<SpanKey> = pred.iter().flatten().copied().collect();
    let g: HashSet<SpanKey> = gold.iter().flatten().copied().collect();
    p.intersection(&g).copied().collect()
}

fn restrict(chains: &[Vec<SpanKey>], keep: &HashSet<SpanKey>) -> Vec<Vec<SpanKey>> {
    chains
        .iter()
        .map(|c| c.iter().copied().filter(|s| keep.contains(s)).collect::<Vec<_>>())
        .filter(|c| !c.is_empty())
        .collect()
}

/// MUC link recall of `key` chains partitioned by `response`.
fn muc_recall(key: &[Vec<SpanKey>], response: &[Vec<SpanKey>]) -> f64 {
    let index = mention_index(response);
    let (mut num, mut den) = (0.0, 0.0);
    for chain in key {
        if chain.len() <= 1 {
            continue;
        }
        let partitions: HashSet<usize> = chain.iter().filter_map(|s| index.get(s)).copied().collect();
        num += (chain.len() - partitions.len().max(1)) as f64;
        den += (chain.len() - 1) as f64;
    }
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// MUC (Vilain et al., 1995).
///
/// # Returns
/// (precision, recall, f1)
#[must_use]
pub fn muc_score(predicted: &[Vec<SpanKey>], gold: &[Vec<SpanKey>]) -> (f64, f64, f64) {
    let common = common_mentions(predicted, gold);
    if common.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let pred = restrict(predicted, &common);
    let gold = restrict(gold, &common);
    let recall = muc_recall(&gold, &pred);
    let precision = muc_recall(&pred, &gold);
    (precision, recall, harmonic(precision, recall))
}

/// Mean per-mention overlap of `key` chains with `response` chains.
fn b_cubed_recall(key: &[Vec<SpanKey>], response: &[Vec<SpanKey>]) -> f64 {
    let index = mention_index(response);
    let (mut sum, mut count) = (0.0, 0usize);
    for chain in key {
        let own: HashSet<&SpanKey> = chain.iter().collect();
        for span in chain {
            count += 1;
            if let Some(&r) = index.get(span) {
                let overlap = response[r].iter().filter(|s| own.contains(s)).count();
                sum += overlap as f64 / chain.len() as f64;
            }
        }
    }
    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}

/// B-cubed (Bagga & Baldwin, 1998).
///
/// # Returns
/// (precision, recall, f1)
#[must_use]
pub fn b_cubed_score(predicted: &[Vec<SpanKey>], gold: &[Vec<SpanKey>]) -> (f64, f64, f64) {
    let common = common_mentions(predicted, gold);
    if common.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let pred = restrict(predicted, &common);
    let gold = restrict(gold, &common);
    let recall = b_cubed_recall(&gold, &pred);
    let precision = b_cubed_recall(&pred, &gold);
    (precision, recall, harmonic(precision, recall))
}

fn links(chains: &[Vec<SpanKey>]) -> HashSet<(SpanKey, SpanKey)> {
    let mut out = HashSet::new();
    for chain in chains {
        for (i, &a) in chain.iter().enumerate() {
            for &b in &chain[i + 1..] {
                out.insert(if a < b { (a, b) } else { (b, a) });
            }
        }
    }
    out
}

/// Precision and recall over coreferent mention pairs.
///
/// # Returns
/// (precision, recall, f1)
#[must_use]
pub fn pairwise_score(predicted: &[Vec<SpanKey>], gold: &[Vec<SpanKey>]) -> (f64, f64, f64) {
    let common = common_mentions(predicted, gold);
    let pred = links(&restrict(predicted, &common));
    let gold = links(&restrict(gold, &common));
    if pred.is_empty() && gold.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let hits = pred.intersection(&gold).count() as f64;
    let precision = if pred.is_empty() {
        0.0
    } else {
        hits / pred.len() as f64
    };
    let recall = if gold.is_empty() {
        0.0
    } else {
        hits / gold.len() as f64
    };
    (precision, recall, harmonic(precision, recall))
}
