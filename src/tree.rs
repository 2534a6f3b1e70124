//! Constituency parse trees.
//!
//! Trees arrive as Penn Treebank bracketed strings and are stored as an arena
//! of nodes addressed by index; node `0` is the root. Every node records the
//! half-open token span it covers, so mention spans map onto nodes without
//! walking leaves.
//!
//! ```rust
//! use sieve_coref::tree::ParseTree;
//!
//! let tree = ParseTree::parse("(ROOT (S (NP (PRP He)) (VP (VBD left))))").unwrap();
//! assert_eq!(tree.leaf_count(), 2);
//! let np = tree.highest_node_with_span(0, 1).unwrap();
//! assert_eq!(tree.label(np), "NP");
//! ```

use crate::{Error, Result};

/// A single constituent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Constituent or POS label as written (function tags included).
    pub label: String,
    /// Parent index; `None` for the root.
    pub parent: Option<usize>,
    /// Child indices, left to right.
    pub children: Vec<usize>,
    /// First token covered.
    pub start: usize,
    /// One past the last token covered.
    pub end: usize,
    /// Distance from the root.
    pub depth: usize,
    /// Word, for preterminals.
    pub word: Option<String>,
}

/// Arena-backed constituency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<Node>,
}

#[derive(Debug, PartialEq)]
enum Lexeme<'a> {
    Open,
    Close,
    Atom(&'a str),
}

fn lex(text: &str) -> Vec<Lexeme<'_>> {
    let mut out = Vec::new();
    let mut atom_start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if let Some(s) = atom_start.take() {
                out.push(Lexeme::Atom(&text[s..i]));
            }
            match c {
                '(' => out.push(Lexeme::Open),
                ')' => out.push(Lexeme::Close),
                _ => {}
            }
        } else if atom_start.is_none() {
            atom_start = Some(i);
        }
    }
    if let Some(s) = atom_start {
        out.push(Lexeme::Atom(&text[s..]));
    }
    out
}

/// Strip function tags and indices: `NP-SBJ-1` -> `NP`, `NP=2` -> `NP`.
///
/// Bracket labels such as `-LRB-` are returned unchanged.
#[must_use]
pub fn base_label(label: &str) -> &str {
    if label.starts_with('-') {
        return label;
    }
    let cut = label.find(|c| c == '-' || c == '=').unwrap_or(label.len());
    &label[..cut]
}

impl ParseTree {
    /// Parse a bracketed tree.
    ///
    /// Fails on unbalanced brackets, words outside a constituent, more than
    /// one word under a preterminal, or trailing content after the root.
    pub fn parse(text: &str) -> Result<Self> {
        let lexemes = lex(text);
        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut leaf = 0usize;
        let mut closed_root = false;
        let mut i = 0;

        while i < lexemes.len() {
            if closed_root {
                return Err(Error::parse("content after the root constituent"));
            }
            match lexemes[i] {
                Lexeme::Open => {
                    let label = match lexemes.get(i + 1) {
                        Some(Lexeme::Atom(a)) => {
                            i += 1;
                            (*a).to_string()
                        }
                        _ => String::new(),
                    };
                    let id = nodes.len();
                    let parent = stack.last().copied();
                    if let Some(p) = parent {
                        if nodes[p].word.is_some() {
                            return Err(Error::parse(format!(
                                "preterminal '{}' has both a word and children",
                                nodes[p].label
                            )));
                        }
                        nodes[p].children.push(id);
                    } else if !nodes.is_empty() {
                        return Err(Error::parse("more than one root constituent"));
                    }
                    nodes.push(Node {
                        label,
                        parent,
                        children: Vec::new(),
                        start: leaf,
                        end: leaf,
                        depth: stack.len(),
                        word: None,
                    });
                    stack.push(id);
                }
                Lexeme::Close => {
                    let id = stack
                        .pop()
                        .ok_or_else(|| Error::parse("unbalanced ')'"))?;
                    nodes[id].end = leaf;
                    if stack.is_empty() {
                        closed_root = true;
                    }
                }
                Lexeme::Atom(word) => {
                    let cur = *stack
                        .last()
                        .ok_or_else(|| Error::parse(format!("word '{}' outside a constituent", word)))?;
                    let node = &mut nodes[cur];
                    if node.word.is_some() || !node.children.is_empty() {
                        return Err(Error::parse(format!(
                            "unexpected word '{}' under '{}'",
                            word, node.label
                        )));
                    }
                    node.word = Some(word.to_string());
                    leaf += 1;
                }
            }
            i += 1;
        }

        if !stack.is_empty() {
            return Err(Error::parse("unbalanced '('"));
        }
        if nodes.is_empty() {
            return Err(Error::parse("empty tree"));
        }
        Ok(Self { nodes })
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a parsed tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by index.
    #[must_use]
    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    /// Base label (function tags stripped) of a node.
    #[must_use]
    pub fn label(&self, id: usize) -> &str {
        base_label(&self.nodes[id].label)
    }

    /// Number of words.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes[0].end
    }

    /// Words in order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&str> {
        self.nodes.iter().filter_map(|n| n.word.as_deref()).collect()
    }

    /// True if the node dominates a single word directly.
    #[must_use]
    pub fn is_preterminal(&self, id: usize) -> bool {
        self.nodes[id].word.is_some()
    }

    /// All node indices in pre-order (document order of constituents).
    pub fn preorder(&self) -> impl Iterator<Item = usize> + '_ {
        let mut stack = vec![0usize];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id].children.iter().rev().copied());
            Some(id)
        })
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        let mut cur = self.nodes[id].parent;
        std::iter::from_fn(move || {
            let out = cur?;
            cur = self.nodes[out].parent;
            Some(out)
        })
    }

    /// True if `id` lies in the subtree rooted at `ancestor` (inclusive).
    #[must_use]
    pub fn dominates(&self, ancestor: usize, id: usize) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// The highest node whose span is exactly `[start, end)`.
    #[must_use]
    pub fn highest_node_with_span(&self, start: usize, end: usize) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.start == start && n.end == end)
            .min_by_key(|(_, n)| n.depth)
            .map(|(i, _)| i)
    }

    /// The deepest node whose span covers `[start, end)`.
    #[must_use]
    pub fn covering_node(&self, start: usize, end: usize) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.start <= start && end <= n.end && n.start < n.end)
            .max_by_key(|(_, n)| n.depth)
            .map(|(i, _)| i)
    }

    /// Preterminal node for the token at `index`.
    #[must_use]
    pub fn preterminal(&self, index: usize) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.word.is_some() && n.start == index)
    }
}
