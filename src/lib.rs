//! # sieve-coref
//!
//! Deterministic multi-pass sieve coreference over pre-annotated documents.
//!
//! Input is a [`Document`] whose tokens already carry part-of-speech and
//! named-entity tags, with an optional bracketed parse and speaker per
//! sentence. Output is a [`Resolution`]: chains of co-referent mentions and
//! the chain id of every token covered by a mention.
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | mention spans from parse, NE tags and pronouns | [`extract`] |
//! | head, type, gender, number, animacy, person | [`features`] |
//! | appositions, copulas, relative clauses, binding | [`syntax`] |
//! | ordered sieve passes | [`sieve`] |
//! | union-find clusters with merged attributes | [`cluster`] |
//! | chains and per-token ids | [`chain`] |
//!
//! Sieves run in a fixed order, most precise first: `exact_string`,
//! `relaxed_string`, `precise_constructs`, `strict_head_1`, `strict_head_2`,
//! `strict_head_3`, `proper_head`, `pronoun`. Every pass sees the clusters
//! built by the passes before it.
//!
//! ## Quick Start
//!
//! ```rust
//! use sieve_coref::{Document, Resolver, ResourceTables, Sentence, Token};
//!
//! let tables = ResourceTables::new().with_male(["dan"]);
//! let resolver = Resolver::with_defaults(tables);
//!
//! let doc = Document::new(vec![
//!     Sentence::new(vec![
//!         Token::new("Dan", "NNP").with_ner("PERSON"),
//!         Token::new("left", "VBD"),
//!         Token::new(".", "."),
//!     ])
//!     .with_parse("(ROOT (S (NP (NNP Dan)) (VP (VBD left)) (. .)))"),
//!     Sentence::new(vec![
//!         Token::new("He", "PRP"),
//!         Token::new("waved", "VBD"),
//!         Token::new(".", "."),
//!     ])
//!     .with_parse("(ROOT (S (NP (PRP He)) (VP (VBD waved)) (. .)))"),
//! ]);
//!
//! let resolution = resolver.resolve(&doc);
//! assert_eq!(resolution.chain_of_token(0, 0), resolution.chain_of_token(1, 0));
//! ```
//!
//! ## Errors
//!
//! Only construction fails: a missing or malformed resource file, or an
//! invalid sieve list. [`Resolver::resolve`] never fails; a sentence with a
//! bad parse falls back to pronoun and named-entity mentions.

#![warn(missing_docs)]

pub mod chain;
pub mod cluster;
pub mod config;
pub mod document;
mod error;
pub mod eval;
pub mod extract;
pub mod features;
pub mod lexicon;
pub mod mention;
pub mod resolver;
pub mod resources;
pub mod sieve;
pub mod syntax;
pub mod tree;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use sieve_coref::prelude::*;
    //!
    //! let resolver = Resolver::with_defaults(ResourceTables::new());
    //! let resolution = resolver.resolve(&Document::default());
    //! assert!(resolution.is_empty());
    //! ```
    pub use crate::chain::{Chain, ChainMention, Resolution};
    pub use crate::config::ResolverConfig;
    pub use crate::document::{Document, Sentence, Token};
    pub use crate::error::{Error, Result};
    pub use crate::resolver::Resolver;
    pub use crate::resources::ResourceTables;
    pub use crate::sieve::SieveKind;
}

// Re-exports
pub use chain::{Chain, ChainMention, Resolution};
pub use cluster::ClusterStore;
pub use config::{ResolverConfig, ResourcePaths};
pub use document::{Document, Sentence, Token};
pub use error::{Error, Result};
pub use eval::{CorefEvaluation, CorefScores};
pub use mention::{
    Animacy, Attributes, EntityType, Gender, Mention, MentionId, MentionSet, MentionType, Number,
    Person,
};
pub use resolver::{PassSnapshot, Resolver};
pub use resources::{DemonymTable, ResourceTables, WordList};
pub use sieve::{Sieve, SieveKind};
pub use tree::ParseTree;
