//! The resolver: one object built from configuration, reused for every
//! document.
//!
//! ```rust
//! use sieve_coref::{Document, Resolver, ResourceTables, Sentence, Token};
//!
//! let resolver = Resolver::with_defaults(ResourceTables::new());
//! let doc = Document::new(vec![Sentence::new(vec![
//!     Token::new("Seattle", "NNP").with_ner("LOCATION"),
//!     Token::new("rains", "VBZ"),
//!     Token::new(".", "."),
//! ])]);
//! let resolution = resolver.resolve(&doc);
//! assert_eq!(resolution.len(), 1);
//! assert_eq!(resolution.chain_of_token(0, 0), Some(1));
//! ```

use log::{debug, info, trace};
use serde::Serialize;

use crate::chain::{build_chains, Resolution};
use crate::cluster::ClusterStore;
use crate::config::ResolverConfig;
use crate::document::Document;
use crate::extract::{extract, sentence_tree};
use crate::features::build_mentions;
use crate::mention::MentionId;
use crate::resources::ResourceTables;
use crate::sieve::{run_pass, Context, SieveKind};
use crate::syntax::SyntacticRelations;
use crate::tree::ParseTree;
use crate::Result;

/// Cluster state after one sieve pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSnapshot {
    /// The sieve that ran.
    pub sieve: SieveKind,
    /// Merges it performed.
    pub merges: usize,
    /// Representative of every mention, indexed by mention position.
    pub representatives: Vec<MentionId>,
}

/// Deterministic sieve coreference resolver.
///
/// Holds only read-only state; `resolve` keeps all mutable state local to
/// the call, so one resolver can serve many threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    tables: ResourceTables,
    config: ResolverConfig,
    sieves: Vec<SieveKind>,
}

impl Resolver {
    /// Build from in-memory tables. Fails on an invalid sieve list.
    pub fn new(tables: ResourceTables, config: ResolverConfig) -> Result<Self> {
        let sieves = config.enabled_sieves()?;
        info!(
            "resolver ready: sieves [{}], pronoun window {}",
            sieves.iter().map(|s| s.name()).collect::<Vec<_>>().join(", "),
            config.pronoun_window
        );
        Ok(Self {
            tables,
            config,
            sieves,
        })
    }

    /// Load the configured resource files, then build.
    pub fn from_config(config: ResolverConfig) -> Result<Self> {
        // validate before touching the filesystem
        config.enabled_sieves()?;
        let tables = ResourceTables::load(&config.resources)?;
        Self::new(tables, config)
    }

    /// Every sieve, default windows.
    #[must_use]
    pub fn with_defaults(tables: ResourceTables) -> Self {
        Self {
            tables,
            config: ResolverConfig::default(),
            sieves: SieveKind::ALL.to_vec(),
        }
    }

    /// Enabled sieves in run order.
    #[must_use]
    pub fn sieves(&self) -> &[SieveKind] {
        &self.sieves
    }

    /// The configuration this resolver was built from.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The resource tables in use.
    #[must_use]
    pub fn tables(&self) -> &ResourceTables {
        &self.tables
    }

    /// Resolve a document.
    #[must_use]
    pub fn resolve(&self, doc: &Document) -> Resolution {
        self.run(doc, |_| {})
    }

    /// Resolve and write chain ids onto the document's tokens.
    pub fn annotate(&self, doc: &mut Document) -> Resolution {
        let resolution = self.resolve(doc);
        resolution.apply(doc);
        resolution
    }

    /// Resolve, recording the cluster state after each pass.
    #[must_use]
    pub fn resolve_traced(&self, doc: &Document) -> (Resolution, Vec<PassSnapshot>) {
        let mut passes = Vec::with_capacity(self.sieves.len());
        let resolution = self.run(doc, |snapshot| passes.push(snapshot));
        (resolution, passes)
    }

    fn run(&self, doc: &Document, mut on_pass: impl FnMut(PassSnapshot)) -> Resolution {
        let trees: Vec<Option<ParseTree>> = doc
            .sentences
            .iter()
            .enumerate()
            .map(|(i, s)| sentence_tree(i, s))
            .collect();

        let spans = extract(doc, &trees);
        let mentions = build_mentions(doc, &trees, spans, &self.tables);
        trace!(
            "{} mention(s) in {} sentence(s)",
            mentions.len(),
            doc.sentences.len()
        );
        if mentions.is_empty() {
            return Resolution::empty(doc);
        }

        let relations = SyntacticRelations::find(&mentions, &trees);
        let ctx = Context {
            document: doc,
            mentions: &mentions,
            trees: &trees,
            relations: &relations,
            tables: &self.tables,
            config: &self.config,
        };

        let mut clusters = ClusterStore::new(&mentions);
        for &kind in &self.sieves {
            let sieve = kind.build();
            let merges = run_pass(sieve.as_ref(), &ctx, &mut clusters);
            on_pass(PassSnapshot {
                sieve: kind,
                merges,
                representatives: clusters.snapshot(),
            });
        }

        let resolution = build_chains(doc, &mentions, &clusters);
        debug!(
            "{} chain(s), {} with more than one mention",
            resolution.len(),
            resolution.coreferent_chains().count()
        );
        resolution
    }
}
