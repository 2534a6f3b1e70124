//! sieve-coref - coreference over pre-annotated documents
//!
//! # Usage
//!
//! ```bash
//! # Resolve a document (JSON with tokens, tags and parses)
//! sieve-coref resolve doc.json
//!
//! # CoNLL-style columns, only the string sieves
//! sieve-coref resolve doc.json --format conll --sieves exact_string,relaxed_string
//!
//! # Show merges per sieve pass
//! sieve-coref resolve doc.json --trace
//!
//! # List sieves in run order
//! sieve-coref sieves
//!
//! # Score predicted chains against gold chains
//! sieve-coref score --predicted pred.json --gold gold.json
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use serde::Serialize;

use sieve_coref::eval::{chains_from_json, CorefEvaluation};
use sieve_coref::{
    Document, PassSnapshot, Resolution, Resolver, ResolverConfig, ResourceTables, SieveKind,
};

// ============================================================================
// CLI Structure
// ============================================================================

/// Deterministic sieve coreference resolution
#[derive(Parser)]
#[command(name = "sieve-coref")]
#[command(
    author,
    version,
    about = "Deterministic sieve coreference resolution",
    long_about = r#"
sieve-coref - multi-pass sieve coreference over pre-annotated documents

INPUT:
  A JSON document: {"sentences": [{"tokens": [{"word", "pos", "ner"}...],
  "parse": "(ROOT ...)", "speaker": "..."}]}

SIEVES (run order):
  exact_string, relaxed_string, precise_constructs, strict_head_1,
  strict_head_2, strict_head_3, proper_head, pronoun

EXAMPLES:
  sieve-coref resolve doc.json
  sieve-coref resolve doc.json --format json --config resolver.json
  sieve-coref score --predicted pred.json --gold gold.json
"#
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve coreference in a document
    #[command(visible_alias = "r")]
    Resolve(ResolveArgs),

    /// List sieves in run order
    Sieves,

    /// Score predicted chains against gold chains
    Score(ScoreArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Chains, one per line
    #[default]
    Human,
    /// Resolution as JSON
    Json,
    /// One token per line with a bracketed coreference column
    Conll,
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Document JSON file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Resolver configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated sieve names (overrides the configuration)
    #[arg(short, long, value_delimiter = ',')]
    sieves: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Print merges per sieve pass
    #[arg(long)]
    trace: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::Args)]
struct ScoreArgs {
    /// Predicted chains (resolver JSON output or span lists)
    #[arg(short, long)]
    predicted: PathBuf,

    /// Gold chains (same formats)
    #[arg(short, long)]
    gold: PathBuf,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve(args) => run_resolve(args),
        Commands::Sieves => run_sieves(),
        Commands::Score(args) => run_score(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => ResolverConfig::from_json_file(path)
            .map_err(|e| format_error("load config", &e.to_string()))?,
        None => ResolverConfig::default(),
    };
    if !args.sieves.is_empty() {
        config = config.with_sieves(args.sieves.iter().cloned());
    }

    let resolver = if args.config.is_some() {
        Resolver::from_config(config)
    } else {
        Resolver::new(ResourceTables::new(), config)
    }
    .map_err(|e| format_error("build resolver", &e.to_string()))?;

    let json = read_input(args.input.as_ref())?;
    let mut doc =
        Document::from_json(&json).map_err(|e| format_error("parse document", &e.to_string()))?;
    log_info(
        &format!(
            "Resolving {} sentence(s), {} token(s) with {} sieve(s)",
            doc.sentences.len(),
            doc.token_count(),
            resolver.sieves().len()
        ),
        args.quiet,
    );

    let (resolution, passes) = resolver.resolve_traced(&doc);
    resolution.apply(&mut doc);
    if args.trace {
        for pass in &passes {
            log_info(&format_pass(pass), args.quiet);
        }
    }
    log_info(
        &format!(
            "{} chain(s), {} with more than one mention",
            resolution.len(),
            resolution.coreferent_chains().count()
        ),
        args.quiet,
    );

    let content = match args.format {
        OutputFormat::Human => format_human(&doc, &resolution),
        OutputFormat::Json => {
            let out = JsonOutput {
                id: doc.id.as_deref(),
                resolution: &resolution,
                passes: args.trace.then_some(passes.as_slice()),
            };
            let mut s = serde_json::to_string_pretty(&out)
                .map_err(|e| format_error("serialize output", &e.to_string()))?;
            s.push('\n');
            s
        }
        OutputFormat::Conll => format_conll(&doc, &resolution),
    };
    write_output(&content, args.output.as_ref())
}

fn run_sieves() -> Result<(), String> {
    let mut out = String::new();
    for (i, kind) in SieveKind::ALL.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<20} {}\n",
            i + 1,
            kind.name(),
            kind.description()
        ));
    }
    write_output(&out, None)
}

fn run_score(args: ScoreArgs) -> Result<(), String> {
    let load = |path: &PathBuf| -> Result<_, String> {
        let json = fs::read_to_string(path)
            .map_err(|e| format_error("read file", &format!("{}: {}", path.display(), e)))?;
        chains_from_json(&json)
            .map_err(|e| format_error("parse chains", &format!("{}: {}", path.display(), e)))
    };
    let predicted = load(&args.predicted)?;
    let gold = load(&args.gold)?;
    let eval = CorefEvaluation::compute(&predicted, &gold);

    let content = if args.json {
        let mut s = serde_json::to_string_pretty(&eval)
            .map_err(|e| format_error("serialize scores", &e.to_string()))?;
        s.push('\n');
        s
    } else {
        format!("Coreference scores:\n{}\n", eval)
    };
    write_output(&content, None)
}

// ============================================================================
// Formatting
// ============================================================================

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    resolution: &'a Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    passes: Option<&'a [PassSnapshot]>,
}

fn format_pass(pass: &PassSnapshot) -> String {
    let mut roots = pass.representatives.clone();
    roots.sort();
    roots.dedup();
    format!(
        "  {:<20} {} merge(s), {} cluster(s)",
        pass.sieve.name(),
        pass.merges,
        roots.len()
    )
}

fn format_human(doc: &Document, resolution: &Resolution) -> String {
    let mut out = String::new();
    if let Some(id) = &doc.id {
        out.push_str(&format!("Document {}\n", id));
    }
    for chain in resolution.chains.values() {
        let mentions: Vec<String> = chain
            .mentions
            .iter()
            .map(|m| format!("\"{}\" [{}:{}-{}]", m.text, m.sentence, m.start, m.end))
            .collect();
        out.push_str(&format!("Chain {}: {}\n", chain.id, mentions.join(", ")));
    }
    if resolution.is_empty() {
        out.push_str("No mentions found.\n");
    }
    out
}

/// CoNLL-2012 style coreference column: `(3` opens, `3)` closes, `(3)`
/// marks a single-token mention, `|` separates entries.
fn format_conll(doc: &Document, resolution: &Resolution) -> String {
    let mut columns: Vec<Vec<Vec<String>>> = doc
        .sentences
        .iter()
        .map(|s| vec![Vec::new(); s.len()])
        .collect();
    for chain in resolution.chains.values() {
        for m in &chain.mentions {
            let Some(row) = columns.get_mut(m.sentence) else {
                continue;
            };
            if m.end == m.start + 1 {
                row[m.start].push(format!("({})", chain.id));
            } else {
                row[m.start].push(format!("({}", chain.id));
                row[m.end - 1].push(format!("{})", chain.id));
            }
        }
    }

    let mut out = String::new();
    for (s, sentence) in doc.sentences.iter().enumerate() {
        for (t, token) in sentence.tokens.iter().enumerate() {
            let coref = &columns[s][t];
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                s,
                t,
                token.word,
                token.pos,
                token.ner,
                if coref.is_empty() {
                    "-".to_string()
                } else {
                    coref.join("|")
                }
            ));
        }
        out.push('\n');
    }
    out
}

// ============================================================================
// Helper Functions
// ============================================================================

fn read_input(path: Option<&PathBuf>) -> Result<String, String> {
    if let Some(path) = path {
        return fs::read_to_string(path)
            .map_err(|e| format_error("read file", &format!("{}: {}", path.display(), e)));
    }
    if io::stdin().is_terminal() {
        return Err("No input provided. Pass a document file or pipe JSON on stdin.".to_string());
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format_error("read stdin", &e.to_string()))?;
    Ok(buf)
}

fn write_output(content: &str, path: Option<&PathBuf>) -> Result<(), String> {
    if let Some(path) = path {
        fs::write(path, content)
            .map_err(|e| format_error("write output", &format!("{}: {}", path.display(), e)))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format_error("flush stdout", &e.to_string()))?;
    }
    Ok(())
}

/// Format error message for display
fn format_error(operation: &str, details: &str) -> String {
    format!("Failed to {}: {}", operation, details)
}

/// Log info message (respects quiet flag)
fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}
