use std::fs;
use std::path::{Path, PathBuf};

use amcat_protocol::{Article, Lexicon, RoleTriple, Sentence, SentenceId};
use amcat_sentiment::{ResolverOptions, SentimentLexicon, SentimentResolver, MAX_RADIUS};
use amcat_statements::{PredicateRelations, StatementExtractor};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Statement extraction and sentiment scoring over parsed sentences")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a JSON sentiment lexicon to an rkyv archive
    CompileLexicon {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Extract statements from role-annotated sentences
    Statements {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Relation label that merges tokens into one predicate (repeatable)
        #[arg(long = "relation", value_name = "LABEL", default_values_t = vec![String::from("vc")])]
        relations: Vec<String>,
    },
    /// Score articles per topic
    Sentiment {
        /// Lexicon, either JSON or a compiled archive
        #[arg(short, long, value_name = "FILE")]
        lexicon: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// How many tokens either side topic spreading and intensifiers look
        #[arg(
            long,
            default_value_t = 2,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(0..=MAX_RADIUS as u64)
        )]
        radius: usize,

        /// Apply topic=/previous= lexicon conditions
        #[arg(long)]
        conditions: bool,

        /// Apply the comparative-after-modal rule
        #[arg(long)]
        comparatives: bool,
    },
}

/// One line of `statements` input.
#[derive(Debug, Deserialize)]
struct AnnotatedSentence {
    sentence: Sentence,
    #[serde(default)]
    roles: Vec<RoleTriple>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::CompileLexicon { input, output } => compile_lexicon(&input, &output),
        Command::Statements { input, relations } => statements(&input, relations),
        Command::Sentiment {
            lexicon,
            input,
            radius,
            conditions,
            comparatives,
        } => {
            let options = ResolverOptions {
                radius,
                conditions,
                comparatives,
            };
            sentiment(&lexicon, &input, options)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

fn compile_lexicon(input: &Path, output: &Path) -> Result<()> {
    let lexicon: Lexicon = read_json(input)?;
    tracing::info!(
        version = lexicon.version,
        entries = lexicon.entries.len(),
        topics = lexicon.topics.len(),
        "compiling lexicon"
    );

    let bytes = rkyv::to_bytes::<_, 256>(&lexicon).map_err(|e| anyhow!("failed to serialize lexicon: {e:?}"))?;
    // refuse to write an archive we could not load back
    SentimentLexicon::from_bytes(&bytes)?;

    fs::write(output, bytes.as_slice()).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(output = %output.display(), bytes = bytes.len(), "archive written");
    Ok(())
}

fn load_lexicon(path: &Path) -> Result<SentimentLexicon> {
    if path.extension().is_some_and(|ext| ext == "json") {
        let lexicon: Lexicon = read_json(path)?;
        return Ok(SentimentLexicon::from_lexicon(&lexicon));
    }
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(SentimentLexicon::from_bytes(&bytes)?)
}

fn statements(input: &Path, relations: Vec<String>) -> Result<()> {
    let extractor = StatementExtractor::new(PredicateRelations::new(relations)?);
    let sentences: Vec<AnnotatedSentence> = read_json(input)?;

    let (lines, skipped) = describe_statements(&extractor, &sentences);
    for (id, line) in lines {
        println!("{id}\t{line}");
    }

    tracing::info!(sentences = sentences.len(), skipped, "statement extraction done");
    Ok(())
}

/// Described statements in input order, plus the number of sentences skipped as malformed.
fn describe_statements(
    extractor: &StatementExtractor,
    sentences: &[AnnotatedSentence],
) -> (Vec<(SentenceId, String)>, usize) {
    let results: Vec<_> = sentences
        .par_iter()
        .map(|item| (item, extractor.extract(&item.sentence, &item.roles)))
        .collect();

    let mut lines = Vec::new();
    let mut skipped = 0usize;
    for (item, result) in results {
        match result {
            Ok(mut found) => {
                found.sort();
                lines.extend(
                    found
                        .iter()
                        .map(|statement| (item.sentence.id, statement.describe(&item.sentence))),
                );
            }
            Err(e) => {
                tracing::warn!(sentence = %item.sentence.id, error = %e, "skipping sentence");
                skipped += 1;
            }
        }
    }
    (lines, skipped)
}

fn sentiment(lexicon: &Path, input: &Path, options: ResolverOptions) -> Result<()> {
    let lexicon = load_lexicon(lexicon)?;
    let articles: Vec<Article> = read_json(input)?;
    let resolver = SentimentResolver::new(&lexicon, options);

    let scores: Vec<_> = articles
        .par_iter()
        .map(|article| (article.id, resolver.sentiment_per_topic(article)))
        .collect();

    for (id, per_topic) in scores {
        for (topic, score) in per_topic {
            let label = topic.map_or_else(|| "*".to_string(), |t| t.to_string());
            println!("{id}\t{label}\t{score:.4}");
        }
    }

    tracing::info!(articles = articles.len(), "sentiment scoring done");
    Ok(())
}
