//! regula: turn a natural-language policy statement into a JSON rule.
//!
//! Usage:
//!   regula generate "If the student's computed age is less than 18, ..."
//!   echo "..." | regula generate --provider groq
//!   regula --corpus rules.json select "..."
//!   regula extract response.txt

mod render;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use regula_ai::{BackendConfig, BackendError, HttpBackend, Provider, RuleGenerator};
use regula_core::{Corpus, DEFAULT_K, ExtractMode, Selection, build_prompt, extract_json_with};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "regula",
    version,
    about = "Convert natural-language policy statements into JSON rules"
)]
struct Cli {
    /// JSON file of {input, output} examples. Ranked by word overlap.
    /// Without it the built-in examples are all used, unranked.
    #[arg(long, global = true, env = "REGULA_CORPUS")]
    corpus: Option<PathBuf>,

    /// Examples to keep when ranking a corpus file.
    #[arg(short = 'k', long = "examples", global = true, env = "REGULA_EXAMPLES", default_value_t = DEFAULT_K)]
    examples: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a rule (reads the statement from stdin if omitted).
    Generate {
        statement: Option<String>,
        #[command(flatten)]
        backend: BackendArgs,
        /// Parse the first balanced JSON object instead of the first-to-last brace span.
        #[arg(long)]
        strict: bool,
    },
    /// Print the prompt that would be sent, without calling a backend.
    Prompt { statement: Option<String> },
    /// Show the examples that would be selected, with overlap scores.
    Select { statement: Option<String> },
    /// Extract a JSON rule from saved backend output (file or stdin).
    Extract {
        file: Option<PathBuf>,
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Args)]
struct BackendArgs {
    /// openai, groq or anthropic.
    #[arg(long, env = "REGULA_PROVIDER", default_value = "openai")]
    provider: Provider,

    /// Model identifier (defaults per provider).
    #[arg(long, env = "REGULA_MODEL")]
    model: Option<String>,

    /// Sampling temperature; 0 is deterministic.
    #[arg(long, env = "REGULA_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Endpoint override, e.g. a local OpenAI-compatible server.
    #[arg(long, env = "REGULA_API_URL")]
    api_url: Option<String>,

    /// API key. Falls back to OPENAI_API_KEY / GROQ_API_KEY / ANTHROPIC_API_KEY.
    #[arg(long, env = "REGULA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Give up on the backend after this many seconds.
    #[arg(long, env = "REGULA_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl BackendArgs {
    fn into_config(self) -> anyhow::Result<BackendConfig> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(self.provider.api_key_var()).ok());
        let config = BackendConfig::new(
            self.provider,
            api_key,
            self.model,
            self.api_url,
            self.temperature,
        )?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let (corpus, selection) = load_corpus(cli.corpus.as_deref(), cli.examples);

    match cli.command {
        Command::Generate {
            statement,
            backend,
            strict,
        } => {
            let timeout = backend.timeout_secs.map(Duration::from_secs);
            let config = backend.into_config()?;
            let statement = read_statement(statement)?;
            tracing::info!(?config, "backend configured");

            let generator = RuleGenerator::new(Arc::new(corpus), Arc::new(HttpBackend::new(config)))
                .with_selection(selection)
                .with_extract_mode(extract_mode(strict));

            let outcome = match timeout {
                Some(limit) => tokio::time::timeout(limit, generator.generate_rule(&statement))
                    .await
                    .unwrap_or(Err(BackendError::Timeout(limit))),
                None => generator.generate_rule(&statement).await,
            };
            let result = outcome.context("rule generation failed")?;
            render::print_json(&result.to_json())?;
        }
        Command::Prompt { statement } => {
            let statement = read_statement(statement)?;
            let examples = selection.apply(&statement, &corpus);
            println!("{}", build_prompt(&statement, &examples));
        }
        Command::Select { statement } => {
            let statement = read_statement(statement)?;
            let scored = selection.apply_scored(&statement, &corpus);
            render::print_json(&render::scored_examples(&scored))?;
        }
        Command::Extract { file, strict } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => read_stdin()?,
            };
            let value = match extract_json_with(&text, extract_mode(strict)) {
                Ok(rule) => rule,
                Err(e) => e.to_payload(),
            };
            render::print_json(&value)?;
        }
    }
    Ok(())
}

/// Built-in examples unranked, or a corpus file ranked to `k`.
///
/// A corpus file that fails to load leaves the run with no examples at all.
fn load_corpus(path: Option<&Path>, k: usize) -> (Corpus, Selection) {
    match path {
        None => (Corpus::fixed(), Selection::Fixed),
        Some(path) => (Corpus::load_or_empty(path), Selection::Ranked { k }),
    }
}

fn extract_mode(strict: bool) -> ExtractMode {
    if strict {
        ExtractMode::Balanced
    } else {
        ExtractMode::Greedy
    }
}

fn read_statement(arg: Option<String>) -> anyhow::Result<String> {
    let statement = match arg {
        Some(s) => s,
        None => read_stdin()?,
    };
    let statement = statement.trim();
    if statement.is_empty() {
        bail!("please enter a rule");
    }
    Ok(statement.to_string())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}
