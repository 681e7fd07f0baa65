//! personagen CLI entry point.
//!
//! Provides `generate`, `history`, `show`, and `clear` subcommands over a
//! single output directory of persona documents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use personagen::config::Config;
use personagen::content::reddit::RedditClient;
use personagen::content::username_from_input;
use personagen::credentials::{load_dotenv, resolve_api_key};
use personagen::history::{clear_history, list_history, read_artifact};
use personagen::persona::synthesizer::{PersonaSynthesizer, SynthesisSettings};
use personagen::pipeline::{GenerationOutcome, PersonaPipeline};
use personagen::providers::openai::OpenAiProvider;
use personagen::render::{artifact_file_name, summary, TEXT_EXTENSION};

/// Build a user persona from a Reddit profile.
#[derive(Parser)]
#[command(name = "personagen", version, about)]
struct Cli {
    /// Config file (default: `$PERSONAGEN_CONFIG` or `./personagen.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for persona documents, overriding the config.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Generate and save a persona for a Reddit user.
    Generate {
        /// Username, `u/name`, or profile URL.
        profile: String,
        /// Posts and comments to fetch (each).
        #[arg(long)]
        limit: Option<u32>,
        /// Skip the avatar lookup.
        #[arg(long)]
        no_avatar: bool,
    },
    /// List previously generated personas.
    History,
    /// Print a saved persona document.
    Show {
        /// File name from `history`, or a username.
        selection: String,
        /// Print the plain-text document instead of HTML.
        #[arg(long)]
        text: bool,
    },
    /// Delete all saved persona documents.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    load_dotenv(Path::new(".env"))?;
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }

    let _logging_guard = match &config.logging.dir {
        Some(dir) => Some(personagen::logging::init_with_file(dir)?),
        None => {
            personagen::logging::init_cli();
            None
        }
    };
    config.log_rejected_overrides();

    match cli.command {
        Command::Generate {
            profile,
            limit,
            no_avatar,
        } => handle_generate(&config, &profile, limit, no_avatar).await,
        Command::History => handle_history(&config.output.dir),
        Command::Show { selection, text } => handle_show(&config.output.dir, &selection, text),
        Command::Clear => handle_clear(&config.output.dir),
    }
}

/// Fetch, synthesize, and save one persona.
async fn handle_generate(
    config: &Config,
    profile: &str,
    limit: Option<u32>,
    no_avatar: bool,
) -> anyhow::Result<()> {
    let username = username_from_input(profile)?;
    let api_key = resolve_api_key(&config.llm.api_key_env, |key| std::env::var(key).ok())?;

    let provider = Arc::new(OpenAiProvider::from_config(&config.llm, api_key));
    let reddit = Arc::new(RedditClient::new(&config.reddit));
    let synthesizer = PersonaSynthesizer::new(provider, SynthesisSettings::from_config(config));

    let mut pipeline = PersonaPipeline::new(
        Arc::clone(&reddit) as Arc<dyn personagen::content::ContentSource>,
        synthesizer,
        config.output.dir.clone(),
        limit.unwrap_or(config.reddit.fetch_limit),
    );
    if config.persona.fetch_avatar && !no_avatar {
        pipeline = pipeline.with_avatars(reddit);
    }

    info!(username = %username, "generating persona");
    match pipeline.generate(&username).await? {
        GenerationOutcome::Generated(generated) => {
            println!(
                "Fetched {} posts and {} comments for u/{username}",
                generated.post_count, generated.comment_count
            );
            println!();
            println!("{}", summary(&generated.persona));
            println!();
            println!("Saved {}", generated.paths.html.display());
            println!("Saved {}", generated.paths.text.display());
        }
        GenerationOutcome::NoContent => {
            println!("No content found for u/{username}; nothing generated.");
        }
    }
    Ok(())
}

/// Print one line per saved persona.
fn handle_history(output_dir: &Path) -> anyhow::Result<()> {
    let entries = list_history(output_dir)?;
    if entries.is_empty() {
        println!("No persona history found.");
        return Ok(());
    }
    for entry in entries {
        println!("{}\tu/{}", entry.file_name, entry.username);
    }
    Ok(())
}

/// Print a saved document to stdout.
fn handle_show(output_dir: &Path, selection: &str, text: bool) -> anyhow::Result<()> {
    let selection = match (text, selection.strip_suffix(".html")) {
        (true, Some(stem)) => format!("{stem}.{TEXT_EXTENSION}"),
        (true, None) if !selection.contains('.') => artifact_file_name(selection, TEXT_EXTENSION),
        _ => selection.to_owned(),
    };
    let contents = read_artifact(output_dir, &selection)?;
    print!("{contents}");
    Ok(())
}

/// Remove every saved persona document.
fn handle_clear(output_dir: &Path) -> anyhow::Result<()> {
    let removed = clear_history(output_dir)?;
    println!("Removed {removed} persona files from {}", output_dir.display());
    Ok(())
}
