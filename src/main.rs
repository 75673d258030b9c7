// src/main.rs

use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use phonica::config::CONFIG;
use phonica::{
    DraftOptions, GeminiCollaborator, ScriptedCollaborator, StaticLexicon, StoryCollaborator,
    Wordbank, compile_story_text,
};
use phonica::wordbank::SystemClock;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    /// Deterministic offline collaborator, no API key needed.
    Scripted,
    /// Gemini generateContent (requires GEMINI_API_KEY).
    Gemini,
}

/// Compile a decodable story: draft, validate, repair, report.
#[derive(Parser, Debug)]
#[command(name = "phonica", version, about)]
struct Args {
    /// Story title
    #[arg(long)]
    title: String,

    /// One-line story theme
    #[arg(long)]
    theme: String,

    /// Phonics pattern id (e.g. cvc-short-a, cvce-long-a)
    #[arg(long)]
    pattern: String,

    /// Number of pages to draft
    #[arg(long, default_value_t = 3)]
    pages: usize,

    /// Generation backend
    #[arg(long, value_enum, default_value_t = Backend::Scripted)]
    backend: Backend,

    /// Repair ceiling per page (overrides MAX_ATTEMPTS_PER_PAGE)
    #[arg(long)]
    max_attempts: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let max_attempts = args.max_attempts.unwrap_or(CONFIG.max_attempts_per_page);

    info!(
        pattern = %args.pattern,
        pages = args.pages,
        "compiling decodable story (patterns available: {})",
        StaticLexicon::pattern_ids().join(", ")
    );

    let collaborator: Box<dyn StoryCollaborator> = match args.backend {
        Backend::Scripted => Box::new(ScriptedCollaborator),
        Backend::Gemini => Box::new(GeminiCollaborator::from_env()?),
    };

    let provider = StaticLexicon;
    let wordbank = Wordbank::new(
        Duration::from_secs(CONFIG.wordbank_ttl_secs),
        std::sync::Arc::new(SystemClock),
    );

    let opts = DraftOptions::new(&args.title, &args.theme, &args.pattern, args.pages);
    let result = compile_story_text(
        collaborator.as_ref(),
        &provider,
        &wordbank,
        &opts,
        max_attempts,
    )
    .await?;

    if result.is_compliant() {
        info!("story compiles clean");
    } else {
        info!("story finished with outstanding violations, see report");
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
