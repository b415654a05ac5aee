//! # Manasik — grounded Hajj & Umrah assistant
//!
//! Usage:
//!   manasik serve                          # HTTP gateway (default port 3001)
//!   manasik serve --port 8080              # Custom port
//!   manasik ask "What is Tawaf?"           # One-shot answer in the terminal
//!   manasik search "stoning jamarat" -k 3  # Show ranked passages, no model call
//!   manasik providers                      # List supported providers

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use manasik_agent::AnswerSynthesizer;
use manasik_core::config::ManasikConfig;
use manasik_core::traits::Provider;
use manasik_knowledge::{DEFAULT_TOP_K, Retriever};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "manasik",
    version,
    about = "🕋 Manasik — answers Hajj & Umrah questions from a curated knowledge base"
)]
struct Cli {
    /// Config file (default: ~/.manasik/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Corpus file, overrides [knowledge] corpus_path
    #[arg(long, global = true)]
    corpus: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP gateway
    Serve {
        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Listen address
        #[arg(long)]
        host: Option<String>,
    },
    /// Answer a single question
    Ask {
        /// The question
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Show which passages a query retrieves
    Search {
        /// The query
        #[arg(required = true)]
        query: Vec<String>,

        /// Number of results
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// List supported providers
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry OPENAI_API_KEY and PORT
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "manasik=debug,manasik_agent=debug,manasik_knowledge=debug,manasik_providers=debug,manasik_gateway=debug,tower_http=debug"
    } else {
        "manasik=info,manasik_agent=info,manasik_knowledge=info,manasik_providers=info,manasik_gateway=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    if let Command::Providers = cli.command {
        println!("Available providers:");
        for name in manasik_providers::available_providers() {
            println!("  - {name}");
        }
        println!("\nUse `custom:<url>` for any other OpenAI-compatible endpoint.");
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => ManasikConfig::load_from(path)?,
        None => ManasikConfig::load()?,
    };
    config.apply_env_overrides();
    if let Some(corpus) = &cli.corpus {
        config.knowledge.corpus_path = corpus.clone();
    }

    let corpus_path = config.knowledge.resolved_corpus_path();
    let documents = manasik_knowledge::load_corpus(&corpus_path)
        .with_context(|| format!("loading corpus from {}", corpus_path.display()))?;
    let retriever = Arc::new(Retriever::new(documents));

    match cli.command {
        Command::Search { query, top_k } => {
            let query = query.join(" ");
            let results = retriever.retrieve(&query, top_k);
            if results.is_empty() {
                println!("No matching passages.");
            }
            for (idx, r) in results.iter().enumerate() {
                println!(
                    "{}. {} (score: {:.2}) [{}]",
                    idx + 1,
                    r.doc.display_title().unwrap_or("Untitled"),
                    r.score,
                    r.doc.display_category().unwrap_or("N/A")
                );
            }
        }
        Command::Ask { question } => {
            let synthesizer = build_synthesizer(&config, retriever)?;
            let answer = synthesizer.answer(&question.join(" ")).await?;
            println!("{answer}");
        }
        Command::Serve { port, host } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(host) = host {
                config.gateway.host = host;
            }
            let synthesizer = build_synthesizer(&config, retriever)?;
            manasik_gateway::start_server(&config.gateway, Arc::new(synthesizer)).await?;
        }
        Command::Providers => {}
    }

    Ok(())
}

fn build_synthesizer(config: &ManasikConfig, retriever: Arc<Retriever>) -> Result<AnswerSynthesizer> {
    let provider: Arc<dyn Provider> = Arc::from(manasik_providers::create_provider(config)?);
    Ok(AnswerSynthesizer::from_config(config, retriever, provider))
}
