//! ragchat CLI — the main entry point.
//!
//! Commands:
//! - `chat` — interactive chat or single-message mode
//! - `init` — write a default `ragchat.toml`

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ragchat_config::AppConfig;
use ragchat_pipeline::{ChatService, ConversationContext};
use ragchat_providers::{OllamaClient, QdrantRetriever};

#[derive(Parser)]
#[command(
    name = "ragchat",
    about = "ragchat — retrieval-augmented chat over a local document store",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (defaults to ./ragchat.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat against the retrieval store
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Write a default ragchat.toml to the current directory
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { message } => chat(cli.config, message).await,
        Commands::Init => init(),
    }
}

fn init() -> anyhow::Result<()> {
    let path = PathBuf::from("ragchat.toml");
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("Wrote {}", path.display());
    Ok(())
}

async fn chat(config_path: Option<PathBuf>, message: Option<String>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from(&path)?,
        None => AppConfig::load()?,
    };

    let ollama = Arc::new(OllamaClient::from_config(&config.ollama));
    let retriever = Arc::new(QdrantRetriever::from_config(&config.qdrant, ollama.clone()));
    let context = ConversationContext::new(config.max_context_length);

    let service = ChatService::new(
        retriever,
        ollama,
        context,
        config.template.to_template()?,
    )
    .context("failed to construct chat service")?
    .with_retrieval_count(config.retrieval_count);

    if let Some(message) = message {
        let response = service.handle_message(&message).await?;
        println!("{response}");
        return Ok(());
    }

    // Interactive loop. A failed request is reported and the session
    // continues; the user turn stays in the window either way.
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/quit" || message == "/exit" {
            break;
        }

        match service.handle_message(message).await {
            Ok(response) => println!("{response}\n"),
            Err(e) => eprintln!("error: {e}\n"),
        }
    }

    Ok(())
}
