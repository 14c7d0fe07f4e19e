//! Text-only dialog demo.
//!
//! ```text
//! cargo run --example cli -- --config config.toml
//! ```
//!
//! Prints the server version and models, starts a session with the configured
//! model, reads user input from stdin and prints replies. Commands are
//! acknowledged as successful without doing anything.

use clap::Parser;
use diatheke::{ActionHandlers, Client, ClientConfig, CommandStatus, Dispatcher, Error, SessionInput};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Chat with a Diatheke model from the terminal")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Model to use; overrides `session.model_id` from the config.
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> diatheke::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Cli::parse();
    let config = ClientConfig::load(&args.config)?;
    let model_id = args
        .model
        .or_else(|| config.session.model_id.clone())
        .ok_or_else(|| Error::Config("missing model_id in the config file".to_string()))?;

    let client = Client::from_config(&config).await?;
    println!("Diatheke version: {}", client.version().await?);
    println!("Connected to {}\n", config.server.address);

    println!("Available models:");
    for model in client.list_models().await? {
        println!("  {} ({}, {})", model.id, model.name, model.language);
    }
    println!();

    let mut session = match config.session.wakeword.as_deref() {
        Some(wakeword) => client.create_session_with_wakeword(&model_id, wakeword).await?,
        None => client.create_session(&model_id).await?,
    };

    let lines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let handlers = ActionHandlers::new()
        .on_input(move |_ctx, _wait| {
            let lines = Arc::clone(&lines);
            async move {
                let mut lines = lines.lock().await;
                loop {
                    print!("Diatheke> ");
                    std::io::Write::flush(&mut std::io::stdout())?;
                    match lines.next_line().await? {
                        Some(line) if line.trim().is_empty() => {}
                        Some(line) => return Ok(SessionInput::text(line.trim())),
                        None => return Err(Error::Handler("stdin closed".to_string())),
                    }
                }
            }
        })
        .on_reply(|_ctx, reply| async move {
            println!("  {}", reply.text);
            Ok(())
        })
        .on_command(|_ctx, cmd| async move {
            println!("  [command] {} {:?}", cmd.id, cmd.params);
            Ok(CommandStatus::for_action(&cmd).succeeded())
        })
        .on_end(|_ctx| async {
            println!("Session ended.");
            Ok(())
        });

    let outcome = Dispatcher::new(handlers).run(&mut session).await;
    if !session.is_ended() {
        session.end().await?;
    }
    match outcome {
        Err(Error::Handler(reason)) if reason == "stdin closed" => Ok(()),
        other => other,
    }
}
