use std::sync::Arc;

use anyhow::Result;
use codenames_engine::{
    commands::{CommandHandler, Reply},
    config::{Config, OutputFormat},
    dictionary::WordPool,
    lobby::Lobbies,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Console stand-in for a chat channel.
///
/// Each stdin line is `<player>: <message>`; replies go to stdout and logs
/// to stderr.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codenames_engine=info,codenames=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Codenames console...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load word pool
    let pool = match &config.game.word_list_path {
        Some(path) => match WordPool::load(path).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(
                    "Failed to load word list {}: {}. Using the built-in list.",
                    path,
                    e
                );
                WordPool::default_words()
            }
        },
        None => WordPool::default_words(),
    };
    tracing::info!("Word pool ready with {} words", pool.len());

    let handler = CommandHandler::new(Arc::new(Lobbies::new(pool, config.game.seed)));
    let channel_id = config.console.channel_id.as_str();

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let Some((player, message)) = line.split_once(':') else {
            if !line.trim().is_empty() {
                tracing::warn!("Ignoring line without a player name: {}", line);
            }
            continue;
        };

        for reply in handler.handle_message(channel_id, player.trim(), message) {
            let rendered = render(&reply, config.console.output)?;
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.flush().await?;
    }

    tracing::info!("Input closed, shutting down");

    Ok(())
}

fn render(reply: &Reply, output: OutputFormat) -> Result<String> {
    Ok(match output {
        OutputFormat::Json => serde_json::to_string(reply)?,
        OutputFormat::Text => match reply.private_to() {
            Some(player) => format!("[to {}] {}", player, reply),
            None => reply.to_string(),
        },
    })
}
