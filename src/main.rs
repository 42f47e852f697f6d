use anyhow::Result;
use clap::{Parser, Subcommand};
use post_generator::core::ConfigManager;
use post_generator::{scrape_styled_posts, start_web_server};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "doppelganger", about = "LinkedIn style-mimicking post generator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one scrape and print the formatted posts
    Scrape,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("post_generator=info,rocket=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = ConfigManager::load()?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let port = port
                .or_else(|| {
                    std::env::var("ROCKET_PORT")
                        .ok()
                        .and_then(|value| value.parse().ok())
                })
                .unwrap_or(8001);
            start_web_server(config, port).await
        }
        Command::Scrape => {
            let scrape_config = config.scrape.clone();
            let formatted =
                tokio::task::spawn_blocking(move || scrape_styled_posts(&scrape_config)).await?;
            println!("{formatted}");
            Ok(())
        }
    }
}
