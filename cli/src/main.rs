use clap::{Parser, Subcommand};

mod commands;
mod util;

#[derive(Parser)]
#[command(name = "perra", version, about = "Perra CLI: talk to a bot that would rather not help")]
struct Cli {
    /// API base URL
    #[arg(long, env = "PERRA_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Send a chat message to the running service
    Chat {
        /// Message text
        message: String,
        /// Display name used in greetings
        #[arg(long)]
        name: Option<String>,
    },
    /// Show site counters
    Stats,
    /// Classify a message locally without contacting the API
    Classify {
        /// Message text
        message: String,
        /// Display name used in greetings
        #[arg(long)]
        name: Option<String>,
        /// IANA timezone for time and date replies
        #[arg(long, env = "PERRA_TIMEZONE", default_value = "Europe/Moscow")]
        timezone: String,
        /// JSON lexicon overriding the built-in keyword tables and replies
        #[arg(long, env = "PERRA_LEXICON_PATH")]
        lexicon: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let api_url = cli.api_url.trim_end_matches('/').to_string();

    let code = match cli.command {
        Commands::Health => commands::health::run(&api_url).await,
        Commands::Chat { message, name } => {
            commands::chat::run(&api_url, &message, name.as_deref()).await
        }
        Commands::Stats => commands::stats::run(&api_url).await,
        Commands::Classify {
            message,
            name,
            timezone,
            lexicon,
        } => commands::classify::run(&message, name.as_deref(), &timezone, lexicon.as_deref()),
    };

    std::process::exit(code);
}
