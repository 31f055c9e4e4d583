//! Telelog CLI and bot entry point.
//!
//! Binary name: `telelog`
//!
//! Parses CLI arguments, initializes the database and ledger service, then
//! either starts the long-polling bot loop or runs an operator query.

mod cli;
mod dispatch;
mod state;
mod telegram;

use clap::{Parser, Subcommand};
use clap_complete::{Shell, generate};
use secrecy::SecretString;

use dispatch::Dispatcher;
use state::AppState;
use telegram::client::BotApi;

#[derive(Parser)]
#[command(name = "telelog", about = "Telegram chat-logging bot backed by SQLite")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output machine-readable JSON for query commands
    #[arg(long, global = true)]
    json: bool,

    /// Export spans via the OpenTelemetry stdout exporter
    #[arg(long, global = true)]
    otel: bool,

    /// Database URL (defaults to sqlite in the data directory)
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (long polling)
    Run {
        /// Bot API token from @BotFather
        #[arg(long, env = "TELELOG_BOT_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Show stored statistics for a user
    Stats {
        /// Telegram user id
        telegram_id: i64,
    },

    /// Show recent stored messages for a user
    Messages {
        /// Telegram user id
        telegram_id: i64,

        /// How many messages to show
        #[arg(long, default_value_t = 5)]
        limit: i64,
    },

    /// Generate shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,telelog=debug",
        _ => "trace",
    };
    telelog_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "telelog", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, config, service)
    let state = AppState::init(cli.database_url.clone()).await?;

    match cli.command {
        Commands::Run { token } => {
            let api = BotApi::new(SecretString::from(token));
            let dispatcher = Dispatcher::new(state.service.clone(), api, state.config.clone());
            dispatcher.run().await?;
        }

        Commands::Stats { telegram_id } => {
            cli::show_stats(&state, telegram_id, cli.json).await?;
        }

        Commands::Messages { telegram_id, limit } => {
            cli::show_messages(&state, telegram_id, limit, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    telelog_observe::tracing_setup::shutdown_tracing();
    Ok(())
}
