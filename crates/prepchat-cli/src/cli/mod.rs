//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use prepchat_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "prepchat")]
#[command(version)]
#[command(about = "Interview practice chat client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in to the interview service
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the cached access token
    Logout,

    /// Manage practice sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Chat within a practice session
    Chat {
        /// The ID of the session to chat in
        #[arg(value_name = "SESSION_ID")]
        session: String,
    },

    /// Show practice statistics
    Stats,
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// List sessions
    List {
        /// Filter by title substring (case-insensitive)
        #[arg(long)]
        query: Option<String>,
    },
    /// Create a session
    New {
        /// Session title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Interview domain (defaults to the configured one)
        #[arg(long)]
        domain: Option<String>,
    },
    /// Rename a session
    Rename {
        /// The ID of the session to rename
        #[arg(value_name = "SESSION_ID")]
        id: String,
        /// New title for the session
        #[arg(value_name = "TITLE")]
        title: String,
    },
    /// Delete a session
    Delete {
        /// The ID of the session to delete
        #[arg(value_name = "SESSION_ID")]
        id: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("PREPCHAT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let base_url = config.resolve_base_url()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&base_url, &email, password.as_deref()).await
        }
        Commands::Register { email, password } => {
            commands::auth::register(&base_url, &email, password.as_deref()).await
        }
        Commands::Logout => commands::auth::logout(),
        Commands::Sessions { command } => {
            let token = commands::require_token()?;
            match command {
                SessionCommands::List { query } => {
                    commands::sessions::list(&base_url, &token, query.as_deref()).await
                }
                SessionCommands::New { title, domain } => {
                    let domain = domain.unwrap_or_else(|| config.default_domain.clone());
                    commands::sessions::new(&base_url, &token, &title, &domain).await
                }
                SessionCommands::Rename { id, title } => {
                    commands::sessions::rename(&base_url, &token, &id, &title).await
                }
                SessionCommands::Delete { id } => {
                    commands::sessions::delete(&base_url, &token, &id).await
                }
            }
        }
        Commands::Chat { session } => {
            let token = commands::require_token()?;
            commands::chat::run(&base_url, &token, &session).await
        }
        Commands::Stats => {
            let token = commands::require_token()?;
            commands::stats::run(&base_url, &token).await
        }
    }
}
