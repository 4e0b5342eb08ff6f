//! Mensa CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! mensa-cli migrate
//!
//! # Create an account (role resolved at first sign-in if omitted)
//! mensa-cli account create -e head@canteen.edu -p 'S3cret-Pass' -r admin
//!
//! # Seed the catalog with sample menu items
//! mensa-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `account create` - Create accounts
//! - `seed` - Seed the catalog with sample menu items

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mensa-cli")]
#[command(author, version, about = "Mensa CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Seed the catalog with sample menu items
    Seed,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a new account
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password (must satisfy the sign-up policy)
        #[arg(short, long)]
        password: String,
        /// Role (admin or content_manager); resolved at first sign-in if omitted
        #[arg(short, long)]
        role: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // CLI output goes through tracing like everything else
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mensa_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Migrate => commands::migrate::run().await.map_err(Into::into),
        Commands::Account {
            action:
                AccountAction::Create {
                    email,
                    password,
                    role,
                },
        } => commands::account::create(&email, &password, role.as_deref())
            .await
            .map_err(Into::into),
        Commands::Seed => commands::seed::run().await.map_err(Into::into),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
