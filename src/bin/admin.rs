//! CLI administration tool for url-toggle.
//!
//! Runs the same services as the HTTP server against the configured
//! PostgreSQL store and cache, without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com
//!
//! # Look up where a short id points
//! cargo run --bin admin -- resolve 100680
//!
//! # Enable or disable a short link
//! cargo run --bin admin -- toggle 100680
//!
//! # View access statistics
//! cargo run --bin admin -- stats 100680
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `url_toggle::config`.

use url_toggle::AppError;
use url_toggle::config::{self, Config};
use url_toggle::domain::repositories::UrlRepository;
use url_toggle::infrastructure::persistence::PgUrlRepository;
use url_toggle::server;
use url_toggle::state::AppState;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-toggle.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short URL
    Shorten {
        /// URL to shorten
        url: String,
    },

    /// Resolve a short id to its original URL (counts as an access)
    Resolve {
        /// Six-character short id
        id: String,
    },

    /// Flip a short link between enabled and disabled
    Toggle {
        /// Six-character short id
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show access statistics for a short id
    Stats {
        /// Six-character short id
        id: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;

    let pool = server::connect_database(&config).await?;

    match cli.command {
        Commands::Db { action } => handle_db_action(action, &config, pool).await?,
        Commands::Shorten { url } => shorten(&connect_state(&config, pool).await, &url).await?,
        Commands::Resolve { id } => resolve(&connect_state(&config, pool).await, &id).await?,
        Commands::Toggle { id, yes } => {
            toggle(&connect_state(&config, pool).await, &id, yes).await?
        }
        Commands::Stats { id } => stats(&connect_state(&config, pool).await, &id).await?,
    }

    Ok(())
}

/// Wires the server's services around the open pool.
async fn connect_state(config: &Config, pool: PgPool) -> AppState {
    if !config.is_redis_enabled() {
        println!(
            "{}",
            "⚠️  Redis not configured: statistics are not shared with the server".yellow()
        );
    }

    let cache = server::connect_cache(config).await;
    server::build_state(config, pool, cache)
}

/// Creates a short URL, reporting the existing one on conflict.
async fn shorten(state: &AppState, url: &str) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    if url.trim().is_empty() {
        anyhow::bail!("URL must not be empty");
    }

    match state.resolution_service.shorten(url).await {
        Ok(short_url) => {
            println!("  Original: {}", url.cyan());
            println!("  Short:    {}", short_url.bright_yellow().bold());
            println!();
            println!("{}", "✅ Short URL created".green().bold());
        }
        Err(AppError::Conflict { short_url }) => {
            println!("{}", "⚠️  URL already exists".yellow());
            if let Some(short_url) = short_url {
                println!("  Short:    {}", short_url.bright_yellow());
            }
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to shorten URL: {}", e)),
    }
    println!();

    Ok(())
}

/// Resolves a short id the way a redirect would.
async fn resolve(state: &AppState, id: &str) -> Result<()> {
    println!("{}", "🔍 Resolve".bright_blue().bold());
    println!();

    match state.resolution_service.resolve(id).await {
        Ok(original_url) => {
            println!("  {} → {}", id.bright_white().bold(), original_url.cyan());
        }
        Err(AppError::NotFound { .. }) => {
            println!("  {}", "Not found".red());
        }
        Err(AppError::Disabled { .. }) => {
            println!("  {}", "Disabled".red());
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to resolve URL: {}", e)),
    }
    println!();

    Ok(())
}

/// Toggles a short link with a confirmation prompt.
///
/// # Safety
///
/// - Shows the current state before asking
/// - Requires confirmation (default: No) unless `--yes` is given
async fn toggle(state: &AppState, id: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔁 Toggle Short Link".bright_blue().bold());
    println!();

    let record = match state.resolution_service.get_record(id).await {
        Ok(record) => record,
        Err(AppError::NotFound { .. }) => {
            println!("  {}", "Not found".red());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    println!("  Short:    {}", record.short_url.bright_yellow());
    println!("  Original: {}", record.original_url.cyan());
    println!("  State:    {}", state_label(record.enabled));
    println!();

    if !skip_confirm {
        let prompt = if record.enabled {
            "Disable this link?"
        } else {
            "Enable this link?"
        };

        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let enabled = state
        .resolution_service
        .toggle_state(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update URL state: {}", e))?;

    println!();
    println!("{} {}", "✅ Link is now".green().bold(), state_label(enabled));
    println!();

    Ok(())
}

/// Displays the access counters of a short id.
async fn stats(state: &AppState, id: &str) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = state
        .stats_service
        .get_stats(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to get URL stats: {}", e))?;

    println!("  Id:          {}", id.bright_white().bold());
    println!(
        "  Accesses:    {}",
        stats.access_count.to_string().bright_green().bold()
    );
    println!("  Last access: {}", stats.last_access.bright_black());
    println!();

    Ok(())
}

fn state_label(enabled: bool) -> ColoredString {
    if enabled {
        "ENABLED".green()
    } else {
        "DISABLED".red()
    }
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config, pool: PgPool) -> Result<()> {
    let repo = PgUrlRepository::new(Arc::new(pool.clone()), config.store_timeout());

    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;

            let urls_count = repo
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count URLs: {}", e))?;

            let disabled_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE enabled = FALSE")
                    .fetch_one(&pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  URLs:       {}",
                urls_count.to_string().bright_green().bold()
            );
            println!(
                "  Disabled:   {}",
                disabled_count.to_string().bright_red().bold()
            );
            println!();
        }
    }

    Ok(())
}
