//! CLI administration tool for shorturl.
//!
//! Operates directly on the PostgreSQL store, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Apply pending migrations
//! cargo run --bin admin -- db migrate
//!
//! # Number of stored mappings
//! cargo run --bin admin -- stats
//!
//! # Most recent mappings
//! cargo run --bin admin -- list --limit 20
//!
//! # Read-only lookups
//! cargo run --bin admin -- resolve 47DEQpj8HB
//! cargo run --bin admin -- lookup https://example.com
//!
//! # Remove every mapping
//! cargo run --bin admin -- wipe
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
//! - `STORAGE_TIMEOUT_MS` (optional): per-query deadline in milliseconds

use shorturl::config::{Config, mask_connection_string};
use shorturl::domain::entities::ShortCode;
use shorturl::domain::repositories::{RepositoryError, UrlRepository};
use shorturl::infrastructure::persistence::PgUrlRepository;
use shorturl::infrastructure::persistence::pg_url_repository::DEFAULT_STATEMENT_TIMEOUT;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::time::Duration;

/// CLI tool for managing shorturl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Show number of stored mappings
    Stats,

    /// List the most recently created mappings
    List {
        /// Maximum number of rows to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Show the URL behind a short code
    Resolve {
        /// Short code (10 characters)
        code: String,
    },

    /// Show the short code assigned to a URL
    Lookup {
        /// Original URL, matched byte for byte
        url: String,
    },

    /// Delete every mapping
    Wipe {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                mask_connection_string(&database_url)
            )
        })?;

    let timeout = std::env::var("STORAGE_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_STATEMENT_TIMEOUT);

    let repo = PgUrlRepository::with_timeout(pool.clone(), timeout);

    let result = match cli.command {
        Commands::Db { action } => handle_db_action(action, &pool).await,
        Commands::Stats => handle_stats(&repo).await,
        Commands::List { limit } => list_mappings(&repo, limit).await,
        Commands::Resolve { code } => resolve(&repo, &code).await,
        Commands::Lookup { url } => lookup(&repo, &url).await,
        Commands::Wipe { yes } => wipe(&repo, yes).await,
    };

    pool.close().await;

    result
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "🛠️  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Schema is up to date".green().bold());
        }
    }

    Ok(())
}

/// Displays the number of stored mappings.
async fn handle_stats(repo: &PgUrlRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let count = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

    println!("  Mappings: {}", count.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Lists recent mappings, newest first.
///
/// # Output Format
///
/// ```text
/// 📋 Recent mappings
///
///   Code        Created              URL
///   ──────────────────────────────────────────────────────────
///   47DEQpj8HB  2025-01-15 10:30     https://example.com
/// ```
async fn list_mappings(repo: &PgUrlRepository, limit: i64) -> Result<()> {
    if limit <= 0 {
        anyhow::bail!("--limit must be positive, got {limit}");
    }

    println!("{}", "📋 Recent mappings".bright_blue().bold());
    println!();

    let rows = repo
        .list_recent(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list mappings: {}", e))?;

    if rows.is_empty() {
        println!("{}", "  No mappings stored".yellow());
        return Ok(());
    }

    println!(
        "  {:<11} {:<20} {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for (mapping, created_at) in &rows {
        println!(
            "  {:<11} {:<20} {}",
            mapping.short_code.as_str().cyan(),
            created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            mapping.original_url
        );
    }

    println!();
    println!("  Shown: {}", rows.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn resolve(repo: &PgUrlRepository, code: &str) -> Result<()> {
    let code = ShortCode::parse(code)?;

    match repo.get(&code).await {
        Ok(url) => println!("  {} → {}", code.as_str().cyan(), url.bright_white()),
        Err(RepositoryError::NotFound) => {
            println!("{}", format!("  No mapping for {code}").yellow())
        }
        Err(e) => return Err(anyhow::anyhow!("Lookup failed: {}", e)),
    }

    Ok(())
}

async fn lookup(repo: &PgUrlRepository, url: &str) -> Result<()> {
    match repo.get_by_original(url).await {
        Ok(code) => println!("  {} → {}", url.bright_white(), code.as_str().cyan()),
        Err(RepositoryError::NotFound) => println!("{}", "  URL was never shortened".yellow()),
        Err(e) => return Err(anyhow::anyhow!("Lookup failed: {}", e)),
    }

    Ok(())
}

/// Deletes every mapping after confirmation (default: No).
async fn wipe(repo: &PgUrlRepository, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Wipe store".bright_blue().bold());
    println!();

    let count = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

    println!(
        "{}",
        format!("⚠️  This permanently deletes {count} mappings.")
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete all mappings?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .clear()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wipe store: {}", e))?;

    println!();
    println!(
        "{}",
        format!("✅ Deleted {deleted} mappings").green().bold()
    );
    println!();

    Ok(())
}
