//! CLI administration tool for playground-venues.
//!
//! Works the submission and claim review queues straight against the
//! database, without the admin web pages.
//!
//! # Usage
//!
//! ```bash
//! # Pending and recent submissions
//! cargo run --bin admin -- submissions list
//!
//! # Approve a submission (creates or updates its venue)
//! cargo run --bin admin -- submissions approve 12
//!
//! # Reject a claim with a note
//! cargo run --bin admin -- claims reject 7 --reason "not the owner"
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use playground_venues::application::services::{ReviewOutcome, ReviewService};
use playground_venues::domain::entities::{ReviewAction, ReviewStatus};
use playground_venues::infrastructure::persistence::{PgClaimRepository, PgSubmissionRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

type Reviews = ReviewService<PgSubmissionRepository, PgClaimRepository>;

/// CLI tool for managing playground-venues.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review venue submissions
    Submissions {
        #[command(subcommand)]
        action: ReviewCommand,
    },

    /// Review ownership claims
    Claims {
        #[command(subcommand)]
        action: ReviewCommand,
    },

    /// Show queue and listing counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum ReviewCommand {
    /// List the queue, most recent first
    List {
        /// Only show pending rows
        #[arg(short, long)]
        pending: bool,
    },

    /// Approve a pending row
    Approve {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Reject a pending row
    Reject {
        id: i64,

        /// Reviewer note stored with the rejection
        #[arg(short, long)]
        reason: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[derive(Clone, Copy)]
enum Queue {
    Submissions,
    Claims,
}

impl Queue {
    fn label(self) -> &'static str {
        match self {
            Queue::Submissions => "submission",
            Queue::Claims => "claim",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Submissions { action } => {
            handle_review(Queue::Submissions, action, &pool).await?
        }
        Commands::Claims { action } => handle_review(Queue::Claims, action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_review(queue: Queue, command: ReviewCommand, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let service: Reviews = ReviewService::new(
        Arc::new(PgSubmissionRepository::new(pool.clone())),
        Arc::new(PgClaimRepository::new(pool)),
    );

    match command {
        ReviewCommand::List { pending } => match queue {
            Queue::Submissions => list_submissions(&service, pending).await,
            Queue::Claims => list_claims(&service, pending).await,
        },
        ReviewCommand::Approve { id, yes } => {
            review(&service, queue, id, ReviewAction::Approve, None, yes).await
        }
        ReviewCommand::Reject { id, reason, yes } => {
            let reason = match reason {
                Some(r) => Some(r),
                None if !yes => {
                    let entered: String = Input::new()
                        .with_prompt("Reason (optional)")
                        .allow_empty(true)
                        .interact_text()?;
                    Some(entered)
                }
                None => None,
            };
            review(&service, queue, id, ReviewAction::Reject, reason, yes).await
        }
    }
}

/// Lists submissions in a table.
///
/// ```text
///   ID    Name                           Address                        Status
///   ────────────────────────────────────────────────────────────────────────────
///   12    Test Tavern                    1 Test St                      PENDING
/// ```
async fn list_submissions(service: &Reviews, pending_only: bool) -> Result<()> {
    println!("{}", "📋 Submissions".bright_blue().bold());
    println!();

    let rows = service
        .list_submissions(pending_only.then_some(ReviewStatus::Pending))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list submissions: {}", e))?;

    if rows.is_empty() {
        println!("{}", "  No submissions found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<30} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Address".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(78).bright_black());

    for s in &rows {
        println!(
            "  {:<5} {:<30} {:<30} {}",
            s.id.to_string().bright_black(),
            truncate(&s.submitted_name, 30).cyan(),
            truncate(s.submitted_address.as_deref().unwrap_or("-"), 30),
            status_label(s.status)
        );
    }

    println!();
    println!("  Total: {}", rows.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn list_claims(service: &Reviews, pending_only: bool) -> Result<()> {
    println!("{}", "📋 Claims".bright_blue().bold());
    println!();

    let rows = service
        .list_claims(pending_only.then_some(ReviewStatus::Pending))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list claims: {}", e))?;

    if rows.is_empty() {
        println!("{}", "  No claims found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<30} {:<10}",
        "ID".bright_white().bold(),
        "Venue".bright_white().bold(),
        "Claimant".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(78).bright_black());

    for row in &rows {
        let venue = row.venue_name.as_deref().unwrap_or("(unknown venue)");
        println!(
            "  {:<5} {:<30} {:<30} {}",
            row.claim.id.to_string().bright_black(),
            truncate(venue, 30).cyan(),
            truncate(&row.claim.claimant_email, 30),
            status_label(row.claim.status)
        );
    }

    println!();
    println!("  Total: {}", rows.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Applies a review action after confirmation (default: No).
async fn review(
    service: &Reviews,
    queue: Queue,
    id: i64,
    action: ReviewAction,
    reason: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let verb = match action {
        ReviewAction::Approve => "Approve",
        ReviewAction::Reject => "Reject",
    };

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("{verb} {} #{id}?", queue.label()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let result = match queue {
        Queue::Submissions => service.review_submission(id, action, reason).await,
        Queue::Claims => service.review_claim(id, action, reason).await,
    };
    let outcome: ReviewOutcome =
        result.map_err(|e| anyhow::anyhow!("Failed to review {} #{id}: {}", queue.label(), e))?;

    println!();
    println!(
        "{} {} #{} is now {}",
        "✅".green(),
        queue.label(),
        outcome.id,
        outcome.status.bright_white().bold()
    );
    if let Some(venue_id) = outcome.venue_id {
        println!("  Venue: {}", venue_id.to_string().cyan());
    }
    println!();

    Ok(())
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let venues: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues WHERE approved")
        .fetch_one(pool)
        .await?;
    let featured: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM venues WHERE approved AND is_featured")
            .fetch_one(pool)
            .await?;
    let submissions: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM venue_submissions WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;
    let claims: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM venue_claim_requests WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;

    println!("  Venues:              {}", venues.to_string().bright_green().bold());
    println!("  Featured:            {}", featured.to_string().bright_green().bold());
    println!("  Pending submissions: {}", submissions.to_string().bright_yellow().bold());
    println!("  Pending claims:      {}", claims.to_string().bright_yellow().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

fn status_label(status: ReviewStatus) -> ColoredString {
    match status {
        ReviewStatus::Pending => "PENDING".yellow(),
        ReviewStatus::Approved => "APPROVED".green(),
        ReviewStatus::Rejected => "REJECTED".red(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}
