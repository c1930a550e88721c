use clap::{Parser, Subcommand};
use sqlx::PgPool;

use tripintel_core::AppConfig;
use tripintel_ingest::{run_ingestion, IngestOptions};

#[derive(Debug, Parser)]
#[command(name = "tripintel-cli")]
#[command(about = "TripIntel command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sync accounts from config/accounts.yaml into the database.
    Seed,
    /// Run an ingestion over the tracked accounts.
    Ingest {
        /// Restrict the run to a single account handle.
        #[arg(long)]
        account: Option<String>,
        /// Page through the full history instead of the first page.
        #[arg(long)]
        deep: bool,
    },
    /// List recent ingestion runs.
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// List detected offers.
    Offers {
        /// Filter by account handle.
        #[arg(long)]
        account: Option<String>,
        /// Drop offers below this confidence (0..=1).
        #[arg(long)]
        min_confidence: Option<f32>,
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = tripintel_core::load_app_config()?;
    let pool_config = tripintel_db::PoolConfig::from_app_config(&config);
    let pool = tripintel_db::connect_pool(&config.database_url, pool_config).await?;
    tripintel_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Seed => seed(&pool, &config).await,
        Commands::Ingest { account, deep } => ingest(&pool, &config, account, deep).await,
        Commands::Runs { limit } => list_runs(&pool, limit).await,
        Commands::Offers {
            account,
            min_confidence,
            limit,
        } => list_offers(&pool, account, min_confidence, limit).await,
    }
}

async fn seed(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!(path = %config.accounts_path.display(), "loading tracked accounts");
    let accounts_file = tripintel_core::load_accounts(&config.accounts_path)?;
    let count = tripintel_db::seed_accounts(pool, &accounts_file.accounts).await?;
    println!(
        "seeded {count} account(s) from {}",
        config.accounts_path.display()
    );
    Ok(())
}

async fn ingest(
    pool: &PgPool,
    config: &AppConfig,
    account: Option<String>,
    deep: bool,
) -> anyhow::Result<()> {
    let opts = IngestOptions {
        account,
        deep,
        trigger_source: "cli",
    };
    tracing::info!(
        account = opts.account.as_deref().unwrap_or("all"),
        deep = opts.deep,
        "starting ingestion run"
    );
    let summary = run_ingestion(pool, config, &opts).await?;

    println!("run {} finished: {}", summary.public_id, summary.status);
    println!(
        "  accounts: {}  posts: {}  offers: {}",
        summary.accounts_processed, summary.posts_collected, summary.offers_detected
    );
    for error in &summary.errors {
        println!("  error: {error}");
    }
    Ok(())
}

async fn list_runs(pool: &PgPool, limit: i64) -> anyhow::Result<()> {
    let runs = tripintel_db::list_ingestion_runs(pool, limit.clamp(1, 200)).await?;
    if runs.is_empty() {
        println!("no ingestion runs recorded");
        return Ok(());
    }

    for run in runs {
        println!(
            "#{} {} {} [{}] accounts={} posts={} offers={}{}",
            run.id,
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.run_type,
            run.status,
            run.accounts_processed,
            run.posts_collected,
            run.offers_detected,
            run.error_message
                .map(|m| format!(" error: {m}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

async fn list_offers(
    pool: &PgPool,
    account: Option<String>,
    min_confidence: Option<f32>,
    limit: i64,
) -> anyhow::Result<()> {
    if let Some(mc) = min_confidence {
        anyhow::ensure!(
            (0.0..=1.0).contains(&mc),
            "min_confidence must be between 0 and 1"
        );
    }

    let offers = tripintel_db::list_offers(
        pool,
        account.as_deref(),
        min_confidence,
        limit.clamp(1, 200),
    )
    .await?;
    if offers.is_empty() {
        println!("no offers detected");
        return Ok(());
    }

    for offer in offers {
        let price = match (&offer.price, &offer.currency_code) {
            (Some(p), Some(c)) => format!("{p} {c}"),
            (Some(p), None) => p.to_string(),
            _ => "-".to_string(),
        };
        println!(
            "#{} {} price={} nights={} confidence={:.2}",
            offer.id,
            offer.destination.as_deref().unwrap_or("-"),
            price,
            offer
                .duration_nights
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            offer.confidence
        );
    }
    Ok(())
}
