//! minibank reconciler
//!
//! Operational entry point: connect, verify the schema and seeded
//! cashbooks, run a reconciliation pass, and print the report as JSON.
//! Exits non-zero when the books are inconsistent so it can back a
//! monitoring check directly.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minibank::{db, Config, FixedRateProvider, Service};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minibank=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    tracing::info!("connecting to database");
    let pool = db::connect(&config).await?;

    if !db::check_schema(&pool).await? {
        anyhow::bail!("database schema is not complete, run the migrations in migrations/");
    }

    let rates = Arc::new(FixedRateProvider::new(config.usd_eur_rate));
    let service = Service::new(pool.clone(), rates);

    let report = service.reconcile().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let consistent = report.is_consistent;
    pool.close().await;

    if !consistent {
        anyhow::bail!("ledger and account balances are inconsistent");
    }

    tracing::info!(
        accounts = report.total_accounts_checked,
        "reconciliation clean"
    );

    Ok(())
}
