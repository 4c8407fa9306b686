use std::env;

use chrono::Utc;
use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devnest_backend::services::leads;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Output path defaults to a timestamped file in the working directory
    let output = env::args()
        .nth(1)
        .unwrap_or_else(|| format!("leads_export_{}.csv", Utc::now().format("%Y%m%d_%H%M%S")));

    let database_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let db = Database::connect(&database_url).await?;

    let csv = leads::export_leads_csv(&db).await?;
    tokio::fs::write(&output, &csv).await?;

    tracing::info!("Wrote {} bytes to {}", csv.len(), output);
    Ok(())
}
