use std::env;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devnest_backend::models::identity::CreateAdminRequest;
use devnest_backend::services::identity;

const USAGE: &str = "Usage: cargo run --bin create_admin -- --email <email> --password <password> --name <full name>";

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,devnest_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let (Some(email), Some(password), Some(full_name)) = (
        flag_value(&args, "--email"),
        flag_value(&args, "--password"),
        flag_value(&args, "--name"),
    ) else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };

    let database_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let (admin, created) = identity::create_admin(
        &db,
        CreateAdminRequest {
            email,
            password,
            full_name,
        },
    )
    .await?;

    if created {
        tracing::info!("Created admin {} (id {})", admin.email, admin.id);
    } else {
        tracing::info!("Admin {} already exists (id {})", admin.email, admin.id);
    }

    Ok(())
}
