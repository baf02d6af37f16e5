use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bibliodesk::genie::GeminiLibrarian;
use bibliodesk::infrastructure::{AppState, SeaOrmEntityStore};
use bibliodesk::services::CirculationEngine;
use bibliodesk::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bibliodesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    // --profile on the command line wins over PROFILE
    let args: Vec<String> = std::env::args().collect();
    let cli_profile = args
        .iter()
        .position(|arg| arg == "--profile")
        .and_then(|pos| args.get(pos + 1))
        .cloned();

    let config = config::Config::from_lookup(|key| match key {
        "PROFILE" if cli_profile.is_some() => cli_profile.clone(),
        _ => std::env::var(key).ok(),
    });

    // Initialize database
    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };
    let store = Arc::new(SeaOrmEntityStore::new(db));

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        match seed::seed_demo_data(&*store).await {
            Ok(true) => tracing::info!("Demo data seeded successfully."),
            Ok(false) => {}
            Err(e) => tracing::error!("Failed to seed data: {}", e),
        }
    }

    let engine = CirculationEngine::new(store).with_loan_period_days(config.loan_period_days);

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, the librarian assistant is disabled");
    }
    let assistant = Arc::new(GeminiLibrarian::from_config(&config));

    let state = AppState::new(engine, assistant);
    let app = server::build_router(state, &config.cors_allowed_origins);

    tracing::info!(
        "Starting bibliodesk (profile: {}, loan period: {} days)",
        config.profile,
        config.loan_period_days
    );

    if let Err(e) = server::serve(app, config.port).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
