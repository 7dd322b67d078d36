//! REST API server binary.
//!
//! Starts the patient management REST API on the configured address
//! (default: 0.0.0.0:3000), serving patient record operations, premium
//! prediction and Swagger UI documentation.
//!
//! # Environment Variables
//! - `PMS_REST_ADDR`: server address (default: "0.0.0.0:3000")
//! - `PMS_DB_FILE`: JSON document backing the patient collection
//!   (default: "patients.json")
//!
//! # Errors
//! Exits with an error if:
//! - the logging/tracing configuration cannot be initialised,
//! - the database file path is invalid,
//! - the server address cannot be bound, or
//! - the HTTP server fails while running.

use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pms_api_rest::{router, AppState};
use pms_core::CoreConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pms_api_rest=info".parse()?)
                .add_directive("pms_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let db_file = std::env::var("PMS_DB_FILE").unwrap_or_else(|_| pms_core::DEFAULT_DB_FILE.into());

    tracing::info!("-- Starting PMS REST API on {}", addr);
    tracing::info!("-- Patient database: {}", db_file);

    let cfg = CoreConfig::new(PathBuf::from(db_file))?;
    let state = AppState::with_rule_model(&cfg);

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
