use std::net::SocketAddr;

use training_tracker::bootstrap::initialize_admin_employee;
use training_tracker::config::{self, APP_CONFIG};
use training_tracker::static_service::init_database_connection;
use training_tracker::{app, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    config::load_from_args();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    tracing::info!("Starting training tracker...");

    let db_connection = init_database_connection().await?;

    tracing::info!("Checking administrator...");
    if let Err(e) = initialize_admin_employee(db_connection).await {
        tracing::error!("Failed to initialize administrator: {:#}", e);
        tracing::warn!("Continuing without administrator initialization...");
    }

    let app = app::create_app().await?;

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    tracing::info!("HTTP server listening on {}", &http_address);

    let listener = tokio::net::TcpListener::bind(&http_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
