use training_tracker::config;
use training_tracker::seed::seed_demo_catalog;
use training_tracker::static_service::init_database_connection;
use training_tracker::utils::tracing::init_standard_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    config::load_from_args();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    let db_connection = init_database_connection().await?;

    tracing::info!("Seeding demo catalog...");
    let report = seed_demo_catalog(db_connection).await?;

    tracing::info!(
        departments = report.departments,
        trainings = report.trainings,
        modules = report.modules,
        "Demo catalog seeded"
    );

    Ok(())
}
