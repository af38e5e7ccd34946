use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::config::APP_CONFIG;
use crate::repositories::{EmployeeRepository, EmployeeUpdate};
use crate::services::IdentityResolver;

/// Ensures the configured administrator exists and carries the flag.
pub async fn initialize_admin_employee(db: &DatabaseConnection) -> Result<()> {
    let Some(admin_email) = APP_CONFIG.admin_email.as_deref() else {
        tracing::info!("ADMIN_EMAIL not set, skipping administrator bootstrap");
        return Ok(());
    };

    promote_administrator(db, admin_email).await
}

pub async fn promote_administrator(db: &DatabaseConnection, email: &str) -> Result<()> {
    let employee = IdentityResolver::new(db)
        .resolve(email)
        .await
        .context("Failed to resolve administrator")?;

    if employee.administrator {
        tracing::info!("Administrator {} already exists, skipping", employee.email);
        return Ok(());
    }

    EmployeeRepository::new(db)
        .update(
            employee.id,
            EmployeeUpdate {
                administrator: Some(true),
                ..Default::default()
            },
        )
        .await
        .context("Failed to grant administrator flag")?;

    tracing::info!("Granted administrator flag to {}", employee.email);
    Ok(())
}
