//! Shared fixtures for the integration tests: a migrated in-memory SQLite
//! database and a few catalog builders.

#![allow(dead_code)]

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use training_tracker::entities::sea_orm_active_enums::VideoSource;
use training_tracker::entities::{department, employee, module, training};
use training_tracker::repositories::{
    DepartmentRepository, ModuleRepository, NewModule, NewTraining, TrainingRepository,
};
use training_tracker::services::IdentityResolver;

/// One pooled connection, so every test sees the same in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

pub async fn create_department(db: &DatabaseConnection, name: &str) -> department::Model {
    DepartmentRepository::new(db)
        .create(name.to_string())
        .await
        .expect("Failed to create department")
}

pub async fn create_training(
    db: &DatabaseConnection,
    department_id: i32,
    code: Option<&str>,
    name: &str,
) -> training::Model {
    TrainingRepository::new(db)
        .create(
            NewTraining {
                code: code.map(str::to_string),
                name: name.to_string(),
                responsible: "Carla Andrade".to_string(),
                department_id,
            },
            day(9, 1),
        )
        .await
        .expect("Failed to create training")
}

pub async fn create_module(db: &DatabaseConnection, training_id: i32, title: &str) -> module::Model {
    ModuleRepository::new(db)
        .create(NewModule {
            training_id,
            title: title.to_string(),
            description: format!("About {title}"),
            video_embed: String::new(),
            video_source: VideoSource::Youtube,
        })
        .await
        .expect("Failed to create module")
}

/// A department with one training holding `module_count` modules.
pub async fn training_with_modules(
    db: &DatabaseConnection,
    module_count: usize,
) -> (training::Model, Vec<module::Model>) {
    let department = create_department(db, "Tax Department").await;
    let training = create_training(db, department.id, None, "Tax Assessment Routines").await;

    let mut modules = Vec::with_capacity(module_count);
    for n in 1..=module_count {
        modules.push(create_module(db, training.id, &format!("Module {n}")).await);
    }

    (training, modules)
}

pub async fn resolve_employee(db: &DatabaseConnection, email: &str) -> employee::Model {
    IdentityResolver::new(db)
        .resolve(email)
        .await
        .expect("Failed to resolve employee")
}
