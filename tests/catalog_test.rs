//! Read projections and the demo seed

mod common;

use std::time::Duration;

use common::{create_module, create_training, resolve_employee, setup_db, training_with_modules};
use training_tracker::entities::sea_orm_active_enums::{EnrollmentStatus, VideoSource};
use training_tracker::seed::{SeedReport, seed_demo_catalog};
use training_tracker::services::{CatalogProjection, EnrollmentEngine};

#[tokio::test]
async fn test_seed_builds_tree_and_is_idempotent() {
    let db = setup_db().await;

    let first = seed_demo_catalog(&db).await.unwrap();
    assert_eq!(
        first,
        SeedReport {
            departments: 2,
            trainings: 2,
            modules: 5,
        }
    );
    assert_eq!(seed_demo_catalog(&db).await.unwrap(), SeedReport::default());

    let tree = CatalogProjection::new(&db).catalog().await.unwrap();
    assert_eq!(tree.len(), 2);

    let tax = &tree[0];
    assert_eq!(tax.name, "Tax Department");
    assert_eq!(tax.trainings.len(), 1);
    assert_eq!(tax.trainings[0].code, "FISC-001");
    assert_eq!(tax.trainings[0].modules.len(), 2);
    assert!(
        tax.trainings[0]
            .modules
            .iter()
            .all(|m| m.video_source == VideoSource::Youtube)
    );

    let accounting = &tree[1];
    assert_eq!(accounting.trainings[0].code, "CONT-014");
    assert_eq!(accounting.trainings[0].responsible, "Rafael Lopes");
    let titles: Vec<&str> = accounting.trainings[0]
        .modules
        .iter()
        .map(|m| m.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec!["Planning the close", "Final validations", "Client communication"]
    );
}

#[tokio::test]
async fn test_my_progress_lists_enrollments_and_module_rows() {
    let db = setup_db().await;
    let (training, modules) = training_with_modules(&db, 2).await;
    let maria = resolve_employee(&db, "maria@example.com").await;
    let carla = resolve_employee(&db, "carla@example.com").await;
    let engine = EnrollmentEngine::new(&db);

    engine.complete_module(&maria, modules[0].id, true).await.unwrap();
    engine.complete_module(&maria, modules[1].id, false).await.unwrap();
    engine.complete_module(&carla, modules[1].id, true).await.unwrap();

    let snapshot = CatalogProjection::new(&db).my_progress(maria.id).await.unwrap();

    assert_eq!(snapshot.enrollments.len(), 1);
    assert_eq!(snapshot.enrollments[0].training_id, training.id);
    assert_eq!(snapshot.enrollments[0].percentage, 50);
    assert_eq!(snapshot.enrollments[0].status, EnrollmentStatus::InProgress);

    let rows: Vec<(i32, bool)> = snapshot
        .modules
        .iter()
        .map(|p| (p.module_id, p.completed))
        .collect();
    assert_eq!(rows, vec![(modules[0].id, true), (modules[1].id, false)]);
}

#[tokio::test]
async fn test_my_progress_is_empty_for_newcomers() {
    let db = setup_db().await;
    let joao = resolve_employee(&db, "joao@example.com").await;

    let snapshot = CatalogProjection::new(&db).my_progress(joao.id).await.unwrap();

    assert!(snapshot.enrollments.is_empty());
    assert!(snapshot.modules.is_empty());
}

#[tokio::test]
async fn test_employee_trainings_order_latest_start_first() {
    let db = setup_db().await;
    let (first, _) = training_with_modules(&db, 1).await;
    let second = create_training(&db, first.department_id, None, "Monthly Close").await;
    let untouched = create_training(&db, first.department_id, None, "Client Onboarding").await;
    let untouched_module = create_module(&db, untouched.id, "Welcome").await;
    let maria = resolve_employee(&db, "maria@example.com").await;
    let engine = EnrollmentEngine::new(&db);

    engine.start_training(&maria, first.id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    engine.start_training(&maria, second.id).await.unwrap();
    // An unchecked module materializes an enrollment that never started
    engine
        .complete_module(&maria, untouched_module.id, false)
        .await
        .unwrap();

    let history = CatalogProjection::new(&db)
        .employee_trainings(maria.id)
        .await
        .unwrap();

    let order: Vec<i32> = history.iter().map(|h| h.training_id).collect();
    assert_eq!(order, vec![second.id, first.id, untouched.id]);
    assert_eq!(history[0].name, "Monthly Close");
    assert_eq!(history[2].status, EnrollmentStatus::NotStarted);
    assert!(history[2].started_at.is_none());
}
