//! Employee provisioning from the caller's email

mod common;

use common::setup_db;
use futures::future::join_all;
use training_tracker::bootstrap::promote_administrator;
use training_tracker::error::TrainingError;
use training_tracker::repositories::EmployeeRepository;
use training_tracker::services::IdentityResolver;

#[tokio::test]
async fn test_first_contact_creates_employee_from_local_part() {
    let db = setup_db().await;

    let employee = IdentityResolver::new(&db)
        .resolve(" Maria.Silva@Example.COM ")
        .await
        .unwrap();

    assert_eq!(employee.email, "maria.silva@example.com");
    assert_eq!(employee.name, "maria.silva");
    assert!(!employee.administrator);
}

#[tokio::test]
async fn test_resolving_twice_yields_one_employee() {
    let db = setup_db().await;
    let resolver = IdentityResolver::new(&db);

    let first = resolver.resolve("carla@example.com").await.unwrap();
    let second = resolver.resolve("CARLA@example.com").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(EmployeeRepository::new(&db).find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_first_contacts_share_one_row() {
    let db = setup_db().await;

    let results = join_all((0..5).map(|_| {
        let db = &db;
        async move {
            IdentityResolver::new(db)
                .resolve("rafael@example.com")
                .await
        }
    }))
    .await;

    let ids: Vec<i32> = results.into_iter().map(|r| r.unwrap().id).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(EmployeeRepository::new(&db).find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_display_name_applies_only_on_creation() {
    let db = setup_db().await;
    let resolver = IdentityResolver::new(&db);

    let created = resolver
        .resolve_with_name("maria@example.com", Some("Maria Silva"))
        .await
        .unwrap();
    assert_eq!(created.name, "Maria Silva");

    let again = resolver
        .resolve_with_name("maria@example.com", Some("Someone Else"))
        .await
        .unwrap();
    assert_eq!(again.name, "Maria Silva");

    let blank = resolver
        .resolve_with_name("joao@example.com", Some("   "))
        .await
        .unwrap();
    assert_eq!(blank.name, "joao");
}

#[tokio::test]
async fn test_malformed_email_is_rejected_without_writing() {
    let db = setup_db().await;

    let err = IdentityResolver::new(&db)
        .resolve("not-an-email")
        .await
        .unwrap_err();

    assert!(matches!(err, TrainingError::Validation { field: "email", .. }));
    assert!(EmployeeRepository::new(&db).find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_promote_administrator_is_idempotent() {
    let db = setup_db().await;

    promote_administrator(&db, "Admin@Example.com").await.unwrap();
    promote_administrator(&db, "admin@example.com").await.unwrap();

    let employees = EmployeeRepository::new(&db).find_all().await.unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].email, "admin@example.com");
    assert!(employees[0].administrator);
}
