use users_backend::backend::database::health::HEALTHY_MESSAGE;
use users_backend::backend::database::HealthStatus;
use users_backend::models::{User, UserUpdate};
use users_backend::AppError;

mod common;

use common::{test_user, TestDatabaseType};

// Macro to run the same test with different database types
macro_rules! matrix_test {
    ($test_name:ident, $test_fn:ident) => {
        paste::paste! {
            #[tokio::test]
            async fn [<$test_name _sqlite>]() {
                $test_fn(TestDatabaseType::Sqlite).await;
            }

            #[tokio::test]
            async fn [<$test_name _postgres>]() {
                if !common::docker_available() {
                    eprintln!("Docker is not available, skipping {} on PostgreSQL", stringify!($test_name));
                    return;
                }
                $test_fn(TestDatabaseType::Postgres).await;
            }
        }
    };
}

async fn create_and_get_round_trip_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    let first = service.create_user(&test_user("first")).await.unwrap();
    let second = service.create_user(&test_user("second")).await.unwrap();

    assert!(!first.id.is_empty());
    assert_ne!(first.id, second.id);
    assert!(first.created.is_some());
    assert_eq!(first.first_name, "Ada");
    assert_eq!(first.last_name, "Lovelace");
    assert_eq!(first.age, 36);
    assert_eq!(first.email, "ada.first@example.com");

    let fetched = service.get_user_by_id(&first.id).await.unwrap();
    assert_eq!(fetched, first);
}

async fn duplicate_email_conflict_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    let original = service.create_user(&test_user("dup")).await.unwrap();

    let duplicate = User::new("Grace", "Hopper", 85, "ada.dup@example.com");
    let err = service.create_user(&duplicate).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "unexpected error: {:?}", err);

    let stored = service.get_user_by_id(&original.id).await.unwrap();
    assert_eq!(stored, original);
}

async fn partial_update_age_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    let created = service.create_user(&test_user("age")).await.unwrap();
    let update = UserUpdate::default().with_age(37);
    let updated = service.update_user_by_id(&created.id, &update).await.unwrap();

    assert_eq!(updated.age, 37);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.first_name, created.first_name);
    assert_eq!(updated.last_name, created.last_name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.created, created.created);

    let fetched = service.get_user_by_id(&created.id).await.unwrap();
    assert_eq!(fetched, updated);
}

async fn update_several_fields_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    let created = service.create_user(&test_user("multi")).await.unwrap();
    let update = UserUpdate::default()
        .with_first_name("Augusta")
        .with_email("augusta@example.com");
    let updated = service.update_user_by_id(&created.id, &update).await.unwrap();

    assert_eq!(updated.first_name, "Augusta");
    assert_eq!(updated.email, "augusta@example.com");
    assert_eq!(updated.last_name, "Lovelace");
    assert_eq!(updated.age, 36);
}

async fn not_found_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    let err = service.get_user_by_id("missing-id").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let update = UserUpdate::default().with_age(40);
    let err = service
        .update_user_by_id("missing-id", &update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service
        .update_user_by_id("missing-id", &UserUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

async fn empty_update_returns_current_row_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    let created = service.create_user(&test_user("noop")).await.unwrap();
    let unchanged = service
        .update_user_by_id(&created.id, &UserUpdate::default())
        .await
        .unwrap();

    assert_eq!(unchanged, created);
}

async fn validation_never_reaches_store_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    let invalid = User::new("Ada", "", 36, "ada.invalid@example.com");
    let err = service.create_user(&invalid).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "last name is required"));

    // Nothing was stored, so the same email is still free.
    let valid = User::new("Ada", "Lovelace", 36, "ada.invalid@example.com");
    assert!(service.create_user(&valid).await.is_ok());

    let update = UserUpdate::default().with_first_name("");
    let err = service.update_user_by_id("any-id", &update).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "first name is required"));
}

async fn client_supplied_id_is_ignored_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    let mut user = test_user("client-id");
    user.id = "chosen-by-client".to_string();

    let created = service.create_user(&user).await.unwrap();
    assert_ne!(created.id, "chosen-by-client");
    assert!(uuid::Uuid::parse_str(&created.id).is_ok());
    assert_eq!(user.id, "chosen-by-client");

    let err = service.get_user_by_id("chosen-by-client").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

async fn health_up_then_down_after_close_test(db_type: TestDatabaseType) {
    let (service, _test_db) = common::setup_service(db_type).await.unwrap();

    // Connections used by the schema setup go back to the pool asynchronously
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let report = service.health().await;
    assert_eq!(report.status, HealthStatus::Up);
    assert_eq!(report.message.as_deref(), Some(HEALTHY_MESSAGE));
    assert!(report.error.is_none());

    let stats = report.stats.as_ref().unwrap();
    assert!(stats.open_connections >= 1);
    assert_eq!(stats.in_use, 0);
    assert_eq!(stats.idle, stats.open_connections);
    assert_eq!(stats.max_idle_closed, 0);
    assert_eq!(stats.max_lifetime_closed, 0);

    let map = report.to_map();
    assert_eq!(map["status"], "up");
    assert!(map.contains_key("open_connections"));
    assert!(map.contains_key("wait_duration"));

    service.close().await;

    let report = service.health().await;
    assert_eq!(report.status, HealthStatus::Down);
    assert!(report.stats.is_none());
    assert!(report.error.as_deref().unwrap().starts_with("db down"));

    let err = service.get_user_by_id("any-id").await.unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
}

matrix_test!(create_and_get_round_trip, create_and_get_round_trip_test);
matrix_test!(duplicate_email_conflict, duplicate_email_conflict_test);
matrix_test!(partial_update_age, partial_update_age_test);
matrix_test!(update_several_fields, update_several_fields_test);
matrix_test!(not_found, not_found_test);
matrix_test!(empty_update_returns_current_row, empty_update_returns_current_row_test);
matrix_test!(validation_never_reaches_store, validation_never_reaches_store_test);
matrix_test!(client_supplied_id_is_ignored, client_supplied_id_is_ignored_test);
matrix_test!(health_up_then_down_after_close, health_up_then_down_after_close_test);
