use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, SqlErr, Statement};
use uuid::Uuid;

use engine::{
    ANONYMOUS_NAME, COMMENT_MAX_LEN, ComplaintDraft, ComplaintStatus, Engine, EngineError,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, String, std::path::PathBuf) {
    let root =
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();

    (engine, db, url, path)
}

fn draft(title: &str, category: &str) -> ComplaintDraft {
    ComplaintDraft {
        title: title.to_string(),
        description: "something broke".to_string(),
        category: category.to_string(),
        ..Default::default()
    }
}

async fn table_count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS count FROM {table};"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "count").unwrap()
}

#[tokio::test]
async fn submit_and_list_round_trip() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .submit_complaint(ComplaintDraft {
            student_name: Some("Riya".to_string()),
            email: Some("riya@example.edu".to_string()),
            title: "Broken fan".to_string(),
            description: "Ceiling fan in room 12 does not start".to_string(),
            category: "Hostel".to_string(),
            location: Some("Hostel A".to_string()),
            images: vec!["img-one".to_string(), "img-two".to_string()],
        })
        .await
        .unwrap();

    let complaints = engine.list_complaints().await.unwrap();
    assert_eq!(complaints.len(), 1);

    let complaint = &complaints[0];
    assert_eq!(complaint.id, id);
    assert_eq!(complaint.student_name.as_deref(), Some("Riya"));
    assert_eq!(complaint.email.as_deref(), Some("riya@example.edu"));
    assert_eq!(complaint.title, "Broken fan");
    assert_eq!(complaint.category, "Hostel");
    assert_eq!(complaint.location.as_deref(), Some("Hostel A"));
    assert_eq!(complaint.status, ComplaintStatus::Pending);
    assert_eq!(complaint.support_count, 0);
    assert_eq!(complaint.images, vec!["img-one", "img-two"]);
    assert!(complaint.comments.is_empty());
}

#[tokio::test]
async fn submit_trims_fields_and_drops_blank_optionals() {
    let (engine, _db) = engine_with_db().await;

    engine
        .submit_complaint(ComplaintDraft {
            student_name: Some("   ".to_string()),
            title: "  Broken fan  ".to_string(),
            description: " no airflow ".to_string(),
            category: "Hostel".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let complaints = engine.list_complaints().await.unwrap();
    assert_eq!(complaints[0].title, "Broken fan");
    assert_eq!(complaints[0].description, "no airflow");
    assert_eq!(complaints[0].student_name, None);
    assert_eq!(complaints[0].location, None);
}

#[tokio::test]
async fn submit_rejects_blank_title() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .submit_complaint(draft("   ", "Campus"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("title must not be empty".to_string())
    );

    assert!(engine.list_complaints().await.unwrap().is_empty());
}

#[tokio::test]
async fn submit_rejects_unknown_category() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .submit_complaint(draft("Broken fan", "Quidditch"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("unknown category: Quidditch".to_string())
    );
}

#[tokio::test]
async fn submit_rejects_unknown_location() {
    let (engine, _db) = engine_with_db().await;

    let mut submission = draft("Broken fan", "Campus");
    submission.location = Some("Atlantis".to_string());

    let err = engine.submit_complaint(submission).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("unknown location: Atlantis".to_string())
    );
}

#[tokio::test]
async fn images_kept_in_submission_order() {
    let (engine, _db) = engine_with_db().await;

    let mut submission = draft("Pothole", "Roadways");
    submission.images = vec!["first".to_string(), "second".to_string(), "third".to_string()];
    engine.submit_complaint(submission).await.unwrap();

    let complaints = engine.list_complaints().await.unwrap();
    assert_eq!(complaints[0].images, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn list_is_newest_first() {
    let (engine, _db) = engine_with_db().await;

    let first = engine.submit_complaint(draft("First", "Campus")).await.unwrap();
    let second = engine.submit_complaint(draft("Second", "Campus")).await.unwrap();

    let complaints = engine.list_complaints().await.unwrap();
    assert_eq!(complaints.len(), 2);
    assert_eq!(complaints[0].id, second);
    assert_eq!(complaints[1].id, first);
}

#[tokio::test]
async fn toggle_support_round_trip() {
    let (engine, _db) = engine_with_db().await;
    let id = engine.submit_complaint(draft("Pothole", "Roadways")).await.unwrap();

    let (supported, count) = engine.toggle_support(&id, "device-1").await.unwrap();
    assert!(supported);
    assert_eq!(count, 1);
    assert!(engine.has_supported(&id, "device-1").await.unwrap());
    assert_eq!(engine.support_count(&id).await.unwrap(), 1);

    let complaints = engine.list_complaints().await.unwrap();
    assert_eq!(complaints[0].support_count, 1);

    let (supported, count) = engine.toggle_support(&id, "device-1").await.unwrap();
    assert!(!supported);
    assert_eq!(count, 0);
    assert!(!engine.has_supported(&id, "device-1").await.unwrap());
    assert_eq!(engine.support_count(&id).await.unwrap(), 0);
    assert_eq!(engine.support_count("no-such-id").await.unwrap(), 0);
}

#[tokio::test]
async fn toggle_support_requires_complaint() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .toggle_support("no-such-id", "device-1")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("complaint not exists".to_string())
    );
}

#[tokio::test]
async fn has_supported_is_false_for_unknown_complaint_and_blank_identifier() {
    let (engine, _db) = engine_with_db().await;

    assert!(!engine.has_supported("no-such-id", "device-1").await.unwrap());

    let id = engine.submit_complaint(draft("Pothole", "Roadways")).await.unwrap();
    assert!(!engine.has_supported(&id, "   ").await.unwrap());
}

#[tokio::test]
async fn duplicate_support_rows_hit_unique_index() {
    let (engine, db) = engine_with_db().await;
    let id = engine.submit_complaint(draft("Pothole", "Roadways")).await.unwrap();

    let backend = db.get_database_backend();
    let insert = |stamp: String| {
        Statement::from_sql_and_values(
            backend,
            "INSERT INTO support (complaint_id, user_identifier, created_at) VALUES (?, ?, ?)",
            vec![id.clone().into(), "device-1".into(), stamp.into()],
        )
    };

    db.execute(insert(Utc::now().to_rfc3339())).await.unwrap();
    let err = db.execute(insert(Utc::now().to_rfc3339())).await.unwrap_err();
    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn update_status_marks_resolved() {
    let (engine, _db) = engine_with_db().await;
    let id = engine.submit_complaint(draft("Pothole", "Roadways")).await.unwrap();

    engine
        .update_complaint_status(&id, ComplaintStatus::Resolved)
        .await
        .unwrap();

    let complaints = engine.list_complaints().await.unwrap();
    assert_eq!(complaints[0].status, ComplaintStatus::Resolved);
    assert!(complaints[0].updated_at >= complaints[0].created_at);
}

#[tokio::test]
async fn update_status_requires_complaint() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .update_complaint_status("no-such-id", ComplaintStatus::Resolved)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("complaint not exists".to_string())
    );
}

#[tokio::test]
async fn delete_complaint_removes_children() {
    let (engine, db) = engine_with_db().await;

    let mut submission = draft("Pothole", "Roadways");
    submission.images = vec!["img".to_string()];
    let id = engine.submit_complaint(submission).await.unwrap();

    engine.toggle_support(&id, "device-1").await.unwrap();
    engine.add_comment(&id, Some("Riya"), "same here").await.unwrap();

    engine.delete_complaint(&id).await.unwrap();

    assert!(engine.list_complaints().await.unwrap().is_empty());
    assert_eq!(table_count(&db, "images").await, 0);
    assert_eq!(table_count(&db, "comments").await, 0);
    assert_eq!(table_count(&db, "support").await, 0);

    // A deleted complaint answers like one that never existed.
    assert!(!engine.has_supported(&id, "device-1").await.unwrap());
}

#[tokio::test]
async fn delete_requires_complaint() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.delete_complaint("no-such-id").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("complaint not exists".to_string())
    );
}

#[tokio::test]
async fn comments_default_to_anonymous_and_come_back_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let id = engine.submit_complaint(draft("Pothole", "Roadways")).await.unwrap();

    let first = engine.add_comment(&id, None, "  me too  ").await.unwrap();
    assert_eq!(first.name, ANONYMOUS_NAME);
    assert_eq!(first.text, "me too");

    let second = engine
        .add_comment(&id, Some("Riya"), "fixed yet?")
        .await
        .unwrap();

    let complaints = engine.list_complaints().await.unwrap();
    let comments = &complaints[0].comments;
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, second.id);
    assert_eq!(comments[0].name, "Riya");
    assert_eq!(comments[1].id, first.id);
}

#[tokio::test]
async fn comment_text_is_validated() {
    let (engine, _db) = engine_with_db().await;
    let id = engine.submit_complaint(draft("Pothole", "Roadways")).await.unwrap();

    let err = engine.add_comment(&id, None, "   ").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("comment text must not be empty".to_string())
    );

    let long = "x".repeat(COMMENT_MAX_LEN + 1);
    let err = engine.add_comment(&id, None, &long).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput(format!(
            "comment text exceeds {COMMENT_MAX_LEN} characters"
        ))
    );
}

#[tokio::test]
async fn comment_requires_complaint() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .add_comment("no-such-id", None, "hello")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("complaint not exists".to_string())
    );
}

#[tokio::test]
async fn registries_are_seeded_and_sorted() {
    let (engine, _db) = engine_with_db().await;

    let categories = engine.categories().await.unwrap();
    assert_eq!(
        categories,
        vec!["Campus", "Hostel", "Others", "Roadways", "Transport/Bus"]
    );

    let locations = engine.locations().await.unwrap();
    assert_eq!(locations.len(), 14);
    assert!(locations.contains(&"Main Campus".to_string()));
    assert!(locations.contains(&"Administrative Block".to_string()));
    assert!(locations.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn add_category_soft_fails_on_duplicate() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.add_category("Electrical").await.unwrap());
    assert!(!engine.add_category("Electrical").await.unwrap());
    assert!(!engine.add_category("  Electrical  ").await.unwrap());

    let categories = engine.categories().await.unwrap();
    assert_eq!(
        categories.iter().filter(|name| *name == "Electrical").count(),
        1
    );

    let err = engine.add_category("   ").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("category name must not be empty".to_string())
    );

    assert!(engine.delete_category("Electrical").await.unwrap());
    assert!(!engine.delete_category("Electrical").await.unwrap());
}

#[tokio::test]
async fn add_location_soft_fails_on_duplicate() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.add_location("Rooftop Garden").await.unwrap());
    assert!(!engine.add_location("Rooftop Garden").await.unwrap());

    assert!(engine.delete_location("Rooftop Garden").await.unwrap());
    assert!(!engine.delete_location("Rooftop Garden").await.unwrap());
}

#[tokio::test]
async fn statistics_count_and_zero_fill() {
    let (engine, _db) = engine_with_db().await;

    let mut with_location = draft("Pothole", "Campus");
    with_location.location = Some("Main Campus".to_string());
    engine.submit_complaint(with_location).await.unwrap();
    engine.submit_complaint(draft("Lights out", "Campus")).await.unwrap();
    let resolved = engine.submit_complaint(draft("Leaky tap", "Hostel")).await.unwrap();
    engine
        .update_complaint_status(&resolved, ComplaintStatus::Resolved)
        .await
        .unwrap();

    let stats = engine.statistics().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.resolved, 1);

    assert_eq!(stats.by_category.get("Campus"), Some(&2));
    assert_eq!(stats.by_category.get("Hostel"), Some(&1));
    assert_eq!(stats.by_category.get("Others"), Some(&0));
    assert_eq!(stats.by_category.len(), engine.categories().await.unwrap().len());

    assert_eq!(stats.by_location.get("Main Campus"), Some(&1));
    assert_eq!(stats.by_location.get("Library"), Some(&0));
    assert_eq!(stats.by_location.len(), engine.locations().await.unwrap().len());
}

#[tokio::test]
async fn statistics_drop_orphaned_names_from_maps() {
    let (engine, _db) = engine_with_db().await;

    engine.submit_complaint(draft("Pothole", "Campus")).await.unwrap();
    assert!(engine.delete_category("Campus").await.unwrap());

    let stats = engine.statistics().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.pending, 1);
    assert!(!stats.by_category.contains_key("Campus"));
    assert_eq!(stats.by_category.len(), 4);
}

#[tokio::test]
async fn restart_engine_reads_same_state() {
    let (engine, db, url, path) = engine_with_file_db().await;

    let id = engine.submit_complaint(draft("Pothole", "Roadways")).await.unwrap();
    engine.toggle_support(&id, "device-1").await.unwrap();

    drop(engine);
    drop(db);

    let db2 = Database::connect(&url).await.unwrap();
    let engine2 = Engine::builder().database(db2.clone()).build().await.unwrap();

    let complaints = engine2.list_complaints().await.unwrap();
    assert_eq!(complaints.len(), 1);
    assert_eq!(complaints[0].id, id);
    assert_eq!(complaints[0].support_count, 1);

    drop(db2);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn concurrent_toggles_never_double_insert() {
    let (engine, db, _url, path) = engine_with_file_db().await;
    let id = engine.submit_complaint(draft("Pothole", "Roadways")).await.unwrap();

    let engine = Arc::new(engine);
    let mut handles = Vec::new();
    for _ in 0..2 {
        let engine = engine.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            engine.toggle_support(&id, "race-user").await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    let rows = table_count(&db, "support").await;
    assert!(rows <= 1, "unique index must cap support rows at one, found {rows}");

    let flags: Vec<bool> = outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().ok().map(|(supported, _)| *supported))
        .collect();
    if flags.len() == 2 {
        match (flags[0], flags[1]) {
            // Both raced past the existence check; exactly one row landed.
            (true, true) => assert_eq!(rows, 1),
            (false, false) => panic!("both toggles reported removal from an empty start"),
            _ => assert_eq!(rows, 0),
        }
    }

    let supported = engine.has_supported(&id, "race-user").await.unwrap();
    assert_eq!(supported, rows == 1);

    drop(db);
    let _ = std::fs::remove_file(path);
}
