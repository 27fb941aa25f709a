use speakingmock::libspeaking::store::{self, SpeakingMock};
use speakingmock::SpeakingTest;
use tempfile::TempDir;

fn create_test_database() -> (rusqlite::Connection, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("speakingmock.db");
    let conn = store::create_or_open(&db_path).expect("Failed to create database");
    (conn, temp_dir)
}

#[test]
fn import_update_export_delete() {
    let (conn, dir) = create_test_database();
    let content = SpeakingTest::embedded().unwrap();

    let id = SpeakingMock::add(&conn, "CEFR Speaking #1", &content).unwrap();
    assert_eq!(SpeakingMock::count(&conn).unwrap(), 1);

    let renamed = SpeakingMock::update(&conn, id, Some("CEFR Speaking #1 (final)"), None).unwrap();
    assert_eq!(renamed.title, "CEFR Speaking #1 (final)");

    let export_path = dir.path().join("export.json");
    let stored = SpeakingMock::get_by_id(&conn, id).unwrap();
    stored.content.write_to_path(&export_path).unwrap();
    let exported = SpeakingTest::from_path(&export_path).unwrap();
    assert_eq!(exported, content);
    assert_eq!(
        exported.question_by_number(4).unwrap().prompt,
        "What do you see in these pictures?"
    );

    SpeakingMock::delete(&conn, id).unwrap();
    assert!(SpeakingMock::get_by_id(&conn, id).unwrap_err().is_not_found());
    assert!(SpeakingMock::get_all(&conn).unwrap().is_empty());

    store::close_db(conn).unwrap();
}

#[test]
fn update_replaces_content() {
    let (conn, _dir) = create_test_database();
    let original = SpeakingTest::embedded().unwrap();
    let id = SpeakingMock::add(&conn, "Mock", &original).unwrap();

    let mut value: serde_json::Value = serde_json::from_str(&original.to_json().unwrap()).unwrap();
    value["questions"][0]["prompt"] = serde_json::json!("What is the best book you've ever read?");
    let edited = SpeakingTest::from_json_str(&value.to_string()).unwrap();

    let updated = SpeakingMock::update(&conn, id, None, Some(&edited)).unwrap();
    assert_eq!(updated.title, "Mock");
    assert_eq!(
        updated.content.question_by_number(1).unwrap().prompt,
        "What is the best book you've ever read?"
    );
    assert_ne!(updated.content, original);

    store::close_db(conn).unwrap();
}
