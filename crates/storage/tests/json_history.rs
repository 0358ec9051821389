use storage::{HistoryStore, JsonFileStore, StorageError};
use toeic_core::model::{AnswerChoice, HistoryDocument, QuestionRecord, SessionRecord, Tally};
use toeic_core::time::fixed_now;

fn session(correct: &[bool]) -> SessionRecord<QuestionRecord> {
    let mut session = SessionRecord::new(fixed_now(), Some("Tourism".into()), None);
    for &is_correct in correct {
        session.record(QuestionRecord {
            topic: "Tourism".into(),
            sentence: "The tour ___ at nine.".into(),
            user_answer: AnswerChoice::B,
            correct_answer: if is_correct {
                AnswerChoice::B
            } else {
                AnswerChoice::D
            },
            is_correct,
            placeholder: false,
        });
    }
    session
}

#[tokio::test]
async fn missing_file_loads_empty_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::<QuestionRecord>::new(dir.path().join("part5_history.json"));

    let doc = store.load().await;
    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        serde_json::json!({"sessions": [], "total_score": 0, "total_attempted": 0})
    );
}

#[tokio::test]
async fn saved_counters_equal_session_sums() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::<QuestionRecord>::new(dir.path().join("part5_history.json"));

    let mut doc = store.load().await;
    doc.append(session(&[true, false, true]));
    store.save(&doc).await.expect("first save");

    let mut doc = store.load().await;
    doc.append(session(&[false]));
    store.save(&doc).await.expect("second save");

    let reloaded = store.load().await;
    assert_eq!(reloaded.sessions().len(), 2);
    assert_eq!(reloaded.totals(), Tally::new(2, 4));
    assert!(reloaded.is_consistent());

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("\n  \"sessions\""), "file should be pretty-printed");
}

#[tokio::test]
async fn corrupt_file_is_backed_up_and_replaced_by_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("part6_history.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = JsonFileStore::<QuestionRecord>::new(&path);

    let doc = store.load().await;
    assert!(doc.is_empty());
    assert_eq!(doc.totals(), Tally::default());

    let backup = std::fs::read_to_string(store.corrupt_backup_path()).unwrap();
    assert_eq!(backup, "{ not json");

    store.save(&doc).await.unwrap();
    assert_eq!(
        std::fs::read_to_string(store.corrupt_backup_path()).unwrap(),
        "{ not json"
    );
}

#[tokio::test]
async fn wrong_shape_counts_as_corrupt() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("part5_history.json");
    std::fs::write(&path, r#"{"sessions": 5}"#).unwrap();
    let store = JsonFileStore::<QuestionRecord>::new(&path);

    assert!(store.load().await.is_empty());
    assert!(store.corrupt_backup_path().exists());
}

#[tokio::test]
async fn older_format_history_is_moved_aside() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("part5_history.json");
    let legacy = r#"{"sessions":[{"date":"2024-03-01 09:00:00","score":3,"total":4,"questions":[]}],"total_correct":3,"total_questions":4}"#;
    std::fs::write(&path, legacy).unwrap();
    let store = JsonFileStore::<QuestionRecord>::new(&path);

    let doc = store.load().await;
    assert!(doc.is_empty());
    assert_eq!(
        std::fs::read_to_string(store.corrupt_backup_path()).unwrap(),
        legacy
    );
}

#[tokio::test]
async fn unreadable_history_is_not_overwritten() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("part7_history.json");
    // A directory in place of the file fails every read without being missing.
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep.txt"), "old data").unwrap();
    let store = JsonFileStore::<QuestionRecord>::new(&path);

    let mut doc = store.load().await;
    assert!(doc.is_empty());
    assert!(!store.corrupt_backup_path().exists());

    doc.append(session(&[true]));
    let err = store.save(&doc).await.unwrap_err();
    assert!(matches!(err, StorageError::Unreadable { .. }));
    assert!(err.to_string().contains("not overwriting"));
    assert_eq!(
        std::fs::read_to_string(path.join("keep.txt")).unwrap(),
        "old data"
    );
    assert!(!dir.path().join("part7_history.json.tmp").exists());
}

#[tokio::test]
async fn tampered_totals_are_reconciled_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("part5_history.json");
    let mut doc = HistoryDocument::default();
    doc.append(session(&[true, true]));
    let mut value = serde_json::to_value(&doc).unwrap();
    value["total_score"] = serde_json::json!(99);
    std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

    let store = JsonFileStore::<QuestionRecord>::new(&path);
    let loaded = store.load().await;
    assert_eq!(loaded.totals(), Tally::new(2, 2));
    assert!(!store.corrupt_backup_path().exists());
}

#[tokio::test]
async fn save_creates_missing_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("history").join("part8_history.json");
    let store = JsonFileStore::<QuestionRecord>::new(&path);

    store.save(&HistoryDocument::default()).await.expect("save");
    assert!(path.exists());
}
