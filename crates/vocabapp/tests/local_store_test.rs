use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use vocabapp::context::StorageContext;
use vocabapp::facade::Route;
use vocabapp::store::local::{FileStore, STORAGE_KEY};
use vocabapp::{NewWord, SortKey, WordPatch, WordStore};

fn setup() -> (TempDir, FileStore) {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("data"));
    (dir, store)
}

#[test]
fn test_file_store_persists_across_instances() {
    let (dir, store) = setup();
    let word = store
        .add_word(&NewWord::new("図書館", "圖書館").with_pronunciation("としょかん"))
        .unwrap();

    let reopened = FileStore::new(dir.path().join("data"));
    let words = reopened.list_words().unwrap();
    assert_eq!(words, vec![word]);
}

#[test]
fn test_file_store_layout() {
    let (dir, store) = setup();
    store.add_word(&NewWord::new("電車", "電車")).unwrap();

    let expected = dir.path().join("data").join(format!("{}.json", STORAGE_KEY));
    assert_eq!(store.data_file(), expected);

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&expected).unwrap()).unwrap();
    assert_eq!(on_disk.as_array().map(|a| a.len()), Some(1));
    assert_eq!(on_disk[0]["original_text"], "電車");

    for entry in fs::read_dir(dir.path().join("data")).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_file_store_reads_legacy_file() {
    let (dir, store) = setup();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(
        store.data_file(),
        r#"[
          {"id": 1, "japanese": "天気", "reading": "てんき", "chinese": "天氣",
           "example": "今日の天気はとてもいいです。",
           "createdAt": "2023-06-01T08:00:00Z", "updatedAt": "2023-06-02T08:00:00Z"},
          {"id": 2, "japanese": "仕事", "chinese": "工作", "is_favorite": true,
           "createdAt": "2023-06-03T08:00:00Z"}
        ]"#,
    )
    .unwrap();

    let words = store.list_words().unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[1].translation, "工作");
    assert!(words[1].is_favorite);
    assert_eq!(words[1].updated_at, words[1].created_at);
}

#[test]
fn test_corrupt_file_is_an_error_not_an_empty_list() {
    let (dir, store) = setup();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(store.data_file(), "[{").unwrap();
    assert!(store.list_words().is_err());
}

#[tokio::test]
async fn test_facade_over_file_store() {
    let (_dir, file_store) = setup();
    let store = WordStore::new(StorageContext::local_only(Arc::new(file_store)));

    let a = store.add(NewWord::new("b-word", "zeta")).await.unwrap();
    assert_eq!(a.route, Route::Local);
    store.add(NewWord::new("a-word", "alpha")).await.unwrap();

    let sorted = store.sorted(SortKey::TranslationAsc).await.unwrap().value;
    assert_eq!(sorted[0].translation, "alpha");

    store
        .update(&a.value.id, WordPatch::new().favorite(true))
        .await
        .unwrap();
    let sorted = store.sorted(SortKey::TranslationAsc).await.unwrap().value;
    assert_eq!(sorted[0].id, a.value.id);
}
