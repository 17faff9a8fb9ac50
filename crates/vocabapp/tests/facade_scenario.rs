use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use vocabapp::context::StorageContext;
use vocabapp::facade::{ChangeKind, Route, StoreEvent};
use vocabapp::ordering::ListView;
use vocabapp::store::local::InMemoryStore;
use vocabapp::store::{BackendKind, WordBackend};
use vocabapp::{NewWord, Result, SortKey, VocabError, Word, WordId, WordPatch, WordStore};

/// A working remote that can be switched off.
struct SwitchableRemote {
    rows: InMemoryStore,
    offline: AtomicBool,
}

impl SwitchableRemote {
    fn new() -> Self {
        Self {
            rows: InMemoryStore::new(),
            offline: AtomicBool::new(false),
        }
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(VocabError::Remote {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WordBackend for SwitchableRemote {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn list(&self) -> Result<Vec<Word>> {
        self.check()?;
        self.rows.list_words()
    }

    async fn add(&self, new: &NewWord) -> Result<Word> {
        self.check()?;
        self.rows.add_word(new)
    }

    async fn update(&self, id: &WordId, patch: &WordPatch) -> Result<Word> {
        self.check()?;
        self.rows.update_word(id, patch)
    }

    async fn remove(&self, id: &WordId) -> Result<()> {
        self.check()?;
        self.rows.remove_word(id)
    }

    async fn toggle_favorite(&self, id: &WordId) -> Result<Word> {
        self.check()?;
        self.rows.toggle_word(id)
    }
}

fn ids(words: &[Word]) -> Vec<&str> {
    words.iter().map(|w| w.id.as_str()).collect()
}

#[tokio::test]
async fn test_scenario_against_remote() {
    let remote = Arc::new(SwitchableRemote::new());
    let store = WordStore::new(StorageContext::new(
        Arc::new(InMemoryStore::new()),
        Some(remote.clone() as Arc<dyn WordBackend>),
    ));

    let book = store.add(NewWord::new("本", "book")).await.unwrap();
    assert_eq!(book.route, Route::Remote);
    let book = book.into_value();
    store.add(NewWord::new("猫", "cat")).await.unwrap();

    assert!(ids(&store.list().await.unwrap().value).contains(&book.id.as_str()));

    let toggled = store.toggle_favorite(&book.id).await.unwrap().value;
    assert!(toggled.is_favorite);
    assert!(toggled.updated_at > book.updated_at);
    for key in SortKey::ALL {
        assert_eq!(store.sorted(key).await.unwrap().value[0].id, book.id);
    }

    let renamed = store
        .update(&book.id, WordPatch::new().translation("a book"))
        .await
        .unwrap()
        .value;
    assert_eq!(renamed.translation, "a book");
    assert!(renamed.updated_at > toggled.updated_at);

    let untoggled = store.toggle_favorite(&book.id).await.unwrap().value;
    assert!(!untoggled.is_favorite);

    store.remove(&book.id).await.unwrap();
    assert!(!ids(&store.list().await.unwrap().value).contains(&book.id.as_str()));
    assert!(!store.has_diverged());
}

#[tokio::test]
async fn test_outage_falls_back_and_is_observable() {
    let remote = Arc::new(SwitchableRemote::new());
    let local = Arc::new(InMemoryStore::new());
    let store = WordStore::new(StorageContext::new(
        local.clone(),
        Some(remote.clone() as Arc<dyn WordBackend>),
    ));
    let mut events = store.subscribe();

    store.add(NewWord::new("remote-only", "r")).await.unwrap();
    remote.go_offline();

    let offline = store.add(NewWord::new("本", "book")).await.unwrap();
    assert_eq!(offline.route, Route::Fallback);
    assert!(store.has_diverged());

    // The local store only sees what was written during the outage.
    let listed = store.list().await.unwrap();
    assert_eq!(listed.route, Route::Fallback);
    assert_eq!(ids(&listed.value), vec![offline.value.id.as_str()]);
    assert_eq!(local.list_words().unwrap().len(), 1);

    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push(match event {
            StoreEvent::Changed(change) => format!("{:?}@{:?}", change.kind, change.route),
            StoreEvent::FellBack { operation, .. } => format!("fellback:{}", operation),
        });
    }
    assert_eq!(
        kinds,
        vec![
            format!("{:?}@{:?}", ChangeKind::Insert, Route::Remote),
            "fellback:add".to_string(),
            format!("{:?}@{:?}", ChangeKind::Insert, Route::Fallback),
            "fellback:list".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_view_is_rederived_on_each_change() {
    let store = WordStore::new(StorageContext::local_only(Arc::new(InMemoryStore::new())));
    let mut events = store.subscribe();
    let view = ListView::new(SortKey::OriginalAsc).with_query("a");

    store.add(NewWord::new("b", "banana")).await.unwrap();
    let apple = store.add(NewWord::new("a", "apple")).await.unwrap().value;
    store.add(NewWord::new("c", "cherry")).await.unwrap();
    store.toggle_favorite(&apple.id).await.unwrap();

    let mut last = Vec::new();
    while let Ok(StoreEvent::Changed(_)) = events.try_recv() {
        last = view.derive(&store.list().await.unwrap().value);
    }
    let originals: Vec<_> = last.iter().map(|w| w.original_text.as_str()).collect();
    assert_eq!(originals, vec!["a", "b"]);
    assert!(last[0].is_favorite);
}
