use super::blob::{BlobStorage, FsBlobStorage, MemBlobStorage};
use super::{BackendKind, WordBackend};
use crate::error::{Result, VocabError};
use crate::model::{next_stamp, NewWord, Word, WordId, WordPatch};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

/// Fixed name of the blob holding the whole collection.
pub const STORAGE_KEY: &str = "vocabulary_list";

/// The on-device fallback store.
///
/// The collection lives as one JSON array under [`STORAGE_KEY`]. Every
/// mutation loads it, changes it and saves it back while holding `lock`, so
/// two operations in the same process never interleave.
pub struct LocalStore<B: BlobStorage> {
    pub(crate) blobs: B,
    lock: Mutex<()>,
}

pub type InMemoryStore = LocalStore<MemBlobStorage>;
pub type FileStore = LocalStore<FsBlobStorage>;

impl<B: BlobStorage> LocalStore<B> {
    pub fn with_blobs(blobs: B) -> Self {
        Self {
            blobs,
            lock: Mutex::new(()),
        }
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    fn load(&self) -> Result<Vec<Word>> {
        match self.blobs.get(STORAGE_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn save(&self, words: &[Word]) -> Result<()> {
        let raw = serde_json::to_string_pretty(words)?;
        self.blobs.set(STORAGE_KEY, &raw)
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut Vec<Word>) -> Result<T>) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VocabError::Store("local store lock poisoned".to_string()))?;
        let mut words = self.load()?;
        let out = op(&mut words)?;
        self.save(&words)?;
        Ok(out)
    }

    pub fn list_words(&self) -> Result<Vec<Word>> {
        self.load()
    }

    pub fn add_word(&self, new: &NewWord) -> Result<Word> {
        let word = Word::new_local(new);
        self.mutate(|words| {
            words.insert(0, word.clone());
            Ok(word)
        })
    }

    pub fn update_word(&self, id: &WordId, patch: &WordPatch) -> Result<Word> {
        self.mutate(|words| {
            let word = find_mut(words, id)?;
            patch.apply(word);
            Ok(word.clone())
        })
    }

    pub fn remove_word(&self, id: &WordId) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| VocabError::Store("local store lock poisoned".to_string()))?;
        let mut words = self.load()?;
        let before = words.len();
        words.retain(|w| &w.id != id);
        if words.len() != before {
            self.save(&words)?;
        }
        Ok(())
    }

    pub fn toggle_word(&self, id: &WordId) -> Result<Word> {
        self.mutate(|words| {
            let word = find_mut(words, id)?;
            word.is_favorite = !word.is_favorite;
            word.updated_at = next_stamp(word.updated_at);
            Ok(word.clone())
        })
    }
}

fn find_mut<'a>(words: &'a mut [Word], id: &WordId) -> Result<&'a mut Word> {
    words
        .iter_mut()
        .find(|w| &w.id == id)
        .ok_or_else(|| VocabError::NotFound(id.clone()))
}

#[async_trait]
impl<B: BlobStorage> WordBackend for LocalStore<B> {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn list(&self) -> Result<Vec<Word>> {
        self.list_words()
    }

    async fn add(&self, new: &NewWord) -> Result<Word> {
        self.add_word(new)
    }

    async fn update(&self, id: &WordId, patch: &WordPatch) -> Result<Word> {
        self.update_word(id, patch)
    }

    async fn remove(&self, id: &WordId) -> Result<()> {
        self.remove_word(id)
    }

    async fn toggle_favorite(&self, id: &WordId) -> Result<Word> {
        self.toggle_word(id)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        LocalStore::with_blobs(MemBlobStorage::new())
    }
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        LocalStore::with_blobs(FsBlobStorage::new(data_dir))
    }

    pub fn data_file(&self) -> PathBuf {
        self.blobs.path_for(STORAGE_KEY)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_words(self, count: usize) -> Self {
            for i in 0..count {
                let new = NewWord::new(format!("word {}", i + 1), format!("meaning {}", i + 1));
                self.store.add_word(&new).unwrap();
            }
            self
        }

        pub fn with_word(self, original: &str, translation: &str) -> Self {
            self.store
                .add_word(&NewWord::new(original, translation))
                .unwrap();
            self
        }

        pub fn with_favorite(self, original: &str, translation: &str) -> Self {
            let word = self
                .store
                .add_word(&NewWord::new(original, translation))
                .unwrap();
            self.store.toggle_word(&word.id).unwrap();
            self
        }

        pub fn build(self) -> InMemoryStore {
            self.store
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = InMemoryStore::new();
        assert!(store.list_words().unwrap().is_empty());
    }

    #[test]
    fn test_add_assigns_local_id_and_timestamps() {
        let store = InMemoryStore::new();
        let word = store.add_word(&NewWord::new("本", "book")).unwrap();
        assert!(word.id.is_local());
        assert_eq!(word.created_at, word.updated_at);
        assert!(!word.is_favorite);
        assert_eq!(store.list_words().unwrap(), vec![word]);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let store = StoreFixture::new().with_words(2).build();
        let err = store
            .update_word(&WordId::from("missing"), &WordPatch::new().translation("x"))
            .unwrap_err();
        assert!(matches!(err, VocabError::NotFound(_)));
    }

    #[test]
    fn test_toggle_is_an_involution_with_increasing_stamps() {
        let store = InMemoryStore::new();
        let word = store.add_word(&NewWord::new("猫", "cat")).unwrap();

        let once = store.toggle_word(&word.id).unwrap();
        assert!(once.is_favorite);
        assert!(once.updated_at > word.updated_at);

        let twice = store.toggle_word(&word.id).unwrap();
        assert!(!twice.is_favorite);
        assert!(twice.updated_at > once.updated_at);
        assert_eq!(twice.created_at, word.created_at);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = StoreFixture::new().with_word("犬", "dog").build();
        let id = store.list_words().unwrap()[0].id.clone();
        store.remove_word(&id).unwrap();
        store.remove_word(&id).unwrap();
        assert!(store.list_words().unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_collection_untouched() {
        let store = StoreFixture::new().with_words(1).build();
        store.blobs().set_simulate_write_error(true);
        assert!(store.add_word(&NewWord::new("x", "y")).is_err());
        store.blobs().set_simulate_write_error(false);
        assert_eq!(store.list_words().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_blob_surfaces_serialization_error() {
        let store = InMemoryStore::new();
        store.blobs().put_raw(STORAGE_KEY, "{not json");
        assert!(matches!(
            store.list_words(),
            Err(VocabError::Serialization(_))
        ));
    }

    #[test]
    fn test_reads_legacy_blob() {
        let store = InMemoryStore::new();
        store.blobs().put_raw(
            STORAGE_KEY,
            r#"[{"id": 1699999999999.25, "japanese": "水", "reading": "みず",
                 "chinese": "水", "example": "", "createdAt": "2023-11-14T22:13:19Z"}]"#,
        );
        let words = store.list_words().unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].original_text, "水");
        assert_eq!(words[0].pronunciation.as_deref(), Some("みず"));

        // Writing back upgrades the record to the canonical shape.
        store.toggle_word(&words[0].id).unwrap();
        let raw = store.blobs().get(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("original_text"));
        assert!(!raw.contains("japanese"));
    }

    #[test]
    fn test_fixtures_coverage() {
        let store = StoreFixture::default()
            .with_words(2)
            .with_favorite("本", "book")
            .build();
        let words = store.list_words().unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words.iter().filter(|w| w.is_favorite).count(), 1);
    }
}
