//! Fake backends for exercising the facade without a network.

use crate::error::{Result, VocabError};
use crate::model::{NewWord, Word, WordId, WordPatch};
use crate::store::local::InMemoryStore;
use crate::store::{BackendKind, WordBackend};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A backend whose every call fails with the same error.
pub struct FailingBackend {
    kind: BackendKind,
    make_error: fn() -> VocabError,
    calls: AtomicUsize,
}

impl FailingBackend {
    pub fn new(kind: BackendKind, make_error: fn() -> VocabError) -> Self {
        Self {
            kind,
            make_error,
            calls: AtomicUsize::new(0),
        }
    }

    /// A remote that answers 503 to everything.
    pub fn unavailable_remote() -> Self {
        Self::new(BackendKind::Remote, || VocabError::Remote {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }

    /// A remote with nobody signed in.
    pub fn signed_out_remote() -> Self {
        Self::new(BackendKind::Remote, || VocabError::AuthRequired)
    }

    /// A local store whose disk is gone.
    pub fn broken_local() -> Self {
        Self::new(BackendKind::Local, || {
            VocabError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            ))
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }
}

#[async_trait]
impl WordBackend for FailingBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn list(&self) -> Result<Vec<Word>> {
        self.fail()
    }

    async fn add(&self, _new: &NewWord) -> Result<Word> {
        self.fail()
    }

    async fn update(&self, _id: &WordId, _patch: &WordPatch) -> Result<Word> {
        self.fail()
    }

    async fn remove(&self, _id: &WordId) -> Result<()> {
        self.fail()
    }

    async fn toggle_favorite(&self, _id: &WordId) -> Result<Word> {
        self.fail()
    }

    async fn health(&self) -> Result<()> {
        self.fail()
    }
}

/// A working in-memory backend that records which operations reached it.
/// Posing as `Remote` lets tests stand in for a healthy hosted store.
pub struct RecordingBackend {
    kind: BackendKind,
    inner: InMemoryStore,
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingBackend {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            inner: InMemoryStore::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn remote() -> Self {
        Self::new(BackendKind::Remote)
    }

    pub fn local() -> Self {
        Self::new(BackendKind::Local)
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, op: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(op);
        }
    }
}

#[async_trait]
impl WordBackend for RecordingBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn list(&self) -> Result<Vec<Word>> {
        self.record("list");
        self.inner.list_words()
    }

    async fn add(&self, new: &NewWord) -> Result<Word> {
        self.record("add");
        self.inner.add_word(new)
    }

    async fn update(&self, id: &WordId, patch: &WordPatch) -> Result<Word> {
        self.record("update");
        self.inner.update_word(id, patch)
    }

    async fn remove(&self, id: &WordId) -> Result<()> {
        self.record("remove");
        self.inner.remove_word(id)
    }

    async fn toggle_favorite(&self, id: &WordId) -> Result<Word> {
        self.record("toggle_favorite");
        self.inner.toggle_word(id)
    }
}

/// Shorthand for handing a fake to [`crate::context::StorageContext`].
pub fn shared<B: WordBackend + 'static>(backend: B) -> (Arc<B>, Arc<dyn WordBackend>) {
    let typed = Arc::new(backend);
    let erased: Arc<dyn WordBackend> = typed.clone();
    (typed, erased)
}
