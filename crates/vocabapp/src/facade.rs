//! # Word Store Facade
//!
//! [`WordStore`] is the one API callers use: `list`, `add`, `update`,
//! `remove`, `toggle_favorite`, plus a few conveniences built on them. It
//! hides which backend answered, but never hides *that* something happened.
//!
//! ## Routing
//!
//! ```text
//!                 ┌─────────────┐
//!   operation ──▶ │  validate   │──✗──▶ Validation (no backend touched)
//!                 └──────┬──────┘
//!                        ▼
//!              remote configured?
//!               │no            │yes
//!               ▼              ▼
//!            local          remote ──ok──▶ Route::Remote
//!         Route::Local         │ any error
//!                              ▼
//!                         local retry ──ok──▶ Route::Fallback
//!                              │
//!                   ┌──────────┴───────────┐
//!            backend failure         domain error
//!                   ▼                      ▼
//!          BackendUnavailable       surfaced as-is
//!                                (NotFound, AuthRequired)
//! ```
//!
//! Any remote error triggers the local retry, including `NotFound` and
//! `AuthRequired`: a word created locally during an outage is unknown to
//! the remote but still editable, and a signed-out user can keep adding
//! words. Only when the local retry also hits an infrastructure failure
//! ([`VocabError::is_backend_failure`]) does the caller get
//! `BackendUnavailable`.
//!
//! ## Making Fallback Observable
//!
//! Every result comes back as [`Served`], carrying the [`Route`] that
//! produced it and any [`Notice`]s. A fallback is also logged at `warn` and
//! broadcast as [`StoreEvent::FellBack`].
//!
//! A mutation that lands locally while a remote is configured leaves the
//! two stores different. [`WordStore::has_diverged`] reports that. Nothing
//! reconciles them afterwards; that is a known gap, not an oversight.
//!
//! ## Change Notifications
//!
//! [`WordStore::subscribe`] returns a receiver of [`StoreEvent`]s. Each
//! successful mutation publishes an insert, update or delete. Consumers
//! should re-derive their view from a fresh `list()` (see
//! [`crate::ordering::ListView`]); events are hints, not patches.

use crate::context::StorageContext;
use crate::error::{Result, VocabError};
use crate::model::{NewWord, Word, WordId, WordPatch};
use crate::ordering::{search_words, sort_words, SortKey};
use crate::samples::sample_words;
use crate::stats::{compute_stats, WordStats};
use crate::store::WordBackend;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// The remote store answered.
    Remote,
    /// No remote is configured.
    Local,
    /// The remote failed and the local store answered instead.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ConfigError(String),
    FellBack {
        operation: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::ConfigError(msg) => write!(f, "remote store not configured: {}", msg),
            Notice::FellBack { operation, reason } => {
                write!(f, "{} used the local store (remote failed: {})", operation, reason)
            }
        }
    }
}

/// A value plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Served<T> {
    pub value: T,
    pub route: Route,
    pub notices: Vec<Notice>,
}

impl<T> Served<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Served<U> {
        Served {
            value: f(self.value),
            route: self.route,
            notices: self.notices,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn fell_back(&self) -> bool {
        self.route == Route::Fallback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub id: WordId,
    /// The word after the change. `None` for deletes.
    pub word: Option<Word>,
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Changed(ChangeEvent),
    FellBack {
        operation: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum BackendHealth {
    Ok,
    Failed(String),
}

impl BackendHealth {
    fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => BackendHealth::Ok,
            Err(err) => BackendHealth::Failed(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, BackendHealth::Ok)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// `None` when no remote is configured.
    pub remote: Option<BackendHealth>,
    pub local: BackendHealth,
    pub config_error: Option<String>,
    pub diverged: bool,
}

pub struct WordStore {
    ctx: StorageContext,
    events: broadcast::Sender<StoreEvent>,
    diverged: AtomicBool,
}

impl WordStore {
    pub fn new(ctx: StorageContext) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            ctx,
            events,
            diverged: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &StorageContext {
        &self.ctx
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// True once a mutation has been applied to the local store while a
    /// remote was configured.
    pub fn has_diverged(&self) -> bool {
        self.diverged.load(Ordering::SeqCst)
    }

    pub async fn list(&self) -> Result<Served<Vec<Word>>> {
        self.route("list", false, |b| async move { b.list().await })
            .await
    }

    pub async fn add(&self, new: NewWord) -> Result<Served<Word>> {
        let valid = new.validated()?;
        let new = &valid;
        let served = self
            .route("add", true, |b| async move { b.add(new).await })
            .await?;
        self.publish_change(ChangeKind::Insert, &served);
        Ok(served)
    }

    pub async fn update(&self, id: &WordId, patch: WordPatch) -> Result<Served<Word>> {
        let valid = patch.validated()?;
        let patch = &valid;
        let served = self
            .route("update", true, |b| async move { b.update(id, patch).await })
            .await?;
        self.publish_change(ChangeKind::Update, &served);
        Ok(served)
    }

    pub async fn remove(&self, id: &WordId) -> Result<Served<()>> {
        let served = self
            .route("remove", true, |b| async move { b.remove(id).await })
            .await?;
        self.emit(StoreEvent::Changed(ChangeEvent {
            kind: ChangeKind::Delete,
            id: id.clone(),
            word: None,
            route: served.route,
        }));
        Ok(served)
    }

    pub async fn toggle_favorite(&self, id: &WordId) -> Result<Served<Word>> {
        let served = self
            .route("toggle_favorite", true, |b| async move {
                b.toggle_favorite(id).await
            })
            .await?;
        self.publish_change(ChangeKind::Update, &served);
        Ok(served)
    }

    pub async fn sorted(&self, key: SortKey) -> Result<Served<Vec<Word>>> {
        Ok(self.list().await?.map(|words| sort_words(&words, key)))
    }

    pub async fn search(&self, query: &str, key: SortKey) -> Result<Served<Vec<Word>>> {
        Ok(self
            .list()
            .await?
            .map(|words| search_words(&words, query, key)))
    }

    pub async fn stats(&self, now: DateTime<Utc>, offset: FixedOffset) -> Result<Served<WordStats>> {
        Ok(self
            .list()
            .await?
            .map(|words| compute_stats(&words, now, offset)))
    }

    /// Add the sample vocabulary, but only into an empty store.
    pub async fn seed_samples(&self) -> Result<Served<Vec<Word>>> {
        let existing = self.list().await?;
        if !existing.value.is_empty() {
            debug!(count = existing.value.len(), "store not empty, skipping samples");
            return Ok(existing.map(|_| Vec::new()));
        }

        let mut seeded = Served {
            value: Vec::new(),
            route: existing.route,
            notices: existing.notices,
        };
        for sample in sample_words() {
            let served = self.add(sample).await?;
            seeded.route = served.route;
            seeded.notices.extend(served.notices);
            seeded.value.push(served.value);
        }
        info!(count = seeded.value.len(), "added sample words");
        Ok(seeded)
    }

    /// Probe each backend directly. Does not fall back.
    pub async fn health(&self) -> HealthReport {
        let remote = match self.ctx.remote() {
            Some(remote) => Some(BackendHealth::from_result(remote.health().await)),
            None => None,
        };
        let local = self.ctx.local();
        let local = BackendHealth::from_result(match local.health().await {
            Ok(()) => local.list().await.map(|_| ()),
            Err(err) => Err(err),
        });
        HealthReport {
            remote,
            local,
            config_error: self.ctx.take_config_error(),
            diverged: self.has_diverged(),
        }
    }

    /// Run `call` on the remote if there is one, falling back to the local
    /// backend on any remote error.
    async fn route<T, F, Fut>(&self, operation: &'static str, mutation: bool, call: F) -> Result<Served<T>>
    where
        F: Fn(Arc<dyn WordBackend>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(remote) = self.ctx.remote().cloned() else {
            let value = call(self.ctx.local().clone()).await?;
            return Ok(self.served(value, Route::Local, Vec::new()));
        };

        let remote_err = match call(remote).await {
            Ok(value) => return Ok(self.served(value, Route::Remote, Vec::new())),
            Err(err) => err,
        };

        let reason = remote_err.to_string();
        warn!(operation, error = %reason, "remote store failed, using local store");
        self.emit(StoreEvent::FellBack {
            operation,
            reason: reason.clone(),
        });

        match call(self.ctx.local().clone()).await {
            Ok(value) => {
                if mutation {
                    self.diverged.store(true, Ordering::SeqCst);
                }
                let notices = vec![Notice::FellBack { operation, reason }];
                Ok(self.served(value, Route::Fallback, notices))
            }
            Err(local_err) if local_err.is_backend_failure() => {
                Err(VocabError::BackendUnavailable {
                    remote: reason,
                    local: local_err.to_string(),
                })
            }
            Err(local_err) => Err(local_err),
        }
    }

    /// Wrap a successful result, attaching the pending configuration error
    /// the first time anything succeeds.
    fn served<T>(&self, value: T, route: Route, mut notices: Vec<Notice>) -> Served<T> {
        if let Some(msg) = self.ctx.take_config_error() {
            warn!("remote store configuration error: {}", msg);
            notices.insert(0, Notice::ConfigError(msg));
        }
        Served {
            value,
            route,
            notices,
        }
    }

    fn publish_change(&self, kind: ChangeKind, served: &Served<Word>) {
        self.emit(StoreEvent::Changed(ChangeEvent {
            kind,
            id: served.value.id.clone(),
            word: Some(served.value.clone()),
            route: served.route,
        }));
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
