//! Hosted backend speaking the PostgREST dialect.
//!
//! Table rows live at `/rest/v1/words`; the signed-in user is read from
//! `/auth/v1/user`. Ownership is enforced server-side by row-level security,
//! so update/remove/toggle only ever see the caller's rows. Every mutation
//! checks for a signed-in user first and fails with `AuthRequired` without one.
//!
//! There is no realtime subscription to the service; change notifications
//! are published in-process by the facade (`StoreEvent`).

use super::{BackendKind, WordBackend};
use crate::config::RemoteSettings;
use crate::error::{Result, VocabError};
use crate::model::{NewWord, Word, WordId, WordPatch};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

pub const WORDS_TABLE: &str = "words";

pub struct RestBackend {
    client: reqwest::Client,
    base: String,
    key: String,
    access_token: Option<String>,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    user_id: &'a str,
    original_text: &'a str,
    pronunciation: Option<&'a str>,
    translation: &'a str,
    example: Option<&'a str>,
    is_favorite: bool,
}

#[derive(Deserialize)]
struct Principal {
    id: String,
}

#[derive(Deserialize)]
struct FavoriteFlag {
    is_favorite: Option<bool>,
}

impl RestBackend {
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base: settings.url.as_str().trim_end_matches('/').to_string(),
            key: settings.key.clone(),
            access_token: settings.access_token.clone(),
        })
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base, WORDS_TABLE)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1/user", self.base)
    }

    /// Without a user token the anon key doubles as bearer, as the service expects.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.key);
        self.client
            .request(method, url)
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// The signed-in user's id, or `None` when nobody is signed in.
    #[instrument(skip(self))]
    pub async fn principal(&self) -> Result<Option<String>> {
        if self.access_token.is_none() {
            return Ok(None);
        }
        let response = self.request(Method::GET, &self.auth_url()).send().await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            debug!("access token rejected, treating as signed out");
            return Ok(None);
        }
        let principal: Principal = check(response).await?.json().await?;
        Ok(Some(principal.id))
    }

    async fn require_principal(&self) -> Result<String> {
        self.principal().await?.ok_or(VocabError::AuthRequired)
    }

    async fn patch_row(&self, id: &WordId, body: &Map<String, Value>) -> Result<Word> {
        let response = self
            .request(Method::PATCH, &self.table_url())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let rows: Vec<Word> = check(response).await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| VocabError::NotFound(id.clone()))
    }
}

/// PATCH body for `patch`: provided fields only, blank optionals as null,
/// always with a fresh `updated_at`.
pub fn patch_body(patch: &WordPatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(text) = &patch.original_text {
        body.insert("original_text".into(), Value::from(text.as_str()));
    }
    if let Some(pronunciation) = &patch.pronunciation {
        body.insert("pronunciation".into(), nullable(pronunciation));
    }
    if let Some(text) = &patch.translation {
        body.insert("translation".into(), Value::from(text.as_str()));
    }
    if let Some(example) = &patch.example {
        body.insert("example".into(), nullable(example));
    }
    if let Some(favorite) = patch.is_favorite {
        body.insert("is_favorite".into(), Value::from(favorite));
    }
    body.insert("updated_at".into(), Value::from(Utc::now().to_rfc3339()));
    body
}

fn nullable(text: &str) -> Value {
    if text.trim().is_empty() {
        Value::Null
    } else {
        Value::from(text)
    }
}

/// Map a non-success status to `Remote`, keeping the server's message.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(VocabError::Remote {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// PostgREST errors are JSON with a `message`; anything else is passed through.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl WordBackend for RestBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Word>> {
        let Some(user) = self.principal().await? else {
            debug!("no signed-in user, remote list is empty");
            return Ok(Vec::new());
        };
        let response = self
            .request(Method::GET, &self.table_url())
            .query(&[("select", "*".to_string()), ("user_id", format!("eq.{}", user))])
            .send()
            .await?;
        let words: Vec<Word> = check(response).await?.json().await?;
        debug!(count = words.len(), "fetched remote words");
        Ok(words)
    }

    #[instrument(skip(self, new))]
    async fn add(&self, new: &NewWord) -> Result<Word> {
        let user = self.require_principal().await?;
        let row = InsertRow {
            user_id: &user,
            original_text: &new.original_text,
            pronunciation: new.pronunciation.as_deref(),
            translation: &new.translation,
            example: new.example.as_deref(),
            is_favorite: false,
        };
        let response = self
            .request(Method::POST, &self.table_url())
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;
        let rows: Vec<Word> = check(response).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| VocabError::Remote {
            status: 200,
            message: "insert returned no row".to_string(),
        })
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &WordId, patch: &WordPatch) -> Result<Word> {
        self.require_principal().await?;
        self.patch_row(id, &patch_body(patch)).await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: &WordId) -> Result<()> {
        // Signed out, row-level security matches nothing and the delete "succeeds".
        self.require_principal().await?;
        let response = self
            .request(Method::DELETE, &self.table_url())
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn toggle_favorite(&self, id: &WordId) -> Result<Word> {
        self.require_principal().await?;
        let response = self
            .request(Method::GET, &self.table_url())
            .query(&[
                ("id", format!("eq.{}", id)),
                ("select", "is_favorite".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<FavoriteFlag> = check(response).await?.json().await?;
        let current = rows
            .first()
            .ok_or_else(|| VocabError::NotFound(id.clone()))?
            .is_favorite
            .unwrap_or(false);

        let patch = WordPatch::new().favorite(!current);
        self.patch_row(id, &patch_body(&patch)).await
    }

    async fn health(&self) -> Result<()> {
        let response = self
            .request(Method::GET, &self.table_url())
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
