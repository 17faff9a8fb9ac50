//! # Domain Model: Words and Their Canonical Shape
//!
//! A [`Word`] is one vocabulary entry: the term being learned, an optional
//! pronunciation, its translation, an optional example sentence, a favorite
//! flag and two timestamps.
//!
//! ## One Shape, Normalized at the Boundary
//!
//! Records reach us from two places: the remote table and the local blob.
//! Both have history. Older local data was written by a Japanese-only version
//! of the app and used different field names; the remote store hands back
//! numeric ids and `user_id`. Rather than teaching the ordering engine about
//! every spelling, `Word`'s deserializer folds all of them into one canonical
//! shape:
//!
//! | Canonical | Also accepted |
//! |-----------|---------------|
//! | `original_text` | `japanese` |
//! | `pronunciation` | `reading` |
//! | `translation` | `chinese` |
//! | `created_at` | `createdAt` |
//! | `updated_at` | `updatedAt` |
//! | `owner` | `user_id` |
//!
//! Timestamp gaps are filled the same way every time: a missing
//! `updated_at` falls back to `created_at` (and vice versa), both missing
//! means the Unix epoch, and `updated_at` is never earlier than `created_at`.
//!
//! ## Input Types
//!
//! - [`NewWord`]: the four user-entered fields for `add`.
//! - [`WordPatch`]: a partial update; only provided fields change.
//!
//! Both are validated before any backend sees them: required fields are
//! trimmed and must be non-empty, blank optional fields become "absent".

use crate::error::{Result, VocabError};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque word identifier.
///
/// Remote ids are server sequence numbers rendered as decimal strings.
/// Local ids are `local-<millis>-<random>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new_local() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "local-{}-{}",
            Utc::now().timestamp_millis(),
            &random[..8]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with("local-")
    }

    /// Accepts the id encodings found in stored records: strings, integers
    /// and the float ids written by the very first local version.
    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().into())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    pub id: WordId,
    pub original_text: String,
    pub pronunciation: Option<String>,
    pub translation: String,
    pub example: Option<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Authenticated principal that owns the row. Local words have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Word {
    /// Build a local word from an already validated [`NewWord`].
    pub fn new_local(new: &NewWord) -> Self {
        let now = Utc::now();
        Self {
            id: WordId::new_local(),
            original_text: new.original_text.clone(),
            pronunciation: new.pronunciation.clone(),
            translation: new.translation.clone(),
            example: new.example.clone(),
            is_favorite: false,
            created_at: now,
            updated_at: now,
            owner: None,
        }
    }

    /// Time used by the "updated" sort keys.
    pub fn sort_time(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = WordRecord::deserialize(deserializer)?;
        let id = WordId::from_json(&record.id)
            .ok_or_else(|| serde::de::Error::custom("word record has no usable id"))?;

        let created = record.created_at.or(record.created_at_legacy);
        let updated = record.updated_at.or(record.updated_at_legacy);
        let created_at = created.or(updated).unwrap_or_default();
        let updated_at = updated.unwrap_or(created_at).max(created_at);

        Ok(Word {
            id,
            original_text: record
                .original_text
                .or(record.japanese)
                .unwrap_or_default(),
            pronunciation: non_blank(record.pronunciation.or(record.reading)),
            translation: record.translation.or(record.chinese).unwrap_or_default(),
            example: non_blank(record.example),
            is_favorite: record.is_favorite.unwrap_or(false),
            created_at,
            updated_at,
            owner: non_blank(record.owner.or(record.user_id)),
        })
    }
}

#[derive(Deserialize)]
struct WordRecord {
    id: serde_json::Value,
    #[serde(default)]
    original_text: Option<String>,
    #[serde(default)]
    japanese: Option<String>,
    #[serde(default)]
    pronunciation: Option<String>,
    #[serde(default)]
    reading: Option<String>,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    chinese: Option<String>,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "createdAt")]
    created_at_legacy: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt")]
    updated_at_legacy: Option<DateTime<Utc>>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

/// Fields submitted to create a word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWord {
    pub original_text: String,
    pub pronunciation: Option<String>,
    pub translation: String,
    pub example: Option<String>,
}

impl NewWord {
    pub fn new(original_text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            translation: translation.into(),
            ..Default::default()
        }
    }

    /// Positional constructor in form order: term, reading, meaning, example.
    pub fn from_fields(
        original_text: impl Into<String>,
        pronunciation: impl Into<String>,
        translation: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            pronunciation: Some(pronunciation.into()),
            translation: translation.into(),
            example: Some(example.into()),
        }
    }

    pub fn with_pronunciation(mut self, pronunciation: impl Into<String>) -> Self {
        self.pronunciation = Some(pronunciation.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Trimmed copy, or `Validation` if a required field is blank.
    pub fn validated(&self) -> Result<NewWord> {
        Ok(NewWord {
            original_text: required("original text", &self.original_text)?,
            pronunciation: non_blank(self.pronunciation.clone()),
            translation: required("translation", &self.translation)?,
            example: non_blank(self.example.clone()),
        })
    }
}

/// Partial update. `None` leaves a field alone; for the optional text
/// fields a blank value clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPatch {
    pub original_text: Option<String>,
    pub pronunciation: Option<String>,
    pub translation: Option<String>,
    pub example: Option<String>,
    pub is_favorite: Option<bool>,
}

impl WordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn original_text(mut self, value: impl Into<String>) -> Self {
        self.original_text = Some(value.into());
        self
    }

    pub fn pronunciation(mut self, value: impl Into<String>) -> Self {
        self.pronunciation = Some(value.into());
        self
    }

    pub fn translation(mut self, value: impl Into<String>) -> Self {
        self.translation = Some(value.into());
        self
    }

    pub fn example(mut self, value: impl Into<String>) -> Self {
        self.example = Some(value.into());
        self
    }

    pub fn favorite(mut self, value: bool) -> Self {
        self.is_favorite = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.original_text.is_none()
            && self.pronunciation.is_none()
            && self.translation.is_none()
            && self.example.is_none()
            && self.is_favorite.is_none()
    }

    /// Trimmed copy. A provided required field must not be blank.
    pub fn validated(&self) -> Result<WordPatch> {
        let original_text = match &self.original_text {
            Some(text) => Some(required("original text", text)?),
            None => None,
        };
        let translation = match &self.translation {
            Some(text) => Some(required("translation", text)?),
            None => None,
        };
        Ok(WordPatch {
            original_text,
            pronunciation: self.pronunciation.as_ref().map(|p| p.trim().to_string()),
            translation,
            example: self.example.as_ref().map(|e| e.trim().to_string()),
            is_favorite: self.is_favorite,
        })
    }

    /// Apply the provided fields and stamp `updated_at`.
    pub fn apply(&self, word: &mut Word) {
        if let Some(text) = &self.original_text {
            word.original_text = text.clone();
        }
        if let Some(pronunciation) = &self.pronunciation {
            word.pronunciation = non_blank(Some(pronunciation.clone()));
        }
        if let Some(text) = &self.translation {
            word.translation = text.clone();
        }
        if let Some(example) = &self.example {
            word.example = non_blank(Some(example.clone()));
        }
        if let Some(favorite) = self.is_favorite {
            word.is_favorite = favorite;
        }
        word.updated_at = next_stamp(word.updated_at);
    }
}

/// A fresh `updated_at` that is strictly later than `previous`, even when the
/// clock has not moved since the last mutation.
pub fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VocabError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
