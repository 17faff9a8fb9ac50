//! # Ordering: Favorites First, Then Whatever You Asked For
//!
//! Pure functions that turn a bag of [`Word`]s into the list a user sees.
//! They never touch a backend and never mutate their input, so the same
//! code orders remote rows, local records and test fixtures.
//!
//! ## The One Rule
//!
//! Favorites always come first. Whatever [`SortKey`] is requested, the
//! collection is partitioned by `is_favorite` before the key's comparator
//! runs inside each partition. Search results go through the same sort, so
//! a filtered list can't bypass it either.
//!
//! ## Comparison
//!
//! Text keys are compared with the Unicode Collation Algorithm (root
//! collation, via `feruca`), so `éclair` sorts between `apple` and `zebra`,
//! case and width variants sort together, and kana come before kanji.
//! Ties keep input order (the sort is stable).
//!
//! Search folds instead of collating: NFKC-normalized, then lowercased, so
//! `"BOOK"` finds `"a book"` and a full-width `"ｂｏｏｋ"` finds it too.

use crate::model::Word;
use feruca::Collator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    UpdatedDesc,
    UpdatedAsc,
    OriginalAsc,
    OriginalDesc,
    TranslationAsc,
    TranslationDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::UpdatedDesc,
        SortKey::UpdatedAsc,
        SortKey::OriginalAsc,
        SortKey::OriginalDesc,
        SortKey::TranslationAsc,
        SortKey::TranslationDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::UpdatedDesc => "updated_desc",
            SortKey::UpdatedAsc => "updated_asc",
            SortKey::OriginalAsc => "original_asc",
            SortKey::OriginalDesc => "original_desc",
            SortKey::TranslationAsc => "translation_asc",
            SortKey::TranslationDesc => "translation_desc",
        }
    }

    fn compare(&self, collator: &mut Collator, a: &Word, b: &Word) -> Ordering {
        match self {
            SortKey::UpdatedDesc => b.sort_time().cmp(&a.sort_time()),
            SortKey::UpdatedAsc => a.sort_time().cmp(&b.sort_time()),
            SortKey::OriginalAsc => collator.collate(&*a.original_text, &*b.original_text),
            SortKey::OriginalDesc => collator.collate(&*b.original_text, &*a.original_text),
            SortKey::TranslationAsc => collator.collate(&*a.translation, &*b.translation),
            SortKey::TranslationDesc => collator.collate(&*b.translation, &*a.translation),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "updated_desc" | "updated" | "recent" => Ok(SortKey::UpdatedDesc),
            "updated_asc" | "oldest" => Ok(SortKey::UpdatedAsc),
            "original_asc" | "reading_asc" | "original" => Ok(SortKey::OriginalAsc),
            "original_desc" | "reading_desc" => Ok(SortKey::OriginalDesc),
            "translation_asc" | "chinese_asc" | "translation" => Ok(SortKey::TranslationAsc),
            "translation_desc" | "chinese_desc" => Ok(SortKey::TranslationDesc),
            other => Err(format!(
                "unknown sort key '{}' (expected one of: {})",
                other,
                SortKey::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Folded form used for search matching.
pub fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Favorites first, then `key`. Stable.
pub fn sort_words(words: &[Word], key: SortKey) -> Vec<Word> {
    let mut collator = Collator::default();
    let mut sorted = words.to_vec();
    sorted.sort_by(|a, b| {
        b.is_favorite
            .cmp(&a.is_favorite)
            .then_with(|| key.compare(&mut collator, a, b))
    });
    sorted
}

/// Case-insensitive substring filter over the four text fields.
/// A blank query returns the input as is.
pub fn filter_words(words: &[Word], query: &str) -> Vec<Word> {
    let needle = fold(query.trim());
    if needle.is_empty() {
        return words.to_vec();
    }
    words
        .iter()
        .filter(|word| matches_query(word, &needle))
        .cloned()
        .collect()
}

pub fn search_words(words: &[Word], query: &str, key: SortKey) -> Vec<Word> {
    sort_words(&filter_words(words, query), key)
}

fn matches_query(word: &Word, needle: &str) -> bool {
    [
        Some(word.original_text.as_str()),
        word.pronunciation.as_deref(),
        Some(word.translation.as_str()),
        word.example.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| fold(field).contains(needle))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteGroups {
    pub favorites: Vec<Word>,
    pub others: Vec<Word>,
}

impl FavoriteGroups {
    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    pub fn other_count(&self) -> usize {
        self.others.len()
    }
}

/// Split into favorites and the rest, keeping input order in each.
pub fn group_by_favorite(words: &[Word]) -> FavoriteGroups {
    let (favorites, others) = words.iter().cloned().partition(|w| w.is_favorite);
    FavoriteGroups { favorites, others }
}

/// What the user is currently looking at: a sort key and a search box.
///
/// The displayed list is always re-derived from the full collection;
/// change notifications never patch a previous result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    pub sort: SortKey,
    pub query: String,
}

impl ListView {
    pub fn new(sort: SortKey) -> Self {
        Self {
            sort,
            query: String::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn derive(&self, words: &[Word]) -> Vec<Word> {
        search_words(words, &self.query, self.sort)
    }
}
