use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use vocabapp::model::{NewWord, Word, WordId};
use vocabapp::ordering::{filter_words, search_words, sort_words, SortKey};

fn arb_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

fn arb_word() -> impl Strategy<Value = Word> {
    (
        "[a-zA-Z本猫犬ｂ]{1,6}",
        "[a-zA-Z学習]{1,6}",
        prop::option::of("[a-z]{0,4}"),
        prop::option::of("[a-z ]{0,8}"),
        any::<bool>(),
        0i64..1_000_000,
    )
        .prop_map(|(original, translation, pronunciation, example, fav, secs)| {
            let mut word = Word::new_local(&NewWord {
                original_text: original,
                pronunciation,
                translation,
                example,
            });
            word.is_favorite = fav;
            word.created_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
            word.updated_at = word.created_at + chrono::TimeDelta::seconds(secs);
            word
        })
}

fn arb_words() -> impl Strategy<Value = Vec<Word>> {
    prop::collection::vec(arb_word(), 0..30).prop_map(|mut words| {
        for (i, word) in words.iter_mut().enumerate() {
            word.id = WordId::from(format!("w{}", i));
        }
        words
    })
}

proptest! {
    #[test]
    fn favorites_always_precede_others(words in arb_words(), key in arb_key()) {
        let sorted = sort_words(&words, key);
        let first_other = sorted.iter().position(|w| !w.is_favorite).unwrap_or(sorted.len());
        prop_assert!(sorted[first_other..].iter().all(|w| !w.is_favorite));
    }

    #[test]
    fn sorting_is_idempotent(words in arb_words(), key in arb_key()) {
        let once = sort_words(&words, key);
        let twice = sort_words(&once, key);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sorting_is_a_permutation(words in arb_words(), key in arb_key()) {
        let sorted = sort_words(&words, key);
        let mut before: Vec<_> = words.iter().map(|w| w.id.clone()).collect();
        let mut after: Vec<_> = sorted.iter().map(|w| w.id.clone()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn empty_search_is_identity(words in arb_words(), key in arb_key()) {
        prop_assert_eq!(filter_words(&words, ""), words.clone());
        prop_assert_eq!(search_words(&words, "", key), sort_words(&words, key));
    }

    #[test]
    fn search_finds_translation_matches(words in arb_words(), key in arb_key(), idx in any::<prop::sample::Index>()) {
        prop_assume!(!words.is_empty());
        let target = &words[idx.index(words.len())];
        let query = target.translation.to_uppercase();
        let found = search_words(&words, &query, key);
        prop_assert!(found.iter().any(|w| w.id == target.id));
    }

    #[test]
    fn search_results_are_favorites_first(words in arb_words(), key in arb_key(), query in "[a-z]{0,2}") {
        let found = search_words(&words, &query, key);
        let first_other = found.iter().position(|w| !w.is_favorite).unwrap_or(found.len());
        prop_assert!(found[first_other..].iter().all(|w| !w.is_favorite));
    }
}
