//! Learning statistics: how many words, and how recently they were added.
//!
//! Day, week and month boundaries are taken in the caller's local offset, so
//! "today" means today where the user is, not in UTC.

use crate::model::Word;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of monthly buckets reported.
pub const MONTHS_SHOWN: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordStats {
    pub total: usize,
    pub favorites: usize,
    pub today: usize,
    pub this_week: usize,
    pub this_month: usize,
    /// Newest month first.
    pub monthly: Vec<MonthCount>,
}

pub fn compute_stats(words: &[Word], now: DateTime<Utc>, offset: FixedOffset) -> WordStats {
    let local_now = now.with_timezone(&offset);
    let today = local_now.date_naive();
    let midnight = start_of(today, offset, now);
    let week_ago = midnight - TimeDelta::days(7);
    let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .map(|first| start_of(first, offset, now))
        .unwrap_or(midnight);

    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    let mut stats = WordStats {
        total: words.len(),
        ..Default::default()
    };

    for word in words {
        let created = word.created_at;
        if word.is_favorite {
            stats.favorites += 1;
        }
        if created >= midnight {
            stats.today += 1;
        }
        if created >= week_ago {
            stats.this_week += 1;
        }
        if created >= month_start {
            stats.this_month += 1;
        }
        let key = created.with_timezone(&offset).format("%Y-%m").to_string();
        *months.entry(key).or_default() += 1;
    }

    stats.monthly = months
        .into_iter()
        .rev()
        .take(MONTHS_SHOWN)
        .map(|(month, count)| MonthCount { month, count })
        .collect();
    stats
}

fn start_of(day: NaiveDate, offset: FixedOffset, fallback: DateTime<Utc>) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0)
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewWord;

    fn created(at: &str) -> Word {
        let mut word = Word::new_local(&NewWord::new("x", "y"));
        word.created_at = DateTime::parse_from_rfc3339(at).unwrap().with_timezone(&Utc);
        word.updated_at = word.created_at;
        word
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_empty_collection() {
        let stats = compute_stats(&[], Utc::now(), utc());
        assert_eq!(stats, WordStats::default());
    }

    #[test]
    fn test_buckets() {
        let now = DateTime::parse_from_rfc3339("2024-03-20T15:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut words = vec![
            created("2024-03-20T01:00:00Z"), // today
            created("2024-03-15T12:00:00Z"), // this week
            created("2024-03-02T12:00:00Z"), // this month
            created("2024-02-10T12:00:00Z"),
            created("2023-12-31T12:00:00Z"),
        ];
        words[0].is_favorite = true;

        let stats = compute_stats(&words, now, utc());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.favorites, 1);
        assert_eq!(stats.today, 1);
        assert_eq!(stats.this_week, 2);
        assert_eq!(stats.this_month, 3);
        assert_eq!(
            stats.monthly,
            vec![
                MonthCount { month: "2024-03".into(), count: 3 },
                MonthCount { month: "2024-02".into(), count: 1 },
                MonthCount { month: "2023-12".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_today_follows_local_offset() {
        // 23:30 UTC on the 19th is already the 20th in UTC+9.
        let now = DateTime::parse_from_rfc3339("2024-03-20T03:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let words = vec![created("2024-03-19T23:30:00Z")];
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        assert_eq!(compute_stats(&words, now, tokyo).today, 1);
        assert_eq!(compute_stats(&words, now, utc()).today, 0);
        assert_eq!(compute_stats(&words, now, tokyo).monthly[0].month, "2024-03");
    }

    #[test]
    fn test_monthly_is_capped() {
        let now = Utc::now();
        let words: Vec<Word> = (1..=15)
            .map(|m| created(&format!("20{:02}-01-15T00:00:00Z", m + 9)))
            .collect();
        let stats = compute_stats(&words, now, utc());
        assert_eq!(stats.monthly.len(), MONTHS_SHOWN);
        assert_eq!(stats.monthly[0].month, "2024-01");
    }
}
