use super::styles::styles;
use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;
use vocabapp::facade::{BackendHealth, HealthReport, Notice, Route};
use vocabapp::stats::WordStats;
use vocabapp::Word;

const FAVORITE_MARK: &str = "★";

/// One row per word: id, favorite mark, original, pronunciation,
/// translation, age. Columns are padded by display width so CJK lines up.
pub fn render_list(words: &[Word], now: DateTime<Utc>) -> String {
    if words.is_empty() {
        return styles()
            .muted
            .apply_to("No words yet. Add one with: vocab add <word> <translation>")
            .to_string();
    }

    let id_width = column_width(words.iter().map(|w| w.id.as_str()));
    let original_width = column_width(words.iter().map(|w| w.original_text.as_str()));
    let pronunciation_width =
        column_width(words.iter().map(|w| w.pronunciation.as_deref().unwrap_or("")));

    let s = styles();
    let mut lines = Vec::with_capacity(words.len());
    for word in words {
        let mark = if word.is_favorite {
            s.favorite.apply_to(FAVORITE_MARK).to_string()
        } else {
            " ".to_string()
        };
        let pronunciation = word.pronunciation.as_deref().unwrap_or("");
        let line = format!(
            "{} {} {} {} {}  {}",
            s.id.apply_to(pad(word.id.as_str(), id_width)),
            mark,
            s.original.apply_to(pad(&word.original_text, original_width)),
            s.pronunciation
                .apply_to(pad(pronunciation, pronunciation_width)),
            s.translation.apply_to(&word.translation),
            s.time.apply_to(format_time_ago(word.updated_at, now)),
        );
        lines.push(line.trim_end().to_string());
        if let Some(example) = &word.example {
            lines.push(format!(
                "{}   {}",
                " ".repeat(id_width),
                s.example.apply_to(example)
            ));
        }
    }
    lines.join("\n")
}

/// A single word, as confirmed after add/edit/fav.
pub fn render_word(action: &str, word: &Word) -> String {
    let s = styles();
    let mut out = format!(
        "{} {} {}",
        s.success.apply_to(action),
        s.original.apply_to(&word.original_text),
        s.translation.apply_to(&word.translation),
    );
    if let Some(pronunciation) = &word.pronunciation {
        out.push_str(&format!(" ({})", s.pronunciation.apply_to(pronunciation)));
    }
    if word.is_favorite {
        out.push_str(&format!(" {}", s.favorite.apply_to(FAVORITE_MARK)));
    }
    out.push_str(&format!(" {}", s.muted.apply_to(format!("[{}]", word.id))));
    out
}

pub fn render_stats(stats: &WordStats) -> String {
    let s = styles();
    let mut lines = vec![
        s.heading.apply_to("Words").to_string(),
        format!("  total      {}", stats.total),
        format!("  favorites  {}", stats.favorites),
        format!("  today      {}", stats.today),
        format!("  this week  {}", stats.this_week),
        format!("  this month {}", stats.this_month),
    ];
    if !stats.monthly.is_empty() {
        lines.push(String::new());
        lines.push(s.heading.apply_to("By month").to_string());
        let widest = stats.monthly.iter().map(|m| m.count).max().unwrap_or(1).max(1);
        for month in &stats.monthly {
            let bar_len = (month.count * 30).div_ceil(widest);
            lines.push(format!(
                "  {}  {:>4}  {}",
                month.month,
                month.count,
                s.muted.apply_to("▇".repeat(bar_len))
            ));
        }
    }
    lines.join("\n")
}

pub fn render_health(report: &HealthReport) -> String {
    let s = styles();
    let show = |health: &BackendHealth| match health {
        BackendHealth::Ok => s.success.apply_to("ok".to_string()).to_string(),
        BackendHealth::Failed(err) => s.error.apply_to(format!("failed: {}", err)).to_string(),
    };

    let remote = match &report.remote {
        Some(health) => show(health),
        None => s.muted.apply_to("not configured".to_string()).to_string(),
    };
    let mut lines = vec![
        format!("remote  {}", remote),
        format!("local   {}", show(&report.local)),
    ];
    let diverged = if report.diverged {
        s.warning.apply_to("yes (local writes not on remote)".to_string())
    } else {
        s.muted.apply_to("no".to_string())
    };
    lines.push(format!("diverged {}", diverged));
    if let Some(err) = &report.config_error {
        lines.push(s.warning.apply_to(format!("config  {}", err)).to_string());
    }
    lines.join("\n")
}

pub fn render_notice(notice: &Notice) -> String {
    format!("{} {}", styles().warning.apply_to("warning:"), notice)
}

pub fn route_label(route: Route) -> &'static str {
    match route {
        Route::Remote => "remote",
        Route::Local => "local",
        Route::Fallback => "local (fallback)",
    }
}

pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now
        .signed_duration_since(timestamp)
        .to_std()
        .unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use vocabapp::stats::MonthCount;
    use vocabapp::{NewWord, WordId};

    fn plain(s: String) -> String {
        console::strip_ansi_codes(&s).to_string()
    }

    fn word(id: &str, original: &str, translation: &str, fav: bool) -> Word {
        let mut w = Word::new_local(&NewWord::new(original, translation));
        w.id = WordId::from(id);
        w.is_favorite = fav;
        w
    }

    #[test]
    fn test_render_empty_list() {
        let out = plain(render_list(&[], Utc::now()));
        assert!(out.contains("No words yet"));
    }

    #[test]
    fn test_render_list_aligns_wide_characters() {
        let now = Utc::now();
        let mut words = vec![word("1", "図書館", "library", true), word("22", "ab", "x", false)];
        for w in &mut words {
            w.updated_at = now;
        }
        let out = plain(render_list(&words, now));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1  ★ 図書館"));
        assert!(lines[1].starts_with("22   ab    "));
        let col = |line: &str, needle: &str| line[..line.find(needle).unwrap()].width();
        assert_eq!(col(lines[0], "library"), col(lines[1], "x "));
    }

    #[test]
    fn test_render_list_shows_examples() {
        let mut w = word("1", "本", "book", false);
        w.example = Some("本を読む".into());
        let out = plain(render_list(&[w], Utc::now()));
        assert!(out.lines().nth(1).unwrap().contains("本を読む"));
    }

    #[test]
    fn test_render_word() {
        let mut w = word("7", "猫", "cat", true);
        w.pronunciation = Some("ねこ".into());
        assert_eq!(
            plain(render_word("Added", &w)),
            "Added 猫 cat (ねこ) ★ [7]"
        );
    }

    #[test]
    fn test_render_stats() {
        let stats = WordStats {
            total: 3,
            favorites: 1,
            today: 1,
            this_week: 2,
            this_month: 3,
            monthly: vec![
                MonthCount { month: "2024-03".into(), count: 2 },
                MonthCount { month: "2024-02".into(), count: 1 },
            ],
        };
        let out = plain(render_stats(&stats));
        assert!(out.contains("total      3"));
        assert!(out.contains("2024-03     2"));
        assert!(out.contains("By month"));
    }

    #[test]
    fn test_render_health() {
        let report = HealthReport {
            remote: Some(BackendHealth::Failed("503".into())),
            local: BackendHealth::Ok,
            config_error: None,
            diverged: false,
        };
        let out = plain(render_health(&report));
        assert!(out.contains("remote  failed: 503"));
        assert!(out.contains("local   ok"));
        assert!(out.contains("diverged no"));

        let report = HealthReport {
            remote: Some(BackendHealth::Ok),
            local: BackendHealth::Ok,
            config_error: None,
            diverged: true,
        };
        assert!(plain(render_health(&report)).contains("diverged yes"));

        let report = HealthReport {
            remote: None,
            local: BackendHealth::Ok,
            config_error: Some("remote_key is set but remote_url is missing".into()),
            diverged: false,
        };
        let out = plain(render_health(&report));
        assert!(out.contains("not configured"));
        assert!(out.contains("config  remote_key"));
    }

    #[test]
    fn test_format_time_ago() {
        let now = Utc::now();
        assert_eq!(
            format_time_ago(now - TimeDelta::minutes(3), now),
            "3 minutes ago"
        );
        assert_eq!(format_time_ago(now - TimeDelta::days(2), now), "2 days ago");
    }

    #[test]
    fn test_route_labels() {
        assert_eq!(route_label(Route::Fallback), "local (fallback)");
    }
}
