//! Styles for the vocab CLI.
//!
//! Code refers to styles by what they mean (`favorite`, `time`), never by
//! color. `console` drops the escape codes on its own when stdout is not a
//! terminal or `NO_COLOR` is set.

use console::Style;
use std::sync::OnceLock;

pub struct Styles {
    pub id: Style,
    pub original: Style,
    pub pronunciation: Style,
    pub translation: Style,
    pub example: Style,
    pub favorite: Style,
    pub time: Style,
    pub muted: Style,
    pub heading: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
}

pub fn styles() -> &'static Styles {
    static STYLES: OnceLock<Styles> = OnceLock::new();
    STYLES.get_or_init(|| {
        let muted = Style::new().color256(245);
        Styles {
            id: Style::new().color256(178),
            original: Style::new().bold(),
            pronunciation: Style::new().cyan(),
            translation: Style::new(),
            example: muted.clone().italic(),
            favorite: Style::new().yellow().bold(),
            time: muted.clone().italic(),
            muted,
            heading: Style::new().bold().underlined(),
            success: Style::new().green(),
            warning: Style::new().yellow().bold(),
            error: Style::new().red().bold(),
        }
    })
}
