//! Text shown on dance cards.

use super::DanceRecord;

/// The featured card shows its description only above this many characters.
pub const MAIN_DESCRIPTION_MIN: usize = 50;

/// Companion card titles are cut to this many characters.
pub const TITLE_LIMIT: usize = 15;

/// Companion card descriptions are cut to this many characters.
pub const DESCRIPTION_LIMIT: usize = 150;

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Description for the featured card, if long enough to show.
pub fn main_description(record: &DanceRecord) -> Option<&str> {
    record
        .description
        .as_deref()
        .filter(|d| d.chars().count() > MAIN_DESCRIPTION_MIN)
}

/// Title of a companion card.
pub fn card_title(record: &DanceRecord) -> String {
    truncate(&record.dance, TITLE_LIMIT)
}

/// Body of a companion card.
pub fn card_description(record: &DanceRecord) -> String {
    match &record.description {
        Some(d) => truncate(d, DESCRIPTION_LIMIT),
        None => format!("A traditional dance form from {}", record.state),
    }
}
