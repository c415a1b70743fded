//! Dance forms view model.
//!
//! Turns the `dance` dataset into what the dance page renders: the state
//! picker, the featured dance of a state with its companions, card text,
//! and the classical-dance slideshow.

pub mod card;
pub mod slideshow;

pub use slideshow::Slideshow;

use crate::catalog::stages::DANCE_IMAGES;
use crate::types::{ImageSubject, Table};

/// First entry of the state picker; shows the slideshow instead of a state.
pub const HIGHLIGHTS: &str = "Highlights";

/// A description longer than this (in characters) makes a dance featurable.
pub const FEATURED_DESCRIPTION_MIN: usize = 100;

/// States whose featured dance is fixed, `(state, dance)`.
const FEATURED_OVERRIDES: &[(&str, &str)] = &[("Uttar Pradesh", "Kathak")];

/// One row of the dance dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanceRecord {
    pub state: String,
    pub dance: String,
    pub description: Option<String>,
    /// File name in the dance image stage.
    pub image: Option<String>,
}

impl DanceRecord {
    /// Parse every row with a state. A missing dance name becomes empty so
    /// the state still shows up in [`state_choices`].
    pub fn from_table(table: &Table) -> Vec<DanceRecord> {
        table
            .rows()
            .filter_map(|row| {
                Some(DanceRecord {
                    state: row.get("STATE")?.to_string(),
                    dance: row.get("FOLK_DANCE").unwrap_or_default().to_string(),
                    description: row.get("DESCRIPTION").map(str::to_string),
                    // Exported sheets wrote missing images as the text "None".
                    image: row
                        .get("DOWNLOADED_DANCE_IMAGES")
                        .filter(|f| !f.is_empty() && *f != "None")
                        .map(str::to_string),
                })
            })
            .collect()
    }

    /// Description length in characters, 0 when absent.
    pub fn description_len(&self) -> usize {
        self.description
            .as_deref()
            .map_or(0, |d| d.chars().count())
    }

    /// Subject to resolve this dance's stored image, if it has one.
    pub fn image_subject(&self) -> Option<ImageSubject> {
        self.image
            .as_ref()
            .map(|file| ImageSubject::stored_file(DANCE_IMAGES, file))
    }
}

/// Picker entries: [`HIGHLIGHTS`] then every state, sorted and unique.
pub fn state_choices(records: &[DanceRecord]) -> Vec<String> {
    let mut states: Vec<String> = records.iter().map(|r| r.state.clone()).collect();
    states.sort();
    states.dedup();

    let mut choices = Vec::with_capacity(states.len() + 1);
    choices.push(HIGHLIGHTS.to_string());
    choices.extend(states);
    choices
}

/// The headline dance of a state and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Featured<'a> {
    pub main: &'a DanceRecord,
    pub others: Vec<&'a DanceRecord>,
}

/// Pick the featured dance of `state`.
///
/// In order: the fixed override for the state if that dance is present,
/// else the first dance with a description over
/// [`FEATURED_DESCRIPTION_MIN`] characters, else the first dance. The
/// others keep their natural order. `None` if the state has no dances.
pub fn select_featured<'a>(records: &'a [DanceRecord], state: &str) -> Option<Featured<'a>> {
    let group: Vec<&DanceRecord> = records.iter().filter(|r| r.state == state).collect();
    if group.is_empty() {
        return None;
    }

    let overridden = FEATURED_OVERRIDES
        .iter()
        .find(|(s, _)| *s == state)
        .and_then(|(_, dance)| group.iter().position(|r| r.dance == *dance));

    let main_idx = overridden
        .or_else(|| {
            group
                .iter()
                .position(|r| r.description_len() > FEATURED_DESCRIPTION_MIN)
        })
        .unwrap_or(0);

    let main = group[main_idx];
    let others = group
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != main_idx)
        .map(|(_, r)| r)
        .collect();
    Some(Featured { main, others })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: &str, dance: &str, description: Option<&str>) -> DanceRecord {
        DanceRecord {
            state: state.into(),
            dance: dance.into(),
            description: description.map(str::to_string),
            image: None,
        }
    }

    #[test]
    fn parses_rows_and_none_images() {
        let table = Table::new(
            vec![
                "STATE".into(),
                "FOLK_DANCE".into(),
                "DESCRIPTION".into(),
                "DOWNLOADED_DANCE_IMAGES".into(),
            ],
            vec![
                vec![
                    Some("Assam".into()),
                    Some("Bihu".into()),
                    None,
                    Some("None".into()),
                ],
                vec![
                    Some("Kerala".into()),
                    Some("Kathakali".into()),
                    Some("Story play".into()),
                    Some("kathakali.jpg".into()),
                ],
                vec![None, Some("Orphan".into()), None, None],
            ],
        );
        let records = DanceRecord::from_table(&table);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].image, None);
        assert_eq!(records[1].image.as_deref(), Some("kathakali.jpg"));
        assert_eq!(
            records[1].image_subject(),
            Some(ImageSubject::stored_file("DANCE_IMAGES", "kathakali.jpg"))
        );
    }

    #[test]
    fn state_without_dance_name_is_kept() {
        let table = Table::new(
            vec!["STATE".into(), "FOLK_DANCE".into()],
            vec![
                vec![Some("Goa".into()), None],
                vec![Some("Assam".into()), Some("Bihu".into())],
            ],
        );
        let records = DanceRecord::from_table(&table);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].dance, "");
        assert_eq!(state_choices(&records), ["Highlights", "Assam", "Goa"]);
        assert_eq!(select_featured(&records, "Goa").unwrap().main.state, "Goa");
    }

    #[test]
    fn state_choices_start_with_highlights() {
        let records = vec![
            record("Kerala", "Kathakali", None),
            record("Assam", "Bihu", None),
            record("Kerala", "Mohiniyattam", None),
        ];
        assert_eq!(state_choices(&records), ["Highlights", "Assam", "Kerala"]);
    }

    #[test]
    fn long_description_wins_without_override() {
        let long = "x".repeat(101);
        let records = vec![
            record("Kerala", "Thiruvathirakali", Some("short")),
            record("Kerala", "Kathakali", Some(&long)),
            record("Kerala", "Theyyam", Some(&long)),
        ];
        let featured = select_featured(&records, "Kerala").unwrap();
        assert_eq!(featured.main.dance, "Kathakali");
        let others: Vec<_> = featured.others.iter().map(|r| r.dance.as_str()).collect();
        assert_eq!(others, ["Thiruvathirakali", "Theyyam"]);
    }

    #[test]
    fn threshold_is_strict() {
        let exactly = "x".repeat(100);
        let records = vec![
            record("Goa", "Fugdi", Some("short")),
            record("Goa", "Dekhni", Some(&exactly)),
        ];
        assert_eq!(select_featured(&records, "Goa").unwrap().main.dance, "Fugdi");
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        // 60 two-byte characters: 120 bytes but only 60 characters.
        let accented = "é".repeat(60);
        let records = vec![
            record("Goa", "Fugdi", None),
            record("Goa", "Dekhni", Some(&accented)),
        ];
        assert_eq!(select_featured(&records, "Goa").unwrap().main.dance, "Fugdi");
    }

    #[test]
    fn unknown_state_has_no_featured() {
        let records = vec![record("Goa", "Fugdi", None)];
        assert!(select_featured(&records, "Punjab").is_none());
    }
}
