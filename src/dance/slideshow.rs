//! Classical dance slideshow.
//!
//! The current position is plain component state owned by whoever renders
//! the slideshow; nothing here is global.

use super::DanceRecord;

/// Dances eligible for the slideshow.
pub const CLASSICAL_DANCES: [&str; 7] = [
    "Bharatanatyam",
    "Kuchipudi",
    "Kathakali",
    "Odissi",
    "Manipuri",
    "Mohiniyattam",
    "Kathak",
];

/// Wrapping cursor over the classical dances that have an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slideshow {
    slides: Vec<DanceRecord>,
    index: usize,
}

impl Slideshow {
    /// Slides in dataset order, starting at the first.
    pub fn new(records: &[DanceRecord]) -> Self {
        Self::at(records, 0)
    }

    /// Resume at a stored position. Out-of-range positions restart at 0.
    pub fn at(records: &[DanceRecord], index: usize) -> Self {
        let slides: Vec<DanceRecord> = records
            .iter()
            .filter(|r| r.image.is_some() && CLASSICAL_DANCES.contains(&r.dance.as_str()))
            .cloned()
            .collect();
        let index = if index < slides.len() { index } else { 0 };
        Self { slides, index }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Position to store between renders.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&DanceRecord> {
        self.slides.get(self.index)
    }

    pub fn next(&mut self) -> Option<&DanceRecord> {
        if !self.slides.is_empty() {
            self.index = (self.index + 1) % self.slides.len();
        }
        self.current()
    }

    pub fn prev(&mut self) -> Option<&DanceRecord> {
        if !self.slides.is_empty() {
            self.index = (self.index + self.slides.len() - 1) % self.slides.len();
        }
        self.current()
    }
}
