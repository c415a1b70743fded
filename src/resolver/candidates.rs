//! Candidate key generation.
//!
//! For a given subject the sequence is deterministic and its order is part
//! of the contract: callers (and tests) rely on exactly which path is tried
//! first.

use std::fmt;

use crate::catalog::stages::{DANCE_IMAGES, FESTIVAL_IMAGES, HERITAGE_IMAGES};
use crate::catalog::StageCatalog;
use crate::types::ImageSubject;

/// Extensions tried for generated file names, in order.
pub const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// One guess at where an image lives: a symbolic stage and a path inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateKey {
    pub stage: String,
    pub path: String,
}

impl CandidateKey {
    pub fn new(stage: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stage, self.path)
    }
}

fn underscored(s: &str) -> String {
    s.replace(' ', "_")
}

fn with_extensions(stage: &str, stem: &str) -> Vec<CandidateKey> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| CandidateKey::new(stage, format!("{stem}{ext}")))
        .collect()
}

/// The ordered candidate keys for `subject`.
///
/// Incomplete subjects yield no candidates.
pub fn candidates(subject: &ImageSubject, stages: &StageCatalog) -> Vec<CandidateKey> {
    if !subject.is_complete() {
        return Vec::new();
    }

    match subject {
        ImageSubject::Festival { name } => with_extensions(FESTIVAL_IMAGES, &underscored(name)),
        ImageSubject::Dance { state, dance } => {
            let stem = format!(
                "{}_{}",
                underscored(&state.to_lowercase()),
                underscored(&dance.to_lowercase())
            );
            with_extensions(DANCE_IMAGES, &stem)
        }
        ImageSubject::Heritage { city, site } => {
            let stem = format!("{}_{}", city.to_uppercase(), underscored(site));
            with_extensions(HERITAGE_IMAGES, &stem)
        }
        ImageSubject::StoredFile { stage, file } => {
            let mut keys = Vec::with_capacity(2);
            if let Some(folder) = stages.legacy_folder(stage) {
                keys.push(CandidateKey::new(stage, format!("{folder}/{file}")));
            }
            keys.push(CandidateKey::new(stage, file));
            keys
        }
    }
}
