//! Image resources and the logical subjects they are looked up for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a located image is handed to the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMode {
    /// A presigned URL the browser fetches directly.
    #[default]
    Url,
    /// The image bytes, downloaded through the presigned URL.
    Bytes,
}

/// A located image.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageResource {
    Url(String),
    Bytes(Vec<u8>),
}

impl ImageResource {
    /// The URL, if this resource is one.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            ImageResource::Url(url) => Some(url),
            ImageResource::Bytes(_) => None,
        }
    }
}

// Bytes are elided so image payloads don't flood logs.
impl fmt::Debug for ImageResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageResource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ImageResource::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
        }
    }
}

/// A logical entity an image is requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSubject {
    /// A festival, by display name.
    Festival { name: String },
    /// A dance form of a state.
    Dance { state: String, dance: String },
    /// A heritage site in a city.
    Heritage { city: String, site: String },
    /// A file name recorded in a dataset row, under a symbolic stage.
    StoredFile { stage: String, file: String },
}

impl ImageSubject {
    pub fn festival(name: impl Into<String>) -> Self {
        Self::Festival { name: name.into() }
    }

    pub fn dance(state: impl Into<String>, dance: impl Into<String>) -> Self {
        Self::Dance {
            state: state.into(),
            dance: dance.into(),
        }
    }

    pub fn heritage(city: impl Into<String>, site: impl Into<String>) -> Self {
        Self::Heritage {
            city: city.into(),
            site: site.into(),
        }
    }

    pub fn stored_file(stage: impl Into<String>, file: impl Into<String>) -> Self {
        Self::StoredFile {
            stage: stage.into(),
            file: file.into(),
        }
    }

    /// Whether every identifying field is non-blank.
    ///
    /// Subjects that fail this are resolved to not-found without I/O.
    pub fn is_complete(&self) -> bool {
        let filled = |s: &str| !s.trim().is_empty();
        match self {
            ImageSubject::Festival { name } => filled(name),
            ImageSubject::Dance { state, dance } => filled(state) && filled(dance),
            ImageSubject::Heritage { city, site } => filled(city) && filled(site),
            ImageSubject::StoredFile { stage, file } => filled(stage) && filled(file),
        }
    }
}
