//! Fallback key resolution for images.
//!
//! A logical subject (a festival, a state's dance, a heritage site) has no
//! single physical path. Over time the stages accumulated files under
//! several naming conventions, so resolution walks an ordered candidate
//! list and stops at the first hit:
//!
//! ```text
//! ImageSubject::Dance { "Kerala", "Kathakali" }
//!         │
//!         ▼
//!   DANCE_IMAGES:kerala_kathakali.jpg   ──► probe ──► None
//!   DANCE_IMAGES:kerala_kathakali.jpeg  ──► probe ──► Some(url)  ✓ stop
//!   DANCE_IMAGES:kerala_kathakali.png       (not tried)
//! ```
//!
//! Probing goes through a [`CandidateProbe`], normally the
//! [`Dashboard`](crate::Dashboard), whose probes are cached per key.

pub mod candidates;

pub use candidates::{candidates, CandidateKey, IMAGE_EXTENSIONS};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::catalog::StageCatalog;
use crate::telemetry;
use crate::types::{ImageResource, ImageSubject};

/// Looks up one candidate key.
#[async_trait]
pub trait CandidateProbe: Send + Sync {
    /// The resource at `key`, or `None` if nothing is there.
    async fn probe(&self, key: &CandidateKey) -> Option<ImageResource>;
}

/// Outcome of resolving a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found {
        key: CandidateKey,
        resource: ImageResource,
    },
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    /// The located resource, dropping the key.
    pub fn into_resource(self) -> Option<ImageResource> {
        match self {
            Resolution::Found { resource, .. } => Some(resource),
            Resolution::NotFound => None,
        }
    }
}

/// Generates candidate keys and probes them in order.
#[derive(Debug, Clone)]
pub struct KeyResolver {
    stages: StageCatalog,
}

impl KeyResolver {
    pub fn new(stages: StageCatalog) -> Self {
        Self { stages }
    }

    /// The stage catalog used for legacy folder prefixes.
    pub fn stages(&self) -> &StageCatalog {
        &self.stages
    }

    /// The ordered candidate keys for `subject`.
    pub fn candidates(&self, subject: &ImageSubject) -> Vec<CandidateKey> {
        candidates(subject, &self.stages)
    }

    /// First candidate the probe finds, or `NotFound`.
    ///
    /// Incomplete subjects return `NotFound` without probing.
    #[instrument(skip(self, probe))]
    pub async fn resolve(
        &self,
        subject: &ImageSubject,
        probe: &dyn CandidateProbe,
    ) -> Resolution {
        for (attempt, key) in self.candidates(subject).into_iter().enumerate() {
            debug!(attempt, %key, "probing candidate");
            if let Some(resource) = probe.probe(&key).await {
                metrics::counter!(telemetry::IMAGE_RESOLUTIONS_TOTAL, "outcome" => "found")
                    .increment(1);
                return Resolution::Found { key, resource };
            }
        }
        metrics::counter!(telemetry::IMAGE_RESOLUTIONS_TOTAL, "outcome" => "not_found")
            .increment(1);
        Resolution::NotFound
    }
}
