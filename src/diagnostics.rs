//! Non-fatal warnings surfaced to the presentation layer.
//!
//! The store adapter never returns an error. Instead, each failed fetch
//! leaves a [`Diagnostic`] in a shared [`DiagnosticLog`], which the
//! presenter drains after a render cycle and shows inline while the rest
//! of the page renders normally.

use std::sync::{Arc, Mutex, MutexGuard};

/// One failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What failed to load (dataset label, image path, ...).
    pub subject: String,
    /// User-facing message.
    pub message: String,
    /// Underlying error text, if any.
    pub detail: Option<String>,
}

impl Diagnostic {
    /// The standard warning for a dataset that could not be loaded.
    pub fn dataset(label: &str, detail: impl Into<String>) -> Self {
        Self {
            subject: label.to_string(),
            message: format!(
                "Could not load {label}. Table may not exist or not be accessible."
            ),
            detail: Some(detail.into()),
        }
    }

    /// A failed image lookup.
    pub fn image(subject: impl Into<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            subject: subject.into(),
            message: format!("Error getting image: {detail}"),
            detail: Some(detail),
        }
    }

    /// A request for a dataset name the catalog does not know.
    pub fn unknown_dataset(name: &str) -> Self {
        Self {
            subject: name.to_string(),
            message: format!("Unknown dataset '{name}'."),
            detail: None,
        }
    }
}

/// Shared, append-only log of diagnostics. Cloning shares the log.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }

    /// Remove and return everything logged so far.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Copy of the current entries, leaving them in place.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
