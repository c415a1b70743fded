//! Empty-on-failure adapter over a [`DataSource`].
//!
//! Every call returns a value: a table (possibly empty), an optional image,
//! a flag. Failures are logged, counted and left in the [`DiagnosticLog`],
//! and then collapse into the same shape as "no data". Callers never handle
//! errors.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use super::statement::{StageRef, Statement};
use super::traits::DataSource;
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::telemetry;
use crate::types::{ImageMode, ImageResource, Table};
use crate::Result;

/// Column holding the URL in a presigned-URL result.
const IMAGE_URL_COLUMN: &str = "IMAGE_URL";

/// Column holding file names in a `LIST` result.
const LIST_NAME_COLUMN: &str = "name";

/// Wraps a [`DataSource`] so that no error escapes.
#[derive(Clone)]
pub struct StoreAdapter {
    source: Arc<dyn DataSource>,
    diagnostics: DiagnosticLog,
}

impl StoreAdapter {
    pub fn new(source: Arc<dyn DataSource>, diagnostics: DiagnosticLog) -> Self {
        Self {
            source,
            diagnostics,
        }
    }

    /// Name of the wrapped source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// The log failures are reported to.
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    async fn run(&self, statement: &Statement) -> Result<Table> {
        let start = Instant::now();
        let result = self.source.query(statement).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(
            telemetry::STORE_QUERIES_TOTAL,
            "statement" => statement.kind(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(
            telemetry::STORE_QUERY_DURATION_SECONDS,
            "statement" => statement.kind(),
        )
        .record(start.elapsed().as_secs_f64());
        result
    }

    /// Run a read for the dataset described by `label`.
    ///
    /// Returns an empty table on any failure.
    #[instrument(skip(self, statement), fields(source = self.source.name()))]
    pub async fn fetch(&self, statement: &Statement, label: &str) -> Table {
        match self.run(statement).await {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, sql = %statement, "could not load {label}");
                self.diagnostics.push(Diagnostic::dataset(label, e.to_string()));
                Table::empty()
            }
        }
    }

    /// Presigned URL for a staged file, or `None` if the store returned none.
    pub async fn presigned_url(
        &self,
        stage: &StageRef,
        path: &str,
        expiry_secs: Option<u64>,
    ) -> Option<String> {
        let statement = Statement::presigned_url(stage.clone(), path, expiry_secs);
        match self.run(&statement).await {
            Ok(table) => table
                .value(0, IMAGE_URL_COLUMN)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            Err(e) => {
                warn!(error = %e, %stage, path, "error getting image URL");
                self.diagnostics
                    .push(Diagnostic::image(format!("{stage}/{path}"), e.to_string()));
                None
            }
        }
    }

    /// Locate a staged image and hand it back in the requested form.
    ///
    /// In [`ImageMode::Bytes`] a failed or empty download means the file is
    /// not there; it is not reported as a diagnostic.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn image(
        &self,
        stage: &StageRef,
        path: &str,
        mode: ImageMode,
        expiry_secs: Option<u64>,
    ) -> Option<ImageResource> {
        let url = self.presigned_url(stage, path, expiry_secs).await?;
        match mode {
            ImageMode::Url => Some(ImageResource::Url(url)),
            ImageMode::Bytes => match self.source.download(&url).await {
                Ok(bytes) if !bytes.is_empty() => Some(ImageResource::Bytes(bytes)),
                Ok(_) => None,
                Err(e) => {
                    debug!(error = %e, "image download failed");
                    None
                }
            },
        }
    }

    /// Whether any file in `stage` has a path containing `path`.
    pub async fn exists(&self, stage: &StageRef, path: &str) -> bool {
        let statement = Statement::list_matching(stage.clone(), path);
        match self.run(&statement).await {
            Ok(table) => !table.is_empty(),
            Err(e) => {
                debug!(error = %e, %stage, path, "existence check failed");
                false
            }
        }
    }

    /// Names of every file in `stage`.
    pub async fn list(&self, stage: &StageRef) -> Vec<String> {
        let statement = Statement::list(stage.clone());
        match self.run(&statement).await {
            Ok(table) => table
                .column_values(LIST_NAME_COLUMN)
                .into_iter()
                .flatten()
                .map(str::to_string)
                .collect(),
            Err(e) => {
                warn!(error = %e, %stage, "error listing images");
                self.diagnostics
                    .push(Diagnostic::image(stage.to_string(), e.to_string()));
                Vec::new()
            }
        }
    }
}
