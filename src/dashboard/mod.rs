//! The dashboard facade: every read the presentation layer makes.
//!
//! [`Dashboard`] owns the dataset catalog, the store adapter, one
//! read-through cache per value shape and the diagnostic log. Nothing it
//! exposes returns an error: a failed read is an empty table, a missing
//! image is `None`, and the reason is left in [`Dashboard::diagnostics`].
//!
//! # Invalidation
//!
//! Entries never expire. They are dropped by
//! [`invalidate`](Dashboard::invalidate) for one dataset, for the cultural
//! group, or for everything; each group is a fixed list of descriptors
//! taken from the catalog.

mod builder;

pub use builder::DashboardBuilder;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::{info, instrument, warn};

use crate::cache::ReadThroughCache;
use crate::catalog::{lean_peak_name, DatasetCatalog, DatasetSource, Group, TableEntry};
use crate::catalog::{StageCatalog, LEAN_PEAK_YEARS};
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::resolver::{CandidateKey, CandidateProbe, KeyResolver, Resolution};
use crate::store::{Statement, StoreAdapter};
use crate::telemetry;
use crate::types::{FetchDescriptor, ImageMode, ImageResource, ImageSubject, ResultShape, Table};
use crate::{Result, SanskritiError};

/// What to invalidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationScope {
    /// One dataset or fetch by name. Composites invalidate their parts.
    Fetch(String),
    /// Festivals, dance and heritage sites.
    Cultural,
    /// Every dataset and every image fetch.
    All,
}

impl InvalidationScope {
    fn label(&self) -> &'static str {
        match self {
            InvalidationScope::Fetch(_) => "fetch",
            InvalidationScope::Cultural => "cultural",
            InvalidationScope::All => "all",
        }
    }
}

/// Cached, failure-tolerant access to every dataset and image.
pub struct Dashboard {
    catalog: DatasetCatalog,
    resolver: KeyResolver,
    adapter: StoreAdapter,
    diagnostics: DiagnosticLog,
    image_mode: ImageMode,
    presigned_url_expiry_secs: Option<u64>,
    tables: ReadThroughCache<Arc<Table>>,
    images: ReadThroughCache<Option<ImageResource>>,
    flags: ReadThroughCache<bool>,
    listings: ReadThroughCache<Arc<Vec<String>>>,
}

impl Dashboard {
    /// Create a new builder.
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::new()
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    pub fn stages(&self) -> &StageCatalog {
        self.resolver.stages()
    }

    pub fn image_mode(&self) -> ImageMode {
        self.image_mode
    }

    /// Warnings left by failed reads. Drain after each render.
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    // ========================================================================
    // Datasets
    // ========================================================================

    /// Load a logical dataset (table, alias or composite).
    ///
    /// Unknown names produce an empty table and a diagnostic and are not
    /// cached.
    #[instrument(skip(self))]
    pub async fn load(&self, name: &str) -> Arc<Table> {
        match self.catalog.source(name) {
            Some(source) => self.evaluate(&source).await,
            None => {
                warn!(name, "unknown dataset");
                self.diagnostics.push(Diagnostic::unknown_dataset(name));
                Arc::new(Table::empty())
            }
        }
    }

    async fn load_table(&self, entry: &TableEntry) -> Arc<Table> {
        self.tables
            .get_or_compute(&entry.descriptor, &[], async {
                let statement = Statement::select(entry.table.clone());
                Arc::new(self.adapter.fetch(&statement, &entry.label).await)
            })
            .await
    }

    fn evaluate<'a>(&'a self, source: &'a DatasetSource) -> BoxFuture<'a, Arc<Table>> {
        Box::pin(async move {
            match source {
                DatasetSource::Table(name) => match self.catalog.table(name) {
                    Some(entry) => self.load_table(entry).await,
                    None => Arc::new(Table::empty()),
                },
                DatasetSource::Union(parts) => {
                    let mut loaded = Vec::with_capacity(parts.len());
                    for part in parts {
                        let table = self.evaluate(part).await;
                        if !table.is_empty() {
                            loaded.push(table);
                        }
                    }
                    match loaded.len() {
                        0 => Arc::new(Table::empty()),
                        1 => loaded.swap_remove(0),
                        _ => {
                            let combined = loaded[1..]
                                .iter()
                                .fold(loaded[0].as_ref().clone(), |acc, t| acc.concat(t));
                            Arc::new(combined)
                        }
                    }
                }
                DatasetSource::FirstNonEmpty(parts) => {
                    for part in parts {
                        let table = self.evaluate(part).await;
                        if !table.is_empty() {
                            return table;
                        }
                    }
                    Arc::new(Table::empty())
                }
            }
        })
    }

    /// Every store-backed dataset, in catalog order.
    pub async fn load_all(&self) -> Vec<(String, Arc<Table>)> {
        let mut all = Vec::with_capacity(self.catalog.tables().len());
        for entry in self.catalog.tables() {
            all.push((entry.name().to_string(), self.load_table(entry).await));
        }
        all
    }

    /// The lean/peak month table of every year.
    pub async fn lean_peak_by_year(&self) -> Vec<(u16, Arc<Table>)> {
        let mut years = Vec::with_capacity(LEAN_PEAK_YEARS.len());
        for year in LEAN_PEAK_YEARS {
            years.push((year, self.load(&lean_peak_name(year)).await));
        }
        years
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// The image at `path` in symbolic stage `stage`, cached per key.
    ///
    /// Presigning does not check that the file exists, so in
    /// [`ImageMode::Url`] the (cached) [`image_exists`](Self::image_exists)
    /// listing gates it. Bytes mode downloads the file, which is its own check.
    pub async fn get_image(&self, stage: &str, path: &str) -> Option<ImageResource> {
        self.images
            .get_or_compute(&FetchDescriptor::STAGE_IMAGE, &[stage, path], async {
                if self.image_mode == ImageMode::Url && !self.image_exists(stage, path).await {
                    return None;
                }
                let physical = self.stages().physical(stage);
                self.adapter
                    .image(
                        &physical,
                        path,
                        self.image_mode,
                        self.presigned_url_expiry_secs,
                    )
                    .await
            })
            .await
    }

    /// Whether any file in `stage` has a path containing `path`.
    pub async fn image_exists(&self, stage: &str, path: &str) -> bool {
        self.flags
            .get_or_compute(&FetchDescriptor::STAGE_IMAGE_INFO, &[stage, path], async {
                self.adapter.exists(&self.stages().physical(stage), path).await
            })
            .await
    }

    /// Every file name in `stage`.
    pub async fn available_images(&self, stage: &str) -> Arc<Vec<String>> {
        self.listings
            .get_or_compute(&FetchDescriptor::STAGE_LISTING, &[stage], async {
                Arc::new(self.adapter.list(&self.stages().physical(stage)).await)
            })
            .await
    }

    /// Walk the candidate keys for `subject` until one has an image.
    pub async fn resolve_image(&self, subject: &ImageSubject) -> Resolution {
        self.resolver.resolve(subject, self).await
    }

    // ========================================================================
    // Invalidation
    // ========================================================================

    /// Drop cached entries so the next read goes to the store.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDataset` if a `Fetch` scope names nothing.
    pub fn invalidate(&self, scope: InvalidationScope) -> Result<()> {
        let descriptors = match &scope {
            InvalidationScope::Fetch(name) => self
                .descriptors_named(name)
                .ok_or_else(|| SanskritiError::UnknownDataset(name.clone()))?,
            InvalidationScope::Cultural => self.catalog.group(Group::Cultural),
            InvalidationScope::All => self.catalog.group(Group::All),
        };
        self.invalidate_descriptors(scope.label(), &descriptors);
        Ok(())
    }

    /// Invalidate the dance dataset.
    pub fn clear_dance_cache(&self) {
        if let Some(entry) = self.catalog.table("dance") {
            self.invalidate_descriptors("fetch", &[entry.descriptor.clone()]);
        }
    }

    /// Invalidate festivals, dance and heritage sites.
    pub fn clear_cultural_cache(&self) {
        self.invalidate_descriptors("cultural", &self.catalog.group(Group::Cultural));
    }

    /// Invalidate everything.
    pub fn clear_all_cache(&self) {
        self.invalidate_descriptors("all", &self.catalog.group(Group::All));
    }

    fn descriptors_named(&self, name: &str) -> Option<Vec<FetchDescriptor>> {
        if let Some(descriptor) = self.catalog.descriptor(name) {
            return Some(vec![descriptor]);
        }
        self.catalog.source(name).map(|source| {
            source
                .table_names()
                .into_iter()
                .filter_map(|n| self.catalog.table(n))
                .map(|t| t.descriptor.clone())
                .collect()
        })
    }

    fn invalidate_descriptors(&self, scope: &'static str, descriptors: &[FetchDescriptor]) {
        for descriptor in descriptors {
            match descriptor.shape() {
                ResultShape::Tabular => self.tables.invalidate(descriptor),
                ResultShape::Image => self.images.invalidate(descriptor),
                ResultShape::Flag => self.flags.invalidate(descriptor),
                ResultShape::Listing => self.listings.invalidate(descriptor),
            }
        }
        info!(scope, count = descriptors.len(), "cache invalidated");
        metrics::counter!(telemetry::CACHE_INVALIDATIONS_TOTAL, "scope" => scope).increment(1);
    }

    /// Whether `(fetch, params)` currently has a cached entry.
    pub fn is_cached(&self, fetch: &FetchDescriptor, params: &[&str]) -> bool {
        match fetch.shape() {
            ResultShape::Tabular => self.tables.contains(fetch, params),
            ResultShape::Image => self.images.contains(fetch, params),
            ResultShape::Flag => self.flags.contains(fetch, params),
            ResultShape::Listing => self.listings.contains(fetch, params),
        }
    }
}

#[async_trait]
impl CandidateProbe for Dashboard {
    async fn probe(&self, key: &CandidateKey) -> Option<ImageResource> {
        self.get_image(&key.stage, &key.path).await
    }
}
