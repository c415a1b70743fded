//! Builder for configuring dashboard instances

use std::collections::BTreeMap;
use std::sync::Arc;

use super::Dashboard;
use crate::cache::ReadThroughCache;
use crate::catalog::{DatasetCatalog, StageCatalog, DEFAULT_DATABASE};
use crate::config::Config;
use crate::diagnostics::DiagnosticLog;
use crate::resolver::KeyResolver;
use crate::store::{DataSource, StoreAdapter};
use crate::types::ImageMode;
use crate::{Result, SanskritiError};

/// Builder for [`Dashboard`].
pub struct DashboardBuilder {
    source: Option<Arc<dyn DataSource>>,
    database: String,
    assets_schema: String,
    image_mode: ImageMode,
    presigned_url_expiry_secs: Option<u64>,
    table_overrides: BTreeMap<String, String>,
    diagnostics: Option<DiagnosticLog>,
}

impl DashboardBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            database: DEFAULT_DATABASE.to_string(),
            assets_schema: "ASSETS".to_string(),
            image_mode: ImageMode::default(),
            presigned_url_expiry_secs: None,
            table_overrides: BTreeMap::new(),
            diagnostics: None,
        }
    }

    /// The store every fetch goes to.
    pub fn source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Take database, stages, image mode and table overrides from config.
    pub fn config(mut self, config: &Config) -> Self {
        self.database = config.store.database.clone();
        self.assets_schema = config.assets.schema.clone();
        self.image_mode = config.assets.image_mode;
        self.presigned_url_expiry_secs = config.assets.presigned_url_expiry_secs;
        self.table_overrides = config.tables.clone();
        self
    }

    /// Database holding every dataset (default: CULTURE_TOURISM_DB).
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Schema holding the image stages (default: ASSETS).
    pub fn assets_schema(mut self, schema: impl Into<String>) -> Self {
        self.assets_schema = schema.into();
        self
    }

    /// Hand images back as URLs (default) or bytes.
    pub fn image_mode(mut self, mode: ImageMode) -> Self {
        self.image_mode = mode;
        self
    }

    /// Lifetime of generated presigned URLs.
    pub fn presigned_url_expiry(mut self, secs: u64) -> Self {
        self.presigned_url_expiry_secs = Some(secs);
        self
    }

    /// Point one logical dataset at another physical table.
    pub fn table_override(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.table_overrides.insert(name.into(), target.into());
        self
    }

    /// Report diagnostics into an existing log instead of a fresh one.
    pub fn diagnostics(mut self, log: DiagnosticLog) -> Self {
        self.diagnostics = Some(log);
        self
    }

    /// Build the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if no source was set, or `UnknownDataset` /
    /// `Configuration` for a bad table override.
    pub fn build(self) -> Result<Dashboard> {
        let source = self.source.ok_or_else(|| {
            SanskritiError::Configuration("no data source configured".to_string())
        })?;
        let catalog = DatasetCatalog::new(&self.database).with_overrides(&self.table_overrides)?;
        let stages = StageCatalog::new(&self.database, &self.assets_schema);
        let diagnostics = self.diagnostics.unwrap_or_default();

        Ok(Dashboard {
            catalog,
            resolver: KeyResolver::new(stages),
            adapter: StoreAdapter::new(source, diagnostics.clone()),
            diagnostics,
            image_mode: self.image_mode,
            presigned_url_expiry_secs: self.presigned_url_expiry_secs,
            tables: ReadThroughCache::new(),
            images: ReadThroughCache::new(),
            flags: ReadThroughCache::new(),
            listings: ReadThroughCache::new(),
        })
    }
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
