//! Sanskriti - cached data access for an Indian culture and tourism dashboard
//!
//! The presentation layer asks for logical datasets (`"festivals"`,
//! `"heritage_sites"`, `"state_tourism"`) and images of logical subjects (a
//! festival, a state's dance). This crate maps those requests onto an
//! external analytical store, memoises every result until it is explicitly
//! invalidated, and never lets a store failure reach the caller: failures
//! become empty tables or missing images plus an entry in the diagnostic
//! log.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sanskriti::{Config, Dashboard, ImageSubject, Secrets};
//!
//! #[tokio::main]
//! async fn main() -> sanskriti::Result<()> {
//!     let config = Config::load(None)?;
//!     let token = Secrets::load()?.token().unwrap_or_default();
//!     let dashboard = Dashboard::builder()
//!         .source(Arc::new(config.snowflake_client(token)?))
//!         .config(&config)
//!         .build()?;
//!
//!     let dances = dashboard.load("dance").await;
//!     println!("{} dance forms", dances.len());
//!
//!     let image = dashboard
//!         .resolve_image(&ImageSubject::festival("Durga Puja"))
//!         .await;
//!     println!("{image:?}");
//!
//!     for warning in dashboard.diagnostics().drain() {
//!         eprintln!("{}", warning.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod dance;
pub mod dashboard;
pub mod diagnostics;
pub mod error;
pub mod resolver;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::ReadThroughCache;
pub use catalog::{DatasetCatalog, StageCatalog};
pub use config::{Config, Secrets};
pub use dashboard::{Dashboard, DashboardBuilder, InvalidationScope};
pub use diagnostics::{Diagnostic, DiagnosticLog};
pub use error::{Result, SanskritiError};
pub use resolver::{CandidateKey, CandidateProbe, KeyResolver, Resolution};
pub use store::{DataSource, SnowflakeClient, StoreAdapter};
pub use types::{
    FetchDescriptor, ImageMode, ImageResource, ImageSubject, ResultShape, Row, Table,
};
