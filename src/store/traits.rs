//! The data source seam.
//!
//! A [`DataSource`] executes one statement and reports success or a typed
//! error. It does not cache, retry or swallow failures; that is the job of
//! the layers above it.
//!
//! # Example
//!
//! ```ignore
//! struct Fixture(Table);
//!
//! #[async_trait]
//! impl DataSource for Fixture {
//!     fn name(&self) -> &str { "fixture" }
//!     async fn query(&self, _statement: &Statement) -> Result<Table> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

use async_trait::async_trait;

use super::statement::Statement;
use crate::types::Table;
use crate::{Result, SanskritiError};

/// An external tabular store.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Source name for logging/debugging.
    fn name(&self) -> &str;

    /// Execute a read statement and return its full result.
    async fn query(&self, statement: &Statement) -> Result<Table>;

    /// Download the object behind a (presigned) URL.
    ///
    /// Default implementation returns `Unsupported`.
    async fn download(&self, _url: &str) -> Result<Vec<u8>> {
        Err(SanskritiError::Unsupported)
    }
}
