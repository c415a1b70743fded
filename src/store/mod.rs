//! External store access.
//!
//! - [`DataSource`]: the seam: execute one statement, report a typed result.
//! - [`SnowflakeClient`]: the production source (SQL REST API).
//! - [`StoreAdapter`]: wraps any source and turns every failure into an
//!   empty result plus a diagnostic.
//! - [`Statement`]: typed `SELECT` / `LIST` / `GET_PRESIGNED_URL` reads.

pub mod adapter;
pub mod snowflake;
pub mod statement;
pub mod traits;

pub use adapter::StoreAdapter;
pub use snowflake::SnowflakeClient;
pub use statement::{StageRef, Statement, TableRef};
pub use traits::DataSource;
