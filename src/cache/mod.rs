//! Caching subsystem.
//!
//! [`ReadThroughCache`] is the one memoisation primitive. The
//! [`Dashboard`](crate::Dashboard) owns one instance per value shape:
//!
//! - tables, keyed on the logical dataset name;
//! - image resources, keyed on `(stage, path)`;
//! - existence flags, keyed on `(stage, path)`;
//! - stage listings, keyed on `(stage)`.
//!
//! Each cache is constructed with its owner and dropped with it. There is
//! no process-global cache state, so tests get isolated instances.

pub mod read_through;

pub use read_through::ReadThroughCache;
