//! Public types for the Sanskriti API.

mod fetch;
mod image;
mod table;

pub use fetch::{FetchDescriptor, ResultShape};
pub use image::{ImageMode, ImageResource, ImageSubject};
pub use table::{Row, Table};
