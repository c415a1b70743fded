//! Fetch descriptors: the identity of a memoised data-retrieval operation.

use std::borrow::Cow;
use std::fmt;

/// Shape of the value a fetch produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultShape {
    /// A tabular result (possibly zero rows).
    Tabular,
    /// A single image resource or nothing.
    Image,
    /// An existence flag.
    Flag,
    /// A list of names (stage listing).
    Listing,
}

/// A named, low-arity data-retrieval operation.
///
/// Declared once at process start and never mutated. The cache keys every
/// entry on `(descriptor name, parameter tuple)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchDescriptor {
    name: Cow<'static, str>,
    arity: usize,
    shape: ResultShape,
}

impl FetchDescriptor {
    /// Image URL or bytes for `(stage, path)`.
    pub const STAGE_IMAGE: FetchDescriptor =
        FetchDescriptor::fixed("stage_image", 2, ResultShape::Image);
    /// Whether `(stage, path)` matches any file in the stage.
    pub const STAGE_IMAGE_INFO: FetchDescriptor =
        FetchDescriptor::fixed("stage_image_info", 2, ResultShape::Flag);
    /// All file names in `(stage)`.
    pub const STAGE_LISTING: FetchDescriptor =
        FetchDescriptor::fixed("stage_listing", 1, ResultShape::Listing);

    const fn fixed(name: &'static str, arity: usize, shape: ResultShape) -> Self {
        Self {
            name: Cow::Borrowed(name),
            arity,
            shape,
        }
    }

    /// A parameterless tabular fetch for one logical dataset.
    pub fn dataset(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
            shape: ResultShape::Tabular,
        }
    }

    /// Unique descriptor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of key parameters.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Shape of the produced value.
    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    /// The fixed image descriptors, in declaration order.
    pub fn image_descriptors() -> [FetchDescriptor; 3] {
        [
            Self::STAGE_IMAGE,
            Self::STAGE_IMAGE_INFO,
            Self::STAGE_LISTING,
        ]
    }
}

impl fmt::Display for FetchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
