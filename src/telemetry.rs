//! Telemetry metric name constants.
//!
//! Centralised metric names for sanskriti operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `sanskriti_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `fetch`: fetch descriptor name (e.g. "dance", "stage_image")
//! - `statement`: outbound statement kind: "select", "list" or "presigned_url"
//! - `status`: outcome: "ok" or "error"

/// Total cache hits.
///
/// Labels: `fetch`.
pub const CACHE_HITS_TOTAL: &str = "sanskriti_cache_hits_total";

/// Total cache misses (each one runs the underlying fetch).
///
/// Labels: `fetch`.
pub const CACHE_MISSES_TOTAL: &str = "sanskriti_cache_misses_total";

/// Total invalidation requests.
///
/// Labels: `scope` ("fetch" | "cultural" | "all").
pub const CACHE_INVALIDATIONS_TOTAL: &str = "sanskriti_cache_invalidations_total";

/// Total statements sent to the external store.
///
/// Labels: `statement`, `status` ("ok" | "error").
pub const STORE_QUERIES_TOTAL: &str = "sanskriti_store_queries_total";

/// Store statement duration in seconds.
///
/// Labels: `statement`.
pub const STORE_QUERY_DURATION_SECONDS: &str = "sanskriti_store_query_duration_seconds";

/// Total image resolutions.
///
/// Labels: `outcome` ("found" | "not_found").
pub const IMAGE_RESOLUTIONS_TOTAL: &str = "sanskriti_image_resolutions_total";
