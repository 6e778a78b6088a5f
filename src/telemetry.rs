//! Telemetry metric name constants.
//!
//! Centralised metric names for promptmesh operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `promptmesh_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `worker` — stage worker name ("transcribe", "diffuse", "generate-3d")
//! - `status` — outcome: "ok" or "error"

/// Total stage invocations dispatched through the runner.
///
/// Labels: `worker`, `status` ("ok" | "error").
pub const STAGE_RUNS_TOTAL: &str = "promptmesh_stage_runs_total";

/// Stage duration in seconds, measured from spawn to response parse.
///
/// Labels: `worker`.
pub const STAGE_DURATION_SECONDS: &str = "promptmesh_stage_duration_seconds";

/// Total pipeline runs.
///
/// Labels: `status` ("ok" | "error").
pub const PIPELINE_RUNS_TOTAL: &str = "promptmesh_pipeline_runs_total";

/// Total retrieval queries answered.
///
/// Labels: `status` ("hit" | "miss").
pub const RETRIEVAL_QUERIES_TOTAL: &str = "promptmesh_retrieval_queries_total";

/// Total full embedding-index rebuilds (one per catalog mutation).
pub const INDEX_REBUILDS_TOTAL: &str = "promptmesh_index_rebuilds_total";
