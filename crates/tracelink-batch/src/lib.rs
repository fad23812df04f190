//! Tracelink Batch
//!
//! Batch orchestration over directories of model inputs.
//!
//! Archives are independent: no shared mutable state crosses archive
//! boundaries, so extraction fans out one worker per archive. Within
//! one archive the parse phases stay strictly ordered. A single file's
//! failure is recorded on its outcome and never aborts the batch; the
//! run always ends with a per-file outcome list and an aggregate
//! summary.
//!
//! Exports (graph documents, summaries, version stores) are
//! best-effort relative to the in-memory results: a failed write is
//! reported, computed graphs and version records are kept.

mod cameo;
mod config;
mod error;
mod simulink;
mod summary;

pub use cameo::{CameoBatch, CameoBatchResult};
pub use config::{BatchConfig, CameoConfig, SimulinkConfig};
pub use error::BatchError;
pub use simulink::{SimulinkBatch, SimulinkBatchResult, SimulinkModelResult};
pub use summary::{BatchSummary, FileRecord, FileStatus};
