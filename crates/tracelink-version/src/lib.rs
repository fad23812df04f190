//! Tracelink Version
//!
//! Content-addressed version history for extracted artifacts.
//!
//! # Core Concepts
//!
//! - [`canonical_json`] / [`content_hash`]: key-order-independent
//!   serialization and the SHA-256 id derived from it — identical
//!   content always yields the identical id, across independent runs
//! - [`ArtifactVersion`]: one immutable, append-only version record
//!   with a single parent pointer forming the lineage chain
//! - [`VersionStore`]: the durable artifact-id → current-version map,
//!   read fully at tracker start and rewritten fully at tracker end
//! - [`track`] / [`track_file`]: change detection over a canonical
//!   graph document (new / changed / idempotent no-op)
//!
//! The store is single-writer per tool and model; concurrent writers
//! require external serialization, which this crate does not provide.

mod canonical;
mod error;
mod schema;
mod store;
mod tracker;

pub use canonical::{canonical_json, content_hash};
pub use error::StoreError;
pub use schema::{ArtifactType, ArtifactVersion, Tool};
pub use store::VersionStore;
pub use tracker::{track, track_file, TrackOutcome};
