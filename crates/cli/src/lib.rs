//! Offline driver for the codex catalog builder: configuration, snapshot
//! fetcher, pipeline and output writer behind the `codex` binary.

pub mod config;
pub mod pipeline;
pub mod snapshot;
pub mod writer;

pub use config::{CodexConfig, DEFAULT_CONFIG_FILE};
pub use pipeline::{run, PipelineOutput};
pub use snapshot::SnapshotFetcher;
pub use writer::{write_outputs, Manifest, ManifestFiles, MANIFEST_FILE, REPORT_FILE};
