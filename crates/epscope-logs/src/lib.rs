//! Diagnostic log processing for epscope
//!
//! This crate provides line classification for the `eplusout.err` format,
//! the per-run log state (raw output plus classified diagnostics), the
//! severity filter registry, and the worker-to-display channel.

mod channel;
mod classify;
mod filter;
mod run_log;

pub use channel::{ChannelRx, ChannelTx, channel};
pub use classify::{Classifier, LineClass};
pub use filter::LevelFilterRegistry;
pub use run_log::{ERR_FILE_NAME, RunLog};

// Re-export types used in our public API
pub use epscope_types::{AggregateCounts, DiagnosticRecord, RunOutcome, Severity};
