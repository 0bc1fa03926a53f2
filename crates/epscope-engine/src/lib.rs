//! EnergyPlus worker invocation for epscope
//!
//! The engine itself is a black box behind [`EnergyPlusEngine`]: something
//! that runs to completion synchronously and reports back through three
//! callbacks (progress, stdout line, error event) plus a completion status.
//! [`ProcessEngine`] is the subprocess-backed implementation;
//! [`EngineRunner`] owns the worker task and the stale re-run guard.

mod process;
mod runner;

pub use process::ProcessEngine;
pub use runner::{EngineCallbacks, EngineRunner, EnergyPlusEngine, StartOutcome};

use std::path::Path;

const ACCEPTED_EXTENSIONS: [&str; 4] = ["epjson", "json", "idf", "imf"];

/// Whether a path looks like an EnergyPlus input file, by extension
/// (ASCII case-insensitive).
pub fn validate_input_type(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn accepts_known_input_extensions_case_insensitively() {
        for name in ["in.idf", "in.IDF", "model.epJSON", "model.json", "macro.imf"] {
            assert!(validate_input_type(&PathBuf::from(name)), "{name}");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for name in ["in.txt", "in.err", "idf", "noext", "in.idf.bak"] {
            assert!(!validate_input_type(&PathBuf::from(name)), "{name}");
        }
    }
}
