use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use regex::Regex;

use epscope_logs::{Classifier, LineClass};
use epscope_types::Severity;

use crate::runner::{EnergyPlusEngine, EngineCallbacks};

/// Subprocess-backed engine: spawns the `energyplus` executable with
/// `-d <output_dir> <input>`, forwards its stdout to the raw view, and
/// classifies its stderr into diagnostic events.
///
/// Progress is scraped from percent tokens on stdout, best effort; the
/// definitive success/failure signal is the exit status, which the runner
/// folds into the progress convention.
pub struct ProcessEngine {
    executable: PathBuf,
    percent: Regex,
}

impl ProcessEngine {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            percent: Regex::new(r"(\d{1,3})\s*%").unwrap(),
        }
    }

    fn scrape_progress(&self, line: &str, callbacks: &EngineCallbacks) {
        if let Some(caps) = self.percent.captures(line)
            && let Ok(percent) = caps[1].parse::<i32>()
            && (0..100).contains(&percent)
        {
            callbacks.progress(percent);
        }
    }
}

impl EnergyPlusEngine for ProcessEngine {
    fn run(&self, input: &Path, output_dir: &Path, callbacks: &EngineCallbacks) -> i32 {
        let mut child = match Command::new(&self.executable)
            .arg("-d")
            .arg(output_dir)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                callbacks.error_event(
                    Severity::Severe,
                    format!("Failed to launch {}: {err}", self.executable.display()),
                );
                return 1;
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        std::thread::scope(|scope| {
            // stderr carries err-format diagnostics; classify as they arrive.
            // Outcome markers stay informational here since the exit status
            // is authoritative for live runs.
            if let Some(stderr) = stderr {
                scope.spawn(|| {
                    let classifier = Classifier::new();
                    for line in BufReader::new(stderr).lines() {
                        let Ok(line) = line else { break };
                        match classifier.classify(&line) {
                            LineClass::Record(record) => {
                                callbacks.error_event(record.level, record.message);
                            }
                            LineClass::Completed | LineClass::Terminated => {
                                callbacks.error_event(Severity::Info, line);
                            }
                        }
                    }
                });
            }

            if let Some(stdout) = stdout {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    self.scrape_progress(&line, callbacks);
                    callbacks.stdout_line(line);
                }
            }
        });

        match child.wait() {
            Ok(status) => status.code().unwrap_or(1),
            Err(err) => {
                callbacks.error_event(Severity::Severe, format!("Engine did not exit: {err}"));
                1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epscope_logs::channel;
    use std::sync::Arc;
    use std::sync::atomic::AtomicI32;
    use tokio::sync::Notify;

    fn wired() -> (
        EngineCallbacks,
        epscope_logs::ChannelRx<String>,
        epscope_logs::ChannelRx<epscope_types::DiagnosticRecord>,
    ) {
        let wake = Arc::new(Notify::new());
        let (raw_tx, raw_rx) = channel(Arc::clone(&wake));
        let (diag_tx, diag_rx) = channel(Arc::clone(&wake));
        let callbacks =
            EngineCallbacks::new(raw_tx, diag_tx, Arc::new(AtomicI32::new(0)), wake);
        (callbacks, raw_rx, diag_rx)
    }

    #[test]
    fn stdout_of_the_child_lands_in_the_raw_channel() {
        let (callbacks, mut raw_rx, _diag_rx) = wired();
        let dir = tempfile::tempdir().expect("tempdir");

        // echo prints its arguments and exits 0
        let engine = ProcessEngine::new("echo");
        let status = engine.run(Path::new("in.idf"), dir.path(), &callbacks);

        assert_eq!(status, 0);
        let lines = raw_rx.drain();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("in.idf"));
    }

    #[test]
    fn missing_executable_reports_a_severe_event_and_fails() {
        let (callbacks, _raw_rx, mut diag_rx) = wired();
        let dir = tempfile::tempdir().expect("tempdir");

        let engine = ProcessEngine::new("/definitely/not/energyplus");
        let status = engine.run(Path::new("in.idf"), dir.path(), &callbacks);

        assert_eq!(status, 1);
        let records = diag_rx.drain();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Severity::Severe);
    }
}
