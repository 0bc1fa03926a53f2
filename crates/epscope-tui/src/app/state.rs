use std::path::PathBuf;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use epscope_logs::{ERR_FILE_NAME, LevelFilterRegistry, RunLog};
use epscope_sql::{EndUseTable, SQL_FILE_NAME, SqliteReports, UnmetHoursRow};
use epscope_types::DiagnosticRecord;

use super::{Action, SelectionState};

/// Tab-like sections of the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    RunOutput,
    Diagnostics,
    Reports,
    About,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::RunOutput,
        Section::Diagnostics,
        Section::Reports,
        Section::About,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RunOutput => "Stdout",
            Self::Diagnostics => "eplusout.err",
            Self::Reports => "Reports",
            Self::About => "About",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which button the startup reload modal has highlighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ModalChoice {
    #[default]
    Reload,
    StartFresh,
}

impl ModalChoice {
    pub fn other(&self) -> Self {
        match self {
            Self::Reload => Self::StartFresh,
            Self::StartFresh => Self::Reload,
        }
    }
}

/// Hit-test rectangles recorded during the last render, for mouse handling.
#[derive(Clone, Debug, Default)]
pub struct PaneRects {
    /// The visible log pane.
    pub log_pane: Option<Rect>,
    /// One rect per level filter checkbox, in first-seen order.
    pub filter_boxes: Vec<Rect>,
}

/// Cached contents of the Reports section.
pub enum ReportState {
    NotLoaded,
    /// The run succeeded but no database was written.
    Missing(PathBuf),
    Loaded(Box<ReportData>),
    Failed(String),
}

pub struct ReportData {
    pub version: String,
    pub net_site_energy: Option<f64>,
    pub unmet_hours: Vec<UnmetHoursRow>,
    pub end_uses: EndUseTable,
}

/// Global application state
pub struct AppState {
    /// Currently displayed section
    pub section: Section,

    /// Per-run log state (raw view + diagnostics + counts + outcome)
    pub run_log: RunLog,

    /// Levels seen so far and their checkbox state
    pub registry: LevelFilterRegistry,

    /// Selection in the raw stdout view
    pub stdout_selection: SelectionState,

    /// Selection in the filtered diagnostics view
    pub diag_selection: SelectionState,

    /// Whether the visible log pane holds input focus (highlight emphasis)
    pub log_focused: bool,

    /// Help overlay visibility
    pub help_visible: bool,

    /// Startup reload modal
    pub modal_visible: bool,
    pub modal_choice: ModalChoice,

    /// Whether app should quit
    pub should_quit: bool,

    /// Simulation input file and output directory
    pub input_file: PathBuf,
    pub output_directory: PathBuf,

    /// Inner height of the log pane at the last render, for paging
    pub viewport_height: usize,

    /// Mouse hit-test rects from the last render
    pub panes: PaneRects,

    /// Cached Reports section contents
    pub report: ReportState,
}

impl AppState {
    pub fn new(input_file: PathBuf, output_directory: PathBuf) -> Self {
        Self {
            section: Section::RunOutput,
            run_log: RunLog::new(),
            registry: LevelFilterRegistry::new(),
            stdout_selection: SelectionState::new(),
            diag_selection: SelectionState::new(),
            log_focused: true,
            help_visible: false,
            modal_visible: false,
            modal_choice: ModalChoice::default(),
            should_quit: false,
            input_file,
            output_directory,
            viewport_height: 1,
            panes: PaneRects::default(),
            report: ReportState::NotLoaded,
        }
    }

    /// Append one line of live engine stdout. The raw view follows the tail
    /// and takes focus, as a terminal would.
    pub fn append_stdout_line(&mut self, line: String) {
        self.run_log.push_raw(line);
        self.stdout_selection
            .set_length(self.run_log.raw_lines.len());
        self.stdout_selection.end();
        self.log_focused = true;
    }

    /// Append one live diagnostic record, registering its level.
    pub fn append_record(&mut self, record: DiagnosticRecord) {
        self.registry.register(record.level);
        self.run_log.push_record(record);
    }

    /// The diagnostics visible under the current level toggles.
    pub fn filtered_records(&self) -> Vec<&DiagnosticRecord> {
        self.registry
            .filtered_indices(&self.run_log.records)
            .into_iter()
            .map(|idx| &self.run_log.records[idx])
            .collect()
    }

    /// Selection belonging to the visible section, if it has a log pane.
    pub fn visible_selection_mut(&mut self) -> Option<&mut SelectionState> {
        match self.section {
            Section::RunOutput => Some(&mut self.stdout_selection),
            Section::Diagnostics => Some(&mut self.diag_selection),
            Section::Reports | Section::About => None,
        }
    }

    /// Re-ingest a completed run's artifacts from disk.
    pub fn reload_results(&mut self) -> bool {
        self.registry.clear();
        self.report = ReportState::NotLoaded;

        let loaded = self
            .run_log
            .reload(&self.output_directory.join(ERR_FILE_NAME));
        for record in &self.run_log.records {
            self.registry.register(record.level);
        }

        self.stdout_selection
            .set_length(self.run_log.raw_lines.len());
        self.diag_selection.set_length(self.run_log.records.len());
        loaded
    }

    /// Reset every per-run sequence, the filter registry included.
    pub fn clear_results(&mut self) {
        self.run_log.clear();
        self.registry.clear();
        self.report = ReportState::NotLoaded;
        self.stdout_selection.set_length(0);
        self.diag_selection.set_length(0);
    }

    /// Populate the Reports cache from the results database, once.
    pub fn load_report(&mut self) {
        if !matches!(self.report, ReportState::NotLoaded) {
            return;
        }

        let path = self.output_directory.join(SQL_FILE_NAME);
        if !path.is_file() {
            self.report = ReportState::Missing(path);
            return;
        }

        self.report = match Self::query_report(&path) {
            Ok(data) => ReportState::Loaded(Box::new(data)),
            Err(err) => {
                tracing::warn!(%err, "could not read results database");
                ReportState::Failed(err.to_string())
            }
        };
    }

    fn query_report(path: &std::path::Path) -> Result<ReportData, epscope_sql::ReportError> {
        let reports = SqliteReports::open(path)?;
        Ok(ReportData {
            version: reports.energyplus_version()?,
            net_site_energy: reports.net_site_energy()?,
            unmet_hours: reports.unmet_hours_table()?,
            end_uses: reports.end_use_by_fuel_table()?,
        })
    }

    /// Map a mouse event onto an action using the rects recorded during the
    /// last render. Clicking inside the log pane transfers focus to it.
    pub fn mouse_action(&self, event: &MouseEvent) -> Option<Action> {
        let position = Position::new(event.column, event.row);
        match event.kind {
            MouseEventKind::ScrollUp => Some(Action::LineUp),
            MouseEventKind::ScrollDown => Some(Action::LineDown),
            MouseEventKind::Down(MouseButton::Left) => {
                for (idx, rect) in self.panes.filter_boxes.iter().enumerate() {
                    if rect.contains(position) {
                        return Some(Action::ToggleLevel(idx));
                    }
                }
                let inside_log = self
                    .panes
                    .log_pane
                    .is_some_and(|rect| rect.contains(position));
                Some(Action::FocusLog(inside_log))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epscope_types::Severity;

    fn state() -> AppState {
        AppState::new(PathBuf::from("in.idf"), PathBuf::from("."))
    }

    #[test]
    fn stdout_lines_follow_the_tail_and_take_focus() {
        let mut state = state();
        state.log_focused = false;
        state.stdout_selection.set_length(0);

        for i in 0..5 {
            state.append_stdout_line(format!("line {i}"));
        }

        assert_eq!(state.stdout_selection.index(), 4);
        assert!(state.log_focused);
    }

    #[test]
    fn records_register_their_level() {
        let mut state = state();
        state.append_record(DiagnosticRecord::new(Severity::Warning, "w"));
        state.append_record(DiagnosticRecord::new(Severity::Continue, "w cont"));
        state.append_record(DiagnosticRecord::new(Severity::Severe, "s"));

        assert_eq!(
            state.registry.entries(),
            &[(Severity::Warning, true), (Severity::Severe, true)]
        );
        assert_eq!(state.filtered_records().len(), 3);
    }

    #[test]
    fn clear_results_drops_the_registry_with_the_records() {
        let mut state = state();
        state.append_record(DiagnosticRecord::new(Severity::Warning, "w"));
        state.append_stdout_line("out".into());
        state.clear_results();

        assert!(state.run_log.raw_lines.is_empty());
        assert!(state.run_log.records.is_empty());
        assert!(state.registry.is_empty());
        assert_eq!(state.stdout_selection.index(), 0);
    }

    #[test]
    fn section_cycle_wraps_both_ways() {
        assert_eq!(Section::About.next(), Section::RunOutput);
        assert_eq!(Section::RunOutput.prev(), Section::About);
        assert_eq!(Section::RunOutput.next(), Section::Diagnostics);
    }
}
