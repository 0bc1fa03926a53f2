use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use epscope_types::DiagnosticRecord;

use crate::app::AppState;
use crate::ui::components::{LevelFilterRow, LogView, StatusBar, viewer_hints};

use super::render_header;

/// The eplusout.err section: level checkboxes over the filtered record view.
pub struct DiagnosticsScreen;

impl DiagnosticsScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Level filter checkboxes
                Constraint::Min(1),    // Diagnostics
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        let indices = state.registry.filtered_indices(&state.run_log.records);
        let items: Vec<&DiagnosticRecord> = indices
            .iter()
            .map(|&idx| &state.run_log.records[idx])
            .collect();

        let position = format!(
            "{}/{} [{}]",
            state.diag_selection.index() + usize::from(!items.is_empty()),
            items.len(),
            state.run_log.records.len()
        );
        render_header(frame, chunks[0], state, position);

        LevelFilterRow::render(
            frame,
            chunks[1],
            &state.registry,
            &mut state.panes.filter_boxes,
        );

        let view = LogView::new(items)
            .title(" eplusout.err ")
            .focused(state.log_focused);
        state.viewport_height = view.render(frame, chunks[2], &mut state.diag_selection);
        state.panes.log_pane = Some(chunks[2]);

        frame.render_widget(
            StatusBar::new()
                .hints(viewer_hints())
                .right("1..9 toggles level filters"),
            chunks[3],
        );
    }
}
