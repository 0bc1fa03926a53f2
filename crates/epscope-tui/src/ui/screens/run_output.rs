use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::app::AppState;
use crate::ui::Theme;
use crate::ui::components::{LogView, StatusBar, viewer_hints};

use super::render_header;

/// The Stdout section: run status, progress gauge, and the raw output view.
pub struct RunOutputScreen;

impl RunOutputScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState, progress: i32) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Status + gauge row
                Constraint::Min(1),    // Raw output
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        let position = format!(
            "{}/{}",
            state.stdout_selection.index() + 1,
            state.run_log.raw_lines.len()
        );
        render_header(frame, chunks[0], state, position);

        Self::render_gauge_row(frame, chunks[1], state, progress);

        let items: Vec<&String> = state.run_log.raw_lines.iter().collect();
        let view = LogView::new(items)
            .title(" Stdout ")
            .focused(state.log_focused);
        state.viewport_height = view.render(frame, chunks[2], &mut state.stdout_selection);
        state.panes.log_pane = Some(chunks[2]);
        state.panes.filter_boxes.clear();

        let run_hint = format!("r runs {}", state.input_file.display());
        frame.render_widget(
            StatusBar::new().hints(viewer_hints()).right(run_hint),
            chunks[3],
        );
    }

    fn render_gauge_row(frame: &mut Frame, area: Rect, state: &AppState, progress: i32) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(" Status ", Theme::title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (label, style) = if progress >= 100 {
            (
                "Done",
                Style::default()
                    .fg(Theme::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )
        } else if progress > 0 {
            ("Running", Style::default().fg(Theme::WARNING))
        } else if progress < 0 {
            ("Failed", Theme::error())
        } else {
            ("Pending", Style::default().fg(Theme::PENDING))
        };

        let actions = if progress >= 100 {
            "[o] Open HTML  [c] Clear"
        } else {
            ""
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(10),
                Constraint::Min(20),
                Constraint::Length(actions.len() as u16 + 2),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {label}"), style))),
            chunks[0],
        );

        let gauge = Gauge::default()
            .ratio(f64::from(progress.clamp(0, 100)) / 100.0)
            .label(format!("{} %", progress.max(0)))
            .gauge_style(Theme::gauge());
        frame.render_widget(gauge, chunks[1]);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(actions, Theme::text_dim()))),
            chunks[2],
        );
    }
}
