mod about;
mod diagnostics;
mod report;
mod run_output;

pub use about::AboutScreen;
pub use diagnostics::DiagnosticsScreen;
pub use report::ReportScreen;
pub use run_output::RunOutputScreen;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::app::{AppState, Section};
use crate::ui::Theme;

/// Shared header: program name, section tabs, the current position in the
/// visible log, and the warning/severe counters.
pub(crate) fn render_header(frame: &mut Frame, area: Rect, state: &AppState, position: String) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let counts = state.run_log.counts;
    let warnings_text = format!("{} warnings", counts.warnings);
    let severes_text = format!("{} severes", counts.severes);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(position.len() as u16 + 2),
            Constraint::Length(warnings_text.len() as u16 + 2),
            Constraint::Length(severes_text.len() as u16 + 1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(" epscope", Theme::title()))),
        chunks[0],
    );

    let tabs = Tabs::new(Section::ALL.iter().map(|s| s.label()))
        .select(state.section.index())
        .style(Theme::text_dim())
        .highlight_style(Theme::text_highlight())
        .divider("│");
    frame.render_widget(tabs, chunks[1]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(position, Theme::text_dim()))),
        chunks[2],
    );

    let warnings_style = if counts.warnings > 0 {
        ratatui::style::Style::default().fg(Theme::WARNING)
    } else {
        Theme::text_dim()
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(warnings_text, warnings_style))),
        chunks[3],
    );

    let severes_style = if counts.severes > 0 {
        Theme::error()
    } else {
        Theme::text_dim()
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(severes_text, severes_style))),
        chunks[4],
    );
}
