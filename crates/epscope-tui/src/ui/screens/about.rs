use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::AppState;
use crate::ui::Theme;
use crate::ui::components::StatusBar;

use super::render_header;

/// The About section: what this is and how to drive it.
pub struct AboutScreen;

impl AboutScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        render_header(frame, chunks[0], state, String::new());

        state.panes.log_pane = None;
        state.panes.filter_boxes.clear();

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  epscope ", Theme::title()),
                Span::styled(env!("CARGO_PKG_VERSION"), Theme::text_dim()),
            ]),
            Line::from(Span::styled(
                "  An interactive console around the EnergyPlus engine",
                Theme::text(),
            )),
            Line::from(""),
            Line::from(Span::styled("  Skipping lines faster", Theme::text_highlight())),
            Line::from("    Tab / Shift+Tab skip by 10% of the log (10 Tabs = all)"),
            Line::from("    PageUp/PageDown switch pages"),
            Line::from("    Home/End jump to the start/end of the log"),
            Line::from("    The mouse wheel scrolls too; clicking a pane focuses it"),
            Line::from(""),
            Line::from(Span::styled("  Sections", Theme::text_highlight())),
            Line::from("    Stdout shows the live engine output with the run gauge"),
            Line::from("    eplusout.err shows classified diagnostics with level filters"),
            Line::from("    Reports summarizes the results database after a successful run"),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border())
                    .title(Span::styled(" About ", Theme::title())),
            ),
            chunks[1],
        );

        frame.render_widget(
            StatusBar::new().hints(vec![("[/]", "Section"), ("?", "Help"), ("q", "Quit")]),
            chunks[2],
        );
    }
}
