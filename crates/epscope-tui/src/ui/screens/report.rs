use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use epscope_sql::UNMET_HOURS_COLUMNS;

use crate::app::{AppState, ReportData, ReportState};
use crate::ui::Theme;
use crate::ui::components::StatusBar;

use super::render_header;

/// The Reports section: summary tables from the results database after a
/// successful run.
pub struct ReportScreen;

impl ReportScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState, progress: i32) {
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

        if progress >= 100 {
            state.load_report();
        }

        match &state.report {
            ReportState::NotLoaded => Self::render_message(
                frame,
                chunks[1],
                "NOTHING TO SHOW",
                Theme::text_dim().into(),
            ),
            ReportState::Missing(path) => {
                let lines = vec![
                    Line::from(format!(
                        "The run appears to have been successful but there is no SQL file at {}",
                        path.display()
                    )),
                    Line::from("Try adding the following to your IDF:"),
                    Line::from(""),
                    Line::from(Span::styled("  Output:SQLite,", Theme::text_highlight())),
                    Line::from(Span::styled(
                        "     SimpleAndTabular;",
                        Theme::text_highlight(),
                    )),
                ];
                frame.render_widget(
                    Paragraph::new(lines).block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Theme::border()),
                    ),
                    chunks[1],
                );
            }
            ReportState::Failed(message) => {
                Self::render_message(frame, chunks[1], message, Some(Theme::error()))
            }
            ReportState::Loaded(data) => Self::render_tables(frame, chunks[1], data),
        }

        frame.render_widget(
            StatusBar::new().hints(vec![("[/]", "Section"), ("?", "Help"), ("q", "Quit")]),
            chunks[2],
        );
    }

    fn render_message(
        frame: &mut Frame,
        area: Rect,
        message: &str,
        style: Option<ratatui::style::Style>,
    ) {
        let line = Line::from(Span::styled(
            message.to_string(),
            style.unwrap_or_else(Theme::text_dim),
        ))
        .centered();
        let vertical_pad = area.height.saturating_sub(1) / 2;
        let mut lines = vec![Line::from(""); vertical_pad as usize];
        lines.push(line);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            ),
            area,
        );
    }

    fn render_tables(frame: &mut Frame, area: Rect, data: &ReportData) {
        let unmet_height = data.unmet_hours.len() as u16 + 3;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(unmet_height.min(12)),
                Constraint::Min(4),
            ])
            .split(area);

        // High level info
        let info_rows = vec![
            Row::new(vec![
                "EnergyPlus Version".to_string(),
                data.version.clone(),
                String::new(),
            ]),
            Row::new(vec![
                "Net Site Energy".to_string(),
                data.net_site_energy
                    .map(|value| format!("{value:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
                "GJ".to_string(),
            ]),
        ];
        let info = Table::new(
            info_rows,
            [
                Constraint::Length(24),
                Constraint::Min(16),
                Constraint::Length(6),
            ],
        )
        .header(Row::new(vec!["Item", "Value", "Units"]).style(Theme::title()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" High Level Info ", Theme::title())),
        );
        frame.render_widget(info, chunks[0]);

        // Unmet hours
        let unmet_rows: Vec<Row> = data
            .unmet_hours
            .iter()
            .map(|row| {
                Row::new(vec![
                    row.zone_name.clone(),
                    format!("{:.2}", row.during_heating),
                    format!("{:.2}", row.during_cooling),
                    format!("{:.2}", row.during_occ_heating),
                    format!("{:.2}", row.during_occ_cooling),
                ])
            })
            .collect();
        let mut unmet_header = vec!["Zone Name"];
        unmet_header.extend(UNMET_HOURS_COLUMNS);
        let unmet = Table::new(
            unmet_rows,
            [
                Constraint::Min(16),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(24),
                Constraint::Length(24),
            ],
        )
        .header(Row::new(unmet_header).style(Theme::title()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" Unmet Hours ", Theme::title())),
        );
        frame.render_widget(unmet, chunks[1]);

        // End uses by fuel
        let mut end_use_header = vec!["End Use".to_string()];
        end_use_header.extend(data.end_uses.fuel_names.iter().cloned());
        let end_use_rows: Vec<Row> = data
            .end_uses
            .end_use_names
            .iter()
            .zip(&data.end_uses.values)
            .map(|(name, values)| {
                let mut cells = vec![name.clone()];
                cells.extend(values.iter().map(|value| format!("{value:.2}")));
                Row::new(cells)
            })
            .collect();
        let mut widths = vec![Constraint::Min(20)];
        widths.extend(
            data.end_uses
                .fuel_names
                .iter()
                .map(|name| Constraint::Length(name.len().max(10) as u16 + 2)),
        );
        let end_uses = Table::new(end_use_rows, widths)
            .header(Row::new(end_use_header).style(Theme::title()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border())
                    .title(Span::styled(" End Use by Fuel ", Theme::title())),
            );
        frame.render_widget(end_uses, chunks[2]);
    }
}
