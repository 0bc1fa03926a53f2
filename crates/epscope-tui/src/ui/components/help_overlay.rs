use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let area = frame.area();

        // Center the help popup
        let popup_width = 52.min(area.width.saturating_sub(4));
        let popup_height = 22.min(area.height.saturating_sub(4));

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Navigation",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line("k/↑", "Line up"),
            Self::key_line("j/↓", "Line down"),
            Self::key_line("PgUp/PgDn", "Page"),
            Self::key_line("Home/End", "Start / end of log"),
            Self::key_line("Tab", "Skip forward 10%"),
            Self::key_line("Shift+Tab", "Skip backward 10%"),
            Self::key_line("[/]", "Previous / next section"),
            Self::key_line("F1..F4", "Jump to section"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Actions",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line("r", "Run the simulation"),
            Self::key_line("o", "Open the HTML report"),
            Self::key_line("c", "Clear results"),
            Self::key_line("R", "Reload results from disk"),
            Self::key_line("1..9", "Toggle level filter (err tab)"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>10}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
