use std::path::Path;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::ModalChoice;
use crate::ui::Theme;

/// Startup modal offered when a completed run's artifacts already exist in
/// the output directory.
pub struct ReloadModal;

impl ReloadModal {
    pub fn render(frame: &mut Frame, output_directory: &Path, choice: ModalChoice) {
        let area = frame.area();

        let path_text = std::path::absolute(output_directory)
            .unwrap_or_else(|_| output_directory.to_path_buf())
            .display()
            .to_string();

        let popup_width = (path_text.len() as u16 + 6)
            .max(46)
            .min(area.width.saturating_sub(4));
        let popup_height = 6.min(area.height.saturating_sub(2));

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let button = |label: &str, selected: bool| {
            let style = if selected {
                Theme::selection_focused().patch(Theme::text_highlight())
            } else {
                Theme::text()
            };
            Span::styled(format!("[ {label} ]"), style)
        };

        let lines = vec![
            Line::from(Span::styled(
                "Previous Results Found on Disk",
                Theme::text_highlight(),
            ))
            .centered(),
            Line::from(Span::styled(path_text, Theme::text_dim())).centered(),
            Line::from(""),
            Line::from(vec![
                button("Reload Results", choice == ModalChoice::Reload),
                Span::styled("   ", Theme::text()),
                button("Start Fresh", choice == ModalChoice::StartFresh),
            ])
            .centered(),
        ];

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused()),
        );
        frame.render_widget(widget, popup_area);
    }
}
