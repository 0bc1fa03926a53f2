use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use epscope_logs::LevelFilterRegistry;

use crate::ui::Theme;

/// The row of level checkboxes above the diagnostics pane.
///
/// Entries appear in first-seen order; the digit prefix is the toggle key.
/// Fills `hit_boxes` with one rect per entry so clicks can toggle too.
pub struct LevelFilterRow;

impl LevelFilterRow {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        registry: &LevelFilterRegistry,
        hit_boxes: &mut Vec<Rect>,
    ) {
        hit_boxes.clear();

        let mut spans: Vec<Span> = vec![Span::styled(" ", Theme::text())];
        let mut x = area.x + 2; // border + leading space

        for (idx, (level, visible)) in registry.entries().iter().enumerate() {
            let text = format!(
                "{}:[{}] {}",
                idx + 1,
                if *visible { "x" } else { " " },
                level.label()
            );
            let width = text.width() as u16;

            let style = if *visible {
                level.level_style()
            } else {
                Theme::text_dim()
            };
            spans.push(Span::styled(text, style));
            spans.push(Span::styled("  ", Theme::text()));

            if area.height > 2 {
                hit_boxes.push(Rect::new(x, area.y + 1, width, 1));
            }
            x += width + 2;
        }

        if registry.is_empty() {
            spans.push(Span::styled("(no diagnostics yet)", Theme::text_dim()));
        }

        let widget = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" Type ", Theme::title())),
        );
        frame.render_widget(widget, area);
    }
}
