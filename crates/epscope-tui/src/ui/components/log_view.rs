use ratatui::{
    Frame,
    layout::{Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use unicode_width::UnicodeWidthStr;

use epscope_types::{DiagnosticRecord, Severity};

use crate::app::SelectionState;
use crate::ui::Theme;

/// One displayable log row: an optional severity plus a message.
pub trait LogLine {
    fn level(&self) -> Option<Severity>;
    fn message(&self) -> &str;
}

impl LogLine for String {
    fn level(&self) -> Option<Severity> {
        None
    }

    fn message(&self) -> &str {
        self
    }
}

impl LogLine for DiagnosticRecord {
    fn level(&self) -> Option<Severity> {
        Some(self.level)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// What one display row holds: a separator between level groups, or an item.
enum Row {
    Separator,
    Item(usize),
}

/// Bounded viewport over a classified-or-plain sequence with a highlighted
/// selection. One implementation serves both the raw stdout view and the
/// filtered diagnostics view.
pub struct LogView<'a, T: LogLine> {
    items: Vec<&'a T>,
    title: &'a str,
    focused: bool,
}

impl<'a, T: LogLine> LogView<'a, T> {
    pub fn new(items: Vec<&'a T>) -> Self {
        Self {
            items,
            title: " Log ",
            focused: false,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Render into `area`, re-clamping the selection to the item count.
    /// Returns the inner viewport height so the caller can wire paging.
    pub fn render(self, frame: &mut Frame, area: Rect, selection: &mut SelectionState) -> usize {
        selection.set_length(self.items.len());

        let leveled = self.items.iter().any(|item| item.level().is_some());
        let level_width = self
            .items
            .iter()
            .filter_map(|item| item.level())
            .map(|level| level.label().width())
            .max()
            .unwrap_or(0)
            .max("Type".width());

        // Display rows: a separator opens every new level group, except in
        // front of continuations.
        let mut rows: Vec<Row> = Vec::with_capacity(self.items.len());
        let mut item_rows: Vec<usize> = Vec::with_capacity(self.items.len());
        let mut prev_level = self.items.first().and_then(|item| item.level());
        for (idx, item) in self.items.iter().enumerate() {
            if let Some(level) = item.level() {
                if idx > 0 && level != Severity::Continue && prev_level != Some(level) {
                    rows.push(Row::Separator);
                }
                prev_level = Some(level);
            }
            item_rows.push(rows.len());
            rows.push(Row::Item(idx));
        }

        // borders plus the header line
        let inner_height = area.height.saturating_sub(3).max(1) as usize;

        // window centered on the selected row
        let selected_row = item_rows.get(selection.index()).copied().unwrap_or(0);
        let max_offset = rows.len().saturating_sub(inner_height);
        let offset = selected_row
            .saturating_sub(inner_height / 2)
            .min(max_offset);

        let inner_width = area.width.saturating_sub(2) as usize;
        let mut lines: Vec<Line> = Vec::with_capacity(inner_height + 1);
        lines.push(self.header_line(leveled, level_width));

        for row in rows.iter().skip(offset).take(inner_height) {
            lines.push(match row {
                Row::Separator => Line::from(Span::styled(
                    "─".repeat(inner_width),
                    Theme::text_dim(),
                )),
                Row::Item(idx) => self.item_line(*idx, selection.index(), leveled, level_width),
            });
        }

        if self.items.is_empty() {
            lines.push(Line::from(Span::styled("(empty)", Theme::text_dim())));
        }

        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(self.title, Theme::title())),
        );
        frame.render_widget(widget, area);

        if rows.len() > inner_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max_offset)
                .position(offset);
            frame.render_stateful_widget(
                scrollbar,
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        inner_height
    }

    fn header_line(&self, leveled: bool, level_width: usize) -> Line<'static> {
        if leveled {
            Line::from(vec![
                Span::styled(format!("{:<level_width$}", "Type"), Theme::title()),
                Span::styled(" │ ", Theme::text_dim()),
                Span::styled("Message", Theme::title()),
            ])
        } else {
            Line::from(Span::styled("Message", Theme::title()))
        }
    }

    fn item_line(
        &self,
        idx: usize,
        selected: usize,
        leveled: bool,
        level_width: usize,
    ) -> Line<'static> {
        let item = self.items[idx];
        let emphasis = if idx == selected {
            if self.focused {
                Theme::selection_focused()
            } else {
                Theme::selection_unfocused()
            }
        } else {
            ratatui::style::Style::default()
        };

        match (leveled, item.level()) {
            (true, Some(level)) => Line::from(vec![
                Span::styled(
                    format!("{:<level_width$}", level.label()),
                    level.level_style().patch(emphasis),
                ),
                Span::styled(" │ ", Theme::text_dim().patch(emphasis)),
                Span::styled(
                    item.message().to_string(),
                    level.line_style().patch(emphasis),
                ),
            ]),
            _ => Line::from(Span::styled(
                item.message().to_string(),
                Theme::text().patch(emphasis),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_lines_have_no_level() {
        let line = String::from("plain output");
        assert_eq!(LogLine::level(&line), None);
        assert_eq!(LogLine::message(&line), "plain output");
    }

    #[test]
    fn records_expose_their_level() {
        let record = DiagnosticRecord::new(Severity::Severe, "bad");
        assert_eq!(LogLine::level(&record), Some(Severity::Severe));
        assert_eq!(LogLine::message(&record), "bad");
    }
}
