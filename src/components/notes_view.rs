use chrono::{Local, NaiveDate};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::planner::RelativeDay;
use crate::theme;

pub struct NotesView;

impl NotesView {
    pub fn render(frame: &mut Frame, area: Rect, day: RelativeDay, text: &str, editing: bool) {
        let today: NaiveDate = Local::now().date_naive();
        let left = if day == RelativeDay::Yesterday { "   " } else { " < " };
        let right = if day == RelativeDay::Tomorrow { "   " } else { " > " };

        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(left, theme::DIM_STYLE),
                Span::styled(day.label(), theme::HEADER_STYLE),
                Span::styled(right, theme::DIM_STYLE),
            ]))
            .title(
                Line::from(Span::styled(
                    format!(" {} ", today.format("%a, %b %-d, %Y")),
                    theme::DIM_STYLE,
                ))
                .right_aligned(),
            )
            .title_bottom(Line::from(Span::styled(
                if editing { " editing, Esc to stop " } else { "" },
                theme::DIM_STYLE,
            )))
            .borders(Borders::ALL)
            .border_style(if editing {
                theme::FOCUS_BORDER_STYLE
            } else {
                theme::BORDER_STYLE
            });

        let cursor = if editing { "_" } else { "" };
        let mut lines: Vec<Line> = text.split('\n').map(|l| Line::from(l.to_string())).collect();
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled(cursor, Style::default().fg(ratatui::style::Color::Cyan)));
        }
        if text.is_empty() && !editing {
            lines = vec![Line::from(Span::styled("Press i to write", theme::DIM_STYLE))];
        }

        let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(para, area);
    }
}
