use chrono::{Local, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::centered;
use crate::planner::{DayBucket, RelativeDay, Task};
use crate::theme;

pub struct TaskBoard;

impl TaskBoard {
    /// Draw the visible day columns side by side.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        buckets: &[DayBucket; 3],
        today: NaiveDate,
        focused: RelativeDay,
        selected_index: usize,
        visible: [bool; 3],
    ) {
        let shown: Vec<&DayBucket> = buckets.iter().filter(|b| visible[b.day.index()]).collect();

        if shown.is_empty() {
            let msg = Paragraph::new("All days are hidden. Press f to change the filter.")
                .style(theme::DIM_STYLE)
                .alignment(Alignment::Center);
            frame.render_widget(msg, area);
            return;
        }

        // Narrow terminals stack the columns.
        let constraints = vec![Constraint::Ratio(1, shown.len() as u32); shown.len()];
        let cols = if area.width >= 72 {
            Layout::horizontal(constraints).split(area)
        } else {
            Layout::vertical(constraints).split(area)
        };

        for (bucket, col) in shown.into_iter().zip(cols.iter()) {
            let is_focused = bucket.day == focused;
            render_column(frame, *col, bucket, today, is_focused, selected_index);
        }
    }

    /// Checkbox panel for hiding and showing day columns.
    pub fn render_filter(frame: &mut Frame, area: Rect, visible: [bool; 3]) {
        let popup = centered(area, 30, 7);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Show days ")
            .title_style(theme::HEADER_STYLE)
            .borders(Borders::ALL)
            .border_style(theme::FOCUS_BORDER_STYLE);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines: Vec<Line> = RelativeDay::ALL
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let check = if visible[day.index()] { "[x]" } else { "[ ]" };
                Line::from(vec![
                    Span::styled(format!(" {} ", i + 1), theme::KEY_STYLE),
                    Span::raw(format!("{check} {}", day.label())),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Esc to close", theme::DIM_STYLE)));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn render_column(
    frame: &mut Frame,
    area: Rect,
    bucket: &DayBucket,
    today: NaiveDate,
    focused: bool,
    selected_index: usize,
) {
    let mut header = bucket.date.format("%A, %b %-d").to_string();
    if bucket.date == today {
        header.push_str(" (Today)");
    }
    let accent = theme::day_accent(bucket.date, today);

    let count = bucket.tasks.len();
    let done = bucket.tasks.iter().filter(|t| t.completed).count();
    let footer = if count == 0 {
        String::new()
    } else {
        format!(" {done}/{count} done ")
    };

    let mut block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {header} "),
            Style::default()
                .fg(accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )))
        .title_bottom(Line::from(Span::styled(footer, theme::DIM_STYLE)))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::FOCUS_BORDER_STYLE
        } else {
            theme::BORDER_STYLE
        });
    if focused {
        block = block.title(Line::from(Span::styled(" Selected ", theme::FOCUS_BORDER_STYLE)).right_aligned());
    }

    if bucket.tasks.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let plus = Paragraph::new("+")
            .style(theme::DIM_STYLE.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(plus, inner);
        return;
    }

    let inner_w = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = bucket
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| format_task(task, inner_w, focused && i == selected_index))
        .collect();

    // Keep the selection on screen.
    let rows_per_item = 3;
    let visible_items = (area.height.saturating_sub(2) as usize / rows_per_item).max(1);
    let skip = if focused {
        selected_index.saturating_sub(visible_items - 1)
    } else {
        0
    };

    let list = List::new(items.into_iter().skip(skip).collect::<Vec<_>>()).block(block);
    frame.render_widget(list, area);
}

fn format_task(task: &Task, max_width: usize, selected: bool) -> ListItem<'static> {
    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if selected {
        theme::SELECTED_STYLE
    } else if task.completed {
        theme::DONE_STYLE
    } else {
        Style::default()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(checkbox, if task.completed { theme::DIM_STYLE } else { Style::default() }),
        Span::styled(truncate(&task.title, max_width.saturating_sub(4)), title_style),
    ])];

    if let Some(ref description) = task.description {
        lines.push(Line::from(Span::styled(
            format!("    {}", truncate(description, max_width.saturating_sub(4))),
            theme::DIM_STYLE,
        )));
    }

    if !task.options.is_empty() {
        let mut spans = vec![Span::raw("    ")];
        for option in &task.options {
            spans.push(Span::styled(format!(" {} ", option.text), theme::OPTION_STYLE));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    let created = task.created_at.with_timezone(&Local).format("%-I:%M %p");
    lines.push(Line::from(Span::styled(format!("    {created}"), theme::DIM_STYLE)));

    ListItem::new(lines)
}

fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else if max > 3 {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("café au lait", 20), "café au lait");
        assert_eq!(truncate("café au lait", 7), "café...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
