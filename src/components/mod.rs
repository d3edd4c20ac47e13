pub mod agenda;
pub mod event_form;
pub mod login_view;
pub mod notes_view;
pub mod status_bar;
pub mod task_board;
pub mod task_form;

pub use agenda::Agenda;
pub use event_form::EventForm;
pub use login_view::LoginView;
pub use notes_view::NotesView;
pub use status_bar::StatusBar;
pub use task_board::TaskBoard;
pub use task_form::TaskForm;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

/// A `w` x `h` rect centered in `area`, shrunk to fit.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let label_w = if label.is_empty() { 0 } else { 7 };
    let cursor = if active { "_" } else { "" };

    let style = if active {
        theme::ACTIVE_FIELD_STYLE
    } else {
        Style::default()
    };

    let mut spans = Vec::new();
    if !label.is_empty() {
        spans.push(Span::styled(
            format!("{:<width$}", label, width = label_w),
            theme::DIM_STYLE,
        ));
    }
    spans.push(Span::styled(format!("{}{}", value, cursor), style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
