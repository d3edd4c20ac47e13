use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{InputMode, View};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        view: View,
        input_mode: InputMode,
        user: &str,
        message: Option<&str>,
    ) {
        let w = area.width as usize;

        let mode_str = match view {
            View::Tasks => "[1]Tasks",
            View::Calendar => "[2]Calendar",
            View::Notes => "[3]Notes",
            View::Login => "Account",
        };

        let focus_indicator = match input_mode {
            InputMode::TaskForm => " [Task]",
            InputMode::EventForm => " [Event]",
            InputMode::Filter => " [Filter]",
            InputMode::Editing => " [Writing]",
            InputMode::Login | InputMode::Normal => "",
        };

        let right_text = if let Some(msg) = message {
            format!(" {} ", msg)
        } else {
            hints(view, input_mode, w).to_string()
        };

        let mut left = format!(" {}{} ", mode_str, focus_indicator);
        if w >= 60 {
            left.push_str(&format!("\u{2502} {} ", user));
        }
        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right_text.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme::STATUS_STYLE),
            Span::styled(padding, theme::STATUS_STYLE),
            Span::styled(right_text, theme::STATUS_STYLE),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme::STATUS_STYLE), area);
    }
}

fn hints(view: View, input_mode: InputMode, w: usize) -> &'static str {
    match (view, input_mode) {
        (_, InputMode::TaskForm | InputMode::EventForm | InputMode::Login) => " Tab:Next Enter:Save Esc:Cancel",
        (_, InputMode::Filter) => " 1/2/3:Toggle Esc:Close",
        (_, InputMode::Editing) => " Esc:Done",
        (View::Tasks, _) if w >= 100 => {
            " hl:Day jk:Task [/]:Shift t:Today n:New e:Edit Sp:Done d:Del f:Filter ?:Help q:Quit"
        }
        (View::Tasks, _) if w >= 60 => " hl:Day jk:Task n:New Sp:Done ?:Help q:Quit",
        (View::Calendar, _) if w >= 90 => {
            " hjkl:Nav [/]:Mon t:Today Tab:Event n:New e:Edit d:Del ?:Help q:Quit"
        }
        (View::Calendar, _) if w >= 60 => " hjkl:Nav [/]:Mon n:New ?:Help q:Quit",
        (View::Notes, _) if w >= 60 => " hl:Day i:Write x:Clear ?:Help q:Quit",
        _ => " ?:Help q:Quit",
    }
}
