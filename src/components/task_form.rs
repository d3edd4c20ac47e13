use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{centered, render_field};
use crate::planner::{NewTask, Task, TaskPatch};
use crate::theme;

#[derive(Debug, Clone, PartialEq)]
pub enum TaskFormMode {
    New { due: NaiveDate },
    Edit { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskField {
    Title,
    Description,
    NewOption,
    Options,
}

#[derive(Debug, Clone)]
pub struct TaskFormState {
    pub mode: TaskFormMode,
    pub draft: TaskPatch,
    pub new_option: String,
    pub option_index: usize,
    pub active_field: TaskField,
}

impl TaskFormState {
    pub fn new(due: NaiveDate) -> Self {
        Self {
            mode: TaskFormMode::New { due },
            draft: TaskPatch::default(),
            new_option: String::new(),
            option_index: 0,
            active_field: TaskField::Title,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            mode: TaskFormMode::Edit {
                id: task.id.clone(),
            },
            draft: TaskPatch::from_task(task),
            new_option: String::new(),
            option_index: 0,
            active_field: TaskField::Title,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, TaskFormMode::Edit { .. })
    }

    // New tasks only take a title and a description; options come with editing.
    fn fields(&self) -> &'static [TaskField] {
        if self.is_edit() {
            &[
                TaskField::Title,
                TaskField::Description,
                TaskField::NewOption,
                TaskField::Options,
            ]
        } else {
            &[TaskField::Title, TaskField::Description]
        }
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.active_field).unwrap_or(0);
        self.active_field = fields[(i + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.active_field).unwrap_or(0);
        self.active_field = fields[(i + fields.len() - 1) % fields.len()];
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            TaskField::Title => self.draft.title.push(c),
            TaskField::Description => self.draft.description.push(c),
            TaskField::NewOption => self.new_option.push(c),
            TaskField::Options => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            TaskField::Title => {
                self.draft.title.pop();
            }
            TaskField::Description => {
                self.draft.description.pop();
            }
            TaskField::NewOption => {
                self.new_option.pop();
            }
            TaskField::Options => self.remove_selected_option(),
        }
    }

    /// Move the typed option into the draft's option list.
    pub fn commit_option(&mut self) -> bool {
        let added = self.draft.add_option(&self.new_option);
        if added {
            self.new_option.clear();
            self.option_index = self.draft.options.len() - 1;
        }
        added
    }

    pub fn remove_selected_option(&mut self) {
        let Some(id) = self.draft.options.get(self.option_index).map(|o| o.id.clone()) else {
            return;
        };
        self.draft.remove_option(&id);
        self.option_index = self.option_index.min(self.draft.options.len().saturating_sub(1));
    }

    pub fn select_next_option(&mut self) {
        if !self.draft.options.is_empty() {
            self.option_index = (self.option_index + 1) % self.draft.options.len();
        }
    }

    pub fn select_prev_option(&mut self) {
        let n = self.draft.options.len();
        if n > 0 {
            self.option_index = (self.option_index + n - 1) % n;
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.draft.title.trim().is_empty()
    }

    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.draft.title.clone(),
            description: self.draft.description.clone(),
            due_date: None,
        }
    }
}

pub struct TaskForm;

impl TaskForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &TaskFormState) {
        let (title, height) = match &state.mode {
            TaskFormMode::New { due } => (format!(" New Task for {} ", due.format("%a, %b %d")), 8),
            TaskFormMode::Edit { .. } => (" Edit Task ".to_string(), 14),
        };
        let form_area = centered(area, 56, height);
        frame.render_widget(Clear, form_area);

        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(theme::FORM_ACCENT).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::FORM_ACCENT));
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // description
            Constraint::Length(1), // new option
            Constraint::Min(0),    // options
            Constraint::Length(1), // help
        ])
        .split(inner);

        render_field(frame, rows[0], "Title:", &state.draft.title, state.active_field == TaskField::Title);
        render_field(
            frame,
            rows[1],
            "Notes:",
            &state.draft.description,
            state.active_field == TaskField::Description,
        );

        if state.is_edit() {
            render_field(
                frame,
                rows[2],
                "Add:",
                &state.new_option,
                state.active_field == TaskField::NewOption,
            );
            render_options(frame, rows[3], state);
        }

        let help = if state.active_field == TaskField::NewOption {
            help_line(&[("Enter", "Add option"), ("Tab", "Next"), ("Esc", "Cancel")])
        } else if state.active_field == TaskField::Options {
            help_line(&[("\u{2191}\u{2193}", "Pick"), ("Bksp", "Remove"), ("Enter", "Save")])
        } else {
            help_line(&[("Tab", "Next"), ("Enter", "Save"), ("Esc", "Cancel")])
        };
        frame.render_widget(Paragraph::new(help), rows[4]);
    }
}

fn render_options(frame: &mut Frame, area: Rect, state: &TaskFormState) {
    let focused = state.active_field == TaskField::Options;
    let mut lines = vec![Line::from(Span::styled(
        format!("Options ({})", state.draft.options.len()),
        if focused { theme::ACTIVE_FIELD_STYLE } else { theme::DIM_STYLE },
    ))];

    for (i, option) in state.draft.options.iter().enumerate() {
        let style = if focused && i == state.option_index {
            theme::SELECTED_STYLE
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(" \u{2022} ", theme::DIM_STYLE),
            Span::styled(option.text.clone(), style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

pub(super) fn help_line(keys: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, action) in keys {
        spans.push(Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(format!(":{action} "), theme::DIM_STYLE));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> TaskFormState {
        TaskFormState::new(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap())
    }

    #[test]
    fn new_form_only_cycles_title_and_description() {
        let mut state = form();
        state.next_field();
        assert_eq!(state.active_field, TaskField::Description);
        state.next_field();
        assert_eq!(state.active_field, TaskField::Title);
        state.prev_field();
        assert_eq!(state.active_field, TaskField::Description);
    }

    #[test]
    fn typing_goes_to_active_field() {
        let mut state = form();
        for c in "Buy".chars() {
            state.input_char(c);
        }
        state.next_field();
        state.input_char('x');
        state.backspace();
        state.input_char('2');
        assert_eq!(state.draft.title, "Buy");
        assert_eq!(state.draft.description, "2");
        assert!(state.is_valid());
    }

    #[test]
    fn options_commit_select_and_remove() {
        let mut state = form();
        state.mode = TaskFormMode::Edit { id: "1".to_string() };
        state.draft.title = "Breakfast".to_string();

        state.new_option = "idli".to_string();
        assert!(state.commit_option());
        state.new_option = "dosa".to_string();
        assert!(state.commit_option());
        state.new_option = "  ".to_string();
        assert!(!state.commit_option());
        assert_eq!(state.option_index, 1);

        state.select_next_option();
        assert_eq!(state.option_index, 0);
        state.remove_selected_option();
        let texts: Vec<&str> = state.draft.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["dosa"]);

        state.remove_selected_option();
        state.remove_selected_option();
        assert!(state.draft.options.is_empty());
        assert_eq!(state.option_index, 0);
    }
}
