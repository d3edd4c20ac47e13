use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::task_form::help_line;
use super::{centered, render_field};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginMode {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginField {
    Mode,
    Email,
    Password,
    Confirm,
}

#[derive(Debug, Clone)]
pub struct LoginFormState {
    pub mode: LoginMode,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub active_field: LoginField,
    pub error: Option<String>,
}

impl LoginFormState {
    pub fn new(email: &str) -> Self {
        Self {
            mode: LoginMode::SignIn,
            email: email.to_string(),
            password: String::new(),
            confirm: String::new(),
            active_field: LoginField::Email,
            error: None,
        }
    }

    fn fields(&self) -> &'static [LoginField] {
        match self.mode {
            LoginMode::SignIn => &[LoginField::Mode, LoginField::Email, LoginField::Password],
            LoginMode::SignUp => &[
                LoginField::Mode,
                LoginField::Email,
                LoginField::Password,
                LoginField::Confirm,
            ],
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

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::SignIn => LoginMode::SignUp,
            LoginMode::SignUp => LoginMode::SignIn,
        };
        self.confirm.clear();
        self.error = None;
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            LoginField::Mode => {}
            LoginField::Email => self.email.push(c),
            LoginField::Password => self.password.push(c),
            LoginField::Confirm => self.confirm.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            LoginField::Mode => {}
            LoginField::Email => {
                self.email.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
            LoginField::Confirm => {
                self.confirm.pop();
            }
        }
    }
}

pub struct LoginView;

impl LoginView {
    pub fn render(frame: &mut Frame, area: Rect, state: &LoginFormState, active_user: &str) {
        let form_area = centered(area, 50, 11);
        frame.render_widget(Clear, form_area);

        let title = match state.mode {
            LoginMode::SignIn => " Sign in to your account ",
            LoginMode::SignUp => " Create your account ",
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(theme::FORM_ACCENT).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::FORM_ACCENT));
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // signed in as
            Constraint::Length(1), // spacer
            Constraint::Length(1), // mode
            Constraint::Length(1), // email
            Constraint::Length(1), // password
            Constraint::Length(1), // confirm
            Constraint::Length(1), // error
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Signed in as ", theme::DIM_STYLE),
                Span::raw(active_user.to_string()),
            ])),
            rows[0],
        );

        let mode = match state.mode {
            LoginMode::SignIn => "( ) New account",
            LoginMode::SignUp => "(x) New account",
        };
        render_field(frame, rows[2], "", mode, state.active_field == LoginField::Mode);
        render_field(frame, rows[3], "Email:", &state.email, state.active_field == LoginField::Email);
        render_field(
            frame,
            rows[4],
            "Pass:",
            &mask(&state.password),
            state.active_field == LoginField::Password,
        );
        if state.mode == LoginMode::SignUp {
            render_field(
                frame,
                rows[5],
                "Again:",
                &mask(&state.confirm),
                state.active_field == LoginField::Confirm,
            );
        }

        if let Some(ref err) = state.error {
            frame.render_widget(
                Paragraph::new(err.as_str()).style(Style::default().fg(ratatui::style::Color::Red)),
                rows[6],
            );
        }

        let help = help_line(&[("Tab", "Next"), ("Space", "Mode"), ("Enter", "Submit"), ("Esc", "Back")]);
        frame.render_widget(Paragraph::new(help), rows[7]);
    }
}

fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_field_only_in_sign_up() {
        let mut state = LoginFormState::new("");
        state.next_field();
        state.next_field();
        assert_eq!(state.active_field, LoginField::Mode);

        state.toggle_mode();
        state.prev_field();
        assert_eq!(state.active_field, LoginField::Confirm);
        state.input_char('a');
        assert_eq!(state.confirm, "a");

        state.toggle_mode();
        assert_eq!(state.mode, LoginMode::SignIn);
        assert!(state.confirm.is_empty());
    }

    #[test]
    fn mask_hides_every_char() {
        assert_eq!(mask("pässword"), "********");
    }
}
