mod app;
mod components;
mod config;
mod event;
mod logging;
mod planner;
mod storage;
mod theme;
mod tui;

use std::rc::Rc;
use std::time::Duration;

use app::{App, InputMode, View};
use color_eyre::Result;
use components::login_view::LoginField;
use components::task_form::TaskField;
use config::Config;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{AppEvent, Events};
use planner::RelativeDay;
use ratatui::layout::{Constraint, Layout, Rect};
use storage::{FileStore, MemoryStore, SharedStore};

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load();
    let data_dir = config.data_dir();
    let log_dir = data_dir.clone().unwrap_or_else(std::env::temp_dir);
    let _log_guard = logging::init(&log_dir, config.log_filter())?;

    let store: SharedStore = match data_dir {
        Some(dir) => {
            let store = FileStore::in_dir(&dir);
            tracing::info!(path = %store.path().display(), "using file storage");
            Rc::new(store)
        }
        None => {
            tracing::warn!("no data directory available, nothing will be saved");
            eprintln!("No data directory found; changes will not be saved.");
            Rc::new(MemoryStore::default())
        }
    };

    let mut app = App::new(store);
    let mut events = Events::new(Duration::from_millis(250), config.tick());

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, &mut events);
    tui::restore()?;
    if let Err(ref err) = result {
        tracing::error!(error = %err, "exiting with error");
    }
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut Events) -> Result<()> {
    while app.running {
        terminal.draw(|frame| draw(frame, app))?;

        let key = match events.next_event()? {
            AppEvent::Key(key) => key,
            AppEvent::Tick => {
                app.on_tick();
                continue;
            }
            AppEvent::Idle => continue,
        };

        // Clear status message on any key
        app.status_message = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            app.running = false;
            continue;
        }

        // Help overlay takes priority
        if app.show_help {
            if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                app.show_help = false;
            }
            continue;
        }

        match app.input_mode {
            InputMode::Normal => handle_normal_input(app, key),
            InputMode::TaskForm => handle_task_form_input(app, key),
            InputMode::EventForm => handle_event_form_input(app, key),
            InputMode::Filter => handle_filter_input(app, key),
            InputMode::Editing => handle_notes_input(app, key),
            InputMode::Login => handle_login_input(app, key),
        }
    }

    Ok(())
}

fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    // Main layout: content + status bar
    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let content = layout[0];

    match app.view {
        View::Tasks | View::Login => {
            let buckets = app.buckets();
            components::TaskBoard::render(
                frame,
                content,
                &buckets,
                app.today,
                app.focused_day,
                app.selected_task,
                app.visible_days,
            );
        }
        View::Calendar => {
            components::Agenda::render(
                frame,
                content,
                app.calendar_date,
                app.today,
                &app.days_with_events(),
                &app.day_events(),
                app.selected_event,
            );
        }
        View::Notes => {
            components::NotesView::render(
                frame,
                content,
                app.notes_day,
                app.notebook.get(app.notes_day),
                app.input_mode == InputMode::Editing,
            );
        }
    }

    if app.input_mode == InputMode::Filter {
        components::TaskBoard::render_filter(frame, area, app.visible_days);
    }
    if let Some(ref form) = app.task_form {
        components::TaskForm::render(frame, area, form);
    }
    if let Some(ref form) = app.event_form {
        components::EventForm::render(frame, area, form);
    }
    if let Some(ref form) = app.login_form {
        components::LoginView::render(frame, area, form, app.user());
    }

    if app.show_help {
        render_help(frame, area);
    }

    components::StatusBar::render(
        frame,
        layout[1],
        app.view,
        app.input_mode,
        app.user(),
        app.status_message.as_deref(),
    );
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    // Keys shared by every view
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => return app.set_view(View::Tasks),
        KeyCode::Char('2') => return app.set_view(View::Calendar),
        KeyCode::Char('3') => return app.set_view(View::Notes),
        KeyCode::Char('L') => return app.open_login(),
        KeyCode::Char('O') => return app.sign_out(),
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        _ => {}
    }

    match app.view {
        View::Tasks => match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.focus_prev_day(),
            KeyCode::Right | KeyCode::Char('l') => app.focus_next_day(),
            KeyCode::Up | KeyCode::Char('k') => app.select_prev_task(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_task(),
            KeyCode::Char('[') => app.shift_reference(false),
            KeyCode::Char(']') => app.shift_reference(true),
            KeyCode::Char('t') => app.go_to_today(),
            KeyCode::Char('n') | KeyCode::Char('a') => app.open_task_form(),
            KeyCode::Char('e') | KeyCode::Enter => app.open_edit_task(),
            KeyCode::Char(' ') => app.toggle_selected_task(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_task(),
            KeyCode::Char('f') => app.input_mode = InputMode::Filter,
            _ => {}
        },
        View::Calendar => match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.prev_day(),
            KeyCode::Right | KeyCode::Char('l') => app.next_day(),
            KeyCode::Up | KeyCode::Char('k') => app.prev_week(),
            KeyCode::Down | KeyCode::Char('j') => app.next_week(),
            KeyCode::Char('[') => app.prev_month(),
            KeyCode::Char(']') => app.next_month(),
            KeyCode::Char('t') => app.go_to_today(),
            KeyCode::Tab => app.cycle_event(),
            KeyCode::Char('n') => app.open_event_form(),
            KeyCode::Char('e') | KeyCode::Enter => app.open_edit_event(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_event(),
            _ => {}
        },
        View::Notes => match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.notes_prev_day(),
            KeyCode::Right | KeyCode::Char('l') => app.notes_next_day(),
            KeyCode::Char('i') | KeyCode::Enter => app.start_writing(),
            KeyCode::Char('x') => app.clear_note(),
            _ => {}
        },
        View::Login => {}
    }
}

fn handle_task_form_input(app: &mut App, key: KeyEvent) {
    let Some(form) = app.task_form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match (key.code, form.active_field) {
        (KeyCode::Esc, _) => app.close_task_form(),
        (KeyCode::Tab, _) => form.next_field(),
        (KeyCode::BackTab, _) => form.prev_field(),
        (KeyCode::Enter, TaskField::NewOption) => {
            form.commit_option();
        }
        (KeyCode::Enter, _) => app.submit_task_form(),
        (KeyCode::Up, TaskField::Options) => form.select_prev_option(),
        (KeyCode::Down, TaskField::Options) => form.select_next_option(),
        (KeyCode::Backspace, _) | (KeyCode::Delete, TaskField::Options) => form.backspace(),
        (KeyCode::Char(c), _) => form.input_char(c),
        _ => {}
    }
}

fn handle_event_form_input(app: &mut App, key: KeyEvent) {
    use components::event_form::FormField;

    let Some(form) = app.event_form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match key.code {
        KeyCode::Esc => app.close_event_form(),
        KeyCode::Enter => app.submit_event_form(),
        KeyCode::Tab => form.next_field(),
        KeyCode::BackTab => form.prev_field(),
        KeyCode::Backspace => form.backspace(),
        // Space cycles the color tag on the color row
        KeyCode::Char(' ') if form.active_field == FormField::Color => form.next_color(),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}

fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('f') => app.input_mode = InputMode::Normal,
        KeyCode::Char('1') => app.toggle_day_visibility(RelativeDay::Yesterday),
        KeyCode::Char('2') => app.toggle_day_visibility(RelativeDay::Today),
        KeyCode::Char('3') => app.toggle_day_visibility(RelativeDay::Tomorrow),
        _ => {}
    }
}

fn handle_notes_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => app.notes_input_char('\n'),
        KeyCode::Tab => app.notes_input_char('\t'),
        KeyCode::Backspace => app.notes_backspace(),
        KeyCode::Char(c) => app.notes_input_char(c),
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    let Some(form) = app.login_form.as_mut() else {
        app.close_login();
        return;
    };

    match key.code {
        KeyCode::Esc => app.close_login(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(' ') if form.active_field == LoginField::Mode => form.toggle_mode(),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_area = components::centered(area, 56, 30);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), theme::KEY_STYLE),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Views", section_style)),
        entry("1/2/3", "Tasks / Calendar / Notes"),
        entry("L", "Sign in or create an account"),
        entry("O", "Sign out"),
        Line::from(""),
        Line::from(Span::styled("Tasks", section_style)),
        entry("h/l", "Focus yesterday / today / tomorrow"),
        entry("j/k", "Select task"),
        entry("[/]", "Shift the days back / forward"),
        entry("t", "Back to today"),
        entry("n", "New task in the focused day"),
        entry("e Enter", "Edit task and its options"),
        entry("Space", "Toggle done"),
        entry("d", "Delete task"),
        entry("f", "Show or hide days"),
        Line::from(""),
        Line::from(Span::styled("Calendar", section_style)),
        entry("hjkl", "Previous/next day and week"),
        entry("[/]", "Previous/next month"),
        entry("Tab", "Select next event of the day"),
        entry("n / e / d", "New / edit / delete event"),
        Line::from(""),
        Line::from(Span::styled("Notes", section_style)),
        entry("h/l", "Yesterday / today / tomorrow"),
        entry("i", "Write (Esc to stop)"),
        entry("x", "Clear the note"),
        Line::from(""),
        entry("q", "Quit"),
        entry("Esc", "Close a popup or stop writing"),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
