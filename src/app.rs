use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::{
    DateTime, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};

use crate::components::event_form::EventFormState;
use crate::components::login_view::{LoginFormState, LoginMode};
use crate::components::task_form::{TaskFormMode, TaskFormState};
use crate::planner::{
    bucket_by_relative_day, CalendarEvent, DayBucket, EventBook, LocalEvents, LocalTasks, NewEvent,
    Notebook, RelativeDay, Session, Task, TaskList,
};
use crate::planner::session::GUEST_EMAIL;
use crate::storage::SharedStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Tasks,
    Calendar,
    Notes,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    TaskForm,
    EventForm,
    Filter,
    Editing,
    Login,
}

pub struct App {
    pub running: bool,
    pub view: View,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub today: NaiveDate,

    // Tasks view
    pub reference_date: NaiveDate,
    pub focused_day: RelativeDay,
    pub selected_task: usize,
    pub visible_days: [bool; 3],
    pub task_form: Option<TaskFormState>,

    // Calendar view
    pub calendar_date: NaiveDate,
    pub selected_event: usize,
    pub event_form: Option<EventFormState>,

    // Notes view
    pub notes_day: RelativeDay,

    pub login_form: Option<LoginFormState>,
    previous_view: View,

    pub session: Session,
    pub tasks: TaskList<LocalTasks>,
    pub events: EventBook<LocalEvents>,
    pub notebook: Notebook,
    store: SharedStore,
}

impl App {
    pub fn new(store: SharedStore) -> Self {
        let today = Local::now().date_naive();
        let session = Session::new(store.clone());
        let user = session.active_user();
        tracing::info!(user = %user, "starting session");

        Self {
            running: true,
            view: View::Tasks,
            input_mode: InputMode::Normal,
            show_help: false,
            status_message: None,
            today,
            reference_date: today,
            focused_day: RelativeDay::Today,
            selected_task: 0,
            visible_days: [true; 3],
            task_form: None,
            calendar_date: today,
            selected_event: 0,
            event_form: None,
            notes_day: RelativeDay::Today,
            login_form: None,
            previous_view: View::Tasks,
            tasks: TaskList::load(user.clone(), LocalTasks::new(store.clone())),
            events: EventBook::load(user, LocalEvents::new(store.clone())),
            notebook: Notebook::load(store.clone()),
            session,
            store,
        }
    }

    pub fn user(&self) -> &str {
        self.tasks.owner()
    }

    /// Re-read the clock. When the date rolls over, views parked on the old
    /// "today" follow it.
    pub fn on_tick(&mut self) {
        let now = Local::now().date_naive();
        if now == self.today {
            return;
        }
        tracing::debug!(from = %self.today, to = %now, "date rolled over");
        if self.reference_date == self.today {
            self.reference_date = now;
        }
        if self.calendar_date == self.today {
            self.calendar_date = now;
        }
        self.today = now;
        self.clamp_task_selection();
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.input_mode = InputMode::Normal;
    }

    // ── Tasks ──

    pub fn buckets(&self) -> [DayBucket<'_>; 3] {
        bucket_by_relative_day(self.tasks.tasks(), self.reference_date, &Local)
    }

    fn focused_tasks(&self) -> Vec<&Task> {
        let [yesterday, today, tomorrow] = self.buckets();
        match self.focused_day {
            RelativeDay::Yesterday => yesterday.tasks,
            RelativeDay::Today => today.tasks,
            RelativeDay::Tomorrow => tomorrow.tasks,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.focused_tasks().get(self.selected_task).copied()
    }

    fn clamp_task_selection(&mut self) {
        let n = self.focused_tasks().len();
        self.selected_task = self.selected_task.min(n.saturating_sub(1));
    }

    pub fn focus_next_day(&mut self) {
        let mut day = self.focused_day;
        while day != RelativeDay::Tomorrow {
            day = day.next();
            if self.visible_days[day.index()] {
                self.focused_day = day;
                break;
            }
        }
        self.clamp_task_selection();
    }

    pub fn focus_prev_day(&mut self) {
        let mut day = self.focused_day;
        while day != RelativeDay::Yesterday {
            day = day.prev();
            if self.visible_days[day.index()] {
                self.focused_day = day;
                break;
            }
        }
        self.clamp_task_selection();
    }

    pub fn select_next_task(&mut self) {
        let n = self.focused_tasks().len();
        if n > 0 {
            self.selected_task = (self.selected_task + 1).min(n - 1);
        }
    }

    pub fn select_prev_task(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    pub fn shift_reference(&mut self, forward: bool) {
        let days = Days::new(1);
        let next = if forward {
            self.reference_date.checked_add_days(days)
        } else {
            self.reference_date.checked_sub_days(days)
        };
        self.reference_date = next.unwrap_or(self.reference_date);
        self.clamp_task_selection();
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        match self.view {
            View::Calendar => {
                self.calendar_date = self.today;
                self.selected_event = 0;
            }
            _ => {
                self.reference_date = self.today;
                self.clamp_task_selection();
            }
        }
    }

    pub fn toggle_day_visibility(&mut self, day: RelativeDay) {
        let i = day.index();
        self.visible_days[i] = !self.visible_days[i];

        // Move focus off a hidden column when another one is showing.
        if !self.visible_days[self.focused_day.index()] {
            if let Some(&shown) = RelativeDay::ALL.iter().find(|d| self.visible_days[d.index()]) {
                self.focused_day = shown;
            }
        }
        self.clamp_task_selection();
    }

    pub fn open_task_form(&mut self) {
        let due = self.focused_day.date_from(self.reference_date);
        self.task_form = Some(TaskFormState::new(due));
        self.input_mode = InputMode::TaskForm;
    }

    pub fn open_edit_task(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        self.task_form = Some(TaskFormState::edit(task));
        self.input_mode = InputMode::TaskForm;
    }

    pub fn close_task_form(&mut self) {
        self.task_form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_task_form(&mut self) {
        let Some(form) = self.task_form.take() else {
            return;
        };
        if !form.is_valid() {
            self.status_message = Some("Title is required".to_string());
            self.task_form = Some(form);
            return;
        }
        self.input_mode = InputMode::Normal;

        let now = Utc::now();
        match form.mode {
            TaskFormMode::New { due } => {
                let mut draft = form.to_new_task();
                draft.due_date = Some(at_local_time(&Local, due, now));
                let result = self.tasks.add(draft, now).map(|t| t.is_some());
                if self.report("save task", result) == Some(true) {
                    self.status_message = Some("Task added".to_string());
                    self.focused_day = RelativeDay::ALL
                        .into_iter()
                        .find(|d| d.date_from(self.reference_date) == due)
                        .unwrap_or(self.focused_day);
                    self.selected_task = 0;
                }
            }
            TaskFormMode::Edit { id } => {
                let result = self.tasks.update(&id, form.draft);
                if self.report("update task", result) == Some(true) {
                    self.status_message = Some("Task updated".to_string());
                }
            }
        }
        self.clamp_task_selection();
    }

    pub fn toggle_selected_task(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        let result = self.tasks.toggle_complete(&id);
        if self.report("update task", result) == Some(Some(true)) {
            self.status_message = Some("\u{1f389} Nice work, task completed!".to_string());
        }
    }

    pub fn delete_selected_task(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        let result = self.tasks.remove(&id);
        if self.report("delete task", result) == Some(true) {
            self.status_message = Some("Task deleted".to_string());
        }
        self.clamp_task_selection();
    }

    // ── Calendar ──

    pub fn day_events(&self) -> Vec<&CalendarEvent> {
        self.events.events_on(self.calendar_date, &Local)
    }

    pub fn days_with_events(&self) -> BTreeSet<u32> {
        use chrono::Datelike;
        self.events
            .days_with_events(self.calendar_date.year(), self.calendar_date.month(), &Local)
    }

    fn move_calendar(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.calendar_date = date;
            self.selected_event = 0;
        }
    }

    pub fn next_day(&mut self) {
        self.move_calendar(self.calendar_date.succ_opt());
    }

    pub fn prev_day(&mut self) {
        self.move_calendar(self.calendar_date.pred_opt());
    }

    pub fn next_week(&mut self) {
        self.move_calendar(self.calendar_date.checked_add_days(Days::new(7)));
    }

    pub fn prev_week(&mut self) {
        self.move_calendar(self.calendar_date.checked_sub_days(Days::new(7)));
    }

    pub fn next_month(&mut self) {
        self.move_calendar(self.calendar_date.checked_add_months(Months::new(1)));
    }

    pub fn prev_month(&mut self) {
        self.move_calendar(self.calendar_date.checked_sub_months(Months::new(1)));
    }

    pub fn cycle_event(&mut self) {
        let n = self.day_events().len();
        if n > 0 {
            self.selected_event = (self.selected_event + 1) % n;
        }
    }

    fn selected_event_id(&self) -> Option<String> {
        self.day_events().get(self.selected_event).map(|e| e.id.clone())
    }

    pub fn open_event_form(&mut self) {
        self.event_form = Some(EventFormState::new(self.calendar_date));
        self.input_mode = InputMode::EventForm;
    }

    pub fn open_edit_event(&mut self) {
        let Some(id) = self.selected_event_id() else {
            return;
        };
        if let Some(event) = self.events.get(&id) {
            self.event_form = Some(EventFormState::edit(event, self.calendar_date));
            self.input_mode = InputMode::EventForm;
        }
    }

    pub fn close_event_form(&mut self) {
        self.event_form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_event_form(&mut self) {
        let Some(form) = self.event_form.take() else {
            return;
        };
        let Some(date) = form.parsed_date().filter(|_| form.is_valid()) else {
            self.status_message = Some("Title and a YYYY-MM-DD date are required".to_string());
            self.event_form = Some(form);
            return;
        };
        self.input_mode = InputMode::Normal;

        match form.editing {
            Some(ref id) => {
                let result = self.events.update(id, form.to_patch());
                if self.report("update event", result) == Some(true) {
                    self.status_message = Some("Event updated".to_string());
                }
            }
            None => {
                let draft = NewEvent {
                    title: form.title.clone(),
                    description: form.description.clone(),
                    date: local_midnight(&Local, date),
                    color: form.color,
                };
                let result = self.events.add(draft).map(|e| e.is_some());
                if self.report("save event", result) == Some(true) {
                    self.status_message = Some("Event added".to_string());
                    self.calendar_date = date;
                    self.selected_event = 0;
                }
            }
        }
    }

    pub fn delete_selected_event(&mut self) {
        let Some(id) = self.selected_event_id() else {
            self.status_message = Some("No event selected".to_string());
            return;
        };
        let result = self.events.remove(&id);
        if self.report("delete event", result) == Some(true) {
            self.status_message = Some("Event deleted".to_string());
        }
        self.selected_event = self.selected_event.min(self.day_events().len().saturating_sub(1));
    }

    // ── Notes ──

    pub fn notes_next_day(&mut self) {
        self.notes_day = self.notes_day.next();
    }

    pub fn notes_prev_day(&mut self) {
        self.notes_day = self.notes_day.prev();
    }

    pub fn start_writing(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    pub fn notes_input_char(&mut self, c: char) {
        let result = self.notebook.push_char(self.notes_day, c);
        self.report("save notes", result);
    }

    pub fn notes_backspace(&mut self) {
        let result = self.notebook.pop_char(self.notes_day);
        self.report("save notes", result);
    }

    pub fn clear_note(&mut self) {
        let result = self.notebook.set(self.notes_day, String::new());
        if self.report("save notes", result).is_some() {
            self.status_message = Some(format!("{} cleared", self.notes_day.label()));
        }
    }

    // ── Account ──

    pub fn open_login(&mut self) {
        if self.view != View::Login {
            self.previous_view = self.view;
        }
        self.login_form = Some(LoginFormState::new(""));
        self.view = View::Login;
        self.input_mode = InputMode::Login;
    }

    pub fn close_login(&mut self) {
        self.login_form = None;
        self.set_view(self.previous_view);
    }

    pub fn submit_login(&mut self) {
        let Some(form) = self.login_form.as_mut() else {
            return;
        };
        let result = match form.mode {
            LoginMode::SignIn => self.session.log_in(&form.email, &form.password),
            LoginMode::SignUp => self.session.sign_up(&form.email, &form.password, &form.confirm),
        };
        match result {
            Ok(email) => {
                let message = match form.mode {
                    LoginMode::SignIn => "Logged in successfully!",
                    LoginMode::SignUp => "Account created successfully!",
                };
                self.switch_user(email);
                self.status_message = Some(message.to_string());
                self.close_login();
            }
            Err(err) => {
                tracing::warn!(error = %err, "login rejected");
                form.error = Some(err.to_string());
            }
        }
    }

    pub fn sign_out(&mut self) {
        if self.user() == GUEST_EMAIL {
            self.status_message = Some("Already browsing as guest".to_string());
            return;
        }
        let result = self.session.log_out();
        if self.report("sign out", result).is_some() {
            self.switch_user(self.session.active_user());
            self.status_message = Some("Signed out".to_string());
        }
    }

    fn switch_user(&mut self, email: String) {
        self.tasks = TaskList::load(email.clone(), LocalTasks::new(self.store.clone()));
        self.events = EventBook::load(email, LocalEvents::new(self.store.clone()));
        self.selected_task = 0;
        self.selected_event = 0;
    }

    /// Log a failed write and surface it in the status bar.
    fn report<T, E: Display>(&mut self, action: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!(action, error = %err, "write failed");
                self.status_message = Some(format!("Could not {action}: {err}"));
                None
            }
        }
    }
}

/// `date` at the wall-clock time of `now` in `tz`. Always lands on `date`.
fn at_local_time<Tz: TimeZone>(tz: &Tz, date: NaiveDate, now: DateTime<Utc>) -> DateTime<Utc> {
    let time = now.with_timezone(tz).time();
    resolve_local(tz, date.and_time(time))
        .filter(|dt| dt.with_timezone(tz).date_naive() == date)
        .or_else(|| resolve_local(tz, date.and_time(noon())))
        .unwrap_or_else(|| date.and_time(noon()).and_utc())
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    resolve_local(tz, midnight).unwrap_or_else(|| midnight.and_utc())
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Map a local time to UTC, stepping an hour past a DST gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    to_utc(tz, naive).or_else(|| to_utc(tz, naive + TimeDelta::hours(1)))
}

fn to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
