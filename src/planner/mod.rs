pub mod buckets;
pub mod event;
pub mod event_book;
pub mod notes;
pub mod session;
pub mod task;
pub mod task_list;

pub use buckets::{bucket_by_relative_day, DayBucket, RelativeDay};
pub use event::{CalendarEvent, EventColor, EventPatch, NewEvent};
pub use event_book::{EventBook, LocalEvents};
pub use notes::Notebook;
pub use session::Session;
pub use task::{NewTask, Task, TaskPatch};
pub use task_list::{LocalTasks, TaskList};
