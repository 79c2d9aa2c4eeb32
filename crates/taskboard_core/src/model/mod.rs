mod task;

pub use task::{
    ANSI_RESET, StatusColor, Task, TaskDraft, TaskStatus, format_due_time_local, parse_due_time,
    status_color,
};
