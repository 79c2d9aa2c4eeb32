use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::SyncError;

/// One task record as the collection service stores it. Field names follow
/// the wire format (camelCase JSON keys, `dueTime` an RFC 3339 instant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub due_time: String,
}

/// Create input: a full record minus the server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub due_time: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl std::str::FromStr for TaskStatus {
    type Err = SyncError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(SyncError::invalid_input(format!(
                "unknown status '{other}' (expected pending, in-progress, or completed)"
            ))),
        }
    }
}

/// Presentation color token for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Amber,
    Blue,
    Green,
    Gray,
}

impl StatusColor {
    pub fn ansi(self) -> &'static str {
        match self {
            Self::Amber => "\x1b[38;5;214m",
            Self::Blue => "\x1b[38;5;33m",
            Self::Green => "\x1b[38;5;40m",
            Self::Gray => "\x1b[38;5;248m",
        }
    }
}

pub const ANSI_RESET: &str = "\x1b[0m";

pub fn status_color(status: TaskStatus) -> StatusColor {
    match status {
        TaskStatus::Pending => StatusColor::Amber,
        TaskStatus::InProgress => StatusColor::Blue,
        TaskStatus::Completed => StatusColor::Green,
    }
}

const LOCAL_MINUTE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const LOCAL_SECOND_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const LOCAL_DISPLAY_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Convert a user-entered due time into the wire form: an RFC 3339 UTC
/// instant. Accepts a full RFC 3339 instant or a local wall-clock date-time
/// (`2025-01-01T10:00`, seconds optional) interpreted in the current local
/// offset.
pub fn parse_due_time(raw: &str) -> Result<String, SyncError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyncError::invalid_input("due time is required"));
    }

    let instant = if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        parsed
    } else {
        let local = PrimitiveDateTime::parse(trimmed, LOCAL_SECOND_FORMAT)
            .or_else(|_| PrimitiveDateTime::parse(trimmed, LOCAL_MINUTE_FORMAT))
            .map_err(|_| {
                SyncError::invalid_input(
                    "due time must be RFC 3339 or a local date-time like 2025-01-01T10:00",
                )
            })?;
        local.assume_offset(local_offset())
    };

    instant
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|err| SyncError::invalid_data(err.to_string()))
}

/// Render a wire-form due time as a local wall-clock date-time for display.
pub fn format_due_time_local(due_time: &str) -> Result<String, SyncError> {
    let instant = OffsetDateTime::parse(due_time, &Rfc3339)
        .map_err(|_| SyncError::invalid_data("dueTime must be RFC 3339"))?;
    instant
        .to_offset(local_offset())
        .format(LOCAL_DISPLAY_FORMAT)
        .map_err(|err| SyncError::invalid_data(err.to_string()))
}
