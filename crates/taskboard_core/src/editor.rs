use crate::collection::Collection;
use crate::error::SyncError;
use crate::model::{Task, parse_due_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Open,
    Closed,
}

/// A transient editing session for one record.
///
/// The session holds a fully detached working copy of the editable fields;
/// nothing touches the collection's owned sequence until a commit succeeds,
/// so cancelling is truly a no-op. Session lifecycle:
/// `closed -> open -> { committing -> closed | open (failure) }`.
#[derive(Debug, Clone)]
pub struct EditSession {
    seed: Task,
    title: String,
    description: String,
    due_time: String,
    state: SessionState,
}

impl EditSession {
    /// Begin a session scoped to the given record, seeding the working copy
    /// from it.
    pub fn open(record: &Task) -> Self {
        Self {
            seed: record.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            due_time: record.due_time.clone(),
            state: SessionState::Open,
        }
    }

    pub fn record_id(&self) -> &str {
        &self.seed.id
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_time(&self) -> &str {
        &self.due_time
    }

    pub fn set_title(&mut self, value: &str) {
        self.title = value.to_string();
    }

    pub fn set_description(&mut self, value: &str) {
        self.description = value.to_string();
    }

    pub fn set_due_time(&mut self, value: &str) {
        self.due_time = value.to_string();
    }

    /// Merge the working copy with the seed's id and status into a full
    /// record and push it through `Collection::update`. Success closes the
    /// session; failure leaves it open with the working fields intact and
    /// the owned sequence untouched.
    pub async fn commit(&mut self, collection: &Collection) -> Result<Task, SyncError> {
        if self.state == SessionState::Closed {
            return Err(SyncError::invalid_input("edit session is closed"));
        }

        let title = self.title.trim();
        if title.is_empty() {
            return Err(SyncError::invalid_input("title is required"));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(SyncError::invalid_input("description is required"));
        }
        let merged = Task {
            id: self.seed.id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            status: self.seed.status,
            due_time: parse_due_time(&self.due_time)?,
        };

        let updated = collection.update(merged).await?;
        self.state = SessionState::Closed;
        Ok(updated)
    }

    /// End the session without sending a request.
    pub fn cancel(&mut self) {
        self.state = SessionState::Closed;
    }
}
