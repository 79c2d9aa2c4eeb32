use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::api::TodoApi;
use crate::error::SyncError;
use crate::model::{Task, TaskDraft, TaskStatus, parse_due_time};

#[derive(Default)]
struct Inner {
    records: Vec<Task>,
    creating: bool,
    syncing: HashSet<String>,
}

/// Owner of the local record sequence. All four remote operations go through
/// here, and local state is patched only after the server confirms a change;
/// a failed request leaves the sequence exactly as it was.
///
/// `creating` and the per-record `syncing` set are real guards, not advisory
/// flags: a duplicate submission against an in-flight record gets a typed
/// `busy` error. The lock is held for local inspection and patching only,
/// never across a network await.
#[derive(Clone)]
pub struct Collection {
    api: Arc<TodoApi>,
    inner: Arc<Mutex<Inner>>,
}

impl Collection {
    pub fn new(api: TodoApi) -> Self {
        Self {
            api: Arc::new(api),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Read the full collection and replace the local sequence wholesale.
    /// On failure the sequence is left empty and the failure is logged; there
    /// is no retry.
    pub async fn load(&self) -> Result<(), SyncError> {
        match self.api.list().await {
            Ok(records) => {
                self.inner.lock().await.records = records;
                Ok(())
            }
            Err(err) => {
                error!("failed to load the todo collection: {err}");
                self.inner.lock().await.records.clear();
                Err(err)
            }
        }
    }

    /// Clone of the current sequence, for rendering.
    pub async fn snapshot(&self) -> Vec<Task> {
        self.inner.lock().await.records.clone()
    }

    pub async fn get(&self, id: &str) -> Result<Task, SyncError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(SyncError::invalid_input("id is required"));
        }

        self.inner
            .lock()
            .await
            .records
            .iter()
            .find(|task| task.id == trimmed)
            .cloned()
            .ok_or_else(|| SyncError::not_found(format!("no record with id '{trimmed}'")))
    }

    /// Create a record from a draft. The draft is borrowed and never
    /// modified; on success the server-returned record (authoritative,
    /// carries the assigned id) is appended to the sequence.
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, SyncError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(SyncError::invalid_input("title is required"));
        }
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(SyncError::invalid_input("description is required"));
        }
        let outgoing = TaskDraft {
            title: title.to_string(),
            description: description.to_string(),
            status: draft.status,
            due_time: parse_due_time(&draft.due_time)?,
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.creating {
                return Err(SyncError::busy("a create is already in flight"));
            }
            inner.creating = true;
        }

        let result = self.api.create(&outgoing).await;

        let mut inner = self.inner.lock().await;
        inner.creating = false;
        let created = result?;
        if inner.records.iter().any(|task| task.id == created.id) {
            return Err(SyncError::invalid_data(format!(
                "create returned duplicate id '{}'",
                created.id
            )));
        }
        inner.records.push(created.clone());
        Ok(created)
    }

    /// Change one record's status. The local record keeps its pre-call
    /// status until the server confirms the full-record update.
    pub async fn change_status(
        &self,
        id: &str,
        new_status: TaskStatus,
    ) -> Result<Task, SyncError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(SyncError::invalid_input("id is required"));
        }

        let updated = {
            let mut inner = self.inner.lock().await;
            if inner.syncing.contains(trimmed) {
                return Err(SyncError::busy(format!(
                    "record '{trimmed}' has a request in flight"
                )));
            }
            let mut updated = inner
                .records
                .iter()
                .find(|task| task.id == trimmed)
                .cloned()
                .ok_or_else(|| SyncError::not_found(format!("no record with id '{trimmed}'")))?;
            updated.status = new_status;
            inner.syncing.insert(trimmed.to_string());
            updated
        };

        let result = self.api.update(&updated).await;

        let mut inner = self.inner.lock().await;
        inner.syncing.remove(trimmed);
        result?;
        self.merge_confirmed(&mut inner, &updated);
        Ok(updated)
    }

    /// Full-record update used by the record editor. Same guard and
    /// confirm-then-merge discipline as `change_status`.
    pub async fn update(&self, task: Task) -> Result<Task, SyncError> {
        if task.id.trim().is_empty() {
            return Err(SyncError::invalid_input("id is required"));
        }

        {
            let mut inner = self.inner.lock().await;
            if inner.syncing.contains(&task.id) {
                return Err(SyncError::busy(format!(
                    "record '{}' has a request in flight",
                    task.id
                )));
            }
            if !inner.records.iter().any(|record| record.id == task.id) {
                return Err(SyncError::not_found(format!(
                    "no record with id '{}'",
                    task.id
                )));
            }
            inner.syncing.insert(task.id.clone());
        }

        let result = self.api.update(&task).await;

        let mut inner = self.inner.lock().await;
        inner.syncing.remove(&task.id);
        result?;
        self.merge_confirmed(&mut inner, &task);
        Ok(task)
    }

    /// Delete a record. Success is exactly HTTP 204; anything else leaves the
    /// local sequence unchanged.
    pub async fn delete(&self, id: &str) -> Result<Task, SyncError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(SyncError::invalid_input("id is required"));
        }

        let removed = {
            let mut inner = self.inner.lock().await;
            if inner.syncing.contains(trimmed) {
                return Err(SyncError::busy(format!(
                    "record '{trimmed}' has a request in flight"
                )));
            }
            let record = inner
                .records
                .iter()
                .find(|task| task.id == trimmed)
                .cloned()
                .ok_or_else(|| SyncError::not_found(format!("no record with id '{trimmed}'")))?;
            inner.syncing.insert(trimmed.to_string());
            record
        };

        let result = self.api.delete(trimmed).await;

        let mut inner = self.inner.lock().await;
        inner.syncing.remove(trimmed);
        result?;
        inner.records.retain(|task| task.id != trimmed);
        Ok(removed)
    }

    fn merge_confirmed(&self, inner: &mut Inner, updated: &Task) {
        match inner.records.iter_mut().find(|task| task.id == updated.id) {
            Some(slot) => *slot = updated.clone(),
            // Deleted while the update was in flight; the server accepted the
            // write, the local sequence just no longer carries the row.
            None => warn!(
                id = updated.id.as_str(),
                "record vanished during an update; merge skipped"
            ),
        }
    }
}
