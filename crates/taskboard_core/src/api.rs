use reqwest::{Client, StatusCode};

use crate::error::SyncError;
use crate::model::{Task, TaskDraft};

/// HTTP client for the remote collection service. One instance owns one
/// `reqwest::Client`; no retry, timeout, or cancellation policy exists, so a
/// failure is terminal for that attempt.
pub struct TodoApi {
    http: Client,
    host: String,
}

impl TodoApi {
    pub fn new(host: impl Into<String>) -> Self {
        let mut host = host.into();
        while host.ends_with('/') {
            host.pop();
        }
        Self {
            http: Client::new(),
            host,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn collection_url(&self) -> String {
        format!("{}/api/todos", self.host)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/api/todos/{}", self.host, id)
    }

    /// GET the full collection.
    pub async fn list(&self) -> Result<Vec<Task>, SyncError> {
        let res = self.http.get(self.collection_url()).send().await?;
        if !res.status().is_success() {
            return Err(SyncError::server_rejected(res.status().as_u16()));
        }
        res.json::<Vec<Task>>()
            .await
            .map_err(|err| SyncError::invalid_data(err.to_string()))
    }

    /// POST a draft; the response record is authoritative and carries the
    /// server-assigned id.
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, SyncError> {
        let res = self
            .http
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(SyncError::server_rejected(res.status().as_u16()));
        }
        res.json::<Task>()
            .await
            .map_err(|err| SyncError::invalid_data(err.to_string()))
    }

    /// PUT the full record. Any 2xx is success; the response body is ignored.
    pub async fn update(&self, task: &Task) -> Result<(), SyncError> {
        let res = self
            .http
            .put(self.record_url(&task.id))
            .json(task)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(SyncError::server_rejected(res.status().as_u16()));
        }
        Ok(())
    }

    /// DELETE a record. Success is exactly 204; any other status, 2xx
    /// included, is a rejection.
    pub async fn delete(&self, id: &str) -> Result<(), SyncError> {
        let res = self.http.delete(self.record_url(id)).send().await?;
        if res.status() != StatusCode::NO_CONTENT {
            return Err(SyncError::server_rejected(res.status().as_u16()));
        }
        Ok(())
    }
}
