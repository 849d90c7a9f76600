//! This module provides a client to connect to the task backend

use std::error::Error;
use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::stats::UserStats;
use crate::task::{due_date_wire, Priority, Task, TaskId, TaskStatus};
use crate::traits::TaskSource;

/// The request was rejected because the token is missing, expired or invalid.
///
/// Callers usually react by clearing their [`Session`](crate::session::Session) and sending
/// the user back to the login screen.
#[derive(Debug)]
pub struct Unauthorized;

impl Display for Unauthorized {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "the backend rejected the auth token")
    }
}
impl Error for Unauthorized {}

/// Whether an error bubbling out of a client call is an auth rejection
pub fn is_unauthorized(err: &Box<dyn Error>) -> bool {
    err.downcast_ref::<Unauthorized>().is_some()
}


/// What a calendar sync did, as counted by the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Calendar events created
    pub created: u32,
    /// Tasks that could not be pushed
    pub errors: u32,
}

#[derive(Deserialize)]
struct ConnectionStatus {
    connected: bool,
}

#[derive(Deserialize)]
struct AuthUrl {
    auth_url: Url,
}

/// The payload to create a task (the backend mints the ID)
#[derive(Debug, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub priority: Priority,
    #[serde(with = "due_date_wire")]
    pub due_date: Option<NaiveDateTime>,
    pub category: Option<String>,
}

/// A partial task update; `None` fields are left untouched by the backend
#[derive(Debug, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "due_date_wire::serialize")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Serialize)]
struct SyncRequest<'a> {
    task_ids: Option<&'a [TaskId]>,
}


/// A task source that fetches its data from the REST backend
pub struct Client {
    base_url: Url,
    token: Option<String>,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { base_url, token: None })
    }

    /// Attach the bearer token subsequent requests will carry
    pub fn set_token<T: ToString>(&mut self, token: T) {
        self.token = Some(token.to_string());
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Box<dyn Error>> {
        let url = self.base_url.join(path)?;
        let mut builder = reqwest::Client::new()
            .request(method, url.as_str())
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send_and_parse<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, Box<dyn Error>> {
        let res = builder.send().await?;
        if res.status() == StatusCode::UNAUTHORIZED {
            return Err(Box::new(Unauthorized));
        }
        if !res.status().is_success() {
            return Err(format!("Backend returned {}", res.status()).into());
        }
        let parsed = res.json().await?;
        Ok(parsed)
    }

    async fn send(builder: RequestBuilder) -> Result<(), Box<dyn Error>> {
        let res = builder.send().await?;
        if res.status() == StatusCode::UNAUTHORIZED {
            return Err(Box::new(Unauthorized));
        }
        if !res.status().is_success() {
            return Err(format!("Backend returned {}", res.status()).into());
        }
        Ok(())
    }

    /// Fetch every task of the current user
    pub async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let builder = self.request(Method::GET, "tasks")?;
        let tasks: Vec<Task> = Self::send_and_parse(builder).await?;
        log::debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    /// Create a task on the backend, returning the stored record (with its minted ID)
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, Box<dyn Error>> {
        Self::send_and_parse(self.request(Method::POST, "tasks")?.json(draft)).await
    }

    /// Apply a partial update to a task
    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, Box<dyn Error>> {
        let path = format!("tasks/{}", id);
        Self::send_and_parse(self.request(Method::PUT, &path)?.json(patch)).await
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let path = format!("tasks/{}", id);
        Self::send(self.request(Method::DELETE, &path)?).await
    }

    /// Mark a task completed. The backend also awards XP and updates the streak
    pub async fn complete_task(&self, id: &TaskId) -> Result<Task, Box<dyn Error>> {
        let path = format!("tasks/{}/complete", id);
        Self::send_and_parse(self.request(Method::POST, &path)?).await
    }

    /// The URL to send the user to so they can authorize the external calendar account
    pub async fn calendar_auth_url(&self) -> Result<Url, Box<dyn Error>> {
        let reply: AuthUrl = Self::send_and_parse(self.request(Method::GET, "calendar/auth-url")?).await?;
        Ok(reply.auth_url)
    }

    /// Finish the OAuth flow with the code the provider redirected back with
    pub async fn connect_calendar(&self, code: &str) -> Result<(), Box<dyn Error>> {
        let builder = self.request(Method::POST, "calendar/connect")?
            .query(&[("code", code)]);
        Self::send(builder).await
    }

    pub async fn disconnect_calendar(&self) -> Result<(), Box<dyn Error>> {
        Self::send(self.request(Method::DELETE, "calendar/disconnect")?).await
    }

    /// Push tasks to the connected calendar. `task_ids: None` means "all dated tasks"
    pub async fn sync_calendar_tasks(&self, task_ids: Option<&[TaskId]>) -> Result<SyncOutcome, Box<dyn Error>> {
        let builder = self.request(Method::POST, "calendar/sync")?
            .json(&SyncRequest { task_ids });
        let outcome: SyncOutcome = Self::send_and_parse(builder).await?;
        if outcome.errors > 0 {
            log::warn!("Calendar sync created {} events but hit {} errors", outcome.created, outcome.errors);
        } else {
            log::info!("Calendar sync created {} events", outcome.created);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl TaskSource for Client {
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        self.get_tasks().await
    }

    async fn calendar_status(&self) -> Result<bool, Box<dyn Error>> {
        let builder = self.request(Method::GET, "calendar/status")?;
        let status: ConnectionStatus = Self::send_and_parse(builder).await?;
        Ok(status.connected)
    }

    async fn sync_calendar(&self) -> Result<SyncOutcome, Box<dyn Error>> {
        self.sync_calendar_tasks(None).await
    }

    async fn get_stats(&self) -> Result<UserStats, Box<dyn Error>> {
        let builder = self.request(Method::GET, "gamification/stats")?;
        Self::send_and_parse(builder).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_detectable_after_boxing() {
        let err: Box<dyn Error> = Box::new(Unauthorized);
        assert!(is_unauthorized(&err));

        let other: Box<dyn Error> = "some network problem".into();
        assert!(!is_unauthorized(&other));
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..TaskPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "completed" }));
    }

    #[test]
    fn sync_outcome_parses_backend_counts() {
        let outcome: SyncOutcome = serde_json::from_str(r#"{"created": 7, "errors": 1}"#).unwrap();
        assert_eq!(outcome.created, 7);
        assert_eq!(outcome.errors, 1);
    }
}
