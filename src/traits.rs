use std::error::Error;

use async_trait::async_trait;

use crate::client::SyncOutcome;
use crate::stats::UserStats;
use crate::task::Task;

/// A source of task data.
///
/// The usual implementation is the REST [`Client`](crate::client::Client); tests (and offline
/// tooling) can substitute an in-memory source.
#[async_trait]
pub trait TaskSource {
    /// Returns every task the current user owns.
    /// This can be a long process, and it can fail (e.g. in case of a remote backend)
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>>;

    /// Whether the user has connected an external calendar account
    async fn calendar_status(&self) -> Result<bool, Box<dyn Error>>;

    /// Push dated tasks to the connected external calendar
    async fn sync_calendar(&self) -> Result<SyncOutcome, Box<dyn Error>>;

    /// The user's gamification counters
    async fn get_stats(&self) -> Result<UserStats, Box<dyn Error>>;
}
