//! Past check-ins of the signed-in user.

use std::sync::Arc;

use ayurpredict_client::retry::RetryPolicy;
use ayurpredict_client::{HistoryItem, PredictionClient};
use chrono::NaiveDate;
use tracing::debug;

use crate::error::{CheckInError, CheckInResult};
use crate::insights::streak_from_dates;
use crate::session::Session;

pub struct HistoryService {
    client: Arc<dyn PredictionClient>,
    session: Arc<Session>,
    read_retry: RetryPolicy,
}

impl HistoryService {
    pub fn new(client: Arc<dyn PredictionClient>, session: Arc<Session>) -> Self {
        Self {
            client,
            session,
            read_retry: RetryPolicy::default(),
        }
    }

    pub fn with_read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    /// Every stored check-in, in the order the service returns them.
    pub async fn fetch(&self) -> CheckInResult<Vec<HistoryItem>> {
        let user_id = self.session.user_id().ok_or(CheckInError::NotLoggedIn)?;
        let client = self.client.clone();
        let items = self
            .read_retry
            .retry_async(move || {
                let client = client.clone();
                async move { client.get_history(user_id).await }
            })
            .await?;
        debug!(user_id, count = items.len(), "history loaded");
        Ok(items)
    }

    /// Current daily streak, counted from the stored check-in timestamps.
    pub async fn streak(&self, today: NaiveDate) -> CheckInResult<u32> {
        let items = self.fetch().await?;
        Ok(streak_from_dates(
            items.iter().map(|i| i.created_at.as_str()),
            today,
        ))
    }
}
