//! Timing and logging around every call to the scoring service.

use std::sync::Arc;
use std::time::Instant;

use ayurpredict_client::{
    DashboardResponse, HistoryItem, PredictError, PredictionClient, PredictionRequest,
    PredictionResponse, StatusResponse, UpdateProfileRequest, UserProfile,
};
use tracing::debug;

/// Wraps a [`PredictionClient`], logging each call and recording its latency
/// as `ayurpredict_call_duration_seconds{operation}`.
#[derive(Clone)]
pub struct LoggingMiddleware<C: PredictionClient> {
    inner: Arc<C>,
}

impl<C: PredictionClient> LoggingMiddleware<C> {
    pub fn new(client: C) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    async fn with_logging<F, Fut, T>(&self, operation: F, name: &'static str) -> Result<T, PredictError>
    where
        F: FnOnce(Arc<C>) -> Fut,
        Fut: std::future::Future<Output = Result<T, PredictError>>,
    {
        let start = Instant::now();
        debug!("Starting operation: {}", name);

        let result = operation(self.inner.clone()).await;

        let duration = start.elapsed();
        metrics::histogram!("ayurpredict_call_duration_seconds", "operation" => name)
            .record(duration.as_secs_f64());
        match &result {
            Ok(_) => debug!("Operation completed successfully: {} in {:?}", name, duration),
            Err(e) => debug!("Operation failed: {} in {:?} - error: {}", name, duration, e),
        }

        result
    }
}

#[async_trait::async_trait]
impl<C: PredictionClient + 'static> PredictionClient for LoggingMiddleware<C> {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictError> {
        self.with_logging(|client| async move { client.predict(request).await }, "predict")
            .await
    }

    async fn get_dashboard(&self, user_id: i64) -> Result<DashboardResponse, PredictError> {
        self.with_logging(
            |client| async move { client.get_dashboard(user_id).await },
            "get_dashboard",
        )
        .await
    }

    async fn get_history(&self, user_id: i64) -> Result<Vec<HistoryItem>, PredictError> {
        self.with_logging(
            |client| async move { client.get_history(user_id).await },
            "get_history",
        )
        .await
    }

    async fn get_profile(&self, user_id: i64) -> Result<UserProfile, PredictError> {
        self.with_logging(
            |client| async move { client.get_profile(user_id).await },
            "get_profile",
        )
        .await
    }

    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<StatusResponse, PredictError> {
        self.with_logging(
            |client| async move { client.update_profile(request).await },
            "update_profile",
        )
        .await
    }
}
