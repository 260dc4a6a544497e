//! HTTP client implementation for the AyurPredict service.
//!
//! This module provides a reqwest-based implementation of the [`PredictionClient`](crate::PredictionClient) trait.

use crate::{
    DashboardResponse, HistoryItem, PredictError, PredictionClient, PredictionRequest,
    PredictionResponse, StatusResponse, UpdateProfileRequest, UserProfile,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the AyurPredict PHP endpoints using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestPredictionClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestPredictionClient {
    /// Create a client with the default request timeout.
    ///
    /// # Arguments
    /// * `base_url` - Root of the deployment (e.g., "http://10.0.2.2/ayur_predict")
    pub fn new(base_url: &str) -> Result<Self, PredictError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests fail with a timeout error after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, PredictError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictError::Config(format!("building http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Send a request and decode a JSON body, recording the outcome under `endpoint`.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PredictError> {
        debug!(endpoint, "sending request");
        let result = self.send_and_decode(request).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(PredictError::Decode(_)) => "malformed",
            Err(PredictError::Http(_)) => "transport",
            Err(_) => "status",
        };
        metrics::counter!(
            "ayurpredict_client_requests_total",
            "endpoint" => endpoint,
            "outcome" => outcome
        )
        .increment(1);
        if let Err(e) = &result {
            debug!(endpoint, error = %e, "request failed");
        }
        result
    }

    async fn send_and_decode<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PredictError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        // Read body as text first so a shape mismatch reports what the server sent.
        let text = resp.text().await?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(512).collect();
            PredictError::Decode(format!("{e} - body: {body_snippet}"))
        })
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> PredictError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => PredictError::NotFound(body_snippet),
            401 | 403 => PredictError::Auth(body_snippet),
            422 => PredictError::InvalidInput(body_snippet),
            _ => PredictError::from_status(status, body_snippet),
        }
    }
}

#[async_trait]
impl PredictionClient for ReqwestPredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictError> {
        let url = self.url("predict.php");
        self.execute_json("predict", self.client.post(&url).json(request))
            .await
    }

    async fn get_dashboard(&self, user_id: i64) -> Result<DashboardResponse, PredictError> {
        let url = self.url("get_dashboard.php");
        let qp = [("user_id", user_id.to_string())];
        self.execute_json("get_dashboard", self.client.get(&url).query(&qp))
            .await
    }

    async fn get_history(&self, user_id: i64) -> Result<Vec<HistoryItem>, PredictError> {
        let url = self.url("get_history.php");
        let qp = [("user_id", user_id.to_string())];
        self.execute_json("get_history", self.client.get(&url).query(&qp))
            .await
    }

    async fn get_profile(&self, user_id: i64) -> Result<UserProfile, PredictError> {
        let url = self.url("get_profile.php");
        let qp = [("user_id", user_id.to_string())];
        self.execute_json("get_profile", self.client.get(&url).query(&qp))
            .await
    }

    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<StatusResponse, PredictError> {
        let url = self.url("update_profile.php");
        let status: StatusResponse = self
            .execute_json("update_profile", self.client.post(&url).json(request))
            .await?;
        if !status.is_success() {
            return Err(PredictError::Rejected(status.message));
        }
        Ok(status)
    }
}
