//! Shared scripted `PredictionClient` used by unit tests.
#![cfg(test)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use ayurpredict_client::{
    DashboardResponse, DoshaScore, HistoryItem, PredictError, PredictionClient, PredictionRequest,
    PredictionResponse, StatusResponse, Trends, UpdateProfileRequest, UserProfile,
};

#[derive(Default)]
struct Inner {
    predict_calls: AtomicU32,
    dashboard_calls: AtomicU32,
    profile_calls: AtomicU32,
    history_calls: AtomicU32,
    predict_failures: Mutex<VecDeque<PredictError>>,
    dashboard_failures: Mutex<VecDeque<PredictError>>,
    profile_failures: Mutex<VecDeque<PredictError>>,
    history_failures: Mutex<VecDeque<PredictError>>,
    requests: Mutex<Vec<PredictionRequest>>,
    profile_updates: Mutex<Vec<UpdateProfileRequest>>,
    reject_updates: AtomicBool,
    hold_predict: AtomicBool,
    release: Notify,
}

/// Clones share state, so a test can keep a handle after giving one away.
#[derive(Clone, Default)]
pub struct MockClient {
    inner: Arc<Inner>,
}

impl MockClient {
    pub fn fail_predict_once(&self, err: PredictError) {
        self.inner.predict_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_dashboard_once(&self, err: PredictError) {
        self.inner.dashboard_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_profile_once(&self, err: PredictError) {
        self.inner.profile_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_history_once(&self, err: PredictError) {
        self.inner.history_failures.lock().unwrap().push_back(err);
    }

    pub fn reject_profile_updates(&self) {
        self.inner.reject_updates.store(true, Ordering::SeqCst);
    }

    /// Make `predict` wait for [`release_predict`](Self::release_predict).
    pub fn hold_predict(&self) {
        self.inner.hold_predict.store(true, Ordering::SeqCst);
    }

    pub fn release_predict(&self) {
        self.inner.hold_predict.store(false, Ordering::SeqCst);
        self.inner.release.notify_one();
    }

    pub fn predict_calls(&self) -> u32 {
        self.inner.predict_calls.load(Ordering::SeqCst)
    }

    pub fn dashboard_calls(&self) -> u32 {
        self.inner.dashboard_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> u32 {
        self.inner.profile_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> u32 {
        self.inner.history_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<PredictionRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn profile_updates(&self) -> Vec<UpdateProfileRequest> {
        self.inner.profile_updates.lock().unwrap().clone()
    }
}

pub fn sample_dashboard() -> DashboardResponse {
    let score = |v, p, k, at: &str| DoshaScore {
        vata_score: v,
        pitta_score: p,
        kapha_score: k,
        created_at: at.to_string(),
    };
    DashboardResponse {
        current: Some(score(45, 30, 25, "2026-10-17 07:30:00")),
        history: vec![
            score(40, 35, 25, "2026-10-15 07:30:00"),
            score(42, 33, 25, "2026-10-16 07:30:00"),
            score(45, 30, 25, "2026-10-17 07:30:00"),
        ],
        trends: Trends {
            vata_change: 5,
            pitta_change: -5,
            kapha_change: 0,
        },
        streak: 3,
    }
}

/// Newest first, with two check-ins on the 16th and a gap before the 13th.
pub fn sample_history() -> Vec<HistoryItem> {
    let item = |id, dosha: &str, at: &str| HistoryItem {
        id,
        predicted_dosha: dosha.to_string(),
        created_at: at.to_string(),
    };
    vec![
        item(5, "Vata", "2026-10-17 07:30:00"),
        item(4, "Vata", "2026-10-16 21:10:00"),
        item(3, "Pitta", "2026-10-16 07:45:00"),
        item(2, "Pitta", "2026-10-15 08:00:00"),
        item(1, "Kapha", "2026-10-12 08:00:00"),
    ]
}

#[async_trait]
impl PredictionClient for MockClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictError> {
        self.inner.predict_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.requests.lock().unwrap().push(request.clone());
        if self.inner.hold_predict.load(Ordering::SeqCst) {
            self.inner.release.notified().await;
        }
        if let Some(err) = self.inner.predict_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(PredictionResponse {
            dosha: "Vata".into(),
            vata: 45,
            pitta: 30,
            kapha: 25,
            recommendations: vec!["Keep a regular bedtime".into()],
        })
    }

    async fn get_dashboard(&self, _user_id: i64) -> Result<DashboardResponse, PredictError> {
        self.inner.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.inner.dashboard_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(sample_dashboard())
    }

    async fn get_history(&self, _user_id: i64) -> Result<Vec<HistoryItem>, PredictError> {
        self.inner.history_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.inner.history_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(sample_history())
    }

    async fn get_profile(&self, _user_id: i64) -> Result<UserProfile, PredictError> {
        self.inner.profile_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.inner.profile_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(UserProfile {
            name: "Meera".into(),
            email: Some("meera@example.com".into()),
            phone: None,
            gender: Some("Female".into()),
            dob: Some("1994-03-21".into()),
            country: Some("IN".into()),
        })
    }

    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<StatusResponse, PredictError> {
        self.inner.profile_updates.lock().unwrap().push(request.clone());
        if self.inner.reject_updates.load(Ordering::SeqCst) {
            return Err(PredictError::Rejected("Email already in use".into()));
        }
        Ok(StatusResponse {
            status: "success".into(),
            message: "Profile updated".into(),
        })
    }
}
