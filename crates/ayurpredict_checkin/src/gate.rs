//! One-shot submission of a check-in to the scoring service.
//!
//! The gate moves `Idle -> Submitting -> Success | Failed`. At most one
//! request is in flight: a `submit` issued while another is pending is
//! ignored. `Success` and `Failed` accept a fresh `submit` at any time.
//!
//! [`clear`](SubmissionGate::clear) starts a new generation. A request still
//! in flight from an older generation keeps the gate busy until it returns,
//! and its outcome is then discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ayurpredict_client::retry::RetryPolicy;
use ayurpredict_client::{DashboardResponse, PredictionClient, PredictionResponse};
use tokio::sync::watch;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::error::{CheckInError, CheckInResult, FailureKind};
use crate::mapper::{PayloadDefaults, ScoreVector};
use crate::session::Session;
use crate::snapshot::CheckInSnapshot;

#[derive(Clone, Debug, PartialEq)]
pub enum GateState {
    Idle,
    Submitting,
    Success(PredictionResponse),
    Failed {
        kind: FailureKind,
        /// Description of the transport, decoding or identity failure.
        message: String,
    },
}

impl GateState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, GateState::Submitting)
    }

    pub fn result(&self) -> Option<&PredictionResponse> {
        match self {
            GateState::Success(r) => Some(r),
            _ => None,
        }
    }
}

pub struct SubmissionGate {
    client: Arc<dyn PredictionClient>,
    session: Arc<Session>,
    snapshot: watch::Receiver<CheckInSnapshot>,
    defaults: PayloadDefaults,
    read_retry: RetryPolicy,
    state: watch::Sender<GateState>,
    dashboard: watch::Sender<Option<DashboardResponse>>,
    generation: AtomicU64,
}

/// Puts the gate back to `Idle` if a submission future is dropped before it finishes.
struct InFlight<'a> {
    state: &'a watch::Sender<GateState>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            let reset = self.state.send_if_modified(|s| {
                if s.is_submitting() {
                    *s = GateState::Idle;
                    true
                } else {
                    false
                }
            });
            if reset {
                warn!("submission cancelled before completion");
            }
        }
    }
}

impl SubmissionGate {
    /// `snapshot` is read at the moment a submission starts, never earlier.
    pub fn new(
        client: Arc<dyn PredictionClient>,
        session: Arc<Session>,
        snapshot: watch::Receiver<CheckInSnapshot>,
    ) -> Self {
        Self {
            client,
            session,
            snapshot,
            defaults: PayloadDefaults::default(),
            read_retry: RetryPolicy::default(),
            state: watch::Sender::new(GateState::Idle),
            dashboard: watch::Sender::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_defaults(mut self, defaults: PayloadDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    pub fn result(&self) -> Option<PredictionResponse> {
        self.state.borrow().result().cloned()
    }

    pub fn dashboard(&self) -> Option<DashboardResponse> {
        self.dashboard.borrow().clone()
    }

    pub fn subscribe_dashboard(&self) -> watch::Receiver<Option<DashboardResponse>> {
        self.dashboard.subscribe()
    }

    /// Score the current snapshot.
    ///
    /// Returns `Ok(None)` without contacting the service when a submission is
    /// already in flight, and also when [`clear`](Self::clear) ran while this
    /// submission was pending. On success the dashboard is refreshed before returning.
    pub async fn submit(&self) -> CheckInResult<Option<PredictionResponse>> {
        let entered = self.state.send_if_modified(|s| {
            if s.is_submitting() {
                false
            } else {
                *s = GateState::Submitting;
                true
            }
        });
        if !entered {
            warn!("submission already in flight; ignoring");
            return Ok(None);
        }
        let guard = InFlight {
            state: &self.state,
            armed: true,
        };

        let attempt = Uuid::new_v4();
        let generation = self.generation.load(Ordering::SeqCst);
        let outcome = self
            .run_attempt(generation)
            .instrument(info_span!("submission", %attempt))
            .await;
        guard.disarm();
        outcome
    }

    async fn run_attempt(&self, generation: u64) -> CheckInResult<Option<PredictionResponse>> {
        let outcome = self.score_current().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            info!("gate cleared while submitting; discarding outcome");
            self.state.send_replace(GateState::Idle);
            return Ok(None);
        }
        match outcome {
            Ok(response) => {
                info!(dosha = %response.dosha, "prediction received");
                self.state.send_replace(GateState::Success(response.clone()));
                self.refresh_dashboard().await;
                Ok(Some(response))
            }
            Err(e) => {
                warn!(error = %e, "submission failed");
                self.state.send_replace(GateState::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn score_current(&self) -> CheckInResult<PredictionResponse> {
        let user_id = self.session.user_id().ok_or(CheckInError::NotLoggedIn)?;
        let snapshot = self.snapshot.borrow().clone();
        let request = ScoreVector::from_snapshot(&snapshot).into_request(user_id, &self.defaults);
        info!(user_id, "submitting check-in");
        Ok(self.client.predict(&request).await?)
    }

    /// Re-read history and trend aggregates. Failures are logged and leave the
    /// previous dashboard in place.
    pub async fn refresh_dashboard(&self) -> Option<DashboardResponse> {
        let generation = self.generation.load(Ordering::SeqCst);
        let user_id = self.session.user_id()?;
        let client = self.client.clone();
        let fetched = self
            .read_retry
            .retry_async(move || {
                let client = client.clone();
                async move { client.get_dashboard(user_id).await }
            })
            .await;
        match fetched {
            Ok(_) if self.generation.load(Ordering::SeqCst) != generation => None,
            Ok(dashboard) => {
                self.dashboard.send_replace(Some(dashboard.clone()));
                Some(dashboard)
            }
            Err(e) => {
                warn!(error = %e, "dashboard refresh failed");
                None
            }
        }
    }

    /// Drop the held result and dashboard, e.g. on logout.
    ///
    /// A submission in flight keeps the gate in `Submitting` until its
    /// request returns; its result is then thrown away.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_if_modified(|s| {
            if s.is_submitting() || *s == GateState::Idle {
                false
            } else {
                *s = GateState::Idle;
                true
            }
        });
        self.dashboard.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FieldUpdate;
    use crate::test_utils::{MockClient, sample_dashboard};
    use crate::vocabulary::SleepQuality;
    use ayurpredict_client::PredictError;
    use std::time::Duration;

    fn gate_with(
        mock: &MockClient,
        session: Session,
    ) -> (SubmissionGate, watch::Sender<CheckInSnapshot>) {
        let (tx, rx) = watch::channel(CheckInSnapshot::default());
        let gate = SubmissionGate::new(Arc::new(mock.clone()), Arc::new(session), rx)
            .with_read_retry(RetryPolicy::none());
        (gate, tx)
    }

    #[tokio::test]
    async fn success_stores_result_and_refreshes_dashboard() {
        let mock = MockClient::default();
        let (gate, _tx) = gate_with(&mock, Session::logged_in(7, "Asha"));
        assert_eq!(gate.state(), GateState::Idle);

        let result = gate.submit().await.expect("submit").expect("not ignored");
        assert_eq!(result.dosha, "Vata");
        assert_eq!(gate.result(), Some(result));
        assert_eq!(gate.dashboard(), Some(sample_dashboard()));
        assert_eq!(mock.dashboard_calls(), 1);
        assert_eq!(mock.requests()[0].user_id, 7);
    }

    #[tokio::test]
    async fn reads_the_snapshot_current_at_submit_time() {
        let mock = MockClient::default();
        let (gate, tx) = gate_with(&mock, Session::logged_in(7, "Asha"));
        tx.send_modify(|s| *s = s.with(FieldUpdate::SleepQuality(SleepQuality::Poor)));

        gate.submit().await.expect("submit");
        assert_eq!(mock.requests()[0].sleep_quality, 3);
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_ignored() {
        let mock = MockClient::default();
        mock.hold_predict();
        let (gate, _tx) = gate_with(&mock, Session::logged_in(7, "Asha"));
        let gate = Arc::new(gate);

        let mut states = gate.subscribe();
        let first = tokio::spawn({
            let gate = gate.clone();
            async move { gate.submit().await }
        });
        states
            .wait_for(GateState::is_submitting)
            .await
            .expect("gate alive");

        assert!(gate.submit().await.expect("ignored").is_none());
        assert_eq!(mock.predict_calls(), 1);

        mock.release_predict();
        let first = first.await.expect("join").expect("submit");
        assert!(first.is_some());
        assert_eq!(mock.predict_calls(), 1);
        assert!(matches!(gate.state(), GateState::Success(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced_and_retry_is_allowed() {
        let mock = MockClient::default();
        mock.fail_predict_once(PredictError::from_status(503, "down".into()));
        let (gate, _tx) = gate_with(&mock, Session::logged_in(7, "Asha"));

        let err = gate.submit().await.unwrap_err();
        assert!(matches!(err, CheckInError::Api(PredictError::Status { status: 503, .. })));
        assert!(matches!(
            gate.state(),
            GateState::Failed { kind: FailureKind::Service, message } if message.contains("503")
        ));
        assert_eq!(mock.dashboard_calls(), 0);

        let again = gate.submit().await.expect("second attempt");
        assert!(again.is_some());
        assert_eq!(mock.predict_calls(), 2);
    }

    #[tokio::test]
    async fn missing_identity_fails_without_calling_the_service() {
        let mock = MockClient::default();
        let (gate, _tx) = gate_with(&mock, Session::new());

        let err = gate.submit().await.unwrap_err();
        assert!(matches!(err, CheckInError::NotLoggedIn));
        assert!(matches!(
            gate.state(),
            GateState::Failed {
                kind: FailureKind::NotLoggedIn,
                ..
            }
        ));
        assert_eq!(mock.predict_calls(), 0);
    }

    #[tokio::test]
    async fn dropped_submission_returns_to_idle() {
        let mock = MockClient::default();
        mock.hold_predict();
        let (gate, _tx) = gate_with(&mock, Session::logged_in(7, "Asha"));

        let timed_out = tokio::time::timeout(Duration::from_millis(20), gate.submit()).await;
        assert!(timed_out.is_err());
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[tokio::test]
    async fn dashboard_failure_keeps_success_and_previous_dashboard() {
        let mock = MockClient::default();
        let (gate, _tx) = gate_with(&mock, Session::logged_in(7, "Asha"));
        gate.submit().await.expect("first");

        mock.fail_dashboard_once(PredictError::from_status(500, "db".into()));
        gate.submit().await.expect("second");
        assert!(matches!(gate.state(), GateState::Success(_)));
        assert_eq!(gate.dashboard(), Some(sample_dashboard()));
    }

    #[tokio::test]
    async fn clear_drops_result_and_dashboard() {
        let mock = MockClient::default();
        let (gate, _tx) = gate_with(&mock, Session::logged_in(7, "Asha"));
        gate.submit().await.expect("submit");
        gate.clear();
        assert_eq!(gate.state(), GateState::Idle);
        assert!(gate.result().is_none());
        assert!(gate.dashboard().is_none());
    }

    #[tokio::test]
    async fn clear_while_in_flight_keeps_one_request_and_drops_its_result() {
        let mock = MockClient::default();
        mock.hold_predict();
        let (gate, _tx) = gate_with(&mock, Session::logged_in(5, "Asha"));
        let gate = Arc::new(gate);

        let mut states = gate.subscribe();
        let first = tokio::spawn({
            let gate = gate.clone();
            async move { gate.submit().await }
        });
        states
            .wait_for(GateState::is_submitting)
            .await
            .expect("gate alive");

        gate.clear();
        assert!(gate.state().is_submitting());
        assert!(gate.submit().await.expect("ignored").is_none());
        assert_eq!(mock.predict_calls(), 1);

        mock.release_predict();
        assert!(first.await.expect("join").expect("submit").is_none());
        assert_eq!(gate.state(), GateState::Idle);
        assert!(gate.dashboard().is_none());
        assert_eq!(mock.dashboard_calls(), 0);

        let again = gate.submit().await.expect("fresh submit");
        assert!(again.is_some());
        assert_eq!(mock.predict_calls(), 2);
    }

    #[tokio::test]
    async fn custom_placeholders_reach_the_request() {
        let mock = MockClient::default();
        let (gate, _tx) = gate_with(&mock, Session::logged_in(7, "Asha"));
        let gate = gate.with_defaults(PayloadDefaults {
            skin_condition: 3,
            gender: 2,
        });
        gate.submit().await.expect("submit");
        let req = &mock.requests()[0];
        assert_eq!((req.skin_condition, req.gender), (3, 2));
    }
}
