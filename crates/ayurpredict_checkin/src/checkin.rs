//! The daily check-in as a whole: wizard position, answers and submission.

use std::sync::Arc;

use ayurpredict_client::retry::RetryPolicy;
use ayurpredict_client::{DashboardResponse, PredictionClient, PredictionResponse};
use tokio::sync::watch;
use tracing::debug;

use crate::error::CheckInResult;
use crate::gate::{GateState, SubmissionGate};
use crate::mapper::PayloadDefaults;
use crate::sequencer::{Advance, Sequencer, Step};
use crate::session::Session;
use crate::snapshot::{CheckInSnapshot, FieldUpdate};

/// Owns one check-in session.
///
/// Every holder is a `watch` channel: readers always see a complete step,
/// snapshot or gate state, never a half-applied change.
pub struct CheckInSession {
    session: Arc<Session>,
    sequencer: watch::Sender<Sequencer>,
    snapshot: watch::Sender<CheckInSnapshot>,
    gate: SubmissionGate,
}

impl CheckInSession {
    pub fn new(client: Arc<dyn PredictionClient>, session: Arc<Session>) -> Self {
        let snapshot = watch::Sender::new(CheckInSnapshot::default());
        let gate = SubmissionGate::new(client, session.clone(), snapshot.subscribe());
        Self {
            session,
            sequencer: watch::Sender::new(Sequencer::default()),
            snapshot,
            gate,
        }
    }

    pub fn with_defaults(mut self, defaults: PayloadDefaults) -> Self {
        self.gate = self.gate.with_defaults(defaults);
        self
    }

    pub fn with_read_retry(mut self, policy: RetryPolicy) -> Self {
        self.gate = self.gate.with_read_retry(policy);
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn current_step(&self) -> Step {
        self.sequencer.borrow().current()
    }

    pub fn snapshot(&self) -> CheckInSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn result(&self) -> Option<PredictionResponse> {
        self.gate.result()
    }

    pub fn dashboard(&self) -> Option<DashboardResponse> {
        self.gate.dashboard()
    }

    pub fn watch_step(&self) -> watch::Receiver<Sequencer> {
        self.sequencer.subscribe()
    }

    pub fn watch_snapshot(&self) -> watch::Receiver<CheckInSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn watch_gate(&self) -> watch::Receiver<GateState> {
        self.gate.subscribe()
    }

    pub fn watch_dashboard(&self) -> watch::Receiver<Option<DashboardResponse>> {
        self.gate.subscribe_dashboard()
    }

    /// Record an answer; every other field keeps its value.
    pub fn select(&self, update: FieldUpdate) {
        debug!(?update, "answer selected");
        self.snapshot.send_modify(|s| *s = s.with(update));
    }

    pub fn toggle_symptom(&self, label: &str) {
        self.snapshot.send_modify(|s| *s = s.toggle_symptom(label));
    }

    pub fn advance(&self) -> Advance {
        let mut outcome = Advance::Complete;
        self.sequencer.send_modify(|seq| outcome = seq.advance());
        outcome
    }

    /// Returns `false` when already on the first step.
    pub fn retreat(&self) -> bool {
        self.sequencer.send_if_modified(Sequencer::retreat)
    }

    /// "Next" button: moves forward, or submits from the last step.
    ///
    /// Yields the new position, or `None` once a submission ran (or was
    /// ignored because one is already in flight).
    pub async fn advance_or_submit(&self) -> CheckInResult<Option<Step>> {
        match self.advance() {
            Advance::Moved(step) => Ok(Some(step)),
            Advance::Complete => {
                self.gate.submit().await?;
                Ok(None)
            }
        }
    }

    /// Submit the current answers, e.g. from a summary screen.
    pub async fn submit(&self) -> CheckInResult<Option<PredictionResponse>> {
        self.gate.submit().await
    }

    pub async fn refresh_dashboard(&self) -> Option<DashboardResponse> {
        self.gate.refresh_dashboard().await
    }

    /// Fresh answers from step 1. The last result stays visible until the
    /// next submission replaces it.
    pub fn start_new(&self) {
        self.snapshot.send_replace(CheckInSnapshot::default());
        self.sequencer.send_modify(Sequencer::reset);
    }

    pub fn logout(&self) {
        self.start_new();
        self.gate.clear();
        self.session.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::TOTAL_STEPS;
    use crate::test_utils::MockClient;
    use crate::vocabulary::{BowelMovement, SleepQuality, StressLevel};

    fn session_with(mock: &MockClient) -> CheckInSession {
        CheckInSession::new(Arc::new(mock.clone()), Arc::new(Session::logged_in(5, "Dev")))
            .with_read_retry(RetryPolicy::none())
    }

    #[tokio::test]
    async fn walking_every_step_submits_once_at_the_end() {
        let mock = MockClient::default();
        let checkin = session_with(&mock);

        checkin.select(FieldUpdate::SleepQuality(SleepQuality::Good));
        checkin.select(FieldUpdate::StressLevel(StressLevel::Low));
        checkin.select(FieldUpdate::BowelMovement(BowelMovement::Regular));

        for expected in 2..=TOTAL_STEPS {
            let step = checkin.advance_or_submit().await.expect("advance");
            assert_eq!(step.map(Step::index), Some(expected));
        }
        assert_eq!(mock.predict_calls(), 0);

        assert_eq!(checkin.advance_or_submit().await.expect("submit"), None);
        assert_eq!(mock.predict_calls(), 1);

        let req = &mock.requests()[0];
        assert_eq!(req.sleep_quality, 8);
        assert_eq!(req.stress_level, 2);
        assert_eq!(req.stool_type, 6);
        assert_eq!(req.energy_level, 5);
        assert_eq!(req.digestion, 5);
        assert!(checkin.result().is_some());
        assert!(checkin.dashboard().is_some());
    }

    #[tokio::test]
    async fn fresh_snapshot_submits_neutral_defaults() {
        let mock = MockClient::default();
        let checkin = session_with(&mock);
        checkin.submit().await.expect("submit");

        let req = &mock.requests()[0];
        assert_eq!(
            (req.sleep_quality, req.stress_level, req.energy_level, req.digestion, req.stool_type),
            (5, 5, 5, 5, 5)
        );
        assert_eq!(req.sleep_hours, 7.0);
        assert_eq!(req.hydration, 2.0);
    }

    #[test]
    fn retreat_and_observers_see_whole_values() {
        let mock = MockClient::default();
        let checkin = session_with(&mock);
        let steps = checkin.watch_step();
        let answers = checkin.watch_snapshot();

        assert!(!checkin.retreat());
        assert_eq!(checkin.advance(), Advance::Moved(Step::new(2).unwrap()));
        assert!(checkin.retreat());
        assert_eq!(steps.borrow().current(), Step::FIRST);

        checkin.toggle_symptom("Heat");
        checkin.select(FieldUpdate::Hydration(3));
        assert!(answers.borrow().has_symptom("Heat"));
        assert_eq!(answers.borrow().hydration, 3);
    }

    #[tokio::test]
    async fn start_new_resets_answers_but_keeps_result() {
        let mock = MockClient::default();
        let checkin = session_with(&mock);
        checkin.select(FieldUpdate::Mood("Calm".into()));
        checkin.advance();
        checkin.submit().await.expect("submit");

        checkin.start_new();
        assert_eq!(checkin.snapshot(), CheckInSnapshot::default());
        assert_eq!(checkin.current_step(), Step::FIRST);
        assert!(checkin.result().is_some());
    }

    #[tokio::test]
    async fn logout_clears_result_dashboard_and_identity() {
        let mock = MockClient::default();
        let checkin = session_with(&mock);
        checkin.submit().await.expect("submit");

        checkin.logout();
        assert!(checkin.result().is_none());
        assert!(checkin.dashboard().is_none());
        assert!(!checkin.session().is_logged_in());
        assert!(checkin.submit().await.is_err());
    }

    #[tokio::test]
    async fn logout_during_submission_does_not_leak_the_old_result() {
        let mock = MockClient::default();
        mock.hold_predict();
        let checkin = Arc::new(session_with(&mock));

        let mut gate = checkin.watch_gate();
        let pending = tokio::spawn({
            let checkin = checkin.clone();
            async move { checkin.submit().await }
        });
        gate.wait_for(GateState::is_submitting).await.expect("gate alive");

        checkin.logout();
        checkin.session().login_as(6, "Ravi");
        assert!(checkin.submit().await.expect("ignored").is_none());
        assert_eq!(mock.predict_calls(), 1);

        mock.release_predict();
        assert!(pending.await.expect("join").expect("submit").is_none());
        assert_eq!(checkin.gate_state(), GateState::Idle);
        assert!(checkin.result().is_none());
        assert!(checkin.dashboard().is_none());

        checkin.submit().await.expect("submit as new user");
        let users: Vec<i64> = mock.requests().iter().map(|r| r.user_id).collect();
        assert_eq!(users, vec![5, 6]);
        assert!(checkin.result().is_some());
    }
}
