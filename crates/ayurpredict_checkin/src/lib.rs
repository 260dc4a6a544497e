//! Daily check-in flow for AyurPredict.
//!
//! A [`CheckInSession`] walks the user through twelve questions, keeps the
//! answers in an immutable [`CheckInSnapshot`], turns them into the numeric
//! payload the scoring service expects and submits it through a
//! [`SubmissionGate`] that never has more than one request in flight.
//!
//! Everything observable is held in `tokio::sync::watch` channels so a UI
//! (or the bundled `ayurpredict-checkin` binary) can follow along.

pub mod answers;
pub mod checkin;
pub mod error;
pub mod gate;
pub mod history;
pub mod insights;
pub mod mapper;
pub mod middleware;
pub mod profile;
pub mod sequencer;
pub mod session;
pub mod snapshot;
pub mod vocabulary;

mod test_utils;

pub use answers::CheckInAnswers;
pub use checkin::CheckInSession;
pub use error::{CheckInError, CheckInResult, FailureKind};
pub use gate::{GateState, SubmissionGate};
pub use history::HistoryService;
pub use mapper::{PayloadDefaults, ScoreVector};
pub use middleware::LoggingMiddleware;
pub use profile::{ProfileChanges, ProfileService};
pub use sequencer::{Advance, Sequencer, Step, StepField, TOTAL_STEPS};
pub use session::Session;
pub use snapshot::{CheckInSnapshot, FieldUpdate};
