//! `PredictionClient` trait, wire types and a reqwest-based implementation for the
//! AyurPredict scoring service.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod retry;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Auth(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("rejected by server: {0}")]
    Rejected(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("configuration error: {0}")]
    Config(String),
}

impl PredictError {
    pub fn from_status(status: u16, body: String) -> Self {
        PredictError::Status { status, body }
    }

    /// Whether a read that failed this way is worth repeating.
    pub fn is_transient(&self) -> bool {
        match self {
            PredictError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            PredictError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// The three dosha categories scored by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
}

impl Dosha {
    pub const ALL: [Dosha; 3] = [Dosha::Vata, Dosha::Pitta, Dosha::Kapha];

    pub fn label(self) -> &'static str {
        match self {
            Dosha::Vata => "Vata",
            Dosha::Pitta => "Pitta",
            Dosha::Kapha => "Kapha",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Dosha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Flat scoring request, sent once per submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    pub user_id: i64,
    pub sleep_quality: i32,
    pub stress_level: i32,
    pub energy_level: i32,
    pub digestion: i32,
    pub stool_type: i32,
    pub skin_condition: i32,
    pub gender: i32,
    pub sleep_hours: f32,
    pub hydration: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionResponse {
    pub dosha: String,
    pub vata: i32,
    pub pitta: i32,
    pub kapha: i32,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl PredictionResponse {
    /// Parsed form of `dosha`, if the server sent a known label.
    pub fn dominant(&self) -> Option<Dosha> {
        Dosha::from_label(&self.dosha)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoshaScore {
    #[serde(default)]
    pub vata_score: i32,
    #[serde(default)]
    pub pitta_score: i32,
    #[serde(default)]
    pub kapha_score: i32,
    #[serde(default)]
    pub created_at: String,
}

impl DoshaScore {
    pub fn score_for(&self, dosha: Dosha) -> i32 {
        match dosha {
            Dosha::Vata => self.vata_score,
            Dosha::Pitta => self.pitta_score,
            Dosha::Kapha => self.kapha_score,
        }
    }

    /// Highest scoring dosha; ties go to the earlier of Vata, Pitta, Kapha.
    pub fn dominant(&self) -> Dosha {
        let mut best = Dosha::Vata;
        for d in [Dosha::Pitta, Dosha::Kapha] {
            if self.score_for(d) > self.score_for(best) {
                best = d;
            }
        }
        best
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trends {
    #[serde(default)]
    pub vata_change: i32,
    #[serde(default)]
    pub pitta_change: i32,
    #[serde(default)]
    pub kapha_change: i32,
}

impl Trends {
    pub fn change_for(&self, dosha: Dosha) -> i32 {
        match dosha {
            Dosha::Vata => self.vata_change,
            Dosha::Pitta => self.pitta_change,
            Dosha::Kapha => self.kapha_change,
        }
    }
}

/// Current scores, score history (for graphs) and server-computed trends.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardResponse {
    pub current: Option<DoshaScore>,
    #[serde(default)]
    pub history: Vec<DoshaScore>,
    #[serde(default)]
    pub trends: Trends,
    #[serde(default)]
    pub streak: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: i64,
    pub predicted_dosha: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub country: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UpdateProfileRequest {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub dob: String,
    pub country: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_secret"
    )]
    pub password: Option<SecretString>,
}

fn serialize_opt_secret<S>(value: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// `{"status": "...", "message": "..."}` envelope used by the write endpoints.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[async_trait]
pub trait PredictionClient: Send + Sync + 'static {
    /// Score one check-in.
    async fn predict(&self, request: &PredictionRequest)
    -> Result<PredictionResponse, PredictError>;

    /// Current scores, history and trends for a user.
    async fn get_dashboard(&self, user_id: i64) -> Result<DashboardResponse, PredictError>;

    /// Past predictions, most recent first.
    async fn get_history(&self, user_id: i64) -> Result<Vec<HistoryItem>, PredictError>;

    async fn get_profile(&self, user_id: i64) -> Result<UserProfile, PredictError>;

    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<StatusResponse, PredictError>;
}
