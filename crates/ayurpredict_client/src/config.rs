use crate::PredictError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost/ayur_predict";

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    /// Identity of the signed-in user, when the host already knows it.
    pub user_id: Option<i64>,
    /// Retry budget for idempotent reads (dashboard, history, profile).
    pub read_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, PredictError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, PredictError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base_url = get("AYURPREDICT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout_secs: u64 = parse_var(&mut get, "AYURPREDICT_TIMEOUT_SECS")?.unwrap_or(30);
        let user_id: Option<i64> = parse_var(&mut get, "AYURPREDICT_USER_ID")?;
        let read_retries: u32 = parse_var(&mut get, "AYURPREDICT_READ_RETRIES")?.unwrap_or(3);
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            user_id,
            read_retries,
        })
    }
}

fn parse_var<F, T>(get: &mut F, key: &str) -> Result<Option<T>, PredictError>
where
    F: FnMut(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PredictError::Config(format!("{key} is not a valid number: {raw}"))),
    }
}
