use std::sync::Arc;

use anyhow::{Context, bail};
use ayurpredict_checkin::insights::{self, BADGES, DoshaSeries};
use ayurpredict_checkin::{
    CheckInAnswers, CheckInSession, HistoryService, LoggingMiddleware, Session,
};
use ayurpredict_client::config::Config;
use ayurpredict_client::http_client::ReqwestPredictionClient;
use ayurpredict_client::retry::RetryPolicy;
use ayurpredict_client::{DashboardResponse, Dosha, PredictionClient, PredictionResponse};
use serde::Serialize;

#[derive(Serialize)]
struct TrendLine {
    dosha: Dosha,
    score: i32,
    change: String,
}

#[derive(Serialize)]
struct Summary {
    prediction: PredictionResponse,
    percentages: Vec<(Dosha, u32)>,
    trends: Vec<TrendLine>,
    streak: u32,
    /// Streak recounted from stored check-ins; absent when history could not be read.
    history_streak: Option<u32>,
    consistency: f32,
    badges: Vec<&'static str>,
}

impl Summary {
    fn new(
        prediction: PredictionResponse,
        dashboard: Option<&DashboardResponse>,
        history_streak: Option<u32>,
    ) -> Self {
        let dashboard = dashboard.cloned().unwrap_or_default();
        let percentages = dashboard
            .current
            .as_ref()
            .map(|c| insights::percentages(c).to_vec())
            .unwrap_or_default();
        let trends = Dosha::ALL
            .iter()
            .map(|&d| {
                let series = DoshaSeries::from_dashboard(&dashboard, d);
                TrendLine {
                    dosha: d,
                    score: series.score,
                    change: series.trend_label(),
                }
            })
            .collect();
        Self {
            prediction,
            percentages,
            trends,
            streak: dashboard.streak,
            history_streak,
            consistency: insights::consistency_progress(dashboard.streak),
            badges: BADGES
                .iter()
                .filter(|b| b.unlocked(dashboard.streak))
                .map(|b| b.title)
                .collect(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from env var `AYURPREDICT_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("AYURPREDICT_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // reqwest and hyper are noisy at debug
    let combined_filter = format!("{log_env},hyper_util=warn,reqwest=warn");
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper_util=warn,reqwest=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("ayurpredict-checkin: log filter: {}", log_env);

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: ayurpredict-checkin <answers.json>");
    };
    let answers = CheckInAnswers::from_path(&path)
        .with_context(|| format!("reading answers from {path}"))?;

    let config = Config::from_env()?;
    let Some(user_id) = config.user_id else {
        bail!("AYURPREDICT_USER_ID must be set");
    };
    let client = ReqwestPredictionClient::with_timeout(&config.base_url, config.timeout)?;
    tracing::info!(base_url = client.base_url(), user_id, "ayurpredict-checkin: starting");

    let client: Arc<dyn PredictionClient> = Arc::new(LoggingMiddleware::new(client));
    let session = Arc::new(Session::logged_in(user_id, "User"));
    let read_retry = RetryPolicy {
        max_retries: config.read_retries,
        ..RetryPolicy::default()
    };
    let checkin =
        CheckInSession::new(client.clone(), session.clone()).with_read_retry(read_retry.clone());
    let history = HistoryService::new(client, session).with_read_retry(read_retry);

    let prediction = answers
        .replay(&checkin)
        .await?
        .context("submission finished without a prediction")?;

    let today = chrono::Local::now().date_naive();
    let history_streak = match history.streak(today).await {
        Ok(streak) => Some(streak),
        Err(e) => {
            tracing::warn!(error = %e, "could not read check-in history");
            None
        }
    };

    let summary = Summary::new(prediction, checkin.dashboard().as_ref(), history_streak);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
