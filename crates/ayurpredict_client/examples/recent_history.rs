use ayurpredict_client::{PredictionClient, config::Config, http_client::ReqwestPredictionClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects AYURPREDICT_USER_ID in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let Some(user_id) = cfg.user_id else {
        eprintln!("AYURPREDICT_USER_ID is not set");
        return Ok(());
    };
    let client = ReqwestPredictionClient::with_timeout(&cfg.base_url, cfg.timeout)?;
    for item in client.get_history(user_id).await? {
        println!("{}  {}", item.created_at, item.predicted_dosha);
    }
    Ok(())
}
