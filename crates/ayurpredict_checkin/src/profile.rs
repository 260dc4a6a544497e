//! Reading and editing the signed-in user's profile.

use std::sync::Arc;

use ayurpredict_client::retry::RetryPolicy;
use ayurpredict_client::{PredictionClient, UpdateProfileRequest, UserProfile};
use chrono::NaiveDate;
use secrecy::SecretString;
use tracing::info;

use crate::error::{CheckInError, CheckInResult};
use crate::insights::age_from_dob;
use crate::session::Session;

/// Editable profile fields. A `None` password leaves it unchanged.
#[derive(Clone, Debug)]
pub struct ProfileChanges {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub dob: String,
    pub country: String,
    pub password: Option<SecretString>,
}

pub struct ProfileService {
    client: Arc<dyn PredictionClient>,
    session: Arc<Session>,
    read_retry: RetryPolicy,
}

impl ProfileService {
    pub fn new(client: Arc<dyn PredictionClient>, session: Arc<Session>) -> Self {
        Self {
            client,
            session,
            read_retry: RetryPolicy::default(),
        }
    }

    pub fn with_read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    /// Loads the profile and keeps the session's display name in step with it.
    pub async fn fetch(&self) -> CheckInResult<UserProfile> {
        let user_id = self.session.user_id().ok_or(CheckInError::NotLoggedIn)?;
        let client = self.client.clone();
        let profile = self
            .read_retry
            .retry_async(move || {
                let client = client.clone();
                async move { client.get_profile(user_id).await }
            })
            .await?;
        if !profile.name.is_empty() {
            self.session.rename(profile.name.clone());
        }
        Ok(profile)
    }

    pub async fn update(&self, changes: ProfileChanges) -> CheckInResult<()> {
        let user_id = self.session.user_id().ok_or(CheckInError::NotLoggedIn)?;
        if changes.name.trim().is_empty() {
            return Err(CheckInError::Validation("name must not be empty".into()));
        }
        let name = changes.name.clone();
        let request = UpdateProfileRequest {
            user_id,
            name: changes.name,
            email: changes.email,
            phone: changes.phone,
            gender: changes.gender,
            dob: changes.dob,
            country: changes.country,
            password: changes.password,
        };
        self.client.update_profile(&request).await?;
        info!(user_id, "profile updated");
        self.session.rename(name);
        Ok(())
    }
}

/// Age shown on the profile screen, or `"N/A"` when the birth date is missing or unreadable.
pub fn display_age(profile: &UserProfile, today: NaiveDate) -> String {
    profile
        .dob
        .as_deref()
        .and_then(|dob| age_from_dob(dob, today))
        .map_or_else(|| "N/A".to_string(), |age| age.to_string())
}
