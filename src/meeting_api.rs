//! Client for the third-party video-meeting API.
//!
//! Server-to-server flow: exchange client credentials for an access token,
//! then create a meeting resource under the account's user. No retry and no
//! idempotency guard; a client retry schedules a second meeting.

use serde::Deserialize;

use crate::config::Config;
use crate::errors::AppError;

#[derive(Debug, Clone)]
struct MeetingApiSettings {
    auth_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    account_id: String,
}

#[derive(Clone)]
pub struct MeetingApiClient {
    client: reqwest::Client,
    settings: Option<MeetingApiSettings>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The remote meeting resource, as far as this service cares.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMeeting {
    pub join_url: String,
    pub start_url: String,
}

impl MeetingApiClient {
    pub fn from_config(config: &Config) -> Self {
        let settings = match (
            &config.meeting_auth_url,
            &config.meeting_api_url,
            &config.meeting_client_id,
            &config.meeting_client_secret,
            &config.meeting_account_id,
        ) {
            (Some(auth_url), Some(api_url), Some(client_id), Some(client_secret), Some(account_id)) => {
                Some(MeetingApiSettings {
                    auth_url: auth_url.trim_end_matches('/').to_string(),
                    api_url: api_url.trim_end_matches('/').to_string(),
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    account_id: account_id.clone(),
                })
            }
            _ => {
                log::warn!("Meeting API not configured — meeting scheduling will fail");
                None
            }
        };

        MeetingApiClient {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn settings(&self) -> Result<&MeetingApiSettings, AppError> {
        self.settings
            .as_ref()
            .ok_or_else(|| AppError::Upstream("Meeting API is not configured".to_string()))
    }

    /// Client-credential exchange for a short-lived access token.
    async fn access_token(&self) -> Result<String, AppError> {
        let settings = self.settings()?;

        let response = self
            .client
            .post(format!("{}/oauth/token", settings.auth_url))
            .basic_auth(&settings.client_id, Some(&settings.client_secret))
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", settings.account_id.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Meeting API token exchange failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Create the remote meeting and return its join/start URLs.
    pub async fn create_meeting(
        &self,
        topic: &str,
        start_time: &str,
        duration_minutes: i64,
    ) -> Result<RemoteMeeting, AppError> {
        let settings = self.settings()?;
        let token = self.access_token().await?;

        let response = self
            .client
            .post(format!("{}/users/me/meetings", settings.api_url))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "topic": topic,
                "type": 2,
                "start_time": start_time,
                "duration": duration_minutes,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Meeting creation failed with status {}",
                response.status()
            )));
        }

        let meeting: RemoteMeeting = response.json().await?;
        Ok(meeting)
    }
}
