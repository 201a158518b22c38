//! HTTP client for the downstream notification service.
//!
//! Callers treat delivery as best-effort: the registration path dispatches
//! sends from a detached task and only logs failures.

use serde::Serialize;

use crate::error::NotificationError;

#[derive(Clone)]
pub struct NotificationClient {
    http_client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct SendNotificationRequest {
    user_id: i64,
    message: String,
}

impl NotificationClient {
    pub fn new(base_url: String, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    pub async fn send(&self, user_id: i64, message: &str) -> Result<(), NotificationError> {
        let url = format!("{}/send-notification", self.base_url);
        let request = SendNotificationRequest {
            user_id,
            message: message.to_string(),
        };

        self.http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| NotificationError::ServiceUnavailable(e.to_string()))?;

        tracing::info!(user_id, "Notification sent");

        Ok(())
    }
}
