//! Tracker API client
//!
//! Thin async client for a Pivotal-Tracker-style v5 API: token-authenticated
//! GETs, offset pagination for completed stories, per-story transition logs.
//! Non-2xx responses surface status and body; the client never retries.

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;

use crate::error::CoreError;
use crate::models::{Story, Transition};

/// Hosted tracker API root
pub const DEFAULT_BASE_URL: &str = "https://www.pivotaltracker.com/services/v5";

#[derive(Debug, Clone)]
pub struct TrackerClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    project_id: String,
}

impl TrackerClient {
    pub fn new(api_token: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_token, project_id)
    }

    /// Point the client at a different API root (tests, self-hosted instances)
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token: api_token.into(),
            project_id: project_id.into(),
        }
    }

    /// All stories accepted within the trailing `window`, paged until the API
    /// returns an empty page
    pub async fn completed_stories(&self, window: Duration) -> Result<Vec<Story>, CoreError> {
        let accepted_after = (Utc::now() - window).timestamp_millis();

        let mut stories: Vec<Story> = Vec::new();
        loop {
            let url = format!(
                "{}/projects/{}/stories?accepted_after={}&with_state=accepted&offset={}",
                self.base_url,
                self.project_id,
                accepted_after,
                stories.len()
            );
            let page: Vec<Story> = self.get_json(&url).await?;
            if page.is_empty() {
                break;
            }
            stories.extend(page);
        }

        tracing::debug!(count = stories.len(), "fetched completed stories");
        Ok(stories)
    }

    /// One story's metadata
    pub async fn story(&self, story_id: u64) -> Result<Story, CoreError> {
        let url = format!(
            "{}/projects/{}/stories/{}",
            self.base_url, self.project_id, story_id
        );
        self.get_json(&url).await
    }

    /// One story's transition log, chronologically ascending as the API
    /// returns it
    pub async fn story_transitions(&self, story_id: u64) -> Result<Vec<Transition>, CoreError> {
        let url = format!(
            "{}/projects/{}/stories/{}/transitions",
            self.base_url, self.project_id, story_id
        );
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CoreError> {
        let response = self
            .http
            .get(url)
            .header("X-TrackerToken", &self.api_token)
            .send()
            .await
            .map_err(|source| CoreError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::UnexpectedStatus {
                url: url.to_string(),
                status,
                body,
            });
        }

        response.json().await.map_err(|source| CoreError::Http {
            url: url.to_string(),
            source,
        })
    }
}
