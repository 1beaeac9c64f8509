//! Mentoring platform API client
//!
//! Thin HTTP layer over the platform's REST API: login plus the two
//! paginated listings the sync orchestrator consumes. Rate limiting is
//! surfaced as [`ApiError::RateLimited`] so the orchestrator can cool down
//! and retry the same page; pacing and retries are not this client's job.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{ApiMentor, ApiSubmission, LoginResponse, PageMeta, Paged};
use crate::config::ApiConfig;
use crate::models::STATUS_PENDING_REVIEW;
use crate::utils::errors::{ApiError, ApiResult, Result};

/// HTTP client for the mentoring platform.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: String,
}

impl PlatformClient {
    /// Create a new PlatformClient instance
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("MentorBuddy-Bot/1.0")
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Authenticate and obtain a bearer token. Any non-success response is
    /// an authentication failure, fatal for the sync run.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let url = format!("{}/login", self.base_url);
        debug!(url = %url, "Logging in to the platform API");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(ApiError::Authentication(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        Ok(body.access_token)
    }

    /// Fetch one page of the mentors listing.
    pub async fn mentors_page(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<(Vec<ApiMentor>, PageMeta)> {
        let url = format!("{}/mentors", self.base_url);
        debug!(page = page, "Fetching mentors page");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(map_send_error)?;

        parse_page(response).await
    }

    /// Fetch one page of a clan's pending-review homework listing.
    pub async fn clan_homeworks_page(
        &self,
        token: &str,
        clan_id: i64,
        page: u32,
    ) -> ApiResult<(Vec<ApiSubmission>, PageMeta)> {
        let url = format!("{}/clan/{}/homeworks", self.base_url, clan_id);
        debug!(clan_id = clan_id, page = page, "Fetching clan homeworks page");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("page", page.to_string()),
                ("filter", STATUS_PENDING_REVIEW.to_string()),
                ("sort", "delivery_desc".to_string()),
                ("lesson_id", String::new()),
            ])
            .send()
            .await
            .map_err(map_send_error)?;

        parse_page(response).await
    }
}

async fn parse_page<T: DeserializeOwned>(response: Response) -> ApiResult<(Vec<T>, PageMeta)> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(ApiError::RateLimited);
    }

    if !response.status().is_success() {
        return Err(ApiError::RequestFailed(format!(
            "HTTP {}",
            response.status()
        )));
    }

    let page: Paged<T> = response
        .json()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

    Ok((page.data, page.meta))
}

fn map_send_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::RequestFailed(format!("connection failed: {}", e))
    } else {
        ApiError::RequestFailed(e.to_string())
    }
}
