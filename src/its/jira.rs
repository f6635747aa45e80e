//! Jira gateway
//!
//! Implements [`ItsFacade`] against the Jira REST API: related links become
//! remote links on the issue, comments go to the issue's comment thread.

use crate::its::facade::{ItsError, ItsFacade};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Client-wide timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-request timeout for create/update operations
const WRITE_TIMEOUT: Duration = Duration::from_secs(15);

/// Jira REST API client.
pub struct JiraFacade {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct RemoteLinkRequest<'a> {
    object: RemoteLinkObject<'a>,
}

#[derive(Debug, Serialize)]
struct RemoteLinkObject<'a> {
    url: &'a str,
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentCreate<'a> {
    body: &'a str,
}

impl JiraFacade {
    /// Create a new Jira gateway for the given server URL.
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(url: impl AsRef<str>) -> Result<Self, ItsError> {
        let client = Client::builder().timeout(CLIENT_TIMEOUT).build()?;

        let base_url = format!("{}/rest/api/2", url.as_ref().trim_end_matches('/'));

        Ok(Self {
            client,
            base_url,
            auth_token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    async fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<reqwest::Response, ItsError> {
        let mut request = self.client.post(url).json(body);
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }
        Ok(request.timeout(WRITE_TIMEOUT).send().await?)
    }

    fn retry_after(response: &reqwest::Response) -> u64 {
        response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60)
    }
}

#[async_trait]
impl ItsFacade for JiraFacade {
    fn name(&self) -> &str {
        "jira"
    }

    async fn add_related_link(&self, issue: &str, url: &str, label: &str) -> Result<(), ItsError> {
        let endpoint = format!("{}/issue/{}/remotelink", self.base_url, issue);

        let body = RemoteLinkRequest {
            object: RemoteLinkObject { url, title: label },
        };

        debug!(issue = %issue, url = %url, "Adding remote link to Jira issue");

        let response = self.post_json(&endpoint, &body).await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => {
                info!(issue = %issue, "Added remote link");
                Ok(())
            }
            StatusCode::UNAUTHORIZED => {
                Err(ItsError::Auth("Jira authentication failed".to_string()))
            }
            StatusCode::NOT_FOUND => Err(ItsError::NotFound(issue.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(ItsError::RateLimited(Self::retry_after(&response)))
            }
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(ItsError::Api(format!(
                    "remote link failed: HTTP {}: {}",
                    status, error_body
                )))
            }
        }
    }

    async fn add_related_link_and_comment(
        &self,
        issue: &str,
        url: &str,
        label: &str,
        comment: &str,
    ) -> Result<(), ItsError> {
        self.add_related_link(issue, url, label).await?;

        let endpoint = format!("{}/issue/{}/comment", self.base_url, issue);
        let body = CommentCreate { body: comment };

        debug!(issue = %issue, "Adding comment to Jira issue");

        let response = self.post_json(&endpoint, &body).await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => {
                info!(issue = %issue, "Added comment");
                Ok(())
            }
            StatusCode::UNAUTHORIZED => {
                Err(ItsError::Auth("Jira authentication failed".to_string()))
            }
            StatusCode::NOT_FOUND => Err(ItsError::NotFound(issue.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(ItsError::RateLimited(Self::retry_after(&response)))
            }
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(ItsError::Api(format!(
                    "comment failed: HTTP {}: {}",
                    status, error_body
                )))
            }
        }
    }
}
