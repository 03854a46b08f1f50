//! Minimal Reddit API client.
//!
//! Owns authentication, HTTP transport, and listing pagination. The
//! inactivity checker never touches HTTP directly; anything that can fail
//! on the wire surfaces here as a [`FetchError`].

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::Credentials;

/// Host for the OAuth2 token exchange.
pub const AUTH_BASE_URL: &str = "https://www.reddit.com";

/// Host for authenticated API calls.
pub const API_BASE_URL: &str = "https://oauth.reddit.com";

/// Listing page size used when walking the subscription list.
const SUBSCRIPTION_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: StatusCode },
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("authentication rejected: {0}")]
    Auth(String),
}

/// A subscription entry from the `subreddits/mine` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub display_name: String,
}

/// The only submission field the checker inspects.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Submission {
    pub created_utc: f64,
}

// Reddit's listing envelope: {"data": {"after": ..., "children": [{"data": ...}]}}
#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    after: Option<String>,
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

/// An authenticated session with the Reddit API.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    api_base: Url,
    user_agent: String,
    token: String,
}

impl RedditClient {
    /// Authenticate against the production endpoints via the OAuth2
    /// password grant.
    ///
    /// # Errors
    ///
    /// Returns an error if the token request fails or Reddit rejects the
    /// grant.
    pub async fn login(credentials: &Credentials) -> Result<Self, FetchError> {
        Self::login_with_endpoints(credentials, AUTH_BASE_URL, API_BASE_URL).await
    }

    /// Authenticate against explicit endpoints. Tests point this at a mock
    /// server.
    ///
    /// # Errors
    ///
    /// Returns an error if either base URL is invalid, the token request
    /// fails, or the grant is rejected.
    pub async fn login_with_endpoints(
        credentials: &Credentials,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let token_url = Url::parse(auth_base)?.join("api/v1/access_token")?;
        let response = http
            .post(token_url.clone())
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(reqwest::header::USER_AGENT, &credentials.user_agent)
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: token_url.to_string(),
                status: response.status(),
            });
        }

        let token: TokenResponse = response.json().await?;
        if let Some(error) = token.error {
            return Err(FetchError::Auth(error));
        }
        let access_token = token
            .access_token
            .ok_or_else(|| FetchError::Auth("no access token in response".to_string()))?;

        debug!(user = %credentials.username, "Authenticated with reddit");

        Ok(Self {
            http,
            api_base: Url::parse(api_base)?,
            user_agent: credentials.user_agent.clone(),
            token: access_token,
        })
    }

    /// Fetch up to `max` subscribed forums for the authenticated user,
    /// following the listing cursor page by page.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn subscribed_forums(&self, max: usize) -> Result<Vec<Subscription>, FetchError> {
        let mut forums = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query = vec![("limit", SUBSCRIPTION_PAGE_SIZE.to_string())];
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            let listing: Listing<Subscription> =
                self.get_json("subreddits/mine/subscriber", &query).await?;
            let ListingData { after: cursor, children } = listing.data;

            if children.is_empty() {
                break;
            }
            forums.extend(children.into_iter().map(|thing| thing.data));
            debug!(fetched = forums.len(), "Subscription page loaded");

            if forums.len() >= max {
                forums.truncate(max);
                break;
            }
            match cursor {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        Ok(forums)
    }

    /// Fetch the `limit` newest submissions for a listing path such as
    /// `r/<name>/new` or `user/<name>/submitted`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the listing cannot be
    /// decoded.
    pub async fn newest_posts(
        &self,
        listing_path: &str,
        limit: u32,
    ) -> Result<Vec<Submission>, FetchError> {
        let query = [
            ("limit", limit.to_string()),
            ("sort", "new".to_string()),
        ];
        let listing: Listing<Submission> = self.get_json(listing_path, &query).await?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|thing| thing.data)
            .collect())
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.api_base.join(path)?;
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }
}
