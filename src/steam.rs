//! Steam Web API client.
//!
//! Every call goes through [`SteamClient::fetch`], which performs exactly one GET
//! request and folds the outcome into an [`ApiResult`]. The fetchers in the
//! submodules never surface errors any other way.

use std::{fmt, sync::Arc};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Config;

pub mod achievements;
pub mod playtime;
pub mod profile;

pub use achievements::{Achievement, AchievementStatus};
pub use playtime::{minutes_to_hours, GameEntry, SortOrder};
pub use profile::{is_numeric_id, Profile, ResolvedUser, INVALID_STEAM_ID};

/// Remote methods this client knows how to call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SteamMethod {
    ResolveVanityUrl,
    PlayerSummaries,
    OwnedGames,
    RecentlyPlayedGames,
    PlayerAchievements,
}

impl SteamMethod {
    /// `Interface/Method/version/`, relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            SteamMethod::ResolveVanityUrl => "ISteamUser/ResolveVanityURL/v0001/",
            SteamMethod::PlayerSummaries => "ISteamUser/GetPlayerSummaries/v0002/",
            SteamMethod::OwnedGames => "IPlayerService/GetOwnedGames/v0001/",
            SteamMethod::RecentlyPlayedGames => "IPlayerService/GetRecentlyPlayedGames/v0001/",
            SteamMethod::PlayerAchievements => "ISteamUserStats/GetPlayerAchievements/v0001/",
        }
    }
}

impl fmt::Display for SteamMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_end_matches('/'))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure. Request URLs are stripped before this is built.
    #[error("failed to make http request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Steam API responded with status {status}")]
    Status { status: u16, body: String },

    #[error("failed to deserialize response from Steam: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

/// Outcome of a single Steam Web API call.
#[derive(Debug)]
pub enum ApiResult<T> {
    Success(T),
    /// The call succeeded but the response carried no data.
    Empty,
    /// HTTP 429.
    RateLimited,
    RemoteError(ApiError),
}

impl<T> ApiResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    /// Collapses every non-success outcome into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            ApiResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> ApiResult<U>
    where
        F: FnOnce(T) -> U,
    {
        self.and_then(|data| ApiResult::Success(f(data)))
    }

    pub fn and_then<U, F>(self, f: F) -> ApiResult<U>
    where
        F: FnOnce(T) -> ApiResult<U>,
    {
        match self {
            ApiResult::Success(data) => f(data),
            ApiResult::Empty => ApiResult::Empty,
            ApiResult::RateLimited => ApiResult::RateLimited,
            ApiResult::RemoteError(error) => ApiResult::RemoteError(error),
        }
    }
}

impl<T> From<Option<T>> for ApiResult<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(data) => ApiResult::Success(data),
            None => ApiResult::Empty,
        }
    }
}

#[derive(Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    api_key: Arc<str>,
    base_url: Arc<str>,
    include_played_free_games: bool,
}

impl fmt::Debug for SteamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamClient")
            .field("base_url", &self.base_url)
            .field("include_played_free_games", &self.include_played_free_games)
            .finish_non_exhaustive()
    }
}

impl SteamClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("steam-playtime/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.as_str().into(),
            base_url: config.api_base_url.trim_end_matches('/').into(),
            include_played_free_games: config.include_played_free_games,
        })
    }

    pub fn url_for(&self, method: SteamMethod) -> String {
        format!("{}/{}", self.base_url, method.path())
    }

    /// Sends one GET request for `method` and deserializes the body as `T`.
    ///
    /// `key` and `format=json` are added to `params` automatically.
    pub async fn fetch<T>(&self, method: SteamMethod, params: &[(&str, String)]) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(method);
        tracing::debug!("[fetch] {} params: {:?}", method, params);

        let response = match self
            .http
            .get(&url)
            .query(&[("key", &*self.api_key), ("format", "json")])
            .query(params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                // the url carries the api key
                let error = error.without_url();
                tracing::error!("[fetch] {} request failed: {}", method, error);
                return ApiResult::RemoteError(ApiError::Http(error));
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(
                "Rate limit exceeded (429 Too Many Requests) on {}. Please wait and try again later.",
                method
            );
            return ApiResult::RateLimited;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                let error = error.without_url();
                tracing::error!("[fetch] {} failed to read body: {}", method, error);
                return ApiResult::RemoteError(ApiError::Http(error));
            }
        };

        if status != StatusCode::OK {
            tracing::error!("[fetch] {} status code: {}", method, status.as_u16());
            tracing::error!("[fetch] {} response text: {}", method, body);
            return ApiResult::RemoteError(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<T>(&body) {
            Ok(data) => ApiResult::Success(data),
            Err(source) => {
                tracing::error!("[fetch] {} unexpected response: {}", method, source);
                tracing::error!("[fetch] {} response text: {}", method, body);
                ApiResult::RemoteError(ApiError::Malformed { source, body })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_paths() {
        assert_eq!(
            SteamMethod::OwnedGames.path(),
            "IPlayerService/GetOwnedGames/v0001/"
        );
        assert_eq!(
            SteamMethod::ResolveVanityUrl.to_string(),
            "ISteamUser/ResolveVanityURL/v0001"
        );
    }

    #[test]
    fn test_url_for_trims_base_slash() {
        let mut config = Config::new("key");
        config.api_base_url = "http://localhost:1234/".to_string();
        let client = SteamClient::new(&config).unwrap();
        assert_eq!(
            client.url_for(SteamMethod::PlayerSummaries),
            "http://localhost:1234/ISteamUser/GetPlayerSummaries/v0002/"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = SteamClient::new(&Config::new("super-secret")).unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }

    #[test]
    fn test_result_combinators() {
        let doubled = ApiResult::Success(2).map(|n| n * 2);
        assert_eq!(doubled.into_option(), Some(4));

        let empty: ApiResult<u32> = ApiResult::<u32>::RateLimited.map(|n| n + 1);
        assert!(matches!(empty, ApiResult::RateLimited));

        let from_none: ApiResult<u32> = None.into();
        assert!(matches!(from_none, ApiResult::Empty));
    }
}
