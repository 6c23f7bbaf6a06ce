use serde::{Deserialize, Serialize};

use super::{ApiResult, SteamClient, SteamMethod};

pub const INVALID_STEAM_ID: &str = "Invalid Steam ID";

/// `true` for a non-empty string of ASCII digits, i.e. a SteamID64 rather than
/// a vanity name.
pub fn is_numeric_id(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

/// A player record from `GetPlayerSummaries`.
///
/// Fields this crate doesn't name are kept verbatim in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steamid: Option<String>,
    #[serde(rename = "personaname", default)]
    pub display_name: String,
    #[serde(rename = "profileurl", default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(rename = "avatarmedium", default, skip_serializing_if = "Option::is_none")]
    pub avatar_medium: Option<String>,
    #[serde(rename = "avatarfull", default, skip_serializing_if = "Option::is_none")]
    pub avatar_full: Option<String>,
    #[serde(rename = "lastlogoff", default, skip_serializing_if = "Option::is_none")]
    pub last_logoff: Option<i64>,
    #[serde(rename = "personastate", default, skip_serializing_if = "Option::is_none")]
    pub persona_state: Option<i64>,
    #[serde(
        rename = "communityvisibilitystate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub visibility_state: Option<i64>,
    #[serde(rename = "timecreated", default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<i64>,
    #[serde(rename = "realname", default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(rename = "loccountrycode", default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Set only by [`Profile::invalid`]; never read from or written to JSON.
    #[serde(skip)]
    sentinel: bool,
}

impl Profile {
    /// The stand-in profile for identifiers that could not be resolved.
    pub fn invalid() -> Self {
        Self {
            display_name: INVALID_STEAM_ID.to_string(),
            sentinel: true,
            ..Default::default()
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.sentinel
    }

    /// Every field of the record as `(name, value)`, using the remote field names.
    pub fn fields(&self) -> Vec<(String, String)> {
        let value = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return Vec::new(),
        };

        value
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect()
    }
}

/// A looked-up identifier: the numeric id it resolved to (if any) and the profile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedUser {
    pub steam_id: Option<String>,
    pub profile: Profile,
}

impl ResolvedUser {
    fn invalid() -> Self {
        Self {
            steam_id: None,
            profile: Profile::invalid(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VanityEnvelope {
    response: VanityResponse,
}

#[derive(Debug, Deserialize)]
struct VanityResponse {
    #[serde(default)]
    steamid: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummariesEnvelope {
    response: SummariesResponse,
}

#[derive(Debug, Deserialize)]
struct SummariesResponse {
    #[serde(default)]
    players: Vec<Profile>,
}

impl SteamClient {
    /// Turns an identifier into a SteamID64.
    ///
    /// Numeric identifiers are returned as-is without a network call; vanity
    /// names go through `ResolveVanityURL`, and an unknown name is `Empty`.
    pub async fn resolve_steam_id(&self, identifier: &str) -> ApiResult<String> {
        if is_numeric_id(identifier) {
            return ApiResult::Success(identifier.to_string());
        }

        let result = self
            .fetch::<VanityEnvelope>(
                SteamMethod::ResolveVanityUrl,
                &[("vanityurl", identifier.to_string())],
            )
            .await;

        tracing::debug!("[resolve_steam_id] vanity URL response for {:?}: {:?}", identifier, result);

        result.and_then(|VanityEnvelope { response }| match response.steamid {
            Some(steam_id) if !steam_id.is_empty() => {
                tracing::debug!("[resolve_steam_id] resolved to Steam ID: {}", steam_id);
                ApiResult::Success(steam_id)
            }
            _ => {
                tracing::debug!(
                    "[resolve_steam_id] failed to resolve vanity URL: {}",
                    response.message.as_deref().unwrap_or("no steamid in response")
                );
                ApiResult::Empty
            }
        })
    }

    /// Fetches the first player record for a SteamID64.
    pub async fn fetch_profile(&self, steam_id: &str) -> ApiResult<Profile> {
        self.fetch::<SummariesEnvelope>(
            SteamMethod::PlayerSummaries,
            &[("steamids", steam_id.to_string())],
        )
        .await
        .and_then(|SummariesEnvelope { response }| response.players.into_iter().next().into())
    }

    /// Resolves `identifier` and fetches its profile.
    ///
    /// Anything that goes wrong along the way yields the [`Profile::invalid`]
    /// sentinel; if the vanity lookup fails, `GetPlayerSummaries` is not called.
    pub async fn resolve_user(&self, identifier: &str) -> ResolvedUser {
        let steam_id = match self.resolve_steam_id(identifier).await {
            ApiResult::Success(steam_id) => steam_id,
            _ => return ResolvedUser::invalid(),
        };

        let profile = match self.fetch_profile(&steam_id).await {
            ApiResult::Success(profile) => profile,
            _ => {
                tracing::debug!("[resolve_user] no player record for {}", steam_id);
                Profile::invalid()
            }
        };

        ResolvedUser {
            steam_id: Some(steam_id),
            profile,
        }
    }
}
