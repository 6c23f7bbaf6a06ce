use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::{ApiResult, SteamClient, SteamMethod};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AchievementStatus {
    Achieved(DateTime<Utc>),
    NotAchieved,
}

impl fmt::Display for AchievementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AchievementStatus::Achieved(at) => write!(f, "Achieved on {}", at.format("%B %-d, %Y")),
            AchievementStatus::NotAchieved => f.write_str("Not Achieved"),
        }
    }
}

impl Serialize for AchievementStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Achievement {
    /// `apiname` with underscores replaced by spaces.
    pub name: String,
    pub status: AchievementStatus,
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    playerstats: PlayerStats,
}

#[derive(Debug, Deserialize)]
struct PlayerStats {
    #[serde(default)]
    achievements: Option<Vec<RawAchievement>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAchievement {
    apiname: String,
    #[serde(default)]
    achieved: u8,
    #[serde(default)]
    unlocktime: i64,
}

impl From<RawAchievement> for Achievement {
    fn from(raw: RawAchievement) -> Self {
        let status = if raw.achieved != 0 {
            AchievementStatus::Achieved(DateTime::from_timestamp(raw.unlocktime, 0).unwrap_or_default())
        } else {
            AchievementStatus::NotAchieved
        };

        Achievement {
            name: raw.apiname.replace('_', " "),
            status,
        }
    }
}

impl SteamClient {
    /// Achievement progress of `steam_id` in the game `appid`, in API order.
    pub async fn fetch_achievements(&self, steam_id: &str, appid: u64) -> ApiResult<Vec<Achievement>> {
        tracing::debug!("[fetch_achievements] steamid: {}, appid: {}", steam_id, appid);

        self.fetch::<StatsEnvelope>(
            SteamMethod::PlayerAchievements,
            &[("appid", appid.to_string()), ("steamid", steam_id.to_string())],
        )
        .await
        .and_then(|StatsEnvelope { playerstats }| match playerstats.achievements {
            Some(achievements) => {
                ApiResult::Success(achievements.into_iter().map(Achievement::from).collect())
            }
            None => {
                tracing::debug!(
                    "[fetch_achievements] no achievements for appid {}: {}",
                    appid,
                    playerstats.error.as_deref().unwrap_or("missing from response")
                );
                ApiResult::Empty
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(apiname: &str, achieved: u8, unlocktime: i64) -> RawAchievement {
        RawAchievement {
            apiname: apiname.to_string(),
            achieved,
            unlocktime,
        }
    }

    #[test]
    fn test_achieved_formatting() {
        let achievement = Achievement::from(raw("kill_boss", 1, 1700000000));
        assert_eq!(achievement.name, "kill boss");
        assert_eq!(achievement.status.to_string(), "Achieved on November 14, 2023");
    }

    #[test]
    fn test_single_digit_day_has_no_padding() {
        // 2024-03-05T00:00:00Z
        let achievement = Achievement::from(raw("A_B_C", 1, 1709596800));
        assert_eq!(achievement.name, "A B C");
        assert_eq!(achievement.status.to_string(), "Achieved on March 5, 2024");
    }

    #[test]
    fn test_not_achieved_ignores_unlocktime() {
        let achievement = Achievement::from(raw("first_blood", 0, 1700000000));
        assert_eq!(achievement.status, AchievementStatus::NotAchieved);
        assert_eq!(achievement.status.to_string(), "Not Achieved");
    }

    #[test]
    fn test_status_serializes_as_string() {
        let achievement = Achievement::from(raw("kill_boss", 1, 1700000000));
        assert_eq!(
            serde_json::to_value(&achievement).unwrap(),
            serde_json::json!({"name": "kill boss", "status": "Achieved on November 14, 2023"})
        );
    }

    #[test]
    fn test_missing_achievements_list() {
        let envelope: StatsEnvelope = serde_json::from_str(
            r#"{"playerstats":{"steamID":"76561198839172366","gameName":"Spacewar","success":true}}"#,
        )
        .unwrap();
        assert!(envelope.playerstats.achievements.is_none());
    }
}
