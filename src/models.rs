use serde::Deserialize;

use crate::steam::SortOrder;

#[derive(Deserialize, Debug, Default)]
pub struct SteamIdQuery {
    pub steamid: Option<String>,
}

impl SteamIdQuery {
    /// The submitted identifier, trimmed, or `None` when blank.
    pub fn identifier(&self) -> Option<&str> {
        self.steamid
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Deserialize, Debug)]
pub struct PlaytimeQuery {
    pub steamid: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Deserialize, Debug)]
pub struct AchievementsQuery {
    pub steamid: Option<String>,
    pub appid: Option<u64>,
}
