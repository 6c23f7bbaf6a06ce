use serde::{Deserialize, Serialize};

use super::{ApiResult, SteamClient, SteamMethod};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "desc")]
    Descending,
    #[serde(alias = "asc")]
    Ascending,
}

/// One game in a playtime listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameEntry {
    pub appid: u64,
    pub title: String,
    pub hours: f64,
}

/// Minutes to hours, rounded to two decimal places.
pub fn minutes_to_hours(minutes: u64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}

#[derive(Debug, Deserialize)]
struct GamesEnvelope {
    #[serde(default)]
    response: Option<GamesResponse>,
}

#[derive(Debug, Deserialize)]
struct GamesResponse {
    #[serde(default)]
    games: Option<Vec<OwnedGame>>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    playtime_forever: u64,
    #[serde(default)]
    playtime_2weeks: u64,
}

impl GamesEnvelope {
    fn into_games(self) -> ApiResult<Vec<OwnedGame>> {
        self.response.and_then(|response| response.games).into()
    }
}

/// Stable-sorts `games` by `minutes` and reshapes them into entries.
fn to_entries<F>(mut games: Vec<OwnedGame>, order: SortOrder, minutes: F) -> Vec<GameEntry>
where
    F: Fn(&OwnedGame) -> u64,
{
    match order {
        SortOrder::Descending => games.sort_by(|a, b| minutes(b).cmp(&minutes(a))),
        SortOrder::Ascending => games.sort_by_key(|game| minutes(game)),
    }

    games
        .into_iter()
        .map(|game| {
            let hours = minutes_to_hours(minutes(&game));
            GameEntry {
                title: game.name.unwrap_or_else(|| game.appid.to_string()),
                appid: game.appid,
                hours,
            }
        })
        .collect()
}

impl SteamClient {
    /// Owned games for `steam_id`, sorted by total playtime.
    ///
    /// A response without a `games` list (private profile, no games, bad id)
    /// is `Empty`.
    pub async fn fetch_playtime(&self, steam_id: &str, order: SortOrder) -> ApiResult<Vec<GameEntry>> {
        tracing::debug!("[fetch_playtime] steamid: {}", steam_id);

        let mut params = vec![
            ("steamid", steam_id.to_string()),
            ("include_appinfo", "true".to_string()),
        ];
        if self.include_played_free_games {
            params.push(("include_played_free_games", "true".to_string()));
        }

        let games = self
            .fetch::<GamesEnvelope>(SteamMethod::OwnedGames, &params)
            .await
            .and_then(GamesEnvelope::into_games);

        if matches!(games, ApiResult::Empty) {
            tracing::debug!("[fetch_playtime] no games data found for {}", steam_id);
        }

        games.map(|games| to_entries(games, order, |game| game.playtime_forever))
    }

    /// Games played in the last two weeks, sorted by two-week playtime (descending).
    pub async fn fetch_recent_playtime(&self, steam_id: &str) -> ApiResult<Vec<GameEntry>> {
        tracing::debug!("[fetch_recent_playtime] steamid: {}", steam_id);

        self.fetch::<GamesEnvelope>(
            SteamMethod::RecentlyPlayedGames,
            &[("steamid", steam_id.to_string())],
        )
        .await
        .and_then(GamesEnvelope::into_games)
        .map(|games| to_entries(games, SortOrder::Descending, |game| game.playtime_2weeks))
    }
}
