use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use steam_playtime::{
    config::{Config, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS},
    logging::{self, Console},
    steam::{ApiResult, SortOrder, SteamClient},
};

#[derive(Parser)]
#[command(name = "steam-playtime-cli")]
#[command(version, about = "Look up Steam profiles, playtime and achievements")]
struct Cli {
    /// Steam Web API key
    #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Account to use when a command is given no identifier
    #[arg(long, env = "STEAM_DEFAULT_ID")]
    default_steam_id: Option<String>,

    /// Base URL of the Steam Web API
    #[arg(long, env = "STEAM_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "STEAM_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Also list free games the account has played
    #[arg(
        long,
        env = "STEAM_INCLUDE_FREE_GAMES",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    include_free_games: bool,

    /// Write logs to a daily-rolling file in this directory
    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every field of an account's profile
    Profile {
        /// SteamID64 or vanity name
        identifier: Option<String>,
    },

    /// Print hours played per owned game
    Playtime {
        /// SteamID64 or vanity name
        identifier: Option<String>,

        /// Most played first (default is least played first)
        #[arg(long)]
        descending: bool,
    },

    /// Print hours played per game over the last two weeks
    Recent {
        /// SteamID64 or vanity name
        identifier: Option<String>,
    },

    /// Print achievement progress in one game
    Achievements {
        /// App id of the game
        #[arg(long)]
        appid: u64,

        /// SteamID64 or vanity name
        identifier: Option<String>,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new(self.api_key.clone());
        config.default_steam_id = self.default_steam_id.clone();
        config.api_base_url = self.api_base_url.clone();
        config.request_timeout = Duration::from_secs(self.timeout);
        config.include_played_free_games = self.include_free_games;
        config.log_dir = self.log_dir.clone();
        config
    }
}

/// Unwraps a successful outcome or explains why there is nothing to print.
fn require<T>(what: &str, result: ApiResult<T>) -> anyhow::Result<T> {
    match result {
        ApiResult::Success(data) => Ok(data),
        ApiResult::Empty => bail!("no {} data available", what),
        ApiResult::RateLimited => {
            bail!("Steam API rate limit exceeded, please wait and try again later")
        }
        ApiResult::RemoteError(error) => {
            Err(anyhow::Error::new(error).context(format!("failed to fetch {}", what)))
        }
    }
}

async fn resolve(steam: &SteamClient, identifier: &str) -> anyhow::Result<String> {
    match steam.resolve_steam_id(identifier).await {
        ApiResult::Empty => bail!("Invalid Steam ID: {}", identifier),
        other => require("Steam ID", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = cli.config();

    let _guard = logging::init_tracing(
        "steam_playtime=warn",
        Console::Stderr,
        config.log_dir.as_deref(),
    );

    let steam = SteamClient::new(&config).context("failed to build Steam API client")?;

    let identifier = |given: &Option<String>| -> anyhow::Result<String> {
        given
            .clone()
            .or_else(|| config.default_steam_id.clone())
            .context("no Steam ID given and STEAM_DEFAULT_ID is not set")
    };

    match &cli.command {
        Commands::Profile { identifier: given } => {
            let user = steam.resolve_user(&identifier(given)?).await;
            if user.profile.is_invalid() {
                bail!("{}", user.profile.display_name);
            }
            for (field, value) in user.profile.fields() {
                println!("{}: {}", field, value);
            }
        }
        Commands::Playtime {
            identifier: given,
            descending,
        } => {
            let steam_id = resolve(&steam, &identifier(given)?).await?;
            let order = if *descending {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            for game in require("playtime", steam.fetch_playtime(&steam_id, order).await)? {
                println!("{}: {:.2} hours", game.title, game.hours);
            }
        }
        Commands::Recent { identifier: given } => {
            let steam_id = resolve(&steam, &identifier(given)?).await?;
            for game in require("recent playtime", steam.fetch_recent_playtime(&steam_id).await)? {
                println!("{}: {:.2} hours", game.title, game.hours);
            }
        }
        Commands::Achievements {
            appid,
            identifier: given,
        } => {
            let steam_id = resolve(&steam, &identifier(given)?).await?;
            let achievements = require(
                "achievement",
                steam.fetch_achievements(&steam_id, *appid).await,
            )?;
            println!("Achievements for appid {}:", appid);
            for achievement in achievements {
                println!("{}: {}", achievement.name, achievement.status);
            }
        }
    }

    Ok(())
}
