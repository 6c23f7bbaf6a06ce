use anyhow::Context;
use steam_playtime::{
    config::Config,
    logging::{self, Console},
    routes,
    steam::SteamClient,
    SharedAppState,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    let _guard = logging::init_tracing(
        "steam_playtime=debug,tower_http=debug,axum::rejection=trace",
        Console::Stdout,
        config.log_dir.as_deref(),
    );

    let version = env!("CARGO_PKG_VERSION");
    tracing::info!("🎮 Steam Playtime v{}", version);
    tracing::info!("Steam Web API: {}", config.api_base_url);

    let steam = SteamClient::new(&config).context("failed to build Steam API client")?;
    let state = SharedAppState { steam };

    let app = routes::app(state);

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;

    tracing::info!("🚀 Fast serving at: http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
