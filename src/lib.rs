//! Look up a Steam account's playtime through the Steam Web API and show it as
//! a simple web page (`steam-playtime`) or on the command line
//! (`steam-playtime-cli`).

pub mod config;
pub mod logging;
pub mod models;
pub mod render;
pub mod routes;
pub mod steam;

use steam::SteamClient;

#[derive(Clone, Debug)]
pub struct SharedAppState {
    pub steam: SteamClient,
}
