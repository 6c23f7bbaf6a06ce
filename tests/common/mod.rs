//! A local stand-in for the Steam Web API.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use steam_playtime::{
    config::Config,
    steam::{SteamClient, SteamMethod},
    SharedAppState,
};
use tokio::net::TcpListener;

pub const STEAM_ID: &str = "76561198839172366";
pub const API_KEY: &str = "test-key";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<HashMap<String, (StatusCode, String)>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

#[derive(Default)]
pub struct MockSteam {
    responses: HashMap<String, (StatusCode, String)>,
}

pub struct RunningMock {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

fn route_path(method: SteamMethod) -> String {
    format!("/{}", method.path())
}

async fn respond(
    State(state): State<MockState>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        query,
    });

    match state.responses.get(&path) {
        Some((status, body)) => (*status, body.clone()),
        None => (StatusCode::NOT_FOUND, "Not Found".to_string()),
    }
}

impl MockSteam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, method: SteamMethod, status: u16, body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.responses.insert(route_path(method), (status, body.into()));
        self
    }

    pub fn json(self, method: SteamMethod, body: serde_json::Value) -> Self {
        self.respond(method, 200, body.to_string())
    }

    pub async fn start(self) -> RunningMock {
        let state = MockState {
            responses: Arc::new(self.responses),
            requests: Arc::default(),
        };
        let requests = state.requests.clone();

        let app = Router::new().fallback(respond).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningMock {
            base_url: format!("http://{}", addr),
            requests,
        }
    }
}

impl RunningMock {
    pub fn config(&self) -> Config {
        let mut config = Config::new(API_KEY);
        config.api_base_url = self.base_url.clone();
        config
    }

    pub fn client(&self) -> SteamClient {
        SteamClient::new(&self.config()).unwrap()
    }

    pub fn state(&self) -> SharedAppState {
        SharedAppState {
            steam: self.client(),
        }
    }

    /// Query strings of every request made to `method`, oldest first.
    pub fn calls(&self, method: SteamMethod) -> Vec<HashMap<String, String>> {
        let path = route_path(method);
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.query.clone())
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub fn owned_games_body() -> serde_json::Value {
    serde_json::json!({
        "response": {
            "game_count": 3,
            "games": [
                {"appid": 20, "name": "B", "playtime_forever": 60},
                {"appid": 10, "name": "A", "playtime_forever": 120},
                {"appid": 30, "playtime_forever": 90}
            ]
        }
    })
}

pub fn summaries_body(steam_id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "response": {
            "players": [{
                "steamid": steam_id,
                "communityvisibilitystate": 3,
                "personaname": name,
                "profileurl": format!("https://steamcommunity.com/profiles/{}/", steam_id),
                "avatar": "https://avatars.steamstatic.com/a.jpg",
                "lastlogoff": 1700000000,
                "personastate": 1
            }]
        }
    })
}

pub fn vanity_body(steam_id: &str) -> serde_json::Value {
    serde_json::json!({"response": {"steamid": steam_id, "success": 1}})
}

pub fn vanity_no_match_body() -> serde_json::Value {
    serde_json::json!({"response": {"success": 42, "message": "No match"}})
}
