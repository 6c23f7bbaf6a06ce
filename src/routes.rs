use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    models::{AchievementsQuery, PlaytimeQuery, SteamIdQuery},
    render::IndexPage,
    steam::{ApiResult, ResolvedUser, SortOrder, INVALID_STEAM_ID},
    SharedAppState,
};

/// The full application: the playtime page, the JSON API and the health probe.
pub fn app(state: SharedAppState) -> Router {
    Router::new()
        .route("/", get(index).post(index_form))
        .route("/_/health", get(|| async { "ok" }))
        .nest("/api", api_routes(state.clone()))
        .fallback(handle_404)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn api_routes(state: SharedAppState) -> Router<SharedAppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/playtime", get(get_playtime))
        .route("/achievements", get(get_achievements))
        .with_state(state)
}

async fn handle_404(url: Uri) -> Redirect {
    tracing::info!("404: {:?}", url);
    Redirect::to("/")
}

pub async fn index(
    State(state): State<SharedAppState>,
    Query(query): Query<SteamIdQuery>,
) -> Html<String> {
    render_index(&state, query.identifier()).await
}

/// Form submissions carry the identifier in the body; the query string is the fallback.
pub async fn index_form(
    State(state): State<SharedAppState>,
    Query(query): Query<SteamIdQuery>,
    form: Result<Form<SteamIdQuery>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("[index_form] ignoring form body: {}", rejection);
            SteamIdQuery::default()
        }
    };

    render_index(&state, form.identifier().or(query.identifier())).await
}

async fn render_index(state: &SharedAppState, identifier: Option<&str>) -> Html<String> {
    let page = match identifier {
        None => IndexPage::empty(),
        Some(identifier) => {
            tracing::debug!("[render_index] looking up {:?}", identifier);
            let user = state.steam.resolve_user(identifier).await;

            let games = match &user.steam_id {
                Some(steam_id) => state
                    .steam
                    .fetch_playtime(steam_id, SortOrder::Descending)
                    .await
                    .into_option()
                    .unwrap_or_default(),
                None => Vec::new(),
            };

            IndexPage::populated(identifier, &user.profile.display_name, games)
        }
    };

    Html(page.render())
}

fn make_ok<T: Serialize>(data: T) -> Response {
    Json(json!({
        "ok": true,
        "data": data,
    }))
    .into_response()
}

fn make_error(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(json!({
            "ok": false,
            "error": error,
        })),
    )
        .into_response()
}

/// The error response for any outcome other than `Success`/`Empty`.
fn upstream_error<T>(result: ApiResult<T>) -> Option<Response> {
    match result {
        ApiResult::RateLimited => Some(make_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Steam API rate limit exceeded, please wait and try again later",
        )),
        ApiResult::RemoteError(error) => {
            Some(make_error(StatusCode::BAD_GATEWAY, &error.to_string()))
        }
        ApiResult::Success(_) | ApiResult::Empty => None,
    }
}

/// Maps a fetch outcome onto the JSON envelope. `Empty` is a successful empty list.
fn api_outcome<T: Serialize>(result: ApiResult<Vec<T>>) -> Response {
    match result {
        ApiResult::Success(data) => make_ok(data),
        ApiResult::Empty => make_ok(Vec::<T>::new()),
        other => upstream_error(other).unwrap_or_else(|| make_ok(Vec::<T>::new())),
    }
}

fn missing_param(name: &str) -> Response {
    make_error(
        StatusCode::BAD_REQUEST,
        &format!("Missing required query parameter `{}`", name),
    )
}

fn bad_query(rejection: QueryRejection) -> Response {
    tracing::debug!("[bad_query] {}", rejection);
    make_error(StatusCode::BAD_REQUEST, &rejection.body_text())
}

/// Resolves `identifier` for the JSON API, or the error response to send instead.
async fn resolve_for_api(state: &SharedAppState, identifier: &str) -> Result<String, Response> {
    match state.steam.resolve_steam_id(identifier).await {
        ApiResult::Success(steam_id) => Ok(steam_id),
        ApiResult::Empty => Err(make_error(StatusCode::NOT_FOUND, INVALID_STEAM_ID)),
        other => Err(upstream_error(other)
            .unwrap_or_else(|| make_error(StatusCode::NOT_FOUND, INVALID_STEAM_ID))),
    }
}

pub async fn get_profile(
    State(state): State<SharedAppState>,
    query: Result<Query<SteamIdQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(rejection),
    };
    let Some(identifier) = query.identifier() else {
        return missing_param("steamid");
    };

    let steam_id = match resolve_for_api(&state, identifier).await {
        Ok(steam_id) => steam_id,
        Err(response) => return response,
    };

    match state.steam.fetch_profile(&steam_id).await {
        ApiResult::Success(profile) => make_ok(ResolvedUser {
            steam_id: Some(steam_id),
            profile,
        }),
        ApiResult::Empty => make_error(StatusCode::NOT_FOUND, INVALID_STEAM_ID),
        other => upstream_error(other)
            .unwrap_or_else(|| make_error(StatusCode::NOT_FOUND, INVALID_STEAM_ID)),
    }
}

pub async fn get_playtime(
    State(state): State<SharedAppState>,
    query: Result<Query<PlaytimeQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(rejection),
    };
    let identifier = SteamIdQuery {
        steamid: query.steamid,
    };
    let Some(identifier) = identifier.identifier() else {
        return missing_param("steamid");
    };

    let steam_id = match resolve_for_api(&state, identifier).await {
        Ok(steam_id) => steam_id,
        Err(response) => return response,
    };

    api_outcome(state.steam.fetch_playtime(&steam_id, query.order).await)
}

pub async fn get_achievements(
    State(state): State<SharedAppState>,
    query: Result<Query<AchievementsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(rejection),
    };
    let Some(appid) = query.appid else {
        return missing_param("appid");
    };
    let identifier = SteamIdQuery {
        steamid: query.steamid,
    };
    let Some(identifier) = identifier.identifier() else {
        return missing_param("steamid");
    };

    let steam_id = match resolve_for_api(&state, identifier).await {
        Ok(steam_id) => steam_id,
        Err(response) => return response,
    };

    api_outcome(state.steam.fetch_achievements(&steam_id, appid).await)
}
