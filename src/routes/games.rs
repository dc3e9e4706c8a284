use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    middleware,
    routing::{get, post},
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    dto::game::{ApplicationSummary, GameDetails, GameSnapshot},
    error::AppError,
    routes::auth::{self, Principal},
    services::{assignment_service, game_service},
    state::SharedState,
};

/// Query parameters accepted by the game search endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Title substring to match, case-insensitively.
    pub title: String,
}

/// Public game reads and player self-service application endpoints.
pub fn router(state: SharedState) -> Router<SharedState> {
    let applications = Router::new()
        .route(
            "/games/{game}/applications/{user}",
            post(apply).delete(resign),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::authenticate));

    Router::new()
        .route("/games", get(search_games))
        .route("/games/latest", get(latest_game))
        .route("/games/active", get(active_games))
        .route("/games/{game}", get(game_by_id))
        .merge(applications)
}

#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(SearchQuery),
    responses((status = 200, description = "Games matching the title search", body = [GameSnapshot]))
)]
/// Search games by title.
pub async fn search_games(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<GameSnapshot>>, AppError> {
    Ok(Json(game_service::search_games(&state, &query.title).await?))
}

#[utoipa::path(
    get,
    path = "/games/latest",
    tag = "games",
    responses((status = 200, description = "The most recently scheduled game", body = GameDetails))
)]
/// The game with the most recent start time.
pub async fn latest_game(
    State(state): State<SharedState>,
) -> Result<Json<GameDetails>, AppError> {
    Ok(Json(game_service::latest_game(&state).await?))
}

#[utoipa::path(
    get,
    path = "/games/active",
    tag = "games",
    responses((status = 200, description = "Games currently live", body = [GameSnapshot]))
)]
/// All games currently live.
pub async fn active_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameSnapshot>>, AppError> {
    Ok(Json(game_service::active_games(&state).await?))
}

#[utoipa::path(
    get,
    path = "/games/{game}",
    tag = "games",
    params(("game" = Uuid, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game with its applications", body = GameDetails),
        (status = 404, description = "Unknown game")
    )
)]
/// Fetch a single game with its applications.
pub async fn game_by_id(
    State(state): State<SharedState>,
    Path(game): Path<Uuid>,
) -> Result<Json<GameDetails>, AppError> {
    Ok(Json(game_service::game_details(&state, game).await?))
}

#[utoipa::path(
    post,
    path = "/games/{game}/applications/{user}",
    tag = "applications",
    params(
        ("game" = Uuid, Path, description = "Identifier of the game"),
        ("user" = Uuid, Path, description = "Identifier of the applying user")
    ),
    responses(
        (status = 200, description = "Application filed", body = ApplicationSummary),
        (status = 403, description = "Caller is neither the user nor a moderator"),
        (status = 409, description = "Application already exists")
    )
)]
/// File an application to play in a game.
pub async fn apply(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path((game, user)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApplicationSummary>, AppError> {
    if !principal.acts_for(user) {
        return Err(AppError::Forbidden(
            "applications can only be filed for yourself".into(),
        ));
    }

    let application = assignment_service::apply(&state, game, user).await?;
    Ok(Json(application.into()))
}

#[utoipa::path(
    delete,
    path = "/games/{game}/applications/{user}",
    tag = "applications",
    params(
        ("game" = Uuid, Path, description = "Identifier of the game"),
        ("user" = Uuid, Path, description = "Identifier of the withdrawing user")
    ),
    responses(
        (status = 200, description = "Application withdrawn"),
        (status = 403, description = "Caller is neither the user nor a moderator"),
        (status = 409, description = "No application on file")
    )
)]
/// Withdraw an application, releasing any held seat.
pub async fn resign(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path((game, user)): Path<(Uuid, Uuid)>,
) -> Result<(), AppError> {
    if !principal.acts_for(user) {
        return Err(AppError::Forbidden(
            "applications can only be withdrawn for yourself".into(),
        ));
    }

    assignment_service::resign(&state, game, user).await?;
    Ok(())
}
