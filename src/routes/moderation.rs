use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::game::{
        CoinGrantRequest, CoinGrantResponse, CreateGameRequest, GameDetails, GameSnapshot,
        SeatRequest, UnseatRequest,
    },
    dto::results::EndGameRequest,
    error::{AppError, ServiceError},
    routes::auth::{self, Principal},
    services::{assignment_service, badge_service, game_service, lifecycle_service},
    state::SharedState,
};

/// Moderation endpoints: scheduling, seating, lifecycle actions, and coin
/// grants. All of them require an authenticated caller.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/{game}", delete(delete_game))
        .route("/games/{game}/players", post(seat_player).delete(unseat_player))
        .route("/games/{game}/actions/activate", post(activate_game))
        .route("/games/{game}/actions/end", post(end_game))
        .route("/users/{user}/coins", post(grant_coins))
        .route_layer(middleware::from_fn_with_state(state, auth::authenticate))
}

#[utoipa::path(
    post,
    path = "/games",
    tag = "moderation",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game scheduled", body = GameSnapshot),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Moderator role required")
    )
)]
/// Schedule a new game.
pub async fn create_game(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameSnapshot>), AppError> {
    principal.require_moderator()?;
    payload.validate()?;

    let snapshot = game_service::create_game(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[utoipa::path(
    delete,
    path = "/games/{game}",
    tag = "moderation",
    params(("game" = Uuid, Path, description = "Identifier of the game to delete")),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Unknown game")
    )
)]
/// Delete a game together with its applications.
pub async fn delete_game(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path(game): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    principal.require_moderator()?;

    game_service::delete_game(&state, game).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/games/{game}/players",
    tag = "moderation",
    params(("game" = Uuid, Path, description = "Identifier of the game")),
    request_body = SeatRequest,
    responses(
        (status = 201, description = "Player seated", body = GameDetails),
        (status = 400, description = "User has not applied to the game"),
        (status = 409, description = "Team or language conflict")
    )
)]
/// Seat an applicant on a team with a language role.
pub async fn seat_player(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path(game): Path<Uuid>,
    Json(payload): Json<SeatRequest>,
) -> Result<(StatusCode, Json<GameDetails>), AppError> {
    principal.require_moderator()?;
    payload.validate()?;

    let result = assignment_service::assign(
        &state,
        game,
        payload.user_id,
        payload.team,
        payload.language,
    )
    .await;

    match result {
        Ok(_) => {
            let details = game_service::game_details(&state, game).await?;
            Ok((StatusCode::CREATED, Json(details)))
        }
        // A missing application is a caller mistake on this endpoint, not a
        // missing resource.
        Err(ServiceError::NotFound(message)) => Err(AppError::BadRequest(message)),
        Err(err) => Err(err.into()),
    }
}

#[utoipa::path(
    delete,
    path = "/games/{game}/players",
    tag = "moderation",
    params(("game" = Uuid, Path, description = "Identifier of the game")),
    request_body = UnseatRequest,
    responses(
        (status = 200, description = "Seat cleared", body = GameDetails),
        (status = 404, description = "No application on file")
    )
)]
/// Clear a player's seat assignments, keeping their application.
pub async fn unseat_player(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path(game): Path<Uuid>,
    Json(payload): Json<UnseatRequest>,
) -> Result<Json<GameDetails>, AppError> {
    principal.require_moderator()?;

    assignment_service::unassign(&state, game, payload.user_id).await?;
    Ok(Json(game_service::game_details(&state, game).await?))
}

#[utoipa::path(
    post,
    path = "/games/{game}/actions/activate",
    tag = "moderation",
    params(("game" = Uuid, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game is live", body = GameSnapshot),
        (status = 409, description = "Game is already live")
    )
)]
/// Put a scheduled or previously ended game live.
pub async fn activate_game(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path(game): Path<Uuid>,
) -> Result<Json<GameSnapshot>, AppError> {
    principal.require_moderator()?;

    Ok(Json(lifecycle_service::activate(&state, game).await?))
}

#[utoipa::path(
    post,
    path = "/games/{game}/actions/end",
    tag = "moderation",
    params(("game" = Uuid, Path, description = "Identifier of the game")),
    request_body = EndGameRequest,
    responses(
        (status = 200, description = "Game ended and settled"),
        (status = 400, description = "Game has already ended"),
        (status = 403, description = "Moderator role or trusted-bot key required")
    )
)]
/// Close a game with its final results and settle it.
pub async fn end_game(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path(game): Path<Uuid>,
    Json(payload): Json<EndGameRequest>,
) -> Result<(), AppError> {
    principal.require_moderator_or_bot()?;
    payload.validate()?;

    lifecycle_service::end(&state, game, payload).await?;
    Ok(())
}

#[utoipa::path(
    post,
    path = "/users/{user}/coins",
    tag = "moderation",
    params(("user" = Uuid, Path, description = "Identifier of the receiving user")),
    request_body = CoinGrantRequest,
    responses(
        (status = 200, description = "Coins credited", body = CoinGrantResponse),
        (status = 403, description = "Moderator role or trusted-bot key required")
    )
)]
/// Credit coins to a user, awarding any crossed threshold badges.
pub async fn grant_coins(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path(user): Path<Uuid>,
    Json(payload): Json<CoinGrantRequest>,
) -> Result<Json<CoinGrantResponse>, AppError> {
    principal.require_moderator_or_bot()?;
    payload.validate()?;

    let (coins, awarded) = badge_service::grant_coins(&state, user, payload.amount).await?;
    Ok(Json(CoinGrantResponse {
        user_id: user,
        coins,
        awarded_badges: awarded
            .iter()
            .map(|badge| badge.label().to_owned())
            .collect(),
    }))
}
