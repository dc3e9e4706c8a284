use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dao::models::UserGameStatsEntity,
    dto::users::{BadgeSummary, UserStatsResponse},
    error::{AppError, ServiceError},
    services::badge_service,
    state::SharedState,
};

/// Public user profile reads.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/users/{user}/stats", get(user_stats))
        .route("/users/{user}/badges", get(user_badges))
}

#[utoipa::path(
    get,
    path = "/users/{user}/stats",
    tag = "users",
    params(("user" = Uuid, Path, description = "Identifier of the user")),
    responses((status = 200, description = "Balances and game record", body = UserStatsResponse))
)]
/// Balances and win/loss record for a user. Unknown users report zeroes.
pub async fn user_stats(
    State(state): State<SharedState>,
    Path(user): Path<Uuid>,
) -> Result<Json<UserStatsResponse>, AppError> {
    let store = state.require_store().await?;

    let stats = store.stats_for(user).await.map_err(ServiceError::from)?;
    let mut records = store
        .game_stats_for(vec![user])
        .await
        .map_err(ServiceError::from)?;
    let record = records
        .pop()
        .unwrap_or_else(|| UserGameStatsEntity::zeroed(user));

    Ok(Json(UserStatsResponse::new(stats, record)))
}

#[utoipa::path(
    get,
    path = "/users/{user}/badges",
    tag = "users",
    params(("user" = Uuid, Path, description = "Identifier of the user")),
    responses((status = 200, description = "Badges owned by the user", body = [BadgeSummary]))
)]
/// All badges owned by a user.
pub async fn user_badges(
    State(state): State<SharedState>,
    Path(user): Path<Uuid>,
) -> Result<Json<Vec<BadgeSummary>>, AppError> {
    let badges = badge_service::badges_for_user(&state, user).await?;
    Ok(Json(badges.into_iter().map(Into::into).collect()))
}
