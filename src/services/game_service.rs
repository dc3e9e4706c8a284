//! Game scheduling and read-only projections backing the public REST routes.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::{
    dao::models::GameEntity,
    domain::game::{Game, Objective, TemplateSet},
    dto::{
        game::{CreateGameRequest, GameDetails, GameSnapshot},
        parse_rfc3339,
    },
    error::ServiceError,
    state::SharedState,
};

/// Schedule a new game from a validated request.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameSnapshot, ServiceError> {
    let store = state.require_store().await?;

    let start_time = parse_rfc3339(&request.start_time).ok_or_else(|| {
        ServiceError::InvalidInput(format!(
            "start_time `{}` is not a valid RFC 3339 timestamp",
            request.start_time
        ))
    })?;

    let templates = request
        .templates
        .map(|input| TemplateSet {
            html: input.html,
            css: input.css,
            js: input.js,
        })
        .unwrap_or_default();

    let objectives: IndexMap<u32, Objective> = request
        .objectives
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            (
                index as u32 + 1,
                Objective {
                    description: input.description,
                    is_bonus: input.is_bonus,
                },
            )
        })
        .collect();

    let game = Game::new(
        request.title,
        start_time,
        request.season,
        request.mode,
        templates,
        objectives,
    );
    let entity: GameEntity = game.into();

    store.create_game(entity.clone()).await?;
    Ok(entity.into())
}

/// Fetch a game by id, with its applications attached.
pub async fn game_details(state: &SharedState, id: Uuid) -> Result<GameDetails, ServiceError> {
    let store = state.require_store().await?;

    let Some(game) = store.find_game(id).await? else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    let applications = store.applications_for_game(id).await?;

    Ok(GameDetails::new(game, applications))
}

/// The game with the most recent start time.
pub async fn latest_game(state: &SharedState) -> Result<GameDetails, ServiceError> {
    let store = state.require_store().await?;

    let Some(game) = store.latest_game().await? else {
        return Err(ServiceError::NotFound("no games scheduled".into()));
    };
    let applications = store.applications_for_game(game.id).await?;

    Ok(GameDetails::new(game, applications))
}

/// All games currently live.
pub async fn active_games(state: &SharedState) -> Result<Vec<GameSnapshot>, ServiceError> {
    let store = state.require_store().await?;
    let games = store.active_games().await?;
    Ok(games.into_iter().map(Into::into).collect())
}

/// Case-insensitive title search.
pub async fn search_games(
    state: &SharedState,
    title: &str,
) -> Result<Vec<GameSnapshot>, ServiceError> {
    if title.trim().is_empty() {
        return Err(ServiceError::InvalidInput(
            "search title must not be empty".into(),
        ));
    }

    let store = state.require_store().await?;
    let games = store.search_games(title.to_owned()).await?;
    Ok(games.into_iter().map(Into::into).collect())
}

/// Delete a game together with its applications.
pub async fn delete_game(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;

    if store.delete_game(id).await? {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("game `{id}` not found")))
    }
}
