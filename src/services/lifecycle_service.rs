//! Lifecycle transitions: putting a game live and closing it out.
//!
//! Both transitions go through a conditional status flip in storage. The
//! caller whose flip matched owns the follow-up side effects; everyone else
//! gets a clean conflict.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, ScoreSummaryEntity, TeamScoreEntity},
    dao::store::{DevwarsStore, StatusFlip},
    dto::{
        game::GameSnapshot,
        results::{EndGameRequest, TeamResultInput},
    },
    error::ServiceError,
    services::{broadcast_events, settlement_service},
    state::SharedState,
};

/// Put a scheduled (or previously ended) game live.
///
/// Re-activating an ended game is the rematch path: the stale score summary
/// is cleared by the flip so the next end recomputes everything. Career
/// stats from the earlier settlement are deliberately left in place.
pub async fn activate(state: &SharedState, id: Uuid) -> Result<GameSnapshot, ServiceError> {
    let store = state.require_store().await?;

    match store.activate_game(id).await? {
        StatusFlip::Applied(game) => {
            broadcast_events::broadcast_game_activated(state, (*game).clone());
            Ok((*game).into())
        }
        StatusFlip::Rejected(status) => Err(ServiceError::Conflict(format!(
            "game `{id}` cannot go live while {status:?}"
        ))),
        StatusFlip::NotFound => Err(ServiceError::NotFound(format!("game `{id}` not found"))),
    }
}

/// Close a game with its final results and settle it.
pub async fn end(
    state: &SharedState,
    id: Uuid,
    request: EndGameRequest,
) -> Result<GameSnapshot, ServiceError> {
    let store = state.require_store().await?;

    let Some(game) = store.find_game(id).await? else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    let score = build_score_summary(&game, &request)?;

    match store.end_game(id, score).await? {
        StatusFlip::Applied(ended) => {
            settlement_service::settle(state, &ended).await?;
            notify_participants(state, &store, &ended).await;
            Ok((*ended).into())
        }
        // Double-end is a caller mistake, reported as a plain bad request.
        StatusFlip::Rejected(_) => Err(ServiceError::InvalidInput(format!(
            "game `{id}` has already ended"
        ))),
        StatusFlip::NotFound => Err(ServiceError::NotFound(format!("game `{id}` not found"))),
    }
}

/// Turn the reported results into the persisted score summary, validating the
/// objective identifiers against the game's objective list.
fn build_score_summary(
    game: &GameEntity,
    request: &EndGameRequest,
) -> Result<ScoreSummaryEntity, ServiceError> {
    let known: HashSet<u32> = game.objectives.iter().map(|objective| objective.id).collect();

    Ok(ScoreSummaryEntity {
        blue: team_score(&known, &request.blue)?,
        red: team_score(&known, &request.red)?,
        winning_team: request.winner,
        tie: request.tie,
    })
}

fn team_score(
    known: &HashSet<u32>,
    input: &TeamResultInput,
) -> Result<TeamScoreEntity, ServiceError> {
    let mut completed = HashSet::new();
    for objective_id in &input.completed_objectives {
        if !known.contains(objective_id) {
            return Err(ServiceError::InvalidInput(format!(
                "unknown objective id `{objective_id}`"
            )));
        }
        completed.insert(*objective_id);
    }

    Ok(TeamScoreEntity {
        objectives_completed: completed.len() as u32,
        ui_votes: input.ui_votes,
        ux_votes: input.ux_votes,
        bets: input.bets,
    })
}

#[cfg(feature = "mail")]
async fn notify_participants(
    state: &SharedState,
    store: &Arc<dyn DevwarsStore>,
    game: &GameEntity,
) {
    use crate::services::mail_service;

    match store.applications_for_game(game.id).await {
        Ok(applications) => {
            let participants: Vec<Uuid> = applications
                .iter()
                .filter(|application| application.team.is_some())
                .map(|application| application.user_id)
                .collect();
            mail_service::notify_game_ended(state, game, participants);
        }
        Err(err) => {
            tracing::warn!(game_id = %game.id, error = %err, "skipping end-of-game mail");
        }
    }
}

#[cfg(not(feature = "mail"))]
async fn notify_participants(
    _state: &SharedState,
    _store: &Arc<dyn DevwarsStore>,
    _game: &GameEntity,
) {
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::ObjectiveEntity;
    use crate::domain::game::{Game, GameMode, Team, TemplateSet};
    use crate::dto::results::TeamResultInput;
    use std::time::SystemTime;

    fn game_with_objectives(ids: &[u32]) -> GameEntity {
        let mut entity: GameEntity = Game::new(
            "test".into(),
            SystemTime::now(),
            1,
            GameMode::Classic,
            TemplateSet::default(),
            Default::default(),
        )
        .into();
        entity.objectives = ids
            .iter()
            .map(|id| ObjectiveEntity {
                id: *id,
                description: format!("objective {id}"),
                is_bonus: false,
            })
            .collect();
        entity
    }

    fn request_completing(blue: Vec<u32>, red: Vec<u32>) -> EndGameRequest {
        EndGameRequest {
            blue: TeamResultInput {
                completed_objectives: blue,
                ..Default::default()
            },
            red: TeamResultInput {
                completed_objectives: red,
                ..Default::default()
            },
            winner: Some(Team::Blue),
            tie: false,
        }
    }

    #[test]
    fn duplicate_objective_ids_count_once() {
        let game = game_with_objectives(&[1, 2, 3]);
        let summary =
            build_score_summary(&game, &request_completing(vec![1, 1, 2], vec![])).unwrap();
        assert_eq!(summary.blue.objectives_completed, 2);
        assert_eq!(summary.red.objectives_completed, 0);
    }

    #[test]
    fn unknown_objective_id_is_rejected() {
        let game = game_with_objectives(&[1, 2]);
        let err = build_score_summary(&game, &request_completing(vec![9], vec![])).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
