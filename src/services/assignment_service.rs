//! Application and seating workflows: filing an application, resigning, and
//! the moderator-driven seat assignments.

use std::sync::Arc;
use std::time::SystemTime;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{ApplicationEntity, EditorSeatEntity, GameEntity},
    dao::store::{DevwarsStore, SeatOutcome},
    domain::game::Team,
    domain::lifecycle::GameStatus,
    error::ServiceError,
    services::broadcast_events,
    state::SharedState,
};

/// File an application for a user to play in a game.
pub async fn apply(
    state: &SharedState,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<ApplicationEntity, ServiceError> {
    let store = state.require_store().await?;
    let game = require_game(&store, game_id).await?;

    if game.status == GameStatus::Ended {
        return Err(ServiceError::Conflict(format!(
            "game `{game_id}` has ended; applications are closed"
        )));
    }

    let application = ApplicationEntity::new(game_id, user_id);
    store.create_application(application.clone()).await?;
    notify_applied(state, &game, user_id);
    Ok(application)
}

/// Withdraw a user's application, releasing any seat they held.
pub async fn resign(state: &SharedState, game_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;

    let held_seat = store
        .find_application(game_id, user_id)
        .await?
        .is_some_and(|application| application.team.is_some());

    // A missing application reports as a conflict so retried withdrawals are
    // distinguishable from a bad game id.
    if !store.delete_application(game_id, user_id).await? {
        return Err(ServiceError::Conflict(format!(
            "no application by user `{user_id}` for game `{game_id}`"
        )));
    }

    if held_seat {
        refresh_roster(state, &store, game_id, user_id).await;
    }
    notify_resigned(state, &store, game_id, user_id).await;
    Ok(())
}

/// Seat an applicant on a team with a language role.
pub async fn assign(
    state: &SharedState,
    game_id: Uuid,
    user_id: Uuid,
    team: Team,
    language: String,
) -> Result<ApplicationEntity, ServiceError> {
    let store = state.require_store().await?;
    let game = require_game(&store, game_id).await?;

    if game.status == GameStatus::Ended {
        return Err(ServiceError::Conflict(format!(
            "game `{game_id}` has ended; seating is closed"
        )));
    }

    match store
        .seat_application(game_id, user_id, team, language.clone())
        .await?
    {
        SeatOutcome::Seated(application) => {
            refresh_roster(state, &store, game_id, user_id).await;
            Ok(*application)
        }
        SeatOutcome::NotApplied => Err(ServiceError::NotFound(format!(
            "user `{user_id}` has not applied to game `{game_id}`"
        ))),
        SeatOutcome::OtherTeam => Err(ServiceError::Conflict(format!(
            "user `{user_id}` is already seated on the other team"
        ))),
        SeatOutcome::LanguageTaken => Err(ServiceError::Conflict(format!(
            "language `{language}` is already taken on that team"
        ))),
    }
}

/// Clear a user's seat assignments, keeping the application on file.
pub async fn unassign(
    state: &SharedState,
    game_id: Uuid,
    user_id: Uuid,
) -> Result<ApplicationEntity, ServiceError> {
    let store = state.require_store().await?;

    let Some(application) = store.unseat_application(game_id, user_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "no application by user `{user_id}` for game `{game_id}`"
        )));
    };

    refresh_roster(state, &store, game_id, user_id).await;
    Ok(application)
}

#[cfg(feature = "mail")]
fn notify_applied(state: &SharedState, game: &GameEntity, user_id: Uuid) {
    crate::services::mail_service::notify_application_filed(state, game, user_id);
}

#[cfg(not(feature = "mail"))]
fn notify_applied(_state: &SharedState, _game: &GameEntity, _user_id: Uuid) {}

#[cfg(feature = "mail")]
async fn notify_resigned(
    state: &SharedState,
    store: &Arc<dyn DevwarsStore>,
    game_id: Uuid,
    user_id: Uuid,
) {
    match store.find_game(game_id).await {
        Ok(Some(game)) => {
            crate::services::mail_service::notify_resignation(state, &game, user_id);
        }
        Ok(None) => {}
        Err(err) => {
            warn!(%game_id, error = %err, "skipping resignation mail");
        }
    }
}

#[cfg(not(feature = "mail"))]
async fn notify_resigned(
    _state: &SharedState,
    _store: &Arc<dyn DevwarsStore>,
    _game_id: Uuid,
    _user_id: Uuid,
) {
}

async fn require_game(
    store: &Arc<dyn DevwarsStore>,
    game_id: Uuid,
) -> Result<GameEntity, ServiceError> {
    store
        .find_game(game_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game `{game_id}` not found")))
}

/// Rebuild the denormalized editor roster on the game document from the
/// application rows, then notify spectators when the game is live.
///
/// The roster is a display projection; the application rows stay the source
/// of truth, so a lost update here only delays what the next refresh writes.
async fn refresh_roster(
    state: &SharedState,
    store: &Arc<dyn DevwarsStore>,
    game_id: Uuid,
    changed_user: Uuid,
) {
    let result: Result<Option<(GameEntity, Vec<ApplicationEntity>)>, ServiceError> = async {
        let Some(mut game) = store.find_game(game_id).await? else {
            return Ok(None);
        };
        let applications = store.applications_for_game(game_id).await?;

        game.editors = roster_from_applications(&applications);
        game.updated_at = SystemTime::now();
        store.save_game(game.clone()).await?;
        Ok(Some((game, applications)))
    }
    .await;

    match result {
        Ok(Some((game, applications))) => {
            if game.status == GameStatus::Active {
                if let Some(application) = applications
                    .iter()
                    .find(|application| application.user_id == changed_user)
                {
                    broadcast_events::broadcast_seat_changed(state, application);
                }
            }
        }
        Ok(None) => {}
        Err(err) => {
            warn!(%game_id, error = %err, "failed to refresh editor roster");
        }
    }
}

/// Expand seated applications into editor seat rows with stable sequential ids.
fn roster_from_applications(applications: &[ApplicationEntity]) -> Vec<EditorSeatEntity> {
    let mut seats = Vec::new();
    let mut next_id = 1u32;
    for application in applications {
        let Some(team) = application.team else {
            continue;
        };
        for language in &application.assigned_languages {
            seats.push(EditorSeatEntity {
                id: next_id,
                team,
                user_id: application.user_id,
                language: language.clone(),
            });
            next_id += 1;
        }
    }
    seats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated(team: Team, languages: &[&str]) -> ApplicationEntity {
        let mut application = ApplicationEntity::new(Uuid::new_v4(), Uuid::new_v4());
        application.team = Some(team);
        application.assigned_languages = languages.iter().map(|s| s.to_string()).collect();
        application
    }

    #[test]
    fn roster_skips_unseated_applications() {
        let applications = vec![
            ApplicationEntity::new(Uuid::new_v4(), Uuid::new_v4()),
            seated(Team::Blue, &["html"]),
        ];
        let roster = roster_from_applications(&applications);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].team, Team::Blue);
        assert_eq!(roster[0].language, "html");
    }

    #[test]
    fn roster_expands_multi_language_seats() {
        let applications = vec![seated(Team::Red, &["css", "js"])];
        let roster = roster_from_applications(&applications);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, 1);
        assert_eq!(roster[1].id, 2);
        assert!(roster.iter().all(|seat| seat.team == Team::Red));
    }
}
