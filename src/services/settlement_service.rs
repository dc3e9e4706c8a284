//! Settlement: the one-time payout of experience, win/loss records, and
//! badges after a game ends.
//!
//! Settlement runs only on the call that won the status flip to `ENDED`, so
//! its side effects are applied exactly once per ending even under concurrent
//! end requests.

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::GameEntity,
    domain::game::Team,
    error::ServiceError,
    services::badge_service,
    state::SharedState,
};

/// Apply the settlement side effects for a freshly ended game.
pub async fn settle(state: &SharedState, game: &GameEntity) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let rewards = state.config().rewards;

    let Some(score) = game.score.as_ref() else {
        // An ended game always carries a score summary; nothing to pay out
        // without one.
        return Ok(());
    };

    let applications = store.applications_for_game(game.id).await?;
    let seated: Vec<(Uuid, Team)> = applications
        .iter()
        .filter_map(|application| application.team.map(|team| (application.user_id, team)))
        .collect();

    if seated.is_empty() {
        info!(game_id = %game.id, "game settled with no seated players");
        return Ok(());
    }

    let Some(winning_team) = score.winning_team.filter(|_| !score.tie) else {
        // Tied games pay participation experience only; records and streaks
        // are untouched.
        let participants: Vec<Uuid> = seated.iter().map(|(user_id, _)| *user_id).collect();
        store
            .add_experience(participants.clone(), rewards.participation_xp)
            .await?;
        info!(
            game_id = %game.id,
            participants = participants.len(),
            "tied game settled with participation rewards"
        );
        return Ok(());
    };

    let winners: Vec<Uuid> = seated
        .iter()
        .filter(|(_, team)| *team == winning_team)
        .map(|(user_id, _)| *user_id)
        .collect();
    let losers: Vec<Uuid> = seated
        .iter()
        .filter(|(_, team)| *team != winning_team)
        .map(|(user_id, _)| *user_id)
        .collect();

    store.record_results(winners.clone(), losers.clone()).await?;
    store.add_experience(winners.clone(), rewards.win_xp).await?;
    store.add_experience(losers.clone(), -rewards.loss_xp).await?;

    // Every seated player earns the participation credit on top of the
    // win or loss delta.
    let participants: Vec<Uuid> = seated.iter().map(|(user_id, _)| *user_id).collect();
    store
        .add_experience(participants, rewards.participation_xp)
        .await?;

    badge_service::sweep_game_stats(&store, winners.clone()).await?;

    info!(
        game_id = %game.id,
        ?winning_team,
        winners = winners.len(),
        losers = losers.len(),
        "game settled"
    );
    Ok(())
}
