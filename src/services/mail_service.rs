//! Outbound mail notifications, delivered through a configurable webhook.
//!
//! Delivery is fire and forget: a failed notification is logged and never
//! blocks or fails the request that triggered it.

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{dao::models::GameEntity, domain::game::Team, state::SharedState};

#[derive(Debug, Serialize)]
struct GameEndedNotification {
    game_id: Uuid,
    title: String,
    winning_team: Option<Team>,
    tie: bool,
    participants: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
struct ApplicationNotification {
    game_id: Uuid,
    title: String,
    user_id: Uuid,
    action: ApplicationAction,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum ApplicationAction {
    Applied,
    Resigned,
}

/// Notify seated participants that their game has ended and been settled.
pub fn notify_game_ended(state: &SharedState, game: &GameEntity, participants: Vec<Uuid>) {
    let Some(webhook) = state.config().mail_webhook.clone() else {
        debug!(game_id = %game.id, "mail webhook not configured; skipping notification");
        return;
    };
    if participants.is_empty() {
        return;
    }

    let payload = GameEndedNotification {
        game_id: game.id,
        title: game.title.clone(),
        winning_team: game.score.as_ref().and_then(|score| score.winning_team),
        tie: game.score.as_ref().is_some_and(|score| score.tie),
        participants,
    };
    deliver(webhook, game.id, "game ended", payload);
}

/// Notify about a freshly filed application.
pub fn notify_application_filed(state: &SharedState, game: &GameEntity, user_id: Uuid) {
    notify_application_change(state, game, user_id, ApplicationAction::Applied);
}

/// Notify about a withdrawn application.
pub fn notify_resignation(state: &SharedState, game: &GameEntity, user_id: Uuid) {
    notify_application_change(state, game, user_id, ApplicationAction::Resigned);
}

fn notify_application_change(
    state: &SharedState,
    game: &GameEntity,
    user_id: Uuid,
    action: ApplicationAction,
) {
    let Some(webhook) = state.config().mail_webhook.clone() else {
        debug!(game_id = %game.id, "mail webhook not configured; skipping notification");
        return;
    };

    let payload = ApplicationNotification {
        game_id: game.id,
        title: game.title.clone(),
        user_id,
        action,
    };
    deliver(webhook, game.id, "application change", payload);
}

/// Post the payload to the webhook on a detached task, logging the outcome.
fn deliver<T>(webhook: String, game_id: Uuid, what: &'static str, payload: T)
where
    T: Serialize + Send + 'static,
{
    tokio::spawn(async move {
        let client = reqwest::Client::new();
        match client.post(&webhook).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(%game_id, what, "notification delivered");
            }
            Ok(response) => {
                warn!(
                    %game_id,
                    what,
                    status = %response.status(),
                    "mail webhook rejected notification"
                );
            }
            Err(err) => {
                warn!(%game_id, what, error = %err, "mail webhook delivery failed");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_payload_carries_the_action() {
        let payload = ApplicationNotification {
            game_id: Uuid::nil(),
            title: "Season Opener".into(),
            user_id: Uuid::nil(),
            action: ApplicationAction::Resigned,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["action"], "resigned");
        assert_eq!(json["title"], "Season Opener");
    }
}
