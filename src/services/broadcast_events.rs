use serde::Serialize;
use tracing::warn;

use crate::{
    dao::models::{ApplicationEntity, GameEntity},
    dto::sse::{GameActivatedEvent, SeatChangedEvent, ServerEvent, SystemStatus},
    state::SharedState,
};

const EVENT_GAME_ACTIVATED: &str = "game.activated";
const EVENT_SEAT_CHANGED: &str = "game.seat.updated";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast that a game went live.
pub fn broadcast_game_activated(state: &SharedState, game: GameEntity) {
    let payload = GameActivatedEvent { game: game.into() };
    send_spectator_event(state, EVENT_GAME_ACTIVATED, &payload);
}

/// Broadcast a seat update for a live game.
pub fn broadcast_seat_changed(state: &SharedState, application: &ApplicationEntity) {
    let payload = SeatChangedEvent {
        game_id: application.game_id,
        user_id: application.user_id,
        team: application.team,
        assigned_languages: application.assigned_languages.clone(),
    };
    send_spectator_event(state, EVENT_SEAT_CHANGED, &payload);
}

/// Broadcast that the backend entered or left degraded mode.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    let payload = SystemStatus { degraded };
    send_spectator_event(state, EVENT_SYSTEM_STATUS, &payload);
}

fn send_spectator_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.spectator_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize spectator SSE payload"),
    }
}
