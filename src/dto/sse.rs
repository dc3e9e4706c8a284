use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{domain::game::Team, dto::game::GameSnapshot};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the spectator SSE channel.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already serialised data payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream (`spectator`).
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a game goes live.
pub struct GameActivatedEvent {
    pub game: GameSnapshot,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a seat changes while the game is live.
pub struct SeatChangedEvent {
    pub game_id: Uuid,
    pub user_id: Uuid,
    /// Team the user now sits on, absent when the seat was cleared.
    #[schema(value_type = Option<String>)]
    pub team: Option<Team>,
    /// Languages the user now holds.
    pub assigned_languages: Vec<String>,
}
