use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    services::sse_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/spectator",
    responses((status = 200, description = "Spectator SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream realtime spectator events to connected frontends.
pub async fn spectator_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_spectator(&state);
    info!("new spectator SSE connection");

    let handshake = Handshake {
        stream: "spectator".into(),
        message: "spectator stream connected".into(),
        degraded: state.is_degraded().await,
    };
    if let Ok(event) = ServerEvent::json(Some("handshake".to_string()), &handshake) {
        state.spectator_sse().broadcast(event);
    }

    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/spectator", get(spectator_stream))
}
