/// Application and seating workflows.
pub mod assignment_service;
/// Badge awarding and reward credits.
pub mod badge_service;
/// Spectator SSE event fan-out helpers.
pub mod broadcast_events;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game scheduling and read-only projections.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Lifecycle transitions and their side effects.
pub mod lifecycle_service;
#[cfg(feature = "mail")]
/// Outbound mail notifications.
pub mod mail_service;
/// Post-game settlement of experience, records, and badges.
pub mod settlement_service;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
