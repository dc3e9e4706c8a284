use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for DevWars Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::spectator_stream,
        crate::routes::games::search_games,
        crate::routes::games::latest_game,
        crate::routes::games::active_games,
        crate::routes::games::game_by_id,
        crate::routes::games::apply,
        crate::routes::games::resign,
        crate::routes::moderation::create_game,
        crate::routes::moderation::delete_game,
        crate::routes::moderation::seat_player,
        crate::routes::moderation::unseat_player,
        crate::routes::moderation::activate_game,
        crate::routes::moderation::end_game,
        crate::routes::moderation::grant_coins,
        crate::routes::users::user_stats,
        crate::routes::users::user_badges,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::dto::sse::GameActivatedEvent,
            crate::dto::sse::SeatChangedEvent,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::TemplateSetInput,
            crate::dto::game::ObjectiveInput,
            crate::dto::game::SeatRequest,
            crate::dto::game::UnseatRequest,
            crate::dto::game::CoinGrantRequest,
            crate::dto::game::CoinGrantResponse,
            crate::dto::game::GameSnapshot,
            crate::dto::game::GameDetails,
            crate::dto::game::ObjectiveSummary,
            crate::dto::game::EditorSeatSummary,
            crate::dto::game::TeamScoreDto,
            crate::dto::game::ScoreSummaryDto,
            crate::dto::game::ApplicationSummary,
            crate::dto::results::TeamResultInput,
            crate::dto::results::EndGameRequest,
            crate::dto::users::UserStatsResponse,
            crate::dto::users::BadgeSummary,
        )
    ),
    tags(
        (name = "games", description = "Public game reads"),
        (name = "applications", description = "Player application endpoints"),
        (name = "moderation", description = "Moderator and trusted-bot actions"),
        (name = "users", description = "User profile reads"),
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
