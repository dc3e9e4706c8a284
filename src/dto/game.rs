use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{ApplicationEntity, GameEntity, ScoreSummaryEntity, TeamScoreEntity},
    domain::game::{GameMode, Team},
    domain::lifecycle::GameStatus,
    dto::{format_system_time, validation::validate_language},
};

/// Payload used to schedule a brand-new game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    /// Public title shown on schedules.
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    /// Scheduled start time as an RFC 3339 timestamp.
    pub start_time: String,
    /// Season the game belongs to (1-based).
    #[validate(range(min = 1))]
    pub season: u32,
    /// Format of the match.
    #[schema(value_type = String)]
    pub mode: GameMode,
    /// Starting templates handed to each language seat.
    #[serde(default)]
    pub templates: Option<TemplateSetInput>,
    /// Objectives the teams compete on, in display order.
    #[validate(length(min = 1), nested)]
    pub objectives: Vec<ObjectiveInput>,
}

/// Starting editor templates supplied when scheduling a game.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TemplateSetInput {
    /// Markup template.
    #[serde(default)]
    pub html: String,
    /// Stylesheet template.
    #[serde(default)]
    pub css: String,
    /// Script template.
    #[serde(default)]
    pub js: String,
}

/// Objective definition supplied when scheduling a game.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ObjectiveInput {
    /// What the teams have to build.
    #[validate(length(min = 1))]
    pub description: String,
    /// Bonus objectives are excluded from completion counts.
    #[serde(default)]
    pub is_bonus: bool,
}

/// Payload used by moderators to seat an applicant on a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SeatRequest {
    /// The applicant being seated.
    #[serde(rename = "id")]
    pub user_id: Uuid,
    /// Team the applicant joins.
    #[schema(value_type = String)]
    pub team: Team,
    /// Language role granted by the seat.
    #[validate(custom(function = "validate_language"))]
    pub language: String,
}

/// Payload used by moderators to clear a user's seat.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UnseatRequest {
    /// The user whose seat assignments are cleared.
    #[serde(rename = "id")]
    pub user_id: Uuid,
}

/// Payload used to credit coins to a user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CoinGrantRequest {
    /// Coin amount to credit.
    #[validate(range(min = 1, max = 1_000_000))]
    pub amount: i64,
}

/// Public projection of a game returned by the REST surface.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSnapshot {
    /// Game identifier.
    pub id: Uuid,
    /// Public title.
    pub title: String,
    /// Scheduled start time, RFC 3339.
    pub start_time: String,
    /// Season number.
    pub season: u32,
    /// Match format.
    #[schema(value_type = String)]
    pub mode: GameMode,
    /// Lifecycle status.
    #[schema(value_type = String)]
    pub status: GameStatus,
    /// Recorded VOD link once published.
    pub video_url: Option<String>,
    /// Objectives in display order.
    pub objectives: Vec<ObjectiveSummary>,
    /// Editor seats in display order.
    pub editors: Vec<EditorSeatSummary>,
    /// Outcome summary, present once the game has ended.
    pub score: Option<ScoreSummaryDto>,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last update timestamp, RFC 3339.
    pub updated_at: String,
}

/// Public projection of an objective.
#[derive(Debug, Serialize, ToSchema)]
pub struct ObjectiveSummary {
    /// Stable identifier within the game.
    pub id: u32,
    /// What the teams have to build.
    pub description: String,
    /// Whether the objective is a bonus objective.
    pub is_bonus: bool,
}

/// Public projection of a seated editor.
#[derive(Debug, Serialize, ToSchema)]
pub struct EditorSeatSummary {
    /// Stable identifier within the game.
    pub id: u32,
    /// Team holding the seat.
    #[schema(value_type = String)]
    pub team: Team,
    /// User occupying the seat.
    pub user_id: Uuid,
    /// Language role for this seat.
    pub language: String,
}

/// Public projection of a per-team score block.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamScoreDto {
    /// Objectives the team completed.
    pub objectives_completed: u32,
    /// Votes received for UI quality.
    pub ui_votes: u32,
    /// Votes received for UX quality.
    pub ux_votes: u32,
    /// Coins bet on this team by spectators.
    pub bets: u32,
}

/// Public projection of the final outcome summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreSummaryDto {
    /// Blue team's final score block.
    pub blue: TeamScoreDto,
    /// Red team's final score block.
    pub red: TeamScoreDto,
    /// The winning team, absent when the game tied.
    #[schema(value_type = Option<String>)]
    pub winning_team: Option<Team>,
    /// Whether the game ended in a tie.
    pub tie: bool,
}

/// Public projection of a player application.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicationSummary {
    /// Applying user.
    pub user_id: Uuid,
    /// Team the user is seated on, if any.
    #[schema(value_type = Option<String>)]
    pub team: Option<Team>,
    /// Language roles assigned to the user.
    pub assigned_languages: Vec<String>,
    /// When the application was filed, RFC 3339.
    pub created_at: String,
}

/// A game snapshot together with its applications.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameDetails {
    /// The game itself.
    #[serde(flatten)]
    pub game: GameSnapshot,
    /// Applications filed for the game, in filing order.
    pub players: Vec<ApplicationSummary>,
}

impl GameDetails {
    /// Assemble the detail view from a game and its application rows.
    pub fn new(game: GameEntity, applications: Vec<ApplicationEntity>) -> Self {
        Self {
            game: game.into(),
            players: applications.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<TeamScoreEntity> for TeamScoreDto {
    fn from(value: TeamScoreEntity) -> Self {
        Self {
            objectives_completed: value.objectives_completed,
            ui_votes: value.ui_votes,
            ux_votes: value.ux_votes,
            bets: value.bets,
        }
    }
}

impl From<ScoreSummaryEntity> for ScoreSummaryDto {
    fn from(value: ScoreSummaryEntity) -> Self {
        Self {
            blue: value.blue.into(),
            red: value.red.into(),
            winning_team: value.winning_team,
            tie: value.tie,
        }
    }
}

impl From<GameEntity> for GameSnapshot {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            start_time: format_system_time(value.start_time),
            season: value.season,
            mode: value.mode,
            status: value.status,
            video_url: value.video_url,
            objectives: value
                .objectives
                .into_iter()
                .map(|objective| ObjectiveSummary {
                    id: objective.id,
                    description: objective.description,
                    is_bonus: objective.is_bonus,
                })
                .collect(),
            editors: value
                .editors
                .into_iter()
                .map(|seat| EditorSeatSummary {
                    id: seat.id,
                    team: seat.team,
                    user_id: seat.user_id,
                    language: seat.language,
                })
                .collect(),
            score: value.score.map(Into::into),
            created_at: format_system_time(value.created_at),
            updated_at: format_system_time(value.updated_at),
        }
    }
}

impl From<ApplicationEntity> for ApplicationSummary {
    fn from(value: ApplicationEntity) -> Self {
        Self {
            user_id: value.user_id,
            team: value.team,
            assigned_languages: value.assigned_languages,
            created_at: format_system_time(value.created_at),
        }
    }
}

/// Balances returned after a coin grant.
#[derive(Debug, Serialize, ToSchema)]
pub struct CoinGrantResponse {
    /// The receiving user.
    pub user_id: Uuid,
    /// Coin balance after the grant.
    pub coins: i64,
    /// Badges newly unlocked by the grant.
    pub awarded_badges: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(objectives: Vec<ObjectiveInput>) -> CreateGameRequest {
        CreateGameRequest {
            title: "Season Opener".into(),
            start_time: "2026-09-01T18:00:00Z".into(),
            season: 1,
            mode: GameMode::Classic,
            templates: None,
            objectives,
        }
    }

    #[test]
    fn scheduling_requires_at_least_one_objective() {
        assert!(request_with(vec![]).validate().is_err());
    }

    #[test]
    fn blank_objective_descriptions_are_rejected() {
        let request = request_with(vec![ObjectiveInput {
            description: String::new(),
            is_bonus: false,
        }]);
        assert!(request.validate().is_err());
    }

    #[test]
    fn well_formed_schedule_requests_pass_validation() {
        let request = request_with(vec![ObjectiveInput {
            description: "Ship the page".into(),
            is_bonus: false,
        }]);
        assert!(request.validate().is_ok());
    }
}
