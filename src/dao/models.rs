use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::domain::badges::Badge;
use crate::domain::game::{GameMode, Team};
use crate::domain::lifecycle::GameStatus;

/// Starting editor templates persisted with the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateSetEntity {
    /// Markup template.
    pub html: String,
    /// Stylesheet template.
    pub css: String,
    /// Script template.
    pub js: String,
}

/// Objective row embedded in the game document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectiveEntity {
    /// Stable identifier of the objective within its game.
    pub id: u32,
    /// What the teams have to build.
    pub description: String,
    /// Whether the objective is a bonus objective.
    pub is_bonus: bool,
}

/// Editor seat row embedded in the game document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditorSeatEntity {
    /// Stable identifier of the seat within its game.
    pub id: u32,
    /// Team holding the seat.
    pub team: Team,
    /// User occupying the seat.
    pub user_id: Uuid,
    /// Language role for this seat.
    pub language: String,
}

/// Final per-team score block persisted at game end.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamScoreEntity {
    /// Number of objectives the team completed.
    pub objectives_completed: u32,
    /// Votes received for UI quality.
    pub ui_votes: u32,
    /// Votes received for UX quality.
    pub ux_votes: u32,
    /// Total coins bet on this team by spectators.
    pub bets: u32,
}

/// Outcome summary persisted on the game once it has ended.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreSummaryEntity {
    /// Blue team's final score block.
    pub blue: TeamScoreEntity,
    /// Red team's final score block.
    pub red: TeamScoreEntity,
    /// The winning team, absent when the game tied.
    pub winning_team: Option<Team>,
    /// Whether the game ended in a tie.
    pub tie: bool,
}

/// Aggregate game entity persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Public title shown on schedules.
    pub title: String,
    /// Scheduled start time.
    pub start_time: SystemTime,
    /// Season the game belongs to (1-based).
    pub season: u32,
    /// Format of the match.
    pub mode: GameMode,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Recorded VOD link once published.
    pub video_url: Option<String>,
    /// Starting templates per language.
    pub templates: TemplateSetEntity,
    /// Objectives in display order, each carrying its stable id.
    pub objectives: Vec<ObjectiveEntity>,
    /// Editor seats in display order, each carrying its stable id.
    pub editors: Vec<EditorSeatEntity>,
    /// Outcome summary, present once the game has ended.
    pub score: Option<ScoreSummaryEntity>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the game entity was updated.
    pub updated_at: SystemTime,
}

/// A user's application to play in a game, prior and after being seated.
///
/// Exactly one application may exist per `(game_id, user_id)` pair; the
/// backends enforce this with a unique index. A non-null `team` means the
/// user has been seated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationEntity {
    /// Primary key of the application.
    pub id: Uuid,
    /// Game the application belongs to; cascade-deleted with it.
    pub game_id: Uuid,
    /// Applying user.
    pub user_id: Uuid,
    /// Team the user is seated on, if any.
    pub team: Option<Team>,
    /// Language roles assigned to the user, in assignment order.
    pub assigned_languages: Vec<String>,
    /// When the application was filed.
    pub created_at: SystemTime,
}

impl ApplicationEntity {
    /// Build a fresh, unseated application.
    pub fn new(game_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            user_id,
            team: None,
            assigned_languages: Vec::new(),
            created_at: SystemTime::now(),
        }
    }
}

/// Per-user win/loss record. Mutated only by settlement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserGameStatsEntity {
    /// The user these counters belong to.
    pub user_id: Uuid,
    /// Career wins.
    pub wins: u32,
    /// Career losses.
    pub loses: u32,
    /// Consecutive wins without an intervening loss.
    pub win_streak: u32,
}

impl UserGameStatsEntity {
    /// Zeroed record for a user with no settled games.
    pub fn zeroed(user_id: Uuid) -> Self {
        Self {
            user_id,
            wins: 0,
            loses: 0,
            win_streak: 0,
        }
    }
}

/// Per-user currency balances. Both values are floor-clamped at zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStatsEntity {
    /// The user these balances belong to.
    pub user_id: Uuid,
    /// Spendable coin balance.
    pub coins: i64,
    /// Accumulated experience.
    pub xp: i64,
}

impl UserStatsEntity {
    /// Zeroed balances for a user with no history.
    pub fn zeroed(user_id: Uuid) -> Self {
        Self {
            user_id,
            coins: 0,
            xp: 0,
        }
    }
}

/// Badge ownership row; at most one per `(user_id, badge)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserBadgeEntity {
    /// Owning user.
    pub user_id: Uuid,
    /// The owned badge.
    pub badge: Badge,
    /// When the badge was awarded.
    pub awarded_at: SystemTime,
}
