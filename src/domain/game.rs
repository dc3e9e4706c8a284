use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    EditorSeatEntity, GameEntity, ObjectiveEntity, ScoreSummaryEntity, TeamScoreEntity,
    TemplateSetEntity,
};
use crate::domain::lifecycle::GameStatus;

/// One of the two competing sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Team seated first.
    Blue,
    /// Team seated second.
    Red,
}

/// Game format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Regular timed match.
    Classic,
    /// Relaxed mode without vote pressure.
    ZenGarden,
    /// Short-format match.
    Blitz,
}

/// Starting editor templates handed to each language seat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    /// Markup template.
    pub html: String,
    /// Stylesheet template.
    pub css: String,
    /// Script template.
    pub js: String,
}

/// A single objective teams compete to complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    /// What the teams have to build.
    pub description: String,
    /// Bonus objectives award votes but are not required for completion counts.
    pub is_bonus: bool,
}

/// A seated editor: a user bound to a team and a language role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSeat {
    /// Team the seat belongs to.
    pub team: Team,
    /// User occupying the seat.
    pub user_id: Uuid,
    /// Language role ("html", "css", "js").
    pub language: String,
}

/// Final per-team score block computed at game end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamScore {
    /// Number of objectives the team completed.
    pub objectives_completed: u32,
    /// Votes received for UI quality.
    pub ui_votes: u32,
    /// Votes received for UX quality.
    pub ux_votes: u32,
    /// Total coins bet on this team by spectators.
    pub bets: u32,
}

/// Outcome summary stored on the game once it has ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    /// Blue team's final score block.
    pub blue: TeamScore,
    /// Red team's final score block.
    pub red: TeamScore,
    /// The winning team, absent when the game tied.
    pub winning_team: Option<Team>,
    /// Whether the game ended in a tie.
    pub tie: bool,
}

/// Runtime representation of the game aggregate with typed accessors.
#[derive(Debug, Clone)]
pub struct Game {
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
    pub templates: TemplateSet,
    /// Objectives keyed by their stable identifier, in display order.
    pub objectives: IndexMap<u32, Objective>,
    /// Editor seats keyed by their stable identifier, in display order.
    pub editors: IndexMap<u32, EditorSeat>,
    /// Outcome summary, present once the game has ended.
    pub score: Option<ScoreSummary>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the game was updated.
    pub updated_at: SystemTime,
}

impl Game {
    /// Build a fresh scheduled game with no seats and no score.
    pub fn new(
        title: String,
        start_time: SystemTime,
        season: u32,
        mode: GameMode,
        templates: TemplateSet,
        objectives: IndexMap<u32, Objective>,
    ) -> Self {
        let timestamp = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            title,
            start_time,
            season,
            mode,
            status: GameStatus::Scheduled,
            video_url: None,
            templates,
            objectives,
            editors: IndexMap::new(),
            score: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

impl From<TemplateSet> for TemplateSetEntity {
    fn from(value: TemplateSet) -> Self {
        Self {
            html: value.html,
            css: value.css,
            js: value.js,
        }
    }
}

impl From<TeamScore> for TeamScoreEntity {
    fn from(value: TeamScore) -> Self {
        Self {
            objectives_completed: value.objectives_completed,
            ui_votes: value.ui_votes,
            ux_votes: value.ux_votes,
            bets: value.bets,
        }
    }
}

impl From<ScoreSummary> for ScoreSummaryEntity {
    fn from(value: ScoreSummary) -> Self {
        Self {
            blue: value.blue.into(),
            red: value.red.into(),
            winning_team: value.winning_team,
            tie: value.tie,
        }
    }
}

impl From<Game> for GameEntity {
    fn from(value: Game) -> Self {
        Self {
            id: value.id,
            title: value.title,
            start_time: value.start_time,
            season: value.season,
            mode: value.mode,
            status: value.status,
            video_url: value.video_url,
            templates: value.templates.into(),
            objectives: value
                .objectives
                .into_iter()
                .map(|(id, objective)| ObjectiveEntity {
                    id,
                    description: objective.description,
                    is_bonus: objective.is_bonus,
                })
                .collect(),
            editors: value
                .editors
                .into_iter()
                .map(|(id, seat)| EditorSeatEntity {
                    id,
                    team: seat.team,
                    user_id: seat.user_id,
                    language: seat.language,
                })
                .collect(),
            score: value.score.map(Into::into),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
