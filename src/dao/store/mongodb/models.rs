use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    ApplicationEntity, EditorSeatEntity, GameEntity, ObjectiveEntity, ScoreSummaryEntity,
    TemplateSetEntity, UserBadgeEntity, UserGameStatsEntity, UserStatsEntity,
};
use crate::domain::badges::Badge;
use crate::domain::game::{GameMode, Team};
use crate::domain::lifecycle::GameStatus;

/// Game aggregate as stored in the `games` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    title: String,
    start_time: DateTime,
    season: u32,
    mode: GameMode,
    status: GameStatus,
    video_url: Option<String>,
    templates: TemplateSetEntity,
    objectives: Vec<ObjectiveEntity>,
    editors: Vec<EditorSeatEntity>,
    #[serde(default)]
    score: Option<ScoreSummaryEntity>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            start_time: DateTime::from_system_time(value.start_time),
            season: value.season,
            mode: value.mode,
            status: value.status,
            video_url: value.video_url,
            templates: value.templates,
            objectives: value.objectives,
            editors: value.editors,
            score: value.score,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoGameDocument> for GameEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            id: value.id,
            title: value.title,
            start_time: value.start_time.to_system_time(),
            season: value.season,
            mode: value.mode,
            status: value.status,
            video_url: value.video_url,
            templates: value.templates,
            objectives: value.objectives,
            editors: value.editors,
            score: value.score,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

/// Application row as stored in the `applications` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoApplicationDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    pub(super) game_id: Uuid,
    pub(super) user_id: Uuid,
    pub(super) team: Option<Team>,
    pub(super) assigned_languages: Vec<String>,
    created_at: DateTime,
}

impl From<ApplicationEntity> for MongoApplicationDocument {
    fn from(value: ApplicationEntity) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            user_id: value.user_id,
            team: value.team,
            assigned_languages: value.assigned_languages,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoApplicationDocument> for ApplicationEntity {
    fn from(value: MongoApplicationDocument) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            user_id: value.user_id,
            team: value.team,
            assigned_languages: value.assigned_languages,
            created_at: value.created_at.to_system_time(),
        }
    }
}

/// Win/loss counters keyed by the user id in `user_game_stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameStatsDocument {
    #[serde(rename = "_id")]
    user_id: Uuid,
    wins: u32,
    loses: u32,
    win_streak: u32,
}

impl MongoGameStatsDocument {
    pub(super) fn zeroed(user_id: Uuid) -> Self {
        UserGameStatsEntity::zeroed(user_id).into()
    }
}

impl From<UserGameStatsEntity> for MongoGameStatsDocument {
    fn from(value: UserGameStatsEntity) -> Self {
        Self {
            user_id: value.user_id,
            wins: value.wins,
            loses: value.loses,
            win_streak: value.win_streak,
        }
    }
}

impl From<MongoGameStatsDocument> for UserGameStatsEntity {
    fn from(value: MongoGameStatsDocument) -> Self {
        Self {
            user_id: value.user_id,
            wins: value.wins,
            loses: value.loses,
            win_streak: value.win_streak,
        }
    }
}

/// Currency balances keyed by the user id in `user_stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserStatsDocument {
    #[serde(rename = "_id")]
    user_id: Uuid,
    coins: i64,
    xp: i64,
}

impl MongoUserStatsDocument {
    pub(super) fn zeroed(user_id: Uuid) -> Self {
        UserStatsEntity::zeroed(user_id).into()
    }
}

impl From<UserStatsEntity> for MongoUserStatsDocument {
    fn from(value: UserStatsEntity) -> Self {
        Self {
            user_id: value.user_id,
            coins: value.coins,
            xp: value.xp,
        }
    }
}

impl From<MongoUserStatsDocument> for UserStatsEntity {
    fn from(value: MongoUserStatsDocument) -> Self {
        Self {
            user_id: value.user_id,
            coins: value.coins,
            xp: value.xp,
        }
    }
}

/// Badge ownership row in `user_badges`. The synthetic `_id` stays with
/// MongoDB; uniqueness is carried by the `(user_id, badge)` index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBadgeDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    user_id: Uuid,
    badge: Badge,
    awarded_at: DateTime,
}

impl MongoBadgeDocument {
    pub(super) fn new(user_id: Uuid, badge: Badge) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            badge,
            awarded_at: DateTime::now(),
        }
    }
}

impl From<MongoBadgeDocument> for UserBadgeEntity {
    fn from(value: MongoBadgeDocument) -> Self {
        Self {
            user_id: value.user_id,
            badge: value.badge,
            awarded_at: value.awarded_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
