use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{UserBadgeEntity, UserGameStatsEntity, UserStatsEntity},
    dto::format_system_time,
};

/// Public projection of a user's balances and game record.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatsResponse {
    /// The user the stats belong to.
    pub user_id: Uuid,
    /// Spendable coin balance.
    pub coins: i64,
    /// Accumulated experience.
    pub xp: i64,
    /// Career wins.
    pub wins: u32,
    /// Career losses.
    pub loses: u32,
    /// Consecutive wins without an intervening loss.
    pub win_streak: u32,
}

impl UserStatsResponse {
    /// Combine the balance and record rows for one user.
    pub fn new(stats: UserStatsEntity, record: UserGameStatsEntity) -> Self {
        Self {
            user_id: stats.user_id,
            coins: stats.coins,
            xp: stats.xp,
            wins: record.wins,
            loses: record.loses,
            win_streak: record.win_streak,
        }
    }
}

/// Public projection of an owned badge.
#[derive(Debug, Serialize, ToSchema)]
pub struct BadgeSummary {
    /// Stable badge identifier (e.g. `DEVWARS_COINS_5000`).
    pub badge: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// When the badge was awarded, RFC 3339.
    pub awarded_at: String,
}

impl From<UserBadgeEntity> for BadgeSummary {
    fn from(value: UserBadgeEntity) -> Self {
        let info = value.badge.info();
        Self {
            badge: value.badge.label().to_owned(),
            name: info.name.to_owned(),
            description: info.description.to_owned(),
            awarded_at: format_system_time(value.awarded_at),
        }
    }
}
