use serde::{Deserialize, Serialize};

use crate::dao::models::UserGameStatsEntity;

/// Win streak length that earns [`Badge::HotStreak`]. The check is an exact
/// equality so the badge sweep does not retrigger on every later win.
pub const HOT_STREAK_LENGTH: u32 = 3;

/// Coin balance thresholds, paired with the badge they unlock.
const COIN_THRESHOLDS: [(i64, Badge); 2] = [
    (5_000, Badge::Coins5000),
    (25_000, Badge::Coins25000),
];

/// One-time achievement awards. Each badge is owned at most once per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    /// Won the very first game played (no prior losses).
    WinFirstGame,
    /// Reached 5 career wins.
    Win5Games,
    /// Reached 10 career wins.
    Win10Games,
    /// Reached 25 career wins.
    Win25Games,
    /// Won 3 games in a row.
    HotStreak,
    /// Coin balance crossed 5,000.
    #[serde(rename = "DEVWARS_COINS_5000")]
    Coins5000,
    /// Coin balance crossed 25,000.
    #[serde(rename = "DEVWARS_COINS_25000")]
    Coins25000,
    /// Verified their email address.
    EmailVerified,
    /// Linked a social account.
    SocialLinked,
}

/// Static catalog data attached to a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeInfo {
    /// Display name.
    pub name: &'static str,
    /// Display description.
    pub description: &'static str,
    /// Coins credited when the badge is awarded.
    pub coins: i64,
    /// Experience credited when the badge is awarded.
    pub experience: i64,
}

impl Badge {
    /// Stable wire identifier, matching the serde representation.
    pub fn label(self) -> &'static str {
        match self {
            Badge::WinFirstGame => "WIN_FIRST_GAME",
            Badge::Win5Games => "WIN5_GAMES",
            Badge::Win10Games => "WIN10_GAMES",
            Badge::Win25Games => "WIN25_GAMES",
            Badge::HotStreak => "HOT_STREAK",
            Badge::Coins5000 => "DEVWARS_COINS_5000",
            Badge::Coins25000 => "DEVWARS_COINS_25000",
            Badge::EmailVerified => "EMAIL_VERIFIED",
            Badge::SocialLinked => "SOCIAL_LINKED",
        }
    }

    /// Catalog entry for this badge.
    pub fn info(self) -> BadgeInfo {
        match self {
            Badge::WinFirstGame => BadgeInfo {
                name: "First Victory",
                description: "Win your first game with a clean record",
                coins: 300,
                experience: 1_000,
            },
            Badge::Win5Games => BadgeInfo {
                name: "Seasoned Winner",
                description: "Win 5 games",
                coins: 600,
                experience: 2_000,
            },
            Badge::Win10Games => BadgeInfo {
                name: "Veteran",
                description: "Win 10 games",
                coins: 1_200,
                experience: 4_000,
            },
            Badge::Win25Games => BadgeInfo {
                name: "Champion",
                description: "Win 25 games",
                coins: 2_500,
                experience: 10_000,
            },
            Badge::HotStreak => BadgeInfo {
                name: "Hot Streak",
                description: "Win 3 games in a row",
                coins: 500,
                experience: 1_500,
            },
            Badge::Coins5000 => BadgeInfo {
                name: "Penny Pincher",
                description: "Accumulate 5,000 coins",
                coins: 0,
                experience: 1_200,
            },
            Badge::Coins25000 => BadgeInfo {
                name: "High Roller",
                description: "Accumulate 25,000 coins",
                coins: 0,
                experience: 6_000,
            },
            Badge::EmailVerified => BadgeInfo {
                name: "Authentic",
                description: "Verify your email address",
                coins: 250,
                experience: 600,
            },
            Badge::SocialLinked => BadgeInfo {
                name: "Connected",
                description: "Link a social account",
                coins: 250,
                experience: 600,
            },
        }
    }
}

/// Badges a user became eligible for after a settlement updated their
/// win/loss counters.
///
/// The first-win badge additionally requires a loss-free record, so a player
/// whose first victory comes after a defeat never earns it.
pub fn for_game_stats(stats: &UserGameStatsEntity) -> Vec<Badge> {
    let mut earned = Vec::new();

    if stats.wins == 1 && stats.loses == 0 {
        earned.push(Badge::WinFirstGame);
    }
    match stats.wins {
        5 => earned.push(Badge::Win5Games),
        10 => earned.push(Badge::Win10Games),
        25 => earned.push(Badge::Win25Games),
        _ => {}
    }
    if stats.win_streak == HOT_STREAK_LENGTH {
        earned.push(Badge::HotStreak);
    }

    earned
}

/// Badges unlocked by a coin balance moving from `before` to `after`.
pub fn for_coin_change(before: i64, after: i64) -> Vec<Badge> {
    COIN_THRESHOLDS
        .into_iter()
        .filter(|(threshold, _)| before < *threshold && after >= *threshold)
        .map(|(_, badge)| badge)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn stats(wins: u32, loses: u32, win_streak: u32) -> UserGameStatsEntity {
        UserGameStatsEntity {
            user_id: Uuid::new_v4(),
            wins,
            loses,
            win_streak,
        }
    }

    #[test]
    fn clean_first_win_earns_first_victory() {
        assert!(for_game_stats(&stats(1, 0, 1)).contains(&Badge::WinFirstGame));
    }

    #[test]
    fn first_win_after_a_loss_earns_nothing() {
        assert!(for_game_stats(&stats(1, 1, 1)).is_empty());
    }

    #[test]
    fn win_count_milestones() {
        assert!(for_game_stats(&stats(5, 2, 1)).contains(&Badge::Win5Games));
        assert!(for_game_stats(&stats(10, 4, 2)).contains(&Badge::Win10Games));
        assert!(for_game_stats(&stats(25, 9, 1)).contains(&Badge::Win25Games));
        assert!(for_game_stats(&stats(6, 2, 1)).is_empty());
    }

    #[test]
    fn streak_badge_requires_exactly_three() {
        assert!(for_game_stats(&stats(7, 3, 3)).contains(&Badge::HotStreak));
        assert!(!for_game_stats(&stats(8, 3, 4)).contains(&Badge::HotStreak));
    }

    #[test]
    fn coin_threshold_crossing() {
        assert_eq!(for_coin_change(4_999, 5_009), vec![Badge::Coins5000]);
        assert!(for_coin_change(5_009, 5_020).is_empty());
        assert_eq!(
            for_coin_change(0, 30_000),
            vec![Badge::Coins5000, Badge::Coins25000]
        );
    }
}
