//! Badge awarding. Grants are idempotent thanks to the storage-level
//! ownership uniqueness; this module layers the reward credits and the
//! coin-threshold cascade on top.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::UserBadgeEntity,
    dao::store::DevwarsStore,
    domain::badges::{self, Badge},
    error::ServiceError,
    state::SharedState,
};

/// Grant a badge and credit its catalog rewards, following any coin-threshold
/// badges the reward coins unlock. Returns every badge newly awarded.
///
/// A badge the user already owns is skipped silently, which makes repeated
/// sweeps safe.
pub async fn award_with_rewards(
    store: &Arc<dyn DevwarsStore>,
    user_id: Uuid,
    badge: Badge,
) -> Result<Vec<Badge>, ServiceError> {
    let mut awarded = Vec::new();
    let mut pending = vec![badge];

    while let Some(next) = pending.pop() {
        if !store.grant_badge(user_id, next).await? {
            continue;
        }
        awarded.push(next);
        info!(%user_id, badge = ?next, "badge awarded");

        let info = next.info();
        if info.experience > 0 {
            store.add_experience(vec![user_id], info.experience).await?;
        }
        if info.coins > 0 {
            let after = store.add_coins(user_id, info.coins).await?;
            let before = after - info.coins;
            pending.extend(badges::for_coin_change(before, after));
        }
    }

    Ok(awarded)
}

/// Check a set of users against the win/streak badge rules and award whatever
/// their updated counters now qualify them for.
pub async fn sweep_game_stats(
    store: &Arc<dyn DevwarsStore>,
    user_ids: Vec<Uuid>,
) -> Result<(), ServiceError> {
    if user_ids.is_empty() {
        return Ok(());
    }

    let all_stats = store.game_stats_for(user_ids).await?;
    for stats in all_stats {
        for badge in badges::for_game_stats(&stats) {
            award_with_rewards(store, stats.user_id, badge).await?;
        }
    }
    Ok(())
}

/// Credit coins to a user and award any threshold badges the new balance
/// crossed. Returns the post-credit balance and the newly awarded badges.
pub async fn grant_coins(
    state: &SharedState,
    user_id: Uuid,
    amount: i64,
) -> Result<(i64, Vec<Badge>), ServiceError> {
    let store = state.require_store().await?;

    let after = store.add_coins(user_id, amount).await?;
    let before = after - amount;

    let mut awarded = Vec::new();
    for badge in badges::for_coin_change(before, after) {
        awarded.extend(award_with_rewards(&store, user_id, badge).await?);
    }

    // Reward coins from the awarded badges may have moved the balance again.
    let balance = store.stats_for(user_id).await?.coins;
    Ok((balance, awarded))
}

/// All badges owned by a user.
pub async fn badges_for_user(
    state: &SharedState,
    user_id: Uuid,
) -> Result<Vec<UserBadgeEntity>, ServiceError> {
    let store = state.require_store().await?;
    Ok(store.badges_for(user_id).await?)
}
