//! DashMap-backed reference backend.
//!
//! Reproduces the uniqueness and conditional-update semantics the MongoDB
//! backend gets from its indexes and filtered updates: every check-and-write
//! section runs under a single write gate, so the invariants hold under
//! concurrent callers. Used by the integration tests and for running the
//! backend without a database.

use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dao::models::{
    ApplicationEntity, GameEntity, ScoreSummaryEntity, UserBadgeEntity, UserGameStatsEntity,
    UserStatsEntity,
};
use crate::dao::storage::{StorageError, StorageResult};
use crate::dao::store::{
    ApplicationStore, BadgeStore, GameStore, SeatOutcome, StatsStore, StatusFlip,
};
use crate::domain::badges::Badge;
use crate::domain::game::Team;
use crate::domain::lifecycle::{self, GameStatus, LifecycleEvent};

/// In-memory store holding every collection in process memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    games: DashMap<Uuid, GameEntity>,
    applications: DashMap<(Uuid, Uuid), ApplicationEntity>,
    game_stats: DashMap<Uuid, UserGameStatsEntity>,
    user_stats: DashMap<Uuid, UserStatsEntity>,
    badges: DashMap<(Uuid, Badge), UserBadgeEntity>,
    // Serializes check-and-write sections, standing in for the unique
    // indexes and filtered updates of the database backends.
    write_gate: Mutex<()>,
}

impl MemoryStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    async fn flip_status(
        &self,
        id: Uuid,
        event: LifecycleEvent,
        score: Option<ScoreSummaryEntity>,
    ) -> StatusFlip {
        let _gate = self.write_gate.lock().await;
        let Some(mut game) = self.games.get_mut(&id) else {
            return StatusFlip::NotFound;
        };

        match lifecycle::next_status(game.status, event) {
            Ok(next) => {
                game.status = next;
                game.score = score;
                game.updated_at = SystemTime::now();
                StatusFlip::Applied(Box::new(game.clone()))
            }
            Err(invalid) => StatusFlip::Rejected(invalid.from),
        }
    }

    async fn seat(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        team: Team,
        language: String,
    ) -> SeatOutcome {
        let _gate = self.write_gate.lock().await;

        match self.applications.get(&(game_id, user_id)) {
            None => return SeatOutcome::NotApplied,
            Some(application) => {
                if matches!(application.team, Some(current) if current != team) {
                    return SeatOutcome::OtherTeam;
                }
            }
        }

        let seat_taken = self.applications.iter().any(|entry| {
            entry.game_id == game_id
                && entry.user_id != user_id
                && entry.team == Some(team)
                && entry.assigned_languages.contains(&language)
        });
        if seat_taken {
            return SeatOutcome::LanguageTaken;
        }

        let mut application = self
            .applications
            .get_mut(&(game_id, user_id))
            .expect("application checked above");
        application.team = Some(team);
        if !application.assigned_languages.contains(&language) {
            application.assigned_languages.push(language);
        }
        SeatOutcome::Seated(Box::new(application.clone()))
    }
}

impl GameStore for MemoryStore {
    fn create_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.games.insert(game.id, game);
            Ok(())
        })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.create_game(game)
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.get(&id).map(|game| game.clone())) })
    }

    fn latest_game(&self) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .games
                .iter()
                .max_by_key(|game| game.start_time)
                .map(|game| game.clone()))
        })
    }

    fn active_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .games
                .iter()
                .filter(|game| game.status == GameStatus::Active)
                .map(|game| game.clone())
                .collect())
        })
    }

    fn search_games(&self, title: String) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let needle = title.to_lowercase();
            Ok(store
                .inner
                .games
                .iter()
                .filter(|game| game.title.to_lowercase().contains(&needle))
                .map(|game| game.clone())
                .collect())
        })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let removed = store.inner.games.remove(&id).is_some();
            if removed {
                store
                    .inner
                    .applications
                    .retain(|(game_id, _), _| *game_id != id);
            }
            Ok(removed)
        })
    }

    fn activate_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<StatusFlip>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .flip_status(id, LifecycleEvent::Activate, None)
                .await)
        })
    }

    fn end_game(
        &self,
        id: Uuid,
        score: ScoreSummaryEntity,
    ) -> BoxFuture<'static, StorageResult<StatusFlip>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .flip_status(id, LifecycleEvent::End, Some(score))
                .await)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

impl ApplicationStore for MemoryStore {
    fn create_application(
        &self,
        application: ApplicationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let _gate = store.inner.write_gate.lock().await;
            let key = (application.game_id, application.user_id);
            if store.inner.applications.contains_key(&key) {
                return Err(StorageError::duplicate(format!(
                    "application for user `{}` in game `{}` already exists",
                    application.user_id, application.game_id
                )));
            }
            store.inner.applications.insert(key, application);
            Ok(())
        })
    }

    fn find_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ApplicationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .applications
                .get(&(game_id, user_id))
                .map(|application| application.clone()))
        })
    }

    fn applications_for_game(
        &self,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ApplicationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut applications: Vec<ApplicationEntity> = store
                .inner
                .applications
                .iter()
                .filter(|application| application.game_id == game_id)
                .map(|application| application.clone())
                .collect();
            applications.sort_by_key(|application| application.created_at);
            Ok(applications)
        })
    }

    fn seat_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        team: Team,
        language: String,
    ) -> BoxFuture<'static, StorageResult<SeatOutcome>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.seat(game_id, user_id, team, language).await) })
    }

    fn unseat_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ApplicationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let _gate = store.inner.write_gate.lock().await;
            let Some(mut application) = store.inner.applications.get_mut(&(game_id, user_id))
            else {
                return Ok(None);
            };
            application.team = None;
            application.assigned_languages.clear();
            Ok(Some(application.clone()))
        })
    }

    fn delete_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .applications
                .remove(&(game_id, user_id))
                .is_some())
        })
    }
}

impl StatsStore for MemoryStore {
    fn game_stats_for(
        &self,
        user_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<UserGameStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(user_ids
                .into_iter()
                .map(|user_id| {
                    store
                        .inner
                        .game_stats
                        .get(&user_id)
                        .map(|stats| stats.clone())
                        .unwrap_or_else(|| UserGameStatsEntity::zeroed(user_id))
                })
                .collect())
        })
    }

    fn record_results(
        &self,
        winners: Vec<Uuid>,
        losers: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let _gate = store.inner.write_gate.lock().await;
            for user_id in winners {
                let mut stats = store
                    .inner
                    .game_stats
                    .entry(user_id)
                    .or_insert_with(|| UserGameStatsEntity::zeroed(user_id));
                stats.wins += 1;
                stats.win_streak += 1;
            }
            for user_id in losers {
                let mut stats = store
                    .inner
                    .game_stats
                    .entry(user_id)
                    .or_insert_with(|| UserGameStatsEntity::zeroed(user_id));
                stats.loses += 1;
                stats.win_streak = 0;
            }
            Ok(())
        })
    }

    fn add_experience(
        &self,
        user_ids: Vec<Uuid>,
        delta: i64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            for user_id in user_ids {
                let mut stats = store
                    .inner
                    .user_stats
                    .entry(user_id)
                    .or_insert_with(|| UserStatsEntity::zeroed(user_id));
                stats.xp = (stats.xp + delta).max(0);
            }
            Ok(())
        })
    }

    fn add_coins(&self, user_id: Uuid, delta: i64) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move {
            let mut stats = store
                .inner
                .user_stats
                .entry(user_id)
                .or_insert_with(|| UserStatsEntity::zeroed(user_id));
            stats.coins = (stats.coins + delta).max(0);
            Ok(stats.coins)
        })
    }

    fn stats_for(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<UserStatsEntity>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .user_stats
                .get(&user_id)
                .map(|stats| stats.clone())
                .unwrap_or_else(|| UserStatsEntity::zeroed(user_id)))
        })
    }
}

impl BadgeStore for MemoryStore {
    fn grant_badge(&self, user_id: Uuid, badge: Badge) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let _gate = store.inner.write_gate.lock().await;
            if store.inner.badges.contains_key(&(user_id, badge)) {
                return Ok(false);
            }
            store.inner.badges.insert(
                (user_id, badge),
                UserBadgeEntity {
                    user_id,
                    badge,
                    awarded_at: SystemTime::now(),
                },
            );
            Ok(true)
        })
    }

    fn badges_for(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<UserBadgeEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut badges: Vec<UserBadgeEntity> = store
                .inner
                .badges
                .iter()
                .filter(|entry| entry.user_id == user_id)
                .map(|entry| entry.clone())
                .collect();
            badges.sort_by_key(|badge| badge.awarded_at);
            Ok(badges)
        })
    }
}
