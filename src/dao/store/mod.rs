/// In-memory reference backend.
pub mod memory;
#[cfg(feature = "mongo-store")]
/// MongoDB backend.
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    ApplicationEntity, GameEntity, ScoreSummaryEntity, UserBadgeEntity, UserGameStatsEntity,
    UserStatsEntity,
};
use crate::dao::storage::StorageResult;
use crate::domain::badges::Badge;
use crate::domain::game::Team;

/// Outcome of a conditional status flip on a game document.
///
/// The flip is the settlement commit point: only the caller whose update
/// matched may run side effects, which is what makes concurrent `end` calls
/// safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFlip {
    /// The filter matched and the status was changed; carries the updated game.
    Applied(Box<GameEntity>),
    /// The game exists but its status did not satisfy the filter.
    Rejected(crate::domain::lifecycle::GameStatus),
    /// No game with this id exists.
    NotFound,
}

/// Outcome of attempting to seat an applicant on a team/language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatOutcome {
    /// The application was updated; carries the post-update row.
    Seated(Box<ApplicationEntity>),
    /// No application exists for this `(game, user)` pair.
    NotApplied,
    /// The user is already seated on the other team of this game.
    OtherTeam,
    /// Another application already holds this `(team, language)` seat.
    LanguageTaken,
}

/// Repository for the game aggregate.
pub trait GameStore: Send + Sync {
    /// Insert a freshly created game.
    fn create_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Replace a persisted game document.
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a game by id.
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// The game with the most recent start time.
    fn latest_game(&self) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// All games currently in the active status.
    fn active_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Case-insensitive title substring search.
    fn search_games(&self, title: String) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Delete a game and cascade-delete its applications.
    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Conditionally flip a scheduled or ended game to active, clearing any
    /// stale score summary.
    fn activate_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<StatusFlip>>;
    /// Conditionally flip a not-yet-ended game to ended, storing `score`.
    fn end_game(
        &self,
        id: Uuid,
        score: ScoreSummaryEntity,
    ) -> BoxFuture<'static, StorageResult<StatusFlip>>;
    /// Verify the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Repository for player applications to a game.
pub trait ApplicationStore: Send + Sync {
    /// Insert a new application. Fails with [`StorageError::Duplicate`] when
    /// one already exists for the `(game, user)` pair.
    ///
    /// [`StorageError::Duplicate`]: crate::dao::storage::StorageError::Duplicate
    fn create_application(
        &self,
        application: ApplicationEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch the application for a `(game, user)` pair.
    fn find_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ApplicationEntity>>>;
    /// All applications filed for a game.
    fn applications_for_game(
        &self,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ApplicationEntity>>>;
    /// Atomically seat an applicant on `team` with `language`, enforcing team
    /// exclusivity and the one-seat-per-language-per-team constraint.
    fn seat_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        team: Team,
        language: String,
    ) -> BoxFuture<'static, StorageResult<SeatOutcome>>;
    /// Clear the team and language assignments of an application.
    fn unseat_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ApplicationEntity>>>;
    /// Remove an application (resignation or administrative removal).
    fn delete_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>>;
}

/// Repository for per-user counters and balances.
pub trait StatsStore: Send + Sync {
    /// Win/loss records for a set of users, zeroed rows for unknown users.
    fn game_stats_for(
        &self,
        user_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<UserGameStatsEntity>>>;
    /// Bulk-apply a settled result: winners get `wins += 1, win_streak += 1`,
    /// losers get `loses += 1, win_streak = 0`. One round trip per set.
    fn record_results(
        &self,
        winners: Vec<Uuid>,
        losers: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Bulk-add experience to a set of users, floor-clamped at zero.
    fn add_experience(
        &self,
        user_ids: Vec<Uuid>,
        delta: i64,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Add coins to a single user, floor-clamped at zero; returns the new
    /// balance.
    fn add_coins(&self, user_id: Uuid, delta: i64) -> BoxFuture<'static, StorageResult<i64>>;
    /// Currency balances for a user, zeroed when absent.
    fn stats_for(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<UserStatsEntity>>;
}

/// Repository for badge ownership rows.
pub trait BadgeStore: Send + Sync {
    /// Insert the ownership row for `(user, badge)`. Returns `false` when the
    /// user already owns the badge; the unique index makes this safe under
    /// concurrent callers.
    fn grant_badge(&self, user_id: Uuid, badge: Badge) -> BoxFuture<'static, StorageResult<bool>>;
    /// All badges owned by a user.
    fn badges_for(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<UserBadgeEntity>>>;
}

/// Combined storage surface installed into the application state.
pub trait DevwarsStore: GameStore + ApplicationStore + StatsStore + BadgeStore {}

impl<T> DevwarsStore for T where T: GameStore + ApplicationStore + StatsStore + BadgeStore {}
