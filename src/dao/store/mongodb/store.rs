use std::collections::HashMap;
use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Collection, Database,
    bson::{Bson, DateTime, Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult, is_duplicate_key},
    models::{
        MongoApplicationDocument, MongoBadgeDocument, MongoGameDocument, MongoGameStatsDocument,
        MongoUserStatsDocument, doc_id, uuid_as_binary,
    },
};
use crate::dao::models::{
    ApplicationEntity, GameEntity, ScoreSummaryEntity, UserBadgeEntity, UserGameStatsEntity,
    UserStatsEntity,
};
use crate::dao::storage::StorageResult;
use crate::dao::store::{
    ApplicationStore, BadgeStore, GameStore, SeatOutcome, StatsStore, StatusFlip,
};
use crate::domain::badges::Badge;
use crate::domain::game::Team;
use crate::domain::lifecycle::GameStatus;

const GAME_COLLECTION: &str = "games";
const APPLICATION_COLLECTION: &str = "applications";
const GAME_STATS_COLLECTION: &str = "user_game_stats";
const USER_STATS_COLLECTION: &str = "user_stats";
const BADGE_COLLECTION: &str = "user_badges";

/// Wire label for a status, matching the serde representation.
fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Scheduled => "SCHEDULED",
        GameStatus::Active => "ACTIVE",
        GameStatus::Ended => "ENDED",
    }
}

/// Wire label for a team, matching the serde representation.
fn team_label(team: Team) -> &'static str {
    match team {
        Team::Blue => "blue",
        Team::Red => "red",
    }
}

/// Escape a user-supplied search string so it matches literally in `$regex`.
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// MongoDB-backed implementation of the storage traits.
#[derive(Clone)]
pub struct MongoStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    database: Database,
}

impl MongoStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let store = Self {
            inner: Arc::new(MongoInner { database }),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        // One application per (game, user).
        self.create_index(
            APPLICATION_COLLECTION,
            "game_user",
            doc! {"game_id": 1, "user_id": 1},
            IndexOptions::builder()
                .name(Some("application_game_user_idx".to_owned()))
                .unique(Some(true))
                .build(),
        )
        .await?;

        // One seat per (game, team, language), enforced only for seated rows.
        // `assigned_languages` is multikey, so the uniqueness applies per
        // array element across documents.
        self.create_index(
            APPLICATION_COLLECTION,
            "game_team_language",
            doc! {"game_id": 1, "team": 1, "assigned_languages": 1},
            IndexOptions::builder()
                .name(Some("application_seat_idx".to_owned()))
                .unique(Some(true))
                .partial_filter_expression(Some(doc! {"team": {"$type": "string"}}))
                .build(),
        )
        .await?;

        // One ownership row per (user, badge).
        self.create_index(
            BADGE_COLLECTION,
            "user_badge",
            doc! {"user_id": 1, "badge": 1},
            IndexOptions::builder()
                .name(Some("badge_ownership_idx".to_owned()))
                .unique(Some(true))
                .build(),
        )
        .await?;

        self.create_index(
            GAME_COLLECTION,
            "title",
            doc! {"title": 1},
            IndexOptions::builder()
                .name(Some("game_title_idx".to_owned()))
                .build(),
        )
        .await?;

        self.create_index(
            GAME_COLLECTION,
            "status",
            doc! {"status": 1},
            IndexOptions::builder()
                .name(Some("game_status_idx".to_owned()))
                .build(),
        )
        .await?;

        Ok(())
    }

    async fn create_index(
        &self,
        collection: &'static str,
        index: &'static str,
        keys: Document,
        options: IndexOptions,
    ) -> MongoResult<()> {
        let target = self.inner.database.collection::<Document>(collection);
        let model = mongodb::IndexModel::builder()
            .keys(keys)
            .options(options)
            .build();
        target
            .create_index(model)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection,
                index,
                source,
            })?;
        Ok(())
    }

    fn games(&self) -> Collection<MongoGameDocument> {
        self.inner.database.collection(GAME_COLLECTION)
    }

    fn applications(&self) -> Collection<MongoApplicationDocument> {
        self.inner.database.collection(APPLICATION_COLLECTION)
    }

    fn game_stats(&self) -> Collection<MongoGameStatsDocument> {
        self.inner.database.collection(GAME_STATS_COLLECTION)
    }

    fn user_stats(&self) -> Collection<MongoUserStatsDocument> {
        self.inner.database.collection(USER_STATS_COLLECTION)
    }

    fn badges(&self) -> Collection<MongoBadgeDocument> {
        self.inner.database.collection(BADGE_COLLECTION)
    }

    async fn ping(&self) -> MongoResult<()> {
        self.inner
            .database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    /// Resolve the post-update state of a conditional status flip that did
    /// not match: either the game is missing or its current status rejected
    /// the transition.
    async fn explain_unmatched_flip(&self, id: Uuid) -> MongoResult<StatusFlip> {
        let document = self
            .games()
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Game {
                operation: "load",
                id,
                source,
            })?;

        Ok(match document {
            Some(game) => StatusFlip::Rejected(GameEntity::from(game).status),
            None => StatusFlip::NotFound,
        })
    }

    /// Insert zeroed counter rows for any user missing one, ignoring
    /// duplicate-key failures for users that already have a row. Keeps the
    /// subsequent bulk `$inc` updates applicable to every participant.
    async fn ensure_game_stats_rows(&self, user_ids: &[Uuid]) -> MongoResult<()> {
        if user_ids.is_empty() {
            return Ok(());
        }
        let rows: Vec<MongoGameStatsDocument> = user_ids
            .iter()
            .map(|user_id| MongoGameStatsDocument::zeroed(*user_id))
            .collect();
        match self.game_stats().insert_many(rows).ordered(false).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Ok(()),
            Err(source) => Err(MongoDaoError::Stats {
                operation: "ensure_game_stats_rows",
                source,
            }),
        }
    }

    async fn ensure_user_stats_rows(&self, user_ids: &[Uuid]) -> MongoResult<()> {
        if user_ids.is_empty() {
            return Ok(());
        }
        let rows: Vec<MongoUserStatsDocument> = user_ids
            .iter()
            .map(|user_id| MongoUserStatsDocument::zeroed(*user_id))
            .collect();
        match self.user_stats().insert_many(rows).ordered(false).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Ok(()),
            Err(source) => Err(MongoDaoError::Stats {
                operation: "ensure_user_stats_rows",
                source,
            }),
        }
    }
}

fn id_set(user_ids: &[Uuid]) -> Bson {
    Bson::Array(
        user_ids
            .iter()
            .map(|user_id| Bson::Binary(uuid_as_binary(*user_id)))
            .collect(),
    )
}

impl MongoStore {
    async fn upsert_game(&self, game: GameEntity) -> MongoResult<()> {
        let id = game.id;
        let document: MongoGameDocument = game.into();
        self.games()
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Game {
                operation: "save",
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_game_entity(&self, id: Uuid) -> MongoResult<Option<GameEntity>> {
        let document = self
            .games()
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Game {
                operation: "load",
                id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn collect_games(
        &self,
        operation: &'static str,
        filter: Document,
    ) -> MongoResult<Vec<GameEntity>> {
        let documents: Vec<MongoGameDocument> = self
            .games()
            .find(filter)
            .sort(doc! {"start_time": -1})
            .await
            .map_err(|source| MongoDaoError::GameQuery { operation, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::GameQuery { operation, source })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn flip_to_active(&self, id: Uuid) -> MongoResult<StatusFlip> {
        let filter = doc! {
            "_id": uuid_as_binary(id),
            "status": {"$in": [
                status_label(GameStatus::Scheduled),
                status_label(GameStatus::Ended),
            ]},
        };
        // Re-activation must clear the stale score summary so a later end
        // recomputes it.
        let update = doc! {"$set": {
            "status": status_label(GameStatus::Active),
            "score": Bson::Null,
            "updated_at": DateTime::now(),
        }};

        let updated = self
            .games()
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::Game {
                operation: "activate",
                id,
                source,
            })?;

        match updated {
            Some(document) => Ok(StatusFlip::Applied(Box::new(document.into()))),
            None => self.explain_unmatched_flip(id).await,
        }
    }

    async fn flip_to_ended(&self, id: Uuid, score: ScoreSummaryEntity) -> MongoResult<StatusFlip> {
        let score_bson = mongodb::bson::serialize_to_bson(&score).map_err(|source| {
            MongoDaoError::Game {
                operation: "serialize_score",
                id,
                source: mongodb::error::Error::custom(source),
            }
        })?;
        let filter = doc! {
            "_id": uuid_as_binary(id),
            "status": {"$ne": status_label(GameStatus::Ended)},
        };
        let update = doc! {"$set": {
            "status": status_label(GameStatus::Ended),
            "score": score_bson,
            "updated_at": DateTime::now(),
        }};

        let updated = self
            .games()
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::Game {
                operation: "end",
                id,
                source,
            })?;

        match updated {
            Some(document) => Ok(StatusFlip::Applied(Box::new(document.into()))),
            None => self.explain_unmatched_flip(id).await,
        }
    }

    async fn seat(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        team: Team,
        language: String,
    ) -> MongoResult<SeatOutcome> {
        // Matches only when the user is unseated or already on the requested
        // team; the partial unique seat index rejects a language already held
        // by another row with a duplicate-key error.
        let filter = doc! {
            "game_id": uuid_as_binary(game_id),
            "user_id": uuid_as_binary(user_id),
            "$or": [
                {"team": Bson::Null},
                {"team": team_label(team)},
            ],
        };
        let update = doc! {
            "$set": {"team": team_label(team)},
            "$addToSet": {"assigned_languages": &language},
        };

        let result = self
            .applications()
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await;

        match result {
            Ok(Some(document)) => Ok(SeatOutcome::Seated(Box::new(document.into()))),
            Ok(None) => {
                // Distinguish a missing application from one seated on the
                // other team.
                let existing = self
                    .applications()
                    .find_one(doc! {
                        "game_id": uuid_as_binary(game_id),
                        "user_id": uuid_as_binary(user_id),
                    })
                    .await
                    .map_err(|source| MongoDaoError::Application {
                        operation: "seat_lookup",
                        source,
                    })?;
                Ok(match existing {
                    Some(_) => SeatOutcome::OtherTeam,
                    None => SeatOutcome::NotApplied,
                })
            }
            Err(err) if is_duplicate_key(&err) => Ok(SeatOutcome::LanguageTaken),
            Err(source) => Err(MongoDaoError::Application {
                operation: "seat",
                source,
            }),
        }
    }
}

impl GameStore for MongoStore {
    fn create_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_game(game).await.map_err(Into::into) })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_game(game).await.map_err(Into::into) })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game_entity(id).await.map_err(Into::into) })
    }

    fn latest_game(&self) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document = store
                .games()
                .find_one(doc! {})
                .sort(doc! {"start_time": -1})
                .await
                .map_err(|source| MongoDaoError::GameQuery {
                    operation: "latest",
                    source,
                })?;
            Ok(document.map(GameEntity::from))
        })
    }

    fn active_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .collect_games(
                    "active",
                    doc! {"status": status_label(GameStatus::Active)},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn search_games(&self, title: String) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let filter = doc! {"title": {"$regex": escape_regex(&title), "$options": "i"}};
            store
                .collect_games("search", filter)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let result = store.games().delete_one(doc_id(id)).await.map_err(|source| {
                MongoDaoError::Game {
                    operation: "delete",
                    id,
                    source,
                }
            })?;
            if result.deleted_count == 0 {
                return Ok(false);
            }

            // Cascade: applications never outlive their game.
            store
                .applications()
                .delete_many(doc! {"game_id": uuid_as_binary(id)})
                .await
                .map_err(|source| MongoDaoError::Application {
                    operation: "cascade_delete",
                    source,
                })?;
            Ok(true)
        })
    }

    fn activate_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<StatusFlip>> {
        let store = self.clone();
        Box::pin(async move { store.flip_to_active(id).await.map_err(Into::into) })
    }

    fn end_game(
        &self,
        id: Uuid,
        score: ScoreSummaryEntity,
    ) -> BoxFuture<'static, StorageResult<StatusFlip>> {
        let store = self.clone();
        Box::pin(async move { store.flip_to_ended(id, score).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}

impl ApplicationStore for MongoStore {
    fn create_application(
        &self,
        application: ApplicationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let document: MongoApplicationDocument = application.clone().into();
            match store.applications().insert_one(document).await {
                Ok(_) => Ok(()),
                Err(err) if is_duplicate_key(&err) => {
                    Err(MongoDaoError::DuplicateKey {
                        message: format!(
                            "application for user `{}` in game `{}` already exists",
                            application.user_id, application.game_id
                        ),
                    }
                    .into())
                }
                Err(source) => Err(MongoDaoError::Application {
                    operation: "create",
                    source,
                }
                .into()),
            }
        })
    }

    fn find_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ApplicationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document = store
                .applications()
                .find_one(doc! {
                    "game_id": uuid_as_binary(game_id),
                    "user_id": uuid_as_binary(user_id),
                })
                .await
                .map_err(|source| MongoDaoError::Application {
                    operation: "find",
                    source,
                })?;
            Ok(document.map(Into::into))
        })
    }

    fn applications_for_game(
        &self,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ApplicationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let documents: Vec<MongoApplicationDocument> = store
                .applications()
                .find(doc! {"game_id": uuid_as_binary(game_id)})
                .sort(doc! {"created_at": 1})
                .await
                .map_err(|source| MongoDaoError::Application {
                    operation: "list",
                    source,
                })?
                .try_collect()
                .await
                .map_err(|source| MongoDaoError::Application {
                    operation: "list",
                    source,
                })?;
            Ok(documents.into_iter().map(Into::into).collect())
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
        Box::pin(async move {
            store
                .seat(game_id, user_id, team, language)
                .await
                .map_err(Into::into)
        })
    }

    fn unseat_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ApplicationEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let updated = store
                .applications()
                .find_one_and_update(
                    doc! {
                        "game_id": uuid_as_binary(game_id),
                        "user_id": uuid_as_binary(user_id),
                    },
                    doc! {"$set": {"team": Bson::Null, "assigned_languages": []}},
                )
                .return_document(ReturnDocument::After)
                .await
                .map_err(|source| MongoDaoError::Application {
                    operation: "unseat",
                    source,
                })?;
            Ok(updated.map(Into::into))
        })
    }

    fn delete_application(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let result = store
                .applications()
                .delete_one(doc! {
                    "game_id": uuid_as_binary(game_id),
                    "user_id": uuid_as_binary(user_id),
                })
                .await
                .map_err(|source| MongoDaoError::Application {
                    operation: "delete",
                    source,
                })?;
            Ok(result.deleted_count > 0)
        })
    }
}

impl StatsStore for MongoStore {
    fn game_stats_for(
        &self,
        user_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<UserGameStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let documents: Vec<MongoGameStatsDocument> = store
                .game_stats()
                .find(doc! {"_id": {"$in": id_set(&user_ids)}})
                .await
                .map_err(|source| MongoDaoError::Stats {
                    operation: "game_stats_for",
                    source,
                })?
                .try_collect()
                .await
                .map_err(|source| MongoDaoError::Stats {
                    operation: "game_stats_for",
                    source,
                })?;

            let mut by_user: HashMap<Uuid, UserGameStatsEntity> = documents
                .into_iter()
                .map(UserGameStatsEntity::from)
                .map(|stats| (stats.user_id, stats))
                .collect();
            Ok(user_ids
                .into_iter()
                .map(|user_id| {
                    by_user
                        .remove(&user_id)
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
            let mut participants = winners.clone();
            participants.extend_from_slice(&losers);
            store.ensure_game_stats_rows(&participants).await?;

            if !winners.is_empty() {
                store
                    .game_stats()
                    .update_many(
                        doc! {"_id": {"$in": id_set(&winners)}},
                        doc! {"$inc": {"wins": 1, "win_streak": 1}},
                    )
                    .await
                    .map_err(|source| MongoDaoError::Stats {
                        operation: "record_wins",
                        source,
                    })?;
            }
            if !losers.is_empty() {
                store
                    .game_stats()
                    .update_many(
                        doc! {"_id": {"$in": id_set(&losers)}},
                        doc! {"$inc": {"loses": 1}, "$set": {"win_streak": 0}},
                    )
                    .await
                    .map_err(|source| MongoDaoError::Stats {
                        operation: "record_losses",
                        source,
                    })?;
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
            if user_ids.is_empty() {
                return Ok(());
            }
            store.ensure_user_stats_rows(&user_ids).await?;

            // Pipeline update so the zero floor is applied server-side in the
            // same write.
            let pipeline = vec![doc! {"$set": {
                "xp": {"$max": [0_i64, {"$add": [{"$ifNull": ["$xp", 0_i64]}, delta]}]},
            }}];
            store
                .user_stats()
                .update_many(doc! {"_id": {"$in": id_set(&user_ids)}}, pipeline)
                .await
                .map_err(|source| MongoDaoError::Stats {
                    operation: "add_experience",
                    source,
                })?;
            Ok(())
        })
    }

    fn add_coins(&self, user_id: Uuid, delta: i64) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_user_stats_rows(&[user_id]).await?;

            let pipeline = vec![doc! {"$set": {
                "coins": {"$max": [0_i64, {"$add": [{"$ifNull": ["$coins", 0_i64]}, delta]}]},
            }}];
            let updated = store
                .user_stats()
                .find_one_and_update(doc! {"_id": uuid_as_binary(user_id)}, pipeline)
                .return_document(ReturnDocument::After)
                .await
                .map_err(|source| MongoDaoError::Stats {
                    operation: "add_coins",
                    source,
                })?;

            let stats: UserStatsEntity = updated
                .map(Into::into)
                .unwrap_or_else(|| UserStatsEntity::zeroed(user_id));
            Ok(stats.coins)
        })
    }

    fn stats_for(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<UserStatsEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let document = store
                .user_stats()
                .find_one(doc! {"_id": uuid_as_binary(user_id)})
                .await
                .map_err(|source| MongoDaoError::Stats {
                    operation: "stats_for",
                    source,
                })?;
            Ok(document
                .map(Into::into)
                .unwrap_or_else(|| UserStatsEntity::zeroed(user_id)))
        })
    }
}

impl BadgeStore for MongoStore {
    fn grant_badge(&self, user_id: Uuid, badge: Badge) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let document = MongoBadgeDocument::new(user_id, badge);
            match store.badges().insert_one(document).await {
                Ok(_) => Ok(true),
                // The ownership index makes a repeat grant a no-op.
                Err(err) if is_duplicate_key(&err) => Ok(false),
                Err(source) => Err(MongoDaoError::Badge {
                    operation: "grant",
                    source,
                }
                .into()),
            }
        })
    }

    fn badges_for(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<UserBadgeEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let documents: Vec<MongoBadgeDocument> = store
                .badges()
                .find(doc! {"user_id": uuid_as_binary(user_id)})
                .sort(doc! {"awarded_at": 1})
                .await
                .map_err(|source| MongoDaoError::Badge {
                    operation: "list",
                    source,
                })?
                .try_collect()
                .await
                .map_err(|source| MongoDaoError::Badge {
                    operation: "list",
                    source,
                })?;
            Ok(documents.into_iter().map(Into::into).collect())
        })
    }
}
