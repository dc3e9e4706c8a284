//! Integration tests for game settlement, badge awards, and the rematch path,
//! run against the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use devwars_back::{
    config::AppConfig,
    dao::models::UserGameStatsEntity,
    dao::store::memory::MemoryStore,
    domain::badges::Badge,
    domain::game::{GameMode, Team},
    dto::game::{CreateGameRequest, ObjectiveInput},
    dto::results::{EndGameRequest, TeamResultInput},
    error::ServiceError,
    services::{assignment_service, badge_service, game_service, lifecycle_service},
    state::{AppState, SharedState},
};

async fn test_state() -> SharedState {
    let state = AppState::new(AppConfig::default());
    state.install_store(Arc::new(MemoryStore::new())).await;
    state
}

async fn scheduled_game(state: &SharedState) -> Uuid {
    let request = CreateGameRequest {
        title: "Settlement Night".into(),
        start_time: "2026-09-05T20:00:00Z".into(),
        season: 4,
        mode: GameMode::Classic,
        templates: None,
        objectives: vec![ObjectiveInput {
            description: "Ship the page".into(),
            is_bonus: false,
        }],
    };
    game_service::create_game(state, request)
        .await
        .expect("create game")
        .id
}

async fn seat(state: &SharedState, game: Uuid, user: Uuid, team: Team, language: &str) {
    assignment_service::apply(state, game, user)
        .await
        .expect("application");
    assignment_service::assign(state, game, user, team, language.into())
        .await
        .expect("seat");
}

fn blue_wins() -> EndGameRequest {
    EndGameRequest {
        blue: TeamResultInput {
            completed_objectives: vec![1],
            ..Default::default()
        },
        red: TeamResultInput::default(),
        winner: Some(Team::Blue),
        tie: false,
    }
}

fn tied() -> EndGameRequest {
    EndGameRequest {
        blue: TeamResultInput::default(),
        red: TeamResultInput::default(),
        winner: None,
        tie: true,
    }
}

async fn game_stats(state: &SharedState, user: Uuid) -> UserGameStatsEntity {
    let store = state.require_store().await.expect("store");
    store
        .game_stats_for(vec![user])
        .await
        .expect("game stats")
        .into_iter()
        .next()
        .expect("stats row")
}

#[tokio::test]
async fn ending_a_game_pays_winners_and_losers() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let winner = Uuid::new_v4();
    let loser = Uuid::new_v4();

    seat(&state, game, winner, Team::Blue, "html").await;
    seat(&state, game, loser, Team::Red, "css").await;
    lifecycle_service::activate(&state, game).await.expect("activate");
    lifecycle_service::end(&state, game, blue_wins()).await.expect("end");

    let store = state.require_store().await.expect("store");

    let winner_record = game_stats(&state, winner).await;
    assert_eq!(winner_record.wins, 1);
    assert_eq!(winner_record.win_streak, 1);

    let loser_record = game_stats(&state, loser).await;
    assert_eq!(loser_record.loses, 1);
    assert_eq!(loser_record.win_streak, 0);

    // 4000 for the win, 800 participation, and 1000 from the first-victory
    // badge.
    let winner_stats = store.stats_for(winner).await.expect("winner stats");
    assert_eq!(winner_stats.xp, 5_800);
    assert_eq!(winner_stats.coins, 300);

    // The loss penalty clamps at zero, then the participation credit lands.
    let loser_stats = store.stats_for(loser).await.expect("loser stats");
    assert_eq!(loser_stats.xp, 800);
}

#[tokio::test]
async fn loss_penalty_never_drops_experience_below_zero() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let winner = Uuid::new_v4();
    let poor = Uuid::new_v4();
    let rich = Uuid::new_v4();

    seat(&state, game, winner, Team::Blue, "html").await;
    seat(&state, game, poor, Team::Red, "css").await;
    seat(&state, game, rich, Team::Red, "js").await;

    let store = state.require_store().await.expect("store");
    store
        .add_experience(vec![poor], 1_000)
        .await
        .expect("seed experience");
    store
        .add_experience(vec![rich], 3_000)
        .await
        .expect("seed experience");

    lifecycle_service::end(&state, game, blue_wins()).await.expect("end");

    // 1000 minus the 2400 penalty clamps at zero; participation still pays.
    let poor_stats = store.stats_for(poor).await.expect("poor stats");
    assert_eq!(poor_stats.xp, 800);

    // 3000 absorbs the full penalty, then the participation credit lands.
    let rich_stats = store.stats_for(rich).await.expect("rich stats");
    assert_eq!(rich_stats.xp, 1_400);
}

#[tokio::test]
async fn tied_game_pays_participation_only() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let blue = Uuid::new_v4();
    let red = Uuid::new_v4();
    let unseated = Uuid::new_v4();

    seat(&state, game, blue, Team::Blue, "html").await;
    seat(&state, game, red, Team::Red, "css").await;
    assignment_service::apply(&state, game, unseated)
        .await
        .expect("application");

    lifecycle_service::end(&state, game, tied()).await.expect("end");

    let store = state.require_store().await.expect("store");
    for user in [blue, red] {
        let stats = store.stats_for(user).await.expect("stats");
        assert_eq!(stats.xp, 800);

        let record = game_stats(&state, user).await;
        assert_eq!(record.wins, 0);
        assert_eq!(record.loses, 0);
        assert_eq!(record.win_streak, 0);
    }

    // Applicants without a seat do not participate in the payout.
    let stats = store.stats_for(unseated).await.expect("stats");
    assert_eq!(stats.xp, 0);
}

#[tokio::test]
async fn ending_twice_settles_once() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let winner = Uuid::new_v4();

    seat(&state, game, winner, Team::Blue, "html").await;
    lifecycle_service::end(&state, game, blue_wins()).await.expect("first end");

    let err = lifecycle_service::end(&state, game, blue_wins())
        .await
        .expect_err("second end");
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let record = game_stats(&state, winner).await;
    assert_eq!(record.wins, 1);
}

#[tokio::test]
async fn rematch_clears_the_score_and_settles_again() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let winner = Uuid::new_v4();
    let loser = Uuid::new_v4();

    seat(&state, game, winner, Team::Blue, "html").await;
    seat(&state, game, loser, Team::Red, "css").await;
    lifecycle_service::end(&state, game, blue_wins()).await.expect("first end");

    let snapshot = lifecycle_service::activate(&state, game)
        .await
        .expect("rematch activation");
    assert!(snapshot.score.is_none());

    lifecycle_service::end(&state, game, blue_wins()).await.expect("second end");

    let record = game_stats(&state, winner).await;
    assert_eq!(record.wins, 2);
    assert_eq!(record.win_streak, 2);
}

#[tokio::test]
async fn first_victory_badge_requires_a_clean_record() {
    let state = test_state().await;
    let tainted = Uuid::new_v4();
    let clean = Uuid::new_v4();

    // Tainted player loses their first game.
    let first = scheduled_game(&state).await;
    seat(&state, first, clean, Team::Blue, "html").await;
    seat(&state, first, tainted, Team::Red, "css").await;
    lifecycle_service::end(&state, first, blue_wins()).await.expect("end");

    // Then wins their second.
    let second = scheduled_game(&state).await;
    seat(&state, second, tainted, Team::Blue, "html").await;
    seat(&state, second, clean, Team::Red, "css").await;
    lifecycle_service::end(&state, second, blue_wins()).await.expect("end");

    let clean_badges = badge_service::badges_for_user(&state, clean)
        .await
        .expect("badges");
    assert!(clean_badges.iter().any(|owned| owned.badge == Badge::WinFirstGame));

    let tainted_badges = badge_service::badges_for_user(&state, tainted)
        .await
        .expect("badges");
    assert!(tainted_badges.iter().all(|owned| owned.badge != Badge::WinFirstGame));
}

#[tokio::test]
async fn three_straight_wins_earn_the_streak_badge() {
    let state = test_state().await;
    let winner = Uuid::new_v4();

    for round in 0..3 {
        let game = scheduled_game(&state).await;
        let opponent = Uuid::new_v4();
        seat(&state, game, winner, Team::Blue, "html").await;
        seat(&state, game, opponent, Team::Red, "css").await;
        lifecycle_service::end(&state, game, blue_wins()).await.expect("end");

        let badges = badge_service::badges_for_user(&state, winner)
            .await
            .expect("badges");
        let has_streak = badges.iter().any(|owned| owned.badge == Badge::HotStreak);
        assert_eq!(has_streak, round == 2, "round {round}");
    }

    let record = game_stats(&state, winner).await;
    assert_eq!(record.win_streak, 3);
}

#[tokio::test]
async fn coin_grant_crossing_a_threshold_awards_the_badge() {
    let state = test_state().await;
    let user = Uuid::new_v4();

    let store = state.require_store().await.expect("store");
    store.add_coins(user, 4_999).await.expect("seed coins");

    let (balance, awarded) = badge_service::grant_coins(&state, user, 10)
        .await
        .expect("grant");
    assert_eq!(balance, 5_009);
    assert_eq!(awarded, vec![Badge::Coins5000]);

    // The threshold badge credits experience, not coins.
    let stats = store.stats_for(user).await.expect("stats");
    assert_eq!(stats.xp, 1_200);

    // Crossing the same threshold again awards nothing new.
    store.add_coins(user, -200).await.expect("spend coins");
    let (_, awarded) = badge_service::grant_coins(&state, user, 400)
        .await
        .expect("regrant");
    assert!(awarded.is_empty());
}

#[tokio::test]
async fn badge_grants_are_idempotent() {
    let state = test_state().await;
    let user = Uuid::new_v4();

    let store = state.require_store().await.expect("store");
    assert!(store.grant_badge(user, Badge::HotStreak).await.expect("grant"));
    assert!(!store.grant_badge(user, Badge::HotStreak).await.expect("regrant"));

    let badges = store.badges_for(user).await.expect("badges");
    assert_eq!(badges.len(), 1);
}
