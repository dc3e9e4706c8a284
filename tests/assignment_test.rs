//! Integration tests for the application and seating workflows, run against
//! the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use devwars_back::{
    config::AppConfig,
    dao::store::memory::MemoryStore,
    domain::game::{GameMode, Team},
    dto::game::{CreateGameRequest, ObjectiveInput},
    error::ServiceError,
    services::{assignment_service, game_service},
    state::{AppState, SharedState},
};

async fn test_state() -> SharedState {
    let state = AppState::new(AppConfig::default());
    state.install_store(Arc::new(MemoryStore::new())).await;
    state
}

async fn scheduled_game(state: &SharedState) -> Uuid {
    let request = CreateGameRequest {
        title: "Season Opener".into(),
        start_time: "2026-09-01T18:00:00Z".into(),
        season: 4,
        mode: GameMode::Classic,
        templates: None,
        objectives: vec![
            ObjectiveInput {
                description: "Render a landing page".into(),
                is_bonus: false,
            },
            ObjectiveInput {
                description: "Add a dark theme".into(),
                is_bonus: true,
            },
        ],
    };
    game_service::create_game(state, request)
        .await
        .expect("create game")
        .id
}

#[tokio::test]
async fn second_application_for_same_user_conflicts() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let user = Uuid::new_v4();

    assignment_service::apply(&state, game, user)
        .await
        .expect("first application");
    let err = assignment_service::apply(&state, game, user)
        .await
        .expect_err("duplicate application");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn applying_to_unknown_game_fails() {
    let state = test_state().await;
    let err = assignment_service::apply(&state, Uuid::new_v4(), Uuid::new_v4())
        .await
        .expect_err("unknown game");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn seating_requires_an_application() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;

    let err = assignment_service::assign(&state, game, Uuid::new_v4(), Team::Blue, "html".into())
        .await
        .expect_err("no application on file");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn language_is_exclusive_within_a_team() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let rival = Uuid::new_v4();

    for user in [first, second, rival] {
        assignment_service::apply(&state, game, user)
            .await
            .expect("application");
    }

    assignment_service::assign(&state, game, first, Team::Blue, "html".into())
        .await
        .expect("first seat");

    // Same team, same language: rejected.
    let err = assignment_service::assign(&state, game, second, Team::Blue, "html".into())
        .await
        .expect_err("language taken");
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Opposite team may hold the same language.
    assignment_service::assign(&state, game, rival, Team::Red, "html".into())
        .await
        .expect("opposite team seat");
}

#[tokio::test]
async fn seated_user_cannot_switch_teams() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let user = Uuid::new_v4();

    assignment_service::apply(&state, game, user)
        .await
        .expect("application");
    assignment_service::assign(&state, game, user, Team::Blue, "html".into())
        .await
        .expect("first seat");

    let err = assignment_service::assign(&state, game, user, Team::Red, "css".into())
        .await
        .expect_err("team switch");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn one_user_can_hold_multiple_languages_on_one_team() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let user = Uuid::new_v4();

    assignment_service::apply(&state, game, user)
        .await
        .expect("application");
    assignment_service::assign(&state, game, user, Team::Blue, "html".into())
        .await
        .expect("html seat");
    let application = assignment_service::assign(&state, game, user, Team::Blue, "css".into())
        .await
        .expect("css seat");

    assert_eq!(application.team, Some(Team::Blue));
    assert_eq!(application.assigned_languages, vec!["html", "css"]);
}

#[tokio::test]
async fn unassign_clears_the_seat_but_keeps_the_application() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let user = Uuid::new_v4();

    assignment_service::apply(&state, game, user)
        .await
        .expect("application");
    assignment_service::assign(&state, game, user, Team::Red, "js".into())
        .await
        .expect("seat");

    let application = assignment_service::unassign(&state, game, user)
        .await
        .expect("unassign");
    assert_eq!(application.team, None);
    assert!(application.assigned_languages.is_empty());

    // The language is free again.
    let other = Uuid::new_v4();
    assignment_service::apply(&state, game, other)
        .await
        .expect("application");
    assignment_service::assign(&state, game, other, Team::Red, "js".into())
        .await
        .expect("seat after release");
}

#[tokio::test]
async fn resign_without_application_conflicts() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;

    let err = assignment_service::resign(&state, game, Uuid::new_v4())
        .await
        .expect_err("nothing to withdraw");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn roster_follows_seat_changes() {
    let state = test_state().await;
    let game = scheduled_game(&state).await;
    let user = Uuid::new_v4();

    assignment_service::apply(&state, game, user)
        .await
        .expect("application");
    assignment_service::assign(&state, game, user, Team::Blue, "html".into())
        .await
        .expect("seat");

    let details = game_service::game_details(&state, game).await.expect("details");
    assert_eq!(details.game.editors.len(), 1);
    assert_eq!(details.game.editors[0].user_id, user);
    assert_eq!(details.game.editors[0].language, "html");

    assignment_service::unassign(&state, game, user)
        .await
        .expect("unassign");
    let details = game_service::game_details(&state, game).await.expect("details");
    assert!(details.game.editors.is_empty());
}
