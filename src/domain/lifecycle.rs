use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Created but not yet live; applications and seating are open.
    Scheduled,
    /// Currently live; spectators receive snapshot updates.
    Active,
    /// Finished and settled.
    Ended,
}

/// Events that drive the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Put the game live.
    Activate,
    /// Close the game and trigger settlement.
    End,
}

/// Error returned when an event cannot be applied from the current status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while {from:?}")]
pub struct InvalidTransition {
    /// Status the game was in when the event was received.
    pub from: GameStatus,
    /// The rejected event.
    pub event: LifecycleEvent,
}

/// Compute the status an event leads to, or reject the event.
///
/// `Ended -> Active` is a deliberate rematch edge: a finished game may be put
/// live again, and the caller is responsible for clearing the stale score
/// summary so the next end recomputes it.
pub fn next_status(from: GameStatus, event: LifecycleEvent) -> Result<GameStatus, InvalidTransition> {
    match (from, event) {
        (GameStatus::Scheduled | GameStatus::Ended, LifecycleEvent::Activate) => {
            Ok(GameStatus::Active)
        }
        (GameStatus::Scheduled | GameStatus::Active, LifecycleEvent::End) => Ok(GameStatus::Ended),
        (from, event) => Err(InvalidTransition { from, event }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_game_can_activate() {
        assert_eq!(
            next_status(GameStatus::Scheduled, LifecycleEvent::Activate),
            Ok(GameStatus::Active)
        );
    }

    #[test]
    fn active_game_cannot_activate_again() {
        let err = next_status(GameStatus::Active, LifecycleEvent::Activate).unwrap_err();
        assert_eq!(err.from, GameStatus::Active);
        assert_eq!(err.event, LifecycleEvent::Activate);
    }

    #[test]
    fn ended_game_can_be_reactivated() {
        assert_eq!(
            next_status(GameStatus::Ended, LifecycleEvent::Activate),
            Ok(GameStatus::Active)
        );
    }

    #[test]
    fn active_game_can_end() {
        assert_eq!(
            next_status(GameStatus::Active, LifecycleEvent::End),
            Ok(GameStatus::Ended)
        );
    }

    #[test]
    fn scheduled_game_can_end_without_going_live() {
        assert_eq!(
            next_status(GameStatus::Scheduled, LifecycleEvent::End),
            Ok(GameStatus::Ended)
        );
    }

    #[test]
    fn ended_game_cannot_end_again() {
        let err = next_status(GameStatus::Ended, LifecycleEvent::End).unwrap_err();
        assert_eq!(err.from, GameStatus::Ended);
        assert_eq!(err.event, LifecycleEvent::End);
    }
}
