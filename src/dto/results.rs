use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::game::Team;

/// Final results for one team, reported when a game ends.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TeamResultInput {
    /// Identifiers of the objectives the team completed. Unknown identifiers
    /// are rejected by the lifecycle service.
    #[serde(default)]
    pub completed_objectives: Vec<u32>,
    /// Votes received for UI quality.
    #[serde(default)]
    pub ui_votes: u32,
    /// Votes received for UX quality.
    #[serde(default)]
    pub ux_votes: u32,
    /// Coins bet on this team by spectators.
    #[serde(default)]
    pub bets: u32,
}

/// Payload closing a game, carrying the authoritative outcome.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EndGameRequest {
    /// Blue team's reported results.
    pub blue: TeamResultInput,
    /// Red team's reported results.
    pub red: TeamResultInput,
    /// The winning team; must be absent when `tie` is set.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub winner: Option<Team>,
    /// Whether the game ended in a tie.
    #[serde(default)]
    pub tie: bool,
}

impl Validate for EndGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match (self.winner, self.tie) {
            (Some(_), true) => {
                let mut err = ValidationError::new("winner_and_tie");
                err.message = Some("a tied game cannot also name a winner".into());
                errors.add("winner", err);
            }
            (None, false) => {
                let mut err = ValidationError::new("winner_missing");
                err.message = Some("a decided game must name a winner".into());
                errors.add("winner", err);
            }
            _ => {}
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(winner: Option<Team>, tie: bool) -> EndGameRequest {
        EndGameRequest {
            blue: TeamResultInput::default(),
            red: TeamResultInput::default(),
            winner,
            tie,
        }
    }

    #[test]
    fn decided_game_with_winner_is_valid() {
        assert!(request(Some(Team::Blue), false).validate().is_ok());
    }

    #[test]
    fn tie_without_winner_is_valid() {
        assert!(request(None, true).validate().is_ok());
    }

    #[test]
    fn tie_with_winner_is_rejected() {
        assert!(request(Some(Team::Red), true).validate().is_err());
    }

    #[test]
    fn decided_game_without_winner_is_rejected() {
        assert!(request(None, false).validate().is_err());
    }
}
