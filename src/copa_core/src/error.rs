use thiserror::Error;

use crate::matches::MatchStatus;

/// Errors raised by the validating entry points and loaders.
///
/// The lenient standings path never produces these; it skips bad input instead.
#[derive(Debug, Error)]
pub enum CopaError {
    #[error("match {match_index} references unknown team {team_id}")]
    UnknownTeam { match_index: usize, team_id: String },

    #[error("match {match_index} has team {team_id} playing itself")]
    SelfMatch { match_index: usize, team_id: String },

    #[error("a team cannot play against itself: {0}")]
    SameTeamFixture(String),

    #[error("cannot {action} match {match_id} while it is {status}")]
    InvalidTransition {
        match_id: String,
        status: MatchStatus,
        action: &'static str,
    },

    #[error("player {player_id} has jersey number {number}, expected 1 to 99")]
    InvalidJersey { player_id: String, number: u32 },

    #[error("jersey number {number} is already used in team {team_id}")]
    DuplicateJersey { team_id: String, number: u32 },

    #[error("invalid match status: {0}")]
    InvalidStatus(String),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CopaError>;

#[cfg(feature = "python")]
impl From<CopaError> for pyo3::PyErr {
    fn from(err: CopaError) -> Self {
        match err {
            CopaError::Io(e) => pyo3::exceptions::PyIOError::new_err(format!("Failed to open file: {}", e)),
            other => pyo3::exceptions::PyValueError::new_err(other.to_string()),
        }
    }
}
