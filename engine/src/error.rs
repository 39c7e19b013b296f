use crate::{Conference, RoundKind};
use std::fmt;

pub type BracketResult<T> = Result<T, BracketError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    /// Wrong entrant count, per-conference composition, or seeding at initialization.
    MalformedEntrantSet(String),
    MatchupNotFound(String),
    InvalidWinner {
        matchup_id: String,
        winner_id: String,
    },
    /// Advancing entrants did not add up. Unreachable through `record_winner`
    /// on snapshots the engine built itself; imported snapshots can trip it.
    UnexpectedEntrantCount {
        conference: Conference,
        expected: usize,
        found: usize,
    },
    IncompleteRound {
        conference: Conference,
        round: RoundKind,
    },
    /// Structurally invalid snapshot JSON.
    Import(String),
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::MalformedEntrantSet(msg) => write!(f, "Malformed entrant set: {msg}"),
            BracketError::MatchupNotFound(id) => write!(f, "Matchup {id} not found"),
            BracketError::InvalidWinner { matchup_id, winner_id } => {
                write!(f, "Winner {winner_id} is not a participant in matchup {matchup_id}")
            }
            BracketError::UnexpectedEntrantCount { conference, expected, found } => write!(
                f,
                "Expected {expected} {conference} entrants to advance, got {found}"
            ),
            BracketError::IncompleteRound { conference, round } => {
                write!(f, "{conference} {} round is not complete", round.label())
            }
            BracketError::Import(msg) => write!(f, "Import failed: {msg}"),
        }
    }
}

impl std::error::Error for BracketError {}
