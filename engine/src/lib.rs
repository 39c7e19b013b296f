pub mod bracket;
pub mod error;
pub mod rounds;
pub mod teams;

pub use bracket::{initialize, record_winner};
pub use error::{BracketError, BracketResult};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seeds per conference. Fixed: the playoff format has no other size.
pub const CONFERENCE_SIZE: usize = 7;

/// Entrants in a full bracket (two conferences).
pub const BRACKET_SIZE: usize = CONFERENCE_SIZE * 2;

// ---------------------------------------------------------------------------
// Domain types. The snapshot is also the export/import wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conference {
    #[default]
    #[serde(rename = "AFC")]
    Afc,
    #[serde(rename = "NFC")]
    Nfc,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::Afc, Conference::Nfc];

    pub fn label(&self) -> &'static str {
        match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Conference::Afc => Conference::Nfc,
            Conference::Nfc => Conference::Afc,
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Navigation axis. Ordered from earliest to latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoundKind {
    #[default]
    #[serde(rename = "WC")]
    WildCard,
    #[serde(rename = "DIV")]
    Divisional,
    #[serde(rename = "CONF")]
    ConferenceFinal,
    #[serde(rename = "SB")]
    Championship,
}

impl RoundKind {
    pub const ALL: [RoundKind; 4] = [
        RoundKind::WildCard,
        RoundKind::Divisional,
        RoundKind::ConferenceFinal,
        RoundKind::Championship,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoundKind::WildCard => "Wild Card",
            RoundKind::Divisional => "Divisional",
            RoundKind::ConferenceFinal => "Conference Championship",
            RoundKind::Championship => "Super Bowl",
        }
    }

    /// Short tag used in matchup ids and the wire format.
    pub fn tag(&self) -> &'static str {
        match self {
            RoundKind::WildCard => "wc",
            RoundKind::Divisional => "div",
            RoundKind::ConferenceFinal => "conf",
            RoundKind::Championship => "sb",
        }
    }

    /// The championship is the only cross-conference round.
    pub fn is_conference_round(&self) -> bool {
        !matches!(self, RoundKind::Championship)
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            RoundKind::WildCard => None,
            RoundKind::Divisional => Some(RoundKind::WildCard),
            RoundKind::ConferenceFinal => Some(RoundKind::Divisional),
            RoundKind::Championship => Some(RoundKind::ConferenceFinal),
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            RoundKind::WildCard => Some(RoundKind::Divisional),
            RoundKind::Divisional => Some(RoundKind::ConferenceFinal),
            RoundKind::ConferenceFinal => Some(RoundKind::Championship),
            RoundKind::Championship => None,
        }
    }

    /// Number of matchups a conference plays in this round (championship: the one game).
    pub fn games_per_conference(&self) -> usize {
        match self {
            RoundKind::WildCard => 3,
            RoundKind::Divisional => 2,
            RoundKind::ConferenceFinal => 1,
            RoundKind::Championship => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrant {
    pub id: String,
    pub name: String,
    pub seed: u8,
    pub conference: Conference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Entrant {
    /// "DEN" when an abbreviation is known, else the full name.
    pub fn short_label(&self) -> &str {
        self.abbreviation.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub id: String,
    pub round: RoundKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<Conference>,
    pub home: Entrant,
    pub away: Entrant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
}

impl Matchup {
    pub fn is_decided(&self) -> bool {
        self.winner_id.is_some()
    }

    pub fn has_participant(&self, entrant_id: &str) -> bool {
        self.home.id == entrant_id || self.away.id == entrant_id
    }

    pub fn winner(&self) -> Option<&Entrant> {
        let winner_id = self.winner_id.as_deref()?;
        if self.home.id == winner_id {
            Some(&self.home)
        } else if self.away.id == winner_id {
            Some(&self.away)
        } else {
            None
        }
    }
}

/// Complete tournament state. Transitions never mutate a snapshot in place;
/// they return a new one so callers can keep history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(alias = "teams")]
    pub entrants: Vec<Entrant>,
    #[serde(alias = "games")]
    pub matchups: Vec<Matchup>,
}

impl Snapshot {
    pub fn matchup(&self, matchup_id: &str) -> Option<&Matchup> {
        self.matchups.iter().find(|m| m.id == matchup_id)
    }

    /// Matchups of one round. `conference` is ignored for the championship.
    pub fn matchups_in(&self, conference: Conference, round: RoundKind) -> Vec<&Matchup> {
        self.matchups
            .iter()
            .filter(|m| {
                m.round == round
                    && (round == RoundKind::Championship || m.conference == Some(conference))
            })
            .collect()
    }

    pub fn championship(&self) -> Option<&Matchup> {
        self.matchups
            .iter()
            .find(|m| m.round == RoundKind::Championship)
    }

    pub fn champion(&self) -> Option<&Entrant> {
        self.championship().and_then(Matchup::winner)
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    pub fn picks_made(&self) -> usize {
        self.matchups.iter().filter(|m| m.is_decided()).count()
    }
}
