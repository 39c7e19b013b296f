//! Round generators and the queries they are built from.
//!
//! Every generator is a pure function of its inputs: the same entrants and
//! recorded winners always produce the same ids and pairings.

use crate::{
    BracketError, BracketResult, CONFERENCE_SIZE, Conference, Entrant, Matchup, RoundKind,
    Snapshot,
};
use log::debug;

/// Wild Card pairings by seed, home seed first. Seed 1 sits out on a bye.
pub const WILD_CARD_PAIRINGS: [(u8, u8); 3] = [(2, 7), (3, 6), (4, 5)];

/// Entrants that reach the Divisional round of one conference: the bye plus
/// three Wild Card winners.
const DIVISIONAL_FIELD: usize = 4;

/// The championship is played at a neutral site; this conference's champion
/// always takes the home slot. Seeds are not comparable across conferences.
pub const CHAMPIONSHIP_HOME: Conference = Conference::Afc;

pub const CHAMPIONSHIP_ID: &str = "sb-1";

pub fn matchup_id(round: RoundKind, conference: Conference, index: usize) -> String {
    match round {
        RoundKind::ConferenceFinal => format!("{}-{conference}", round.tag()),
        RoundKind::Championship => CHAMPIONSHIP_ID.to_string(),
        _ => format!("{}-{conference}-{}", round.tag(), index + 1),
    }
}

/// Order two entrants so the better (numerically lower) seed is home.
fn seeded_pair(a: Entrant, b: Entrant) -> (Entrant, Entrant) {
    if a.seed <= b.seed { (a, b) } else { (b, a) }
}

fn conference_matchup(
    round: RoundKind,
    conference: Conference,
    index: usize,
    a: Entrant,
    b: Entrant,
) -> Matchup {
    let (home, away) = seeded_pair(a, b);
    Matchup {
        id: matchup_id(round, conference, index),
        round,
        conference: Some(conference),
        home,
        away,
        winner_id: None,
    }
}

/// Generate the three Wild Card matchups of a conference (2v7, 3v6, 4v5).
pub fn wild_card_matchups(entrants: &[Entrant], conference: Conference) -> BracketResult<Vec<Matchup>> {
    let mut field: Vec<&Entrant> = entrants
        .iter()
        .filter(|e| e.conference == conference)
        .collect();

    if field.len() != CONFERENCE_SIZE {
        return Err(BracketError::MalformedEntrantSet(format!(
            "expected {CONFERENCE_SIZE} entrants for {conference}, got {}",
            field.len()
        )));
    }

    field.sort_by_key(|e| e.seed);
    let seeds_valid = field
        .iter()
        .zip(1u8..)
        .all(|(entrant, seed)| entrant.seed == seed);
    if !seeds_valid {
        let seeds: Vec<u8> = field.iter().map(|e| e.seed).collect();
        return Err(BracketError::MalformedEntrantSet(format!(
            "{conference} seeds must be exactly 1-{CONFERENCE_SIZE}, got {seeds:?}"
        )));
    }

    // Seeds are a bijection onto 1..=7, so seed n lives at index n - 1.
    let by_seed = |seed: u8| field[usize::from(seed) - 1].clone();

    Ok(WILD_CARD_PAIRINGS
        .iter()
        .enumerate()
        .map(|(index, &(home_seed, away_seed))| {
            conference_matchup(
                RoundKind::WildCard,
                conference,
                index,
                by_seed(home_seed),
                by_seed(away_seed),
            )
        })
        .collect())
}

/// The top seed of a conference, which skips the Wild Card round.
pub fn bye_entrant(entrants: &[Entrant], conference: Conference) -> Option<&Entrant> {
    entrants
        .iter()
        .find(|e| e.conference == conference && e.seed == 1)
}

/// Winners recorded so far in one round, in matchup order.
/// `conference` is ignored for the championship.
pub fn round_winners(snapshot: &Snapshot, conference: Conference, round: RoundKind) -> Vec<&Entrant> {
    snapshot
        .matchups_in(conference, round)
        .into_iter()
        .filter_map(Matchup::winner)
        .collect()
}

/// True when the round has been generated for the conference and every
/// matchup in it has a winner.
pub fn is_round_complete(snapshot: &Snapshot, conference: Conference, round: RoundKind) -> bool {
    let matchups = snapshot.matchups_in(conference, round);
    !matchups.is_empty() && matchups.iter().all(|m| m.is_decided())
}

/// Generate the two Divisional matchups of a conference: best remaining seed
/// against worst, the two middle seeds against each other.
pub fn divisional_matchups(snapshot: &Snapshot, conference: Conference) -> BracketResult<Vec<Matchup>> {
    let incomplete = BracketError::IncompleteRound {
        conference,
        round: RoundKind::WildCard,
    };

    let Some(bye) = bye_entrant(&snapshot.entrants, conference) else {
        return Err(incomplete);
    };
    let wild_card = snapshot.matchups_in(conference, RoundKind::WildCard);
    if wild_card.len() < WILD_CARD_PAIRINGS.len() || !wild_card.iter().all(|m| m.is_decided()) {
        return Err(incomplete);
    }

    let mut remaining: Vec<Entrant> = std::iter::once(bye)
        .chain(wild_card.iter().filter_map(|m| m.winner()))
        .cloned()
        .collect();

    remaining.sort_by_key(|e| e.seed);
    let [best, second, third, worst] = <[Entrant; DIVISIONAL_FIELD]>::try_from(remaining)
        .map_err(|field| BracketError::UnexpectedEntrantCount {
            conference,
            expected: DIVISIONAL_FIELD,
            found: field.len(),
        })?;

    debug!(
        "{conference} divisional: {} v {}, {} v {}",
        best.seed, worst.seed, second.seed, third.seed
    );

    Ok(vec![
        conference_matchup(RoundKind::Divisional, conference, 0, best, worst),
        conference_matchup(RoundKind::Divisional, conference, 1, second, third),
    ])
}

/// The conference final, once both Divisional matchups are decided.
pub fn conference_final(snapshot: &Snapshot, conference: Conference) -> Option<Matchup> {
    if !is_round_complete(snapshot, conference, RoundKind::Divisional) {
        return None;
    }
    let winners = round_winners(snapshot, conference, RoundKind::Divisional);
    let [a, b] = winners.as_slice() else {
        return None;
    };
    Some(conference_matchup(
        RoundKind::ConferenceFinal,
        conference,
        0,
        (*a).clone(),
        (*b).clone(),
    ))
}

/// The championship, once both conference finals are decided.
pub fn championship(snapshot: &Snapshot) -> Option<Matchup> {
    let champion_of = |conference: Conference| {
        round_winners(snapshot, conference, RoundKind::ConferenceFinal)
            .into_iter()
            .next()
            .cloned()
    };
    let home = champion_of(CHAMPIONSHIP_HOME)?;
    let away = champion_of(CHAMPIONSHIP_HOME.other())?;

    Some(Matchup {
        id: CHAMPIONSHIP_ID.to_string(),
        round: RoundKind::Championship,
        conference: None,
        home,
        away,
        winner_id: None,
    })
}

/// Compute one round on demand. A round that is not ready yet yields no
/// matchups instead of an error.
pub fn compute_round(snapshot: &Snapshot, conference: Conference, round: RoundKind) -> Vec<Matchup> {
    match round {
        RoundKind::WildCard => wild_card_matchups(&snapshot.entrants, conference).unwrap_or_default(),
        RoundKind::Divisional => divisional_matchups(snapshot, conference).unwrap_or_default(),
        RoundKind::ConferenceFinal => conference_final(snapshot, conference).into_iter().collect(),
        RoundKind::Championship => championship(snapshot).into_iter().collect(),
    }
}
