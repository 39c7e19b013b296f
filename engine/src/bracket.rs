//! Snapshot transitions: initialization, winner recording with downstream
//! invalidation, and the JSON codec used for saving and sharing brackets.

use crate::rounds::{self, championship, conference_final, divisional_matchups, is_round_complete};
use crate::{
    BRACKET_SIZE, BracketError, BracketResult, CONFERENCE_SIZE, Conference, Entrant, Matchup,
    RoundKind, Snapshot,
};
use log::{debug, info};
use rand::Rng;
use std::collections::HashSet;

/// Build the opening snapshot: six Wild Card matchups, no winners.
pub fn initialize(entrants: Vec<Entrant>) -> BracketResult<Snapshot> {
    if entrants.len() != BRACKET_SIZE {
        return Err(BracketError::MalformedEntrantSet(format!(
            "expected {BRACKET_SIZE} entrants ({CONFERENCE_SIZE} per conference), got {}",
            entrants.len()
        )));
    }

    for conference in Conference::ALL {
        let count = entrants.iter().filter(|e| e.conference == conference).count();
        if count != CONFERENCE_SIZE {
            return Err(BracketError::MalformedEntrantSet(format!(
                "each conference must have exactly {CONFERENCE_SIZE} entrants, {conference} has {count}"
            )));
        }
    }

    let mut seen = HashSet::with_capacity(entrants.len());
    if let Some(dup) = entrants.iter().find(|e| !seen.insert(e.id.as_str())) {
        return Err(BracketError::MalformedEntrantSet(format!(
            "entrant id {} appears more than once",
            dup.id
        )));
    }

    let mut matchups = Vec::with_capacity(6);
    for conference in Conference::ALL {
        matchups.extend(rounds::wild_card_matchups(&entrants, conference)?);
    }

    info!("bracket initialized with {} wild card matchups", matchups.len());
    Ok(Snapshot { entrants, matchups })
}

/// Record `winner_id` as the winner of `matchup_id` and return the next snapshot.
///
/// Every later round of the edited matchup's conference is discarded, as is the
/// championship unless it is the matchup being edited. If that completes the
/// edited round, exactly one following round is generated.
pub fn record_winner(snapshot: &Snapshot, matchup_id: &str, winner_id: &str) -> BracketResult<Snapshot> {
    let target = snapshot
        .matchup(matchup_id)
        .ok_or_else(|| BracketError::MatchupNotFound(matchup_id.to_string()))?;

    if !target.has_participant(winner_id) {
        return Err(BracketError::InvalidWinner {
            matchup_id: matchup_id.to_string(),
            winner_id: winner_id.to_string(),
        });
    }

    let round = target.round;
    let conference = target.conference;

    let mut next = Snapshot {
        entrants: snapshot.entrants.clone(),
        matchups: snapshot
            .matchups
            .iter()
            .filter(|m| !is_invalidated(m, round, conference))
            .map(|m| {
                if m.id == matchup_id {
                    Matchup {
                        winner_id: Some(winner_id.to_string()),
                        ..m.clone()
                    }
                } else {
                    m.clone()
                }
            })
            .collect(),
    };

    let discarded = snapshot.matchups.len() - next.matchups.len();
    if discarded > 0 {
        debug!("{matchup_id}: discarded {discarded} downstream matchups");
    }

    let generated = next_round(&next, round, conference)?;
    if !generated.is_empty() {
        debug!(
            "{matchup_id}: generated {}",
            generated.iter().map(|m| m.id.as_str()).collect::<Vec<_>>().join(", ")
        );
    }
    next.matchups.extend(generated);

    Ok(next)
}

/// Whether a matchup falls downstream of an edit to `round` in `conference`.
fn is_invalidated(matchup: &Matchup, round: RoundKind, conference: Option<Conference>) -> bool {
    if matchup.round == RoundKind::Championship {
        return round != RoundKind::Championship;
    }
    conference.is_some() && matchup.conference == conference && matchup.round > round
}

/// The round immediately after `round`, if the edit completed it.
fn next_round(snapshot: &Snapshot, round: RoundKind, conference: Option<Conference>) -> BracketResult<Vec<Matchup>> {
    let Some(conference) = conference else {
        return Ok(Vec::new());
    };
    if !is_round_complete(snapshot, conference, round) {
        return Ok(Vec::new());
    }

    Ok(match round {
        RoundKind::WildCard => divisional_matchups(snapshot, conference)?,
        RoundKind::Divisional => conference_final(snapshot, conference).into_iter().collect(),
        RoundKind::ConferenceFinal => championship(snapshot).into_iter().collect(),
        RoundKind::Championship => Vec::new(),
    })
}

/// Start over with the same entrants: all picks and later rounds cleared.
pub fn reset_picks(snapshot: &Snapshot) -> BracketResult<Snapshot> {
    initialize(snapshot.entrants.clone())
}

/// Fill the whole bracket with coin-flip picks, round by round.
pub fn randomize_picks<R: Rng + ?Sized>(snapshot: &Snapshot, rng: &mut R) -> BracketResult<Snapshot> {
    let mut current = snapshot.clone();
    for round in RoundKind::ALL {
        let pending: Vec<(String, String, String)> = current
            .matchups
            .iter()
            .filter(|m| m.round == round)
            .map(|m| (m.id.clone(), m.home.id.clone(), m.away.id.clone()))
            .collect();

        for (matchup_id, home_id, away_id) in pending {
            let winner = if rng.gen_bool(0.5) { home_id } else { away_id };
            current = record_winner(&current, &matchup_id, &winner)?;
        }
    }
    Ok(current)
}

/// Pretty JSON in the export format (`entrants` + `matchups`).
pub fn to_json(snapshot: &Snapshot) -> BracketResult<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| BracketError::Import(e.to_string()))
}

/// Parse an exported snapshot. Only the structure is checked; recorded
/// winners are taken as-is.
pub fn from_json(json: &str) -> BracketResult<Snapshot> {
    serde_json::from_str(json).map_err(|e| BracketError::Import(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounds::CHAMPIONSHIP_ID;
    use crate::teams::seeds_2025;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entrant(conference: Conference, seed: u8) -> Entrant {
        Entrant {
            id: format!("{}-{seed}", conference.label().to_lowercase()),
            name: format!("{conference} Seed {seed}"),
            seed,
            conference,
            abbreviation: None,
            logo_url: None,
        }
    }

    fn field() -> Vec<Entrant> {
        Conference::ALL
            .into_iter()
            .flat_map(|c| (1..=7).map(move |s| entrant(c, s)))
            .collect()
    }

    fn ids_in(snapshot: &Snapshot, round: RoundKind) -> Vec<String> {
        snapshot
            .matchups
            .iter()
            .filter(|m| m.round == round)
            .map(|m| m.id.clone())
            .collect()
    }

    fn pick(snapshot: Snapshot, picks: &[(&str, &str)]) -> Snapshot {
        picks.iter().fold(snapshot, |s, (matchup, winner)| {
            record_winner(&s, matchup, winner).expect("valid pick")
        })
    }

    /// Chalk through both conferences up to, but not including, the championship pick.
    fn chalk_to_championship() -> Snapshot {
        let snapshot = initialize(field()).unwrap();
        pick(
            snapshot,
            &[
                ("wc-AFC-1", "afc-2"),
                ("wc-AFC-2", "afc-3"),
                ("wc-AFC-3", "afc-4"),
                ("div-AFC-1", "afc-1"),
                ("div-AFC-2", "afc-2"),
                ("conf-AFC", "afc-1"),
                ("wc-NFC-1", "nfc-2"),
                ("wc-NFC-2", "nfc-3"),
                ("wc-NFC-3", "nfc-4"),
                ("div-NFC-1", "nfc-1"),
                ("div-NFC-2", "nfc-2"),
                ("conf-NFC", "nfc-2"),
            ],
        )
    }

    #[test]
    fn initialize_builds_six_wild_card_matchups() {
        let snapshot = initialize(field()).unwrap();
        assert_eq!(snapshot.matchups.len(), 6);
        assert!(snapshot.matchups.iter().all(|m| m.round == RoundKind::WildCard));
        assert!(snapshot.matchups.iter().all(|m| m.winner_id.is_none()));
        assert!(snapshot.matchups.iter().all(|m| m.home.seed < m.away.seed));
        for conference in Conference::ALL {
            let pairs: Vec<(u8, u8)> = snapshot
                .matchups_in(conference, RoundKind::WildCard)
                .iter()
                .map(|m| (m.home.seed, m.away.seed))
                .collect();
            assert_eq!(pairs, vec![(2, 7), (3, 6), (4, 5)]);
        }
    }

    #[test]
    fn initialize_rejects_thirteen_and_fifteen_entrants() {
        let mut short = field();
        short.pop();
        assert!(matches!(initialize(short), Err(BracketError::MalformedEntrantSet(_))));

        let mut long = field();
        long.push(entrant(Conference::Nfc, 8));
        assert!(matches!(initialize(long), Err(BracketError::MalformedEntrantSet(_))));
    }

    #[test]
    fn initialize_rejects_eight_and_six_split() {
        let mut lopsided = field();
        let moved = lopsided.iter_mut().find(|e| e.id == "nfc-7").unwrap();
        moved.conference = Conference::Afc;
        moved.seed = 8;
        let err = initialize(lopsided).unwrap_err();
        assert!(matches!(err, BracketError::MalformedEntrantSet(_)), "{err}");
    }

    #[test]
    fn initialize_rejects_duplicate_ids() {
        let mut entrants = field();
        entrants[13].id = "afc-1".to_string();
        assert!(matches!(initialize(entrants), Err(BracketError::MalformedEntrantSet(_))));
    }

    #[test]
    fn completing_wild_card_generates_divisional() {
        let snapshot = pick(
            initialize(field()).unwrap(),
            &[("wc-AFC-1", "afc-2"), ("wc-AFC-2", "afc-3")],
        );
        assert!(ids_in(&snapshot, RoundKind::Divisional).is_empty());

        let snapshot = record_winner(&snapshot, "wc-AFC-3", "afc-4").unwrap();
        let divisional = snapshot.matchups_in(Conference::Afc, RoundKind::Divisional);
        assert_eq!(divisional.len(), 2);
        assert_eq!((divisional[0].home.id.as_str(), divisional[0].away.id.as_str()), ("afc-1", "afc-4"));
        assert_eq!((divisional[1].home.id.as_str(), divisional[1].away.id.as_str()), ("afc-2", "afc-3"));
        assert!(snapshot.matchups_in(Conference::Nfc, RoundKind::Divisional).is_empty());
    }

    #[test]
    fn generation_advances_one_round_per_call() {
        let snapshot = pick(
            initialize(field()).unwrap(),
            &[("wc-AFC-1", "afc-2"), ("wc-AFC-2", "afc-3"), ("wc-AFC-3", "afc-4")],
        );
        assert!(ids_in(&snapshot, RoundKind::ConferenceFinal).is_empty());

        let snapshot = record_winner(&snapshot, "div-AFC-1", "afc-4").unwrap();
        assert!(ids_in(&snapshot, RoundKind::ConferenceFinal).is_empty());

        let snapshot = record_winner(&snapshot, "div-AFC-2", "afc-3").unwrap();
        let final_game = snapshot.matchup("conf-AFC").unwrap();
        assert_eq!(final_game.home.id, "afc-3");
        assert_eq!(final_game.away.id, "afc-4");
    }

    #[test]
    fn championship_needs_both_conference_finals() {
        let snapshot = chalk_to_championship();
        let game = snapshot.championship().unwrap();
        assert_eq!(game.id, CHAMPIONSHIP_ID);
        assert_eq!(game.home.id, "afc-1");
        assert_eq!(game.away.id, "nfc-2");
        assert!(!snapshot.is_complete());

        let done = record_winner(&snapshot, CHAMPIONSHIP_ID, "nfc-2").unwrap();
        assert_eq!(done.champion().map(|e| e.id.as_str()), Some("nfc-2"));
        assert!(done.is_complete());
        assert_eq!(done.picks_made(), 13);
    }

    #[test]
    fn editing_wild_card_wipes_conference_and_championship_only() {
        let snapshot = record_winner(&chalk_to_championship(), CHAMPIONSHIP_ID, "afc-1").unwrap();

        let edited = record_winner(&snapshot, "wc-AFC-2", "afc-6").unwrap();
        assert!(edited.championship().is_none());
        assert!(edited.matchup("conf-AFC").is_none());
        // All AFC wild card games still decided, so the divisional round is rebuilt fresh.
        let divisional = edited.matchups_in(Conference::Afc, RoundKind::Divisional);
        assert_eq!(divisional.len(), 2);
        assert!(divisional.iter().all(|m| m.winner_id.is_none()));
        assert_eq!((divisional[0].home.seed, divisional[0].away.seed), (1, 6));
        assert_eq!((divisional[1].home.seed, divisional[1].away.seed), (2, 4));

        let nfc_before: Vec<&Matchup> = snapshot
            .matchups
            .iter()
            .filter(|m| m.conference == Some(Conference::Nfc))
            .collect();
        let nfc_after: Vec<&Matchup> = edited
            .matchups
            .iter()
            .filter(|m| m.conference == Some(Conference::Nfc))
            .collect();
        assert_eq!(nfc_before, nfc_after);
    }

    #[test]
    fn editing_divisional_keeps_wild_card_and_drops_final() {
        let snapshot = chalk_to_championship();
        let edited = record_winner(&snapshot, "div-NFC-1", "nfc-4").unwrap();
        assert!(edited.matchup("conf-NFC").is_some(), "both divisional games decided, final regenerated");
        let final_game = edited.matchup("conf-NFC").unwrap();
        assert_eq!(final_game.winner_id, None);
        assert_eq!((final_game.home.id.as_str(), final_game.away.id.as_str()), ("nfc-2", "nfc-4"));
        assert!(edited.championship().is_none());
        assert_eq!(
            edited.matchups_in(Conference::Nfc, RoundKind::WildCard),
            snapshot.matchups_in(Conference::Nfc, RoundKind::WildCard)
        );
        assert!(edited.matchup("conf-AFC").unwrap().is_decided());
    }

    #[test]
    fn editing_conference_final_regenerates_championship() {
        let snapshot = record_winner(&chalk_to_championship(), CHAMPIONSHIP_ID, "nfc-2").unwrap();
        let edited = record_winner(&snapshot, "conf-AFC", "afc-2").unwrap();
        let game = edited.championship().unwrap();
        assert_eq!(game.home.id, "afc-2");
        assert_eq!(game.winner_id, None);
    }

    #[test]
    fn rerecording_same_winner_still_cascades() {
        let snapshot = chalk_to_championship();
        let edited = record_winner(&snapshot, "wc-NFC-1", "nfc-2").unwrap();
        assert!(edited.matchup("conf-NFC").is_none());
        assert!(
            edited
                .matchups_in(Conference::Nfc, RoundKind::Divisional)
                .iter()
                .all(|m| !m.is_decided())
        );
    }

    #[test]
    fn no_downstream_round_without_complete_prerequisites() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut snapshot = randomize_picks(&initialize(field()).unwrap(), &mut rng).unwrap();
        let edits = ["wc-AFC-1", "div-NFC-2", "conf-AFC", "wc-NFC-3"];
        for matchup_id in edits {
            let Some(m) = snapshot.matchup(matchup_id) else { continue };
            let winner = m.away.id.clone();
            snapshot = record_winner(&snapshot, matchup_id, &winner).unwrap();
            for conference in Conference::ALL {
                for round in [RoundKind::Divisional, RoundKind::ConferenceFinal] {
                    if !snapshot.matchups_in(conference, round).is_empty() {
                        let prev = round.prev().unwrap();
                        assert!(rounds::is_round_complete(&snapshot, conference, prev));
                    }
                }
            }
            if snapshot.championship().is_some() {
                for conference in Conference::ALL {
                    assert!(rounds::is_round_complete(&snapshot, conference, RoundKind::ConferenceFinal));
                }
            }
        }
    }

    #[test]
    fn unknown_matchup_is_rejected() {
        let snapshot = initialize(field()).unwrap();
        let err = record_winner(&snapshot, "div-AFC-1", "afc-1").unwrap_err();
        assert_eq!(err, BracketError::MatchupNotFound("div-AFC-1".to_string()));
    }

    #[test]
    fn invalid_winner_leaves_snapshot_untouched() {
        let snapshot = pick(initialize(field()).unwrap(), &[("wc-AFC-1", "afc-7")]);
        let before = snapshot.clone();
        let err = record_winner(&snapshot, "wc-AFC-1", "afc-1").unwrap_err();
        assert_eq!(
            err,
            BracketError::InvalidWinner {
                matchup_id: "wc-AFC-1".to_string(),
                winner_id: "afc-1".to_string(),
            }
        );
        assert_eq!(snapshot, before);
    }

    #[test]
    fn reset_picks_returns_to_wild_card() {
        let snapshot = chalk_to_championship();
        let reset = reset_picks(&snapshot).unwrap();
        assert_eq!(reset, initialize(field()).unwrap());
    }

    #[test]
    fn randomize_produces_complete_bracket() {
        let mut rng = StdRng::seed_from_u64(2025);
        let snapshot = randomize_picks(&initialize(seeds_2025()).unwrap(), &mut rng).unwrap();
        assert!(snapshot.is_complete());
        assert_eq!(snapshot.matchups.len(), 13);
        assert!(snapshot.matchups.iter().all(Matchup::is_decided));
    }

    #[test]
    fn json_round_trip_uses_export_field_names() {
        let snapshot = chalk_to_championship();
        let json = to_json(&snapshot).unwrap();
        assert!(json.contains("\"entrants\""));
        assert!(json.contains("\"matchups\""));
        assert!(json.contains("\"winnerId\""));
        assert!(json.contains("\"round\": \"SB\""));
        assert_eq!(from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn championship_serializes_without_conference() {
        let snapshot = chalk_to_championship();
        let value = serde_json::to_value(snapshot.championship().unwrap()).unwrap();
        assert!(value.get("conference").is_none());
        assert!(value.get("winnerId").is_none());
    }

    #[test]
    fn from_json_rejects_missing_fields() {
        let err = from_json(r#"{"entrants": []}"#).unwrap_err();
        assert!(matches!(err, BracketError::Import(_)));

        let err = from_json(r#"{"entrants": [{"id": "x", "name": "X", "seed": 1}], "matchups": []}"#).unwrap_err();
        assert!(matches!(err, BracketError::Import(_)));
    }

    #[test]
    fn from_json_accepts_teams_and_games_keys() {
        let json = r#"{
            "teams": [
                {"id": "afc-2-ne", "name": "New England Patriots", "seed": 2, "conference": "AFC", "abbreviation": "NE"},
                {"id": "afc-7-lac", "name": "Los Angeles Chargers", "seed": 7, "conference": "AFC"}
            ],
            "games": [
                {
                    "id": "wc-AFC-1", "round": "WC", "conference": "AFC",
                    "home": {"id": "afc-2-ne", "name": "New England Patriots", "seed": 2, "conference": "AFC", "abbreviation": "NE"},
                    "away": {"id": "afc-7-lac", "name": "Los Angeles Chargers", "seed": 7, "conference": "AFC"},
                    "winnerId": "afc-7-lac"
                }
            ]
        }"#;
        let snapshot = from_json(json).unwrap();
        assert_eq!(snapshot.matchups[0].winner().map(|e| e.seed), Some(7));
        assert_eq!(snapshot.entrants[1].abbreviation, None);
        assert!(to_json(&snapshot).unwrap().contains("\"entrants\""));
    }

    #[test]
    fn championship_pick_leaves_other_matchups_alone() {
        let snapshot = chalk_to_championship();
        let game = snapshot.championship().unwrap().clone();
        let next = record_winner(&snapshot, &game.id, &game.away.id).unwrap();

        assert_eq!(next.matchups.len(), 13);
        assert_eq!(next.champion().map(|e| e.id.as_str()), Some(game.away.id.as_str()));
        for (before, after) in snapshot.matchups.iter().zip(&next.matchups) {
            if before.id != game.id {
                assert_eq!(before, after);
            }
        }
    }
}
