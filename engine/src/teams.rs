//! Static NFL club catalog and the 2025 playoff seeding.

use crate::{CONFERENCE_SIZE, Conference, Entrant};

const LOGO_BASE: &str = "https://a.espncdn.com/i/teamlogos/nfl/500";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    East,
    North,
    South,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NflTeam {
    pub id: &'static str,
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub conference: Conference,
    pub division: Division,
    logo_code: &'static str,
}

impl NflTeam {
    pub fn logo_url(&self) -> String {
        format!("{LOGO_BASE}/{}.png", self.logo_code)
    }
}

const fn team(
    id: &'static str,
    name: &'static str,
    abbreviation: &'static str,
    conference: Conference,
    division: Division,
    logo_code: &'static str,
) -> NflTeam {
    NflTeam { id, name, abbreviation, conference, division, logo_code }
}

pub static NFL_TEAMS: [NflTeam; 32] = [
    team("buffalo-bills", "Buffalo Bills", "BUF", Conference::Afc, Division::East, "buf"),
    team("miami-dolphins", "Miami Dolphins", "MIA", Conference::Afc, Division::East, "mia"),
    team("new-england-patriots", "New England Patriots", "NE", Conference::Afc, Division::East, "ne"),
    team("new-york-jets", "New York Jets", "NYJ", Conference::Afc, Division::East, "nyj"),
    team("baltimore-ravens", "Baltimore Ravens", "BAL", Conference::Afc, Division::North, "bal"),
    team("cincinnati-bengals", "Cincinnati Bengals", "CIN", Conference::Afc, Division::North, "cin"),
    team("cleveland-browns", "Cleveland Browns", "CLE", Conference::Afc, Division::North, "cle"),
    team("pittsburgh-steelers", "Pittsburgh Steelers", "PIT", Conference::Afc, Division::North, "pit"),
    team("houston-texans", "Houston Texans", "HOU", Conference::Afc, Division::South, "hou"),
    team("indianapolis-colts", "Indianapolis Colts", "IND", Conference::Afc, Division::South, "ind"),
    team("jacksonville-jaguars", "Jacksonville Jaguars", "JAX", Conference::Afc, Division::South, "jax"),
    team("tennessee-titans", "Tennessee Titans", "TEN", Conference::Afc, Division::South, "ten"),
    team("denver-broncos", "Denver Broncos", "DEN", Conference::Afc, Division::West, "den"),
    team("kansas-city-chiefs", "Kansas City Chiefs", "KC", Conference::Afc, Division::West, "kc"),
    team("las-vegas-raiders", "Las Vegas Raiders", "LV", Conference::Afc, Division::West, "lv"),
    team("los-angeles-chargers", "Los Angeles Chargers", "LAC", Conference::Afc, Division::West, "lac"),
    team("dallas-cowboys", "Dallas Cowboys", "DAL", Conference::Nfc, Division::East, "dal"),
    team("new-york-giants", "New York Giants", "NYG", Conference::Nfc, Division::East, "nyg"),
    team("philadelphia-eagles", "Philadelphia Eagles", "PHI", Conference::Nfc, Division::East, "phi"),
    team("washington-commanders", "Washington Commanders", "WAS", Conference::Nfc, Division::East, "wsh"),
    team("chicago-bears", "Chicago Bears", "CHI", Conference::Nfc, Division::North, "chi"),
    team("detroit-lions", "Detroit Lions", "DET", Conference::Nfc, Division::North, "det"),
    team("green-bay-packers", "Green Bay Packers", "GB", Conference::Nfc, Division::North, "gb"),
    team("minnesota-vikings", "Minnesota Vikings", "MIN", Conference::Nfc, Division::North, "min"),
    team("atlanta-falcons", "Atlanta Falcons", "ATL", Conference::Nfc, Division::South, "atl"),
    team("carolina-panthers", "Carolina Panthers", "CAR", Conference::Nfc, Division::South, "car"),
    team("new-orleans-saints", "New Orleans Saints", "NO", Conference::Nfc, Division::South, "no"),
    team("tampa-bay-buccaneers", "Tampa Bay Buccaneers", "TB", Conference::Nfc, Division::South, "tb"),
    team("arizona-cardinals", "Arizona Cardinals", "ARI", Conference::Nfc, Division::West, "ari"),
    team("los-angeles-rams", "Los Angeles Rams", "LAR", Conference::Nfc, Division::West, "lar"),
    team("san-francisco-49ers", "San Francisco 49ers", "SF", Conference::Nfc, Division::West, "sf"),
    team("seattle-seahawks", "Seattle Seahawks", "SEA", Conference::Nfc, Division::West, "sea"),
];

/// 2025 playoff seeding, seed 1 first.
const SEEDS_2025_AFC: [&str; CONFERENCE_SIZE] = [
    "denver-broncos",
    "new-england-patriots",
    "jacksonville-jaguars",
    "pittsburgh-steelers",
    "houston-texans",
    "buffalo-bills",
    "los-angeles-chargers",
];

const SEEDS_2025_NFC: [&str; CONFERENCE_SIZE] = [
    "seattle-seahawks",
    "chicago-bears",
    "philadelphia-eagles",
    "carolina-panthers",
    "los-angeles-rams",
    "san-francisco-49ers",
    "green-bay-packers",
];

pub fn find_team(team_id: &str) -> Option<&'static NflTeam> {
    NFL_TEAMS.iter().find(|t| t.id == team_id)
}

/// Clubs of one conference in catalog order (division, then alphabetical).
pub fn teams_in(conference: Conference) -> Vec<&'static NflTeam> {
    NFL_TEAMS
        .iter()
        .filter(|t| t.conference == conference)
        .collect()
}

/// Build a seeded entrant. Ids look like `afc-1-denver-broncos`, so the same
/// club seeded differently never collides with an older export.
pub fn entrant_for(team: &NflTeam, seed: u8) -> Entrant {
    Entrant {
        id: format!(
            "{}-{seed}-{}",
            team.conference.label().to_lowercase(),
            team.id
        ),
        name: team.name.to_string(),
        seed,
        conference: team.conference,
        abbreviation: Some(team.abbreviation.to_string()),
        logo_url: Some(team.logo_url()),
    }
}

/// Team ids of the 2025 seeding for one conference, seed 1 first.
pub fn seed_ids_2025(conference: Conference) -> [&'static str; CONFERENCE_SIZE] {
    match conference {
        Conference::Afc => SEEDS_2025_AFC,
        Conference::Nfc => SEEDS_2025_NFC,
    }
}

/// The 14 entrants of the 2025 playoffs, AFC first.
pub fn seeds_2025() -> Vec<Entrant> {
    Conference::ALL
        .into_iter()
        .flat_map(|conference| {
            seed_ids_2025(conference)
                .into_iter()
                .zip(1u8..)
                .filter_map(|(team_id, seed)| find_team(team_id).map(|t| entrant_for(t, seed)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_sixteen_teams_per_conference() {
        assert_eq!(teams_in(Conference::Afc).len(), 16);
        assert_eq!(teams_in(Conference::Nfc).len(), 16);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<_> = NFL_TEAMS.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), NFL_TEAMS.len());
    }

    #[test]
    fn seeds_2025_resolve_to_fourteen_entrants() {
        let entrants = seeds_2025();
        assert_eq!(entrants.len(), 14);
        let broncos = &entrants[0];
        assert_eq!(broncos.id, "afc-1-denver-broncos");
        assert_eq!(broncos.seed, 1);
        assert_eq!(broncos.abbreviation.as_deref(), Some("DEN"));
        assert_eq!(
            broncos.logo_url.as_deref(),
            Some("https://a.espncdn.com/i/teamlogos/nfl/500/den.png")
        );
    }

    #[test]
    fn seeds_2025_stay_inside_their_conference() {
        for conference in Conference::ALL {
            for team_id in seed_ids_2025(conference) {
                let team = find_team(team_id).expect("seeded team is in the catalog");
                assert_eq!(team.conference, conference, "{team_id}");
            }
        }
    }

    #[test]
    fn washington_logo_uses_espn_code() {
        let team = find_team("washington-commanders").unwrap();
        assert!(team.logo_url().ends_with("/wsh.png"));
    }
}
