use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::constants::PLAYOFF_SEEDS;
use crate::error::StandingsError;

/// Stable team identifier, usually the club abbreviation.
///
/// Ordering on ids is the last-resort tiebreak key, so it must stay stable
/// across calls.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        TeamId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        TeamId::new(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conference {
    Afc,
    Nfc,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::Afc, Conference::Nfc];
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::Afc => f.write_str("AFC"),
            Conference::Nfc => f.write_str("NFC"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    East,
    North,
    South,
    West,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::East, Region::North, Region::South, Region::West];
}

/// One of the eight divisions, four per conference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Division {
    pub conference: Conference,
    pub region: Region,
}

impl Division {
    pub fn new(conference: Conference, region: Region) -> Self {
        Division { conference, region }
    }

    /// The four divisions of a conference, in a fixed order.
    pub fn of(conference: Conference) -> [Division; 4] {
        Region::ALL.map(|region| Division::new(conference, region))
    }

    pub fn all() -> impl Iterator<Item = Division> {
        Conference::ALL.into_iter().flat_map(Division::of)
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.conference, self.region)
    }
}

/// A club. Immutable; the name is display metadata the engine never reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub division: Division,
}

impl Team {
    pub fn new(id: &str, name: &str, conference: Conference, region: Region) -> Self {
        Team {
            id: TeamId::new(id),
            name: name.to_string(),
            division: Division::new(conference, region),
        }
    }

    pub fn conference(&self) -> Conference {
        self.division.conference
    }
}

/// Read-only team registry shared between computations.
///
/// Cloning is cheap; the table lives behind an `Arc`. Teams are kept sorted
/// by id so registration order never leaks into results.
#[derive(Clone, Debug)]
pub struct League {
    teams: Arc<[Team]>,
    index: Arc<HashMap<TeamId, usize>>,
}

impl League {
    /// Build a registry, checking ids are unique, every division has at
    /// least one team and each conference can fill its playoff seeds.
    pub fn new(teams: Vec<Team>) -> Result<Self, StandingsError> {
        let league = Self::build(teams);
        if league.index.len() != league.teams.len() {
            let duplicate = league
                .teams
                .windows(2)
                .find(|pair| pair[0].id == pair[1].id)
                .map(|pair| pair[0].id.clone());
            if let Some(id) = duplicate {
                return Err(StandingsError::DuplicateTeam(id));
            }
        }
        for division in Division::all() {
            if league.division_teams(division).next().is_none() {
                return Err(StandingsError::EmptyDivision(division));
            }
        }
        for conference in Conference::ALL {
            let count = league.conference_teams(conference).count();
            if count < PLAYOFF_SEEDS {
                return Err(StandingsError::ConferenceTooSmall {
                    conference,
                    teams: count,
                    seeds: PLAYOFF_SEEDS,
                });
            }
        }
        Ok(league)
    }

    fn build(mut teams: Vec<Team>) -> Self {
        teams.sort_by(|a, b| a.id.cmp(&b.id));
        let index = teams
            .iter()
            .enumerate()
            .map(|(i, team)| (team.id.clone(), i))
            .collect();
        League {
            teams: teams.into(),
            index: Arc::new(index),
        }
    }

    /// The 32-club registry.
    pub fn nfl() -> Self {
        use Conference::{Afc, Nfc};
        use Region::{East, North, South, West};

        let table: [(&str, &str, Conference, Region); 32] = [
            ("BUF", "Buffalo Bills", Afc, East),
            ("MIA", "Miami Dolphins", Afc, East),
            ("NE", "New England Patriots", Afc, East),
            ("NYJ", "New York Jets", Afc, East),
            ("BAL", "Baltimore Ravens", Afc, North),
            ("CIN", "Cincinnati Bengals", Afc, North),
            ("CLE", "Cleveland Browns", Afc, North),
            ("PIT", "Pittsburgh Steelers", Afc, North),
            ("HOU", "Houston Texans", Afc, South),
            ("IND", "Indianapolis Colts", Afc, South),
            ("JAX", "Jacksonville Jaguars", Afc, South),
            ("TEN", "Tennessee Titans", Afc, South),
            ("DEN", "Denver Broncos", Afc, West),
            ("KC", "Kansas City Chiefs", Afc, West),
            ("LAC", "Los Angeles Chargers", Afc, West),
            ("LV", "Las Vegas Raiders", Afc, West),
            ("DAL", "Dallas Cowboys", Nfc, East),
            ("NYG", "New York Giants", Nfc, East),
            ("PHI", "Philadelphia Eagles", Nfc, East),
            ("WAS", "Washington Commanders", Nfc, East),
            ("CHI", "Chicago Bears", Nfc, North),
            ("DET", "Detroit Lions", Nfc, North),
            ("GB", "Green Bay Packers", Nfc, North),
            ("MIN", "Minnesota Vikings", Nfc, North),
            ("ATL", "Atlanta Falcons", Nfc, South),
            ("CAR", "Carolina Panthers", Nfc, South),
            ("NO", "New Orleans Saints", Nfc, South),
            ("TB", "Tampa Bay Buccaneers", Nfc, South),
            ("ARI", "Arizona Cardinals", Nfc, West),
            ("LAR", "Los Angeles Rams", Nfc, West),
            ("SEA", "Seattle Seahawks", Nfc, West),
            ("SF", "San Francisco 49ers", Nfc, West),
        ];

        Self::build(
            table
                .iter()
                .map(|&(id, name, conference, region)| Team::new(id, name, conference, region))
                .collect(),
        )
    }

    /// All teams, sorted by id.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn get(&self, id: &TeamId) -> Option<&Team> {
        self.index.get(id).map(|&i| &self.teams[i])
    }

    pub fn contains(&self, id: &TeamId) -> bool {
        self.index.contains_key(id)
    }

    pub fn conference_of(&self, id: &TeamId) -> Option<Conference> {
        self.get(id).map(Team::conference)
    }

    pub fn division_of(&self, id: &TeamId) -> Option<Division> {
        self.get(id).map(|team| team.division)
    }

    pub fn conference_teams(&self, conference: Conference) -> impl Iterator<Item = &Team> {
        self.teams
            .iter()
            .filter(move |team| team.conference() == conference)
    }

    pub fn division_teams(&self, division: Division) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(move |team| team.division == division)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfl_registry_shape() {
        let league = League::nfl();
        assert_eq!(league.len(), 32);
        for division in Division::all() {
            assert_eq!(league.division_teams(division).count(), 4, "{division}");
        }
        for conference in Conference::ALL {
            assert_eq!(league.conference_teams(conference).count(), 16);
        }
        assert!(League::new(league.teams().to_vec()).is_ok());
    }

    #[test]
    fn test_teams_sorted_by_id() {
        let league = League::nfl();
        let ids: Vec<&TeamId> = league.teams().iter().map(|t| &t.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_lookup() {
        let league = League::nfl();
        let kc = league.get(&TeamId::from("KC")).unwrap();
        assert_eq!(kc.conference(), Conference::Afc);
        assert_eq!(kc.division, Division::new(Conference::Afc, Region::West));
        assert_eq!(league.division_of(&"GB".into()), Some(Division::new(Conference::Nfc, Region::North)));
        assert!(league.get(&TeamId::from("XYZ")).is_none());
    }

    #[test]
    fn test_duplicate_team_rejected() {
        let mut teams = League::nfl().teams().to_vec();
        teams.push(Team::new("KC", "Copy", Conference::Afc, Region::West));
        assert!(matches!(
            League::new(teams),
            Err(StandingsError::DuplicateTeam(id)) if id.as_str() == "KC"
        ));
    }

    #[test]
    fn test_empty_division_rejected() {
        let teams: Vec<Team> = League::nfl()
            .teams()
            .iter()
            .filter(|t| t.division != Division::new(Conference::Nfc, Region::South))
            .cloned()
            .collect();
        assert!(matches!(League::new(teams), Err(StandingsError::EmptyDivision(_))));
    }

    #[test]
    fn test_small_conference_rejected() {
        let mut teams = Vec::new();
        for division in Division::all() {
            let count = if division.conference == Conference::Afc { 1 } else { 4 };
            for i in 0..count {
                let id = format!("{}{:?}{}", division.conference, division.region, i);
                teams.push(Team::new(&id, &id, division.conference, division.region));
            }
        }
        assert!(matches!(
            League::new(teams),
            Err(StandingsError::ConferenceTooSmall { teams: 4, .. })
        ));
    }
}
