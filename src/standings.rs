//! Conference standings: the ordered table every downstream consumer reads.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::StandingsError;
use crate::game::Game;
use crate::overrides::SelectionMap;
use crate::projection::{self, Outlook};
use crate::record::{SeasonRecords, TeamRecord};
use crate::seeding::seed_conference;
use crate::team::{Conference, League, Team, TeamId};
use crate::tiebreak::TiebreakContext;

/// Playoff position a team can no longer lose.
///
/// Variants are ordered by strength: a bye implies a division title, which
/// implies a playoff berth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Clinch {
    Playoff,
    Division,
    Bye,
}

impl Clinch {
    /// True when holding `self` also secures `target`.
    pub fn covers(self, target: Clinch) -> bool {
        self >= target
    }
}

/// One row of a conference table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub team: Team,
    pub record: TeamRecord,
    /// Position in the conference, 1 = best.
    pub rank: usize,
    pub seed: Option<u8>,
    pub strength_of_schedule: f64,
    pub clinched: Option<Clinch>,
    pub is_eliminated: bool,
}

impl Standing {
    pub fn id(&self) -> &TeamId {
        &self.team.id
    }

    pub fn win_pct(&self) -> f64 {
        self.record.win_pct()
    }

    pub fn is_seeded(&self) -> bool {
        self.seed.is_some()
    }
}

/// Both conference tables, best first, with constant-time lookup by team.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Standings {
    conferences: BTreeMap<Conference, Vec<Standing>>,
    #[serde(skip)]
    index: HashMap<TeamId, (Conference, usize)>,
}

impl Standings {
    pub fn new(conferences: BTreeMap<Conference, Vec<Standing>>) -> Self {
        let index = conferences
            .iter()
            .flat_map(|(&conference, rows)| {
                rows.iter()
                    .enumerate()
                    .map(move |(i, row)| (row.team.id.clone(), (conference, i)))
            })
            .collect();
        Standings { conferences, index }
    }

    /// Ordered table of a conference; empty if the league has none.
    pub fn conference(&self, conference: Conference) -> &[Standing] {
        self.conferences
            .get(&conference)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Seeded teams of a conference, seed 1 first.
    pub fn seeded(&self, conference: Conference) -> impl Iterator<Item = &Standing> {
        self.conference(conference).iter().filter(|s| s.is_seeded())
    }

    pub fn get(&self, team: &TeamId) -> Option<&Standing> {
        let &(conference, i) = self.index.get(team)?;
        self.conferences.get(&conference)?.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.conferences.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Compute both conference tables from a schedule and hypothetical
/// selections, including clinch and elimination flags.
pub fn compute_standings(
    league: &League,
    games: &[Game],
    selections: &SelectionMap,
    config: &EngineConfig,
) -> Result<Standings, StandingsError> {
    config.validate()?;
    let season = SeasonRecords::aggregate(league, games, selections, &config.placeholder_scores)?;
    let outlook = projection::project(league, games, selections, config, &season)?;
    let ctx = TiebreakContext::new(league, &season, &config.tiebreak);

    let mut conferences = BTreeMap::new();
    for conference in Conference::ALL {
        let seeding = seed_conference(league, &season, conference, &config.tiebreak);
        let rows = seeding
            .order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let team = league.get(id)?;
                let Outlook {
                    clinched,
                    is_eliminated,
                } = outlook.get(id).copied().unwrap_or_default();
                Some(Standing {
                    team: team.clone(),
                    record: season.record(id).clone(),
                    rank: i + 1,
                    seed: seeding.seed_of(id),
                    strength_of_schedule: ctx.strength_of_schedule(id),
                    clinched,
                    is_eliminated,
                })
            })
            .collect();
        conferences.insert(conference, rows);
    }

    let standings = Standings::new(conferences);
    debug!(
        teams = standings.len(),
        clinched = standings.iter().filter(|s| s.clinched.is_some()).count(),
        eliminated = standings.iter().filter(|s| s.is_eliminated).count(),
        "computed standings"
    );
    Ok(standings)
}
