//! Clinch and elimination projection, plus magic numbers.
//!
//! With few undecided games left every home-win/away-win/tie assignment is
//! played out and re-seeded. Otherwise win-percentage bounds are used: each team can
//! finish anywhere between losing and winning all of its remaining games.
//! The bounds never report a clinch or an elimination that could still be
//! undone, but may miss some.

use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

use crate::config::EngineConfig;
use crate::constants::{METRIC_EPSILON, WILDCARD_SEEDS};
use crate::error::StandingsError;
use crate::game::{Game, GameId};
use crate::overrides::{Selection, SelectionMap};
use crate::record::{SeasonRecords, TeamRecord};
use crate::seeding::seed_league;
use crate::standings::{Clinch, Standing, Standings};
use crate::team::{Conference, Division, League, TeamId};

/// Clinch and elimination status of one team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outlook {
    pub clinched: Option<Clinch>,
    pub is_eliminated: bool,
}

/// Project every team in the league.
pub fn project(
    league: &League,
    games: &[Game],
    selections: &SelectionMap,
    config: &EngineConfig,
    season: &SeasonRecords,
) -> Result<HashMap<TeamId, Outlook>, StandingsError> {
    let undecided: Vec<&GameId> = games
        .iter()
        .filter(|game| selections.is_undecided(game))
        .map(|game| &game.id)
        .collect();

    if undecided.len() <= config.projection.exhaustive_limit {
        debug!(undecided = undecided.len(), "projecting every remaining outcome");
        exhaustive(league, games, selections, config, &undecided)
    } else {
        debug!(undecided = undecided.len(), "projecting from record bounds");
        let remaining = remaining_games(games, selections);
        Ok(bounded(league, season, &remaining))
    }
}

/// Outcomes tried for every undecided game.
const OUTCOMES: [Selection; 3] = [Selection::Home, Selection::Away, Selection::Tie];

#[derive(Clone, Default)]
struct Tally {
    scenarios: usize,
    seeded: usize,
    division: usize,
    bye: usize,
}

impl Tally {
    fn merge(&mut self, other: &Tally) {
        self.scenarios += other.scenarios;
        self.seeded += other.seeded;
        self.division += other.division;
        self.bye += other.bye;
    }
}

/// Assignment number `index` in base 3, one digit per undecided game.
fn scenario_selections(
    selections: &SelectionMap,
    undecided: &[&GameId],
    mut index: u64,
) -> SelectionMap {
    let mut scenario = selections.clone();
    for &game in undecided {
        let outcome = OUTCOMES[(index % OUTCOMES.len() as u64) as usize];
        index /= OUTCOMES.len() as u64;
        scenario.select(game.clone(), outcome);
    }
    scenario
}

fn exhaustive(
    league: &League,
    games: &[Game],
    selections: &SelectionMap,
    config: &EngineConfig,
    undecided: &[&GameId],
) -> Result<HashMap<TeamId, Outlook>, StandingsError> {
    let scenarios = (OUTCOMES.len() as u64).pow(undecided.len() as u32);

    let tallies = (0..scenarios)
        .into_par_iter()
        .try_fold(HashMap::new, |mut tallies: HashMap<TeamId, Tally>, index| {
            let scenario = scenario_selections(selections, undecided, index);
            let season =
                SeasonRecords::aggregate(league, games, &scenario, &config.placeholder_scores)?;
            for seeding in seed_league(league, &season, &config.tiebreak) {
                for team in &seeding.order {
                    let seed = seeding.seed_of(team);
                    let tally = tallies.entry(team.clone()).or_default();
                    tally.scenarios += 1;
                    if seed.is_some() {
                        tally.seeded += 1;
                    }
                    if seeding.is_division_winner(team) {
                        tally.division += 1;
                    }
                    if seed == Some(1) {
                        tally.bye += 1;
                    }
                }
            }
            Ok::<_, StandingsError>(tallies)
        })
        .try_reduce(HashMap::new, |mut acc, tallies| {
            for (team, tally) in tallies {
                acc.entry(team).or_default().merge(&tally);
            }
            Ok(acc)
        })?;

    Ok(tallies
        .into_iter()
        .map(|(team, tally)| {
            let clinched = if tally.bye == tally.scenarios {
                Some(Clinch::Bye)
            } else if tally.division == tally.scenarios {
                Some(Clinch::Division)
            } else if tally.seeded == tally.scenarios {
                Some(Clinch::Playoff)
            } else {
                None
            };
            let outlook = Outlook {
                clinched,
                is_eliminated: tally.seeded == 0,
            };
            (team, outlook)
        })
        .collect())
}

fn bounded(
    league: &League,
    season: &SeasonRecords,
    remaining: &HashMap<TeamId, u32>,
) -> HashMap<TeamId, Outlook> {
    let mut outlooks = HashMap::new();
    for conference in Conference::ALL {
        let field: Vec<Contender<'_>> = league
            .conference_teams(conference)
            .map(|team| Contender {
                id: &team.id,
                division: team.division,
                record: season.record(&team.id),
                remaining: remaining.get(&team.id).copied().unwrap_or(0),
            })
            .collect();

        for team in &field {
            let others: Vec<Contender<'_>> =
                field.iter().filter(|c| c.id != team.id).copied().collect();
            let floor = team.min_pct();
            let clinched = [Clinch::Bye, Clinch::Division, Clinch::Playoff]
                .into_iter()
                .find(|&target| secures(target, team.division, floor, &others));
            outlooks.insert(
                team.id.clone(),
                Outlook {
                    clinched,
                    is_eliminated: eliminated(team, &others),
                },
            );
        }
    }
    outlooks
}

/// Undecided games (no final result, no selection) left for each team.
pub fn remaining_games(games: &[Game], selections: &SelectionMap) -> HashMap<TeamId, u32> {
    let mut remaining = HashMap::new();
    for game in games.iter().filter(|game| selections.is_undecided(game)) {
        *remaining.entry(game.home.clone()).or_insert(0) += 1;
        *remaining.entry(game.away.clone()).or_insert(0) += 1;
    }
    remaining
}

/// A team's current record and how many games it has left.
#[derive(Clone, Copy, Debug)]
struct Contender<'a> {
    id: &'a TeamId,
    division: Division,
    record: &'a TeamRecord,
    remaining: u32,
}

impl<'a> Contender<'a> {
    fn of(standing: &'a Standing, remaining: &HashMap<TeamId, u32>) -> Self {
        Contender {
            id: standing.id(),
            division: standing.team.division,
            record: &standing.record,
            remaining: remaining.get(standing.id()).copied().unwrap_or(0),
        }
    }

    /// Final win percentage after winning `extra` of the remaining games and
    /// losing the rest.
    fn pct_with(&self, extra: u32) -> f64 {
        let overall = self.record.overall;
        let games = overall.games() + self.remaining;
        if games == 0 {
            return 0.0;
        }
        f64::from(2 * (overall.wins + extra) + overall.ties) / f64::from(2 * games)
    }

    fn min_pct(&self) -> f64 {
        self.pct_with(0)
    }

    fn max_pct(&self) -> f64 {
        self.pct_with(self.remaining)
    }
}

/// True when finishing at `floor` or better guarantees `target` whatever
/// happens to `others` (the rest of the conference).
fn secures(target: Clinch, division: Division, floor: f64, others: &[Contender<'_>]) -> bool {
    let below = |c: &Contender<'_>| c.max_pct() < floor - METRIC_EPSILON;
    match target {
        Clinch::Bye => others.iter().all(below),
        Clinch::Division => others
            .iter()
            .filter(|c| c.division == division)
            .all(below),
        Clinch::Playoff => {
            secures(Clinch::Division, division, floor, others)
                || non_winners_in(others, |c| !below(c)) < WILDCARD_SEEDS
        }
    }
}

/// True when some rival is sure to finish above the team's ceiling and at
/// least three clubs that cannot all win their divisions are too.
fn eliminated(team: &Contender<'_>, others: &[Contender<'_>]) -> bool {
    let ceiling = team.max_pct();
    let above = |c: &Contender<'_>| c.min_pct() > ceiling + METRIC_EPSILON;
    let loses_division = others
        .iter()
        .any(|c| c.division == team.division && above(c));
    loses_division && non_winners_in(others, above) >= WILDCARD_SEEDS
}

/// Lower bound on how many teams matching `pred` miss their division title:
/// at most one per division can win it.
fn non_winners_in(others: &[Contender<'_>], pred: impl Fn(&Contender<'_>) -> bool) -> usize {
    let mut per_division: HashMap<Division, usize> = HashMap::new();
    for contender in others.iter().filter(|c| pred(c)) {
        *per_division.entry(contender.division).or_insert(0) += 1;
    }
    per_division.values().map(|n| n.saturating_sub(1)).sum()
}

/// Additional wins `team` needs to lock up `target` regardless of every
/// other result. `Some(0)` once clinched; `None` when the team is out of the
/// race or cannot get there on its own remaining games.
pub fn magic_number(
    team: &TeamId,
    target: Clinch,
    games: &[Game],
    selections: &SelectionMap,
    standings: &Standings,
) -> Option<u32> {
    let standing = standings.get(team)?;
    if standing.clinched.is_some_and(|c| c.covers(target)) {
        return Some(0);
    }
    if standing.is_eliminated {
        return None;
    }

    let remaining = remaining_games(games, selections);
    let me = Contender::of(standing, &remaining);
    let others: Vec<Contender<'_>> = standings
        .conference(standing.team.conference())
        .iter()
        .filter(|s| s.id() != team)
        .map(|s| Contender::of(s, &remaining))
        .collect();

    (0..=me.remaining).find(|&wins| secures(target, me.division, me.pct_with(wins), &others))
}

/// True when no combination of remaining results puts `team` in the
/// playoffs.
pub fn is_eliminated(team: &TeamId, standings: &Standings) -> bool {
    standings.get(team).is_some_and(|s| s.is_eliminated)
}
