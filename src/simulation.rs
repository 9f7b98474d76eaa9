use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::config::{EngineConfig, SimulationConfig};
use crate::constants::PLAYOFF_SEEDS;
use crate::error::StandingsError;
use crate::game::{Game, GameId};
use crate::overrides::{Selection, SelectionMap};
use crate::record::{SeasonRecords, TeamRecord};
use crate::seeding::seed_league;
use crate::team::{League, TeamId};

/// Average scoring margin per game; zero before a team has played.
fn margin_per_game(record: &TeamRecord) -> f64 {
    match record.games() {
        0 => 0.0,
        games => record.point_differential() as f64 / f64::from(games),
    }
}

/// Probability that the home team wins.
///
/// The expected margin is the difference in per-game point differential
/// plus home-field points; the actual margin is assumed normal around it.
pub fn win_probability(
    home: &TeamRecord,
    away: &TeamRecord,
    config: &SimulationConfig,
) -> Result<f64, StandingsError> {
    let normal = Normal::new(0.0, config.margin_stddev)
        .map_err(|e| StandingsError::Distribution(e.to_string()))?;
    let margin = margin_per_game(home) - margin_per_game(away) + config.home_field_points;
    Ok(normal.cdf(margin))
}

/// Draw an outcome for one game.
pub fn simulate_game<R: Rng>(home_win_prob: f64, rng: &mut R) -> Selection {
    if rng.gen::<f64>() < home_win_prob {
        Selection::Home
    } else {
        Selection::Away
    }
}

/// Estimated playoff chances of one team.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayoffOdds {
    pub team: TeamId,
    pub playoff: f64,
    pub division: f64,
    pub bye: f64,
    /// Probability of each seed, seed 1 first.
    pub seeds: Vec<f64>,
}

/// Odds for every team, keyed by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OddsTable {
    pub simulations: usize,
    odds: BTreeMap<TeamId, PlayoffOdds>,
}

impl OddsTable {
    pub fn get(&self, team: &TeamId) -> Option<&PlayoffOdds> {
        self.odds.get(team)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayoffOdds> {
        self.odds.values()
    }
}

#[derive(Clone, Default)]
struct Counts {
    division: usize,
    seeds: [usize; PLAYOFF_SEEDS],
}

/// Play out every undecided game many times and count how often each team
/// lands each seed.
///
/// Final games and selections are respected as given. With a fixed
/// `simulation.seed` the result is reproducible regardless of thread count.
pub fn simulate_odds(
    league: &League,
    games: &[Game],
    selections: &SelectionMap,
    config: &EngineConfig,
) -> Result<OddsTable, StandingsError> {
    config.validate()?;
    let sim = &config.simulation;
    let current = SeasonRecords::aggregate(league, games, selections, &config.placeholder_scores)?;

    let mut undecided: Vec<(&GameId, f64)> = Vec::new();
    for game in games.iter().filter(|game| selections.is_undecided(game)) {
        let p = win_probability(current.record(&game.home), current.record(&game.away), sim)?;
        undecided.push((&game.id, p));
    }

    let mut rng = match sim.seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let seeds: Vec<u64> = (0..sim.simulations).map(|_| rng.gen::<u64>()).collect();

    debug!(
        simulations = sim.simulations,
        undecided = undecided.len(),
        "simulating remaining season"
    );

    let counts = seeds
        .par_iter()
        .map(|&seed| -> Result<HashMap<TeamId, Counts>, StandingsError> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut scenario = selections.clone();
            for &(game, p) in &undecided {
                scenario.select(game.clone(), simulate_game(p, &mut rng));
            }
            let season =
                SeasonRecords::aggregate(league, games, &scenario, &config.placeholder_scores)?;

            let mut counts: HashMap<TeamId, Counts> = HashMap::new();
            for seeding in seed_league(league, &season, &config.tiebreak) {
                for (i, team) in seeding.seeded().iter().enumerate() {
                    let entry = counts.entry(team.clone()).or_default();
                    entry.seeds[i] += 1;
                    if seeding.is_division_winner(team) {
                        entry.division += 1;
                    }
                }
            }
            Ok(counts)
        })
        .try_reduce(HashMap::new, |mut acc, counts| {
            for (team, c) in counts {
                let entry = acc.entry(team).or_default();
                entry.division += c.division;
                for (total, n) in entry.seeds.iter_mut().zip(c.seeds) {
                    *total += n;
                }
            }
            Ok(acc)
        })?;

    let n = sim.simulations as f64;
    let odds = league
        .teams()
        .iter()
        .map(|team| {
            let c = counts.get(&team.id).cloned().unwrap_or_default();
            let seeds: Vec<f64> = c.seeds.iter().map(|&k| k as f64 / n).collect();
            let odds = PlayoffOdds {
                team: team.id.clone(),
                playoff: c.seeds.iter().sum::<usize>() as f64 / n,
                division: c.division as f64 / n,
                bye: seeds[0],
                seeds,
            };
            (team.id.clone(), odds)
        })
        .collect();

    Ok(OddsTable {
        simulations: sim.simulations,
        odds,
    })
}
