//! Playoff bracket derived from seeds.
//!
//! Each round is built only from the winners computed for the round before
//! it, never from the teams a schedule lists for a playoff game. A matchup's
//! winner comes from a final postseason game between exactly those two
//! teams, or else from a user pick for that pairing.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::constants::{PLAYOFF_SEEDS, WILDCARD_GAMES};
use crate::game::{Game, GameStatus};
use crate::standings::Standings;
use crate::team::{Conference, TeamId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Round {
    WildCard,
    Divisional,
    ConferenceChampionship,
    SuperBowl,
}

impl Round {
    pub const ALL: [Round; 4] = [
        Round::WildCard,
        Round::Divisional,
        Round::ConferenceChampionship,
        Round::SuperBowl,
    ];

    pub fn next(self) -> Option<Round> {
        match self {
            Round::WildCard => Some(Round::Divisional),
            Round::Divisional => Some(Round::ConferenceChampionship),
            Round::ConferenceChampionship => Some(Round::SuperBowl),
            Round::SuperBowl => None,
        }
    }
}

/// User picks for playoff matchups, keyed by the unordered pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayoffPicks {
    picks: HashMap<(TeamId, TeamId), TeamId>,
}

fn pair_key(a: &TeamId, b: &TeamId) -> (TeamId, TeamId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl PlayoffPicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick `winner` for the meeting of `a` and `b`, replacing any earlier
    /// pick for that pairing.
    pub fn pick(&mut self, a: &TeamId, b: &TeamId, winner: &TeamId) {
        self.picks.insert(pair_key(a, b), winner.clone());
    }

    pub fn remove(&mut self, a: &TeamId, b: &TeamId) -> Option<TeamId> {
        self.picks.remove(&pair_key(a, b))
    }

    /// The picked winner, if it is one of the two teams.
    pub fn get(&self, a: &TeamId, b: &TeamId) -> Option<&TeamId> {
        let winner = self.picks.get(&pair_key(a, b))?;
        if winner == a || winner == b {
            Some(winner)
        } else {
            warn!(%a, %b, %winner, "ignoring pick for a team outside the matchup");
            None
        }
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub round: Round,
    /// `None` for the Super Bowl.
    pub conference: Option<Conference>,
    /// Better seed; the AFC champion in the Super Bowl.
    pub home: TeamId,
    pub away: TeamId,
    pub home_seed: u8,
    pub away_seed: u8,
    pub winner: Option<TeamId>,
}

impl Matchup {
    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home == team || &self.away == team
    }

    pub fn loser(&self) -> Option<&TeamId> {
        let winner = self.winner.as_ref()?;
        Some(if winner == &self.home { &self.away } else { &self.home })
    }
}

/// Where a team stands in the postseason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamStatus {
    NotQualified,
    Eliminated(Round),
    Alive { next: Round },
    Champion,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Seeded teams per conference, seed 1 first.
    pub seeds: BTreeMap<Conference, Vec<TeamId>>,
    /// Matchups known so far, in round order.
    pub matchups: Vec<Matchup>,
}

impl Bracket {
    pub fn round(&self, round: Round) -> impl Iterator<Item = &Matchup> {
        self.matchups.iter().filter(move |m| m.round == round)
    }

    pub fn champion(&self) -> Option<&TeamId> {
        self.round(Round::SuperBowl).next()?.winner.as_ref()
    }

    fn seed_of(&self, team: &TeamId) -> Option<u8> {
        self.seeds
            .values()
            .find_map(|seeds| seeds.iter().position(|t| t == team))
            .map(|i| (i + 1) as u8)
    }

    pub fn status(&self, team: &TeamId) -> TeamStatus {
        let Some(seed) = self.seed_of(team) else {
            return TeamStatus::NotQualified;
        };
        let mut next = if seed == 1 {
            Round::Divisional
        } else {
            Round::WildCard
        };
        for matchup in self.matchups.iter().filter(|m| m.involves(team)) {
            match &matchup.winner {
                Some(winner) if winner == team => match matchup.round.next() {
                    Some(round) => next = round,
                    None => return TeamStatus::Champion,
                },
                Some(_) => return TeamStatus::Eliminated(matchup.round),
                None => {}
            }
        }
        TeamStatus::Alive { next }
    }
}

/// Winner of a meeting: a final postseason game between exactly these two
/// teams decides it, otherwise a user pick.
fn decide(home: &TeamId, away: &TeamId, results: &[Game], picks: &PlayoffPicks) -> Option<TeamId> {
    for game in results {
        let same_pair = (&game.home == home && &game.away == away)
            || (&game.home == away && &game.away == home);
        if !same_pair {
            continue;
        }
        if let GameStatus::Final(score) = game.status {
            match score.winner() {
                Some(side) => return Some(game.team(side).clone()),
                None => warn!(game = %game.id, "playoff game ended level; ignoring result"),
            }
        }
    }
    picks.get(home, away).cloned()
}

fn meeting(
    round: Round,
    conference: Option<Conference>,
    (home, home_seed): (&TeamId, u8),
    (away, away_seed): (&TeamId, u8),
    results: &[Game],
    picks: &PlayoffPicks,
) -> Matchup {
    Matchup {
        round,
        conference,
        home: home.clone(),
        away: away.clone(),
        home_seed,
        away_seed,
        winner: decide(home, away, results, picks),
    }
}

/// Winners of a finished set of matchups with their seeds, or `None` while
/// any is pending.
fn winners(matchups: &[Matchup]) -> Option<Vec<(TeamId, u8)>> {
    matchups
        .iter()
        .map(|m| {
            let winner = m.winner.clone()?;
            let seed = if winner == m.home { m.home_seed } else { m.away_seed };
            Some((winner, seed))
        })
        .collect()
}

/// Build the bracket from the seeded teams, real postseason results and
/// user picks.
pub fn build_bracket(standings: &Standings, results: &[Game], picks: &PlayoffPicks) -> Bracket {
    let mut bracket = Bracket::default();
    let mut champions = Vec::new();

    for conference in Conference::ALL {
        let seeds: Vec<TeamId> = standings
            .seeded(conference)
            .map(|s| s.id().clone())
            .collect();
        if seeds.len() < PLAYOFF_SEEDS {
            bracket.seeds.insert(conference, seeds);
            continue;
        }
        let seeded = |seed: usize| (&seeds[seed - 1], seed as u8);

        // 2v7, 3v6, 4v5; seed 1 sits out.
        let wildcard: Vec<Matchup> = (0..WILDCARD_GAMES)
            .map(|i| {
                meeting(
                    Round::WildCard,
                    Some(conference),
                    seeded(2 + i),
                    seeded(PLAYOFF_SEEDS - i),
                    results,
                    picks,
                )
            })
            .collect();
        bracket.matchups.extend(wildcard.iter().cloned());

        let Some(mut alive) = winners(&wildcard) else {
            bracket.seeds.insert(conference, seeds);
            continue;
        };
        alive.push((seeds[0].clone(), 1));
        alive.sort_by_key(|&(_, seed)| seed);

        // Top seed hosts the lowest remaining seed; the middle two meet.
        let divisional = vec![
            meeting(
                Round::Divisional,
                Some(conference),
                (&alive[0].0, alive[0].1),
                (&alive[3].0, alive[3].1),
                results,
                picks,
            ),
            meeting(
                Round::Divisional,
                Some(conference),
                (&alive[1].0, alive[1].1),
                (&alive[2].0, alive[2].1),
                results,
                picks,
            ),
        ];
        bracket.matchups.extend(divisional.iter().cloned());

        if let Some(mut finalists) = winners(&divisional) {
            finalists.sort_by_key(|&(_, seed)| seed);
            let title = meeting(
                Round::ConferenceChampionship,
                Some(conference),
                (&finalists[0].0, finalists[0].1),
                (&finalists[1].0, finalists[1].1),
                results,
                picks,
            );
            if let Some(champion) = winners(std::slice::from_ref(&title)) {
                champions.extend(champion);
            }
            bracket.matchups.push(title);
        }
        bracket.seeds.insert(conference, seeds);
    }

    if let [afc, nfc] = champions.as_slice() {
        let title = meeting(
            Round::SuperBowl,
            None,
            (&afc.0, afc.1),
            (&nfc.0, nfc.1),
            results,
            picks,
        );
        bracket.matchups.push(title);
    }
    bracket
}
