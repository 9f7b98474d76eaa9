//! Record aggregation: reduces a schedule plus hypothetical selections into
//! per-team records and a head-to-head index.
//!
//! Records are rebuilt from scratch on every call; nothing carries over
//! between invocations with different selections.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::ops::Add;
use tracing::debug;

use crate::config::PlaceholderScores;
use crate::error::StandingsError;
use crate::game::{Game, Side};
use crate::overrides::SelectionMap;
use crate::team::{League, TeamId};

/// Won-lost-tied tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLossTie {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl WinLossTie {
    pub const ZERO: WinLossTie = WinLossTie {
        wins: 0,
        losses: 0,
        ties: 0,
    };

    pub fn new(wins: u32, losses: u32, ties: u32) -> Self {
        WinLossTie { wins, losses, ties }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Win percentage with ties counted as half a win. Zero games is 0.0.
    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            0.0
        } else {
            f64::from(2 * self.wins + self.ties) / f64::from(2 * games)
        }
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }
}

impl Add for WinLossTie {
    type Output = WinLossTie;

    fn add(self, other: WinLossTie) -> WinLossTie {
        WinLossTie {
            wins: self.wins + other.wins,
            losses: self.losses + other.losses,
            ties: self.ties + other.ties,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Win,
    Loss,
    Tie,
}

/// Season record of one team, derived from the games that count.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub overall: WinLossTie,
    /// Games against division rivals (also counted in `conference`).
    pub division: WinLossTie,
    /// Games against conference opponents, division games included.
    pub conference: WinLossTie,
    pub points_for: u32,
    pub points_against: u32,
    /// Distinct opponents actually played.
    pub opponents: BTreeSet<TeamId>,
    /// Distinct opponents beaten at least once.
    pub defeated: BTreeSet<TeamId>,
}

static EMPTY_RECORD: TeamRecord = TeamRecord {
    overall: WinLossTie::ZERO,
    division: WinLossTie::ZERO,
    conference: WinLossTie::ZERO,
    points_for: 0,
    points_against: 0,
    opponents: BTreeSet::new(),
    defeated: BTreeSet::new(),
};

impl TeamRecord {
    pub fn wins(&self) -> u32 {
        self.overall.wins
    }

    pub fn losses(&self) -> u32 {
        self.overall.losses
    }

    pub fn ties(&self) -> u32 {
        self.overall.ties
    }

    pub fn games(&self) -> u32 {
        self.overall.games()
    }

    pub fn win_pct(&self) -> f64 {
        self.overall.win_pct()
    }

    pub fn point_differential(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }
}

/// Records for every registered team plus a head-to-head index.
#[derive(Clone, Debug, Default)]
pub struct SeasonRecords {
    records: HashMap<TeamId, TeamRecord>,
    /// `(team, opponent)` -> team's record against that opponent.
    head_to_head: HashMap<(TeamId, TeamId), WinLossTie>,
    counted_games: usize,
}

impl SeasonRecords {
    /// Aggregate records for every team in `league`.
    ///
    /// A final game counts with its real score; a non-final game counts only
    /// when it has a selection, using placeholder scores; anything else is
    /// skipped. Every game must reference two distinct registered teams.
    pub fn aggregate(
        league: &League,
        games: &[Game],
        selections: &SelectionMap,
        scores: &PlaceholderScores,
    ) -> Result<Self, StandingsError> {
        let mut season = SeasonRecords {
            records: league
                .teams()
                .iter()
                .map(|team| (team.id.clone(), TeamRecord::default()))
                .collect(),
            head_to_head: HashMap::new(),
            counted_games: 0,
        };

        for game in games {
            validate_game(league, game)?;
            let Some(score) = selections.effective_score(game, scores) else {
                continue;
            };

            let (home_outcome, away_outcome) = match score.winner() {
                Some(Side::Home) => (Outcome::Win, Outcome::Loss),
                Some(Side::Away) => (Outcome::Loss, Outcome::Win),
                None => (Outcome::Tie, Outcome::Tie),
            };

            let same_division = league.division_of(&game.home) == league.division_of(&game.away);
            let same_conference =
                league.conference_of(&game.home) == league.conference_of(&game.away);

            season.credit(&game.home, &game.away, home_outcome, score.home, score.away, same_division, same_conference);
            season.credit(&game.away, &game.home, away_outcome, score.away, score.home, same_division, same_conference);
            season.counted_games += 1;
        }

        debug!(
            scheduled = games.len(),
            counted = season.counted_games,
            selections = selections.len(),
            "aggregated season records"
        );
        Ok(season)
    }

    #[allow(clippy::too_many_arguments)]
    fn credit(
        &mut self,
        team: &TeamId,
        opponent: &TeamId,
        outcome: Outcome,
        points_for: u16,
        points_against: u16,
        same_division: bool,
        same_conference: bool,
    ) {
        let record = self.records.entry(team.clone()).or_default();
        record.overall.record(outcome);
        if same_division {
            record.division.record(outcome);
        }
        if same_conference {
            record.conference.record(outcome);
        }
        record.points_for += u32::from(points_for);
        record.points_against += u32::from(points_against);
        record.opponents.insert(opponent.clone());
        if outcome == Outcome::Win {
            record.defeated.insert(opponent.clone());
        }

        self.head_to_head
            .entry((team.clone(), opponent.clone()))
            .or_default()
            .record(outcome);
    }

    /// Record for `team`; an all-zero record for ids outside the league.
    pub fn record(&self, team: &TeamId) -> &TeamRecord {
        self.records.get(team).unwrap_or(&EMPTY_RECORD)
    }

    pub fn win_pct(&self, team: &TeamId) -> f64 {
        self.record(team).win_pct()
    }

    /// `team`'s record in games against `opponent`.
    pub fn versus(&self, team: &TeamId, opponent: &TeamId) -> WinLossTie {
        self.head_to_head
            .get(&(team.clone(), opponent.clone()))
            .copied()
            .unwrap_or_default()
    }

    pub fn have_played(&self, a: &TeamId, b: &TeamId) -> bool {
        self.versus(a, b).games() > 0
    }

    /// Number of games that contributed to the records.
    pub fn counted_games(&self) -> usize {
        self.counted_games
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TeamId, &TeamRecord)> {
        self.records.iter()
    }
}

fn validate_game(league: &League, game: &Game) -> Result<(), StandingsError> {
    for team in [&game.home, &game.away] {
        if !league.contains(team) {
            return Err(StandingsError::UnknownTeam {
                game: game.id.clone(),
                team: team.clone(),
            });
        }
    }
    if game.home == game.away {
        return Err(StandingsError::SelfMatch {
            game: game.id.clone(),
            team: game.home.clone(),
        });
    }
    Ok(())
}
