//! Tiebreaker cascade.
//!
//! Orders a group of teams that share the same win percentage. Each step
//! computes one metric for every team still tied; the teams sharing the best
//! value are split off ahead of the rest. Whenever a step splits a group,
//! both halves restart the cascade from head-to-head. When every step leaves
//! the group intact, team id decides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::trace;

use crate::config::TiebreakConfig;
use crate::constants::METRIC_EPSILON;
use crate::record::{SeasonRecords, WinLossTie};
use crate::team::{League, TeamId};

/// What the tied teams are competing for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TieKind {
    /// Division title, or seeding among division winners. Division record
    /// is consulted.
    Division,
    /// Wildcard slot. Division record is skipped.
    Wildcard,
}

/// One step of the cascade, in the order it is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    HeadToHead,
    DivisionRecord,
    CommonGames,
    ConferenceRecord,
    StrengthOfVictory,
    StrengthOfSchedule,
    ConferencePointRank,
    PointDifferential,
}

pub const CASCADE: [Step; 8] = [
    Step::HeadToHead,
    Step::DivisionRecord,
    Step::CommonGames,
    Step::ConferenceRecord,
    Step::StrengthOfVictory,
    Step::StrengthOfSchedule,
    Step::ConferencePointRank,
    Step::PointDifferential,
];

/// Split of a tie group produced by one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    /// Teams sharing the best metric value, ranked ahead of the rest.
    pub separated: Vec<TeamId>,
    pub still_tied: Vec<TeamId>,
}

/// What split a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decider {
    Step(Step),
    /// Every step left the group tied; ordered by team id.
    TeamId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub decider: Decider,
    pub separated: Vec<TeamId>,
    pub still_tied: Vec<TeamId>,
}

/// Final order of a tie group plus the splits that produced it, in the
/// order they were made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub order: Vec<TeamId>,
    pub decisions: Vec<Decision>,
}

impl Resolution {
    /// The decider of the first split, i.e. what put `order[0]`'s group ahead.
    pub fn first_decider(&self) -> Option<Decider> {
        self.decisions.first().map(|d| d.decider)
    }
}

/// Everything the cascade reads: the registry, the aggregated records and
/// the tiebreak thresholds.
#[derive(Clone, Copy)]
pub struct TiebreakContext<'a> {
    pub league: &'a League,
    pub season: &'a SeasonRecords,
    pub config: &'a TiebreakConfig,
}

impl<'a> TiebreakContext<'a> {
    pub fn new(league: &'a League, season: &'a SeasonRecords, config: &'a TiebreakConfig) -> Self {
        TiebreakContext {
            league,
            season,
            config,
        }
    }

    /// Order a tied group, best first.
    pub fn order(&self, group: &[TeamId], kind: TieKind) -> Vec<TeamId> {
        self.resolve(group, kind).order
    }

    /// Order a tied group and report which steps made each split.
    ///
    /// The input order of `group` never affects the result; duplicates are
    /// ignored.
    pub fn resolve(&self, group: &[TeamId], kind: TieKind) -> Resolution {
        let group: BTreeSet<TeamId> = group.iter().cloned().collect();
        let mut decisions = Vec::new();
        let order = self.cascade(group.into_iter().collect(), kind, &mut decisions);
        Resolution { order, decisions }
    }

    fn cascade(&self, group: Vec<TeamId>, kind: TieKind, decisions: &mut Vec<Decision>) -> Vec<TeamId> {
        if group.len() < 2 {
            return group;
        }

        for step in CASCADE {
            let Some(partition) = self.partition(step, &group, kind) else {
                continue;
            };
            trace!(
                ?step,
                separated = ?partition.separated,
                still_tied = ?partition.still_tied,
                "tie group split"
            );
            decisions.push(Decision {
                decider: Decider::Step(step),
                separated: partition.separated.clone(),
                still_tied: partition.still_tied.clone(),
            });
            let mut order = self.cascade(partition.separated, kind, decisions);
            order.extend(self.cascade(partition.still_tied, kind, decisions));
            return order;
        }

        // `group` is sorted by id on entry and every split preserves order.
        trace!(group = ?group, "cascade exhausted, falling back to team id");
        decisions.push(Decision {
            decider: Decider::TeamId,
            separated: group[..1].to_vec(),
            still_tied: group[1..].to_vec(),
        });
        group
    }

    /// Apply one step. `None` when the step does not apply to this group or
    /// leaves every team tied.
    pub fn partition(&self, step: Step, group: &[TeamId], kind: TieKind) -> Option<Partition> {
        let values = self.metric(step, group, kind)?;
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (separated, still_tied): (Vec<(TeamId, f64)>, Vec<(TeamId, f64)>) = group
            .iter()
            .cloned()
            .zip(values)
            .partition(|&(_, value)| (best - value).abs() < METRIC_EPSILON);

        if separated.is_empty() || still_tied.is_empty() {
            return None;
        }
        Some(Partition {
            separated: separated.into_iter().map(|(id, _)| id).collect(),
            still_tied: still_tied.into_iter().map(|(id, _)| id).collect(),
        })
    }

    /// Metric values for every team in `group` (higher is better), or `None`
    /// when the step does not apply.
    fn metric(&self, step: Step, group: &[TeamId], kind: TieKind) -> Option<Vec<f64>> {
        let season = self.season;
        match step {
            Step::HeadToHead => self.head_to_head(group),
            Step::DivisionRecord => match kind {
                TieKind::Division => Some(
                    group
                        .iter()
                        .map(|team| season.record(team).division.win_pct())
                        .collect(),
                ),
                TieKind::Wildcard => None,
            },
            Step::CommonGames => self.common_games(group),
            Step::ConferenceRecord => Some(
                group
                    .iter()
                    .map(|team| season.record(team).conference.win_pct())
                    .collect(),
            ),
            Step::StrengthOfVictory => Some(
                group
                    .iter()
                    .map(|team| self.mean_win_pct(&season.record(team).defeated))
                    .collect(),
            ),
            Step::StrengthOfSchedule => Some(
                group
                    .iter()
                    .map(|team| self.strength_of_schedule(team))
                    .collect(),
            ),
            Step::ConferencePointRank => Some(
                group
                    .iter()
                    .map(|team| -(self.conference_point_rank(team) as f64))
                    .collect(),
            ),
            Step::PointDifferential => Some(
                group
                    .iter()
                    .map(|team| season.record(team).point_differential() as f64)
                    .collect(),
            ),
        }
    }

    /// Win percentage in games among the group, only when every pair has met.
    fn head_to_head(&self, group: &[TeamId]) -> Option<Vec<f64>> {
        let season = self.season;
        let all_met = group.iter().enumerate().all(|(i, a)| {
            group[i + 1..].iter().all(|b| season.have_played(a, b))
        });
        if !all_met {
            return None;
        }

        Some(
            group
                .iter()
                .map(|team| {
                    group
                        .iter()
                        .filter(|other| *other != team)
                        .fold(WinLossTie::ZERO, |acc, other| acc + season.versus(team, other))
                        .win_pct()
                })
                .collect(),
        )
    }

    /// Win percentage against the opponents every group member has played,
    /// when there are enough of them.
    fn common_games(&self, group: &[TeamId]) -> Option<Vec<f64>> {
        let common = self.common_opponents(group);
        if common.len() < self.config.min_common_opponents {
            return None;
        }

        Some(
            group
                .iter()
                .map(|team| {
                    common
                        .iter()
                        .fold(WinLossTie::ZERO, |acc, opponent| {
                            acc + self.season.versus(team, opponent)
                        })
                        .win_pct()
                })
                .collect(),
        )
    }

    /// Opponents faced by every member of `group`.
    pub fn common_opponents(&self, group: &[TeamId]) -> BTreeSet<TeamId> {
        let mut members = group.iter();
        let Some(first) = members.next() else {
            return BTreeSet::new();
        };
        let mut common = self.season.record(first).opponents.clone();
        for team in members {
            let opponents = &self.season.record(team).opponents;
            common.retain(|opponent| opponents.contains(opponent));
        }
        common
    }

    /// Mean full-season win percentage over distinct opponents faced.
    pub fn strength_of_schedule(&self, team: &TeamId) -> f64 {
        self.mean_win_pct(&self.season.record(team).opponents)
    }

    /// Mean full-season win percentage over distinct opponents beaten.
    pub fn strength_of_victory(&self, team: &TeamId) -> f64 {
        self.mean_win_pct(&self.season.record(team).defeated)
    }

    fn mean_win_pct(&self, teams: &BTreeSet<TeamId>) -> f64 {
        if teams.is_empty() {
            return 0.0;
        }
        let total: f64 = teams.iter().map(|team| self.season.win_pct(team)).sum();
        total / teams.len() as f64
    }

    /// Rank by points scored plus rank by points allowed within the team's
    /// conference. Lower is better; equal values share the better rank.
    pub fn conference_point_rank(&self, team: &TeamId) -> usize {
        let Some(conference) = self.league.conference_of(team) else {
            return usize::MAX;
        };
        let record = self.season.record(team);
        let mut scored_rank = 1;
        let mut allowed_rank = 1;
        for other in self.league.conference_teams(conference) {
            let other = self.season.record(&other.id);
            if other.points_for > record.points_for {
                scored_rank += 1;
            }
            if other.points_against < record.points_against {
                allowed_rank += 1;
            }
        }
        scored_rank + allowed_rank
    }
}
