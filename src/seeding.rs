//! Seeding: division winners take seeds 1-4, the best three of the rest take
//! seeds 5-7, and everyone else is ordered by win percentage then strength of
//! schedule.

use std::cmp::Ordering;
use tracing::debug;

use crate::config::TiebreakConfig;
use crate::constants::{METRIC_EPSILON, PLAYOFF_SEEDS, WILDCARD_SEEDS};
use crate::record::SeasonRecords;
use crate::team::{Conference, Division, League, TeamId};
use crate::tiebreak::{TieKind, TiebreakContext};

/// Full order of one conference, best first. The first seven hold seeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConferenceSeeding {
    pub conference: Conference,
    pub order: Vec<TeamId>,
    /// Number of division winners at the top of `order`.
    pub division_winners: usize,
}

impl ConferenceSeeding {
    pub fn seed_of(&self, team: &TeamId) -> Option<u8> {
        self.order
            .iter()
            .take(PLAYOFF_SEEDS)
            .position(|t| t == team)
            .map(|i| (i + 1) as u8)
    }

    /// Teams holding seeds, seed 1 first.
    pub fn seeded(&self) -> &[TeamId] {
        &self.order[..PLAYOFF_SEEDS.min(self.order.len())]
    }

    pub fn is_division_winner(&self, team: &TeamId) -> bool {
        self.order[..self.division_winners].contains(team)
    }
}

/// Seed one conference from aggregated records.
pub fn seed_conference(
    league: &League,
    season: &SeasonRecords,
    conference: Conference,
    config: &TiebreakConfig,
) -> ConferenceSeeding {
    let ctx = TiebreakContext::new(league, season, config);

    let leaders: Vec<TeamId> = Division::of(conference)
        .into_iter()
        .filter_map(|division| division_leader(&ctx, division))
        .collect();

    let mut order = Vec::new();
    for group in win_pct_groups(season, leaders.clone()) {
        order.extend(ctx.order(&group, TieKind::Division));
    }
    let division_winners = order.len();

    let pool: Vec<TeamId> = league
        .conference_teams(conference)
        .map(|team| team.id.clone())
        .filter(|id| !leaders.contains(id))
        .collect();

    let mut rest = Vec::new();
    let mut wildcards = Vec::new();
    for group in win_pct_groups(season, pool) {
        let slots = WILDCARD_SEEDS - wildcards.len();
        if slots == 0 {
            rest.extend(group);
            continue;
        }
        let (picked, leftover) = pick_wildcards(&ctx, conference, group, slots);
        wildcards.extend(picked);
        rest.extend(leftover);
    }

    rest.sort_by(|a, b| non_playoff_order(&ctx, a, b));

    order.extend(wildcards);
    order.extend(rest);
    debug!(
        %conference,
        seeds = ?&order[..PLAYOFF_SEEDS.min(order.len())],
        "conference seeded"
    );

    ConferenceSeeding {
        conference,
        order,
        division_winners,
    }
}

/// Seed both conferences.
pub fn seed_league(
    league: &League,
    season: &SeasonRecords,
    config: &TiebreakConfig,
) -> Vec<ConferenceSeeding> {
    Conference::ALL
        .into_iter()
        .map(|conference| seed_conference(league, season, conference, config))
        .collect()
}

/// Best team of a division: the unique top win percentage, or the winner of
/// the division tiebreak among those sharing it.
pub fn division_leader(ctx: &TiebreakContext<'_>, division: Division) -> Option<TeamId> {
    let members: Vec<TeamId> = ctx
        .league
        .division_teams(division)
        .map(|team| team.id.clone())
        .collect();
    let top = win_pct_groups(ctx.season, members).into_iter().next()?;
    ctx.order(&top, TieKind::Division).into_iter().next()
}

/// Take up to `slots` wildcards from a group tied on win percentage. Returns
/// `(picked, leftover)`.
fn pick_wildcards(
    ctx: &TiebreakContext<'_>,
    conference: Conference,
    group: Vec<TeamId>,
    slots: usize,
) -> (Vec<TeamId>, Vec<TeamId>) {
    debug_assert!(
        group.windows(2).all(|pair| {
            (ctx.season.win_pct(&pair[0]) - ctx.season.win_pct(&pair[1])).abs() < METRIC_EPSILON
        }),
        "wildcard group must share one win percentage"
    );
    if !ctx.config.wildcard_division_prefilter {
        let mut ordered = ctx.order(&group, TieKind::Wildcard);
        let leftover = ordered.split_off(slots.min(ordered.len()));
        return (ordered, leftover);
    }

    // One slot at a time: each division is first reduced to its best club,
    // then the survivors go through the wildcard cascade.
    let mut remaining = group;
    let mut picked = Vec::new();
    while picked.len() < slots && !remaining.is_empty() {
        let mut candidates = Vec::new();
        for division in Division::of(conference) {
            let members: Vec<TeamId> = remaining
                .iter()
                .filter(|team| ctx.league.division_of(team) == Some(division))
                .cloned()
                .collect();
            if let Some(best) = ctx.order(&members, TieKind::Division).into_iter().next() {
                candidates.push(best);
            }
        }
        let Some(winner) = ctx.order(&candidates, TieKind::Wildcard).into_iter().next() else {
            break;
        };
        remaining.retain(|team| team != &winner);
        picked.push(winner);
    }
    (picked, remaining)
}

/// Non-playoff order: win percentage, then strength of schedule, then id.
fn non_playoff_order(ctx: &TiebreakContext<'_>, a: &TeamId, b: &TeamId) -> Ordering {
    let season = ctx.season;
    season
        .win_pct(b)
        .total_cmp(&season.win_pct(a))
        .then_with(|| {
            ctx.strength_of_schedule(b)
                .total_cmp(&ctx.strength_of_schedule(a))
        })
        .then_with(|| a.cmp(b))
}

/// Split teams into groups sharing a win percentage, best group first. Each
/// group is sorted by id.
pub fn win_pct_groups(season: &SeasonRecords, mut teams: Vec<TeamId>) -> Vec<Vec<TeamId>> {
    teams.sort_by(|a, b| {
        season
            .win_pct(b)
            .total_cmp(&season.win_pct(a))
            .then_with(|| a.cmp(b))
    });

    let mut groups: Vec<Vec<TeamId>> = Vec::new();
    for team in teams {
        let pct = season.win_pct(&team);
        match groups.last_mut() {
            Some(group) if (season.win_pct(&group[0]) - pct).abs() < METRIC_EPSILON => {
                group.push(team)
            }
            _ => groups.push(vec![team]),
        }
    }
    groups
}
