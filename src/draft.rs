//! Draft order from standings and playoff results.
//!
//! Teams are grouped into tiers by how deep their season went; inside a
//! tier the worse record picks first. A team still alive in the playoffs is
//! listed in the tier it drops into if it loses its next game, and every
//! pick carries the range of slots its team can still end up in.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::bracket::{Bracket, Round, TeamStatus};
use crate::constants::{PLAYOFF_SEEDS, WILDCARD_GAMES};
use crate::standings::{Standing, Standings};
use crate::team::{Conference, TeamId};

/// Depth of a team's season, earliest picks first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DraftTier {
    NonPlayoff,
    WildCardLoser,
    DivisionalLoser,
    ConferenceLoser,
    SuperBowlLoser,
    Champion,
}

impl DraftTier {
    pub const ALL: [DraftTier; 6] = [
        DraftTier::NonPlayoff,
        DraftTier::WildCardLoser,
        DraftTier::DivisionalLoser,
        DraftTier::ConferenceLoser,
        DraftTier::SuperBowlLoser,
        DraftTier::Champion,
    ];

    pub fn eliminated_in(round: Round) -> DraftTier {
        match round {
            Round::WildCard => DraftTier::WildCardLoser,
            Round::Divisional => DraftTier::DivisionalLoser,
            Round::ConferenceChampionship => DraftTier::ConferenceLoser,
            Round::SuperBowl => DraftTier::SuperBowlLoser,
        }
    }

    /// Number of teams that finish in this tier.
    fn size(self, teams: usize) -> usize {
        let conferences = Conference::ALL.len();
        let playoff = conferences * PLAYOFF_SEEDS;
        match self {
            DraftTier::NonPlayoff => teams.saturating_sub(playoff),
            DraftTier::WildCardLoser => conferences * WILDCARD_GAMES,
            DraftTier::DivisionalLoser => conferences * 2,
            DraftTier::ConferenceLoser => conferences,
            DraftTier::SuperBowlLoser | DraftTier::Champion => 1,
        }
    }
}

/// Slots a team can still land in; equal once settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRange {
    pub first: usize,
    pub last: usize,
}

impl PickRange {
    pub fn is_settled(&self) -> bool {
        self.first == self.last
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPick {
    pub team: TeamId,
    pub tier: DraftTier,
    /// Still playing; `tier` is where a loss in the next game would put it.
    pub pending: bool,
    pub range: PickRange,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrder {
    pub picks: Vec<DraftPick>,
}

impl DraftOrder {
    pub fn get(&self, team: &TeamId) -> Option<&DraftPick> {
        self.picks.iter().find(|p| &p.team == team)
    }

    pub fn is_settled(&self) -> bool {
        self.picks.iter().all(|p| p.range.is_settled())
    }
}

/// Worse record first: win percentage, then strength of schedule, then id.
fn pick_order(a: &Standing, b: &Standing) -> Ordering {
    a.win_pct()
        .total_cmp(&b.win_pct())
        .then_with(|| a.strength_of_schedule.total_cmp(&b.strength_of_schedule))
        .then_with(|| a.id().cmp(b.id()))
}

struct Entry<'a> {
    standing: &'a Standing,
    tier: DraftTier,
    pending: bool,
}

pub fn draft_order(standings: &Standings, bracket: &Bracket) -> DraftOrder {
    let teams = standings.len();
    let mut entries: Vec<Entry<'_>> = standings
        .iter()
        .map(|standing| {
            let (tier, pending) = match bracket.status(standing.id()) {
                TeamStatus::NotQualified => (DraftTier::NonPlayoff, false),
                TeamStatus::Eliminated(round) => (DraftTier::eliminated_in(round), false),
                TeamStatus::Champion => (DraftTier::Champion, false),
                TeamStatus::Alive { next } => (DraftTier::eliminated_in(next), true),
            };
            Entry {
                standing,
                tier,
                pending,
            }
        })
        .collect();
    entries.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| pick_order(a.standing, b.standing)));

    let picks = entries
        .iter()
        .map(|entry| DraftPick {
            team: entry.standing.id().clone(),
            tier: entry.tier,
            pending: entry.pending,
            range: pick_range(entry, &entries, teams),
        })
        .collect();
    DraftOrder { picks }
}

/// Earliest and latest slot for `entry` if it finishes in its listed tier.
///
/// The tier's other slots go to teams already settled there and to teams
/// still alive that can fall into it; the bounds take the best and worst
/// case for how many of the latter sort ahead.
fn pick_range(entry: &Entry<'_>, entries: &[Entry<'_>], teams: usize) -> PickRange {
    let tier = entry.tier;
    let base = 1 + DraftTier::ALL
        .iter()
        .take_while(|&&t| t < tier)
        .map(|t| t.size(teams))
        .sum::<usize>();

    let others = entries
        .iter()
        .filter(|other| other.standing.id() != entry.standing.id());
    let ahead = |other: &Entry<'_>| pick_order(other.standing, entry.standing) == Ordering::Less;

    let settled: Vec<&Entry<'_>> = others
        .clone()
        .filter(|other| !other.pending && other.tier == tier)
        .collect();
    let contenders: Vec<&Entry<'_>> = others
        .filter(|other| other.pending && other.tier <= tier)
        .collect();

    let settled_ahead = settled.iter().filter(|o| ahead(o)).count();
    let contenders_ahead = contenders.iter().filter(|o| ahead(o)).count();
    let contenders_behind = contenders.len() - contenders_ahead;
    let open = tier.size(teams).saturating_sub(settled.len() + 1);

    let first = base + settled_ahead + open.saturating_sub(contenders_behind);
    let last = if entry.pending {
        teams
    } else {
        base + settled_ahead + contenders_ahead.min(open)
    };
    PickRange { first, last }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{build_bracket, PlayoffPicks};
    use crate::config::EngineConfig;
    use crate::game::Game;
    use crate::overrides::SelectionMap;
    use crate::standings::compute_standings;
    use crate::team::League;

    fn id(s: &str) -> TeamId {
        TeamId::from(s)
    }

    /// Regular season where the i-th AFC club (by id) plays the i-th NFC
    /// club fifteen times and wins i of them, so records within each
    /// conference are all distinct.
    fn make_standings() -> Standings {
        let league = League::nfl();
        let mut games = Vec::new();
        let afc = league.conference_teams(Conference::Afc);
        let nfc = league.conference_teams(Conference::Nfc);
        for (wins, (home, away)) in afc.zip(nfc).enumerate() {
            for i in 0..15 {
                let game_id = format!("{}-{}-{i}", home.id, away.id);
                let (h, a) = if i < wins { (24, 10) } else { (10, 24) };
                games.push(Game::final_score(&game_id, i as u8 + 1, home.id.as_str(), away.id.as_str(), h, a));
            }
        }
        compute_standings(&league, &games, &SelectionMap::new(), &EngineConfig::default()).unwrap()
    }

    fn make_decided_picks(standings: &Standings) -> PlayoffPicks {
        // Better seed wins every game; AFC wins the final.
        let mut picks = PlayoffPicks::new();
        for conference in Conference::ALL {
            let seeds: Vec<TeamId> = standings.seeded(conference).map(|s| s.id().clone()).collect();
            for (i, a) in seeds.iter().enumerate() {
                for b in &seeds[i + 1..] {
                    picks.pick(a, b, a);
                }
            }
        }
        let afc = standings.seeded(Conference::Afc).next().unwrap().id().clone();
        let nfc = standings.seeded(Conference::Nfc).next().unwrap().id().clone();
        picks.pick(&afc, &nfc, &afc);
        picks
    }

    #[test]
    fn test_tier_sizes_cover_league() {
        let total: usize = DraftTier::ALL.iter().map(|t| t.size(32)).sum();
        assert_eq!(total, 32);
        assert_eq!(DraftTier::NonPlayoff.size(32), 18);
        assert_eq!(DraftTier::WildCardLoser.size(32), 6);
        assert_eq!(DraftTier::DivisionalLoser.size(32), 4);
    }

    #[test]
    fn test_completed_playoffs_give_fixed_order() {
        let standings = make_standings();
        let picks = make_decided_picks(&standings);
        let bracket = build_bracket(&standings, &[], &picks);
        let order = draft_order(&standings, &bracket);

        assert!(order.is_settled());
        let slots: Vec<usize> = order.picks.iter().map(|p| p.range.first).collect();
        assert_eq!(slots, (1..=32).collect::<Vec<_>>());

        let champion = bracket.champion().unwrap();
        assert_eq!(order.picks[31].team, *champion);
        assert_eq!(order.picks[31].tier, DraftTier::Champion);
        assert_eq!(order.picks[30].tier, DraftTier::SuperBowlLoser);
        assert!(order.picks[..18].iter().all(|p| p.tier == DraftTier::NonPlayoff));
    }

    #[test]
    fn test_non_playoff_worst_record_first() {
        let standings = make_standings();
        let bracket = build_bracket(&standings, &[], &PlayoffPicks::new());
        let order = draft_order(&standings, &bracket);

        let pcts: Vec<f64> = order.picks[..18]
            .iter()
            .map(|p| standings.get(&p.team).unwrap().win_pct())
            .collect();
        assert!(pcts.windows(2).all(|w| w[0] <= w[1]));
        assert!(order.picks[..18].iter().all(|p| p.range.is_settled() && !p.pending));
    }

    #[test]
    fn test_pending_playoff_teams_get_ranges() {
        let standings = make_standings();
        let bracket = build_bracket(&standings, &[], &PlayoffPicks::new());
        let order = draft_order(&standings, &bracket);

        // Twelve wildcard-round teams compete for six loser slots.
        let wildcard: Vec<&DraftPick> = order
            .picks
            .iter()
            .filter(|p| p.tier == DraftTier::WildCardLoser)
            .collect();
        assert_eq!(wildcard.len(), 12);
        for pick in &wildcard {
            assert!(pick.pending);
            assert!(pick.range.first >= 19 && pick.range.first <= 24);
            assert_eq!(pick.range.last, 32);
        }
        // The worst of them picks 19th if it loses.
        assert_eq!(wildcard[0].range.first, 19);
    }

    #[test]
    fn test_super_bowl_teams_share_last_two_picks() {
        let standings = make_standings();
        let mut picks = make_decided_picks(&standings);
        let afc = standings.seeded(Conference::Afc).next().unwrap().id().clone();
        let nfc = standings.seeded(Conference::Nfc).next().unwrap().id().clone();
        picks.remove(&afc, &nfc);
        let bracket = build_bracket(&standings, &[], &picks);
        let order = draft_order(&standings, &bracket);

        for team in [&afc, &nfc] {
            let pick = order.get(team).unwrap();
            assert!(pick.pending);
            assert_eq!(pick.range, PickRange { first: 31, last: 32 });
        }
        assert!(order.picks[..30].iter().all(|p| p.range.is_settled()));
        assert_eq!(order.get(&id("XYZ")), None);
    }
}
