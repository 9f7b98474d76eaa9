//! Synthetic full season in the league's 17-game format.
//!
//! Every club plays its division rivals twice, a full same-conference
//! division, a full other-conference division, and one same-slot club from
//! each of the remaining three divisions. Results follow a fixed strength
//! table plus a short list of upsets, so the final table is known:
//!
//! AFC: KC 15-2, BUF 14-3, BAL 13-4 (beat HOU), HOU 13-4, LAC 13-4,
//!      PIT 11-6, DEN 11-6.
//! NFC: DET 17-0, PHI 15-2, LAR 14-3, TB 12-5, WAS 13-4, MIN 13-4, GB 11-6.

#![allow(dead_code)]

use gridiron_standings::{Conference, Division, Game, League, TeamId};
use tracing_subscriber::EnvFilter;

pub const SEASON_GAMES: usize = 272;
const GAMES_PER_WEEK: usize = 16;

const STRENGTH: [(&str, u16); 32] = [
    ("KC", 30), ("BUF", 28), ("BAL", 27), ("LAC", 23), ("PIT", 22), ("DEN", 21),
    ("HOU", 20), ("CIN", 19), ("MIA", 17), ("IND", 16), ("NYJ", 12), ("JAX", 8),
    ("LV", 7), ("NE", 6), ("CLE", 5), ("TEN", 4),
    ("DET", 32), ("PHI", 31), ("MIN", 29), ("WAS", 26), ("GB", 25), ("LAR", 24),
    ("TB", 18), ("SEA", 15), ("ATL", 14), ("ARI", 13), ("DAL", 11), ("SF", 10),
    ("CHI", 9), ("CAR", 3), ("NO", 2), ("NYG", 1),
];

/// (winner, loser) for the first meeting the weaker club wins anyway.
const UPSETS: [(&str, &str); 10] = [
    ("DEN", "KC"),
    ("LAC", "KC"),
    ("MIA", "BUF"),
    ("NE", "BUF"),
    ("PIT", "BAL"),
    ("HOU", "LAC"),
    ("CIN", "PIT"),
    ("WAS", "PHI"),
    ("GB", "MIN"),
    ("SEA", "LAR"),
];

/// Route engine logs to the test output; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn strength(team: &TeamId) -> u16 {
    STRENGTH
        .iter()
        .find(|(id, _)| *id == team.as_str())
        .map(|&(_, s)| s)
        .unwrap_or_else(|| panic!("no strength for {team}"))
}

fn slots(league: &League, division: Division) -> Vec<TeamId> {
    league.division_teams(division).map(|t| t.id.clone()).collect()
}

/// Home/away pairs for the whole season, in schedule order.
pub fn pairings(league: &League) -> Vec<(TeamId, TeamId)> {
    let mut pairs = Vec::with_capacity(SEASON_GAMES);
    let afc = Division::of(Conference::Afc).map(|d| slots(league, d));
    let nfc = Division::of(Conference::Nfc).map(|d| slots(league, d));

    for divisions in [&afc, &nfc] {
        for teams in divisions.iter() {
            for i in 0..4 {
                for j in i + 1..4 {
                    pairs.push((teams[i].clone(), teams[j].clone()));
                    pairs.push((teams[j].clone(), teams[i].clone()));
                }
            }
        }
    }

    let full = |pairs: &mut Vec<(TeamId, TeamId)>, a: &[TeamId], b: &[TeamId]| {
        for i in 0..4 {
            for j in 0..4 {
                if (i + j) % 2 == 0 {
                    pairs.push((a[i].clone(), b[j].clone()));
                } else {
                    pairs.push((b[j].clone(), a[i].clone()));
                }
            }
        }
    };
    for divisions in [&afc, &nfc] {
        for (a, b) in [(0, 1), (2, 3)] {
            full(&mut pairs, &divisions[a], &divisions[b]);
        }
    }
    for k in 0..4 {
        full(&mut pairs, &afc[k], &nfc[k]);
    }

    for divisions in [&afc, &nfc] {
        for (a, b) in [(0, 2), (0, 3), (1, 2), (1, 3)] {
            for j in 0..4 {
                if j % 2 == 0 {
                    pairs.push((divisions[a][j].clone(), divisions[b][j].clone()));
                } else {
                    pairs.push((divisions[b][j].clone(), divisions[a][j].clone()));
                }
            }
        }
    }
    for k in 0..4 {
        for j in 0..4 {
            let (a, b) = (&afc[k][j], &nfc[(k + 1) % 4][j]);
            if (k + j) % 2 == 0 {
                pairs.push((a.clone(), b.clone()));
            } else {
                pairs.push((b.clone(), a.clone()));
            }
        }
    }
    pairs
}

/// The complete season with every game final.
pub fn full_season() -> (League, Vec<Game>) {
    let league = League::nfl();
    let mut upsets: Vec<(&str, &str)> = UPSETS.to_vec();
    let games = pairings(&league)
        .into_iter()
        .enumerate()
        .map(|(n, (home, away))| {
            let (hs, as_) = (strength(&home), strength(&away));
            let (mut winner, mut loser) = if hs > as_ { (&home, &away) } else { (&away, &home) };
            let flipped = (loser.as_str(), winner.as_str());
            if let Some(i) = upsets.iter().position(|u| *u == flipped) {
                upsets.remove(i);
                std::mem::swap(&mut winner, &mut loser);
            }
            let win_score = 20 + hs.abs_diff(as_) % 14;
            let lose_score = 10 + (n % 7) as u16;
            let (home_score, away_score) = if winner == &home {
                (win_score, lose_score)
            } else {
                (lose_score, win_score)
            };
            Game::final_score(
                &format!("g{:03}", n + 1),
                week(n),
                home.as_str(),
                away.as_str(),
                home_score,
                away_score,
            )
        })
        .collect();
    (league, games)
}

/// The season with its last `open` games still to be played.
pub fn open_season(open: usize) -> (League, Vec<Game>) {
    let (league, mut games) = full_season();
    let start = games.len().saturating_sub(open);
    for game in &mut games[start..] {
        *game = Game::scheduled(game.id.as_str(), game.week, game.home.as_str(), game.away.as_str());
    }
    (league, games)
}

fn week(n: usize) -> u8 {
    (n / GAMES_PER_WEEK + 1) as u8
}
