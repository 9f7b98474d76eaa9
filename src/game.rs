use serde::{Deserialize, Serialize};
use std::fmt;

use crate::team::TeamId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        GameId::new(id)
    }
}

/// Final score of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u16,
    pub away: u16,
}

impl Score {
    pub fn new(home: u16, away: u16) -> Self {
        Score { home, away }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

/// Game status. Only a final game carries a score, so a non-final game can
/// never define the actual outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final(Score),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub week: u8,
    pub home: TeamId,
    pub away: TeamId,
    pub status: GameStatus,
}

impl Game {
    pub fn scheduled(id: &str, week: u8, home: &str, away: &str) -> Self {
        Game {
            id: GameId::new(id),
            week,
            home: TeamId::new(home),
            away: TeamId::new(away),
            status: GameStatus::Scheduled,
        }
    }

    pub fn final_score(id: &str, week: u8, home: &str, away: &str, home_score: u16, away_score: u16) -> Self {
        Game {
            status: GameStatus::Final(Score::new(home_score, away_score)),
            ..Game::scheduled(id, week, home, away)
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self.status, GameStatus::Final(_))
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home == team || &self.away == team
    }

    pub fn team(&self, side: Side) -> &TeamId {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// The other participant, if `team` played in this game.
    pub fn opponent(&self, team: &TeamId) -> Option<&TeamId> {
        if &self.home == team {
            Some(&self.away)
        } else if &self.away == team {
            Some(&self.home)
        } else {
            None
        }
    }
}
