use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::PlaceholderScores;
use crate::game::{Game, GameId, GameStatus, Score};

/// Hypothetical outcome chosen for an undecided game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    Home,
    Away,
    Tie,
}

impl Selection {
    /// Placeholder score credited for this selection.
    pub fn placeholder_score(self, scores: &PlaceholderScores) -> Score {
        match self {
            Selection::Home => Score::new(scores.winner, scores.loser),
            Selection::Away => Score::new(scores.loser, scores.winner),
            Selection::Tie => Score::new(scores.tie, scores.tie),
        }
    }
}

/// Hypothetical outcomes keyed by game id.
///
/// Selections are only consulted for games that are not final: a final
/// game's real score always wins, so a stale selection left behind after a
/// game finishes is harmless.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionMap {
    selections: HashMap<GameId, Selection>,
}

impl SelectionMap {
    pub fn new() -> Self {
        SelectionMap {
            selections: HashMap::new(),
        }
    }

    /// Add or replace the selection for a game.
    pub fn select(&mut self, game: GameId, selection: Selection) {
        self.selections.insert(game, selection);
    }

    /// Clear the selection for a game.
    pub fn remove(&mut self, game: &GameId) -> Option<Selection> {
        self.selections.remove(game)
    }

    pub fn get(&self, game: &GameId) -> Option<Selection> {
        self.selections.get(game).copied()
    }

    pub fn contains(&self, game: &GameId) -> bool {
        self.selections.contains_key(game)
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// The score that counts toward the standings for `game`: the real score
    /// when final, the placeholder for a selected outcome otherwise, or
    /// `None` when the game contributes nothing.
    pub fn effective_score(&self, game: &Game, scores: &PlaceholderScores) -> Option<Score> {
        match game.status {
            GameStatus::Final(score) => Some(score),
            GameStatus::Scheduled | GameStatus::InProgress => {
                self.get(&game.id).map(|selection| selection.placeholder_score(scores))
            }
        }
    }

    /// True when the game has neither a final score nor a selection.
    pub fn is_undecided(&self, game: &Game) -> bool {
        !game.is_final() && !self.contains(&game.id)
    }
}

impl FromIterator<(GameId, Selection)> for SelectionMap {
    fn from_iter<I: IntoIterator<Item = (GameId, Selection)>>(iter: I) -> Self {
        SelectionMap {
            selections: iter.into_iter().collect(),
        }
    }
}
