use thiserror::Error;

use crate::config::ConfigError;
use crate::game::GameId;
use crate::team::{Conference, Division, TeamId};

/// Errors raised while validating a league registry or schedule.
///
/// The tiebreaker cascade itself never fails; these only cover inputs the
/// engine cannot interpret.
#[derive(Debug, Error)]
pub enum StandingsError {
    #[error("team `{0}` is registered more than once")]
    DuplicateTeam(TeamId),

    #[error("division {0} has no teams")]
    EmptyDivision(Division),

    #[error("conference {conference} has {teams} teams, fewer than the {seeds} playoff seeds")]
    ConferenceTooSmall {
        conference: Conference,
        teams: usize,
        seeds: usize,
    },

    #[error("game `{game}` references unknown team `{team}`")]
    UnknownTeam { game: GameId, team: TeamId },

    #[error("game `{game}` has `{team}` playing itself")]
    SelfMatch { game: GameId, team: TeamId },

    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid margin distribution: {0}")]
    Distribution(String),
}
