/// Placeholder score for the winner of a game decided only by a selection
pub const PLACEHOLDER_WIN_SCORE: u16 = 24;

/// Placeholder score for the loser of a game decided only by a selection
pub const PLACEHOLDER_LOSS_SCORE: u16 = 17;

/// Placeholder score for both sides of a game selected as a tie
pub const PLACEHOLDER_TIE_SCORE: u16 = 20;

/// Minimum number of opponents common to a whole tie group before the
/// common-games step applies
pub const MIN_COMMON_OPPONENTS: usize = 4;

/// Playoff seeds awarded per conference
pub const PLAYOFF_SEEDS: usize = 7;

/// Seeds reserved for division winners
pub const DIVISION_WINNER_SEEDS: usize = 4;

/// Seeds awarded to wildcards
pub const WILDCARD_SEEDS: usize = PLAYOFF_SEEDS - DIVISION_WINNER_SEEDS;

/// Games per conference in the wildcard round (seed 1 has a bye)
pub const WILDCARD_GAMES: usize = 3;

/// Tolerance used when comparing tiebreaker metrics
pub const METRIC_EPSILON: f64 = 1e-9;

/// Default number of undecided games enumerated exactly by the projector
pub const EXHAUSTIVE_LIMIT: usize = 6;

/// Upper bound accepted for the exhaustive limit (3^12 scenarios)
pub const MAX_EXHAUSTIVE_LIMIT: usize = 12;

/// Default number of Monte Carlo simulations
pub const SIMULATIONS: usize = 2000;

/// Expected margin advantage of the home team, in points
pub const HOME_FIELD_POINTS: f64 = 1.5;

/// Standard deviation of a single game's scoring margin
pub const MARGIN_STDDEV: f64 = 13.5;
