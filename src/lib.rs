//! Gridiron Standings - playoff standings and tiebreaker engine.
//!
//! Turns a season schedule plus hypothetical outcomes into ordered
//! conference tables with playoff seeds, applying the league's tiebreaking
//! procedure. Clinch/elimination projection, playoff odds, the bracket and
//! the draft order are built on top of those tables.

pub mod bracket;
pub mod config;
pub mod constants;
pub mod draft;
pub mod error;
pub mod game;
pub mod overrides;
pub mod projection;
pub mod record;
pub mod season;
pub mod seeding;
pub mod simulation;
pub mod standings;
pub mod team;
pub mod tiebreak;

pub use bracket::{build_bracket, Bracket, Matchup, PlayoffPicks, Round, TeamStatus};
pub use config::{ConfigError, EngineConfig};
pub use draft::{draft_order, DraftOrder, DraftPick, DraftTier, PickRange};
pub use error::StandingsError;
pub use game::{Game, GameId, GameStatus, Score};
pub use overrides::{Selection, SelectionMap};
pub use projection::{is_eliminated, magic_number};
pub use record::{SeasonRecords, TeamRecord, WinLossTie};
pub use season::SeasonState;
pub use seeding::{seed_conference, ConferenceSeeding};
pub use simulation::{simulate_odds, win_probability, OddsTable, PlayoffOdds};
pub use standings::{compute_standings, Clinch, Standing, Standings};
pub use team::{Conference, Division, League, Region, Team, TeamId};
pub use tiebreak::{Resolution, Step, TieKind, TiebreakContext};
