use crate::bracket::{build_bracket, Bracket, PlayoffPicks};
use crate::config::EngineConfig;
use crate::draft::{draft_order, DraftOrder};
use crate::error::StandingsError;
use crate::game::{Game, GameId};
use crate::overrides::{Selection, SelectionMap};
use crate::projection;
use crate::simulation::{simulate_odds, OddsTable};
use crate::standings::{compute_standings, Clinch, Standings};
use crate::team::{League, TeamId};

/// Everything needed to recompute the season: registry, schedule,
/// hypothetical selections, postseason results and picks, and config.
///
/// Each query recomputes from scratch; nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct SeasonState {
    pub league: League,
    /// Regular-season schedule.
    pub games: Vec<Game>,
    pub selections: SelectionMap,
    /// Postseason games, real or listed by a schedule.
    pub playoff_results: Vec<Game>,
    pub playoff_picks: PlayoffPicks,
    pub config: EngineConfig,
}

impl SeasonState {
    pub fn new(league: League, games: Vec<Game>, config: EngineConfig) -> Result<Self, StandingsError> {
        config.validate()?;
        Ok(SeasonState {
            league,
            games,
            selections: SelectionMap::new(),
            playoff_results: Vec::new(),
            playoff_picks: PlayoffPicks::new(),
            config,
        })
    }

    pub fn standings(&self) -> Result<Standings, StandingsError> {
        compute_standings(&self.league, &self.games, &self.selections, &self.config)
    }

    /// Copy with a hypothetical outcome selected for `game`.
    pub fn with_selection(&self, game: &GameId, selection: Selection) -> Self {
        let mut state = self.clone();
        state.selections.select(game.clone(), selection);
        state
    }

    /// Copy with the selection for `game` cleared.
    pub fn without_selection(&self, game: &GameId) -> Self {
        let mut state = self.clone();
        state.selections.remove(game);
        state
    }

    /// Copy with `winner` picked for the playoff meeting of `a` and `b`.
    pub fn with_pick(&self, a: &TeamId, b: &TeamId, winner: &TeamId) -> Self {
        let mut state = self.clone();
        state.playoff_picks.pick(a, b, winner);
        state
    }

    pub fn with_playoff_results(&self, results: Vec<Game>) -> Self {
        let mut state = self.clone();
        state.playoff_results = results;
        state
    }

    pub fn playoff_odds(&self) -> Result<OddsTable, StandingsError> {
        simulate_odds(&self.league, &self.games, &self.selections, &self.config)
    }

    pub fn bracket(&self) -> Result<Bracket, StandingsError> {
        let standings = self.standings()?;
        Ok(build_bracket(&standings, &self.playoff_results, &self.playoff_picks))
    }

    pub fn draft_order(&self) -> Result<DraftOrder, StandingsError> {
        let standings = self.standings()?;
        let bracket = build_bracket(&standings, &self.playoff_results, &self.playoff_picks);
        Ok(draft_order(&standings, &bracket))
    }

    pub fn magic_number(&self, team: &TeamId, target: Clinch) -> Result<Option<u32>, StandingsError> {
        let standings = self.standings()?;
        Ok(projection::magic_number(
            team,
            target,
            &self.games,
            &self.selections,
            &standings,
        ))
    }

    pub fn is_eliminated(&self, team: &TeamId) -> Result<bool, StandingsError> {
        Ok(projection::is_eliminated(team, &self.standings()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftTier;
    use crate::team::Conference;

    fn make_state() -> SeasonState {
        let games = vec![
            Game::final_score("g1", 1, "KC", "BAL", 27, 20),
            Game::scheduled("g2", 2, "BUF", "MIA"),
            Game::scheduled("g3", 2, "PHI", "DAL"),
        ];
        SeasonState::new(League::nfl(), games, EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_with_selection_leaves_original_untouched() {
        let state = make_state();
        let picked = state.with_selection(&GameId::from("g2"), Selection::Away);

        assert!(state.selections.is_empty());
        let standings = picked.standings().unwrap();
        assert_eq!(standings.get(&"MIA".into()).unwrap().record.wins(), 1);

        let cleared = picked.without_selection(&GameId::from("g2"));
        let standings = cleared.standings().unwrap();
        assert_eq!(standings.get(&"MIA".into()).unwrap().record.wins(), 0);
    }

    #[test]
    fn test_selection_on_final_game_has_no_effect() {
        let state = make_state();
        let before = state.standings().unwrap();
        let after = state
            .with_selection(&GameId::from("g1"), Selection::Away)
            .standings()
            .unwrap();
        assert_eq!(
            before.conference(Conference::Afc),
            after.conference(Conference::Afc)
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.simulation.margin_stddev = f64::NAN;
        assert!(SeasonState::new(League::nfl(), Vec::new(), config).is_err());
    }

    #[test]
    fn test_bracket_and_draft_follow_picks() {
        let state = make_state();
        let bracket = state.bracket().unwrap();
        let first = bracket.matchups[0].clone();

        let state = state.with_pick(&first.home, &first.away, &first.away);
        let bracket = state.bracket().unwrap();
        assert_eq!(bracket.matchups[0].winner, Some(first.away.clone()));

        let order = state.draft_order().unwrap();
        let loser = order.get(&first.home).unwrap();
        assert!(!loser.pending);
        assert_eq!(loser.tier, DraftTier::WildCardLoser);
        assert!((19..=24).contains(&loser.range.first));
        assert!(loser.range.last <= 24);
    }

    #[test]
    fn test_magic_number_and_elimination() {
        let state = make_state();
        // Both open games are enumerated: KC wins the West either way and
        // MIA takes the East if it beats BUF.
        assert_eq!(state.magic_number(&"KC".into(), Clinch::Playoff).unwrap(), Some(0));
        assert_eq!(state.magic_number(&"KC".into(), Clinch::Division).unwrap(), Some(0));
        assert!(!state.is_eliminated(&"MIA".into()).unwrap());
    }
}
