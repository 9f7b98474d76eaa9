use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridiron_standings::{
    build_bracket, compute_standings, draft_order, simulate_odds, win_probability, EngineConfig,
    PlayoffPicks, SeasonRecords, SelectionMap, TeamId, TeamRecord, TieKind, TiebreakContext,
    WinLossTie,
};

#[path = "../tests/common/mod.rs"]
mod common;

fn create_test_records() -> (TeamRecord, TeamRecord) {
    let home = TeamRecord {
        overall: WinLossTie::new(11, 4, 0),
        points_for: 410,
        points_against: 300,
        ..TeamRecord::default()
    };
    let away = TeamRecord {
        overall: WinLossTie::new(7, 8, 0),
        points_for: 330,
        points_against: 345,
        ..TeamRecord::default()
    };
    (home, away)
}

fn bench_win_probability(c: &mut Criterion) {
    let (home, away) = create_test_records();
    let config = EngineConfig::default();

    c.bench_function("win_probability", |b| {
        b.iter(|| win_probability(black_box(&home), black_box(&away), &config.simulation))
    });
}

fn bench_tiebreak(c: &mut Criterion) {
    let (league, games) = common::full_season();
    let config = EngineConfig::default();
    let season =
        SeasonRecords::aggregate(&league, &games, &SelectionMap::new(), &config.placeholder_scores)
            .unwrap();
    let ctx = TiebreakContext::new(&league, &season, &config.tiebreak);
    let group: Vec<TeamId> = ["BAL", "HOU", "LAC", "PIT", "DEN"]
        .iter()
        .map(|&id| TeamId::from(id))
        .collect();

    c.bench_function("tiebreak_five_team_group", |b| {
        b.iter(|| ctx.resolve(black_box(&group), TieKind::Wildcard))
    });
}

fn bench_standings(c: &mut Criterion) {
    let (league, games) = common::full_season();
    let config = EngineConfig::default();

    c.bench_function("standings_full_season", |b| {
        b.iter(|| compute_standings(&league, black_box(&games), &SelectionMap::new(), &config))
    });
}

fn bench_projection(c: &mut Criterion) {
    // Last week open: too many games to enumerate, so bounds are used.
    let (league, games) = common::open_season(16);
    let config = EngineConfig::default();
    c.bench_function("projection_bounds_16_open", |b| {
        b.iter(|| compute_standings(&league, black_box(&games), &SelectionMap::new(), &config))
    });

    let (league, games) = common::open_season(6);
    c.bench_function("projection_exhaustive_6_open", |b| {
        b.iter(|| compute_standings(&league, black_box(&games), &SelectionMap::new(), &config))
    });
}

fn bench_simulation(c: &mut Criterion) {
    let (league, games) = common::open_season(48);
    let mut config = EngineConfig::default();
    config.simulation.seed = Some(42);
    config.simulation.simulations = 500;

    c.bench_function("simulate_odds_500_sims", |b| {
        b.iter(|| simulate_odds(&league, black_box(&games), &SelectionMap::new(), &config))
    });
}

fn bench_draft_order(c: &mut Criterion) {
    let (league, games) = common::full_season();
    let standings =
        compute_standings(&league, &games, &SelectionMap::new(), &EngineConfig::default()).unwrap();
    let bracket = build_bracket(&standings, &[], &PlayoffPicks::new());

    c.bench_function("draft_order_open_playoffs", |b| {
        b.iter(|| draft_order(black_box(&standings), black_box(&bracket)))
    });
}

criterion_group!(
    benches,
    bench_win_probability,
    bench_tiebreak,
    bench_standings,
    bench_projection,
    bench_simulation,
    bench_draft_order,
);
criterion_main!(benches);
