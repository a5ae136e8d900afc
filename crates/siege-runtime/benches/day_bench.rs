use criterion::{black_box, criterion_group, criterion_main, Criterion};
use siege_core::{GameRandom, GameState, ScenarioConfig};
use siege_policy::StandingEffectRegistry;

fn bench_days(c: &mut Criterion) {
    let cfg = ScenarioConfig::default_scenario();
    let base = GameState::from_scenario(&cfg).expect("default scenario is valid");
    let registry = StandingEffectRegistry::standard();
    c.bench_function("resolve 60 days", |b| {
        b.iter(|| {
            let mut state = base.clone();
            let mut rng = GameRandom::seeded(cfg.rng_seed);
            black_box(siege_runtime::run_days(&mut state, &mut rng, &registry, 60))
        })
    });
}

criterion_group!(benches, bench_days);
criterion_main!(benches);
