use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bracket_core::{sim, Bracket, Simulation, Team, WinModel};

fn create_64_team_bracket() -> Bracket {
    let teams = (0..64)
        .map(|i| {
            let mut team = Team::new(format!("Team{i}"), (i % 16) as u32 + 1, "East");
            team.rating = Some(30.0 - (i as f64) * 0.4);
            team
        })
        .collect();
    Bracket::new(teams).unwrap()
}

fn bench_single_sim(c: &mut Criterion) {
    let bracket = create_64_team_bracket();
    let model = WinModel::logistic();

    c.bench_function("sim_64_teams_logistic", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| sim(black_box(&bracket), black_box(&model), &mut rng))
    });
}

fn bench_normal_margin_sim(c: &mut Criterion) {
    let bracket = create_64_team_bracket();
    let model = WinModel::normal_margin();

    c.bench_function("sim_64_teams_normal_margin", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| sim(black_box(&bracket), black_box(&model), &mut rng))
    });
}

fn bench_batch(c: &mut Criterion) {
    let bracket = create_64_team_bracket();

    c.bench_function("batch_1000_runs_serial", |b| {
        b.iter(|| {
            let mut simulation =
                Simulation::new(black_box(bracket.clone()), WinModel::logistic(), 1000);
            simulation.run(7);
            simulation
        })
    });

    c.bench_function("batch_1000_runs_parallel", |b| {
        b.iter(|| {
            let mut simulation =
                Simulation::new(black_box(bracket.clone()), WinModel::logistic(), 1000);
            simulation.run_parallel(7);
            simulation
        })
    });
}

criterion_group!(benches, bench_single_sim, bench_normal_margin_sim, bench_batch);
criterion_main!(benches);
