use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cometrail::{
    catalog,
    config::PropagationConfig,
    ephemeris::MeanElementsEphemeris,
    orbit_type::NonGravParams,
    time::add_days,
    trajectory::TrajectoryGenerator,
};

/// 30-day trail of 3I/ATLAS around perihelion, gravity only vs full force model.
fn bench_trail(c: &mut Criterion) {
    let config = PropagationConfig::default();
    let ephem = MeanElementsEphemeris::new();
    let full = TrajectoryGenerator::new(&config, &ephem).unwrap();
    let sun_only = full.clone().without_perturbations();

    let atlas = catalog::atlas_3i();
    let state = atlas
        .state_at(&atlas.perihelion_time.unwrap(), &config)
        .unwrap();
    let non_grav = Some(NonGravParams::water_ice(1e-8, 1e-9, 0.0));

    c.bench_function("rk4_propagation/trail_30d_sun_only", |b| {
        b.iter(|| black_box(sun_only.trail(black_box(&state), 30.0, None).unwrap()))
    });

    c.bench_function("rk4_propagation/trail_30d_full_model", |b| {
        b.iter(|| black_box(full.trail(black_box(&state), 30.0, non_grav).unwrap()))
    });
}

/// Projections from random dates around perihelion.
fn bench_random_projections(c: &mut Criterion) {
    let config = PropagationConfig::default();
    let ephem = MeanElementsEphemeris::new();
    let generator = TrajectoryGenerator::new(&config, &ephem).unwrap();
    let atlas = catalog::atlas_3i();
    let tp = atlas.perihelion_time.unwrap();
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

    c.bench_function("rk4_propagation/projection_90d_random_start", |b| {
        b.iter_batched(
            || {
                let start = add_days(&tp, rng.random_range(-200.0..200.0));
                atlas.state_at(&start, &config).unwrap()
            },
            |state| black_box(generator.projection(&state, 90.0, None).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_overlay(c: &mut Criterion) {
    let config = PropagationConfig::default();
    let ephem = MeanElementsEphemeris::new();
    let generator = TrajectoryGenerator::new(&config, &ephem).unwrap();
    let atlas = catalog::atlas_3i();

    c.bench_function("rk4_propagation/orbit_overlay_3i", |b| {
        b.iter(|| black_box(generator.orbit_overlay(black_box(&atlas)).unwrap()))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_trail, bench_random_projections, bench_overlay
);
criterion_main!(benches);
