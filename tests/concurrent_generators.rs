use std::thread;

use cometrail::{
    catalog,
    config::PropagationConfig,
    ephemeris::MeanElementsEphemeris,
    time::days_between,
    trajectory::{TrajectoryGenerator, TrajectoryPoint},
};

mod common;

fn trail_of(generator: &TrajectoryGenerator<'_>, designation: &str) -> Vec<TrajectoryPoint> {
    let object = catalog::find(designation).unwrap();
    let tp = object.elements.perihelion_time.unwrap();
    let config = generator.config();
    let state = object.elements.state_at(&tp, config).unwrap();
    generator.trail(&state, 60.0, object.non_grav).unwrap()
}

#[test]
fn shared_generator_gives_same_trails_on_every_thread() {
    let config = PropagationConfig::default();
    let ephem = MeanElementsEphemeris::new();
    let generator = TrajectoryGenerator::new(&config, &ephem).unwrap();
    let designations = ["3I", "1I", "2I"];

    let sequential: Vec<_> = designations
        .iter()
        .map(|d| trail_of(&generator, d))
        .collect();

    let concurrent: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = designations
            .iter()
            .map(|d| {
                let generator = &generator;
                scope.spawn(move || trail_of(generator, d))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    for (seq, conc) in sequential.iter().zip(&concurrent) {
        common::assert_points_close(conc, seq, 0.0);
    }
}

#[test]
fn generators_with_different_configs_run_side_by_side() {
    let coarse = PropagationConfig::default().with_step(0.5);
    let fine = PropagationConfig::default().with_step(0.1);
    let ephem = MeanElementsEphemeris::new();

    let (coarse_trail, fine_trail) = thread::scope(|scope| {
        let c = scope.spawn(|| {
            let generator = TrajectoryGenerator::new(&coarse, &ephem).unwrap();
            trail_of(&generator, "3I")
        });
        let f = scope.spawn(|| {
            let generator = TrajectoryGenerator::new(&fine, &ephem).unwrap();
            trail_of(&generator, "3I")
        });
        (c.join().unwrap(), f.join().unwrap())
    });

    assert_eq!(coarse_trail.len(), 60);
    assert_eq!(fine_trail.len(), 60);
    for (c, f) in coarse_trail.iter().zip(&fine_trail) {
        assert!(days_between(&c.date, &f.date).abs() < 1e-9);
        assert!((c.position() - f.position()).norm() < 1e-5);
    }
}
