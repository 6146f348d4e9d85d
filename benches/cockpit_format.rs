use criterion::{Criterion, criterion_group, criterion_main};
use dcs_waypoints::{Aircraft, Position, Profile, Waypoint};
use std::hint::black_box;

fn cockpit_format_benchmark(c: &mut Criterion) {
    let waypoints = (0..99).map(|i| {
        let position = Position::new(41.0 + i as f64 * 0.013, 40.0 + i as f64 * 0.027).unwrap();
        Waypoint::new(position)
            .with_name(format!("Point {i}"))
            .with_elevation(i as f64 * 31.0)
    });
    let mut profile = Profile::with_waypoints("bench", Aircraft::Warthog, waypoints).unwrap();

    c.bench_function("entry_plan_warthog", |b| {
        b.iter(|| black_box(&profile).entry_plan());
    });

    profile.set_aircraft(Aircraft::Harrier);
    c.bench_function("entry_plan_harrier", |b| {
        b.iter(|| black_box(&profile).entry_plan());
    });

    c.bench_function("readable_string", |b| {
        b.iter(|| black_box(&profile).to_readable_string());
    });
}

criterion_group!(benches, cockpit_format_benchmark);
criterion_main!(benches);
