//! Benchmarks for workspace evaluation.
//!
//! Run with: cargo bench -p cdpr-workspace
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p cdpr-workspace -- --save-baseline main
//! 2. After changes: cargo bench -p cdpr-workspace -- --baseline main

use cdpr_types::{Cable, FrameAnchor, KinematicChain, MotionPattern, Platform, PlatformAnchor, Robot};
use cdpr_workspace::{
    CableLength, CancellationToken, GridConfig, GridMethod, HullConfig, HullMethod, Singularities,
    Translation,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::Vector3;

// =============================================================================
// Test Robot
// =============================================================================

/// Eight cables from the corners of a cube to a point platform.
fn cube_robot(pattern: MotionPattern) -> Robot {
    let mut builder = Robot::builder("cube");
    let mut platform = Platform::new(pattern);
    for z in [-1.0, 1.0] {
        for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            builder = builder.frame_anchor(FrameAnchor::at(Vector3::new(x, y, z)));
            platform = platform.with_anchor(PlatformAnchor::at(Vector3::new(x, y, z) * 0.1));
        }
    }
    builder = builder.platform(platform).cables(8, Cable::default());
    for i in 0..8 {
        builder = builder.chain(KinematicChain::new(i, i, i));
    }
    builder.build().unwrap_or_else(|e| panic!("benchmark robot is invalid: {e}"))
}

// =============================================================================
// Grid Benchmarks
// =============================================================================

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grid");
    group.sample_size(20);

    let robot = cube_robot(MotionPattern::T3);
    let cancel = CancellationToken::new();

    for steps in [5_usize, 11, 21] {
        let config = GridConfig::cube(0.8, steps);
        group.throughput(Throughput::Elements(steps.pow(3) as u64));

        let lengths = GridMethod::new(
            Translation::default(),
            CableLength::scalar(0.0, 2.5).unwrap_or_else(|e| panic!("{e}")),
            config.clone(),
        );
        group.bench_with_input(BenchmarkId::new("cable_length", steps), &lengths, |b, m| {
            b.iter(|| m.evaluate(black_box(&robot), &cancel));
        });

        let parallel = GridMethod::new(
            Translation::default(),
            Singularities::new(),
            config.with_parallel(true),
        );
        group.bench_with_input(
            BenchmarkId::new("singularities_parallel", steps),
            &parallel,
            |b, m| {
                b.iter(|| m.evaluate(black_box(&robot), &cancel));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Hull Benchmarks
// =============================================================================

fn bench_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hull");
    group.sample_size(20);

    let robot = cube_robot(MotionPattern::R3T3);
    let cancel = CancellationToken::new();

    for depth in [1_usize, 2, 3] {
        let method = HullMethod::new(
            Translation::default(),
            Singularities::new(),
            HullConfig::default().with_depth(depth),
        );
        group.bench_with_input(BenchmarkId::new("singularities", depth), &method, |b, m| {
            b.iter(|| m.evaluate(black_box(&robot), &cancel));
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_grid, bench_hull);
criterion_main!(benches);
