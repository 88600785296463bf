//! Benchmarks for the scene detector hot loop and the segment builder.
//!
//! Run with: cargo bench
//!
//! No fixtures are required: the detector consumes synthetic score
//! sequences, which is also how it is fed in production (by the frame
//! scanner).

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use lecturesplit::{
    ContentScorer, DetectionOptions, FrameView, LumaDiffScorer, SceneDetector, SceneList,
};

/// Deterministic pseudo-random score stream, range 0.0–100.0.
fn synthetic_scores(count: u64) -> Vec<f64> {
    let mut state = 0x9E3779B97F4A7C15u64;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 40) as f64 % 100.0
        })
        .collect()
}

fn benchmark_detector(criterion: &mut Criterion) {
    let scores = synthetic_scores(100_000);
    let options = DetectionOptions::new()
        .with_threshold(60.0)
        .with_min_scene_length(100);

    criterion.bench_function("detect cuts in 100k scored frames", |bencher| {
        bencher.iter(|| {
            let mut detector = SceneDetector::new(&options).unwrap();
            for (frame, &score) in scores.iter().enumerate() {
                detector.process(frame as u64, black_box(score));
            }
            black_box(detector.into_cuts())
        });
    });
}

fn benchmark_segment_builder(criterion: &mut Criterion) {
    // One cut every 500 frames over a two-hour video at 25 fps.
    let cuts: Vec<u64> = (1..360).map(|index| index * 500).collect();

    criterion.bench_function("build scene list from 360 cuts", |bencher| {
        bencher.iter(|| {
            black_box(SceneList::from_cut_frames(&cuts, 180_000, 25.0).unwrap())
        });
    });
}

fn benchmark_scorer(criterion: &mut Criterion) {
    // A 320x180 grayscale plane, the scanner's downscale target.
    let first: Vec<u8> = (0..320usize * 180).map(|index| (index % 251) as u8).collect();
    let second: Vec<u8> = (0..320usize * 180).map(|index| (index % 241) as u8).collect();

    criterion.bench_function("score one downscaled frame pair", |bencher| {
        bencher.iter(|| {
            let mut scorer = LumaDiffScorer::new();
            scorer.score(FrameView {
                width: 320,
                height: 180,
                stride: 320,
                data: &first,
            });
            black_box(scorer.score(FrameView {
                width: 320,
                height: 180,
                stride: 320,
                data: &second,
            }))
        });
    });
}

criterion_group!(
    benches,
    benchmark_detector,
    benchmark_segment_builder,
    benchmark_scorer
);
criterion_main!(benches);
