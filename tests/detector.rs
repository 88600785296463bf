//! Scene detector state-machine tests over synthetic score sequences.
//!
//! No video fixtures are needed: the detector consumes (frame, score)
//! pairs, so every property can be exercised with generated input.

use lecturesplit::{DetectionOptions, SceneDetector, SceneList, map_cuts_to_source_frames};

/// Deterministic pseudo-random score stream (simple LCG), range 0.0–100.0.
fn synthetic_scores(count: u64, seed: u64) -> Vec<f64> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 40) as f64 % 100.0
        })
        .collect()
}

fn run_detector(options: &DetectionOptions, scores: &[f64]) -> Vec<u64> {
    let mut detector = SceneDetector::new(options).expect("valid options");
    for (frame, &score) in scores.iter().enumerate() {
        detector.process(frame as u64, score);
    }
    detector.into_cuts()
}

// ── Minimum scene length ───────────────────────────────────────────

#[test]
fn cuts_are_separated_by_min_scene_length() {
    for seed in [1, 7, 42, 1337] {
        let options = DetectionOptions::new()
            .with_threshold(50.0)
            .with_min_scene_length(30);
        let scores = synthetic_scores(5_000, seed);
        let cuts = run_detector(&options, &scores);

        let mut previous = 0;
        for cut in cuts {
            assert!(
                cut - previous >= 30,
                "cut at {cut} is only {} frames after {previous} (seed {seed})",
                cut - previous,
            );
            previous = cut;
        }
    }
}

#[test]
fn candidate_inside_window_is_suppressed_not_deferred() {
    let options = DetectionOptions::new()
        .with_threshold(5.0)
        .with_min_scene_length(100);
    let mut scores = vec![0.0; 300];
    scores[150] = 50.0; // valid cut
    scores[200] = 50.0; // inside the 100-frame window after 150 — suppressed
    scores[260] = 50.0; // 110 frames after 150 — allowed

    assert_eq!(run_detector(&options, &scores), vec![150, 260]);
}

#[test]
fn min_scene_length_spanning_whole_video_yields_no_cuts() {
    let options = DetectionOptions::new()
        .with_threshold(5.0)
        .with_min_scene_length(1_000);
    let scores = vec![90.0; 500]; // every frame above threshold
    assert!(run_detector(&options, &scores).is_empty());
}

// ── Threshold behavior ─────────────────────────────────────────────

#[test]
fn scores_never_exceeding_threshold_yield_no_cuts() {
    let options = DetectionOptions::new().with_threshold(5.0);
    let scores = vec![4.9; 2_000];
    assert!(run_detector(&options, &scores).is_empty());
}

#[test]
fn score_equal_to_threshold_does_not_cut() {
    let options = DetectionOptions::new()
        .with_threshold(5.0)
        .with_min_scene_length(1);
    let scores = vec![5.0; 200];
    assert!(run_detector(&options, &scores).is_empty());
}

#[test]
#[should_panic(expected = "strictly increasing order")]
fn out_of_order_frames_are_rejected() {
    let options = DetectionOptions::new()
        .with_threshold(50.0)
        .with_min_scene_length(1);
    let mut detector = SceneDetector::new(&options).expect("valid options");

    detector.process(10, 0.0);
    detector.process(5, 90.0);
}

// ── Sampled-unit to source-frame mapping ───────────────────────────

#[test]
fn sampled_cuts_map_to_source_frames() {
    // With frame skip 5 the scanner scores every 6th frame, so cut
    // ordinals 25 and 50 land on source frames 150 and 300.
    let options = DetectionOptions::new().with_frame_skip(5);
    let cuts = map_cuts_to_source_frames(vec![25, 50], options.stride());
    assert_eq!(cuts, vec![150, 300]);

    let scenes = SceneList::from_cut_frames(&cuts, 750, 25.0).expect("valid scene list");
    assert_eq!(scenes.len(), 3);
    assert_eq!(scenes.scenes()[1].start.frame(), 150);
    assert_eq!(scenes.scenes()[1].start.timecode(), "00:00:06.000");
    assert_eq!(scenes.scenes()[2].start.frame(), 300);
}

#[test]
fn zero_frame_skip_mapping_is_identity() {
    let options = DetectionOptions::new().with_frame_skip(0);
    assert_eq!(
        map_cuts_to_source_frames(vec![150, 600], options.stride()),
        vec![150, 600]
    );
}

// ── Determinism ────────────────────────────────────────────────────

#[test]
fn detection_is_deterministic() {
    let options = DetectionOptions::new()
        .with_threshold(40.0)
        .with_min_scene_length(25);
    let scores = synthetic_scores(10_000, 99);

    let first = run_detector(&options, &scores);
    let second = run_detector(&options, &scores);
    assert_eq!(first, second);
}

// ── End-to-end scenario from the detector through the builder ──────

#[test]
fn lecture_scenario_produces_expected_scene_list() {
    // 1000 frames at 25 fps, threshold 5, min scene length 100, no skip;
    // change events at frames 150 and 600.
    let options = DetectionOptions::new()
        .with_threshold(5.0)
        .with_min_scene_length(100)
        .with_frame_skip(0);

    let mut scores = vec![0.5; 1_000];
    scores[150] = 40.0;
    scores[600] = 40.0;

    let cuts = run_detector(&options, &scores);
    assert_eq!(cuts, vec![150, 600]);

    let scenes = SceneList::from_cut_frames(&cuts, 1_000, 25.0).expect("valid scene list");
    assert_eq!(scenes.len(), 3);

    let spans: Vec<(f64, f64)> = scenes
        .iter()
        .map(|scene| (scene.start.as_secs_f64(), scene.end.as_secs_f64()))
        .collect();
    assert_eq!(spans, vec![(0.0, 6.0), (6.0, 24.0), (24.0, 40.0)]);
}

#[test]
fn no_cuts_yield_single_scene_spanning_video() {
    let options = DetectionOptions::new().with_threshold(5.0);
    let scores = vec![0.1; 800];
    let cuts = run_detector(&options, &scores);

    let scenes = SceneList::from_cut_frames(&cuts, 800, 25.0).expect("valid scene list");
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes.scenes()[0].start.frame(), 0);
    assert_eq!(scenes.scenes()[0].end.frame(), 800);
}
