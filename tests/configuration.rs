//! DetectionOptions and PipelineOptions builder tests.

use lecturesplit::{DetectionOptions, PipelineOptions, SceneDetector, SplitError};

// ── DetectionOptions builder ───────────────────────────────────────

#[test]
fn detection_defaults_match_documented_tuning() {
    let options = DetectionOptions::new();
    assert_eq!(options.threshold(), 5.0);
    assert_eq!(options.min_scene_length(), 100);
    assert_eq!(options.frame_skip(), 5);
    assert_eq!(options.stride(), 6);
}

#[test]
fn detection_builder_sets_all_fields() {
    let options = DetectionOptions::new()
        .with_threshold(12.5)
        .with_min_scene_length(40)
        .with_frame_skip(0);
    assert_eq!(options.threshold(), 12.5);
    assert_eq!(options.min_scene_length(), 40);
    assert_eq!(options.frame_skip(), 0);
    assert_eq!(options.stride(), 1);
}

#[test]
fn zero_frame_skip_is_valid() {
    let options = DetectionOptions::new().with_frame_skip(0);
    assert!(options.validate().is_ok());
}

// ── Validation ─────────────────────────────────────────────────────

#[test]
fn non_positive_threshold_is_rejected() {
    for threshold in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let options = DetectionOptions::new().with_threshold(threshold);
        assert!(
            matches!(
                options.validate(),
                Err(SplitError::InvalidConfiguration(_))
            ),
            "threshold {threshold} should be rejected",
        );
    }
}

#[test]
fn zero_min_scene_length_is_rejected() {
    let options = DetectionOptions::new().with_min_scene_length(0);
    assert!(options.validate().is_err());
}

#[test]
fn detector_construction_fails_on_invalid_options() {
    // Configuration errors surface at construction, never mid-stream.
    let options = DetectionOptions::new().with_threshold(-1.0);
    assert!(matches!(
        SceneDetector::new(&options),
        Err(SplitError::InvalidConfiguration(_))
    ));
}

// ── PipelineOptions ────────────────────────────────────────────────

#[test]
fn pipeline_defaults() {
    let options = PipelineOptions::new();
    let debug = format!("{options:?}");
    assert!(debug.contains("PipelineOptions"));
    assert!(debug.contains("has_cancellation: false"));
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn pipeline_batch_size_clamps_zero() {
    let options = PipelineOptions::new().with_batch_size(0);
    let debug = format!("{options:?}");
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn pipeline_with_cancellation_shows_in_debug() {
    let options =
        PipelineOptions::new().with_cancellation(lecturesplit::CancellationToken::new());
    let debug = format!("{options:?}");
    assert!(debug.contains("has_cancellation: true"));
}
