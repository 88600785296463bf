//! Segment builder and timecode tests.

use std::time::Duration;

use lecturesplit::{SceneList, SplitError, Timecode, format_timecode};

// ── SceneList construction ─────────────────────────────────────────

#[test]
fn scenes_are_contiguous_and_span_the_video_once() {
    let scenes = SceneList::from_cut_frames(&[120, 480, 950], 1_200, 30.0).expect("valid cuts");
    assert_eq!(scenes.len(), 4);

    assert_eq!(scenes.scenes()[0].start.frame(), 0);
    for pair in scenes.scenes().windows(2) {
        assert_eq!(
            pair[0].end.frame(),
            pair[1].start.frame(),
            "scenes must be contiguous",
        );
    }
    assert_eq!(scenes.scenes().last().unwrap().end.frame(), 1_200);

    for scene in &scenes {
        assert!(scene.start.frame() < scene.end.frame());
    }
}

#[test]
fn empty_cuts_yield_single_scene() {
    let scenes = SceneList::from_cut_frames(&[], 500, 25.0).expect("valid");
    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes.scenes()[0].duration(), Duration::from_secs(20));
}

#[test]
fn zero_length_video_yields_empty_list() {
    let scenes = SceneList::from_cut_frames(&[], 0, 25.0).expect("valid");
    assert!(scenes.is_empty());
}

#[test]
fn unsorted_cuts_fail_loudly() {
    let result = SceneList::from_cut_frames(&[600, 150], 1_000, 25.0);
    assert!(matches!(
        result,
        Err(SplitError::InvariantViolation { .. })
    ));
}

#[test]
fn duplicate_cuts_fail_loudly() {
    let result = SceneList::from_cut_frames(&[150, 150], 1_000, 25.0);
    assert!(matches!(
        result,
        Err(SplitError::InvariantViolation { .. })
    ));
}

#[test]
fn cut_at_or_beyond_end_fails_loudly() {
    assert!(SceneList::from_cut_frames(&[1_000], 1_000, 25.0).is_err());
    assert!(SceneList::from_cut_frames(&[1_500], 1_000, 25.0).is_err());
}

#[test]
fn cut_at_frame_zero_fails_loudly() {
    let result = SceneList::from_cut_frames(&[0, 150], 1_000, 25.0);
    assert!(matches!(
        result,
        Err(SplitError::InvariantViolation { .. })
    ));
}

#[test]
fn invariant_violation_message_names_offending_frames() {
    let error = SceneList::from_cut_frames(&[600, 150], 1_000, 25.0).unwrap_err();
    let message = error.to_string();
    assert!(
        message.contains("600") && message.contains("150"),
        "diagnostic should name the offending boundaries: {message}",
    );
}

#[test]
fn non_positive_frame_rate_is_a_configuration_error() {
    let result = SceneList::from_cut_frames(&[150], 1_000, 0.0);
    assert!(matches!(
        result,
        Err(SplitError::InvalidConfiguration(_))
    ));
}

// ── Timecode formatting ────────────────────────────────────────────

#[test]
fn timecode_renders_hh_mm_ss_mmm() {
    let timecode = Timecode::new(150, 25.0).unwrap();
    assert_eq!(timecode.timecode(), "00:00:06.000");
    assert_eq!(timecode.to_string(), "00:00:06.000");

    let hour_plus = Timecode::new(25 * 3_661, 25.0).unwrap();
    assert_eq!(hour_plus.timecode(), "01:01:01.000");
}

#[test]
fn timecode_subtraction_yields_duration() {
    let start = Timecode::new(150, 25.0).unwrap();
    let end = Timecode::new(600, 25.0).unwrap();
    assert_eq!(end - start, Duration::from_secs(18));
    assert_eq!(format_timecode(end - start), "00:00:18.000");
}

#[test]
fn fractional_frame_rates_round_to_milliseconds() {
    // 1001 frames at 29.97 fps is 33.4 s (and change).
    let timecode = Timecode::new(1_001, 29.97).unwrap();
    assert_eq!(timecode.timecode(), "00:00:33.400");
}
