//! Scene-boundary detection.
//!
//! [`SceneDetector`] is the stateful accumulator at the heart of the
//! pipeline: it consumes per-frame change scores and decides where scene
//! cuts fall, enforcing the minimum scene length directly in the decision
//! rather than as post-filtering.
//!
//! The frame-differencing algorithm itself is an injected capability behind
//! the [`ContentScorer`] trait, so alternative detectors can be substituted
//! without touching the state machine. [`LumaDiffScorer`] is the default:
//! mean absolute luma difference against the previous downscaled frame.

use crate::{configuration::DetectionOptions, error::SplitError};

/// A borrowed view of one downscaled grayscale frame.
///
/// Rows may be padded: `stride` is the byte distance between row starts and
/// is always at least `width`.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Byte distance between the starts of consecutive rows.
    pub stride: usize,
    /// Luma plane, `stride * height` bytes.
    pub data: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// Iterate over the rows of the frame, trimmed to `width` pixels.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> {
        self.data
            .chunks(self.stride)
            .take(self.height as usize)
            .map(|row| &row[..self.width as usize])
    }
}

/// The injected frame-differencing capability.
///
/// Given a frame, emit a change score relative to whatever the scorer has
/// seen before. Scores are compared against
/// [`DetectionOptions::threshold`](crate::DetectionOptions::threshold);
/// the default scorer reports on a 0–255 scale where 0 means the frame is
/// identical to its predecessor.
pub trait ContentScorer: Send {
    /// Score the change this frame represents. Called once per retained
    /// frame, strictly in playback order.
    fn score(&mut self, frame: FrameView<'_>) -> f64;
}

/// Default scorer: mean absolute luma difference between consecutive
/// downscaled frames.
///
/// The first frame always scores 0.0 (there is nothing to compare against).
/// A frame whose dimensions differ from the previous one also scores 0.0
/// and resets the comparison baseline.
#[derive(Debug, Default)]
pub struct LumaDiffScorer {
    previous: Vec<u8>,
    previous_dimensions: (u32, u32),
}

impl LumaDiffScorer {
    /// Create a scorer with no baseline frame.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentScorer for LumaDiffScorer {
    fn score(&mut self, frame: FrameView<'_>) -> f64 {
        let dimensions = (frame.width, frame.height);
        let pixel_count = frame.width as usize * frame.height as usize;

        let score = if self.previous_dimensions == dimensions && pixel_count > 0 {
            let total: u64 = frame
                .rows()
                .flatten()
                .zip(&self.previous)
                .map(|(&current, &previous)| u64::from(current.abs_diff(previous)))
                .sum();
            total as f64 / pixel_count as f64
        } else {
            0.0
        };

        self.previous.clear();
        self.previous.extend(frame.rows().flatten());
        self.previous_dimensions = dimensions;

        score
    }
}

/// Stateful scene-cut accumulator.
///
/// Feed scores in increasing frame order via
/// [`process`](SceneDetector::process); collect the cut list with
/// [`into_cuts`](SceneDetector::into_cuts). Frame 0 and the final frame are
/// implicit boundaries handled by the segment builder, so the cut list only
/// holds interior cuts.
///
/// The detector does no I/O and cannot fail after construction.
///
/// # Example
///
/// ```
/// use lecturesplit::{DetectionOptions, SceneDetector};
///
/// let options = DetectionOptions::new().with_min_scene_length(100);
/// let mut detector = SceneDetector::new(&options).unwrap();
///
/// for frame in 0..1_000u64 {
///     let score = if frame == 150 || frame == 600 { 40.0 } else { 0.5 };
///     detector.process(frame, score);
/// }
///
/// assert_eq!(detector.into_cuts(), vec![150, 600]);
/// ```
#[derive(Debug)]
pub struct SceneDetector {
    threshold: f64,
    min_scene_length: u64,
    last_cut: u64,
    last_frame: Option<u64>,
    cuts: Vec<u64>,
}

impl SceneDetector {
    /// Create a detector for the given options.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfiguration`] if the options are
    /// invalid — construction is the only point at which the detector can
    /// fail.
    pub fn new(options: &DetectionOptions) -> Result<Self, SplitError> {
        options.validate()?;

        Ok(Self {
            threshold: options.threshold(),
            min_scene_length: options.min_scene_length(),
            last_cut: 0,
            last_frame: None,
            cuts: Vec::new(),
        })
    }

    /// Consume one frame's change score.
    ///
    /// Records a cut at `frame` when the score exceeds the threshold and
    /// the previous cut (or the start of the video) is at least the minimum
    /// scene length behind; candidates inside that window are suppressed.
    /// Frames must arrive in strictly increasing order.
    pub fn process(&mut self, frame: u64, score: f64) {
        debug_assert!(
            self.last_frame.is_none_or(|last| frame > last),
            "frames must be processed in strictly increasing order"
        );
        self.last_frame = Some(frame);

        // checked_sub keeps an out-of-order frame before the last cut from
        // wrapping into a bogus cut in release builds.
        let far_enough = frame
            .checked_sub(self.last_cut)
            .is_some_and(|gap| gap >= self.min_scene_length);

        if score > self.threshold && far_enough {
            log::debug!("scene cut at frame {frame} (score {score:.2})");
            self.cuts.push(frame);
            self.last_cut = frame;
        }
    }

    /// The cuts recorded so far.
    pub fn cuts(&self) -> &[u64] {
        &self.cuts
    }

    /// Finish detection and return the strictly increasing cut list.
    pub fn into_cuts(self) -> Vec<u64> {
        self.cuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(data: &'a [u8], width: u32, height: u32) -> FrameView<'a> {
        FrameView {
            width,
            height,
            stride: width as usize,
            data,
        }
    }

    #[test]
    fn first_frame_scores_zero() {
        let mut scorer = LumaDiffScorer::new();
        assert_eq!(scorer.score(view(&[10, 20, 30, 40], 2, 2)), 0.0);
    }

    #[test]
    fn uniform_shift_scores_mean_delta() {
        let mut scorer = LumaDiffScorer::new();
        scorer.score(view(&[10, 10, 10, 10], 2, 2));
        let score = scorer.score(view(&[60, 60, 60, 60], 2, 2));
        assert_eq!(score, 50.0);
    }

    #[test]
    fn padded_rows_are_trimmed() {
        let mut scorer = LumaDiffScorer::new();
        // 2x2 frame with stride 3; padding bytes (255) must not be scored.
        let first = [0, 0, 255, 0, 0, 255];
        let second = [10, 10, 255, 10, 10, 255];
        scorer.score(FrameView {
            width: 2,
            height: 2,
            stride: 3,
            data: &first,
        });
        let score = scorer.score(FrameView {
            width: 2,
            height: 2,
            stride: 3,
            data: &second,
        });
        assert_eq!(score, 10.0);
    }

    #[test]
    fn dimension_change_resets_baseline() {
        let mut scorer = LumaDiffScorer::new();
        scorer.score(view(&[0, 0, 0, 0], 2, 2));
        assert_eq!(scorer.score(view(&[200, 200], 2, 1)), 0.0);
        assert_eq!(scorer.score(view(&[200, 200], 2, 1)), 0.0);
    }
}
