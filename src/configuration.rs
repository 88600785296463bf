//! Detection and pipeline configuration.
//!
//! [`DetectionOptions`] holds the three tuning knobs of scene detection
//! (threshold, minimum scene length, frame skip). [`PipelineOptions`] is a
//! builder that threads progress callbacks and cancellation tokens through
//! long-running operations without polluting every function signature.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lecturesplit::{
//!     CancellationToken, DetectionOptions, PipelineOptions, ProgressCallback, ProgressInfo,
//! };
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let detection = DetectionOptions::new()
//!     .with_threshold(8.0)
//!     .with_min_scene_length(150);
//!
//! let token = CancellationToken::new();
//! let pipeline = PipelineOptions::new()
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::{
    error::SplitError,
    progress::{CancellationToken, NoOpProgress, ProgressCallback},
};

/// Scene detection settings.
///
/// Controls the sensitivity of the scene-change detector and the sampling
/// rate of the frame scanner. The defaults match the tool's original tuning
/// for lecture recordings: threshold 5.0, minimum scene length 100 frames,
/// frame skip 5.
#[derive(Debug, Clone)]
pub struct DetectionOptions {
    threshold: f64,
    min_scene_length: u64,
    frame_skip: u64,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            min_scene_length: 100,
            frame_skip: 5,
        }
    }
}

impl DetectionOptions {
    /// Create options with the default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the change-score threshold above which a frame is a scene-cut
    /// candidate.
    ///
    /// Lower values are more sensitive; 1 detects almost every flicker, 30
    /// only hard cuts. Must be positive. Default: 5.0.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the minimum scene length, in sampled frames.
    ///
    /// Cut candidates closer than this to the previous cut are suppressed.
    /// Must be at least 1. Default: 100.
    #[must_use]
    pub fn with_min_scene_length(mut self, min_scene_length: u64) -> Self {
        self.min_scene_length = min_scene_length;
        self
    }

    /// Set how many frames the scanner skips between scored samples.
    ///
    /// Skipping speeds up detection at the expense of accuracy. Note that
    /// the minimum scene length is enforced in *sampled* frames, so a
    /// higher skip also lengthens the effective minimum scene duration in
    /// wall-clock time. Default: 5.
    #[must_use]
    pub fn with_frame_skip(mut self, frame_skip: u64) -> Self {
        self.frame_skip = frame_skip;
        self
    }

    /// The change-score threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The minimum scene length, in sampled frames.
    pub fn min_scene_length(&self) -> u64 {
        self.min_scene_length
    }

    /// The number of frames skipped between scored samples.
    pub fn frame_skip(&self) -> u64 {
        self.frame_skip
    }

    /// Distance between consecutive scored source frames
    /// (`frame_skip + 1`).
    pub fn stride(&self) -> u64 {
        self.frame_skip + 1
    }

    /// Check all values, returning
    /// [`SplitError::InvalidConfiguration`] on the first violation.
    pub fn validate(&self) -> Result<(), SplitError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(SplitError::InvalidConfiguration(format!(
                "scene detection threshold must be positive, got {}",
                self.threshold
            )));
        }

        if self.min_scene_length == 0 {
            return Err(SplitError::InvalidConfiguration(
                "minimum scene length must be at least 1 frame".to_string(),
            ));
        }

        Ok(())
    }
}

/// Operational settings for long-running pipeline work.
///
/// Carries the progress callback, cancellation token, and progress batch
/// size. A default-constructed value reports nothing and never cancels.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N items).
    pub(crate) batch_size: u64,
}

impl Debug for PipelineOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PipelineOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineOptions {
    /// Create options with default settings: no progress callback, no
    /// cancellation, batch size 1.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }

    /// Attach a progress callback.
    ///
    /// The callback is invoked every
    /// [`batch_size`](PipelineOptions::with_batch_size) items.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// Cancellation is cooperative and honored at video and segment
    /// boundaries only; it never interrupts a running ffmpeg child process.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every item; 10 means every 10th item.
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
