//! Error types for the `lecturesplit` crate.
//!
//! This module defines [`SplitError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry rich context to aid
//! debugging, including file paths, scene numbers, and external-tool exit
//! codes.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `lecturesplit` operations.
///
/// Every public method that can fail returns `Result<T, SplitError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SplitError {
    /// The external `ffmpeg` binary could not be found.
    ///
    /// This is fatal for the whole run and is raised before any video is
    /// opened.
    #[error("ffmpeg binary not found ({hint})")]
    ToolNotFound {
        /// Where the binary was looked for (search path or an explicit path).
        hint: String,
    },

    /// A video file could not be opened or decoded.
    ///
    /// Fatal for that video only; batch processing continues with the
    /// remaining videos.
    #[error("Failed to open video at {path}: {reason}")]
    VideoOpen {
        /// Path that was passed to [`crate::FrameScanner::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// A frame could not be decoded mid-stream.
    #[error("Failed to decode frame {frame}: {reason}")]
    FrameDecode {
        /// Decode-order frame number at which decoding failed.
        frame: u64,
        /// Underlying decoder error.
        reason: String,
    },

    /// Configuration values are invalid (e.g. a non-positive threshold).
    ///
    /// Raised at construction time, before any processing starts.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The scene-list contiguity invariant was violated.
    ///
    /// This indicates an internal logic fault, never an expected runtime
    /// condition. Processing of the affected video aborts.
    #[error("Scene list invariant violated: {details}")]
    InvariantViolation {
        /// Description of the violated invariant, with offending values.
        details: String,
    },

    /// A single segment's ffmpeg invocation returned a nonzero exit code.
    ///
    /// Recorded per segment in the
    /// [`ExtractionReport`](crate::ExtractionReport); the job's diagnostics
    /// mode decides whether the remaining segments still run.
    #[error(
        "Audio extraction failed for scene {scene_number} of {video} (exit code {exit_code:?})"
    )]
    SegmentExtraction {
        /// Source video path.
        video: PathBuf,
        /// 1-based scene number that failed.
        scene_number: usize,
        /// Exit code of the ffmpeg process, if it terminated normally.
        exit_code: Option<i32>,
    },

    /// The operation was cancelled via a
    /// [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}
