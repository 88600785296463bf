//! # lecturesplit
//!
//! Split lecture videos at slide-change boundaries and export the audio of
//! each scene as a separate MP3 file.
//!
//! `lecturesplit` scans a directory of lecture recordings, detects scene
//! boundaries (slide transitions) in each video with a minimum-length-aware
//! detector, and cuts one audio file per scene via the external `ffmpeg`
//! binary — ready for downstream per-segment use such as transcription.
//! Video decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; audio
//! cutting shells out to an explicitly resolved `ffmpeg` binary.
//!
//! ## Quick Start
//!
//! ### Split a whole directory
//!
//! ```no_run
//! use lecturesplit::{
//!     DetectionOptions, DiagnosticsMode, FfmpegTool, PipelineOptions, process_directory,
//! };
//!
//! let tool = FfmpegTool::resolve().unwrap();
//! let summary = process_directory(
//!     "input",
//!     "output",
//!     &DetectionOptions::new(),
//!     DiagnosticsMode::Suppressed,
//!     &tool,
//!     &PipelineOptions::new(),
//! )
//! .unwrap();
//!
//! println!(
//!     "{} audio file(s) written to {}",
//!     summary.total_written(),
//!     summary.output_dir.display()
//! );
//! ```
//!
//! ### Detect scenes in one video
//!
//! ```no_run
//! use lecturesplit::{DetectionOptions, PipelineOptions, detect_scenes};
//!
//! let options = DetectionOptions::new()
//!     .with_threshold(5.0)
//!     .with_min_scene_length(100);
//!
//! let scenes = detect_scenes("lecture.mp4", &options, &PipelineOptions::new()).unwrap();
//! for (index, scene) in scenes.iter().enumerate() {
//!     println!("Scene {}: {} - {}", index + 1, scene.start, scene.end);
//! }
//! ```
//!
//! ## Pipeline
//!
//! video → [`FrameScanner`] (decode + downscale + sample) → per-frame
//! change scores → [`SceneDetector`] (threshold + minimum scene length) →
//! cut list → [`SceneList`] (contiguous timecoded segments) →
//! [`extract_split_audio`] (one blocking ffmpeg invocation per scene).
//!
//! Everything is strictly sequential: one video is fully detected and fully
//! extracted before the next begins. Cooperative cancellation
//! ([`CancellationToken`]) is honored between videos and between segments.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed to build (for frame
//! decoding), and an `ffmpeg` binary must be reachable at run time (or be
//! passed explicitly via [`FfmpegTool::at_path`]) for audio extraction.

pub mod configuration;
pub mod detector;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod progress;
pub mod scanner;
pub mod scene;
pub mod timecode;

pub use configuration::{DetectionOptions, PipelineOptions};
pub use detector::{ContentScorer, FrameView, LumaDiffScorer, SceneDetector};
pub use error::SplitError;
pub use extract::{
    AUDIO_EXTENSION, DiagnosticsMode, ExtractionJob, ExtractionReport, FfmpegTool, SegmentFailure,
    extract_split_audio,
};
pub use pipeline::{
    BatchSummary, VideoOutcome, VideoReport, detect_scenes, detect_scenes_with_scorer,
    map_cuts_to_source_frames, process_directory,
};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use scanner::{FrameSample, FrameScanner};
pub use scene::{Scene, SceneList};
pub use timecode::{Timecode, format_timecode};
