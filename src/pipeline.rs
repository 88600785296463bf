//! The end-to-end pipeline: scan, detect, build segments, extract.
//!
//! [`detect_scenes`] runs the detection half for one video;
//! [`process_directory`] drives the full batch — every entry directly under
//! the input directory is a candidate video, processed strictly one at a
//! time. A video that cannot be opened is recorded and skipped; the batch
//! carries on.
//!
//! # Example
//!
//! ```no_run
//! use lecturesplit::{
//!     DetectionOptions, DiagnosticsMode, FfmpegTool, PipelineOptions, SplitError,
//!     process_directory,
//! };
//!
//! let tool = FfmpegTool::resolve()?;
//! let summary = process_directory(
//!     "input",
//!     "output",
//!     &DetectionOptions::new(),
//!     DiagnosticsMode::Suppressed,
//!     &tool,
//!     &PipelineOptions::new(),
//! )?;
//!
//! println!("{} audio file(s) written", summary.total_written());
//! # Ok::<(), SplitError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    configuration::{DetectionOptions, PipelineOptions},
    detector::{ContentScorer, LumaDiffScorer, SceneDetector},
    error::SplitError,
    extract::{DiagnosticsMode, ExtractionJob, ExtractionReport, FfmpegTool, extract_split_audio},
    progress::{OperationType, ProgressTracker},
    scanner::FrameScanner,
    scene::SceneList,
};

/// Detect scene boundaries in one video with the default scorer.
///
/// Deterministic: the same video and options always produce the same scene
/// list.
///
/// # Errors
///
/// Returns [`SplitError::InvalidConfiguration`] for invalid options,
/// [`SplitError::VideoOpen`] / [`SplitError::FrameDecode`] for decoding
/// failures, and [`SplitError::InvariantViolation`] if the built scene list
/// is malformed (an internal fault).
pub fn detect_scenes<P: AsRef<Path>>(
    video_path: P,
    detection: &DetectionOptions,
    options: &PipelineOptions,
) -> Result<SceneList, SplitError> {
    detect_scenes_with_scorer(video_path, detection, Box::new(LumaDiffScorer::new()), options)
}

/// Detect scene boundaries with an injected frame-differencing scorer.
pub fn detect_scenes_with_scorer<P: AsRef<Path>>(
    video_path: P,
    detection: &DetectionOptions,
    scorer: Box<dyn ContentScorer>,
    options: &PipelineOptions,
) -> Result<SceneList, SplitError> {
    let video_path = video_path.as_ref();
    let mut detector = SceneDetector::new(detection)?;
    let mut scanner = FrameScanner::open(video_path, detection, scorer)?;

    log::info!(
        "Detecting scenes in {} (threshold {}, min length {}, skip {})",
        video_path.display(),
        detection.threshold(),
        detection.min_scene_length(),
        detection.frame_skip(),
    );

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::SceneDetection,
        match scanner.estimated_samples() {
            0 => None,
            estimate => Some(estimate),
        },
        options.batch_size,
    );

    while let Some(sample) = scanner.try_next()? {
        detector.process(sample.index, sample.score);
        tracker.advance(Some(sample.source_frame));
    }
    tracker.finish();

    let cuts = map_cuts_to_source_frames(detector.into_cuts(), detection.stride());

    let scenes =
        SceneList::from_cut_frames(&cuts, scanner.frames_read(), scanner.frames_per_second())?;

    log::info!(
        "Detected {} scene(s) in {}",
        scenes.len(),
        video_path.display(),
    );
    for (index, scene) in scenes.iter().enumerate() {
        log::info!(
            "    Scene {}: start {} / frame {}, end {} / frame {}",
            index + 1,
            scene.start.timecode(),
            scene.start.frame(),
            scene.end.timecode(),
            scene.end.frame(),
        );
    }

    Ok(scenes)
}

/// Map detector cut ordinals back to source frame numbers.
///
/// The detector works in sampled-frame units: sample `i` is the source frame
/// at `i * stride`. This is the only point where sampled units leave the
/// detector, so timecoded segments downstream are always in source frames.
pub fn map_cuts_to_source_frames(cuts: Vec<u64>, stride: u64) -> Vec<u64> {
    cuts.into_iter().map(|cut| cut * stride).collect()
}

/// What happened to one candidate video.
#[derive(Debug)]
pub enum VideoOutcome {
    /// Detection and extraction ran; see the report for per-segment detail.
    Split {
        /// Number of scenes detected.
        scene_count: usize,
        /// Per-segment extraction outcome.
        report: ExtractionReport,
    },
    /// The video could not be processed and was skipped.
    Skipped {
        /// Why it was skipped.
        reason: String,
    },
}

/// Per-video record in a [`BatchSummary`].
#[derive(Debug)]
pub struct VideoReport {
    /// The candidate video.
    pub video_path: PathBuf,
    /// What happened to it.
    pub outcome: VideoOutcome,
}

/// Outcome of a whole batch run.
#[derive(Debug)]
pub struct BatchSummary {
    /// One report per candidate video, in processing order.
    pub reports: Vec<VideoReport>,
    /// Destination root the segment directories were created under.
    pub output_dir: PathBuf,
}

impl BatchSummary {
    /// Total segment files written across all videos.
    pub fn total_written(&self) -> usize {
        self.reports
            .iter()
            .map(|report| match &report.outcome {
                VideoOutcome::Split { report, .. } => report.written.len(),
                VideoOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    /// Total failed segments across all videos.
    pub fn total_failures(&self) -> usize {
        self.reports
            .iter()
            .map(|report| match &report.outcome {
                VideoOutcome::Split { report, .. } => report.failures.len(),
                VideoOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    /// Number of videos that were skipped entirely.
    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| matches!(report.outcome, VideoOutcome::Skipped { .. }))
            .count()
    }
}

/// Process every entry directly under `input_dir` as a candidate video.
///
/// Entries are taken non-recursively and sorted by path so runs are
/// deterministic. Each video is fully detected and then fully extracted
/// before the next one begins. Per-video failures (unreadable file, no
/// video stream, decode fault) are recorded as
/// [`VideoOutcome::Skipped`] and do not abort the batch; cancellation is
/// honored between videos (and between segments, inside extraction).
///
/// # Errors
///
/// Returns [`SplitError::InvalidConfiguration`] for invalid options,
/// [`SplitError::Io`] when the input directory cannot be read, and
/// [`SplitError::Cancelled`] on a cooperative stop.
pub fn process_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    detection: &DetectionOptions,
    diagnostics: DiagnosticsMode,
    tool: &FfmpegTool,
    options: &PipelineOptions,
) -> Result<BatchSummary, SplitError> {
    detection.validate()?;

    let output_dir = output_dir.as_ref().to_path_buf();
    let mut candidates: Vec<PathBuf> = fs::read_dir(input_dir.as_ref())?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()?;
    candidates.sort();

    log::info!(
        "Found {} candidate video(s) in {}",
        candidates.len(),
        input_dir.as_ref().display(),
    );

    let mut reports = Vec::with_capacity(candidates.len());

    for video_path in candidates {
        if options.is_cancelled() {
            return Err(SplitError::Cancelled);
        }

        log::info!("Processing {}", video_path.display());

        let outcome = match split_video(&video_path, &output_dir, detection, diagnostics, tool, options) {
            Ok((scene_count, report)) => VideoOutcome::Split { scene_count, report },
            Err(SplitError::Cancelled) => return Err(SplitError::Cancelled),
            Err(error) => {
                log::warn!("Skipping {}: {error}", video_path.display());
                VideoOutcome::Skipped {
                    reason: error.to_string(),
                }
            }
        };

        reports.push(VideoReport {
            video_path,
            outcome,
        });
    }

    log::info!(
        "All processing complete, output files are under {}",
        output_dir.display(),
    );

    Ok(BatchSummary {
        reports,
        output_dir,
    })
}

/// Detect and extract one video.
fn split_video(
    video_path: &Path,
    output_dir: &Path,
    detection: &DetectionOptions,
    diagnostics: DiagnosticsMode,
    tool: &FfmpegTool,
    options: &PipelineOptions,
) -> Result<(usize, ExtractionReport), SplitError> {
    let scenes = detect_scenes(video_path, detection, options)?;
    let scene_count = scenes.len();

    let job = ExtractionJob {
        video_path: video_path.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        scenes,
        diagnostics,
    };

    let report = extract_split_audio(tool, &job, options)?;
    Ok((scene_count, report))
}
