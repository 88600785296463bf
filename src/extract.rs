//! Per-scene audio extraction via the external `ffmpeg` binary.
//!
//! The orchestrator cuts one MP3 per scene out of the source video by
//! invoking `ffmpeg` as a blocking child process per segment:
//!
//! ```text
//! ffmpeg [-v quiet|error] -y -ss <start> -i <video> -strict -2 -t <duration> <out>
//! ```
//!
//! The tool is resolved explicitly up front ([`FfmpegTool`]) rather than
//! relying on ambient `PATH` mutation, and a missing binary fails the whole
//! run before any extraction is attempted.
//!
//! # Example
//!
//! ```no_run
//! use lecturesplit::{
//!     DiagnosticsMode, ExtractionJob, FfmpegTool, PipelineOptions, SceneList, SplitError,
//!     extract_split_audio,
//! };
//!
//! let tool = FfmpegTool::resolve()?;
//! let scenes = SceneList::from_cut_frames(&[150, 600], 1_000, 25.0)?;
//! let job = ExtractionJob {
//!     video_path: "lecture.mp4".into(),
//!     output_dir: "out".into(),
//!     scenes,
//!     diagnostics: DiagnosticsMode::Suppressed,
//! };
//!
//! let report = extract_split_audio(&tool, &job, &PipelineOptions::new())?;
//! println!("{} files written", report.written.len());
//! # Ok::<(), SplitError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    configuration::PipelineOptions,
    error::SplitError,
    progress::{OperationType, ProgressTracker},
    scene::SceneList,
    timecode::format_timecode,
};

/// File extension of the exported audio segments.
pub const AUDIO_EXTENSION: &str = "mp3";

/// A resolved handle to the external `ffmpeg` binary.
///
/// Resolution happens once, before any video is touched; absence of the
/// tool is a hard failure for the whole run.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    path: PathBuf,
}

impl FfmpegTool {
    /// Locate `ffmpeg` on the executable search path.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::ToolNotFound`] when no `ffmpeg` binary
    /// resolves.
    pub fn resolve() -> Result<Self, SplitError> {
        let path = which::which("ffmpeg").map_err(|_| SplitError::ToolNotFound {
            hint: "searched the executable search path".to_string(),
        })?;

        log::debug!("Resolved ffmpeg at {}", path.display());
        Ok(Self { path })
    }

    /// Use an explicitly configured binary path.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::ToolNotFound`] when no file exists at `path`.
    pub fn at_path<P: Into<PathBuf>>(path: P) -> Result<Self, SplitError> {
        let path = path.into();
        if !path.is_file() {
            return Err(SplitError::ToolNotFound {
                hint: format!("no file at {}", path.display()),
            });
        }

        Ok(Self { path })
    }

    /// The resolved binary path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// How much of ffmpeg's diagnostic output to surface, and the matching
/// per-segment failure policy.
///
/// The asymmetry is deliberate: verbose runs exist to diagnose systemic
/// problems, so the first failure stops the video; suppressed batch runs
/// favor maximal partial output, so failures are recorded and extraction
/// continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticsMode {
    /// Hide ffmpeg output for every segment; a failing segment is recorded
    /// and extraction continues. This is the default batch behavior.
    #[default]
    Suppressed,
    /// Show ffmpeg's full output for the first segment (errors only for the
    /// rest); the first failing segment aborts the remaining segments of
    /// that video.
    Verbose,
}

/// Everything needed to extract one video's scenes. Built once per video
/// and consumed by [`extract_split_audio`]; the scene list is not mutated.
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    /// Source video.
    pub video_path: PathBuf,
    /// Destination root; segment files go into `<output_dir>/<video_stem>/`.
    pub output_dir: PathBuf,
    /// The scenes to cut, contiguous and in playback order.
    pub scenes: SceneList,
    /// Diagnostic / failure policy.
    pub diagnostics: DiagnosticsMode,
}

/// One segment whose ffmpeg invocation returned a nonzero exit code.
#[derive(Debug, Clone)]
pub struct SegmentFailure {
    /// 1-based scene number.
    pub scene_number: usize,
    /// Exit code of the ffmpeg process, if it terminated normally.
    pub exit_code: Option<i32>,
    /// The file the segment would have been written to.
    pub output_path: PathBuf,
}

/// Outcome of one video's extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Segment files written successfully, in scene order.
    pub written: Vec<PathBuf>,
    /// Segments whose ffmpeg invocation failed.
    pub failures: Vec<SegmentFailure>,
    /// `true` when verbose-mode fail-fast stopped the remaining segments.
    pub aborted: bool,
}

impl ExtractionReport {
    /// `true` when every scene produced an output file.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }
}

/// Extract each scene's audio into `<output_dir>/<video_stem>/`.
///
/// Creates the per-video output directory idempotently, then invokes the
/// external tool once per scene, in order, blocking on each. Output files
/// are named `<video_stem>_<n>.mp3` with 1-based scene numbers, so a re-run
/// with a different detection result silently overwrites same-index files
/// and leaves stale higher-index files from earlier runs in place.
///
/// Per-segment failures follow the job's [`DiagnosticsMode`] policy and are
/// reported, not raised; see [`ExtractionReport`].
///
/// # Errors
///
/// Returns [`SplitError::VideoOpen`] for a video path without a usable file
/// stem, [`SplitError::Io`] when the output directory cannot be created or
/// the child process cannot be spawned, and [`SplitError::Cancelled`] when
/// the pipeline's cancellation token fires between segments.
pub fn extract_split_audio(
    tool: &FfmpegTool,
    job: &ExtractionJob,
    options: &PipelineOptions,
) -> Result<ExtractionReport, SplitError> {
    let stem = job
        .video_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| SplitError::VideoOpen {
            path: job.video_path.clone(),
            reason: "path has no usable file stem".to_string(),
        })?;

    let segment_dir = job.output_dir.join(stem);
    fs::create_dir_all(&segment_dir)?;

    let total_scenes = job.scenes.len();
    let mut report = ExtractionReport::default();
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::AudioExtraction,
        Some(total_scenes as u64),
        options.batch_size,
    );

    log::info!(
        "Exporting {total_scenes} scene(s) of {} to {}",
        job.video_path.display(),
        segment_dir.display(),
    );

    for (index, scene) in job.scenes.iter().enumerate() {
        if options.is_cancelled() {
            return Err(SplitError::Cancelled);
        }

        let scene_number = index + 1;
        let output_path = segment_dir.join(format!("{stem}_{scene_number}.{AUDIO_EXTENSION}"));

        let mut command = Command::new(tool.path());
        match job.diagnostics {
            DiagnosticsMode::Suppressed => {
                command.args(["-v", "quiet"]);
            }
            // First verbose call shows full output so systemic problems
            // (missing codec, broken input) surface; later calls only
            // report errors.
            DiagnosticsMode::Verbose if index > 0 => {
                command.args(["-v", "error"]);
            }
            DiagnosticsMode::Verbose => {}
        }

        command
            .arg("-y")
            .arg("-ss")
            .arg(scene.start.timecode())
            .arg("-i")
            .arg(&job.video_path)
            .args(["-strict", "-2"])
            .arg("-t")
            .arg(format_timecode(scene.duration()))
            .arg(&output_path);

        log::debug!(
            "Scene {scene_number}/{total_scenes}: {} -> {}",
            scene.start.timecode(),
            output_path.display(),
        );

        let status = command.status()?;

        if job.diagnostics == DiagnosticsMode::Verbose && index == 0 && total_scenes > 1 {
            log::info!("ffmpeg output for scene 1 shown above, splitting remaining scenes");
        }

        tracker.advance(None);

        if status.success() {
            report.written.push(output_path);
            continue;
        }

        let failure = SplitError::SegmentExtraction {
            video: job.video_path.clone(),
            scene_number,
            exit_code: status.code(),
        };
        log::warn!("{failure}");
        report.failures.push(SegmentFailure {
            scene_number,
            exit_code: status.code(),
            output_path,
        });

        if job.diagnostics == DiagnosticsMode::Verbose {
            report.aborted = true;
            break;
        }
    }

    tracker.finish();
    Ok(report)
}
