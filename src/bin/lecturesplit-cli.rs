use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use lecturesplit::{
    DetectionOptions, DiagnosticsMode, FfmpegTool, OperationType, PipelineOptions,
    ProgressCallback, ProgressInfo, VideoOutcome, process_directory,
};

const CLI_AFTER_HELP: &str = "Examples:\n  lecturesplit input output\n  lecturesplit input output --scene-detection-threshold 8 --min-scene-length 150\n  lecturesplit input output --show-ffmpeg-output --progress\n  lecturesplit --completions zsh > _lecturesplit";

#[derive(Debug, Parser)]
#[command(
    name = "lecturesplit",
    version,
    about = "Split lecture videos at slide changes and export per-scene audio",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input directory containing the video files to process.
    #[arg(required_unless_present = "completions")]
    input_dir: Option<PathBuf>,

    /// Output directory; one sub-directory per video is created here.
    #[arg(required_unless_present = "completions")]
    output_dir: Option<PathBuf>,

    /// Threshold for slide change detection; 1 is very sensitive, 30 is
    /// very insensitive.
    #[arg(long, default_value_t = 5.0)]
    scene_detection_threshold: f64,

    /// Minimum scene length, in sampled frames.
    #[arg(long, default_value_t = 100)]
    min_scene_length: u64,

    /// Number of frames to skip between samples, speeding up detection at
    /// the expense of accuracy.
    #[arg(long, default_value_t = 5)]
    frame_skip: u64,

    /// Show ffmpeg's own output (and stop a video's extraction at the
    /// first failing segment).
    #[arg(long)]
    show_ffmpeg_output: bool,

    /// Explicit path to the ffmpeg binary instead of searching PATH.
    #[arg(long)]
    ffmpeg_path: Option<PathBuf>,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Print the final summary as machine-readable JSON.
    #[arg(long)]
    json: bool,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Generate shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Bridges library progress callbacks onto an indicatif bar.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::no_length();
        bar.set_style(ProgressStyle::default_bar());
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let label = match info.operation {
            OperationType::SceneDetection => "detecting scenes",
            OperationType::AudioExtraction => "exporting audio",
            _ => unreachable!(),
        };
        self.bar.set_message(label);

        match info.total {
            Some(total) => {
                self.bar.set_length(total);
                self.bar.set_position(info.current);
            }
            None => self.bar.set_position(info.current),
        }
    }
}

fn print_summary(summary: &lecturesplit::BatchSummary) {
    for report in &summary.reports {
        match &report.outcome {
            VideoOutcome::Split {
                scene_count,
                report: extraction,
            } => {
                println!(
                    "{} {}: {} scene(s), {} file(s) written",
                    "split".green().bold(),
                    report.video_path.display(),
                    scene_count,
                    extraction.written.len(),
                );
                for failure in &extraction.failures {
                    println!(
                        "  {} scene {} failed (ffmpeg exit code {:?})",
                        "warning:".yellow().bold(),
                        failure.scene_number,
                        failure.exit_code,
                    );
                }
                if extraction.aborted {
                    println!(
                        "  {} remaining scenes were not attempted",
                        "warning:".yellow().bold(),
                    );
                }
            }
            VideoOutcome::Skipped { reason } => {
                println!(
                    "{} {}: {reason}",
                    "skipped".yellow().bold(),
                    report.video_path.display(),
                );
            }
        }
    }

    println!(
        "{} {} file(s) written, {} failure(s), {} video(s) skipped — output in {}",
        "done".green().bold(),
        summary.total_written(),
        summary.total_failures(),
        summary.skipped(),
        summary.output_dir.display(),
    );
}

fn print_summary_json(summary: &lecturesplit::BatchSummary) -> Result<(), serde_json::Error> {
    let videos: Vec<_> = summary
        .reports
        .iter()
        .map(|report| match &report.outcome {
            VideoOutcome::Split {
                scene_count,
                report: extraction,
            } => json!({
                "video": report.video_path,
                "status": "split",
                "scenes": scene_count,
                "written": extraction.written,
                "failures": extraction.failures.iter().map(|failure| json!({
                    "scene_number": failure.scene_number,
                    "exit_code": failure.exit_code,
                    "output_path": failure.output_path,
                })).collect::<Vec<_>>(),
                "aborted": extraction.aborted,
            }),
            VideoOutcome::Skipped { reason } => json!({
                "video": report.video_path,
                "status": "skipped",
                "reason": reason,
            }),
        })
        .collect();

    let payload = json!({
        "output_dir": summary.output_dir,
        "total_written": summary.total_written(),
        "total_failures": summary.total_failures(),
        "skipped": summary.skipped(),
        "videos": videos,
    });

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "lecturesplit", &mut std::io::stdout());
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.verbose { "debug" } else { "warn" },
    ))
    .init();

    // required_unless_present guarantees both are set past this point.
    let input_dir = cli.input_dir.ok_or("missing input directory")?;
    let output_dir = cli.output_dir.ok_or("missing output directory")?;

    let detection = DetectionOptions::new()
        .with_threshold(cli.scene_detection_threshold)
        .with_min_scene_length(cli.min_scene_length)
        .with_frame_skip(cli.frame_skip);
    detection.validate()?;

    // Resolve the external tool before touching any video.
    let tool = match &cli.ffmpeg_path {
        Some(path) => FfmpegTool::at_path(path)?,
        None => FfmpegTool::resolve()?,
    };

    let diagnostics = if cli.show_ffmpeg_output {
        DiagnosticsMode::Verbose
    } else {
        DiagnosticsMode::Suppressed
    };

    let mut options = PipelineOptions::new();
    if cli.progress {
        options = options.with_progress(Arc::new(TerminalProgress::new()));
    }

    let summary = process_directory(
        &input_dir,
        &output_dir,
        &detection,
        diagnostics,
        &tool,
        &options,
    )?;

    if cli.json {
        print_summary_json(&summary)?;
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
