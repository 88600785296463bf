//! Sequential frame scanning and scoring.
//!
//! [`FrameScanner`] opens a video exactly once, decodes it in playback
//! order, downscales every retained frame to a small grayscale plane, and
//! feeds it to the injected [`ContentScorer`]. It yields
//! [`FrameSample`]s lazily — each call to [`next()`](Iterator::next) decodes
//! just enough packets to produce the next retained frame — and releases all
//! decoding resources on drop, whether iteration finished, failed, or was
//! abandoned early.
//!
//! # Example
//!
//! ```no_run
//! use lecturesplit::{DetectionOptions, FrameScanner, LumaDiffScorer, SplitError};
//!
//! let options = DetectionOptions::new();
//! let mut scanner = FrameScanner::open(
//!     "lecture.mp4",
//!     &options,
//!     Box::new(LumaDiffScorer::new()),
//! )?;
//!
//! for sample in &mut scanner {
//!     let sample = sample?;
//!     println!("sample {} scored {:.2}", sample.index, sample.score);
//! }
//! # Ok::<(), SplitError>(())
//! ```

use std::path::Path;

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};

use crate::{
    configuration::DetectionOptions,
    detector::{ContentScorer, FrameView},
    error::SplitError,
};

/// Width of the downscaled grayscale plane handed to the scorer.
///
/// Matches the normalisation ffmpeg's own scene filters use; height follows
/// the source aspect ratio.
const DOWNSCALE_WIDTH: u32 = 320;

/// Consecutive packet-read failures tolerated before the scan is aborted.
///
/// Transient read errors (e.g. `EAGAIN`) are retried; a corrupt or
/// truncated container that fails every read must not spin forever.
const MAX_READ_FAILURES: u32 = 64;

/// One retained, scored frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Sampled ordinal: 0 for the first retained frame, then consecutive.
    /// This is the unit the scene detector operates in.
    pub index: u64,
    /// Decode-order frame number in the source video.
    pub source_frame: u64,
    /// Change score reported by the scorer.
    pub score: f64,
}

/// A lazy, single-pass scanner over a video's frames.
///
/// Not restartable: decoding is sequential and consumed once. Create a new
/// scanner to scan again.
pub struct FrameScanner {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    scorer: Box<dyn ContentScorer>,
    video_stream_index: usize,
    frames_per_second: f64,
    estimated_frames: u64,
    stride: u64,
    /// Decode-order index of the next frame the decoder will hand us.
    next_source_frame: u64,
    samples_read: u64,
    consecutive_read_failures: u32,
    decoded_frame: VideoFrame,
    scaled_frame: VideoFrame,
    eof_sent: bool,
    done: bool,
}

impl FrameScanner {
    /// Open `path` for scanning.
    ///
    /// Initializes FFmpeg (idempotent), opens the file once, locates the
    /// best video stream, and sets up the decoder and the downscaling
    /// converter.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfiguration`] for invalid options and
    /// [`SplitError::VideoOpen`] if the file cannot be opened, has no video
    /// stream, or reports no usable frame rate.
    pub fn open<P: AsRef<Path>>(
        path: P,
        options: &DetectionOptions,
        scorer: Box<dyn ContentScorer>,
    ) -> Result<Self, SplitError> {
        options.validate()?;

        let path = path.as_ref();
        let open_error = |reason: String| SplitError::VideoOpen {
            path: path.to_path_buf(),
            reason,
        };

        log::debug!("Opening video for scanning: {}", path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or_else(|| open_error("no video stream found".to_string()))?;
        let video_stream_index = stream.index();

        // Average frame rate, falling back to the stream's rate field.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        if frames_per_second <= 0.0 {
            return Err(open_error("stream reports no usable frame rate".to_string()));
        }

        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)
            .map_err(|error| open_error(format!("failed to read codec parameters: {error}")))?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| open_error(format!("failed to create video decoder: {error}")))?;

        if decoder.width() == 0 || decoder.height() == 0 {
            return Err(open_error("video stream reports zero dimensions".to_string()));
        }

        // Downscale to a fixed-width grayscale plane for scoring.
        let target_width = DOWNSCALE_WIDTH.min(decoder.width());
        let target_height = ((decoder.height() as u64 * u64::from(target_width))
            / u64::from(decoder.width()))
        .max(1) as u32;

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::GRAY8,
            target_width,
            target_height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| open_error(format!("failed to create frame scaler: {error}")))?;

        let duration_microseconds = input_context.duration();
        let estimated_frames = if duration_microseconds > 0 {
            (duration_microseconds as f64 / 1_000_000.0 * frames_per_second) as u64
        } else {
            0
        };

        log::debug!(
            "Scanning {} at {frames_per_second:.3} fps ({}x{} -> {target_width}x{target_height}, stride {})",
            path.display(),
            decoder.width(),
            decoder.height(),
            options.stride(),
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            scorer,
            video_stream_index,
            frames_per_second,
            estimated_frames,
            stride: options.stride(),
            next_source_frame: 0,
            samples_read: 0,
            consecutive_read_failures: 0,
            decoded_frame: VideoFrame::empty(),
            scaled_frame: VideoFrame::empty(),
            eof_sent: false,
            done: false,
        })
    }

    /// The source frame rate.
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// Source frames decoded so far. After exhaustion this is the total
    /// frame count of the video.
    pub fn frames_read(&self) -> u64 {
        self.next_source_frame
    }

    /// Samples yielded so far.
    pub fn samples_read(&self) -> u64 {
        self.samples_read
    }

    /// Estimated number of samples this scanner will yield, derived from
    /// the container duration. Zero when the container reports none.
    pub fn estimated_samples(&self) -> u64 {
        self.estimated_frames / self.stride
    }

    /// Fetch the next retained sample, or `None` when the video is
    /// exhausted. Convenience around [`Iterator::next`] for `?`-style use.
    pub fn try_next(&mut self) -> Result<Option<FrameSample>, SplitError> {
        self.next().transpose()
    }

    /// Downscale the current decoded frame and hand it to the scorer.
    fn score_current_frame(&mut self, source_frame: u64) -> Result<f64, SplitError> {
        self.scaler
            .run(&self.decoded_frame, &mut self.scaled_frame)
            .map_err(|error| SplitError::FrameDecode {
                frame: source_frame,
                reason: format!("frame scaling failed: {error}"),
            })?;

        let view = FrameView {
            width: self.scaled_frame.width(),
            height: self.scaled_frame.height(),
            stride: self.scaled_frame.stride(0),
            data: self.scaled_frame.data(0),
        };

        Ok(self.scorer.score(view))
    }

    /// Path-independent decode error with frame context.
    fn decode_error(&self, error: FfmpegError) -> SplitError {
        SplitError::FrameDecode {
            frame: self.next_source_frame,
            reason: error.to_string(),
        }
    }
}

impl Iterator for FrameScanner {
    type Item = Result<FrameSample, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            // Try to receive a frame the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                let source_frame = self.next_source_frame;
                let retained = source_frame % self.stride == 0;
                self.next_source_frame += 1;

                if !retained {
                    continue;
                }

                match self.score_current_frame(source_frame) {
                    Ok(score) => {
                        let sample = FrameSample {
                            index: self.samples_read,
                            source_frame,
                            score,
                        };
                        self.samples_read += 1;
                        return Some(Ok(sample));
                    }
                    Err(error) => {
                        self.done = true;
                        return Some(Err(error));
                    }
                }
            }

            // Decoder has no buffered frames. Feed it more packets.
            if self.eof_sent {
                // Already sent EOF and decoder is drained.
                self.done = true;
                return None;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    self.consecutive_read_failures = 0;
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            self.done = true;
                            return Some(Err(self.decode_error(error)));
                        }
                    }
                    // Non-video packets are silently skipped.
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        self.done = true;
                        return Some(Err(self.decode_error(error)));
                    }
                    self.eof_sent = true;
                }
                Err(error) => {
                    // Transient read errors are retried; a stream that
                    // fails every read is treated as corrupt.
                    self.consecutive_read_failures += 1;
                    if self.consecutive_read_failures >= MAX_READ_FAILURES {
                        self.done = true;
                        return Some(Err(self.decode_error(error)));
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for FrameScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScanner")
            .field("video_stream_index", &self.video_stream_index)
            .field("frames_per_second", &self.frames_per_second)
            .field("stride", &self.stride)
            .field("frames_read", &self.next_source_frame)
            .field("samples_read", &self.samples_read)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
