//! Frame-accurate points in time.
//!
//! A [`Timecode`] names one instant in a video as a frame index plus the
//! video's frame rate. Subtracting an earlier timecode from a later one
//! yields a [`std::time::Duration`], and both render as `HH:MM:SS.mmm` — the
//! exact format the external ffmpeg invocation expects for its `-ss` and
//! `-t` arguments.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Sub,
    time::Duration,
};

use crate::error::SplitError;

/// An immutable point in time within a video.
///
/// Stored as `(frame index, frames per second)` so positions remain
/// frame-exact; wall-clock values are derived on demand. Timecodes are only
/// meaningful relative to other timecodes of the same video, so comparisons
/// assume a shared frame rate.
///
/// # Example
///
/// ```
/// use lecturesplit::Timecode;
///
/// let start = Timecode::new(150, 25.0).unwrap();
/// assert_eq!(start.timecode(), "00:00:06.000");
/// assert_eq!(start.as_secs_f64(), 6.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timecode {
    frame: u64,
    frames_per_second: f64,
}

impl Timecode {
    /// Create a timecode at `frame` in a video running at
    /// `frames_per_second`.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfiguration`] if the frame rate is not
    /// a positive finite number.
    pub fn new(frame: u64, frames_per_second: f64) -> Result<Self, SplitError> {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(SplitError::InvalidConfiguration(format!(
                "frame rate must be positive, got {frames_per_second}"
            )));
        }

        Ok(Self {
            frame,
            frames_per_second,
        })
    }

    /// The frame index this timecode refers to.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The frame rate this timecode was created with.
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// Elapsed time from the start of the video, in seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.frame as f64 / self.frames_per_second
    }

    /// Elapsed time from the start of the video.
    pub fn to_duration(&self) -> Duration {
        Duration::from_secs_f64(self.as_secs_f64())
    }

    /// Elapsed time since `earlier`, saturating to zero if `earlier` is in
    /// fact later.
    pub fn duration_since(&self, earlier: &Timecode) -> Duration {
        self.to_duration().saturating_sub(earlier.to_duration())
    }

    /// Render as `HH:MM:SS.mmm` (milliseconds rounded).
    pub fn timecode(&self) -> String {
        format_timecode(self.to_duration())
    }
}

impl Display for Timecode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.timecode())
    }
}

impl Sub for Timecode {
    type Output = Duration;

    fn sub(self, earlier: Timecode) -> Duration {
        self.duration_since(&earlier)
    }
}

/// Format a duration as `HH:MM:SS.mmm`, the timecode format of the external
/// ffmpeg invocation. Hours wider than two digits are not truncated.
pub fn format_timecode(duration: Duration) -> String {
    let total_milliseconds = duration.as_secs() * 1_000 + u64::from(duration.subsec_millis())
        // Round half-up on the sub-millisecond remainder.
        + u64::from(duration.subsec_micros() % 1_000 >= 500);

    let milliseconds = total_milliseconds % 1_000;
    let total_seconds = total_milliseconds / 1_000;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3_600;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_frame_rate() {
        assert!(Timecode::new(0, 0.0).is_err());
        assert!(Timecode::new(0, -25.0).is_err());
        assert!(Timecode::new(0, f64::NAN).is_err());
    }

    #[test]
    fn formats_hours_minutes_seconds_millis() {
        let timecode = Timecode::new(90_061 * 25 + 13, 25.0).unwrap();
        // 90061 s = 25 h 1 min 1 s; 13 frames at 25 fps = 520 ms.
        assert_eq!(timecode.timecode(), "25:01:01.520");
    }

    #[test]
    fn subtraction_saturates() {
        let early = Timecode::new(100, 25.0).unwrap();
        let late = Timecode::new(200, 25.0).unwrap();
        assert_eq!(late - early, Duration::from_secs(4));
        assert_eq!(early - late, Duration::ZERO);
    }

    #[test]
    fn format_timecode_rounds_sub_millisecond() {
        assert_eq!(
            format_timecode(Duration::from_micros(1_000_500)),
            "00:00:01.001"
        );
        assert_eq!(
            format_timecode(Duration::from_micros(1_000_499)),
            "00:00:01.000"
        );
    }
}
