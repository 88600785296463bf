//! Scenes and scene lists.
//!
//! A [`Scene`] is one contiguous perceptual segment of a video, bounded by a
//! start and end [`Timecode`]. A [`SceneList`] is the ordered, gap-free,
//! non-overlapping sequence of scenes covering a whole video; it is produced
//! from detector cut frames by [`SceneList::from_cut_frames`] and consumed
//! by the extraction orchestrator.

use std::time::Duration;

use crate::{error::SplitError, timecode::Timecode};

/// One contiguous scene: `start` inclusive, `end` exclusive, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    /// First frame of the scene.
    pub start: Timecode,
    /// One past the last frame of the scene (equals the next scene's start).
    pub end: Timecode,
}

impl Scene {
    /// Length of the scene.
    pub fn duration(&self) -> Duration {
        self.end.duration_since(&self.start)
    }
}

/// An ordered, contiguous, non-overlapping list of scenes.
///
/// Invariants (validated at construction, violations fail loudly with
/// [`SplitError::InvariantViolation`]):
///
/// - `scene[i].end == scene[i + 1].start` for all `i`
/// - the first scene starts at frame 0
/// - the last scene ends at the final frame of the video
///
/// # Example
///
/// ```
/// use lecturesplit::SceneList;
///
/// // Cuts at frames 150 and 600 of a 1000-frame video at 25 fps.
/// let scenes = SceneList::from_cut_frames(&[150, 600], 1_000, 25.0).unwrap();
/// assert_eq!(scenes.len(), 3);
/// assert_eq!(scenes.scenes()[1].start.timecode(), "00:00:06.000");
/// assert_eq!(scenes.scenes()[2].end.timecode(), "00:00:40.000");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SceneList {
    scenes: Vec<Scene>,
}

impl SceneList {
    /// Build a scene list from detected cut frames.
    ///
    /// `cuts` are the frame indices at which the detector declared a scene
    /// change, strictly increasing and strictly inside `(0, end_frame)`.
    /// Frame 0 and `end_frame` (one past the last frame of the video) are
    /// implicit boundaries: an empty `cuts` yields exactly one scene
    /// spanning the whole video, and `end_frame == 0` yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfiguration`] for a non-positive frame
    /// rate and [`SplitError::InvariantViolation`] if the cut sequence is
    /// not strictly increasing within `(0, end_frame)` — that indicates a
    /// detector logic fault, not bad user input.
    pub fn from_cut_frames(
        cuts: &[u64],
        end_frame: u64,
        frames_per_second: f64,
    ) -> Result<Self, SplitError> {
        if end_frame == 0 {
            return Ok(Self { scenes: Vec::new() });
        }

        let mut boundaries = Vec::with_capacity(cuts.len() + 2);
        boundaries.push(0);
        boundaries.extend_from_slice(cuts);
        boundaries.push(end_frame);

        for pair in boundaries.windows(2) {
            if pair[0] >= pair[1] {
                return Err(SplitError::InvariantViolation {
                    details: format!(
                        "boundary frames must be strictly increasing, got {} then {} \
                         (cuts: {cuts:?}, end frame: {end_frame})",
                        pair[0], pair[1]
                    ),
                });
            }
        }

        let scenes = boundaries
            .windows(2)
            .map(|pair| {
                Ok(Scene {
                    start: Timecode::new(pair[0], frames_per_second)?,
                    end: Timecode::new(pair[1], frames_per_second)?,
                })
            })
            .collect::<Result<Vec<_>, SplitError>>()?;

        let list = Self { scenes };
        list.validate(end_frame)?;
        Ok(list)
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// `true` if the list holds no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// The scenes, in playback order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Iterate over the scenes in playback order.
    pub fn iter(&self) -> std::slice::Iter<'_, Scene> {
        self.scenes.iter()
    }

    /// Assert contiguity, non-overlap, and full coverage of `[0, end_frame)`.
    fn validate(&self, end_frame: u64) -> Result<(), SplitError> {
        let Some(first) = self.scenes.first() else {
            return Ok(());
        };

        if first.start.frame() != 0 {
            return Err(SplitError::InvariantViolation {
                details: format!(
                    "first scene starts at frame {}, expected 0",
                    first.start.frame()
                ),
            });
        }

        for (index, pair) in self.scenes.windows(2).enumerate() {
            if pair[0].end.frame() != pair[1].start.frame() {
                return Err(SplitError::InvariantViolation {
                    details: format!(
                        "scene {} ends at frame {} but scene {} starts at frame {}",
                        index + 1,
                        pair[0].end.frame(),
                        index + 2,
                        pair[1].start.frame()
                    ),
                });
            }
        }

        for (index, scene) in self.scenes.iter().enumerate() {
            if scene.start.frame() >= scene.end.frame() {
                return Err(SplitError::InvariantViolation {
                    details: format!(
                        "scene {} is empty or inverted ({} >= {})",
                        index + 1,
                        scene.start.frame(),
                        scene.end.frame()
                    ),
                });
            }
        }

        let last = self.scenes.last().unwrap_or(first);
        if last.end.frame() != end_frame {
            return Err(SplitError::InvariantViolation {
                details: format!(
                    "last scene ends at frame {}, expected {end_frame}",
                    last.end.frame()
                ),
            });
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a SceneList {
    type Item = &'a Scene;
    type IntoIter = std::slice::Iter<'a, Scene>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}
