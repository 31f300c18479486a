use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::interpolate::{interpolate, Direction};
use crate::state::ParameterState;

/// An explicit parameter snapshot anchored at a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i64,
    pub state: ParameterState,
}

impl Keyframe {
    pub fn new(frame: i64, state: ParameterState) -> Self {
        Self { frame, state }
    }
}

/// Ordered keyframes plus playback bounds, frame rate and the direction
/// cyclical fields travel between keyframes.
///
/// Keyframes are always sorted ascending by frame and frame numbers are
/// unique: adding at an occupied frame replaces that keyframe's state.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    keyframes: Vec<Keyframe>,
    start_override: Option<i64>,
    end_override: Option<i64>,
    frame_rate: f64,
    direction: Direction,
}

impl Timeline {
    pub const DEFAULT_FRAME_RATE: f64 = 30.0;

    pub fn new() -> Self {
        Self {
            keyframes: Vec::new(),
            start_override: None,
            end_override: None,
            frame_rate: Self::DEFAULT_FRAME_RATE,
            direction: Direction::Forward,
        }
    }

    /// Build from keyframes in any order. Later duplicates win.
    pub fn from_keyframes(keyframes: impl IntoIterator<Item = Keyframe>) -> Self {
        let mut timeline = Self::new();
        for kf in keyframes {
            timeline.add_keyframe(kf);
        }
        timeline
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_frame_rate(mut self, fps: f64) -> crate::Result<Self> {
        self.set_frame_rate(fps)?;
        Ok(self)
    }

    // -- keyframe editing --------------------------------------------------

    /// Insert a keyframe, or overwrite the state of the keyframe already at
    /// that frame.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) {
        match self.keyframes.binary_search_by_key(&keyframe.frame, |k| k.frame) {
            Ok(idx) => {
                debug!(frame = keyframe.frame, "Replacing keyframe state");
                self.keyframes[idx].state = keyframe.state;
            }
            Err(idx) => {
                debug!(frame = keyframe.frame, index = idx, "Inserting keyframe");
                self.keyframes.insert(idx, keyframe);
            }
        }
    }

    /// Remove the keyframe at `frame`, if any.
    pub fn remove_keyframe(&mut self, frame: i64) -> Option<Keyframe> {
        let idx = self.position(frame)?;
        Some(self.keyframes.remove(idx))
    }

    /// Remove the keyframe at `index`. Out-of-range indices are a no-op.
    pub fn remove_keyframe_at(&mut self, index: usize) -> Option<Keyframe> {
        if index >= self.keyframes.len() {
            return None;
        }
        Some(self.keyframes.remove(index))
    }

    /// Re-time the keyframe at `index`. If another keyframe already sits at
    /// `new_frame`, the moved keyframe replaces it.
    pub fn move_keyframe(&mut self, index: usize, new_frame: i64) -> bool {
        let Some(mut kf) = self.remove_keyframe_at(index) else {
            return false;
        };
        kf.frame = new_frame;
        self.add_keyframe(kf);
        true
    }

    /// Copy the non-animated fields (dimensions, seed, render type) of
    /// `source` into every keyframe.
    pub fn sync_static_fields(&mut self, source: &ParameterState) -> crate::Result<()> {
        for kf in &mut self.keyframes {
            kf.state.set_width(source.width())?;
            kf.state.set_height(source.height())?;
            kf.state.set_seed(source.seed())?;
            kf.state.set_render_type(source.render_type());
        }
        Ok(())
    }

    // -- queries -----------------------------------------------------------

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Index of the keyframe at `frame`.
    pub fn position(&self, frame: i64) -> Option<usize> {
        self.keyframes
            .binary_search_by_key(&frame, |k| k.frame)
            .ok()
    }

    pub fn keyframe(&self, frame: i64) -> Option<&Keyframe> {
        self.position(frame).map(|idx| &self.keyframes[idx])
    }

    /// The last keyframe at or before `frame`, or the first keyframe when
    /// `frame` precedes all of them. Used to snap a playhead to a key.
    pub fn keyframe_at_or_before(&self, frame: i64) -> Option<&Keyframe> {
        let idx = self.keyframes.partition_point(|k| k.frame <= frame);
        self.keyframes.get(idx.saturating_sub(1))
    }

    /// Playback start: the override if set, else the first keyframe. An
    /// empty timeline always starts at 0.
    pub fn start_frame(&self) -> i64 {
        match self.keyframes.first() {
            Some(first) => self.start_override.unwrap_or(first.frame),
            None => 0,
        }
    }

    /// Playback end: the override if set, else the last keyframe. An empty
    /// timeline always ends at 0.
    pub fn end_frame(&self) -> i64 {
        match self.keyframes.last() {
            Some(last) => self.end_override.unwrap_or(last.frame),
            None => 0,
        }
    }

    /// Override the playback start. `None` restores the first keyframe.
    pub fn set_start_frame(&mut self, frame: Option<i64>) {
        self.start_override = frame;
    }

    /// Override the playback end. `None` restores the last keyframe.
    pub fn set_end_frame(&mut self, frame: Option<i64>) {
        self.end_override = frame;
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Rejects rates that are not positive and finite, and rates so low that
    /// one frame would not fit in a [`Duration`].
    pub fn set_frame_rate(&mut self, fps: f64) -> crate::Result<()> {
        if !fps.is_finite() || fps <= 0.0 || Duration::try_from_secs_f64(fps.recip()).is_err() {
            return Err(CoreError::InvalidFrameRate(fps));
        }
        self.frame_rate = fps;
        Ok(())
    }

    /// Wall-clock time per frame for a playback driver.
    pub fn frame_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.frame_rate.recip()).unwrap_or(Duration::MAX)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    // -- sampling ----------------------------------------------------------

    /// Parameter state at `frame`.
    ///
    /// Returns `Ok(None)` for an empty timeline. Frames outside the keyed
    /// range hold the first/last keyframe's state; frames in between are
    /// interpolated between the bracketing pair.
    pub fn sample(&self, frame: i64) -> crate::Result<Option<ParameterState>> {
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return Ok(None);
        };
        if frame <= first.frame {
            return Ok(Some(first.state.clone()));
        }
        if frame >= last.frame {
            return Ok(Some(last.state.clone()));
        }

        // first.frame < frame < last.frame, so 1 <= idx < len.
        let idx = self.keyframes.partition_point(|k| k.frame <= frame);
        let a = &self.keyframes[idx - 1];
        let b = &self.keyframes[idx];
        if a.frame == frame {
            return Ok(Some(a.state.clone()));
        }

        // Widen before subtracting: keys may sit anywhere in the i64 range.
        let span = i128::from(b.frame) - i128::from(a.frame);
        let offset = i128::from(frame) - i128::from(a.frame);
        let t = if span == 0 {
            0.0
        } else {
            offset as f64 / span as f64
        };
        interpolate(&a.state, &b.state, t, self.direction).map(Some)
    }

    /// Every frame from `start_frame()` to `end_frame()` inclusive with its
    /// sampled state. Yields nothing for an empty timeline.
    pub fn frames(&self) -> impl Iterator<Item = crate::Result<(i64, ParameterState)>> + '_ {
        let range = if self.is_empty() {
            1..=0
        } else {
            self.start_frame()..=self.end_frame()
        };
        range.filter_map(move |frame| {
            self.sample(frame)
                .transpose()
                .map(|state| state.map(|s| (frame, s)))
        })
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn state_at(time: f64) -> ParameterState {
        ParameterState::new(64, 48, 3)
            .unwrap()
            .with_time_of_day(time)
            .unwrap()
    }

    fn timeline() -> Timeline {
        Timeline::from_keyframes([
            Keyframe::new(100, state_at(10.0)),
            Keyframe::new(0, state_at(2.0)),
            Keyframe::new(50, state_at(6.0)),
        ])
    }

    #[test]
    fn keyframes_are_sorted() {
        let tl = timeline();
        let frames: Vec<_> = tl.keyframes().iter().map(|k| k.frame).collect();
        assert_eq!(frames, [0, 50, 100]);
    }

    #[test]
    fn duplicate_frame_overwrites() {
        let mut tl = timeline();
        tl.add_keyframe(Keyframe::new(50, state_at(7.0)));
        assert_eq!(tl.len(), 3);
        assert!((tl.keyframe(50).unwrap().state.time_of_day() - 7.0).abs() < EPSILON);
    }

    #[test]
    fn empty_timeline() {
        let tl = Timeline::new();
        assert_eq!(tl.start_frame(), 0);
        assert_eq!(tl.end_frame(), 0);
        assert_eq!(tl.sample(10).unwrap(), None);
        assert_eq!(tl.frames().count(), 0);
    }

    #[test]
    fn sampling_clamps_outside_keys() {
        let tl = timeline();
        assert_eq!(tl.sample(-20).unwrap().unwrap(), tl.keyframes()[0].state);
        assert_eq!(tl.sample(0).unwrap().unwrap(), tl.keyframes()[0].state);
        assert_eq!(tl.sample(100).unwrap().unwrap(), tl.keyframes()[2].state);
        assert_eq!(tl.sample(5000).unwrap().unwrap(), tl.keyframes()[2].state);
    }

    #[test]
    fn sampling_interpolates_between_keys() {
        let tl = timeline();
        let s = tl.sample(25).unwrap().unwrap();
        assert!((s.time_of_day() - 4.0).abs() < EPSILON);
        let s = tl.sample(75).unwrap().unwrap();
        assert!((s.time_of_day() - 8.0).abs() < EPSILON);
        let s = tl.sample(50).unwrap().unwrap();
        assert_eq!(s, tl.keyframes()[1].state);
    }

    #[test]
    fn direction_applies_to_sampling() {
        let tl = Timeline::from_keyframes([
            Keyframe::new(0, state_at(2.0)),
            Keyframe::new(10, state_at(6.0)),
        ])
        .with_direction(Direction::Backward);
        // backward from 2 to 6 travels 20 hours: 2 - 10 = -8 -> 16
        let s = tl.sample(5).unwrap().unwrap();
        assert!((s.time_of_day() - 16.0).abs() < EPSILON);
    }

    #[test]
    fn removal() {
        let mut tl = timeline();
        let before = tl.clone();
        assert!(tl.remove_keyframe_at(3).is_none());
        assert!(tl.remove_keyframe(42).is_none());
        assert_eq!(tl, before);

        let removed = tl.remove_keyframe(50).unwrap();
        assert_eq!(removed.frame, 50);
        assert_eq!(tl.len(), 2);
        let removed = tl.remove_keyframe_at(0).unwrap();
        assert_eq!(removed.frame, 0);
        assert_eq!(tl.start_frame(), 100);
    }

    #[test]
    fn bounds_can_be_overridden_independently() {
        let mut tl = timeline();
        tl.set_end_frame(Some(120));
        assert_eq!(tl.start_frame(), 0);
        assert_eq!(tl.end_frame(), 120);
        tl.set_start_frame(Some(10));
        tl.set_end_frame(None);
        assert_eq!(tl.start_frame(), 10);
        assert_eq!(tl.end_frame(), 100);
    }

    #[test]
    fn frames_cover_playback_range() {
        let mut tl = timeline();
        tl.set_start_frame(Some(90));
        tl.set_end_frame(Some(105));
        let frames: Vec<_> = tl.frames().map(|r| r.unwrap()).collect();
        assert_eq!(frames.len(), 16);
        assert_eq!(frames[0].0, 90);
        assert_eq!(frames[15].0, 105);
        assert_eq!(frames[15].1, tl.keyframes()[2].state);
    }

    #[test]
    fn move_keyframe_keeps_order_and_uniqueness() {
        let mut tl = timeline();
        assert!(tl.move_keyframe(0, 200));
        let frames: Vec<_> = tl.keyframes().iter().map(|k| k.frame).collect();
        assert_eq!(frames, [50, 100, 200]);

        assert!(tl.move_keyframe(0, 100));
        assert_eq!(tl.len(), 2);
        assert!((tl.keyframe(100).unwrap().state.time_of_day() - 6.0).abs() < EPSILON);

        assert!(!tl.move_keyframe(9, 0));
    }

    #[test]
    fn keyframe_snapping() {
        let tl = timeline();
        assert_eq!(tl.keyframe_at_or_before(-5).unwrap().frame, 0);
        assert_eq!(tl.keyframe_at_or_before(49).unwrap().frame, 0);
        assert_eq!(tl.keyframe_at_or_before(50).unwrap().frame, 50);
        assert_eq!(tl.keyframe_at_or_before(1000).unwrap().frame, 100);
        assert!(Timeline::new().keyframe_at_or_before(0).is_none());
    }

    #[test]
    fn frame_rate_validation() {
        let mut tl = Timeline::new();
        assert_eq!(tl.frame_rate(), 30.0);
        assert!(tl.set_frame_rate(0.0).is_err());
        assert!(tl.set_frame_rate(f64::NAN).is_err());
        tl.set_frame_rate(25.0).unwrap();
        assert_eq!(tl.frame_duration(), Duration::from_millis(40));
    }

    #[test]
    fn sync_static_fields_updates_every_keyframe() {
        let mut tl = timeline();
        let source = ParameterState::new(1280, 720, 999)
            .unwrap()
            .with_render_type(crate::RenderType::Flat);
        tl.sync_static_fields(&source).unwrap();
        for kf in tl.keyframes() {
            assert_eq!(kf.state.width(), 1280);
            assert_eq!(kf.state.height(), 720);
            assert_eq!(kf.state.seed(), 999);
            assert_eq!(kf.state.render_type(), crate::RenderType::Flat);
        }
        assert!((tl.keyframes()[2].state.time_of_day() - 10.0).abs() < EPSILON);
    }

    #[test]
    fn frame_rate_too_low_for_a_duration_is_rejected() {
        let mut tl = Timeline::new();
        assert_eq!(tl.set_frame_rate(1e-30), Err(CoreError::InvalidFrameRate(1e-30)));
        assert_eq!(tl.frame_rate(), Timeline::DEFAULT_FRAME_RATE);
        assert_eq!(tl.frame_duration(), Duration::from_secs_f64(1.0 / 30.0));

        tl.set_frame_rate(0.5).unwrap();
        assert_eq!(tl.frame_duration(), Duration::from_secs(2));
    }

    #[test]
    fn sampling_keys_at_the_ends_of_the_frame_range() {
        let a = state_at(0.0).with_star_density(1.0).unwrap();
        let b = state_at(0.0).with_star_density(3.0).unwrap();
        let tl = Timeline::from_keyframes([
            Keyframe::new(i64::MIN, a.clone()),
            Keyframe::new(i64::MAX, b.clone()),
        ]);

        let mid = tl.sample(0).unwrap().unwrap();
        assert!((mid.star_density() - 2.0).abs() < 1e-6);
        assert_eq!(tl.sample(i64::MIN).unwrap().unwrap(), a);
        assert_eq!(tl.sample(i64::MAX).unwrap().unwrap(), b);

        let near_end = tl.sample(i64::MAX - 1).unwrap().unwrap();
        assert!(near_end.star_density() >= mid.star_density());
    }

    #[test]
    fn bound_overrides_are_ignored_while_empty() {
        let mut tl = Timeline::new();
        tl.set_start_frame(Some(10));
        tl.set_end_frame(Some(20));
        assert_eq!(tl.start_frame(), 0);
        assert_eq!(tl.end_frame(), 0);
        assert_eq!(tl.frames().count(), 0);

        tl.add_keyframe(Keyframe::new(15, state_at(1.0)));
        assert_eq!(tl.start_frame(), 10);
        assert_eq!(tl.end_frame(), 20);
    }
}
