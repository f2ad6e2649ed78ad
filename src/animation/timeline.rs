// SPDX-License-Identifier: GPL-3.0-only

//! Keyframe timeline state machine.
//!
//! A [`TransformAnimation`] owns an ordered sequence of
//! [`TransformFrame`]s and advances through them by wall-clock deltas. The
//! configured easing is applied to the *whole* timeline: the eased total
//! time selects both the active segment and the interpolation step inside
//! it, so multi-keyframe animations read as one continuous eased motion
//! rather than independently eased hops.

use std::fmt;

use crate::animation::easing::{interpolate, Easing};
use crate::animation::frame::{FrameBuilder, TransformFrame};

/// Callback invoked when an animation finishes.
pub type FinishObserver = Box<dyn FnMut(&TransformAnimation)>;

/// A timeline of transform keyframes with play/stop semantics.
///
/// Lifecycle: created empty, frames appended at any time, [`start`]
/// resets the playhead, repeated [`update`] calls advance it, and
/// [`end`] forces the terminal state. An animation with fewer than two
/// frames or zero total duration never advances.
///
/// [`start`]: TransformAnimation::start
/// [`update`]: TransformAnimation::update
/// [`end`]: TransformAnimation::end
pub struct TransformAnimation {
    frames: Vec<TransformFrame>,
    current_index: usize,
    elapsed: f64,
    time_offset: f64,
    total_duration: f64,
    has_started: bool,
    has_finished: bool,
    max_iterations: i32,
    iteration_count: i32,
    current_frame: TransformFrame,
    easing: Easing,
    on_finish: Vec<FinishObserver>,
}

impl Default for TransformAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformAnimation {
    /// Creates an empty timeline with cubic-in-out easing and a single
    /// iteration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            current_index: 0,
            elapsed: 0.0,
            time_offset: 0.0,
            total_duration: 0.0,
            has_started: false,
            has_finished: false,
            max_iterations: 1,
            iteration_count: 0,
            current_frame: TransformFrame::default(),
            easing: Easing::default(),
            on_finish: Vec::new(),
        }
    }

    /// Appends a frame to the end of the timeline.
    ///
    /// Legal in any state. Adding frames mid-playback does not reset the
    /// playhead, so the current index may become stale until the next
    /// [`start`](Self::start); correcting for that is the caller's
    /// responsibility.
    pub fn add_frame(&mut self, frame: TransformFrame) {
        self.frames.push(frame);
        self.update_total_duration();
    }

    /// Appends a sequence of frames in order.
    pub fn add_frames(&mut self, frames: impl IntoIterator<Item = TransformFrame>) {
        self.frames.extend(frames);
        self.update_total_duration();
    }

    /// Adjusts the frame at `index` through a builder.
    ///
    /// Out-of-range indices are silently ignored.
    pub fn adjust_frame(&mut self, index: usize, adjust: impl FnOnce(FrameBuilder) -> FrameBuilder) {
        if let Some(frame) = self.frames.get(index).copied() {
            self.frames[index] = adjust(FrameBuilder::from_frame(frame)).build();
            self.update_total_duration();
        }
    }

    /// Subscribes a finish observer.
    ///
    /// Observers fire synchronously, in registration order, every time the
    /// animation reaches its end state (see [`end`](Self::end)).
    pub fn on_finish(&mut self, observer: impl FnMut(&TransformAnimation) + 'static) {
        self.on_finish.push(Box::new(observer));
    }

    /// Starts (or restarts) playback from the first frame.
    ///
    /// Resets the playhead and clears the finished flag. The iteration
    /// counter is left untouched; it is reset by [`end`](Self::end), which
    /// lets [`update`](Self::update) loop by calling `start` internally.
    pub fn start(&mut self) {
        self.current_index = 0;
        self.elapsed = 0.0;
        self.time_offset = 0.0;
        self.has_started = true;
        self.has_finished = false;
        self.current_frame = self.frames.first().copied().unwrap_or_default();
    }

    /// Forces the terminal state.
    ///
    /// Snaps `current_frame` to the last frame, marks the animation
    /// finished, resets the iteration counter and fires the finish
    /// observers. The notification fires on *every* call, including on an
    /// already-finished animation — callers that must not observe a
    /// repeated fire have to guard themselves.
    pub fn end(&mut self) {
        self.iteration_count = 0;
        self.current_frame = self.frames.last().copied().unwrap_or_default();
        self.has_finished = true;
        self.has_started = false;
        self.notify_finished();
    }

    /// Advances the playhead by `delta` seconds.
    ///
    /// No-op unless the animation is running with at least one frame and a
    /// positive total duration; in particular, updating a finished
    /// animation changes nothing. Reaching the last frame counts one
    /// iteration and either finishes the animation (when `max_iterations`
    /// is positive and reached) or loops back to the first frame.
    pub fn update(&mut self, delta: f64) {
        if !self.has_started
            || self.has_finished
            || self.frames.is_empty()
            || self.total_duration <= 0.0
        {
            return;
        }

        self.elapsed += delta;
        let eased = interpolate(self.elapsed / self.total_duration, self.easing) * self.total_duration;

        while self.current_index < self.frames.len() - 1
            && eased > self.frames[self.current_index].duration + self.time_offset
        {
            self.time_offset += self.frames[self.current_index].duration;
            self.current_index += 1;
        }

        if self.current_index == self.frames.len() - 1 {
            self.iteration_count += 1;
            if self.max_iterations > 0 && self.iteration_count >= self.max_iterations {
                self.end();
            } else {
                self.start();
            }
        } else {
            let from = self.frames[self.current_index];
            let to = self.frames[self.current_index + 1];
            let step = if from.duration > 0.0 {
                (eased - self.time_offset) / from.duration
            } else {
                1.0
            };
            self.current_frame = TransformFrame::interpolate(from, to, step);
        }
    }

    /// The currently interpolated frame.
    #[must_use]
    pub fn current_frame(&self) -> TransformFrame {
        self.current_frame
    }

    /// All frames, in playback order.
    #[must_use]
    pub fn frames(&self) -> &[TransformFrame] {
        &self.frames
    }

    /// Index of the segment the playhead is in.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Unmodified elapsed time in seconds since the last start.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Sum of all transition durations (the last frame's duration is the
    /// terminal pose and does not count).
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Whether playback has been started.
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.has_started
    }

    /// Whether the animation reached its end state.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.has_finished
    }

    /// Maximum iteration count. Zero or negative means loop forever.
    #[must_use]
    pub fn max_iterations(&self) -> i32 {
        self.max_iterations
    }

    /// Sets the maximum iteration count. Zero or negative loops forever.
    pub fn set_max_iterations(&mut self, max_iterations: i32) {
        self.max_iterations = max_iterations;
    }

    /// The easing applied across the whole timeline.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Sets the easing applied across the whole timeline.
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    fn update_total_duration(&mut self) {
        self.total_duration = 0.0;
        if self.frames.len() > 1 {
            for frame in &self.frames[..self.frames.len() - 1] {
                self.total_duration += frame.duration;
            }
        }
    }

    fn notify_finished(&mut self) {
        // The observer list is detached while firing so callbacks may
        // subscribe further observers without aliasing self.
        let mut observers = std::mem::take(&mut self.on_finish);
        for observer in &mut observers {
            observer(self);
        }
        let added = std::mem::replace(&mut self.on_finish, observers);
        self.on_finish.extend(added);
    }
}

impl fmt::Debug for TransformAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformAnimation")
            .field("frames", &self.frames.len())
            .field("current_index", &self.current_index)
            .field("elapsed", &self.elapsed)
            .field("total_duration", &self.total_duration)
            .field("has_started", &self.has_started)
            .field("has_finished", &self.has_finished)
            .field("max_iterations", &self.max_iterations)
            .field("iteration_count", &self.iteration_count)
            .field("easing", &self.easing)
            .finish()
    }
}
