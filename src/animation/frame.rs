// SPDX-License-Identifier: GPL-3.0-only

//! Keyframe value type for transform animations.
//!
//! A [`TransformFrame`] is an immutable pose (position, scale, rotation)
//! plus the transition length to the *next* frame in a timeline. Frames are
//! never mutated in place; new frames are produced by interpolation or
//! through [`FrameBuilder`].

use crate::geometry::Point;

/// A single keyframe: a 2D pose and the duration of the transition that
/// follows it.
///
/// The `duration` of the last frame in a timeline is excluded from the
/// total-duration computation — it marks the terminal pose, not a
/// transition length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformFrame {
    /// Translation in pixels.
    pub position: Point,
    /// Scale factors (1.0 = unscaled).
    pub scale: Point,
    /// Rotation in degrees, clockwise.
    pub angle_deg: f64,
    /// Transition length to the next frame, in seconds. Never negative.
    pub duration: f64,
}

impl Default for TransformFrame {
    /// The identity pose with no transition length.
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale: Point::new(1.0, 1.0),
            angle_deg: 0.0,
            duration: 0.0,
        }
    }
}

impl TransformFrame {
    /// Starts a builder from the identity pose.
    #[must_use]
    pub fn builder() -> FrameBuilder {
        FrameBuilder::new()
    }

    /// Component-wise linear interpolation between two frames.
    ///
    /// Position and scale interpolate per axis; the angle interpolates
    /// arithmetically with no shortest-path wraparound, so callers should
    /// keep angle deltas under 360 degrees to avoid visible snapping.
    /// A `step` outside `[0, 1]` extrapolates. The resulting frame carries
    /// no transition length of its own.
    #[must_use]
    pub fn interpolate(from: Self, to: Self, step: f64) -> Self {
        Self {
            position: Point::lerp(from.position, to.position, step),
            scale: Point::lerp(from.scale, to.scale, step),
            angle_deg: from.angle_deg * (1.0 - step) + to.angle_deg * step,
            duration: 0.0,
        }
    }

    /// Interpolates from this frame towards `to`.
    #[must_use]
    pub fn lerp_to(self, to: Self, step: f64) -> Self {
        Self::interpolate(self, to, step)
    }

    /// Interpolates from `from` towards this frame.
    #[must_use]
    pub fn lerp_from(self, from: Self, step: f64) -> Self {
        Self::interpolate(from, self, step)
    }
}

/// Immutable fluent builder for [`TransformFrame`].
///
/// Every method consumes the builder and returns an updated copy, so partial
/// chains can be reused without aliasing surprises.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameBuilder {
    frame: TransformFrame,
}

impl FrameBuilder {
    /// Starts from the identity pose.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing frame, for in-place adjustments.
    #[must_use]
    pub fn from_frame(frame: TransformFrame) -> Self {
        Self { frame }
    }

    /// Sets the position.
    #[must_use]
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.frame.position = Point::new(x, y);
        self
    }

    /// Sets a uniform scale on both axes.
    #[must_use]
    pub fn scale(self, scale: f64) -> Self {
        self.scale_xy(scale, scale)
    }

    /// Sets the scale per axis.
    #[must_use]
    pub fn scale_xy(mut self, x: f64, y: f64) -> Self {
        self.frame.scale = Point::new(x, y);
        self
    }

    /// Sets the rotation angle in degrees.
    #[must_use]
    pub fn angle(mut self, angle_deg: f64) -> Self {
        self.frame.angle_deg = angle_deg;
        self
    }

    /// Sets the transition duration in seconds.
    ///
    /// Negative durations are a caller contract violation; they are clamped
    /// to zero in release builds.
    #[must_use]
    pub fn duration(mut self, secs: f64) -> Self {
        debug_assert!(secs >= 0.0, "frame duration must not be negative");
        self.frame.duration = secs.max(0.0);
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> TransformFrame {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_returns_endpoints_at_0_and_1() {
        let a = TransformFrame::builder()
            .position(10.0, 20.0)
            .scale_xy(1.0, 2.0)
            .angle(45.0)
            .build();
        let b = TransformFrame::builder()
            .position(30.0, 40.0)
            .scale_xy(3.0, 4.0)
            .angle(90.0)
            .build();

        let at_start = TransformFrame::interpolate(a, b, 0.0);
        assert_eq!(at_start.position, a.position);
        assert_eq!(at_start.scale, a.scale);
        assert_eq!(at_start.angle_deg, a.angle_deg);

        let at_end = TransformFrame::interpolate(a, b, 1.0);
        assert_eq!(at_end.position, b.position);
        assert_eq!(at_end.scale, b.scale);
        assert_eq!(at_end.angle_deg, b.angle_deg);
    }

    #[test]
    fn test_interpolate_midpoint_and_extrapolation() {
        let a = TransformFrame::builder().position(0.0, 0.0).build();
        let b = TransformFrame::builder()
            .position(10.0, 20.0)
            .angle(90.0)
            .build();

        let mid = a.lerp_to(b, 0.5);
        assert_eq!(mid.position, Point::new(5.0, 10.0));
        assert_eq!(mid.angle_deg, 45.0);

        // Steps outside [0, 1] extrapolate.
        let beyond = a.lerp_to(b, 1.5);
        assert_eq!(beyond.position, Point::new(15.0, 30.0));
    }

    #[test]
    fn test_lerp_from_is_the_reverse_direction() {
        let a = TransformFrame::builder().position(0.0, 0.0).build();
        let b = TransformFrame::builder().position(8.0, 8.0).build();

        assert_eq!(b.lerp_from(a, 0.25).position, Point::new(2.0, 2.0));
        assert_eq!(a.lerp_to(b, 0.25).position, Point::new(2.0, 2.0));
    }

    #[test]
    fn test_builder_defaults_to_identity_pose() {
        let frame = TransformFrame::builder().build();
        assert_eq!(frame.position, Point::ZERO);
        assert_eq!(frame.scale, Point::new(1.0, 1.0));
        assert_eq!(frame.angle_deg, 0.0);
        assert_eq!(frame.duration, 0.0);
    }

    #[test]
    fn test_builder_uniform_scale() {
        let frame = TransformFrame::builder().scale(0.0).build();
        assert_eq!(frame.scale, Point::ZERO);
    }

    #[test]
    fn test_builder_reuse_does_not_alias() {
        let base = TransformFrame::builder().position(1.0, 1.0);
        let first = base.duration(0.5).build();
        let second = base.duration(2.0).build();

        assert_eq!(first.duration, 0.5);
        assert_eq!(second.duration, 2.0);
        assert_eq!(first.position, second.position);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_negative_duration_clamps_in_release() {
        let frame = TransformFrame::builder().duration(-1.0).build();
        assert_eq!(frame.duration, 0.0);
    }

    #[test]
    fn test_interpolated_frame_has_no_duration() {
        let a = TransformFrame::builder().duration(1.0).build();
        let b = TransformFrame::builder().duration(3.0).build();
        assert_eq!(TransformFrame::interpolate(a, b, 0.5).duration, 0.0);
    }
}
