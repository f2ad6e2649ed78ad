// SPDX-License-Identifier: GPL-3.0-only

//! Keyframe-based transform animation.
//!
//! The animation stack has four layers, bottom up:
//!
//! - [`easing`]: pure progress-remapping functions
//! - [`frame`]: the immutable keyframe value type and its builder
//! - [`timeline`]: the playable sequence of keyframes
//! - [`animator`]: the per-tick registry of running timelines
//!
//! The animator is driven once per external render tick with the elapsed
//! delta; nothing in this module polls a clock or draws. Components own
//! their animations through [`AnimationHandle`]s and hand them to the
//! animator for playback.

pub mod animator;
pub mod easing;
pub mod frame;
pub mod timeline;

pub use animator::{AnimationHandle, Animator, UpdateObserver};
pub use easing::{interpolate, Easing};
pub use frame::{FrameBuilder, TransformFrame};
pub use timeline::{FinishObserver, TransformAnimation};
