// SPDX-License-Identifier: GPL-3.0-only

//! Centralized constants for the keyboard core.

/// Number of key-unit columns in the reference grid.
///
/// The base key width is always `container_width / REFERENCE_COLUMNS`,
/// independent of how many keys a particular row actually holds. Rows with
/// differing column counts stay visually consistent because they share this
/// common unit.
pub const REFERENCE_COLUMNS: i32 = 13;

/// Delay before a pressed key triggers its holding action, in milliseconds.
pub const HOLD_DELAY_MS: u64 = 500;

/// Duration of the popup scale-in animation in seconds.
pub const POPUP_SCALE_IN_SECS: f64 = 0.1;

/// Default width/height ratio the keyboard surface is fitted to.
pub const DEFAULT_ASPECT_RATIO: f64 = 3.0;

/// Divisor applied to the surface diagonal when deriving the key gap.
pub const GAP_DIAGONAL_DIVISOR: f64 = 300.0;

/// Upper bound of the derived key gap in pixels (before the +1 floor).
pub const MAX_KEY_GAP: f64 = 5.0;

/// Window size of the frame-delta moving average.
pub const DELTA_SMOOTHING_WINDOW: usize = 30;
