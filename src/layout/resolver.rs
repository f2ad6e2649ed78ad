// SPDX-License-Identifier: GPL-3.0-only

//! Resolves the keyboard surface inside the host canvas.
//!
//! The keyboard does not necessarily fill its window: a resolver picks the
//! rectangle the key matrix occupies and derives the gap drawn between
//! keys. The default implementation fits a fixed aspect ratio centered in
//! the canvas.

use crate::app_settings::{DEFAULT_ASPECT_RATIO, GAP_DIAGONAL_DIVISOR, MAX_KEY_GAP};
use crate::geometry::{Point, Rect, Size};

/// Result of a size resolution: the keyboard bounds and the key gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBounds {
    /// Keyboard bounds in canvas coordinates.
    pub bounds: Rect,
    /// Gap between keys in pixels.
    pub gap: i32,
}

/// Maps a canvas size to keyboard bounds and key gap.
pub trait SizeResolver {
    /// Resolves the keyboard surface for the given canvas size.
    fn resolve(&self, canvas: Size) -> ResolvedBounds;
}

/// Fits a fixed width/height ratio centered in the canvas.
#[derive(Debug, Clone, Copy)]
pub struct AspectRatioResolver {
    aspect_ratio: f64,
    allow_shrink: bool,
}

impl Default for AspectRatioResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ASPECT_RATIO)
    }
}

impl AspectRatioResolver {
    /// Creates a resolver for the given width/height ratio that uses the
    /// whole canvas when it is narrower than the target ratio.
    #[must_use]
    pub fn new(aspect_ratio: f64) -> Self {
        Self {
            aspect_ratio,
            allow_shrink: true,
        }
    }

    /// Controls behavior on canvases narrower than the target ratio:
    /// `true` fills the canvas (giving up the ratio), `false` scales the
    /// surface down to preserve it.
    #[must_use]
    pub fn with_allow_shrink(mut self, allow_shrink: bool) -> Self {
        self.allow_shrink = allow_shrink;
        self
    }

    /// The configured width/height ratio.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }
}

impl SizeResolver for AspectRatioResolver {
    fn resolve(&self, canvas: Size) -> ResolvedBounds {
        if canvas.is_empty() {
            return ResolvedBounds {
                bounds: Rect::ZERO,
                gap: 0,
            };
        }

        let source_ratio = canvas.width / canvas.height;
        let (width, height) = if source_ratio < self.aspect_ratio {
            if self.allow_shrink {
                (canvas.width, canvas.height)
            } else {
                let adjusted = source_ratio / self.aspect_ratio;
                let height = canvas.height * adjusted;
                (height * self.aspect_ratio, height)
            }
        } else {
            (canvas.height * self.aspect_ratio, canvas.height)
        };

        let diagonal = Point::new(width, height).length();
        let gap = (diagonal / GAP_DIAGONAL_DIVISOR).clamp(0.0, MAX_KEY_GAP) as i32 + 1;

        ResolvedBounds {
            bounds: Rect::new(
                (canvas.width - width) / 2.0,
                (canvas.height - height) / 2.0,
                width,
                height,
            ),
            gap,
        }
    }
}
