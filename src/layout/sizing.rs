// SPDX-License-Identifier: GPL-3.0-only

//! Pixel sizing for the key matrix.
//!
//! The sizer distributes a container rectangle over a 2D matrix of
//! [`KeySize`] specifications. Widths come in two kinds: fixed keys take a
//! multiple of the base column unit, star keys split whatever the fixed
//! keys left over. All arithmetic is integer pixels, with a fractional
//! carry that keeps star rows from systematically under-allocating.
//!
//! The base column unit is `container_width / REFERENCE_COLUMNS` no matter
//! how many keys a row actually has, so rows with different column counts
//! share one visual key size.

use crate::app_settings::REFERENCE_COLUMNS;
use crate::geometry::Rect;
use crate::layout::types::KeySize;

/// Base column unit width in pixels for a container width.
#[must_use]
pub fn unit_width(container_width: f64) -> i32 {
    container_width as i32 / REFERENCE_COLUMNS
}

/// Row height in pixels: integer division of the container height.
///
/// The remainder is absorbed at the bottom edge rather than redistributed,
/// so the last row can be short by up to `row_count - 1` pixels. Known
/// rounding artifact.
#[must_use]
pub fn row_height(container_height: f64, row_count: usize) -> i32 {
    if row_count == 0 {
        return 0;
    }
    container_height as i32 / row_count as i32
}

/// Lays out one row of key sizes into container-local rectangles.
///
/// Fixed keys take `unit * value` pixels. Star keys split the remaining
/// row width equally; the fractional remainder accumulates across the
/// row's star keys and pays out a one-pixel correction whenever it
/// exceeds 1.0. With no star keys the leftover width simply stays
/// unallocated — a blank gap, not an error.
#[must_use]
pub fn layout_row(
    specs: &[KeySize],
    container_width: f64,
    unit: i32,
    offset_y: i32,
    height: i32,
) -> Vec<Rect> {
    let mut used_horizontal_space = 0i32;
    let mut filler_count = 0u32;
    for spec in specs {
        if spec.is_star() {
            filler_count += 1;
        } else {
            used_horizontal_space += (spec.value() * f64::from(unit)) as i32;
        }
    }

    let remaining = container_width as i32 - used_horizontal_space;
    let filler_size = if filler_count > 0 {
        f64::from(remaining) / f64::from(filler_count)
    } else {
        0.0
    };

    let mut rects = Vec::with_capacity(specs.len());
    let mut fractional = 0.0;
    let mut offset_x = 0.0;
    for spec in specs {
        let mut width = filler_size as i32;
        if spec.is_star() {
            fractional += filler_size - f64::from(width);
            if fractional > 1.0 {
                fractional = 0.0;
                width += 1;
            }
        } else {
            width = (f64::from(unit) * spec.value()) as i32;
        }
        rects.push(Rect::new(
            offset_x,
            f64::from(offset_y),
            f64::from(width),
            f64::from(height),
        ));
        offset_x += f64::from(width);
    }
    rects
}

/// Lays out a whole matrix into container-local rectangles, row-major.
#[must_use]
pub fn layout_matrix(rows: &[Vec<KeySize>], container: Rect) -> Vec<Vec<Rect>> {
    if rows.is_empty() || container.is_empty() {
        return rows.iter().map(|row| vec![Rect::ZERO; row.len()]).collect();
    }

    let unit = unit_width(container.width);
    let height = row_height(container.height, rows.len());
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            layout_row(
                row,
                container.width,
                unit,
                height * i as i32,
                height,
            )
        })
        .collect()
}
