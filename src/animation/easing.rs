// SPDX-License-Identifier: GPL-3.0-only

//! Easing functions for animation timelines.
//!
//! An easing function remaps a normalized progress value in `[0, 1]` into an
//! eased progress value. Ten families (quadratic through bounce) are provided
//! in in/out/in-out variants, plus linear. All are pure closed-form formulas
//! with fixed endpoints: `f(0) == 0` and `f(1) == 1`.
//! The elastic and back families intentionally overshoot in between.

use std::f64::consts::{FRAC_PI_2, PI};

/// Selects one of the 30 easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed, `y = x`.
    Linear,
    /// Accelerating parabola, `y = x^2`.
    QuadraticIn,
    /// Decelerating parabola.
    QuadraticOut,
    /// Piecewise quadratic, split at the midpoint.
    QuadraticInOut,
    /// `y = x^3`.
    CubicIn,
    /// `y = (x - 1)^3 + 1`.
    CubicOut,
    /// Piecewise cubic, split at the midpoint. The default timeline easing.
    #[default]
    CubicInOut,
    /// `y = x^4`.
    QuarticIn,
    /// `y = 1 - (x - 1)^4`.
    QuarticOut,
    /// Piecewise quartic.
    QuarticInOut,
    /// `y = x^5`.
    QuinticIn,
    /// `y = (x - 1)^5 + 1`.
    QuinticOut,
    /// Piecewise quintic.
    QuinticInOut,
    /// Quarter-cycle sine.
    SineIn,
    /// Quarter-cycle sine, opposite phase.
    SineOut,
    /// Half sine wave.
    SineInOut,
    /// Shifted quadrant IV of the unit circle.
    CircularIn,
    /// Shifted quadrant II of the unit circle.
    CircularOut,
    /// Piecewise circular.
    CircularInOut,
    /// `y = 2^(10(x - 1))`, with an exact zero at `x == 0`.
    ExponentialIn,
    /// `y = 1 - 2^(-10x)`, with an exact one at `x == 1`.
    ExponentialOut,
    /// Piecewise exponential, exact at both endpoints.
    ExponentialInOut,
    /// Exponentially damped sine wave, accelerating.
    ElasticIn,
    /// Exponentially damped sine wave, decelerating.
    ElasticOut,
    /// Piecewise damped sine wave.
    ElasticInOut,
    /// Overshooting cubic, `y = x^3 - x sin(x pi)`.
    BackIn,
    /// Overshooting cubic, decelerating.
    BackOut,
    /// Piecewise overshooting cubic.
    BackInOut,
    /// Mirrored bounce, `y = 1 - bounce_out(1 - x)`.
    BounceIn,
    /// Four-segment polynomial bounce.
    BounceOut,
    /// Bounce-in below the midpoint, bounce-out above it.
    BounceInOut,
}

impl Easing {
    /// All 30 easing functions, in declaration order.
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuarticIn,
        Easing::QuarticOut,
        Easing::QuarticInOut,
        Easing::QuinticIn,
        Easing::QuinticOut,
        Easing::QuinticInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::CircularIn,
        Easing::CircularOut,
        Easing::CircularInOut,
        Easing::ExponentialIn,
        Easing::ExponentialOut,
        Easing::ExponentialInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    /// Evaluates this easing function at progress `p`.
    #[must_use]
    pub fn apply(self, p: f64) -> f64 {
        match self {
            Easing::Linear => p,
            Easing::QuadraticIn => quadratic_in(p),
            Easing::QuadraticOut => quadratic_out(p),
            Easing::QuadraticInOut => quadratic_in_out(p),
            Easing::CubicIn => cubic_in(p),
            Easing::CubicOut => cubic_out(p),
            Easing::CubicInOut => cubic_in_out(p),
            Easing::QuarticIn => quartic_in(p),
            Easing::QuarticOut => quartic_out(p),
            Easing::QuarticInOut => quartic_in_out(p),
            Easing::QuinticIn => quintic_in(p),
            Easing::QuinticOut => quintic_out(p),
            Easing::QuinticInOut => quintic_in_out(p),
            Easing::SineIn => sine_in(p),
            Easing::SineOut => sine_out(p),
            Easing::SineInOut => sine_in_out(p),
            Easing::CircularIn => circular_in(p),
            Easing::CircularOut => circular_out(p),
            Easing::CircularInOut => circular_in_out(p),
            Easing::ExponentialIn => exponential_in(p),
            Easing::ExponentialOut => exponential_out(p),
            Easing::ExponentialInOut => exponential_in_out(p),
            Easing::ElasticIn => elastic_in(p),
            Easing::ElasticOut => elastic_out(p),
            Easing::ElasticInOut => elastic_in_out(p),
            Easing::BackIn => back_in(p),
            Easing::BackOut => back_out(p),
            Easing::BackInOut => back_in_out(p),
            Easing::BounceIn => bounce_in(p),
            Easing::BounceOut => bounce_out(p),
            Easing::BounceInOut => bounce_in_out(p),
        }
    }
}

/// Evaluates `easing` at progress `p`.
///
/// Free-function form of [`Easing::apply`].
#[must_use]
pub fn interpolate(p: f64, easing: Easing) -> f64 {
    easing.apply(p)
}

fn quadratic_in(p: f64) -> f64 {
    p * p
}

fn quadratic_out(p: f64) -> f64 {
    -(p * (p - 2.0))
}

fn quadratic_in_out(p: f64) -> f64 {
    if p < 0.5 {
        2.0 * p * p
    } else {
        -2.0 * p * p + 4.0 * p - 1.0
    }
}

fn cubic_in(p: f64) -> f64 {
    p * p * p
}

fn cubic_out(p: f64) -> f64 {
    let f = p - 1.0;
    f * f * f + 1.0
}

fn cubic_in_out(p: f64) -> f64 {
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        let f = 2.0 * p - 2.0;
        0.5 * f * f * f + 1.0
    }
}

fn quartic_in(p: f64) -> f64 {
    p * p * p * p
}

fn quartic_out(p: f64) -> f64 {
    let f = p - 1.0;
    f * f * f * (1.0 - p) + 1.0
}

fn quartic_in_out(p: f64) -> f64 {
    if p < 0.5 {
        8.0 * p * p * p * p
    } else {
        let f = p - 1.0;
        -8.0 * f * f * f * f + 1.0
    }
}

fn quintic_in(p: f64) -> f64 {
    p * p * p * p * p
}

fn quintic_out(p: f64) -> f64 {
    let f = p - 1.0;
    f * f * f * f * f + 1.0
}

fn quintic_in_out(p: f64) -> f64 {
    if p < 0.5 {
        16.0 * p * p * p * p * p
    } else {
        let f = 2.0 * p - 2.0;
        0.5 * f * f * f * f * f + 1.0
    }
}

fn sine_in(p: f64) -> f64 {
    ((p - 1.0) * FRAC_PI_2).sin() + 1.0
}

fn sine_out(p: f64) -> f64 {
    (p * FRAC_PI_2).sin()
}

fn sine_in_out(p: f64) -> f64 {
    0.5 * (1.0 - (p * PI).cos())
}

fn circular_in(p: f64) -> f64 {
    1.0 - (1.0 - p * p).sqrt()
}

fn circular_out(p: f64) -> f64 {
    ((2.0 - p) * p).sqrt()
}

fn circular_in_out(p: f64) -> f64 {
    if p < 0.5 {
        0.5 * (1.0 - (1.0 - 4.0 * (p * p)).sqrt())
    } else {
        0.5 * ((-(2.0 * p - 3.0) * (2.0 * p - 1.0)).sqrt() + 1.0)
    }
}

// The exponential family special-cases the exact endpoints: the closed form
// only approaches 0/1 asymptotically and the pow() residue would otherwise
// leak into the first and last rendered frame.

fn exponential_in(p: f64) -> f64 {
    if p == 0.0 {
        p
    } else {
        2.0_f64.powf(10.0 * (p - 1.0))
    }
}

fn exponential_out(p: f64) -> f64 {
    if p == 1.0 {
        p
    } else {
        1.0 - 2.0_f64.powf(-10.0 * p)
    }
}

fn exponential_in_out(p: f64) -> f64 {
    if p == 0.0 || p == 1.0 {
        return p;
    }

    if p < 0.5 {
        0.5 * 2.0_f64.powf(20.0 * p - 10.0)
    } else {
        -0.5 * 2.0_f64.powf(-20.0 * p + 10.0) + 1.0
    }
}

fn elastic_in(p: f64) -> f64 {
    (13.0 * FRAC_PI_2 * p).sin() * 2.0_f64.powf(10.0 * (p - 1.0))
}

fn elastic_out(p: f64) -> f64 {
    (-13.0 * FRAC_PI_2 * (p + 1.0)).sin() * 2.0_f64.powf(-10.0 * p) + 1.0
}

fn elastic_in_out(p: f64) -> f64 {
    if p < 0.5 {
        0.5 * (13.0 * FRAC_PI_2 * (2.0 * p)).sin() * 2.0_f64.powf(10.0 * (2.0 * p - 1.0))
    } else {
        0.5 * ((-13.0 * FRAC_PI_2 * (2.0 * p - 1.0 + 1.0)).sin()
            * 2.0_f64.powf(-10.0 * (2.0 * p - 1.0))
            + 2.0)
    }
}

fn back_in(p: f64) -> f64 {
    p * p * p - p * (p * PI).sin()
}

fn back_out(p: f64) -> f64 {
    let f = 1.0 - p;
    1.0 - (f * f * f - f * (f * PI).sin())
}

fn back_in_out(p: f64) -> f64 {
    if p < 0.5 {
        let f = 2.0 * p;
        0.5 * (f * f * f - f * (f * PI).sin())
    } else {
        let f = 1.0 - (2.0 * p - 1.0);
        0.5 * (1.0 - (f * f * f - f * (f * PI).sin())) + 0.5
    }
}

fn bounce_in(p: f64) -> f64 {
    1.0 - bounce_out(1.0 - p)
}

fn bounce_out(p: f64) -> f64 {
    if p < 4.0 / 11.0 {
        121.0 * p * p / 16.0
    } else if p < 8.0 / 11.0 {
        363.0 / 40.0 * p * p - 99.0 / 10.0 * p + 17.0 / 5.0
    } else if p < 9.0 / 10.0 {
        4356.0 / 361.0 * p * p - 35442.0 / 1805.0 * p + 16061.0 / 1805.0
    } else {
        54.0 / 5.0 * p * p - 513.0 / 25.0 * p + 268.0 / 25.0
    }
}

fn bounce_in_out(p: f64) -> f64 {
    if p < 0.5 {
        0.5 * bounce_in(p * 2.0)
    } else {
        0.5 * bounce_out(p * 2.0 - 1.0) + 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    /// Every easing function must map 0 to 0 and 1 to 1 exactly (within
    /// floating point noise); overshoot is only allowed in between.
    #[test]
    fn test_endpoint_fixed_points() {
        for easing in Easing::ALL {
            let at_zero = easing.apply(0.0);
            let at_one = easing.apply(1.0);
            assert!(
                at_zero.abs() < EPS,
                "{easing:?} at 0 should be 0, got {at_zero}"
            );
            assert!(
                (at_one - 1.0).abs() < EPS,
                "{easing:?} at 1 should be 1, got {at_one}"
            );
        }
    }

    /// In-out variants are continuous at the midpoint split.
    #[test]
    fn test_in_out_midpoint_continuity() {
        let in_outs = [
            Easing::QuadraticInOut,
            Easing::CubicInOut,
            Easing::QuarticInOut,
            Easing::QuinticInOut,
            Easing::SineInOut,
            Easing::CircularInOut,
            Easing::ExponentialInOut,
            Easing::BackInOut,
            Easing::BounceInOut,
        ];
        for easing in in_outs {
            let below = easing.apply(0.5 - 1e-9);
            let above = easing.apply(0.5 + 1e-9);
            assert!(
                (below - above).abs() < 1e-6,
                "{easing:?} discontinuous at 0.5: {below} vs {above}"
            );
        }
    }

    #[test]
    fn test_polynomial_midpoints() {
        assert!((Easing::QuadraticIn.apply(0.5) - 0.25).abs() < EPS);
        assert!((Easing::CubicIn.apply(0.5) - 0.125).abs() < EPS);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < EPS);
        assert!((Easing::QuadraticOut.apply(0.5) - 0.75).abs() < EPS);
    }

    /// Exponential easings return the progress unchanged at the exact
    /// endpoints instead of the pow() approximation.
    #[test]
    fn test_exponential_endpoint_special_cases() {
        assert_eq!(Easing::ExponentialIn.apply(0.0), 0.0);
        assert_eq!(Easing::ExponentialOut.apply(1.0), 1.0);
        assert_eq!(Easing::ExponentialInOut.apply(0.0), 0.0);
        assert_eq!(Easing::ExponentialInOut.apply(1.0), 1.0);

        // Just inside the range the closed form applies and is tiny but
        // nonzero.
        assert!(Easing::ExponentialIn.apply(0.01) > 0.0);
        assert!(Easing::ExponentialOut.apply(0.99) < 1.0);
    }

    /// Bounce-in is defined as the mirror of bounce-out.
    #[test]
    fn test_bounce_in_mirrors_bounce_out() {
        for i in 0..=10 {
            let p = f64::from(i) / 10.0;
            let mirrored = 1.0 - Easing::BounceOut.apply(1.0 - p);
            assert!(
                (Easing::BounceIn.apply(p) - mirrored).abs() < EPS,
                "bounce_in({p}) should equal 1 - bounce_out(1 - {p})"
            );
        }
    }

    /// Back easing dips below zero early on (the overshoot that gives the
    /// anticipation effect).
    #[test]
    fn test_back_in_overshoots_negative() {
        assert!(Easing::BackIn.apply(0.3) < 0.0);
        assert!(Easing::BackOut.apply(0.7) > 1.0);
    }

    #[test]
    fn test_interpolate_free_function_matches_apply() {
        assert_eq!(
            interpolate(0.37, Easing::CubicInOut),
            Easing::CubicInOut.apply(0.37)
        );
    }

    #[test]
    fn test_default_is_cubic_in_out() {
        assert_eq!(Easing::default(), Easing::CubicInOut);
    }
}
