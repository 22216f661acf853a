//! Escape-time iteration of a single point.

use crate::{Error, Formula, Result};
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

/// How a grid cell's complex value feeds the iteration.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The cell value is both the seed and the constant term.
    SelfMap,
    /// The cell value is the seed; the constant term is fixed for the whole grid.
    Julia(Complex64),
}

impl Mode {
    /// The `(seed, constant)` pair for a cell whose complex value is `c`.
    #[inline]
    pub fn seed_and_constant(&self, c: Complex64) -> (Complex64, Complex64) {
        match *self {
            Mode::SelfMap => (c, c),
            Mode::Julia(julia_c) => (c, julia_c),
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::SelfMap
    }
}

/// Iteration bounds and thresholds shared by the field evaluator and the orbit tracer.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Limits {
    /// Formula applications per grid cell before a cell counts as bounded.
    pub max_iter: u32,

    /// Formula applications per orbit before the trace is abandoned.
    pub max_orbit_steps: usize,

    /// A point whose magnitude exceeds this radius has escaped.
    pub escape_radius: f64,

    /// Two orbit points closer than this are the same point.
    pub period_tolerance: f64,
}

impl Limits {
    pub const MAX_ITER: u32 = 100;
    pub const MAX_ORBIT_STEPS: usize = 1000;
    pub const ESCAPE_RADIUS: f64 = 2.;
    pub const PERIOD_TOLERANCE: f64 = 1e-4;

    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::InvalidLimits("max_iter must be positive"));
        }
        if self.max_orbit_steps == 0 {
            return Err(Error::InvalidLimits("max_orbit_steps must be positive"));
        }
        if !(self.escape_radius.is_finite() && self.escape_radius > 0.) {
            return Err(Error::InvalidLimits("escape_radius must be finite and positive"));
        }
        if !(self.period_tolerance.is_finite() && self.period_tolerance > 0.) {
            return Err(Error::InvalidLimits("period_tolerance must be finite and positive"));
        }
        Ok(())
    }

    /// Whether `z` lies outside the escape radius.
    ///
    /// A non-finite magnitude counts as escaped.
    #[inline]
    pub fn escaped(&self, z: Complex64) -> bool {
        !(z.norm() <= self.escape_radius)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_iter: Self::MAX_ITER,
            max_orbit_steps: Self::MAX_ORBIT_STEPS,
            escape_radius: Self::ESCAPE_RADIUS,
            period_tolerance: Self::PERIOD_TOLERANCE,
        }
    }
}

/// Iterate `formula` from `z0` with constant `c` until it escapes or `max_iter` is reached.
///
/// Returns the 0-based index of the application that escaped. The seed itself is never tested,
/// so a point that escapes on the first application returns 0. A point that never escapes
/// returns `limits.max_iter`.
pub fn escape_time(formula: Formula, z0: Complex64, c: Complex64, limits: &Limits) -> u32 {
    let mut z = z0;
    for i in 0..limits.max_iter {
        z = formula.apply(z, c);
        if limits.escaped(z) {
            return i;
        }
    }

    limits.max_iter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        let c = Complex64::new(0., 0.);
        let limits = Limits::default();
        assert_eq!(escape_time(Formula::Celtic, c, c, &limits), limits.max_iter);
    }

    #[test]
    fn two_escapes_on_first_application() {
        // z² = 4, folded and shifted to 6
        let c = Complex64::new(2., 0.);
        assert_eq!(escape_time(Formula::Celtic, c, c, &Limits::default()), 0);
    }

    #[test]
    fn celtic_and_tricorn_part_ways() {
        // Celtic: (0.5, 1.0), (1.25, 1.5), (1.1875, 4.25) escapes on the third application.
        // Tricorn stays inside the radius for those same three steps.
        let c = Complex64::new(0.5, 0.5);
        let limits = Limits::default();
        assert_eq!(escape_time(Formula::Celtic, c, c, &limits), 2);
        assert!(escape_time(Formula::Tricorn, c, c, &limits) > 2);
    }

    #[test]
    fn julia_mode_uses_fixed_constant() {
        let mode = Mode::Julia(Complex64::new(-1., 0.));
        let (z0, c) = mode.seed_and_constant(Complex64::new(0.3, 0.1));
        assert_eq!(z0, Complex64::new(0.3, 0.1));
        assert_eq!(c, Complex64::new(-1., 0.));

        let (z0, c) = Mode::SelfMap.seed_and_constant(Complex64::new(0.3, 0.1));
        assert_eq!(z0, c);
    }

    #[test]
    fn non_finite_counts_as_escaped() {
        let limits = Limits::default();
        assert!(limits.escaped(Complex64::new(std::f64::NAN, 0.)));
        assert!(limits.escaped(Complex64::new(std::f64::INFINITY, 0.)));
        assert!(!limits.escaped(Complex64::new(2., 0.)));
    }

    #[test]
    fn nan_seed_escapes_immediately() {
        let nan = Complex64::new(std::f64::NAN, std::f64::NAN);
        assert_eq!(escape_time(Formula::Tricorn, nan, nan, &Limits::default()), 0);
    }

    #[test]
    fn validate_rejects_degenerate_limits() {
        assert!(Limits::default().validate().is_ok());
        assert!(Limits { max_iter: 0, ..Limits::default() }.validate().is_err());
        assert!(Limits { max_orbit_steps: 0, ..Limits::default() }.validate().is_err());
        assert!(Limits { escape_radius: -2., ..Limits::default() }.validate().is_err());
        assert!(Limits { period_tolerance: std::f64::NAN, ..Limits::default() }.validate().is_err());
    }
}
