//! Orbit tracing and first-recurrence detection for a single seed.

use crate::escape::Limits;
use crate::Formula;
use num::complex::Complex64;
use serde::Serialize;

/// How an orbit trace ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitOutcome {
    /// The point at this step left the escape radius.
    Escaped(usize),
    /// The point at this step landed within tolerance of an earlier point.
    ///
    /// This is the first recurrence index, not the minimal period of the cycle.
    PeriodFound(usize),
    /// Neither happened within the step budget.
    Exhausted,
}

/// The points visited from a seed, and how the trace ended.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Orbit {
    points: Vec<Complex64>,
    outcome: OrbitOutcome,
}

impl Orbit {
    pub fn points(&self) -> &[Complex64] {
        &self.points
    }

    pub fn outcome(&self) -> OrbitOutcome {
        self.outcome
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The recurrence index, if the orbit came back near an earlier point.
    pub fn period(&self) -> Option<usize> {
        match self.outcome {
            OrbitOutcome::PeriodFound(step) => Some(step),
            _ => None,
        }
    }

    /// The step counter at the end of the trace; equals the step budget when exhausted.
    pub fn step_count(&self) -> usize {
        match self.outcome {
            OrbitOutcome::Escaped(step) | OrbitOutcome::PeriodFound(step) => step,
            OrbitOutcome::Exhausted => self.points.len(),
        }
    }
}

/// Finds an earlier orbit point that a new point has returned to.
pub trait RecurrenceDetector {
    /// The index of the first point in `history` within `tolerance` of `z`.
    fn find(&mut self, history: &[Complex64], z: Complex64, tolerance: f64) -> Option<usize>;
}

/// Compare against every earlier point, oldest first.
///
/// Quadratic in the orbit length, which is fine for step budgets in the low thousands.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearScan;

impl RecurrenceDetector for LinearScan {
    fn find(&mut self, history: &[Complex64], z: Complex64, tolerance: f64) -> Option<usize> {
        history.iter().position(|p| (z - p).norm() < tolerance)
    }
}

/// Trace the orbit of `seed` under `formula` with constant `c`, using a linear scan for
/// recurrences.
pub fn trace_orbit(seed: Complex64, c: Complex64, formula: Formula, limits: &Limits) -> Orbit {
    trace_orbit_with(seed, c, formula, limits, LinearScan)
}

/// Trace an orbit with a caller-supplied recurrence detector.
///
/// A recurrence is checked before escape, so a point that both repeats and escapes reports
/// `PeriodFound`.
pub fn trace_orbit_with<D: RecurrenceDetector>(
    seed: Complex64,
    c: Complex64,
    formula: Formula,
    limits: &Limits,
    mut detector: D,
) -> Orbit {
    let mut points = Vec::with_capacity(limits.max_orbit_steps.min(1024));
    let mut z = seed;

    for step in 0..limits.max_orbit_steps {
        z = formula.apply(z, c);

        if detector.find(&points, z, limits.period_tolerance).is_some() {
            points.push(z);
            return Orbit {
                points,
                outcome: OrbitOutcome::PeriodFound(step),
            };
        }

        points.push(z);

        if limits.escaped(z) {
            return Orbit {
                points,
                outcome: OrbitOutcome::Escaped(step),
            };
        }
    }

    Orbit {
        points,
        outcome: OrbitOutcome::Exhausted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(steps: usize) -> Limits {
        Limits {
            max_orbit_steps: steps,
            ..Limits::default()
        }
    }

    #[test]
    fn fixed_point_recurs_at_step_one() {
        let zero = Complex64::new(0., 0.);
        let orbit = trace_orbit(zero, zero, Formula::Celtic, &limits(1000));
        assert_eq!(orbit.outcome(), OrbitOutcome::PeriodFound(1));
        assert_eq!(orbit.len(), 2);
    }

    #[test]
    fn two_cycle_recurs_at_step_two() {
        // -1 -> 0 -> -1 under z² + c with c = -1
        let c = Complex64::new(-1., 0.);
        let orbit = trace_orbit(c, c, Formula::Celtic, &limits(1000));
        assert_eq!(orbit.outcome(), OrbitOutcome::PeriodFound(2));
        assert_eq!(orbit.period(), Some(2));
        assert_eq!(orbit.len(), 3);
        assert_eq!(orbit.points()[0], orbit.points()[2]);
    }

    #[test]
    fn escape_reports_step() {
        let c = Complex64::new(2., 0.);
        let orbit = trace_orbit(c, c, Formula::Celtic, &limits(1000));
        assert_eq!(orbit.outcome(), OrbitOutcome::Escaped(0));
        assert_eq!(orbit.points(), &[Complex64::new(6., 0.)]);
        assert_eq!(orbit.step_count(), 0);
    }

    #[test]
    fn budget_exhausts() {
        // The 2-cycle needs three steps to show up.
        let c = Complex64::new(-1., 0.);
        let orbit = trace_orbit(c, c, Formula::Celtic, &limits(2));
        assert_eq!(orbit.outcome(), OrbitOutcome::Exhausted);
        assert_eq!(orbit.len(), 2);
        assert_eq!(orbit.step_count(), 2);
        assert_eq!(orbit.period(), None);
    }

    #[test]
    fn nan_orbit_escapes() {
        let nan = Complex64::new(std::f64::NAN, 0.);
        let orbit = trace_orbit(nan, nan, Formula::CelticFolded, &limits(10));
        assert_eq!(orbit.outcome(), OrbitOutcome::Escaped(0));
    }

    struct Never;

    impl RecurrenceDetector for Never {
        fn find(&mut self, _: &[Complex64], _: Complex64, _: f64) -> Option<usize> {
            None
        }
    }

    #[test]
    fn detector_is_pluggable() {
        let zero = Complex64::new(0., 0.);
        let orbit = trace_orbit_with(zero, zero, Formula::Celtic, &limits(50), Never);
        assert_eq!(orbit.outcome(), OrbitOutcome::Exhausted);
        assert_eq!(orbit.len(), 50);
    }

    #[test]
    fn linear_scan_returns_first_match() {
        let history = [
            Complex64::new(1., 0.),
            Complex64::new(0.5, 0.),
            Complex64::new(0.5, 0.00001),
        ];
        let found = LinearScan.find(&history, Complex64::new(0.5, 0.000005), 1e-4);
        assert_eq!(found, Some(1));
        assert_eq!(LinearScan.find(&history, Complex64::new(0.7, 0.), 1e-4), None);
    }
}
