//! Celtic orbit explorer
//!
//! An escape-time engine for Mandelbrot-style iterations of the "Celtic" family. The crate maps a
//! rectangular grid onto the complex plane, evaluates one of a fixed set of iteration formulas
//! for every cell, and traces the orbit of single points to find out whether they escape, settle
//! into a cycle, or run out of steps.

use std::io;

pub mod escape;
pub mod field;
pub mod formula;
pub mod orbit;
pub mod render;
pub mod scene;
pub mod viewport;

pub use escape::{escape_time, Limits, Mode};
pub use field::{compute_field, compute_field_with_progress, FractalField};
pub use formula::Formula;
pub use num::complex::Complex64;
pub use orbit::{trace_orbit, trace_orbit_with, LinearScan, Orbit, OrbitOutcome, RecurrenceDetector};
pub use scene::{Scene, SceneTransform};
pub use viewport::{Bounds, Pos, Viewport};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A formula index or name outside the registry.
    InvalidFormula(String),
    /// Zoom must be finite and strictly positive.
    InvalidZoom(f64),
    /// An iteration bound, escape radius or tolerance that cannot be used.
    InvalidLimits(&'static str),
    /// A malformed value on the command line.
    Parse(String),
    Io(io::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidFormula(s) => write!(f, "no formula {:?}, expected 1-4", s),
            Error::InvalidZoom(z) => write!(f, "zoom must be finite and positive, got {}", z),
            Error::InvalidLimits(why) => write!(f, "invalid limits: {}", why),
            Error::Parse(s) => write!(f, "cannot parse {:?}", s),
            Error::Io(e) => write!(f, "{}", e),
            Error::Json(e) => write!(f, "{}", e),
            Error::Image(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err)
    }
}
