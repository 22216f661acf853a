//! The set of inputs needed to evaluate a field or trace an orbit.
//!
//! A scene binds together a viewport, mode, formula and limits. It is what a frontend keeps
//! between frames and what the CLI reads from and writes to disk. The engine itself never holds
//! on to one: every evaluation takes the scene's fields by reference and returns fresh data.

use crate::escape::{Limits, Mode};
use crate::field::{compute_field, compute_field_with_progress, FractalField};
use crate::orbit::{trace_orbit, Orbit};
use crate::viewport::{Bounds, Pos, Viewport};
use crate::{Formula, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Scene {
    pub viewport: Viewport,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub formula: Formula,

    #[serde(default)]
    pub limits: Limits,
}

impl Scene {
    pub fn for_bounds(bounds: Bounds) -> Self {
        Self {
            viewport: Viewport::for_bounds(bounds),
            mode: Mode::default(),
            formula: Formula::default(),
            limits: Limits::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()?;
        self.limits.validate()
    }

    /// Read and validate a scene from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let scene: Scene = serde_json::from_reader(reader)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn field(&self) -> FractalField {
        compute_field(&self.viewport, self.mode, self.formula, &self.limits)
    }

    pub fn field_with_progress(&self, bar: indicatif::ProgressBar) -> FractalField {
        compute_field_with_progress(&self.viewport, self.mode, self.formula, &self.limits, bar)
    }

    /// The orbit of the grid cell at `pos`, seeded the same way the field seeds it.
    pub fn orbit_at(&self, pos: Pos) -> Option<Orbit> {
        if !self.viewport.contains(pos) {
            return None;
        }

        let (seed, c) = self.mode.seed_and_constant(self.viewport.to_complex(pos));
        Some(trace_orbit(seed, c, self.formula, &self.limits))
    }

    /// Apply a transform to the scene.
    ///
    /// Returns whether any field input changed, in which case the field must be recomputed.
    pub fn transform(&mut self, transform: &SceneTransform) -> Result<bool> {
        match *transform {
            SceneTransform::ZoomIn { at } => {
                self.viewport.zoom_by(at, Viewport::ZOOM_STEP)?;
            }
            SceneTransform::ZoomOut { at } => {
                self.viewport.zoom_by(at, 1. / Viewport::ZOOM_STEP)?;
            }
            SceneTransform::Pan { dx, dy } => {
                if dx == 0. && dy == 0. {
                    return Ok(false);
                }
                self.viewport.pan(dx, dy);
            }
            SceneTransform::SelectFormula(formula) => {
                if formula == self.formula {
                    return Ok(false);
                }
                log::info!("switched to formula {}", formula);
                self.formula = formula;
            }
            SceneTransform::EnterJulia { at } => {
                // Moving the pointer while in Julia mode re-enters it with a new constant.
                let julia_c = self.viewport.to_complex(at);
                if self.mode == Mode::Julia(julia_c) {
                    return Ok(false);
                }
                log::debug!("julia constant {}", julia_c);
                self.mode = Mode::Julia(julia_c);
            }
            SceneTransform::ExitJulia => {
                if self.mode == Mode::SelfMap {
                    return Ok(false);
                }
                self.mode = Mode::SelfMap;
            }
            SceneTransform::Reset => {
                let reset = Scene::for_bounds(self.viewport.bounds());
                if *self == reset {
                    return Ok(false);
                }
                *self = reset;
            }
        }

        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneTransform {
    /// Zoom in one step, keeping the point under `at` fixed
    ZoomIn { at: Pos },
    /// Zoom out one step, keeping the point under `at` fixed
    ZoomOut { at: Pos },
    /// Drag the view by a pointer delta in grid cells
    Pan { dx: f64, dy: f64 },
    /// Switch the active formula
    SelectFormula(Formula),
    /// Use the complex value under `at` as the Julia constant
    EnterJulia { at: Pos },
    /// Return to self-map mode
    ExitJulia,
    /// Reset everything but the grid size to defaults
    Reset,
}
