//! The mapping between a sample grid and the complex plane.

use crate::{Error, Result};
use nalgebra::Vector2;
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

/// Dimensions of the sample grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    /// The grid center, which maps to `-offset / zoom`.
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(f64::from(self.width) / 2., f64::from(self.height) / 2.)
    }

    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A cell on the sample grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    pub x: u32,
    pub y: u32,
}

impl From<(u32, u32)> for Pos {
    fn from(pt: (u32, u32)) -> Self {
        Pos { x: pt.0, y: pt.1 }
    }
}

impl From<Pos> for Vector2<f64> {
    fn from(pos: Pos) -> Self {
        Vector2::new(f64::from(pos.x), f64::from(pos.y))
    }
}

/// A zoom and pan over a fixed-size grid.
///
/// The offset is measured in grid cells, so panning by a pixel is the same distance in the
/// complex plane at any zoom level.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Viewport {
    /// Grid cells per unit of the complex plane.
    zoom: f64,

    /// Pan offset, in grid cells.
    offset: Vector2<f64>,

    bounds: Bounds,
}

impl Viewport {
    /// Multiplier applied for one step of zooming in or out.
    pub const ZOOM_STEP: f64 = 1.2;

    /// Zoom used for a fresh viewport.
    pub const DEFAULT_ZOOM: f64 = 250.;

    pub fn new(zoom: f64, offset: Vector2<f64>, bounds: Bounds) -> Result<Self> {
        check_zoom(zoom)?;
        Ok(Self {
            zoom,
            offset,
            bounds,
        })
    }

    /// A centered viewport at the default zoom.
    pub fn for_bounds(bounds: Bounds) -> Self {
        Self {
            zoom: Self::DEFAULT_ZOOM,
            offset: Vector2::zeros(),
            bounds,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Vector2<f64> {
        self.offset
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Check the zoom invariant, for viewports that came in through deserialization.
    pub fn validate(&self) -> Result<()> {
        check_zoom(self.zoom)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.bounds.width && pos.y < self.bounds.height
    }

    /// The complex value at a grid cell.
    pub fn to_complex(&self, pos: Pos) -> Complex64 {
        self.complex_at(pos.into())
    }

    /// The complex value at a (possibly fractional) grid coordinate.
    pub fn complex_at(&self, grid: Vector2<f64>) -> Complex64 {
        let shifted = (grid + self.offset - self.bounds.center()) / self.zoom;
        Complex64::new(shifted.x, shifted.y)
    }

    /// The grid coordinate of a complex value; the inverse of `complex_at`.
    pub fn to_grid(&self, c: Complex64) -> Vector2<f64> {
        Vector2::new(c.re, c.im) * self.zoom - self.offset + self.bounds.center()
    }

    /// Change the zoom while keeping the complex value under `pos` in place.
    pub fn zoom_about(&mut self, pos: Pos, zoom: f64) -> Result<()> {
        check_zoom(zoom)?;

        let before = self.to_complex(pos);
        self.zoom = zoom;
        let after = self.to_complex(pos);

        self.offset.x += (before.re - after.re) * zoom;
        self.offset.y += (before.im - after.im) * zoom;
        Ok(())
    }

    /// Multiply the zoom by `factor` about `pos`.
    pub fn zoom_by(&mut self, pos: Pos, factor: f64) -> Result<()> {
        self.zoom_about(pos, self.zoom * factor)
    }

    /// Drag the view by a pointer delta in grid cells; the content follows the pointer.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset -= Vector2::new(dx, dy);
    }
}

fn check_zoom(zoom: f64) -> Result<()> {
    if zoom.is_finite() && zoom > 0. {
        Ok(())
    } else {
        Err(Error::InvalidZoom(zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(
            100.,
            Vector2::new(12.5, -7.),
            Bounds {
                width: 800,
                height: 600,
            },
        )
        .unwrap()
    }

    #[test]
    fn center_maps_to_negated_offset() {
        let vp = Viewport::for_bounds(Bounds {
            width: 800,
            height: 600,
        });
        assert_eq!(vp.to_complex(Pos { x: 400, y: 300 }), Complex64::new(0., 0.));
    }

    #[test]
    fn maps_with_offset_and_zoom() {
        let c = viewport().to_complex(Pos { x: 0, y: 0 });
        assert!((c.re - (0. + 12.5 - 400.) / 100.).abs() < 1e-12);
        assert!((c.im - (0. - 7. - 300.) / 100.).abs() < 1e-12);
    }

    #[test]
    fn to_grid_inverts_to_complex() {
        let vp = viewport();
        let pos = Pos { x: 123, y: 456 };
        let grid = vp.to_grid(vp.to_complex(pos));
        assert!((grid.x - 123.).abs() < 1e-9);
        assert!((grid.y - 456.).abs() < 1e-9);
    }

    #[test]
    fn zoom_about_keeps_point_fixed() {
        let mut vp = viewport();
        let pos = Pos { x: 700, y: 20 };
        let before = vp.to_complex(pos);
        vp.zoom_by(pos, Viewport::ZOOM_STEP).unwrap();
        let after = vp.to_complex(pos);
        assert!((vp.zoom() - 120.).abs() < 1e-9);
        assert!((before - after).norm() < 1e-9);
    }

    #[test]
    fn rejects_bad_zoom() {
        let bounds = Bounds {
            width: 4,
            height: 4,
        };
        assert!(Viewport::new(0., Vector2::zeros(), bounds).is_err());
        assert!(Viewport::new(-1., Vector2::zeros(), bounds).is_err());
        assert!(Viewport::new(std::f64::NAN, Vector2::zeros(), bounds).is_err());

        let mut vp = viewport();
        assert!(vp.zoom_about(Pos { x: 0, y: 0 }, 0.).is_err());
        assert_eq!(vp.zoom(), 100.);
    }

    #[test]
    fn pan_follows_pointer() {
        let mut vp = viewport();
        let pos = Pos { x: 10, y: 10 };
        let before = vp.to_complex(pos);
        vp.pan(5., -3.);
        let after = vp.to_complex(Pos { x: 15, y: 7 });
        assert!((before - after).norm() < 1e-12);
    }

    #[test]
    fn contains_respects_bounds() {
        let vp = viewport();
        assert!(vp.contains(Pos { x: 799, y: 599 }));
        assert!(!vp.contains(Pos { x: 800, y: 0 }));
        assert!(!vp.contains(Pos { x: 0, y: 600 }));
    }
}
