//! Presentation helpers for consumers of the engine.
//!
//! None of this is needed to compute a field or an orbit; it is the policy the bundled CLI uses to
//! turn them into something to look at or listen to.

use crate::FractalField;

/// Grayscale intensity for an escape time: black escapes immediately, white never escapes.
pub fn intensity(count: u32, max_iter: u32) -> u8 {
    if max_iter == 0 {
        return 0;
    }
    (255 * u64::from(count.min(max_iter)) / u64::from(max_iter)) as u8
}

pub fn grayscale(field: &FractalField) -> image::GrayImage {
    let max_iter = field.max_iter();
    image::GrayImage::from_fn(field.width() as u32, field.height() as u32, |x, y| {
        let count = field[(y as usize, x as usize)];
        image::Luma([intensity(count, max_iter)])
    })
}

/// Tone, in Hz, for an orbit's step count.
pub fn tone_frequency(step_count: usize) -> f64 {
    const BASE: f64 = 220.;
    const STEP: f64 = 10.;
    const BANDS: usize = 40;

    BASE + (step_count % BANDS) as f64 * STEP
}
