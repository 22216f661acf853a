//! The registry of iteration formulas.
//!
//! Every formula starts from the complex square `z² = (re² − im², 2·re·im)`, folds one or both
//! components, and adds the constant term. The folding is what gives each variant its own shape.

use crate::{Error, Result};
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// `(|re(z²)|, im(z²)) + c`
    Celtic,
    /// `(|re(z²)|, |im(z²)|) + c`
    CelticFolded,
    /// `(re(z²), −im(z²)) + c`
    Tricorn,
    /// `(|re(z)·|re(z)| + im(z)²|, 2·re(z)·im(z)) + c`
    CelticHeart,
}

impl Formula {
    /// The registry, in index order.
    pub const ALL: [Formula; 4] = [
        Formula::Celtic,
        Formula::CelticFolded,
        Formula::Tricorn,
        Formula::CelticHeart,
    ];

    /// Look up a formula by its 1-based registry index.
    pub fn from_index(index: usize) -> Result<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
            .ok_or_else(|| Error::InvalidFormula(index.to_string()))
    }

    /// The 1-based registry index.
    pub fn index(self) -> usize {
        match self {
            Formula::Celtic => 1,
            Formula::CelticFolded => 2,
            Formula::Tricorn => 3,
            Formula::CelticHeart => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Formula::Celtic => "celtic",
            Formula::CelticFolded => "celtic_folded",
            Formula::Tricorn => "tricorn",
            Formula::CelticHeart => "celtic_heart",
        }
    }

    pub fn expression(self) -> &'static str {
        match self {
            Formula::Celtic => "abs(re(z^2)) + i * im(z^2) + c",
            Formula::CelticFolded => "abs(re(z^2)) + i * abs(im(z^2)) + c",
            Formula::Tricorn => "re(z^2) - i * im(z^2) + c",
            Formula::CelticHeart => "abs(Re(z) * abs(Re(z)) + Im(z)^2) + 2i * Re(z) * Im(z) + c",
        }
    }

    /// Apply one step of the formula.
    #[inline]
    pub fn apply(self, z: Complex64, c: Complex64) -> Complex64 {
        let re2 = z.re * z.re - z.im * z.im;
        let im2 = 2. * z.re * z.im;

        let folded = match self {
            Formula::Celtic => Complex64::new(re2.abs(), im2),
            Formula::CelticFolded => Complex64::new(re2.abs(), im2.abs()),
            Formula::Tricorn => Complex64::new(re2, -im2),
            Formula::CelticHeart => {
                let re_part = z.re * z.re.abs() + z.im * z.im;
                Complex64::new(re_part.abs(), im2)
            }
        };

        folded + c
    }
}

/// Validate `index` and apply the formula it names.
pub fn evaluate(index: usize, z: Complex64, c: Complex64) -> Result<Complex64> {
    Formula::from_index(index).map(|f| f.apply(z, c))
}

impl Default for Formula {
    fn default() -> Self {
        Formula::Celtic
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.index(), self.expression())
    }
}

/// Parse either a registry index (`"3"`) or a formula name (`"tricorn"`).
impl std::str::FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index);
        }

        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::InvalidFormula(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Z: Complex64 = Complex64 { re: 0.5, im: -1.5 };
    const C: Complex64 = Complex64 { re: 0.25, im: 0.125 };

    #[test]
    fn celtic_folds_real_part() {
        // z² = (0.25 - 2.25, -1.5) = (-2, -1.5)
        assert_eq!(Formula::Celtic.apply(Z, C), Complex64::new(2.25, -1.375));
    }

    #[test]
    fn celtic_folded_folds_both_parts() {
        assert_eq!(Formula::CelticFolded.apply(Z, C), Complex64::new(2.25, 1.625));
    }

    #[test]
    fn tricorn_conjugates_square() {
        assert_eq!(Formula::Tricorn.apply(Z, C), Complex64::new(-1.75, 1.625));
    }

    #[test]
    fn celtic_heart_uses_signed_square() {
        // re_part = 0.5 * 0.5 + 2.25 = 2.5
        assert_eq!(Formula::CelticHeart.apply(Z, C), Complex64::new(2.75, -1.375));

        let neg = Complex64::new(-2., 1.);
        // re_part = -2 * 2 + 1 = -3, folded to 3
        assert_eq!(
            Formula::CelticHeart.apply(neg, Complex64::new(0., 0.)),
            Complex64::new(3., -4.)
        );
    }

    #[test]
    fn indices_round_trip() {
        for (i, f) in Formula::ALL.iter().enumerate() {
            assert_eq!(f.index(), i + 1);
            assert_eq!(Formula::from_index(i + 1).unwrap(), *f);
        }
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert!(Formula::from_index(0).is_err());
        assert!(Formula::from_index(5).is_err());
        assert!(evaluate(7, Z, C).is_err());
    }

    #[test]
    fn parses_index_or_name() {
        assert_eq!("2".parse::<Formula>().unwrap(), Formula::CelticFolded);
        assert_eq!("celtic_heart".parse::<Formula>().unwrap(), Formula::CelticHeart);
        assert!("burning_ship".parse::<Formula>().is_err());
        assert!("0".parse::<Formula>().is_err());
    }

    #[test]
    fn evaluate_matches_apply() {
        for f in Formula::ALL.iter() {
            assert_eq!(evaluate(f.index(), Z, C).unwrap(), f.apply(Z, C));
        }
    }
}
