//! Length units used throughout the crate.
//!
//! Label geometry (grid cells, decorations) is computed in millimetres, the unit
//! printers and paper formats are specified in. PDF content streams are written
//! in points, so [Mm] values are converted to [Pt] at the last moment.

use derive_more::{Add, AddAssign, Display, From, Into, Sub, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

const PT_PER_MM: f32 = 72.0 / 25.4;

/// A length in PDF points (1/72 of an inch)
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, Sum, Display, From, Into, Serialize, Deserialize)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, Sum, Display, From, Into, Serialize, Deserialize)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * PT_PER_MM)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Self {
        Mm(pt.0 / PT_PER_MM)
    }
}

macro_rules! scalar_ops {
    ($unit:ident) => {
        impl Mul<f32> for $unit {
            type Output = $unit;
            fn mul(self, rhs: f32) -> $unit {
                $unit(self.0 * rhs)
            }
        }

        impl Mul<$unit> for f32 {
            type Output = $unit;
            fn mul(self, rhs: $unit) -> $unit {
                $unit(self * rhs.0)
            }
        }

        impl Div<f32> for $unit {
            type Output = $unit;
            fn div(self, rhs: f32) -> $unit {
                $unit(self.0 / rhs)
            }
        }

        /// Dividing two lengths yields a plain ratio
        impl Div<$unit> for $unit {
            type Output = f32;
            fn div(self, rhs: $unit) -> f32 {
                self.0 / rhs.0
            }
        }
    };
}

scalar_ops!(Pt);
scalar_ops!(Mm);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_millimetres_and_points() {
        let pt: Pt = Mm(25.4).into();
        assert!((pt.0 - 72.0).abs() < 1e-4);
        let mm: Mm = Pt(72.0).into();
        assert!((mm.0 - 25.4).abs() < 1e-4);
    }

    #[test]
    fn scalar_arithmetic() {
        assert_eq!(Mm(10.0) * 2.0, Mm(20.0));
        assert_eq!(Mm(10.0) / 4.0, Mm(2.5));
        assert_eq!(Mm(10.0) / Mm(4.0), 2.5);
        assert_eq!(Mm(1.0) + Mm(2.0) - Mm(0.5), Mm(2.5));
    }
}
