//! Paper formats labels can be exported onto.
//!
//! All sizes are stored in portrait orientation (width, height) where width ≤ height.
//! Use [page_dimensions] (or the [PageOrientation] trait) to obtain landscape sizes.
//!
//! ```
//! use price_tag::pagesize::{page_dimensions, Orientation, PageFormat};
//! use price_tag::Mm;
//!
//! let (w, h) = page_dimensions(PageFormat::A4, Orientation::Landscape);
//! assert_eq!((w, h), (Mm(297.0), Mm(210.0)));
//! ```

use crate::units::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Page dimensions as (width, height) in millimetres.
pub type PageSize = (Mm, Mm);

pub const A4: PageSize = (Mm(210.0), Mm(297.0));
pub const A5: PageSize = (Mm(148.0), Mm(210.0));
/// US Letter, rounded to whole millimetres
pub const LETTER: PageSize = (Mm(216.0), Mm(279.0));

/// A supported paper format
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    A4,
    A5,
    Letter,
}

impl PageFormat {
    /// The portrait size of the format
    pub fn size(self) -> PageSize {
        match self {
            PageFormat::A4 => A4,
            PageFormat::A5 => A5,
            PageFormat::Letter => LETTER,
        }
    }

    /// Upper-case display name, e.g. `A4`
    pub fn label(self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
            PageFormat::A5 => "A5",
            PageFormat::Letter => "LETTER",
        }
    }
}

impl FromStr for PageFormat {
    type Err = std::convert::Infallible;

    /// Unknown identifiers fall back to A4
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "a5" => PageFormat::A5,
            "letter" => PageFormat::Letter,
            _ => PageFormat::A4,
        })
    }
}

/// Which way round the page is printed
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

/// The (width, height) of a page of `format` printed in `orientation`
pub fn page_dimensions(format: PageFormat, orientation: Orientation) -> PageSize {
    match orientation {
        Orientation::Portrait => format.size().portrait(),
        Orientation::Landscape => format.size().landscape(),
    }
}
