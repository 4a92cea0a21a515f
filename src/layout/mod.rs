//! Layout computations for exporting labels.
//!
//! Two independent problems are solved here:
//!
//! - [`fit`](crate::layout::fit) / [`fit_lines`](crate::layout::fit_lines) pick the largest
//!   font size, within bounds, at which text stays inside a fixed-width label region
//! - [`plan_grid`](crate::layout::plan_grid) splits a page into cells for one or two labels,
//!   and [`scale_to_fit`](crate::layout::scale_to_fit) sizes a captured label image to a
//!   cell without distorting it
//!
//! # Example
//!
//! ```
//! use price_tag::layout::{plan_grid, scale_to_fit};
//! use price_tag::pagesize::{page_dimensions, Orientation, PageFormat};
//!
//! let (w, h) = page_dimensions(PageFormat::A4, Orientation::Landscape);
//! let cells = plan_grid(w, h, Orientation::Landscape, 2);
//! assert_eq!(cells.len(), 2);
//!
//! // a 297×420 px label capture
//! let (tw, th) = scale_to_fit(cells[1].width, cells[1].height, 297.0 / 420.0);
//! assert!(tw <= cells[1].width && th <= cells[1].height);
//! ```

mod fit;
mod grid;

pub use fit::*;
pub use grid::*;
