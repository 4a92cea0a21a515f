mod assembler;
pub use assembler::*;

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod document;
pub use document::*;

mod export;
pub use export::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

mod label;
pub use label::*;

/// Text fitting and page grid computations for exported labels
pub mod layout;
pub use layout::{FontBook, TextMeasure};

mod page;
pub use page::*;

/// Paper formats and orientations
pub mod pagesize;

mod price;
pub use price::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod settings;
pub use settings::*;

mod surface;
pub use surface::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
