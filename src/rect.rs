use crate::units::*;

/// A rectangle in PDF space, specified by two opposite corners. PDF places the
/// origin at the bottom-left of the page with y growing upwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the lower-left corner.
    pub x1: Pt,
    /// The y-coordinate of the lower-left corner.
    pub y1: Pt,
    /// The x-coordinate of the upper-right corner.
    pub x2: Pt,
    /// The y-coordinate of the upper-right corner.
    pub y2: Pt,
}

impl Rect {
    /// Convert a box given in millimetres from the top-left corner of a page
    /// (the way label layouts are specified) into PDF space.
    pub fn from_top_left(x: Mm, y: Mm, width: Mm, height: Mm, page_height: Mm) -> Rect {
        let x1: Pt = x.into();
        let x2: Pt = (x + width).into();
        let y1: Pt = (page_height - y - height).into();
        let y2: Pt = (page_height - y).into();
        Rect { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}
