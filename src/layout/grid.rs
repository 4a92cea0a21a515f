use crate::pagesize::Orientation;
use crate::units::Mm;
use serde::Serialize;

/// A rectangular region of a page that holds exactly one label image.
///
/// Cells are measured from the top-left corner of the page and are recomputed for
/// every export.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
    pub height: Mm,
}

/// Number of labels placed side by side in a row. Two labels only share a row on a
/// landscape page; everything else stacks one per row.
pub fn columns_per_row(orientation: Orientation, item_count: usize) -> usize {
    if orientation == Orientation::Landscape && item_count == 2 {
        2
    } else {
        1
    }
}

/// Split a page into one cell per item. The cells tile the page left-to-right, then
/// top-to-bottom, without gaps or margins, so together they cover the page exactly.
pub fn plan_grid(
    page_width: Mm,
    page_height: Mm,
    orientation: Orientation,
    item_count: usize,
) -> Vec<GridCell> {
    if item_count == 0 {
        return Vec::new();
    }

    let columns = columns_per_row(orientation, item_count);
    let rows = item_count.div_ceil(columns);
    let width = page_width / columns as f32;
    let height = page_height / rows as f32;

    (0..item_count)
        .map(|i| {
            let (row, column) = (i / columns, i % columns);
            GridCell {
                row,
                column,
                x: width * column as f32,
                y: height * row as f32,
                width,
                height,
            }
        })
        .collect()
}

/// Scale an image with the given aspect ratio (width / height) to the largest size that
/// fits inside a cell without distortion. One side always matches the cell exactly.
///
/// The image is anchored at the cell origin by callers; slack on the other axis is left
/// empty rather than split around the image.
pub fn scale_to_fit(cell_width: Mm, cell_height: Mm, aspect_ratio: f32) -> (Mm, Mm) {
    let mut width = cell_width;
    let mut height = width / aspect_ratio;
    if height > cell_height {
        height = cell_height;
        width = height * aspect_ratio;
    }
    (width, height)
}

/// How labels are arranged on the page, for display next to the export settings
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GridSummary {
    pub columns: usize,
    pub rows: usize,
    pub page_width: Mm,
    pub page_height: Mm,
}

impl GridSummary {
    pub fn new(page_width: Mm, page_height: Mm, orientation: Orientation, item_count: usize) -> Self {
        let columns = columns_per_row(orientation, item_count);
        GridSummary {
            columns,
            rows: item_count.max(1).div_ceil(columns),
            page_width,
            page_height,
        }
    }
}

impl std::fmt::Display for GridSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}×{}, {}×{} mm",
            self.columns, self.rows, self.page_width.0, self.page_height.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: Mm = Mm(297.0);
    const H: Mm = Mm(210.0);

    fn close(a: Mm, b: Mm) -> bool {
        (a.0 - b.0).abs() < 1e-3
    }

    #[test]
    fn two_landscape_items_share_a_row() {
        let cells = plan_grid(W, H, Orientation::Landscape, 2);
        assert_eq!(cells.len(), 2);
        assert_eq!((cells[0].row, cells[0].column), (0, 0));
        assert_eq!((cells[1].row, cells[1].column), (0, 1));
        for cell in cells.iter() {
            assert_eq!(cell.width, W / 2.0);
            assert_eq!(cell.height, H);
            assert_eq!(cell.y, Mm(0.0));
        }
        assert_eq!(cells[0].x, Mm(0.0));
        // no overlap, no gap
        assert_eq!(cells[0].x + cells[0].width, cells[1].x);
        assert_eq!(cells[1].x + cells[1].width, W);
    }

    #[test]
    fn a_single_item_spans_the_page() {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let cells = plan_grid(W, H, orientation, 1);
            assert_eq!(
                cells,
                vec![GridCell {
                    row: 0,
                    column: 0,
                    x: Mm(0.0),
                    y: Mm(0.0),
                    width: W,
                    height: H,
                }]
            );
        }
    }

    #[test]
    fn two_portrait_items_stack() {
        let cells = plan_grid(Mm(210.0), Mm(297.0), Orientation::Portrait, 2);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].row, 1);
        assert_eq!(cells[1].column, 0);
        assert!(close(cells[1].y, Mm(148.5)));
        assert!(close(cells[1].y + cells[1].height, Mm(297.0)));
        assert_eq!(cells[0].width, Mm(210.0));
    }

    #[test]
    fn no_items_no_cells() {
        assert!(plan_grid(W, H, Orientation::Landscape, 0).is_empty());
    }

    #[test]
    fn tall_images_are_limited_by_height() {
        // portrait label into a landscape half page
        let (w, h) = scale_to_fit(Mm(148.5), Mm(200.0), 297.0 / 420.0);
        assert_eq!(h, Mm(200.0));
        assert!(close(w, Mm(200.0 * 297.0 / 420.0)));
        assert!(w.0 < 148.5);
    }

    #[test]
    fn wide_images_are_limited_by_width() {
        let (w, h) = scale_to_fit(Mm(100.0), Mm(100.0), 2.0);
        assert_eq!(w, Mm(100.0));
        assert_eq!(h, Mm(50.0));
    }

    #[test]
    fn scaling_preserves_aspect_ratio_and_stays_inside() {
        for &(cw, ch) in &[(297.0, 210.0), (148.5, 210.0), (210.0, 148.5), (1.0, 1000.0)] {
            for &ratio in &[0.1f32, 0.5, 297.0 / 420.0, 1.0, 1.5, 4.0] {
                let (w, h) = scale_to_fit(Mm(cw), Mm(ch), ratio);
                assert!(w.0 <= cw + 1e-3 && h.0 <= ch + 1e-3);
                assert!((w.0 / h.0 - ratio).abs() < 1e-3 * ratio.max(1.0));
                assert!(close(w, Mm(cw)) || close(h, Mm(ch)));
            }
        }
    }

    #[test]
    fn summary_reports_columns_and_rows() {
        let summary = GridSummary::new(W, H, Orientation::Landscape, 2);
        assert_eq!((summary.columns, summary.rows), (2, 1));
        assert_eq!(summary.to_string(), "2×1, 297×210 mm");
        let summary = GridSummary::new(H, W, Orientation::Portrait, 1);
        assert_eq!((summary.columns, summary.rows), (1, 1));
    }
}
