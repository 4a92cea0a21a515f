use crate::font::Font;
use crate::ExportError;
use std::collections::HashMap;
use std::rc::Rc;

/// Something that can tell how wide a line of text renders.
///
/// Widths and sizes share one unit (label pixels for the built-in template).
pub trait TextMeasure {
    /// Width of `text` drawn in `family` at `weight` (100..=900) and `size`
    fn text_width(&self, text: &str, size: f32, family: &str, weight: u16) -> f32;
}

/// Bounds and font settings for fitting text into a container
#[derive(Debug, Clone, PartialEq)]
pub struct FitConstraints {
    pub min_size: u32,
    pub max_size: u32,
    /// Horizontal space inside the container that text may not use (padding on both sides)
    pub padding: f32,
    pub weight: u16,
    pub family: String,
}

/// The outcome of fitting text into a container
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FitResult {
    /// The chosen font size, always within `[min_size, max_size]`
    pub size: u32,
    /// `false` when nothing in range fit and `size` is the `min_size` floor.
    /// The render layer clips or truncates in that case.
    pub fits: bool,
}

/// Widths measured during a single fit call.
///
/// The scope lives exactly as long as one call to [fit_lines], so nothing measured
/// for one text or container can leak into the next call.
struct MeasureScope<'m, M: TextMeasure + ?Sized> {
    measure: &'m M,
    constraints: &'m FitConstraints,
    widths: HashMap<(usize, u32), f32>,
}

impl<'m, M: TextMeasure + ?Sized> MeasureScope<'m, M> {
    fn new(measure: &'m M, constraints: &'m FitConstraints) -> Self {
        MeasureScope {
            measure,
            constraints,
            widths: HashMap::new(),
        }
    }

    fn width(&mut self, line: usize, text: &str, size: u32) -> f32 {
        let (measure, c) = (self.measure, self.constraints);
        *self
            .widths
            .entry((line, size))
            .or_insert_with(|| measure.text_width(text, size as f32, &c.family, c.weight))
    }

    fn all_fit<S: AsRef<str>>(&mut self, lines: &[S], size: u32, usable: f32) -> bool {
        lines
            .iter()
            .enumerate()
            .all(|(i, line)| self.width(i, line.as_ref(), size) <= usable)
    }
}

/// Find the largest font size at which `text` fits in a container `container_width` wide.
///
/// Never fails: if even `min_size` is too wide, `min_size` is returned with
/// [FitResult::fits] unset.
pub fn fit<M: TextMeasure + ?Sized>(
    text: &str,
    container_width: f32,
    constraints: &FitConstraints,
    measure: &M,
) -> FitResult {
    fit_lines(&[text], container_width, constraints, measure)
}

/// Find the largest font size at which _every_ line fits in the container, so that all
/// lines share one size and shrink together.
///
/// Widths grow with font size, so the sizes that fit form a prefix of the range and a
/// binary search finds the same size a descent from `max_size` would.
pub fn fit_lines<M: TextMeasure + ?Sized, S: AsRef<str>>(
    lines: &[S],
    container_width: f32,
    constraints: &FitConstraints,
    measure: &M,
) -> FitResult {
    let lo = constraints.min_size.min(constraints.max_size);
    let hi = constraints.max_size.max(constraints.min_size);
    let usable = container_width - constraints.padding;

    let mut scope = MeasureScope::new(measure, constraints);
    if !scope.all_fit(lines, lo, usable) {
        return FitResult {
            size: lo,
            fits: false,
        };
    }

    // invariant: `best` fits, everything above `high` does not
    let (mut best, mut high) = (lo, hi);
    while best < high {
        let mid = best + (high - best).div_ceil(2);
        if scope.all_fit(lines, mid, usable) {
            best = mid;
        } else {
            high = mid - 1;
        }
    }

    FitResult {
        size: best,
        fits: true,
    }
}

/// The set of fonts label text is measured (and decorations drawn) with
pub struct FontBook {
    fonts: Vec<(String, Rc<Font>)>,
}

impl FontBook {
    pub fn new(fonts: Vec<Font>) -> Result<FontBook, ExportError> {
        if fonts.is_empty() {
            return Err(ExportError::NoFonts);
        }
        let fonts = fonts
            .into_iter()
            .map(|font| (font.family().to_lowercase(), Rc::new(font)))
            .collect();
        Ok(FontBook { fonts })
    }

    /// Pick the font for `family` whose weight is closest to `weight`. When no font of
    /// that family is loaded, the closest weight among all fonts is used instead.
    pub fn select(&self, family: &str, weight: u16) -> &Rc<Font> {
        let family = family.to_lowercase();
        closest_weight(self.fonts.iter().filter(|(f, _)| *f == family), weight)
            .or_else(|| closest_weight(self.fonts.iter(), weight))
            .unwrap_or(&self.fonts[0].1)
    }

    /// The first font of the book, used for page decorations
    pub fn primary(&self) -> &Rc<Font> {
        &self.fonts[0].1
    }
}

fn closest_weight<'a>(
    fonts: impl Iterator<Item = &'a (String, Rc<Font>)>,
    weight: u16,
) -> Option<&'a Rc<Font>> {
    fonts
        .min_by_key(|(_, font)| font.weight().abs_diff(weight))
        .map(|(_, font)| font)
}

impl TextMeasure for FontBook {
    fn text_width(&self, text: &str, size: f32, family: &str, weight: u16) -> f32 {
        self.select(family, weight).width_of_text(text, size)
    }
}
