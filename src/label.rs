use crate::layout::{fit, fit_lines, FitConstraints, FitResult, TextMeasure};
use crate::price::format_price;
use serde::{Deserialize, Serialize};

/// A label holds at most this many specification rows
pub const MAX_SPECIFICATIONS: usize = 4;

/// One "key: value" row of the specification block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    /// Unique within its label; stays the same when other rows are added or removed
    pub id: u64,
    pub key: String,
    pub value: String,
}

impl Specification {
    /// Rows are only printed once both halves are filled in
    pub fn is_displayable(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpecificationField {
    Key,
    Value,
}

/// Everything printed on one price tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelContent {
    pub product_name: String,
    specifications: Vec<Specification>,
    /// Numeric text, formatted for display when rendered
    pub current_price: String,
    /// Only shown while `has_discount` is set
    pub original_price: String,
    pub has_discount: bool,
    pub currency: String,
}

impl Default for LabelContent {
    fn default() -> Self {
        LabelContent {
            product_name: "Название и модель товара".to_string(),
            specifications: (1..=4)
                .map(|i| Specification {
                    id: i,
                    key: "Характеристики".to_string(),
                    value: i.to_string(),
                })
                .collect(),
            current_price: "900000".to_string(),
            original_price: "1000000".to_string(),
            has_discount: true,
            currency: "тенге/шт".to_string(),
        }
    }
}

impl LabelContent {
    pub fn new(product_name: impl Into<String>, current_price: impl Into<String>) -> Self {
        LabelContent {
            product_name: product_name.into(),
            specifications: Vec::new(),
            current_price: current_price.into(),
            original_price: String::new(),
            has_discount: false,
            currency: "тенге/шт".to_string(),
        }
    }

    pub fn specifications(&self) -> &[Specification] {
        &self.specifications
    }

    /// Append an empty row, returning its id. Nothing is added once the label
    /// already has [MAX_SPECIFICATIONS] rows.
    pub fn add_specification(&mut self) -> Option<u64> {
        if self.specifications.len() >= MAX_SPECIFICATIONS {
            return None;
        }
        let id = self.specifications.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        self.specifications.push(Specification {
            id,
            key: String::new(),
            value: String::new(),
        });
        Some(id)
    }

    /// Builder-style [add_specification](Self::add_specification) with both halves filled in
    pub fn with_specification(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(id) = self.add_specification() {
            self.update_specification(id, SpecificationField::Key, key);
            self.update_specification(id, SpecificationField::Value, value);
        }
        self
    }

    /// Remove a row. The last remaining row is kept so the editor always has one to fill in.
    pub fn remove_specification(&mut self, id: u64) -> bool {
        if self.specifications.len() <= 1 {
            return false;
        }
        let before = self.specifications.len();
        self.specifications.retain(|s| s.id != id);
        self.specifications.len() != before
    }

    pub fn update_specification(
        &mut self,
        id: u64,
        field: SpecificationField,
        text: impl Into<String>,
    ) -> bool {
        match self.specifications.iter_mut().find(|s| s.id == id) {
            Some(spec) => {
                match field {
                    SpecificationField::Key => spec.key = text.into(),
                    SpecificationField::Value => spec.value = text.into(),
                }
                true
            }
            None => false,
        }
    }

    /// Rows with both key and value, in their original order
    pub fn displayable_specifications(&self) -> impl Iterator<Item = &Specification> {
        self.specifications.iter().filter(|s| s.is_displayable())
    }

    /// The printed specification rows, `key: value`
    pub fn specification_lines(&self) -> Vec<String> {
        self.displayable_specifications()
            .map(|s| format!("{}: {}", s.key, s.value))
            .collect()
    }
}

/// A fixed-width text region of the label template
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    /// Width of the region, in label pixels
    pub width: f32,
    pub constraints: FitConstraints,
}

/// The fixed template every label is rendered with. Sizes are in CSS pixels of a
/// 297×420 label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTemplate {
    pub width: u32,
    pub height: u32,
    pub product_name: TextRegion,
    pub specifications: TextRegion,
}

impl Default for LabelTemplate {
    fn default() -> Self {
        LabelTemplate {
            width: 297,
            height: 420,
            product_name: TextRegion {
                width: 256.0,
                constraints: FitConstraints {
                    min_size: 10,
                    max_size: 16,
                    padding: 32.0,
                    weight: 700,
                    family: "Arial".to_string(),
                },
            },
            specifications: TextRegion {
                width: 297.0,
                constraints: FitConstraints {
                    min_size: 8,
                    max_size: 14,
                    padding: 32.0,
                    weight: 400,
                    family: "Arial".to_string(),
                },
            },
        }
    }
}

/// Label content resolved for rendering: fitted font sizes, display prices and the
/// rows that are actually printed.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelView {
    pub product_name: String,
    pub product_name_fit: FitResult,
    pub specification_lines: Vec<String>,
    /// Shared by every specification line
    pub specifications_fit: FitResult,
    pub current_price: String,
    /// Present only for discounted labels with an original price
    pub original_price: Option<String>,
    pub currency: String,
}

impl LabelView {
    /// Resolve `content` against `template`. Font sizes are fitted afresh on every
    /// call so that a view never carries sizes computed for another label.
    pub fn build<M: TextMeasure + ?Sized>(
        content: &LabelContent,
        template: &LabelTemplate,
        measure: &M,
    ) -> LabelView {
        let name = &template.product_name;
        let specs = &template.specifications;
        let specification_lines = content.specification_lines();

        let original_price = (content.has_discount && !content.original_price.is_empty())
            .then(|| format_price(&content.original_price));

        LabelView {
            product_name: content.product_name.clone(),
            product_name_fit: fit(&content.product_name, name.width, &name.constraints, measure),
            specifications_fit: fit_lines(
                &specification_lines,
                specs.width,
                &specs.constraints,
                measure,
            ),
            specification_lines,
            current_price: format_price(&content.current_price),
            original_price,
            currency: content.currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PerChar(f32);

    impl TextMeasure for PerChar {
        fn text_width(&self, text: &str, size: f32, _family: &str, _weight: u16) -> f32 {
            text.chars().count() as f32 * size * self.0
        }
    }

    #[test]
    fn defaults_have_four_specifications() {
        let mut label = LabelContent::default();
        assert_eq!(label.specifications().len(), 4);
        assert_eq!(label.specification_lines()[0], "Характеристики: 1");
        assert_eq!(label.add_specification(), None);
    }

    #[test]
    fn added_rows_get_fresh_ids() {
        let mut label = LabelContent::new("Milk", "450");
        let a = label.add_specification().unwrap();
        let b = label.add_specification().unwrap();
        assert_ne!(a, b);
        assert!(label.remove_specification(a));
        let c = label.add_specification().unwrap();
        assert_ne!(c, b);
    }

    #[test]
    fn never_more_than_four_rows() {
        let mut label = LabelContent::new("Milk", "450");
        for _ in 0..10 {
            label.add_specification();
        }
        assert_eq!(label.specifications().len(), MAX_SPECIFICATIONS);
    }

    #[test]
    fn the_last_row_cannot_be_removed() {
        let mut label = LabelContent::new("Milk", "450").with_specification("Fat", "3.2%");
        let id = label.specifications()[0].id;
        assert!(!label.remove_specification(id));
        assert_eq!(label.specifications().len(), 1);
    }

    #[test]
    fn only_complete_rows_are_printed() {
        let mut label = LabelContent::new("Milk", "450")
            .with_specification("Fat", "3.2%")
            .with_specification("Volume", "");
        let id = label.add_specification().unwrap();
        label.update_specification(id, SpecificationField::Value, "orphan");
        assert_eq!(label.specification_lines(), vec!["Fat: 3.2%".to_string()]);
    }

    #[test]
    fn updating_an_unknown_row_reports_failure() {
        let mut label = LabelContent::default();
        assert!(!label.update_specification(99, SpecificationField::Key, "x"));
    }

    #[test]
    fn view_formats_prices_and_hides_original_without_discount() {
        let template = LabelTemplate::default();
        let mut label = LabelContent::default();
        let view = LabelView::build(&label, &template, &PerChar(0.5));
        assert_eq!(view.current_price, "900\u{a0}000");
        assert_eq!(view.original_price.as_deref(), Some("1\u{a0}000\u{a0}000"));

        label.has_discount = false;
        let view = LabelView::build(&label, &template, &PerChar(0.5));
        assert_eq!(view.original_price, None);

        label.has_discount = true;
        label.original_price.clear();
        let view = LabelView::build(&label, &template, &PerChar(0.5));
        assert_eq!(view.original_price, None);
    }

    #[test]
    fn view_fits_name_and_specifications_separately() {
        let template = LabelTemplate::default();
        let short = LabelContent::new("Milk", "450").with_specification("Fat", "3.2%");
        let long = LabelContent::new("Холодильник Samsung RB37A5200SA", "450")
            .with_specification("Fat", "3.2%");

        let measure = PerChar(0.55);
        let short_view = LabelView::build(&short, &template, &measure);
        let long_view = LabelView::build(&long, &template, &measure);
        assert_eq!(short_view.product_name_fit.size, 16);
        assert!(long_view.product_name_fit.size < 16);
        assert_eq!(
            short_view.specifications_fit,
            long_view.specifications_fit
        );
    }
}
