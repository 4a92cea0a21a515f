use crate::layout::GridSummary;
use crate::pagesize::{page_dimensions, Orientation, PageFormat};
use serde::{Deserialize, Serialize};

/// What an export produces
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// A one-page PDF holding one or two label images
    #[default]
    Document,
    /// A single PNG of the active label
    Image,
}

impl ExportMode {
    /// The blocking notice shown to the user when an export in this mode fails
    pub fn failure_notice(self) -> &'static str {
        match self {
            ExportMode::Document => {
                "Произошла ошибка при создании PDF файла. Попробуйте еще раз."
            }
            ExportMode::Image => {
                "Произошла ошибка при создании изображения. Попробуйте еще раз."
            }
        }
    }
}

/// Capture resolution. Higher quality renders the label at a larger pixel scale.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    #[default]
    High,
}

impl Quality {
    /// Device pixels per label pixel
    pub fn scale(self) -> f32 {
        match self {
            Quality::Low => 1.0,
            Quality::Medium => 1.5,
            Quality::High => 2.0,
        }
    }
}

/// How labels are laid out and decorated when exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    pub format: PageFormat,
    pub orientation: Orientation,
    pub quality: Quality,
    pub include_border: bool,
    pub include_timestamp: bool,
    /// Number of labels on the page, 1 or 2
    pub item_count: usize,
    pub mode: ExportMode,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            format: PageFormat::A4,
            orientation: Orientation::Landscape,
            quality: Quality::High,
            include_border: false,
            include_timestamp: false,
            item_count: 1,
            mode: ExportMode::Document,
        }
    }
}

impl ExportSettings {
    /// Whether two labels may share a page with these settings
    pub fn allows_two_items(&self) -> bool {
        self.orientation == Orientation::Landscape && self.mode == ExportMode::Document
    }

    /// A copy with the item count clamped into what the other settings permit
    pub fn normalized(&self) -> ExportSettings {
        let max = if self.allows_two_items() { 2 } else { 1 };
        ExportSettings {
            item_count: self.item_count.clamp(1, max),
            ..self.clone()
        }
    }

    /// Switch export mode. Image exports only ever hold one label.
    pub fn set_mode(&mut self, mode: ExportMode) {
        self.mode = mode;
        if mode == ExportMode::Image {
            self.item_count = 1;
        }
    }

    /// Describe the page layout these settings produce
    pub fn summary(&self) -> GridSummary {
        let (w, h) = page_dimensions(self.format, self.orientation);
        GridSummary::new(w, h, self.orientation, self.item_count)
    }
}
