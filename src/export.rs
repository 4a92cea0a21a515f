use crate::{
    assembler::Assembler,
    colour::colours,
    info::Info,
    label::{LabelContent, LabelTemplate, LabelView},
    layout::{plan_grid, scale_to_fit, TextMeasure},
    pagesize::{page_dimensions, PageSize},
    settings::{ExportMode, ExportSettings},
    surface::{CaptureOptions, RenderSurface},
    units::*,
    ExportError,
};
use chrono::NaiveDateTime;
use std::{
    cell::Cell,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, warn};

/// Gap between the page edge and the optional border
pub const BORDER_INSET: Mm = Mm(2.0);
pub const BORDER_LINE_WIDTH: Mm = Mm(0.2);
/// Left edge of the timestamp baseline
pub const TIMESTAMP_X: Mm = Mm(5.0);
/// Distance of the timestamp baseline above the bottom page edge
pub const TIMESTAMP_BOTTOM: Mm = Mm(3.0);
pub const TIMESTAMP_SIZE: Pt = Pt(8.0);

/// Names longer than this are cut before they go into a filename
const MAX_NAME_CHARS: usize = 25;

/// Source of the current local time, for filenames and timestamps
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The wall clock, in the local time zone
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Pdf,
    Png,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Png => "png",
        }
    }
}

/// The finished output of an export, held in memory until the caller stores it
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Suggested name, not unique across exports made within the same minute
    pub filename: String,
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Write the artifact into `dir` under its filename, returning the full path
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Keep Latin and Cyrillic letters, digits and spaces, then cut the result to 25
/// characters and trim it. Any other whitespace becomes a plain space.
pub fn sanitize_product_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || *c == ' '
                || matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
        })
        .take(MAX_NAME_CHARS)
        .collect();
    kept.trim().to_string()
}

/// `ценник_{name}_{YYYY-MM-DD}_{HH-MM}[_{n}шт].{ext}`
pub fn export_filename(
    product_name: &str,
    now: NaiveDateTime,
    item_count: usize,
    kind: ArtifactKind,
) -> String {
    let copies = if item_count > 1 {
        format!("_{item_count}шт")
    } else {
        String::new()
    };
    format!(
        "ценник_{}_{}{}.{}",
        sanitize_product_name(product_name),
        now.format("%Y-%m-%d_%H-%M"),
        copies,
        kind.extension()
    )
}

/// The text of the optional timestamp decoration
pub fn timestamp_text(now: NaiveDateTime) -> String {
    format!("Создано: {}", now.format("%d.%m.%Y, %H:%M"))
}

/// Holds the busy flag for the duration of one export
struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Result<BusyGuard<'a>, ExportError> {
        if flag.replace(true) {
            return Err(ExportError::Busy);
        }
        Ok(BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Drives exports: every label is presented on the render surface with freshly fitted
/// text, captured, and placed into its cell of the output page.
///
/// Labels share the one surface, so they are processed strictly one after another.
/// Only one export may run at a time; a second call made while one is in flight fails
/// with [ExportError::Busy].
pub struct ExportOrchestrator<S, M> {
    surface: S,
    measure: M,
    template: LabelTemplate,
    clock: Box<dyn Clock>,
    busy: Cell<bool>,
}

impl<S: RenderSurface, M: TextMeasure> ExportOrchestrator<S, M> {
    pub fn new(surface: S, measure: M) -> Self {
        ExportOrchestrator {
            surface,
            measure,
            template: LabelTemplate::default(),
            clock: Box::new(SystemClock),
            busy: Cell::new(false),
        }
    }

    pub fn with_template(mut self, template: LabelTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether an export is currently running
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Fit `content` to the template and show it on the surface
    pub async fn present(&self, content: &LabelContent) -> Result<(), ExportError> {
        let view = LabelView::build(content, &self.template, &self.measure);
        self.surface.present(&view).await
    }

    /// Export `items` according to `settings`.
    ///
    /// `active` is the item the surface was showing before the export; it is shown
    /// again afterwards, whether the export succeeded or not. On failure nothing is
    /// returned and the user should be shown [ExportMode::failure_notice].
    pub async fn export<A: Assembler + ?Sized>(
        &self,
        items: &[LabelContent],
        active: usize,
        settings: &ExportSettings,
        assembler: &mut A,
    ) -> Result<Artifact, ExportError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        info!(
            mode = ?settings.mode,
            items = items.len(),
            count = settings.item_count,
            format = settings.format.label(),
            orientation = ?settings.orientation,
            surface = ?self.surface.dimensions(),
            "starting export"
        );

        // last item known to be on the surface; cleared while a present is in flight
        let mut presented = None;
        let result = match settings.mode {
            ExportMode::Document => {
                self.export_document(items, settings, assembler, &mut presented)
                    .await
            }
            ExportMode::Image => {
                self.export_image(items, active, settings, &mut presented)
                    .await
            }
        };

        if let Some(original) = items.get(active) {
            if presented != Some(active) {
                if let Err(e) = self.present(original).await {
                    warn!(error = %e, active, "failed to restore the active label");
                }
            }
        }

        match &result {
            Ok(artifact) => info!(
                filename = %artifact.filename,
                bytes = artifact.bytes.len(),
                "export finished"
            ),
            Err(e) => error!(
                error = %e,
                notice = settings.mode.failure_notice(),
                "export failed"
            ),
        }
        result
    }

    fn capture_options(&self, settings: &ExportSettings) -> CaptureOptions {
        CaptureOptions {
            scale: settings.quality.scale(),
            ..Default::default()
        }
    }

    async fn export_document<A: Assembler + ?Sized>(
        &self,
        items: &[LabelContent],
        settings: &ExportSettings,
        assembler: &mut A,
        presented: &mut Option<usize>,
    ) -> Result<Artifact, ExportError> {
        let first = items.first().ok_or(ExportError::NoItems)?;
        let now = self.clock.now();
        let count = settings.item_count.max(1);
        let page = page_dimensions(settings.format, settings.orientation);
        let cells = plan_grid(page.0, page.1, settings.orientation, count);
        let options = self.capture_options(settings);

        assembler.new_document(settings.orientation, settings.format)?;
        let mut info = Info::new();
        info.title(&first.product_name)
            .subject("Price tags")
            .created(now);
        assembler.set_info(info);

        for (i, cell) in cells.iter().enumerate() {
            let index = i % items.len();
            *presented = None;
            self.present(&items[index]).await?;
            *presented = Some(index);
            let image = self.surface.capture(&options).await?;
            let (width, height) = scale_to_fit(cell.width, cell.height, image.aspect_ratio()?);
            debug!(
                item = index,
                row = cell.row,
                column = cell.column,
                pixels = ?(image.width(), image.height()),
                %width,
                %height,
                "captured label"
            );
            assembler.embed_image(image, cell.x, cell.y, width, height)?;
        }

        decorate(assembler, settings, page, now)?;
        assembler.save(&export_filename(
            &first.product_name,
            now,
            count,
            ArtifactKind::Pdf,
        ))
    }

    async fn export_image(
        &self,
        items: &[LabelContent],
        active: usize,
        settings: &ExportSettings,
        presented: &mut Option<usize>,
    ) -> Result<Artifact, ExportError> {
        let index = if active < items.len() { active } else { 0 };
        let item = items.get(index).ok_or(ExportError::NoItems)?;
        let now = self.clock.now();

        self.present(item).await?;
        *presented = Some(index);
        let image = self.surface.capture(&self.capture_options(settings)).await?;
        image.aspect_ratio()?;
        debug!(
            item = index,
            pixels = ?(image.width(), image.height()),
            "captured label"
        );

        Ok(Artifact {
            filename: export_filename(&item.product_name, now, 1, ArtifactKind::Png),
            kind: ArtifactKind::Png,
            bytes: image.to_png()?,
        })
    }
}

/// Draw the page-wide border and timestamp, if enabled, on top of the labels
fn decorate<A: Assembler + ?Sized>(
    assembler: &mut A,
    settings: &ExportSettings,
    (width, height): PageSize,
    now: NaiveDateTime,
) -> Result<(), ExportError> {
    if settings.include_border {
        assembler.draw_rect(
            BORDER_INSET,
            BORDER_INSET,
            width - BORDER_INSET * 2.0,
            height - BORDER_INSET * 2.0,
            BORDER_LINE_WIDTH,
            colours::BORDER,
        )?;
    }
    if settings.include_timestamp {
        assembler.draw_text(
            &timestamp_text(now),
            TIMESTAMP_X,
            height - TIMESTAMP_BOTTOM,
            TIMESTAMP_SIZE,
            colours::TIMESTAMP,
        )?;
    }
    Ok(())
}
