use crate::{
    colour::Colour,
    document::Document,
    export::{Artifact, ArtifactKind},
    font::Font,
    image::CapturedImage,
    info::Info,
    page::{ImageLayout, Page, RectLayout, TextLayout},
    pagesize::{page_dimensions, Orientation, PageFormat},
    rect::Rect,
    units::*,
    ExportError,
};
use std::rc::Rc;
use tracing::debug;

/// Builds the output document of an export, one primitive at a time.
///
/// All positions are in millimetres measured from the top-left corner of the page.
/// Text is positioned by the start of its baseline.
pub trait Assembler {
    /// Start a fresh single-page document, discarding anything drawn before
    fn new_document(&mut self, orientation: Orientation, format: PageFormat)
        -> Result<(), ExportError>;

    /// Metadata to store alongside the document. Assemblers without a metadata block
    /// may ignore it.
    fn set_info(&mut self, _info: Info) {}

    fn embed_image(
        &mut self,
        image: CapturedImage,
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
    ) -> Result<(), ExportError>;

    /// Stroke the outline of a rectangle
    fn draw_rect(
        &mut self,
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
        line_width: Mm,
        colour: Colour,
    ) -> Result<(), ExportError>;

    fn draw_text(
        &mut self,
        text: &str,
        x: Mm,
        y: Mm,
        size: Pt,
        colour: Colour,
    ) -> Result<(), ExportError>;

    /// Finish the document, handing it back as a named artifact
    fn save(&mut self, filename: &str) -> Result<Artifact, ExportError>;
}

struct Draft {
    document: Document,
    page: Page,
    font_index: usize,
}

/// An [Assembler] producing single-page PDF documents.
///
/// All text is set in one embedded TrueType font, so it has to cover every script
/// drawn (the timestamp is Cyrillic).
pub struct PdfAssembler {
    font: Rc<Font>,
    info: Option<Info>,
    draft: Option<Draft>,
}

impl PdfAssembler {
    /// An assembler embedding `font` into every document it builds
    pub fn new(font: Rc<Font>) -> PdfAssembler {
        PdfAssembler {
            font,
            info: None,
            draft: None,
        }
    }

    fn draft(&mut self) -> Result<&mut Draft, ExportError> {
        self.draft.as_mut().ok_or(ExportError::PageMissing)
    }
}

impl Assembler for PdfAssembler {
    fn new_document(
        &mut self,
        orientation: Orientation,
        format: PageFormat,
    ) -> Result<(), ExportError> {
        let (width, height) = page_dimensions(format, orientation);
        let mut document = Document::default();
        let font_index = document.add_font(self.font.clone()).index();
        debug!(%width, %height, font = %self.font.family(), "starting pdf document");
        self.info = None;
        self.draft = Some(Draft {
            document,
            page: Page::new(width, height),
            font_index,
        });
        Ok(())
    }

    fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    fn embed_image(
        &mut self,
        image: CapturedImage,
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
    ) -> Result<(), ExportError> {
        let draft = self.draft()?;
        let image_index = draft.document.add_image(image).index();
        let position = Rect::from_top_left(x, y, width, height, draft.page.height());
        draft.page.add_image(ImageLayout {
            image_index,
            position,
        });
        Ok(())
    }

    fn draw_rect(
        &mut self,
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
        line_width: Mm,
        colour: Colour,
    ) -> Result<(), ExportError> {
        let draft = self.draft()?;
        let position = Rect::from_top_left(x, y, width, height, draft.page.height());
        draft.page.add_rect(RectLayout {
            position,
            line_width: line_width.into(),
            colour,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: Mm,
        y: Mm,
        size: Pt,
        colour: Colour,
    ) -> Result<(), ExportError> {
        let draft = self.draft()?;
        let baseline: Pt = (draft.page.height() - y).into();
        draft.page.add_text(TextLayout {
            text: text.to_string(),
            font_index: draft.font_index,
            size,
            colour,
            coords: (x.into(), baseline),
        });
        Ok(())
    }

    fn save(&mut self, filename: &str) -> Result<Artifact, ExportError> {
        let Draft {
            mut document, page, ..
        } = self.draft.take().ok_or(ExportError::PageMissing)?;
        if let Some(info) = self.info.take() {
            document.set_info(info);
        }
        document.add_page(page);
        let bytes = document.write()?;
        debug!(filename, bytes = bytes.len(), "pdf document written");
        Ok(Artifact {
            filename: filename.to_string(),
            kind: ArtifactKind::Pdf,
            bytes,
        })
    }
}
