use crate::{
    font::Font,
    image::CapturedImage,
    info::Info,
    page::{Page, PageContents},
    refs::{ObjectReferences, RefType},
    ExportError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::{collections::BTreeMap, rc::Rc};

#[derive(Default)]
/// A document stores all the contents of an exported PDF, then renders it out
/// with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    /// Fonts are shared with the measuring [FontBook](crate::FontBook), hence the [Rc]
    pub fonts: Arena<Rc<Font>>,
    pub images: Arena<CapturedImage>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its id
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Add a font to the document structure. Fonts are stored "globally" within the
    /// document so that any page can refer to them by index.
    pub fn add_font(&mut self, font: Rc<Font>) -> Id<Rc<Font>> {
        self.fonts.alloc(font)
    }

    /// Add an image to the document structure, returning its id. The id's index is
    /// what [ImageLayout](crate::ImageLayout)s refer to.
    pub fn add_image(&mut self, image: CapturedImage) -> Id<CapturedImage> {
        self.images.alloc(image)
    }

    /// Glyph encodings of every text run, per page, plus the glyphs each font
    /// needs to describe
    fn encode_text(&self) -> (Vec<Vec<Vec<u8>>>, Vec<BTreeMap<u16, char>>) {
        let mut used: Vec<BTreeMap<u16, char>> = vec![BTreeMap::new(); self.fonts.len()];
        let mut per_page = Vec::with_capacity(self.page_order.len());

        for id in self.page_order.iter() {
            let mut runs = Vec::new();
            if let Some(page) = self.pages.get(*id) {
                for content in page.contents.iter() {
                    if let PageContents::Text(text) = content {
                        let index = text.font_index;
                        let bytes = match (self.fonts.iter().nth(index), used.get_mut(index)) {
                            (Some((_, font)), Some(glyphs)) => font.encode(&text.text, glyphs),
                            _ => Vec::new(),
                        };
                        runs.push(bytes);
                    }
                }
            }
            per_page.push(runs);
        }

        (per_page, used)
    }

    /// Render the whole document into PDF bytes. References between objects are only
    /// resolved here, so pages, fonts and images can be freely added until then.
    pub fn write(self) -> Result<Vec<u8>, ExportError> {
        let (encoded, used) = self.encode_text();
        let Document {
            info,
            pages,
            page_order,
            fonts,
            images,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for ((i, font), glyphs) in fonts.iter().zip(used.iter()) {
            font.write(&mut refs, i.index(), glyphs, &mut writer);
        }

        for (i, image) in images.iter() {
            image.write(&mut refs, i.index(), &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(ExportError::PageMissing)?;
            let runs = encoded.get(page_index).map(Vec::as_slice).unwrap_or(&[]);
            page.write(
                &mut refs,
                page_index,
                fonts.len(),
                images.len(),
                runs,
                &mut writer,
            )?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        Ok(writer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{colours, units::*, ImageLayout, Rect, TextLayout};
    use image::{DynamicImage, RgbaImage};

    #[test]
    fn writes_a_single_page_pdf_with_an_image_and_text() {
        let mut doc = Document::default();
        let font = Font::load(include_bytes!("../assets/DejaVuSans.ttf").to_vec()).unwrap();
        let font = doc.add_font(Rc::new(font));
        let image = doc.add_image(CapturedImage::new(DynamicImage::ImageRgba8(
            RgbaImage::new(3, 4),
        )));
        let mut page = Page::new(Mm(210.0), Mm(297.0));
        let height = page.height();
        page.add_image(ImageLayout {
            image_index: image.index(),
            position: Rect::from_top_left(Mm(0.0), Mm(0.0), Mm(30.0), Mm(40.0), height),
        });
        page.add_text(TextLayout {
            text: "Создано".into(),
            font_index: font.index(),
            size: Pt(8.0),
            colour: colours::TIMESTAMP,
            coords: (Pt(14.0), Pt(8.5)),
        });
        doc.add_page(page);

        let bytes = doc.write().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("/Type0"));
        assert!(text.contains("/Identity-H"));
        assert!(text.contains("/CIDFontType2"));
        assert!(text.contains("/FontFile2"));
        assert!(text.contains("/ToUnicode"));
        assert!(!text.contains("/Helvetica"));
        assert!(text.contains("/Subtype /Image"));
        assert!(text.contains("/SMask"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }
}
