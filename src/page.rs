use crate::colour::Colour;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use crate::ExportError;
use pdf_writer::{Content, Finish, Name, Pdf, Ref, Str};

/// A single run of text, positioned by its baseline start
#[derive(Clone, PartialEq, Debug)]
pub struct TextLayout {
    pub text: String,
    /// Index of the embedded font within the document
    pub font_index: usize,
    pub size: Pt,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// An image placed into a rectangle of the page
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_index: usize,
    pub position: Rect,
}

/// A stroked (unfilled) rectangle
#[derive(Clone, PartialEq, Debug)]
pub struct RectLayout {
    pub position: Rect,
    pub line_width: Pt,
    pub colour: Colour,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Image(ImageLayout),
    Rect(RectLayout),
    Text(TextLayout),
}

/// A single page of an exported document. Contents are painted in the order
/// they were added, so decorations added last end up on top of the labels.
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(width: Mm, height: Mm) -> Page {
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width.into(),
                y2: height.into(),
            },
            contents: Vec::default(),
        }
    }

    /// Height of the page in millimetres, used to flip top-left layout boxes
    pub fn height(&self) -> Mm {
        self.media_box.height().into()
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_rect(&mut self, rect: RectLayout) {
        self.contents.push(PageContents::Rect(rect));
    }

    pub fn add_text(&mut self, text: TextLayout) {
        self.contents.push(PageContents::Text(text));
    }

    /// Render the page contents into a content stream. `encoded` holds the glyph
    /// encoding of every text run, in page order.
    fn render(&self, encoded: &[Vec<u8>]) -> Vec<u8> {
        let mut content = Content::new();
        let mut encoded = encoded.iter();

        for page_content in self.contents.iter() {
            match page_content {
                PageContents::Image(image) => {
                    let p = &image.position;
                    content.save_state();
                    content.transform([p.width().0, 0.0, 0.0, p.height().0, p.x1.0, p.y1.0]);
                    content.x_object(Name(format!("I{}", image.image_index).as_bytes()));
                    content.restore_state();
                }
                PageContents::Rect(rect) => {
                    let p = &rect.position;
                    content.save_state();
                    rect.colour.apply_stroke(&mut content);
                    content.set_line_width(rect.line_width.0);
                    content.rect(p.x1.0, p.y1.0, p.width().0, p.height().0);
                    content.stroke();
                    content.restore_state();
                }
                PageContents::Text(text) => {
                    let name = format!("F{}", text.font_index);
                    let bytes = encoded.next().map(Vec::as_slice).unwrap_or_default();
                    content.save_state();
                    text.colour.apply_fill(&mut content);
                    content.begin_text();
                    content.set_font(Name(name.as_bytes()), text.size.0);
                    content.next_line(text.coords.0 .0, text.coords.1 .0);
                    content.show(Str(bytes));
                    content.end_text();
                    content.restore_state();
                }
            }
        }

        content.finish()
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        font_count: usize,
        image_count: usize,
        encoded: &[Vec<u8>],
        writer: &mut Pdf,
    ) -> Result<(), ExportError> {
        let id = refs
            .get(RefType::Page(page_index))
            .ok_or(ExportError::PageMissing)?;
        let parent = refs
            .get(RefType::PageTree)
            .ok_or(ExportError::PageMissing)?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for i in 0..font_count {
            if let Some(font_ref) = refs.get(RefType::Font(i)) {
                resource_fonts.pair(Name(format!("F{i}").as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for i in 0..image_count {
            let image_ref: Option<Ref> = refs.get(RefType::Image(i));
            if let Some(image_ref) = image_ref {
                resource_xobjects.pair(Name(format!("I{i}").as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = self.render(encoded);
        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}
