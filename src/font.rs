use crate::{
    refs::{ObjectReferences, RefType},
    ExportError,
};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Str,
};
use std::collections::BTreeMap;

/// A parsed TrueType / OpenType font.
///
/// Fonts serve two purposes: measuring label text while fitting font sizes, and
/// drawing page decorations (the timestamp) into exported documents. When a font
/// is written into a PDF only the glyphs that were actually drawn get width and
/// unicode entries, although the font program itself is embedded whole.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, ExportError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The family name of the font, or an empty string if the font does not carry one
    pub fn family(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
            .unwrap_or_default()
    }

    /// The PostScript-ish name written into PDF font dictionaries. Spaces are not
    /// allowed in PDF names, so they are stripped.
    fn base_name(&self) -> String {
        let name = self
            .name_entry(owned_ttf_parser::name_id::POST_SCRIPT_NAME)
            .or_else(|| self.name_entry(owned_ttf_parser::name_id::FULL_NAME))
            .unwrap_or_else(|| "LabelFont".to_string());
        name.chars().filter(|c| c.is_ascii_graphic()).collect()
    }

    /// Obtain the weight of the font on the usual 100 (thin) to 900 (black) scale,
    /// where 400 is regular and 700 is bold
    pub fn weight(&self) -> u16 {
        self.face.as_face_ref().weight().to_number()
    }

    fn scaling(&self, size: f32) -> f32 {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Glyph for `ch`, falling back to the replacement character and then to '?'
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .map(|gid| gid.0)
    }

    /// Horizontal advance of a glyph in font units
    pub fn advance(&self, glyph: u16) -> u16 {
        self.face
            .as_face_ref()
            .glyph_hor_advance(GlyphId(glyph))
            .unwrap_or_default()
    }

    /// Width of a single line of text at `size`, in the same unit as `size`.
    /// Characters without any usable glyph contribute nothing.
    pub fn width_of_text(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .filter_map(|ch| self.glyph_id(ch))
            .map(|gid| self.advance(gid) as u32)
            .sum();
        units as f32 * self.scaling(size)
    }

    /// Encode text as the big-endian glyph ids an Identity-H font expects,
    /// recording which character every glyph stands for
    pub(crate) fn encode(&self, text: &str, used: &mut BTreeMap<u16, char>) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            if let Some(gid) = self.glyph_id(ch) {
                used.entry(gid).or_insert(ch);
                bytes.extend_from_slice(&gid.to_be_bytes());
            }
        }
        bytes
    }

    /// Write the font as a Type0 / CIDFontType2 font. `used` maps every glyph
    /// that appears in content streams to the character it was drawn for.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        used: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) {
        let face = self.face.as_face_ref();
        let to_pdf = 1000.0 / face.units_per_em() as f32;
        let base_name = self.base_name();

        let font_id = refs.gen(RefType::Font(font_index));
        let cid_id = refs.gen(RefType::CidFont(font_index));
        let descriptor_id = refs.gen(RefType::FontDescriptor(font_index));
        let data_id = refs.gen(RefType::FontData(font_index));
        let to_unicode_id = refs.gen(RefType::ToUnicode(font_index));

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(base_name.as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_id);
        font.to_unicode(to_unicode_id);
        font.finish();

        let mut cid = writer.cid_font(cid_id);
        cid.subtype(CidFontType::Type2);
        cid.base_font(Name(base_name.as_bytes()));
        cid.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid.font_descriptor(descriptor_id);
        cid.default_width(1000.0);
        let mut widths = cid.widths();
        for &gid in used.keys() {
            widths.consecutive(gid, [self.advance(gid) as f32 * to_pdf]);
        }
        widths.finish();
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        cid.finish();

        let bbox = face.global_bounding_box();
        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }
        let mut descriptor = writer.font_descriptor(descriptor_id);
        descriptor.name(Name(base_name.as_bytes()));
        descriptor.flags(flags);
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * to_pdf,
            y1: bbox.y_min as f32 * to_pdf,
            x2: bbox.x_max as f32 * to_pdf,
            y2: bbox.y_max as f32 * to_pdf,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * to_pdf);
        descriptor.descent(face.descender() as f32 * to_pdf);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * to_pdf)
                .unwrap_or(700.0),
        );
        // no reliable source for the stem width in TrueType tables
        descriptor.stem_v(80.0);
        descriptor.font_file2(data_id);
        descriptor.finish();

        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let cmap = to_unicode_cmap(used);
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            cmap.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(to_unicode_id, compressed.as_slice())
            .filter(Filter::FlateDecode);
    }
}

/// Build a ToUnicode CMap so that text drawn with the font can be copied and searched.
/// `bfchar` blocks are limited to 100 entries each.
fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = used.iter().collect();
    for block in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", block.len()));
        for (gid, ch) in block {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            cmap.push_str(&format!("<{gid:04X}> <{hex}>\n"));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmap_lists_every_used_glyph() {
        let used: BTreeMap<u16, char> = [(3, 'A'), (17, 'Я')].into_iter().collect();
        let cmap = to_unicode_cmap(&used);
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0003> <0041>"));
        assert!(cmap.contains("<0011> <042F>"));
    }

    #[test]
    fn cmap_splits_large_glyph_sets_into_blocks() {
        let used: BTreeMap<u16, char> = (0..250u16)
            .map(|i| (i, char::from_u32(0x41 + i as u32).unwrap()))
            .collect();
        let cmap = to_unicode_cmap(&used);
        assert_eq!(cmap.matches("100 beginbfchar").count(), 2);
        assert_eq!(cmap.matches("50 beginbfchar").count(), 1);
    }

    fn dejavu() -> Font {
        Font::load(include_bytes!("../assets/DejaVuSans.ttf").to_vec()).unwrap()
    }

    #[test]
    fn names_and_weight_come_from_the_font_tables() {
        let font = dejavu();
        assert_eq!(font.family(), "DejaVu Sans");
        assert_eq!(font.base_name(), "DejaVuSans");
        assert_eq!(font.weight(), 400);
    }

    #[test]
    fn widths_scale_with_size() {
        let font = dejavu();
        let small = font.width_of_text("Milk 1L", 10.0);
        let large = font.width_of_text("Milk 1L", 20.0);
        assert!(small > 0.0);
        assert!((large - 2.0 * small).abs() < 1e-3);
        assert!(font.width_of_text("Молоко", 10.0) > font.width_of_text("Мол", 10.0));
        assert_eq!(font.width_of_text("", 10.0), 0.0);
    }

    #[test]
    fn encoding_records_every_drawn_character() {
        let font = dejavu();
        let mut used = BTreeMap::new();
        let bytes = font.encode("Создано", &mut used);
        assert_eq!(bytes.len(), 2 * 7);
        // 'о' appears twice but maps to one glyph
        assert_eq!(used.len(), 6);
        for ch in "Создано".chars() {
            let gid = font.glyph_id(ch).unwrap();
            assert_ne!(gid, 0, "{ch} has no glyph");
            assert_eq!(used.get(&gid), Some(&ch));
        }
        let first = u16::from_be_bytes([bytes[0], bytes[1]]);
        assert_eq!(Some(first), font.glyph_id('С'));
    }

    #[test]
    fn written_font_maps_drawn_glyphs_back_to_text() {
        let font = dejavu();
        let mut used = BTreeMap::new();
        font.encode("Создано: 17.05.2024, 14:03", &mut used);

        let cmap = to_unicode_cmap(&used);
        for ch in "Создано: 17.05.2024, 14:03".chars() {
            let entry = format!("<{:04X}> <{:04X}>", font.glyph_id(ch).unwrap(), ch as u32);
            assert!(cmap.contains(&entry), "missing {entry}");
        }

        let mut refs = ObjectReferences::new();
        let mut writer = Pdf::new();
        font.write(&mut refs, 0, &used, &mut writer);
        let bytes = writer.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Subtype /Type0"));
        assert!(text.contains("/BaseFont /DejaVuSans"));
        assert!(text.contains("/CIDFontType2"));
        assert!(text.contains("/ToUnicode"));

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            cmap.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        assert!(bytes.windows(compressed.len()).any(|w| w == compressed));
    }

    #[test]
    fn garbage_bytes_are_not_a_font() {
        assert!(matches!(
            Font::load(vec![0u8; 16]),
            Err(ExportError::FaceParsingError(_))
        ));
    }
}
