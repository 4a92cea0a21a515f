use crate::refs::{ObjectReferences, RefType};
use crate::ExportError;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::io::Cursor;

/// A raster produced by capturing the render surface.
///
/// Only the pixel dimensions matter to layout (they give the aspect ratio); the
/// pixels themselves are embedded as-is. A capture is owned by the export call
/// that produced it and dropped once it has been embedded.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub image: DynamicImage,
}

struct EncodeOutput {
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl CapturedImage {
    pub fn new(image: DynamicImage) -> CapturedImage {
        CapturedImage { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width divided by height. Fails for images without any area.
    pub fn aspect_ratio(&self) -> Result<f32, ExportError> {
        match (self.width(), self.height()) {
            (0, _) | (_, 0) => Err(ExportError::ZeroSizeImage),
            (w, h) => Ok(w as f32 / h as f32),
        }
    }

    /// Encode the capture as a standalone PNG file
    pub fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        let mut out = Cursor::new(Vec::new());
        self.image.write_to(&mut out, ImageOutputFormat::Png)?;
        Ok(out.into_inner())
    }

    fn encode_raster(&self) -> EncodeOutput {
        let level = CompressionLevel::DefaultLevel as u8;

        let mask = self.image.color().has_alpha().then(|| {
            let alphas: Vec<u8> = self.image.pixels().map(|p| (p.2).0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });

        let bytes = compress_to_vec_zlib(self.image.to_rgb8().as_raw(), level);

        EncodeOutput { bytes, mask }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode_raster();
        let (width, height) = (self.width() as i32, self.height() as i32);

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(width);
        image.height(height);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(width);
            s_mask.height(height);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn aspect_ratio_of_label_capture() {
        let capture = CapturedImage::new(DynamicImage::ImageRgba8(RgbaImage::new(594, 840)));
        let ratio = capture.aspect_ratio().unwrap();
        assert!((ratio - 594.0 / 840.0).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_captures_have_no_aspect_ratio() {
        let capture = CapturedImage::new(DynamicImage::ImageRgba8(RgbaImage::new(0, 10)));
        assert!(matches!(capture.aspect_ratio(), Err(ExportError::ZeroSizeImage)));
    }

    #[test]
    fn png_encoding_starts_with_signature() {
        let capture = CapturedImage::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            6,
            Rgba([255, 195, 1, 255]),
        )));
        let png = capture.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn alpha_channel_becomes_a_soft_mask() {
        let capture = CapturedImage::new(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)));
        assert!(capture.encode_raster().mask.is_some());
        let opaque = CapturedImage::new(DynamicImage::ImageRgb8(image::RgbImage::new(2, 2)));
        assert!(opaque.encode_raster().mask.is_none());
    }
}
