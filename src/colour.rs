/// A colour, expressed in the RGB or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the Gray space, g ranges from 0 to 255
    pub fn new_grey_bytes(g: u8) -> Colour {
        Colour::Grey {
            g: g as f32 / 255.0,
        }
    }

    /// The colour as 8-bit RGB channels, for painting raster backgrounds
    pub fn to_rgb_bytes(self) -> [u8; 3] {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self {
            Colour::RGB { r, g, b } => [byte(r), byte(g), byte(b)],
            Colour::Grey { g } => [byte(g); 3],
        }
    }

    pub(crate) fn apply_stroke(self, content: &mut pdf_writer::Content) {
        match self {
            Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
            Colour::Grey { g } => content.set_stroke_gray(g),
        };
    }

    pub(crate) fn apply_fill(self, content: &mut pdf_writer::Content) {
        match self {
            Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
            Colour::Grey { g } => content.set_fill_gray(g),
        };
    }
}

/// Colours of the price tag and its page decorations
pub mod colours {
    use super::*;

    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    /// The accent yellow of the label blocks, `rgb(255, 195, 1)`
    pub const ACCENT: Colour = Colour::RGB {
        r: 1.0,
        g: 195.0 / 255.0,
        b: 1.0 / 255.0,
    };
    /// Page border, `rgb(200, 200, 200)`
    pub const BORDER: Colour = Colour::Grey { g: 200.0 / 255.0 };
    /// Timestamp text, `rgb(128, 128, 128)`
    pub const TIMESTAMP: Colour = Colour::Grey { g: 128.0 / 255.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_bytes_round_trip_through_channels() {
        assert_eq!(colours::ACCENT.to_rgb_bytes(), [255, 195, 1]);
        assert_eq!(colours::WHITE.to_rgb_bytes(), [255, 255, 255]);
        assert_eq!(Colour::new_grey_bytes(128), colours::TIMESTAMP);
    }
}
