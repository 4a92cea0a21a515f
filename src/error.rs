use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to encode or decode a raster
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// A configuration file could not be (de)serialized
    Config(#[from] serde_json::Error),

    #[error("capture failed: {0}")]
    /// The render surface could not be converted into a raster image
    Capture(String),

    #[error("document assembly failed: {0}")]
    /// The output document could not be assembled or saved
    Assembly(String),

    #[error("captured image has zero width or height")]
    /// A capture produced an image with no area, so it has no aspect ratio
    ZeroSizeImage,

    #[error("an export is already in progress")]
    /// Another export is still running on the same orchestrator
    Busy,

    #[error("there are no labels to export")]
    /// The export was requested with an empty item list
    NoItems,

    #[error("a font book needs at least one font")]
    /// Text cannot be measured without any font
    NoFonts,

    #[error("the document has no page to draw on")]
    /// Drawing was attempted before a document was started
    PageMissing,
}
