use crate::colour::{colours, Colour};
use crate::image::CapturedImage;
use crate::label::LabelView;
use crate::ExportError;
use async_trait::async_trait;

/// Options handed to [RenderSurface::capture]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Device pixels per label pixel
    pub scale: f32,
    /// Painted behind transparent parts of the label
    pub background: Colour,
    /// Upper bound the surface may enforce on a single capture. Expiry is reported as
    /// [ExportError::Capture].
    pub timeout_ms: u64,
}

impl CaptureOptions {
    pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
}

impl Default for CaptureOptions {
    fn default() -> Self {
        CaptureOptions {
            scale: 2.0,
            background: colours::WHITE,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }
}

/// The single visual surface labels are rendered onto before being captured.
///
/// A surface holds one label at a time. Exports drive it strictly sequentially:
/// present, then capture, and only then present the next label.
#[async_trait(?Send)]
pub trait RenderSurface {
    /// Current pixel dimensions of the rendered label
    fn dimensions(&self) -> (u32, u32);

    /// Show `view` on the surface. Resolves once the surface has finished rendering
    /// it, so that a following capture never sees stale content.
    async fn present(&self, view: &LabelView) -> Result<(), ExportError>;

    /// Rasterise whatever is currently presented
    async fn capture(&self, options: &CaptureOptions) -> Result<CapturedImage, ExportError>;
}
