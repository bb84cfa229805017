// ABOUTME: Rendering backend interface for the pptx2png application
// ABOUTME: Abstracts opening presentations and rasterizing individual slides

use crate::dimensions::ResolvedDimensions;
use crate::errors::Result;
use std::path::Path;

/// One slide of a loaded presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideDescriptor {
    /// 1-based position in presentation order
    pub ordinal: usize,
    /// Native width in pixels at 96 DPI
    pub native_width: u32,
    /// Native height in pixels at 96 DPI
    pub native_height: u32,
}

/// A presentation opened by a [`RenderBackend`].
///
/// The handle is released when dropped.
pub trait Presentation {
    /// Slides in presentation order
    fn slides(&self) -> &[SlideDescriptor];

    /// Rasterize the slide with the given ordinal, returning PNG-encoded bytes.
    fn render_slide(&mut self, ordinal: usize, dimensions: ResolvedDimensions) -> Result<Vec<u8>>;
}

/// Something able to open presentation documents for rendering
pub trait RenderBackend {
    /// Short name used in log output
    fn name(&self) -> &str;

    fn open_presentation(&self, path: &Path) -> Result<Box<dyn Presentation>>;
}
