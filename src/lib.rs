// ABOUTME: Library module for the pptx2png program.
// ABOUTME: Contains dimension resolution, slide export and the PPTX rendering backend.

// Reexport modules
pub mod backend;
pub mod config;
pub mod convert;
pub mod dimensions;
pub mod errors;
pub mod export;
pub mod package;
pub mod pptx;
pub mod raster;
pub mod slide;
pub mod utils;

// Reexport common types and functions
pub use backend::{Presentation, RenderBackend, SlideDescriptor};
pub use config::{Config, PolicyKind};
pub use convert::{ConversionSummary, ConvertOptions, convert, convert_with_log};
pub use dimensions::{
    DEFAULT_WIDTH, DimensionRequest, MAX_PIXELS, MAX_SIDE, ResolvedDimensions, SizePolicy, resolve,
};
pub use errors::{ConvertError, Result};
pub use export::{ExportConfig, ExportResult, SlideExports, export_all, export_all_to, slide_file_name};
pub use pptx::{PptxBackend, PptxPresentation};
