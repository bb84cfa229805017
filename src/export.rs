// ABOUTME: Slide export driver for the pptx2png application
// ABOUTME: Renders every slide of a presentation and writes one PNG file per slide

use crate::backend::{Presentation, SlideDescriptor};
use crate::dimensions::ResolvedDimensions;
use crate::errors::{ConvertError, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Configuration for one export run
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub destination: PathBuf,
    pub dimensions: ResolvedDimensions,
    /// Source file name without its extension
    pub base_name: String,
    /// Print one line per written file
    pub log_files: bool,
}

/// A written slide image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub ordinal: usize,
    pub path: PathBuf,
    pub bytes_written: usize,
}

/// Number of digits used for ordinals: at least two, more when the slide count needs it.
pub fn ordinal_width(slide_count: usize) -> usize {
    slide_count.to_string().len().max(2)
}

/// Output file name for a slide, e.g. `deck-slide-01.png`.
pub fn slide_file_name(base_name: &str, ordinal: usize, slide_count: usize) -> String {
    format!(
        "{}-slide-{:0width$}.png",
        base_name,
        ordinal,
        width = ordinal_width(slide_count)
    )
}

/// Export every slide, printing per-file lines to stdout when enabled.
pub fn export_all<'a>(
    presentation: &'a mut dyn Presentation,
    config: &'a ExportConfig,
) -> SlideExports<'a, io::Stdout> {
    export_all_to(presentation, config, io::stdout())
}

/// Export every slide, writing per-file lines to `log` when enabled.
///
/// Nothing happens until the returned iterator is driven. It yields one
/// result per slide in ordinal order and stops after the first error.
pub fn export_all_to<'a, W: Write>(
    presentation: &'a mut dyn Presentation,
    config: &'a ExportConfig,
    log: W,
) -> SlideExports<'a, W> {
    let mut slides: Vec<SlideDescriptor> = presentation.slides().to_vec();
    slides.sort_by_key(|slide| slide.ordinal);
    let slide_count = slides.len();

    info!(
        "Exporting {} slides at {} to {:?}",
        slide_count, config.dimensions, config.destination
    );

    SlideExports {
        presentation,
        config,
        slides: slides.into_iter(),
        slide_count,
        log,
        failed: false,
    }
}

/// Lazy, single-pass sequence of slide exports
pub struct SlideExports<'a, W: Write> {
    presentation: &'a mut dyn Presentation,
    config: &'a ExportConfig,
    slides: std::vec::IntoIter<SlideDescriptor>,
    slide_count: usize,
    log: W,
    failed: bool,
}

impl<'a, W: Write> SlideExports<'a, W> {
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    fn export_slide(&mut self, slide: SlideDescriptor) -> Result<ExportResult> {
        let ordinal = slide.ordinal;
        let file_name = slide_file_name(&self.config.base_name, ordinal, self.slide_count);
        let path = self.config.destination.join(&file_name);

        debug!("Rendering slide {} as {}", ordinal, file_name);
        let bytes = self
            .presentation
            .render_slide(ordinal, self.config.dimensions)?;

        write_slide(&path, ordinal, &bytes)?;

        if self.config.log_files {
            // The file is already written; a broken console should not fail the run
            if let Err(e) = writeln!(self.log, "Created PNG: {}", file_name) {
                warn!("Failed to print log line for {}: {}", file_name, e);
            }
        }

        Ok(ExportResult {
            ordinal,
            path,
            bytes_written: bytes.len(),
        })
    }
}

impl<'a, W: Write> Iterator for SlideExports<'a, W> {
    type Item = Result<ExportResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let slide = self.slides.next()?;
        let result = self.export_slide(slide);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.slides.len()))
        }
    }
}

fn write_slide(path: &Path, ordinal: usize, bytes: &[u8]) -> Result<()> {
    if path.exists() {
        warn!("Overwriting existing file {:?}", path);
    }
    fs::write(path, bytes).map_err(|source| ConvertError::WriteFailure {
        ordinal,
        path: path.to_path_buf(),
        source,
    })
}
