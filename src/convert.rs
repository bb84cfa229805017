// ABOUTME: Conversion pipeline for the pptx2png application
// ABOUTME: Validates the source, resolves dimensions once and drives the slide export

use crate::backend::RenderBackend;
use crate::dimensions::{self, DimensionRequest, ResolvedDimensions, SizePolicy};
use crate::errors::Result;
use crate::export::{self, ExportConfig, ExportResult};
use crate::utils;
use log::{info, warn};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Everything needed to convert one presentation
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub source: PathBuf,
    /// Defaults to the source's directory
    pub destination: Option<PathBuf>,
    pub request: DimensionRequest,
    pub policy: SizePolicy,
    pub log_files: bool,
}

/// Outcome of a successful conversion
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub destination: PathBuf,
    /// `None` when the presentation has no slides
    pub dimensions: Option<ResolvedDimensions>,
    pub files: Vec<ExportResult>,
}

/// Convert every slide of `options.source` to PNG, printing progress to stdout.
pub fn convert(options: &ConvertOptions, backend: &dyn RenderBackend) -> Result<ConversionSummary> {
    convert_with_log(options, backend, io::stdout())
}

/// Like [`convert`], writing the user-facing progress lines to `log`.
pub fn convert_with_log<W: Write>(
    options: &ConvertOptions,
    backend: &dyn RenderBackend,
    mut log: W,
) -> Result<ConversionSummary> {
    utils::validate_pptx_source(&options.source)?;
    options.policy.validate()?;
    let base_name = utils::base_name(&options.source)?;
    let destination = options
        .destination
        .clone()
        .unwrap_or_else(|| utils::parent_directory(&options.source));
    utils::ensure_directory_exists(&destination)?;

    if options.log_files {
        let name = options
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let header = writeln!(log, "Processing file: {}", name)
            .and_then(|()| writeln!(log, "Output directory: {}", destination.display()));
        if let Err(e) = header {
            warn!("Failed to print progress header: {}", e);
        }
    }

    info!(
        "Converting {:?} with the {} backend",
        options.source,
        backend.name()
    );
    let start_time = Instant::now();
    let mut presentation = backend.open_presentation(&options.source)?;

    let Some(first) = presentation.slides().first().copied() else {
        info!("Presentation has no slides, nothing to export");
        return Ok(ConversionSummary {
            destination,
            dimensions: None,
            files: Vec::new(),
        });
    };

    let resolved = dimensions::resolve(
        first.native_width,
        first.native_height,
        options.request,
        options.policy,
    )?;
    info!(
        "Resolved output size {} from native {}x{}",
        resolved, first.native_width, first.native_height
    );

    let config = ExportConfig {
        destination: destination.clone(),
        dimensions: resolved,
        base_name,
        log_files: options.log_files,
    };
    let files = export::export_all_to(presentation.as_mut(), &config, &mut log)
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Conversion complete. Wrote {} slides in {:.2} seconds",
        files.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(ConversionSummary {
        destination,
        dimensions: Some(resolved),
        files,
    })
}
