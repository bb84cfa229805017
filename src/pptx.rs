// ABOUTME: PPTX rendering backend for the pptx2png application
// ABOUTME: Opens PowerPoint packages and rasterizes their slides without a host application

use crate::backend::{Presentation, RenderBackend, SlideDescriptor};
use crate::dimensions::ResolvedDimensions;
use crate::errors::{ConvertError, Result};
use crate::package::{self, PptxPackage, PRESENTATION_PART};
use crate::raster::{Canvas, WHITE};
use crate::slide::{self, SlideElement};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

/// Renders slides straight from the package contents
#[derive(Debug, Default, Clone, Copy)]
pub struct PptxBackend;

impl PptxBackend {
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for PptxBackend {
    fn name(&self) -> &str {
        "pptx"
    }

    fn open_presentation(&self, path: &Path) -> Result<Box<dyn Presentation>> {
        Ok(Box::new(PptxPresentation::open(path)?))
    }
}

/// An opened .pptx file
pub struct PptxPresentation {
    package: PptxPackage,
    slide_size: (u64, u64),
    slides: Vec<SlideDescriptor>,
    slide_parts: Vec<String>,
}

impl PptxPresentation {
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening presentation {:?}", path);
        let mut package = PptxPackage::open(path)?;

        let info = package::parse_presentation(&package.read_xml(PRESENTATION_PART)?)?;
        let rels_part = package::rels_path_for(PRESENTATION_PART);
        let rels = if package.has_part(&rels_part) {
            package::parse_relationships(&package.read_xml(&rels_part)?)?
        } else {
            HashMap::new()
        };

        let slide_parts = info
            .slide_rel_ids
            .iter()
            .map(|id| {
                rels.get(id)
                    .map(|target| package::resolve_target(PRESENTATION_PART, target))
                    .ok_or_else(|| {
                        ConvertError::PresentationError(format!(
                            "Slide relationship {} has no target",
                            id
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let (cx, cy) = info.slide_size;
        let native_width = package::emu_to_pixels(cx);
        let native_height = package::emu_to_pixels(cy);
        let slides = (1..=slide_parts.len())
            .map(|ordinal| SlideDescriptor {
                ordinal,
                native_width,
                native_height,
            })
            .collect();

        info!(
            "Found {} slides of {}x{} pixels",
            slide_parts.len(),
            native_width,
            native_height
        );

        Ok(Self {
            package,
            slide_size: info.slide_size,
            slides,
            slide_parts,
        })
    }

    fn rasterize(&mut self, ordinal: usize, dimensions: ResolvedDimensions) -> Result<Vec<u8>> {
        let part = self
            .slide_parts
            .get(ordinal.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| ConvertError::RenderFailure {
                ordinal,
                message: format!("presentation has {} slides", self.slide_parts.len()),
            })?;
        debug!("Rasterizing {} at {}", part, dimensions);

        let content = slide::parse_slide(&self.package.read_xml(&part)?)?;
        let rels_part = package::rels_path_for(&part);
        let rels = if self.package.has_part(&rels_part) {
            package::parse_relationships(&self.package.read_xml(&rels_part)?)?
        } else {
            HashMap::new()
        };

        let mut canvas = Canvas::new(
            dimensions,
            self.slide_size,
            content.background.unwrap_or(WHITE),
        )?;

        for element in content.elements {
            match element {
                SlideElement::Fill { bounds, color } => canvas.fill_rect(bounds, color),
                SlideElement::Picture { bounds, embed } => {
                    let Some(target) = rels.get(&embed) else {
                        warn!(
                            "Slide {}: picture {} is not embedded in the package, skipping",
                            ordinal, embed
                        );
                        continue;
                    };
                    let media = package::resolve_target(&part, target);
                    let data = self.package.read_part(&media)?;
                    let picture = image::load_from_memory(&data)?;
                    canvas.draw_image(bounds, &picture);
                }
            }
        }

        canvas.into_png()
    }
}

impl Presentation for PptxPresentation {
    fn slides(&self) -> &[SlideDescriptor] {
        &self.slides
    }

    fn render_slide(&mut self, ordinal: usize, dimensions: ResolvedDimensions) -> Result<Vec<u8>> {
        self.rasterize(ordinal, dimensions)
            .map_err(|e| e.into_render_failure(ordinal))
    }
}
