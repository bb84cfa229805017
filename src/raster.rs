// ABOUTME: Rasterization for the pptx2png application
// ABOUTME: Paints parsed slide elements onto a pixel canvas and encodes it as PNG

use crate::dimensions::ResolvedDimensions;
use crate::errors::Result;
use crate::slide::Bounds;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageOutputFormat, Pixel, Rgba, RgbaImage};
use std::io::Cursor;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A slide-sized drawing surface addressed in EMU
pub struct Canvas {
    image: RgbaImage,
    scale_x: f64,
    scale_y: f64,
}

impl Canvas {
    /// Create a canvas of `dimensions` pixels covering a slide of `slide_size` EMU.
    pub fn new(
        dimensions: ResolvedDimensions,
        slide_size: (u64, u64),
        background: Rgba<u8>,
    ) -> Result<Self> {
        let dimensions = dimensions.validate()?;
        let mut image = RgbaImage::from_pixel(dimensions.width, dimensions.height, WHITE);
        if background != WHITE {
            for pixel in image.pixels_mut() {
                pixel.blend(&background);
            }
        }
        Ok(Self {
            image,
            scale_x: f64::from(dimensions.width) / slide_size.0.max(1) as f64,
            scale_y: f64::from(dimensions.height) / slide_size.1.max(1) as f64,
        })
    }

    /// Pixel rectangle covered by `bounds`, as (x, y, width, height).
    fn pixel_rect(&self, bounds: Bounds) -> (i64, i64, u32, u32) {
        // f64 to i64 casts saturate, so extreme offsets cannot overflow
        let edge = |start: i64, len: i64, scale: f64| {
            let from = start as f64 * scale;
            let to = (start as f64 + len as f64) * scale;
            let from_px = from.round() as i64;
            let len_px = (to.round() - from.round()).clamp(0.0, f64::from(u32::MAX)) as u32;
            (from_px, len_px)
        };
        let (left, width) = edge(bounds.x, bounds.cx, self.scale_x);
        let (top, height) = edge(bounds.y, bounds.cy, self.scale_y);
        (left, top, width, height)
    }

    /// Part of `bounds` that lies on the canvas, as pixel ranges `(x0, y0, x1, y1)`.
    fn visible_rect(&self, bounds: Bounds) -> Option<(i64, i64, i64, i64)> {
        let (x, y, width, height) = self.pixel_rect(bounds);
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x
            .saturating_add(i64::from(width))
            .min(i64::from(self.image.width()));
        let y1 = y
            .saturating_add(i64::from(height))
            .min(i64::from(self.image.height()));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    pub fn fill_rect(&mut self, bounds: Bounds, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = self.visible_rect(bounds) else {
            return;
        };
        for py in y0 as u32..y1 as u32 {
            for px in x0 as u32..x1 as u32 {
                self.image.get_pixel_mut(px, py).blend(&color);
            }
        }
    }

    /// Scale `picture` into `bounds` and composite it over the canvas.
    ///
    /// Only the part of the picture that lands on the canvas is resampled.
    pub fn draw_image(&mut self, bounds: Bounds, picture: &DynamicImage) {
        let (x, y, width, height) = self.pixel_rect(bounds);
        let Some((x0, y0, x1, y1)) = self.visible_rect(bounds) else {
            return;
        };
        if picture.width() == 0 || picture.height() == 0 {
            return;
        }

        // Map the visible pixel range back onto source pixels
        let source_range = |from: i64, to: i64, origin: i64, span: u32, size: u32| {
            let ratio = f64::from(size) / f64::from(span);
            let start = ((from as f64 - origin as f64) * ratio).floor();
            let end = ((to as f64 - origin as f64) * ratio).ceil();
            let start = start.clamp(0.0, f64::from(size - 1)) as u32;
            let end = end.clamp(f64::from(start + 1), f64::from(size)) as u32;
            (start, end - start)
        };
        let (sx, sw) = source_range(x0, x1, x, width, picture.width());
        let (sy, sh) = source_range(y0, y1, y, height, picture.height());

        let visible = picture.crop_imm(sx, sy, sw, sh);
        let scaled = imageops::resize(
            &visible,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
            FilterType::Triangle,
        );
        imageops::overlay(&mut self.image, &scaled, x0, y0);
    }

    pub fn into_png(self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(self.image)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
        Ok(bytes)
    }
}
