// ABOUTME: Dimension resolution for the pptx2png application
// ABOUTME: Maps native slide sizes and requested sizes to output pixel dimensions

use crate::errors::{ConvertError, Result};
use std::fmt;

/// Width used when no size is requested and the policy scales to a fixed width
pub const DEFAULT_WIDTH: u32 = 1280;

/// Largest output width or height
pub const MAX_SIDE: u32 = 32_768;

/// Largest output area, 1 GiB of RGBA
pub const MAX_PIXELS: u64 = 1 << 28;

/// What to do when neither a width nor a height is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// Fixed output width, height follows the native aspect ratio
    ScaleToWidth(u32),
    /// Keep the native slide size
    Native,
}

impl Default for SizePolicy {
    fn default() -> Self {
        SizePolicy::ScaleToWidth(DEFAULT_WIDTH)
    }
}

impl SizePolicy {
    /// Reject a zero default width before any presentation is opened.
    pub fn validate(&self) -> Result<()> {
        if let SizePolicy::ScaleToWidth(width) = *self {
            positive("default width", i64::from(width))?;
        }
        Ok(())
    }
}

/// Optional requested output size. Values are always positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionRequest {
    width: Option<u32>,
    height: Option<u32>,
}

impl DimensionRequest {
    /// Validate raw user input into a request.
    pub fn new(width: Option<i64>, height: Option<i64>) -> Result<Self> {
        Ok(Self {
            width: width.map(|w| positive("width", w)).transpose()?,
            height: height.map(|h| positive("height", h)).transpose()?,
        })
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }
}

/// Final pixel size applied to every slide of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDimensions {
    pub width: u32,
    pub height: u32,
}

impl ResolvedDimensions {
    /// Check the size against [`MAX_SIDE`] and [`MAX_PIXELS`].
    pub fn validate(self) -> Result<Self> {
        let area = u64::from(self.width) * u64::from(self.height);
        if self.width > MAX_SIDE || self.height > MAX_SIDE || area > MAX_PIXELS {
            return Err(ConvertError::OutputTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

impl fmt::Display for ResolvedDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn positive(name: &'static str, value: i64) -> Result<u32> {
    if value <= 0 || value > i64::from(u32::MAX) {
        return Err(ConvertError::InvalidDimension { name, value });
    }
    Ok(value as u32)
}

/// `round(value * numerator / denominator)`, ties away from zero, clamped to `1..=u32::MAX`.
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    let num = u128::from(value) * u128::from(numerator);
    let den = u128::from(denominator);
    let rounded = (2 * num + den) / (2 * den);
    rounded.clamp(1, u128::from(u32::MAX)) as u32
}

/// Compute the output size for a slide of the given native size.
///
/// With only one side requested the other follows the native aspect ratio.
/// With both requested they are used verbatim, distortion included. With
/// neither, `policy` decides. Sizes beyond [`MAX_SIDE`] or [`MAX_PIXELS`]
/// are rejected.
pub fn resolve(
    native_width: u32,
    native_height: u32,
    request: DimensionRequest,
    policy: SizePolicy,
) -> Result<ResolvedDimensions> {
    if native_width == 0 {
        return Err(ConvertError::InvalidDimension {
            name: "native width",
            value: 0,
        });
    }
    if native_height == 0 {
        return Err(ConvertError::InvalidDimension {
            name: "native height",
            value: 0,
        });
    }

    let (width, height) = match (request.width, request.height) {
        (Some(width), Some(height)) => (width, height),
        (Some(width), None) => (width, scale(width, native_height, native_width)),
        (None, Some(height)) => (scale(height, native_width, native_height), height),
        (None, None) => match policy {
            SizePolicy::ScaleToWidth(width) => {
                let width = positive("default width", i64::from(width))?;
                (width, scale(width, native_height, native_width))
            }
            SizePolicy::Native => (native_width, native_height),
        },
    };

    ResolvedDimensions { width, height }.validate()
}
