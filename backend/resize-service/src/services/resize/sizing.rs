//! Target sizes and the fit-inside-box calculation
//!
//! Every variant is scaled by a single factor so it fits its bounding box
//! without distortion. Sources smaller than the box are scaled up.

use crate::error::{ResizeError, Result};

/// One bounding box plus the suffix appended to the destination directory
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
    pub suffix: &'static str,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32, suffix: &'static str) -> Self {
        Self {
            width,
            height,
            suffix,
        }
    }
}

/// Variants produced for every upload, in render and publish order
pub const TARGET_SIZES: [TargetSize; 3] = [
    TargetSize::new(1080, 1080, "-1080"),
    TargetSize::new(200, 200, "-200"),
    TargetSize::new(100, 100, "-100"),
];

/// Scale `source` uniformly so it fits inside `box_width` x `box_height`
///
/// Output dimensions are rounded to the nearest pixel and never drop below 1
/// or exceed the box.
pub fn scale_to_fit(
    source_width: u32,
    source_height: u32,
    box_width: u32,
    box_height: u32,
) -> Result<(u32, u32)> {
    if source_width == 0 || source_height == 0 {
        return Err(ResizeError::Render(format!(
            "Source image has no area ({}x{})",
            source_width, source_height
        )));
    }
    if box_width == 0 || box_height == 0 {
        return Err(ResizeError::Render(format!(
            "Target box has no area ({}x{})",
            box_width, box_height
        )));
    }

    let factor = f64::min(
        box_width as f64 / source_width as f64,
        box_height as f64 / source_height as f64,
    );

    let width = (factor * source_width as f64).round() as u32;
    let height = (factor * source_height as f64).round() as u32;

    Ok((width.clamp(1, box_width), height.clamp(1, box_height)))
}
