//! Raw geometric descriptors.

use crate::descriptor::DimensionDescriptor;
use crate::error::{Result, WeftmarkError};

/// Compute the dimension descriptor from native pixel dimensions.
///
/// A zero width or height is a [`WeftmarkError::Geometry`] failure; an
/// infinite aspect ratio must never leak into the descriptor set.
pub fn analyze(width: u32, height: u32) -> Result<DimensionDescriptor> {
    if width == 0 || height == 0 {
        return Err(WeftmarkError::Geometry(format!(
            "image has degenerate dimensions {width}x{height}"
        )));
    }

    let w = f64::from(width);
    let h = f64::from(height);
    Ok(DimensionDescriptor {
        width: w,
        height: h,
        aspect_ratio: w / h,
        area: w * h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_derived_values() {
        let dims = analyze(100, 200).unwrap();
        assert_eq!(dims.width, 100.0);
        assert_eq!(dims.height, 200.0);
        assert_eq!(dims.aspect_ratio, 0.5);
        assert_eq!(dims.area, 20_000.0);
    }

    #[test]
    fn zero_height_is_a_geometry_error() {
        assert!(matches!(
            analyze(100, 0).unwrap_err(),
            WeftmarkError::Geometry(_)
        ));
        assert!(matches!(
            analyze(0, 100).unwrap_err(),
            WeftmarkError::Geometry(_)
        ));
    }
}
