/// Upper bound applied to the host-reported device pixel ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical size of the drawing surface and its effective pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportDimensions {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl Default for ViewportDimensions {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            pixel_ratio: 1.0,
        }
    }
}

impl ViewportDimensions {
    /// Build dimensions from what the host reports.
    ///
    /// Zero sizes (minimised windows) are lifted to 1. The pixel ratio is
    /// capped at [`MAX_PIXEL_RATIO`]; a non-finite or non-positive ratio
    /// falls back to 1.
    pub fn from_host(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Size of the backing buffer in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(ViewportDimensions::from_host(800, 600, 3.5).pixel_ratio, 2.0);
        assert_eq!(ViewportDimensions::from_host(800, 600, 2.0).pixel_ratio, 2.0);
        assert_eq!(ViewportDimensions::from_host(800, 600, 1.0).pixel_ratio, 1.0);
        assert_eq!(ViewportDimensions::from_host(800, 600, 1.25).pixel_ratio, 1.25);
    }

    #[test]
    fn bogus_pixel_ratio_falls_back_to_one() {
        assert_eq!(ViewportDimensions::from_host(1, 1, 0.0).pixel_ratio, 1.0);
        assert_eq!(ViewportDimensions::from_host(1, 1, -2.0).pixel_ratio, 1.0);
        assert_eq!(ViewportDimensions::from_host(1, 1, f64::NAN).pixel_ratio, 1.0);
    }

    #[test]
    fn zero_size_is_lifted() {
        let v = ViewportDimensions::from_host(0, 0, 1.0);
        assert_eq!((v.width, v.height), (1, 1));
        assert!(v.aspect().is_finite());
    }

    #[test]
    fn physical_size_scales_by_ratio() {
        let v = ViewportDimensions::from_host(1024, 768, 3.0);
        assert_eq!(v.physical_size(), (2048, 1536));
        assert_eq!(v.aspect(), 1024.0 / 768.0);
    }
}
