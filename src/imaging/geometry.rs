//! Target geometry calculations.
//!
//! # Design Decisions
//! - Both axes set: the aspect ratio is ignored and the output is exact
//! - One axis zero: that axis follows the source aspect ratio
//! - Crop never scales; it is anchored at the top-left and clamped to the source

/// Requested width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    /// Force exact output dimensions, distorting if needed.
    pub ignore_aspect_ratio: bool,
}

impl Geometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ignore_aspect_ratio: width > 0 && height > 0,
        }
    }

    /// Output size when rescaling a `src_width` x `src_height` image.
    pub fn resize_dimensions(&self, src_width: u32, src_height: u32) -> (u32, u32) {
        if self.ignore_aspect_ratio {
            return (self.width, self.height);
        }
        match (self.width, self.height) {
            (0, 0) => (src_width, src_height),
            (w, 0) => (w, proportional(src_height, w, src_width)),
            (0, h) => (proportional(src_width, h, src_height), h),
            // Both set without the flag: fit inside the box.
            (w, h) => {
                let by_width = proportional(src_height, w, src_width);
                if by_width <= h {
                    (w, by_width)
                } else {
                    (proportional(src_width, h, src_height), h)
                }
            }
        }
    }

    /// Size of the top-left region kept when cropping.
    pub fn crop_region(&self, src_width: u32, src_height: u32) -> (u32, u32) {
        let clamp = |target: u32, src: u32| if target == 0 { src } else { target.min(src) };
        (clamp(self.width, src_width), clamp(self.height, src_height))
    }
}

/// `round(other * target / axis)`, never below 1.
fn proportional(other: u32, target: u32, axis: u32) -> u32 {
    if axis == 0 {
        return target.max(1);
    }
    let scaled = (other as f64 * target as f64 / axis as f64).round();
    (scaled as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_flag() {
        assert!(Geometry::new(10, 20).ignore_aspect_ratio);
        assert!(!Geometry::new(10, 0).ignore_aspect_ratio);
        assert!(!Geometry::new(0, 20).ignore_aspect_ratio);
    }

    #[test]
    fn test_exact_resize_distorts() {
        assert_eq!(Geometry::new(100, 100).resize_dimensions(400, 200), (100, 100));
        assert_eq!(Geometry::new(2048, 1).resize_dimensions(10, 10), (2048, 1));
    }

    #[test]
    fn test_width_only_keeps_ratio() {
        assert_eq!(Geometry::new(300, 0).resize_dimensions(400, 200), (300, 150));
        assert_eq!(Geometry::new(300, 0).resize_dimensions(1000, 333), (300, 100));
        // upscaling is allowed
        assert_eq!(Geometry::new(800, 0).resize_dimensions(400, 200), (800, 400));
    }

    #[test]
    fn test_height_only_keeps_ratio() {
        assert_eq!(Geometry::new(0, 50).resize_dimensions(400, 200), (100, 50));
    }

    #[test]
    fn test_proportional_axis_never_zero() {
        assert_eq!(Geometry::new(10, 0).resize_dimensions(5000, 10), (10, 1));
    }

    #[test]
    fn test_box_fit_when_aspect_is_kept() {
        let geometry = Geometry {
            width: 100,
            height: 100,
            ignore_aspect_ratio: false,
        };
        assert_eq!(geometry.resize_dimensions(400, 200), (100, 50));
        assert_eq!(geometry.resize_dimensions(200, 400), (50, 100));
    }

    #[test]
    fn test_crop_region() {
        assert_eq!(Geometry::new(300, 300).crop_region(400, 350), (300, 300));
        assert_eq!(Geometry::new(300, 0).crop_region(400, 350), (300, 350));
        assert_eq!(Geometry::new(0, 100).crop_region(400, 350), (400, 100));
        assert_eq!(Geometry::new(1000, 1000).crop_region(400, 350), (400, 350));
    }
}
