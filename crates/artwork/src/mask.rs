use image::{GrayImage, RgbaImage};

/// Which horizontal side of the thumbnail gets rounded corners.
///
/// The media widget rounds the side facing away from the transport
/// controls: controls on the left round the right corners and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundedSide {
    Left,
    Right,
}

/// Build a single-channel alpha mask: background `0`, a filled rectangle at
/// `value` with the two corners on `rounded` side cut to a quarter circle of
/// `radius` and the opposite two corners left square.
///
/// The radius is limited to half the smaller dimension so opposing arcs
/// never overlap.
pub fn rounded_mask(width: u32, height: u32, radius: u32, value: u8, rounded: RoundedSide) -> GrayImage {
    let r = radius.min(width / 2).min(height / 2);

    GrayImage::from_fn(width, height, |x, y| {
        // Distance into the corner region along each axis; 0 outside it.
        let dx = match rounded {
            RoundedSide::Left if x < r => r - x,
            RoundedSide::Right if x >= width - r => x - (width - r - 1),
            _ => 0,
        };
        let dy = if y < r {
            r - y
        } else if y >= height - r {
            y - (height - r - 1)
        } else {
            0
        };

        if dx * dx + dy * dy <= r * r {
            image::Luma([value])
        } else {
            image::Luma([0])
        }
    })
}

/// Transplant `mask` into the alpha channel of `img`.
///
/// Both images must have identical dimensions; mismatched pixels outside the
/// mask bounds keep their previous alpha.
pub fn apply_mask(img: &mut RgbaImage, mask: &GrayImage) {
    for (x, y, px) in img.enumerate_pixels_mut() {
        if x < mask.width() && y < mask.height() {
            px.0[3] = mask.get_pixel(x, y).0[0];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_side_rounds_right_corners_only() {
        let m = rounded_mask(16, 16, 5, 200, RoundedSide::Right);
        assert_eq!(m.get_pixel(15, 0).0[0], 0);
        assert_eq!(m.get_pixel(15, 15).0[0], 0);
        assert_eq!(m.get_pixel(0, 0).0[0], 200);
        assert_eq!(m.get_pixel(0, 15).0[0], 200);
    }

    #[test]
    fn left_side_rounds_left_corners_only() {
        let m = rounded_mask(16, 16, 5, 200, RoundedSide::Left);
        assert_eq!(m.get_pixel(0, 0).0[0], 0);
        assert_eq!(m.get_pixel(0, 15).0[0], 0);
        assert_eq!(m.get_pixel(15, 0).0[0], 200);
        assert_eq!(m.get_pixel(15, 15).0[0], 200);
    }

    #[test]
    fn interior_and_edges_keep_the_fill_value() {
        let m = rounded_mask(16, 16, 5, 128, RoundedSide::Right);
        assert_eq!(m.get_pixel(8, 8).0[0], 128);
        // Edge midpoints sit outside every corner region.
        assert_eq!(m.get_pixel(8, 0).0[0], 128);
        assert_eq!(m.get_pixel(0, 8).0[0], 128);
        assert_eq!(m.get_pixel(15, 8).0[0], 128);
    }

    #[test]
    fn oversized_radius_is_clamped() {
        let m = rounded_mask(8, 4, 100, 255, RoundedSide::Left);
        // Clamped to height/2 = 2; far side must be untouched.
        assert_eq!(m.get_pixel(7, 0).0[0], 255);
        assert_eq!(m.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn apply_mask_overwrites_alpha_only() {
        let mut img = RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
        let m = rounded_mask(4, 4, 0, 77, RoundedSide::Right);
        apply_mask(&mut img, &m);
        let px = img.get_pixel(2, 2);
        assert_eq!((px.0[0], px.0[1], px.0[2], px.0[3]), (10, 20, 30, 77));
    }
}
