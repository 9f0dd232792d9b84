//! Thumbnail compositing for the media widget.
//!
//! Turns a track's album art into a background surface for the widget text:
//! uniform resize to the text width, vertical center crop to the bar height,
//! a luminance-derived alpha so dark art stays readable, and an optional
//! rounded-corner mask on the side facing away from the transport controls.

pub mod mask;

pub use mask::{apply_mask, rounded_mask, RoundedSide};

use image::{imageops, imageops::FilterType, RgbaImage};
use ribbon_core::{Result, RibbonError};

/// Parameters for one compositing pass.
#[derive(Debug, Clone, Copy)]
pub struct ComposeOptions {
    /// Width of the text block the thumbnail sits behind.
    pub target_width: u32,
    /// Height of the hosting bar — the vertical band to keep.
    pub crop_height: u32,
    /// Extra width added on top of `target_width` before resizing.
    pub padding: u32,
    /// Scales the final alpha; values above `1.0` saturate at opaque.
    pub alpha_multiplier: f32,
    /// How strongly luminance drives alpha, in `[0, 1]`.
    /// `0.0` = constant alpha, `1.0` = fully luminance-driven.
    pub alpha_range: f32,
    /// Corner radius in pixels; `0` disables the mask.
    pub corner_radius: u32,
    /// Which side's corners round (the side away from the controls).
    pub rounded_side: RoundedSide,
}

/// Composite `src` into a widget-background thumbnail.
///
/// The output has the dimensions of the cropped band and its alpha channel
/// set — the caller overlays it directly beneath the text layer with
/// ordinary alpha compositing.
pub fn compose(src: &RgbaImage, opts: &ComposeOptions) -> Result<RgbaImage> {
    if src.width() == 0 || src.height() == 0 {
        return Err(RibbonError::Artwork("source bitmap is empty".into()));
    }
    if opts.target_width == 0 || opts.crop_height == 0 {
        return Err(RibbonError::Artwork(
            "target width and crop height must be positive".into(),
        ));
    }

    // Uniform resize so the width matches the text block (plus padding).
    let new_w = opts.target_width + opts.padding;
    let new_h = ((src.height() as f64 * new_w as f64 / src.width() as f64).round() as u32).max(1);
    let scaled = imageops::resize(src, new_w, new_h, FilterType::Triangle);

    // Vertically centered band.  When the scaled image is shorter than the
    // requested band the crop is skipped and the full height is kept.
    let mut band = if opts.crop_height < new_h {
        let y1 = (new_h - opts.crop_height) / 2;
        imageops::crop_imm(&scaled, 0, y1, new_w, opts.crop_height).to_image()
    } else {
        scaled
    };

    let alpha = scalar_alpha(average_luminance(&band), opts.alpha_multiplier, opts.alpha_range);

    if opts.corner_radius > 0 {
        let m = rounded_mask(
            band.width(),
            band.height(),
            opts.corner_radius,
            alpha,
            opts.rounded_side,
        );
        apply_mask(&mut band, &m);
    } else {
        for px in band.pixels_mut() {
            px.0[3] = alpha;
        }
    }

    Ok(band)
}

/// Mean per-pixel grayscale value of `img`, in `[0, 255]`.
pub fn average_luminance(img: &RgbaImage) -> f64 {
    let gray = imageops::grayscale(img);
    let sum: u64 = gray.pixels().map(|p| u64::from(p.0[0])).sum();
    sum as f64 / (u64::from(gray.width()) * u64::from(gray.height())) as f64
}

/// Alpha for the whole thumbnail given its average luminance.
///
/// Darker art yields higher opacity when `range > 0`; the result saturates
/// at the displayable byte range instead of wrapping.
pub fn scalar_alpha(luminance: f64, multiplier: f32, range: f32) -> u8 {
    let base = (1.0 - f64::from(range)) * 255.0 + f64::from(range) * (255.0 - luminance);
    (f64::from(multiplier) * base).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn uniform(w: u32, h: u32, level: u8) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([level, level, level, 255]))
    }

    fn opts(target_width: u32, crop_height: u32) -> ComposeOptions {
        ComposeOptions {
            target_width,
            crop_height,
            padding: 0,
            alpha_multiplier: 1.0,
            alpha_range: 0.0,
            corner_radius: 0,
            rounded_side: RoundedSide::Right,
        }
    }

    #[test]
    fn resize_width_includes_padding() {
        let src = uniform(100, 50, 128);
        let mut o = opts(40, 25);
        o.padding = 10;
        let out = compose(&src, &o).unwrap();
        assert_eq!(out.width(), 50);
    }

    #[test]
    fn resize_preserves_aspect_ratio() {
        let src = uniform(100, 50, 128);
        // 100x50 scaled to width 50 → height 25; crop band taller than that
        // is skipped, so the full scaled height comes through.
        let out = compose(&src, &opts(50, 200)).unwrap();
        assert_eq!((out.width(), out.height()), (50, 25));
    }

    #[test]
    fn center_crop_yields_requested_height() {
        let src = uniform(50, 200, 128);
        let out = compose(&src, &opts(50, 30)).unwrap();
        assert_eq!((out.width(), out.height()), (50, 30));
    }

    #[test]
    fn crop_taller_than_image_keeps_full_height() {
        let src = uniform(50, 10, 128);
        let out = compose(&src, &opts(50, 100)).unwrap();
        assert_eq!(out.height(), 10);
    }

    #[test]
    fn empty_source_is_an_error() {
        let src = RgbaImage::new(0, 0);
        assert!(compose(&src, &opts(10, 10)).is_err());
    }

    #[test]
    fn alpha_is_constant_when_range_is_zero() {
        assert_eq!(scalar_alpha(0.0, 1.0, 0.0), 255);
        assert_eq!(scalar_alpha(255.0, 1.0, 0.0), 255);
        assert_eq!(scalar_alpha(0.0, 0.5, 0.0), 128);
        assert_eq!(scalar_alpha(255.0, 0.5, 0.0), 128);
    }

    #[test]
    fn alpha_is_non_increasing_in_luminance() {
        let mut prev = u8::MAX;
        for l in [0.0, 64.0, 128.0, 192.0, 255.0] {
            let a = scalar_alpha(l, 1.0, 0.5);
            assert!(a <= prev, "alpha rose from {prev} to {a} at luminance {l}");
            prev = a;
        }
    }

    #[test]
    fn alpha_saturates_instead_of_wrapping() {
        assert_eq!(scalar_alpha(0.0, 2.0, 0.0), 255);
        assert_eq!(scalar_alpha(255.0, 0.0, 1.0), 0);
    }

    #[test]
    fn dark_art_is_more_opaque_than_bright_art() {
        let dark = uniform(40, 20, 10);
        let bright = uniform(40, 20, 245);
        let mut o = opts(40, 20);
        o.alpha_range = 0.5;
        let a_dark = compose(&dark, &o).unwrap().get_pixel(5, 5).0[3];
        let a_bright = compose(&bright, &o).unwrap().get_pixel(5, 5).0[3];
        assert!(a_dark > a_bright);
    }

    #[test]
    fn zero_radius_applies_uniform_alpha() {
        let src = uniform(40, 20, 0);
        let mut o = opts(40, 20);
        o.alpha_multiplier = 0.5;
        let out = compose(&src, &o).unwrap();
        let expected = scalar_alpha(0.0, 0.5, 0.0);
        assert!(out.pixels().all(|p| p.0[3] == expected));
    }

    #[test]
    fn positive_radius_rounds_the_configured_side() {
        let src = uniform(40, 20, 0);
        let mut o = opts(40, 20);
        o.corner_radius = 6;
        o.rounded_side = RoundedSide::Right;
        let out = compose(&src, &o).unwrap();
        // Right corners rounded away, left corners squared, interior filled.
        assert_eq!(out.get_pixel(39, 0).0[3], 0);
        assert_eq!(out.get_pixel(39, 19).0[3], 0);
        assert_eq!(out.get_pixel(0, 0).0[3], 255);
        assert_eq!(out.get_pixel(20, 10).0[3], 255);
    }
}
