//! Image enhancement filters.
//!
//! Everything operates on an RGBA surface and leaves alpha untouched.

use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::config::ToolboxConfig;
use crate::error::ToolError;
use crate::raster::{self, ImageFormat};
use crate::types::{ConversionResult, ConvertOptions, SelectedFile, with_extension};

/// Textbook sharpening kernel (center 5, four neighbours -1).
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Largest accepted blur sigma. The Gaussian kernel grows linearly with
/// sigma, so unbounded values exhaust memory.
pub const MAX_BLUR_SIGMA: f32 = 100.0;

/// An enhancement filter. `amount` semantics are per filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhanceOp {
    /// 3×3 sharpening convolution; `amount` is ignored.
    Sharpen,
    /// Gaussian blur; `amount` is the sigma.
    Blur,
    /// Luminance grayscale; `amount` is ignored.
    Grayscale,
    /// Add `amount` to every color channel (may be negative).
    Brightness,
    /// Contrast change in percent (may be negative).
    Contrast,
    /// Invert color channels; `amount` is ignored.
    Invert,
}

impl EnhanceOp {
    /// Value of `amount` when a run does not set one.
    #[must_use]
    pub const fn default_amount(self) -> f32 {
        match self {
            Self::Blur => 2.0,
            Self::Brightness => 30.0,
            Self::Contrast => 20.0,
            Self::Sharpen | Self::Grayscale | Self::Invert => 0.0,
        }
    }

    /// Apply this filter to `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] for a blur sigma above
    /// [`MAX_BLUR_SIGMA`].
    pub fn apply(self, surface: &RgbaImage, amount: Option<f32>) -> Result<RgbaImage, ToolError> {
        let amount = amount
            .filter(|a| a.is_finite())
            .unwrap_or_else(|| self.default_amount());
        if self == Self::Blur && amount > MAX_BLUR_SIGMA {
            return Err(ToolError::InvalidInput(format!(
                "blur amount must be at most {MAX_BLUR_SIGMA}, got {amount}"
            )));
        }
        Ok(match self {
            Self::Sharpen => sharpen(surface),
            Self::Blur => gaussian_blur_rgba(surface, amount),
            Self::Grayscale => DynamicImage::ImageRgba8(surface.clone())
                .grayscale()
                .to_rgba8(),
            Self::Brightness => {
                #[expect(clippy::cast_possible_truncation)]
                let delta = amount.round() as i32;
                image::imageops::colorops::brighten(surface, delta)
            }
            Self::Contrast => image::imageops::colorops::contrast(surface, amount),
            Self::Invert => {
                let mut out = surface.clone();
                image::imageops::colorops::invert(&mut out);
                out
            }
        })
    }
}

/// Convolve the color channels with [`SHARPEN_KERNEL`].
///
/// Samples outside the image repeat the nearest edge pixel.
#[must_use = "returns the sharpened surface"]
pub fn sharpen(surface: &RgbaImage) -> RgbaImage {
    let (w, h) = (surface.width(), surface.height());
    if w == 0 || h == 0 {
        return surface.clone();
    }
    let clamp = |v: i64, max: u32| -> u32 { u32::try_from(v.clamp(0, i64::from(max) - 1)).unwrap_or(0) };

    RgbaImage::from_fn(w, h, |x, y| {
        let mut acc = [0i32; 3];
        for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
            for (kx, &weight) in row.iter().enumerate() {
                if weight == 0 {
                    continue;
                }
                #[expect(clippy::cast_possible_wrap)]
                let sx = clamp(i64::from(x) + kx as i64 - 1, w);
                #[expect(clippy::cast_possible_wrap)]
                let sy = clamp(i64::from(y) + ky as i64 - 1, h);
                let p = surface.get_pixel(sx, sy).0;
                for c in 0..3 {
                    acc[c] += weight * i32::from(p[c]);
                }
            }
        }
        let to_u8 = |v: i32| u8::try_from(v.clamp(0, 255)).unwrap_or(u8::MAX);
        image::Rgba([
            to_u8(acc[0]),
            to_u8(acc[1]),
            to_u8(acc[2]),
            surface.get_pixel(x, y).0[3],
        ])
    })
}

/// Gaussian blur applied to each channel independently.
///
/// Non-positive or NaN sigma returns the surface unchanged, since
/// `imageproc` panics on `sigma <= 0.0`. Sigma is capped at
/// [`MAX_BLUR_SIGMA`].
#[must_use = "returns the blurred surface"]
pub fn gaussian_blur_rgba(surface: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma.is_nan() || sigma <= 0.0 {
        return surface.clone();
    }
    let sigma = sigma.min(MAX_BLUR_SIGMA);

    let (w, h) = (surface.width(), surface.height());
    let channels: [image::GrayImage; 4] = std::array::from_fn(|c| {
        image::GrayImage::from_fn(w, h, |x, y| image::Luma([surface.get_pixel(x, y).0[c]]))
    });
    let blurred: [image::GrayImage; 4] =
        std::array::from_fn(|c| imageproc::filter::gaussian_blur_f32(&channels[c], sigma));

    RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([
            blurred[0].get_pixel(x, y).0[0],
            blurred[1].get_pixel(x, y).0[0],
            blurred[2].get_pixel(x, y).0[0],
            blurred[3].get_pixel(x, y).0[0],
        ])
    })
}

/// Decode `file`, apply `op`, and re-encode in the source format (PNG when
/// the source format cannot be written).
///
/// # Errors
///
/// Returns [`ToolError::Decode`] or [`ToolError::Encode`] as for
/// [`raster::convert_image`], and [`ToolError::InvalidInput`] for an
/// out-of-range `amount`.
pub fn enhance_image(
    file: &SelectedFile,
    op: EnhanceOp,
    options: &ConvertOptions,
    config: &ToolboxConfig,
) -> Result<ConversionResult, ToolError> {
    let decoded = raster::decode(&file.bytes)?;
    let surface = raster::draw_to_surface(&decoded, config.max_surface_pixels)?;
    let filtered = op.apply(&surface, options.amount)?;

    let format = ImageFormat::detect(&file.bytes).unwrap_or(ImageFormat::Png);
    let bytes = raster::encode(&filtered, format, config.quality(options.quality))?;
    Ok(ConversionResult::new(
        bytes,
        with_extension(&file.name, format.extension()),
        format.mime_type(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn uniform(value: u8) -> RgbaImage {
        RgbaImage::from_fn(5, 5, |_, _| image::Rgba([value, value, value, 255]))
    }

    #[test]
    fn sharpen_keeps_uniform_image() {
        // Kernel weights sum to 1, so a flat field is a fixed point.
        let img = uniform(90);
        assert_eq!(sharpen(&img), img);
    }

    #[test]
    fn sharpen_boosts_isolated_peak() {
        let mut img = uniform(100);
        img.put_pixel(2, 2, image::Rgba([150, 150, 150, 255]));
        let out = sharpen(&img);
        // 5*150 - 4*100 = 350, clamped.
        assert_eq!(out.get_pixel(2, 2).0, [255, 255, 255, 255]);
        // Neighbour: 5*100 - 150 - 3*100 = 50.
        assert_eq!(out.get_pixel(2, 1).0, [50, 50, 50, 255]);
        // Diagonal neighbour is untouched by the cross-shaped kernel.
        assert_eq!(out.get_pixel(1, 1).0, [100, 100, 100, 255]);
    }

    #[test]
    fn sharpen_preserves_alpha() {
        let img = RgbaImage::from_fn(3, 3, |x, _| image::Rgba([10, 20, 30, 40 + x as u8]));
        let out = sharpen(&img);
        for (x, y, p) in out.enumerate_pixels() {
            assert_eq!(p.0[3], img.get_pixel(x, y).0[3]);
        }
    }

    #[test]
    fn blur_with_zero_sigma_is_identity() {
        let mut img = uniform(0);
        img.put_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
        assert_eq!(gaussian_blur_rgba(&img, 0.0), img);
        let blurred = gaussian_blur_rgba(&img, 1.0);
        assert!(blurred.get_pixel(2, 2).0[0] < 255);
        assert!(blurred.get_pixel(2, 1).0[0] > 0);
    }

    #[test]
    fn oversized_blur_amount_is_invalid() {
        let img = RgbaImage::from_fn(4, 4, |x, y| image::Rgba([(x * 60) as u8, (y * 60) as u8, 0, 255]));
        assert!(matches!(
            EnhanceOp::Blur.apply(&img, Some(1e12)),
            Err(ToolError::InvalidInput(_))
        ));
        assert!(matches!(
            EnhanceOp::Blur.apply(&img, Some(MAX_BLUR_SIGMA + 1.0)),
            Err(ToolError::InvalidInput(_))
        ));
        assert!(EnhanceOp::Blur.apply(&img, Some(MAX_BLUR_SIGMA)).is_ok());
        // Non-finite amounts fall back to the default sigma.
        assert!(EnhanceOp::Blur.apply(&img, Some(f32::INFINITY)).is_ok());
    }

    #[test]
    fn oversized_blur_amount_fails_the_run() {
        let png = raster::encode(&uniform(60), ImageFormat::Png, 1.0).unwrap();
        let file = SelectedFile::new("flat.png", "image/png", png);
        let options = ConvertOptions {
            amount: Some(1e12),
            ..ConvertOptions::default()
        };
        let err = enhance_image(&file, EnhanceOp::Blur, &options, &ToolboxConfig::default()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn blur_helper_caps_sigma() {
        let img = uniform(70);
        assert_eq!(gaussian_blur_rgba(&img, 1e12), gaussian_blur_rgba(&img, MAX_BLUR_SIGMA));
        assert_eq!(gaussian_blur_rgba(&img, f32::NAN), img);
    }

    #[test]
    fn grayscale_equalizes_channels() {
        let img = RgbaImage::from_fn(2, 2, |_, _| image::Rgba([200, 50, 10, 255]));
        let out = EnhanceOp::Grayscale.apply(&img, None).unwrap();
        for p in out.pixels() {
            assert_eq!(p.0[0], p.0[1]);
            assert_eq!(p.0[1], p.0[2]);
        }
    }

    #[test]
    fn brightness_and_invert() {
        let img = uniform(100);
        let brighter = EnhanceOp::Brightness.apply(&img, Some(20.0)).unwrap();
        assert_eq!(brighter.get_pixel(0, 0).0, [120, 120, 120, 255]);
        let inverted = EnhanceOp::Invert.apply(&img, None).unwrap();
        assert_eq!(inverted.get_pixel(0, 0).0, [155, 155, 155, 255]);
    }

    #[test]
    fn enhance_keeps_source_format() {
        let png = raster::encode(&uniform(60), ImageFormat::Png, 1.0).unwrap();
        let file = SelectedFile::new("flat.png", "image/png", png);
        let result = enhance_image(
            &file,
            EnhanceOp::Sharpen,
            &ConvertOptions::default(),
            &ToolboxConfig::default(),
        )
        .unwrap();
        assert_eq!(result.mime_type, "image/png");
        assert_eq!(result.name, "flat.png");
    }
}
