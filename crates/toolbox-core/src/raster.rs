//! Image decoding, surface drawing and re-encoding.
//!
//! Mirrors what the browser does for image tools: decode the file into a
//! bitmap, draw it onto an offscreen surface the size of the source, then
//! serialize the surface in the requested format.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::{DynamicImage, ImageEncoder, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::config::ToolboxConfig;
use crate::error::ToolError;
use crate::types::{ConversionResult, SelectedFile, with_extension};

/// Output formats the image tools can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Bmp,
    Gif,
    Tiff,
}

impl ImageFormat {
    /// Every supported format.
    pub const ALL: [Self; 6] = [
        Self::Png,
        Self::Jpeg,
        Self::Webp,
        Self::Bmp,
        Self::Gif,
        Self::Tiff,
    ];

    /// Canonical file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
        }
    }

    /// Declared MIME type of encoded output.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Tiff => "image/tiff",
        }
    }

    /// Whether the encoded format keeps an alpha channel.
    #[must_use]
    pub const fn keeps_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    const fn codec(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Gif => image::ImageFormat::Gif,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }

    /// Map a detected codec back to a supported output format.
    #[must_use]
    pub const fn from_codec(codec: image::ImageFormat) -> Option<Self> {
        match codec {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::WebP => Some(Self::Webp),
            image::ImageFormat::Bmp => Some(Self::Bmp),
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::Tiff => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Detect the format of encoded bytes.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        image::guess_format(bytes).ok().and_then(Self::from_codec)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = ToolError;

    /// Accepts extensions (`jpg`, `jpeg`, `tif`, ...) and `image/*` MIME types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let s = s.strip_prefix("image/").unwrap_or(&s);
        match s {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            "bmp" => Ok(Self::Bmp),
            "gif" => Ok(Self::Gif),
            "tif" | "tiff" => Ok(Self::Tiff),
            other => Err(ToolError::UnsupportedFormat(format!(
                "unknown image format: {other}"
            ))),
        }
    }
}

/// Decode raw image bytes.
///
/// # Errors
///
/// Returns [`ToolError::Decode`] if `bytes` is empty or not a decodable image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ToolError> {
    if bytes.is_empty() {
        return Err(ToolError::Decode("input image data is empty".into()));
    }
    image::load_from_memory(bytes).map_err(|e| ToolError::Decode(e.to_string()))
}

/// Draw a decoded image onto a fresh RGBA surface sized to the source.
///
/// # Errors
///
/// Returns [`ToolError::Encode`] if the surface would exceed
/// `max_surface_pixels`.
pub fn draw_to_surface(image: &DynamicImage, max_surface_pixels: u64) -> Result<RgbaImage, ToolError> {
    let pixels = u64::from(image.width()) * u64::from(image.height());
    if pixels > max_surface_pixels {
        return Err(ToolError::Encode(format!(
            "a {}x{} surface exceeds the {max_surface_pixels} pixel limit",
            image.width(),
            image.height(),
        )));
    }
    Ok(image.to_rgba8())
}

/// Composite an RGBA surface onto an opaque white background.
#[must_use]
pub fn flatten_onto_white(surface: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(surface.width(), surface.height(), |x, y| {
        let [r, g, b, a] = surface.get_pixel(x, y).0;
        let blend = |c: u8| {
            let c = u16::from(c) * u16::from(a) + 255 * u16::from(255 - a);
            u8::try_from(c / 255).unwrap_or(u8::MAX)
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Map a `[0, 1]` quality to the encoder's `1..=100` scale.
#[must_use]
pub fn jpeg_quality(quality: f32) -> u8 {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let q = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
    q.max(1)
}

/// Serialize a surface in `format`.
///
/// `quality` is only used by lossy encoders.
///
/// # Errors
///
/// Returns [`ToolError::Encode`] if the encoder rejects the surface.
pub fn encode(surface: &RgbaImage, format: ImageFormat, quality: f32) -> Result<Vec<u8>, ToolError> {
    let mut out = Cursor::new(Vec::new());
    let written = if format.keeps_alpha() {
        surface.write_to(&mut out, format.codec())
    } else {
        let rgb = flatten_onto_white(surface);
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality))
            .write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
    };
    written.map_err(|e| ToolError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Convert an image file to `format`.
///
/// # Errors
///
/// Returns [`ToolError::Decode`] if the source cannot be decoded and
/// [`ToolError::Encode`] if the surface cannot be allocated or serialized.
pub fn convert_image(
    file: &SelectedFile,
    format: ImageFormat,
    quality: f32,
    config: &ToolboxConfig,
) -> Result<ConversionResult, ToolError> {
    let decoded = decode(&file.bytes)?;
    let surface = draw_to_surface(&decoded, config.max_surface_pixels)?;
    let bytes = encode(&surface, format, quality)?;
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

    fn checker_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([200, 30, 30, 255])
            } else {
                image::Rgba([20, 20, 220, 255])
            }
        });
        encode(&img, ImageFormat::Png, 1.0).unwrap()
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("JPEG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("image/webp".parse::<ImageFormat>().unwrap(), ImageFormat::Webp);
        assert_eq!("tif".parse::<ImageFormat>().unwrap(), ImageFormat::Tiff);
        assert!(matches!(
            "heic".parse::<ImageFormat>(),
            Err(ToolError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn every_format_declares_matching_mime_and_bytes() {
        let file = SelectedFile::new("check.png", "image/png", checker_png(6, 4));
        let config = ToolboxConfig::default();
        for format in ImageFormat::ALL {
            let result = convert_image(&file, format, 0.9, &config).unwrap();
            let expected = if format == ImageFormat::Jpeg {
                "image/jpeg".to_owned()
            } else {
                format!("image/{format}")
            };
            assert_eq!(result.mime_type, expected);
            assert_eq!(ImageFormat::detect(&result.bytes), Some(format), "{format}");
            assert_eq!(result.name, format!("check.{}", format.extension()));
        }
    }

    #[test]
    fn output_keeps_source_dimensions() {
        let file = SelectedFile::new("check.png", "", checker_png(7, 3));
        let result =
            convert_image(&file, ImageFormat::Webp, 0.9, &ToolboxConfig::default()).unwrap();
        let back = decode(&result.bytes).unwrap();
        assert_eq!((back.width(), back.height()), (7, 3));
    }

    #[test]
    fn corrupt_input_is_decode_error() {
        let file = SelectedFile::new("bad.png", "image/png", vec![0xFF, 0x00, 0x12]);
        let result = convert_image(&file, ImageFormat::Png, 0.9, &ToolboxConfig::default());
        assert!(matches!(result, Err(ToolError::Decode(_))));
    }

    #[test]
    fn empty_input_is_decode_error() {
        assert!(matches!(decode(&[]), Err(ToolError::Decode(_))));
    }

    #[test]
    fn oversized_surface_is_encode_error() {
        let file = SelectedFile::new("big.png", "image/png", checker_png(10, 10));
        let config = ToolboxConfig {
            max_surface_pixels: 99,
            ..ToolboxConfig::default()
        };
        let result = convert_image(&file, ImageFormat::Jpeg, 0.9, &config);
        assert!(matches!(result, Err(ToolError::Encode(_))));
    }

    #[test]
    fn jpeg_flattens_transparency_onto_white() {
        let clear = RgbaImage::from_fn(8, 8, |_, _| image::Rgba([0, 0, 0, 0]));
        let png = encode(&clear, ImageFormat::Png, 1.0).unwrap();
        let file = SelectedFile::new("clear.png", "image/png", png);
        let result = convert_image(&file, ImageFormat::Jpeg, 1.0, &ToolboxConfig::default()).unwrap();
        let back = decode(&result.bytes).unwrap().to_rgb8();
        for p in back.pixels() {
            assert!(p.0.iter().all(|&c| c > 240), "expected white, got {:?}", p.0);
        }
    }

    #[test]
    fn jpeg_quality_scale() {
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.92), 92);
    }
}
