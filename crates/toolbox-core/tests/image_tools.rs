//! Integration test: run every image tool in the registry over a small PNG.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use toolbox_core::registry::{self, ToolStrategy};
use toolbox_core::{ConvertOptions, ImageFormat, SelectedFile, ToolboxConfig, enhance, raster};

fn gradient_png() -> Vec<u8> {
    let img = image::RgbaImage::from_fn(12, 8, |x, y| {
        image::Rgba([(x * 20) as u8, (y * 30) as u8, 128, 255])
    });
    raster::encode(&img, ImageFormat::Png, 1.0).unwrap()
}

#[test]
fn every_image_tool_produces_decodable_output() {
    let file = SelectedFile::new("gradient.png", "image/png", gradient_png());
    let config = ToolboxConfig::default();
    let options = ConvertOptions::default();

    let mut ran = 0;
    for tool in registry::tools() {
        let result = match tool.strategy {
            ToolStrategy::ImageConvert(format) => {
                raster::convert_image(&file, format, config.quality(None), &config)
            }
            ToolStrategy::ImageEnhance(op) => enhance::enhance_image(&file, op, &options, &config),
            _ => continue,
        }
        .unwrap_or_else(|e| panic!("{} failed: {e}", tool.id));

        let detected = ImageFormat::detect(&result.bytes)
            .unwrap_or_else(|| panic!("{} produced undetectable bytes", tool.id));
        assert_eq!(result.mime_type, detected.mime_type(), "{}", tool.id);

        let back = raster::decode(&result.bytes).unwrap();
        assert_eq!((back.width(), back.height()), (12, 8), "{}", tool.id);
        ran += 1;
    }
    assert!(ran >= 10, "expected the registry to carry image tools, ran {ran}");
}
