// crates/scrubline-sprite/src/decode.rs
//
// Sprite sheet decoding. Sheets in the wild are JPEG, occasionally PNG;
// both decode to straight RGBA here so the UI can upload without
// another conversion.

use anyhow::{Context, Result};
use scrubline_core::manifest::SheetImage;

pub fn decode_sheet(url: &str, bytes: &[u8]) -> Result<SheetImage> {
    let img = image::load_from_memory(bytes)
        .with_context(|| format!("decode sprite sheet {url}"))?;
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    Ok(SheetImage {
        url: url.to_string(),
        width,
        height,
        data: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_png_sheet() {
        // 2x1 PNG built in memory — no fixture file needed.
        let mut bytes = Vec::new();
        let img = image::RgbaImage::from_fn(2, 1, |x, _| {
            image::Rgba([if x == 0 { 255 } else { 0 }, 0, 0, 255])
        });
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let sheet = decode_sheet("mem.png", &bytes).unwrap();
        assert_eq!((sheet.width, sheet.height), (2, 1));
        assert_eq!(sheet.data.len(), 8);
        assert_eq!(&sheet.data[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn garbage_is_a_contextual_error() {
        let err = decode_sheet("bad.jpg", b"not an image").unwrap_err();
        assert!(err.to_string().contains("bad.jpg"));
    }
}
