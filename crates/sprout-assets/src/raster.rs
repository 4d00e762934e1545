//! Local rasterization and image probing.

use std::io::Cursor;

use thiserror::Error;

/// Largest raster edge, in pixels.
const MAX_DIM: u32 = 16_384;

/// Errors while rasterizing vector markup.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid SVG: {0}")]
    Parse(String),

    #[error("Cannot allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Rasterize SVG markup to PNG at `scale`.
pub fn rasterize_svg(markup: &str, scale: f64) -> Result<Vec<u8>, RasterError> {
    let tree = usvg::Tree::from_str(markup, &usvg::Options::default())
        .map_err(|e| RasterError::Parse(e.to_string()))?;

    let size = tree.size();
    let width = (size.width() as f64 * scale).ceil().max(1.0) as u32;
    let height = (size.height() as f64 * scale).ceil().max(1.0) as u32;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(RasterError::Allocation { width, height });
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or(RasterError::Allocation { width, height })?;

    let sx = width as f32 / size.width();
    let sy = height as f32 / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}

/// Pixel dimensions of an encoded raster image.
pub fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2" viewBox="0 0 4 2"><rect width="4" height="2" fill="red"/></svg>"#;

    #[test]
    fn test_rasterize_scales() {
        let png = rasterize_svg(RECT, 2.0).unwrap();
        assert_eq!(probe_dimensions(&png), Some((8, 4)));
    }

    #[test]
    fn test_rasterize_invalid() {
        assert!(matches!(
            rasterize_svg("<not-svg", 1.0),
            Err(RasterError::Parse(_))
        ));
    }

    #[test]
    fn test_probe_garbage() {
        assert_eq!(probe_dimensions(b"nope"), None);
    }
}
