use std::io::Cursor;

use image::{GrayImage, ImageBuffer, ImageFormat, Luma};

use crate::barcode::Symbology;
use crate::error::BarcodeError;

/// Turns a code into a barcode bitmap. Must be deterministic for a given
/// code and size; pages render their cells on a worker pool.
pub trait BarcodeGenerator: Sync {
    fn generate(&self, code: &str, width: u32, height: u32) -> Result<GrayImage, BarcodeError>;
}

/// Renders symbols of one symbology as crisp 1-bit style bitmaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolRenderer {
    pub symbology: Symbology,
}

impl SymbolRenderer {
    pub fn new(symbology: Symbology) -> Self {
        Self { symbology }
    }
}

impl BarcodeGenerator for SymbolRenderer {
    fn generate(&self, code: &str, width: u32, height: u32) -> Result<GrayImage, BarcodeError> {
        let modules = self.symbology.encode(code)?;
        Ok(rasterize(&modules, width, height))
    }
}

/// Draw modules black-on-white. Every module gets the same whole number of
/// pixels, so the bitmap is at least `width` wide (never narrower than one
/// pixel per module) and exactly `height` tall.
pub fn rasterize(modules: &[bool], width: u32, height: u32) -> GrayImage {
    let n = modules.len().max(1) as u32;
    let module_px = width.div_ceil(n).max(1);
    let w = n * module_px;
    let h = height.max(1);

    let mut img = ImageBuffer::from_pixel(w, h, Luma([255u8]));
    for (i, _) in modules.iter().enumerate().filter(|(_, bar)| **bar) {
        let x0 = i as u32 * module_px;
        for x in x0..x0 + module_px {
            for y in 0..h {
                img.put_pixel(x, y, Luma([0]));
            }
        }
    }
    img
}

/// PNG bytes for a bitmap.
pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_scales_modules_evenly() {
        let img = rasterize(&[true, false, true, true], 10, 3);
        // ceil(10 / 4) = 3 px per module
        assert_eq!(img.dimensions(), (12, 3));
        let row: Vec<u8> = (0..12).map(|x| img.get_pixel(x, 1).0[0]).collect();
        assert_eq!(row, [0, 0, 0, 255, 255, 255, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_rasterize_never_drops_modules() {
        let modules = vec![true; 300];
        let img = rasterize(&modules, 200, 50);
        assert_eq!(img.width(), 300);
    }

    #[test]
    fn test_generator_is_deterministic() {
        let r = SymbolRenderer::default();
        let a = r.generate("7290000000011", 200, 100).unwrap();
        let b = r.generate("7290000000011", 200, 100).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.height(), 100);
        assert!(a.width() >= 200);
    }

    #[test]
    fn test_generator_reports_unencodable_codes() {
        let r = SymbolRenderer::new(Symbology::Ean13);
        assert_eq!(r.generate("12", 200, 100), Err(BarcodeError::Ean13Length(2)));
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&rasterize(&[true, false], 4, 4)).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
