//! printpdf implementation of [`DocumentWriter`].

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use image::GrayImage;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Px,
};

use crate::config::FontPaths;
use crate::error::{Result, SheetError};
use crate::geometry::{Margins, PageSize};
use crate::text::{visual_order, FontMetrics};
use crate::writer::{aligned_x, DocumentWriter, FontWeight, TextStyle};

struct LoadedFont {
    font: IndirectFontRef,
    metrics: FontMetrics,
}

pub struct PdfWriter {
    doc: PdfDocumentReference,
    layer: Option<PdfLayerReference>,
    page_size: PageSize,
    margins: Margins,
    regular: LoadedFont,
    bold: LoadedFont,
    pages: usize,
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn pdf_err(e: impl std::fmt::Display) -> SheetError {
    SheetError::Document(e.to_string())
}

impl PdfWriter {
    /// Empty document; pages are added by [`DocumentWriter::new_page`].
    pub fn new(title: &str, page_size: PageSize, margins: Margins, fonts: &FontPaths) -> Result<Self> {
        let doc = PdfDocument::empty(title);
        let regular = load_font(&doc, fonts.regular.as_deref(), BuiltinFont::Helvetica, false)?;
        let bold = load_font(&doc, fonts.bold.as_deref(), BuiltinFont::HelveticaBold, true)?;
        Ok(Self { doc, layer: None, page_size, margins, regular, bold, pages: 0 })
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.doc.save(&mut writer).map_err(pdf_err)
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_err)
    }

    fn font(&self, weight: FontWeight) -> &LoadedFont {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    fn current_layer(&self) -> Result<&PdfLayerReference> {
        self.layer
            .as_ref()
            .ok_or_else(|| SheetError::Document("drawing before the first page was started".into()))
    }
}

fn load_font(
    doc: &PdfDocumentReference,
    path: Option<&Path>,
    builtin: BuiltinFont,
    bold: bool,
) -> Result<LoadedFont> {
    match path {
        Some(path) => {
            let bytes = fs::read(path)
                .map_err(|e| SheetError::Font(format!("{}: {e}", path.display())))?;
            let font = doc
                .add_external_font(bytes.as_slice())
                .map_err(|e| SheetError::Font(format!("{}: {e}", path.display())))?;
            Ok(LoadedFont { font, metrics: FontMetrics::from_bytes(bytes)? })
        }
        None => {
            let font = doc.add_builtin_font(builtin).map_err(|e| SheetError::Font(e.to_string()))?;
            Ok(LoadedFont { font, metrics: FontMetrics::Builtin { bold } })
        }
    }
}

impl DocumentWriter for PdfWriter {
    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn margins(&self) -> Margins {
        self.margins
    }

    fn new_page(&mut self) -> Result<()> {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            mm(self.page_size.width),
            mm(self.page_size.height),
            format!("Page {}", self.pages),
        );
        self.layer = Some(self.doc.get_page(page).get_layer(layer));
        Ok(())
    }

    fn text_width(&self, text: &str, weight: FontWeight, size: f32) -> f32 {
        self.font(weight).metrics.width_of(&visual_order(text), size)
    }

    fn line_height(&self, weight: FontWeight, size: f32) -> f32 {
        self.font(weight).metrics.line_height(size)
    }

    fn place_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        let x = aligned_x(&*self, text, x, style);
        let font = self.font(style.weight);
        let baseline = y + font.metrics.ascent(style.size);

        let layer = self.current_layer()?;
        layer.use_text(
            visual_order(text),
            style.size,
            mm(x),
            mm(self.page_size.height - baseline),
            &font.font,
        );
        Ok(())
    }

    fn place_image(&mut self, image: &GrayImage, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        let layer = self.current_layer()?;
        let (px_w, px_h) = image.dimensions();

        let xobject = Image::from(ImageXObject {
            width: Px(px_w as usize),
            height: Px(px_h as usize),
            color_space: ColorSpace::Greyscale,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: image.as_raw().clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // At 72 dpi one pixel is one point; scale from there into the box.
        xobject.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(self.page_size.height - y - height)),
                scale_x: Some(width / px_w as f32),
                scale_y: Some(height / px_h as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
        Ok(())
    }
}
