//! Page renderer: draws one planned page through a [`DocumentWriter`].
//!
//! Header: date label (left) and title (centered). Body: a grid of barcode
//! cells, filled row by row across `num_columns` columns, each cell a barcode
//! image with its code centered underneath. Footer: the 1-based page number.

use image::GrayImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts;
use crate::error::{Result, SheetError};
use crate::geometry::Geometry;
use crate::graphics::BarcodeGenerator;
use crate::planner::PageDescriptor;
use crate::writer::{DocumentWriter, FontWeight, TextStyle};

/// Font sizes and spacing for the page furniture, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageStyle {
    pub date_font_size: f32,
    pub title_font_size: f32,
    pub label_font_size: f32,
    pub footer_font_size: f32,
    pub header_gap: f32,
    pub footer_offset: f32,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            date_font_size: consts::DATE_FONT,
            title_font_size: consts::TITLE_FONT,
            label_font_size: consts::LABEL_FONT,
            footer_font_size: consts::FOOTER_FONT,
            header_gap: consts::HEADER_GAP,
            footer_offset: consts::FOOTER_OFFSET,
        }
    }
}

/// Top-left corner of a cell's barcode image in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPosition {
    pub x: f32,
    pub y: f32,
}

/// Cell positions for `count` items below a header ending at `top`.
pub fn cell_positions(geometry: &Geometry, left: f32, top: f32, count: usize) -> Vec<CellPosition> {
    (0..count)
        .map(|i| {
            let (dx, dy) = geometry.cell_offset(i);
            CellPosition { x: left + dx, y: top + dy }
        })
        .collect()
}

pub struct PageRenderer<'a, G: BarcodeGenerator> {
    geometry: &'a Geometry,
    style: &'a PageStyle,
    generator: &'a G,
}

impl<'a, G: BarcodeGenerator> PageRenderer<'a, G> {
    pub fn new(geometry: &'a Geometry, style: &'a PageStyle, generator: &'a G) -> Self {
        Self { geometry, style, generator }
    }

    /// Render `page` as page number `page_index + 1` on a fresh document page.
    pub fn render<W: DocumentWriter>(&self, writer: &mut W, page_index: usize, page: &PageDescriptor) -> Result<()> {
        // Encode before touching the document so a bad code leaves no half-drawn page.
        let images = self.barcode_images(page)?;

        writer.new_page()?;
        let top = self.draw_header(writer, page)?;
        self.draw_cells(writer, page, &images, top)?;
        self.draw_footer(writer, page_index + 1)?;

        debug!(page = page_index + 1, items = page.items.len(), title = %page.title, "rendered page");
        Ok(())
    }

    /// One bitmap per item, generated on the rayon pool and returned in item order.
    fn barcode_images(&self, page: &PageDescriptor) -> Result<Vec<GrayImage>> {
        let width = self.geometry.barcode_width().round().max(1.0) as u32;
        let height = self.geometry.barcode_height().round().max(1.0) as u32;

        page.items
            .par_iter()
            .map(|item| {
                self.generator
                    .generate(&item.code, width, height)
                    .map_err(|source| SheetError::Barcode { code: item.code.clone(), source })
            })
            .collect()
    }

    /// Returns the y coordinate where the grid starts.
    fn draw_header<W: DocumentWriter>(&self, writer: &mut W, page: &PageDescriptor) -> Result<f32> {
        let margins = writer.margins();
        let mut y = margins.top;

        let date_style = TextStyle::new(FontWeight::Bold, self.style.date_font_size);
        writer.place_text(&page.date_label, margins.left, y, &date_style)?;
        y += writer.line_height(FontWeight::Bold, self.style.date_font_size);

        let title_style = TextStyle::new(FontWeight::Bold, self.style.title_font_size).centered(None);
        writer.place_text(&page.title, margins.left, y, &title_style)?;
        y += writer.line_height(FontWeight::Bold, self.style.title_font_size) + self.style.header_gap;

        Ok(y)
    }

    fn draw_cells<W: DocumentWriter>(
        &self,
        writer: &mut W,
        page: &PageDescriptor,
        images: &[GrayImage],
        top: f32,
    ) -> Result<()> {
        let g = self.geometry;
        let label_style = TextStyle::new(FontWeight::Regular, self.style.label_font_size)
            .centered(Some(g.barcode_width()));
        let positions = cell_positions(g, writer.margins().left, top, page.items.len());

        for ((item, image), cell) in page.items.iter().zip(images).zip(positions) {
            writer.place_image(image, cell.x, cell.y, g.barcode_width(), g.barcode_height())?;
            writer.place_text(&item.code, cell.x, cell.y + g.barcode_height(), &label_style)?;
        }
        Ok(())
    }

    fn draw_footer<W: DocumentWriter>(&self, writer: &mut W, page_number: usize) -> Result<()> {
        let size = self.style.footer_font_size;
        let text = page_number.to_string();
        let text_width = writer.text_width(&text, FontWeight::Regular, size);

        let page = writer.page_size();
        let x = (page.width - text_width) / 2.0;
        let y = page.height - writer.margins().bottom - self.style.footer_offset;
        writer.place_text(&text, x, y, &TextStyle::new(FontWeight::Regular, size))
    }
}
