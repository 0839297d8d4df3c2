//! The document-writing capability the page renderer draws through.
//!
//! Coordinates are PDF points with the origin at the top-left corner of the
//! page and y growing downwards. Implementations own all document state
//! (current page, fonts, output), so only the renderer ever mutates it.

use image::GrayImage;

use crate::error::Result;
use crate::geometry::{Margins, PageSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// How a string is placed. With no `width` the text box runs from `x` to
/// the right margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub size: f32,
    pub align: Align,
    pub width: Option<f32>,
}

impl TextStyle {
    pub fn new(weight: FontWeight, size: f32) -> Self {
        Self { weight, size, align: Align::Left, width: None }
    }

    pub fn centered(mut self, width: Option<f32>) -> Self {
        self.align = Align::Center;
        self.width = width;
        self
    }
}

pub trait DocumentWriter {
    fn page_size(&self) -> PageSize;

    fn margins(&self) -> Margins;

    /// Start a new page; later drawing calls target it.
    fn new_page(&mut self) -> Result<()>;

    fn text_width(&self, text: &str, weight: FontWeight, size: f32) -> f32;

    fn line_height(&self, weight: FontWeight, size: f32) -> f32;

    /// `y` is the top of the text line.
    fn place_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()>;

    /// Scale `image` into the `width` x `height` box whose top-left is (`x`, `y`).
    fn place_image(&mut self, image: &GrayImage, x: f32, y: f32, width: f32, height: f32) -> Result<()>;
}

/// Left edge of `text` once `style.align` is applied inside its box.
pub fn aligned_x<W: DocumentWriter + ?Sized>(writer: &W, text: &str, x: f32, style: &TextStyle) -> f32 {
    match style.align {
        Align::Left => x,
        Align::Center => {
            let box_width = style
                .width
                .unwrap_or_else(|| writer.page_size().width - writer.margins().right - x);
            let text_width = writer.text_width(text, style.weight, style.size);
            x + (box_width - text_width) / 2.0
        }
    }
}
