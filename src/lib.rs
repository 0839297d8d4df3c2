//! Barcode sheets: product codes laid out on printable PDF pages.
//! - Groups items by price, ascending, one or more pages per price
//! - Packs each page into a multi-column grid sized from the page geometry
//! - Renders each code as a Code 128 (or EAN-13) image with its text underneath
//! - Dates every page and numbers it in the footer
//!
//! The planner is pure; only [`render::PageRenderer`] touches the document,
//! through the [`writer::DocumentWriter`] trait.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::info;

pub mod barcode;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod group;
pub mod item;
pub mod pdf;
pub mod planner;
pub mod render;
pub mod text;
pub mod writer;

pub use config::Config;
pub use error::{BarcodeError, Result, SheetError};
pub use geometry::{Geometry, LayoutConfig, Margins, PageConfig, PageSize};
pub use graphics::{BarcodeGenerator, SymbolRenderer};
pub use group::{group_by_price, PriceGroups};
pub use item::BarcodeItem;
pub use pdf::PdfWriter;
pub use planner::{plan, PageDescriptor, PriceTitle, TitleFormat};
pub use render::{PageRenderer, PageStyle};
pub use writer::DocumentWriter;

/// Outcome of [`create_pdf_with_barcodes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// `None` when there was nothing to print.
    pub path: Option<PathBuf>,
    pub pages: usize,
}

/// Validate, plan and render `items` into `writer`. Returns the page count.
///
/// Nothing is drawn unless the items are valid and the geometry fits at
/// least one cell per page.
pub fn build_document<W, G>(
    writer: &mut W,
    generator: &G,
    items: &[BarcodeItem],
    layout: &LayoutConfig,
    style: &PageStyle,
    titles: &dyn TitleFormat,
    date_label: &str,
) -> Result<usize>
where
    W: DocumentWriter,
    G: BarcodeGenerator,
{
    item::validate_items(items)?;

    let geometry = Geometry::resolve(&PageConfig {
        size: writer.page_size(),
        margins: writer.margins(),
        layout: *layout,
    })?;

    let groups = group_by_price(items);
    let pages = plan(&groups, &geometry, date_label, titles);
    info!(
        items = items.len(),
        prices = groups.len(),
        pages = pages.len(),
        per_page = geometry.items_per_page(),
        "planned barcode pages"
    );

    let renderer = PageRenderer::new(&geometry, style, generator);
    for (index, page) in pages.iter().enumerate() {
        renderer.render(writer, index, page)?;
    }
    Ok(pages.len())
}

/// Build the PDF for `items` and write it to the configured output directory.
///
/// The header date and the file name both come from `generated_at`. An empty
/// item list writes no file.
pub fn create_pdf_with_barcodes(
    items: &[BarcodeItem],
    config: &Config,
    generated_at: NaiveDateTime,
) -> Result<BuildReport> {
    let mut writer = PdfWriter::new(
        consts::DOC_TITLE,
        config.page.size(),
        config.page.margins(),
        &config.fonts,
    )?;
    let generator = SymbolRenderer::new(config.barcode.symbology);
    let titles = PriceTitle::new(config.labels.title.as_str());
    let date_label = planner::date_label(generated_at.date(), &config.labels.date_format);

    let pages = build_document(
        &mut writer,
        &generator,
        items,
        &config.layout,
        &config.style,
        &titles,
        &date_label,
    )?;

    if pages == 0 {
        info!("no items to print; no document written");
        return Ok(BuildReport { path: None, pages });
    }

    let path = config.output_path(generated_at);
    fs::create_dir_all(&config.output.directory)?;
    writer.save(&path)?;
    info!(path = %path.display(), pages, "barcode document written");

    Ok(BuildReport { path: Some(path), pages })
}
