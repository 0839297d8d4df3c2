//! Page geometry: how many barcode cells fit in a column and on a page.
//!
//! All values are PDF points. The resolver is a pure function of an explicit
//! [`PageConfig`], so different geometries can be tested side by side.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts;
use crate::error::{Result, SheetError};

/// Physical page size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize { width: consts::PAGE_W, height: consts::PAGE_H };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(m: f32) -> Self {
        Self { top: m, right: m, bottom: m, left: m }
    }
}

/// Fixed layout constants for the barcode grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub columns: u32,
    pub barcode_width: f32,
    pub barcode_height: f32,
    pub text_height: f32,
    pub vertical_spacing: f32,
    pub header_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: consts::COLUMNS,
            barcode_width: consts::BARCODE_W,
            barcode_height: consts::BARCODE_H,
            text_height: consts::TEXT_H,
            vertical_spacing: consts::V_SPACING,
            header_height: consts::HEADER_H,
        }
    }
}

/// Everything the resolver needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfig {
    pub size: PageSize,
    pub margins: Margins,
    pub layout: LayoutConfig,
}

/// Resolved grid geometry. `page_width`/`page_height` are the content area.
///
/// Only [`Geometry::resolve`] builds one, so every instance fits at least one
/// row and one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    page_width: f32,
    page_height: f32,
    num_columns: u32,
    column_width: f32,
    barcode_width: f32,
    barcode_height: f32,
    text_height: f32,
    vertical_spacing: f32,
    header_height: f32,
    items_per_column: u32,
}

impl Geometry {
    /// Resolve the grid for one document. Fails when not even one cell fits.
    pub fn resolve(config: &PageConfig) -> Result<Self> {
        let PageConfig { size, margins, layout } = config;

        if layout.columns == 0 {
            return Err(SheetError::Configuration("column count must be at least 1".into()));
        }
        for (name, value) in [
            ("page width", size.width),
            ("page height", size.height),
            ("barcode width", layout.barcode_width),
            ("barcode height", layout.barcode_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SheetError::Configuration(format!("{name} must be positive, got {value}")));
            }
        }
        for (name, value) in [
            ("text height", layout.text_height),
            ("vertical spacing", layout.vertical_spacing),
            ("header height", layout.header_height),
            ("top margin", margins.top),
            ("right margin", margins.right),
            ("bottom margin", margins.bottom),
            ("left margin", margins.left),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SheetError::Configuration(format!("{name} must not be negative, got {value}")));
            }
        }

        let page_width = size.width - margins.left - margins.right;
        let page_height = size.height - margins.top - margins.bottom;
        if page_width <= 0.0 || page_height <= 0.0 {
            return Err(SheetError::Configuration(format!(
                "margins leave no content area on a {}x{} page",
                size.width, size.height
            )));
        }

        let pitch = layout.barcode_height + layout.text_height + layout.vertical_spacing;
        let fit = ((page_height - layout.header_height) / pitch).floor();
        if fit < 1.0 {
            return Err(SheetError::Configuration(format!(
                "no barcode row fits: content height {page_height} minus header {} is below one cell of {pitch}",
                layout.header_height
            )));
        }

        let column_width = page_width / layout.columns as f32;
        if layout.barcode_width > column_width {
            warn!(
                barcode_width = layout.barcode_width,
                column_width, "barcode is wider than its column; neighbouring cells will overlap"
            );
        }

        Ok(Self {
            page_width,
            page_height,
            num_columns: layout.columns,
            column_width,
            barcode_width: layout.barcode_width,
            barcode_height: layout.barcode_height,
            text_height: layout.text_height,
            vertical_spacing: layout.vertical_spacing,
            header_height: layout.header_height,
            items_per_column: fit as u32,
        })
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns as usize
    }

    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    pub fn barcode_width(&self) -> f32 {
        self.barcode_width
    }

    pub fn barcode_height(&self) -> f32 {
        self.barcode_height
    }

    pub fn text_height(&self) -> f32 {
        self.text_height
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn items_per_column(&self) -> usize {
        self.items_per_column as usize
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_column() * self.num_columns()
    }

    /// Vertical distance between consecutive grid rows.
    pub fn row_pitch(&self) -> f32 {
        self.barcode_height + self.text_height + self.vertical_spacing
    }

    /// Top-left of cell `index` relative to the content origin and the header bottom.
    /// Depends only on the index, never on other cells.
    pub fn cell_offset(&self, index: usize) -> (f32, f32) {
        let cols = self.num_columns();
        let column = index % cols;
        let row = index / cols;
        let x = column as f32 * self.column_width + (self.column_width - self.barcode_width) / 2.0;
        let y = row as f32 * self.row_pitch();
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4() -> PageConfig {
        PageConfig {
            size: PageSize::A4,
            margins: Margins::uniform(consts::MARGIN),
            layout: LayoutConfig::default(),
        }
    }

    #[test]
    fn test_default_a4_geometry() {
        let g = Geometry::resolve(&a4()).unwrap();
        // (741.89 - 60) / 125 = 5.45
        assert_eq!(g.items_per_column(), 5);
        assert_eq!(g.items_per_page(), 10);
        assert!((g.column_width - 247.64).abs() < 0.01);
        assert!((g.page_height - 741.89).abs() < 0.01);
    }

    #[test]
    fn test_column_count_is_a_parameter() {
        let mut config = a4();
        config.layout.columns = 3;
        config.layout.barcode_width = 150.0;
        let g = Geometry::resolve(&config).unwrap();
        assert_eq!(g.items_per_page(), 15);
        assert!((g.column_width - 495.28 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_header_taller_than_page_is_a_configuration_error() {
        let mut config = a4();
        config.layout.header_height = 800.0;
        assert!(matches!(Geometry::resolve(&config), Err(SheetError::Configuration(_))));
    }

    #[test]
    fn test_cell_taller_than_remaining_space_is_rejected() {
        let mut config = a4();
        config.layout.header_height = 700.0; // 41.89 left, cell needs 125
        assert!(matches!(Geometry::resolve(&config), Err(SheetError::Configuration(_))));
    }

    #[test]
    fn test_zero_columns_and_bad_sizes_are_rejected() {
        let mut config = a4();
        config.layout.columns = 0;
        assert!(Geometry::resolve(&config).is_err());

        let mut config = a4();
        config.layout.barcode_height = 0.0;
        assert!(Geometry::resolve(&config).is_err());

        let mut config = a4();
        config.margins = Margins::uniform(400.0);
        assert!(Geometry::resolve(&config).is_err());
    }

    #[test]
    fn test_resolved_geometry_always_fits_a_cell() {
        let mut config = a4();
        config.layout.columns = 1;
        config.layout.header_height = 600.0; // 141.89 left: one row
        let g = Geometry::resolve(&config).unwrap();
        assert_eq!(g.num_columns(), 1);
        assert_eq!(g.items_per_page(), 1);
        assert_eq!(g.cell_offset(3).1, 3.0 * g.row_pitch());
    }

    #[test]
    fn test_cell_offsets_follow_index_arithmetic() {
        let g = Geometry::resolve(&a4()).unwrap();
        let inset = (g.column_width - g.barcode_width) / 2.0;

        assert_eq!(g.cell_offset(0), (inset, 0.0));
        assert_eq!(g.cell_offset(1), (g.column_width + inset, 0.0));
        assert_eq!(g.cell_offset(2), (inset, 125.0));
        assert_eq!(g.cell_offset(9), (g.column_width + inset, 500.0));
    }
}
