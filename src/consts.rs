// Page and layout defaults, in PDF points (1/72 inch)
pub const PAGE_W: f32 = 595.28;   // A4
pub const PAGE_H: f32 = 841.89;
pub const MARGIN: f32 = 50.0;

pub const COLUMNS: u32 = 2;

pub const BARCODE_W: f32 = 200.0;
pub const BARCODE_H: f32 = 100.0;
pub const TEXT_H: f32 = 15.0;       // label line under each barcode
pub const V_SPACING: f32 = 10.0;
pub const HEADER_H: f32 = 60.0;     // reserved for date + title when planning

pub const DATE_FONT: f32 = 12.0;
pub const TITLE_FONT: f32 = 16.0;
pub const LABEL_FONT: f32 = 12.0;
pub const FOOTER_FONT: f32 = 12.0;
pub const HEADER_GAP: f32 = 10.0;   // below the title
pub const FOOTER_OFFSET: f32 = 20.0; // above the bottom margin

pub const TITLE_TEMPLATE: &str = "Price: {price}";
pub const DATE_FORMAT: &str = "%B %Y";
pub const FILE_PREFIX: &str = "barcodes";
pub const DOC_TITLE: &str = "Barcodes";
