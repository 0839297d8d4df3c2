//! Error types for barcode sheet generation.

use thiserror::Error;

/// Primary error type for building a barcode document.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("layout configuration error: {0}")]
    Configuration(String),

    #[error("invalid item at index {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error("cannot render barcode {code:?}: {source}")]
    Barcode {
        code: String,
        #[source]
        source: BarcodeError,
    },

    #[error("font error: {0}")]
    Font(String),

    #[error("document error: {0}")]
    Document(String),

    #[error("input error: {0}")]
    Input(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Symbol encoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BarcodeError {
    #[error("code is empty")]
    Empty,

    #[error("character {0:?} cannot be encoded")]
    UnsupportedChar(char),

    #[error("EAN-13 needs 12 or 13 digits, got {0}")]
    Ean13Length(usize),

    #[error("EAN-13 check digit mismatch: expected {expected}, got {got}")]
    Ean13Checksum { expected: u8, got: u8 },
}

/// Convenience Result type alias for SheetError.
pub type Result<T> = std::result::Result<T, SheetError>;
