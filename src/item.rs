//! Input items: one barcode with the price it is sold at.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// A product code and its price. Immutable input to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeItem {
    pub code: String,
    pub price: f64,
}

impl BarcodeItem {
    pub fn new(code: impl Into<String>, price: f64) -> Self {
        Self { code: code.into(), price }
    }
}

/// Reject the whole batch on the first malformed item.
pub fn validate_items(items: &[BarcodeItem]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        let reason = if item.code.is_empty() {
            Some("code is empty".to_string())
        } else if let Some(c) = item.code.chars().find(|c| c.is_control()) {
            Some(format!("code contains non-printable character {c:?}"))
        } else if !item.price.is_finite() {
            Some(format!("price {} is not a finite number", item.price))
        } else if item.price < 0.0 {
            Some(format!("price {} is negative", item.price))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(SheetError::InvalidItem { index, reason });
        }
    }
    Ok(())
}

/// Load items from a JSON array of `{"code": ..., "price": ...}` objects.
pub fn load_items(path: &Path) -> Result<Vec<BarcodeItem>> {
    let content = fs::read_to_string(path)?;
    parse_items(&content)
}

pub fn parse_items(json: &str) -> Result<Vec<BarcodeItem>> {
    serde_json::from_str(json).map_err(|e| SheetError::Input(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed_items() {
        let items = vec![BarcodeItem::new("7290000000011", 5.0), BarcodeItem::new("A-12", 0.0)];
        assert!(validate_items(&items).is_ok());
        assert!(validate_items(&[]).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_code() {
        let items = vec![BarcodeItem::new("123", 1.0), BarcodeItem::new("", 1.0)];
        match validate_items(&items) {
            Err(SheetError::InvalidItem { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidItem, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_prices() {
        assert!(validate_items(&[BarcodeItem::new("1", -0.5)]).is_err());
        assert!(validate_items(&[BarcodeItem::new("1", f64::NAN)]).is_err());
        assert!(validate_items(&[BarcodeItem::new("1", f64::INFINITY)]).is_err());
    }

    #[test]
    fn test_validate_rejects_control_characters() {
        assert!(validate_items(&[BarcodeItem::new("12\n34", 1.0)]).is_err());
    }

    #[test]
    fn test_parse_items_from_json() {
        let items = parse_items(r#"[{"code": "111", "price": 5}, {"code": "222", "price": 3.5}]"#).unwrap();
        assert_eq!(items, vec![BarcodeItem::new("111", 5.0), BarcodeItem::new("222", 3.5)]);
    }

    #[test]
    fn test_parse_items_reports_malformed_json() {
        let err = parse_items(r#"[{"code": "111"}]"#).unwrap_err();
        assert!(matches!(err, SheetError::Input(_)));
    }
}
