//! TOML configuration. Every section and field is optional; missing values
//! fall back to the defaults in [`crate::consts`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::barcode::Symbology;
use crate::consts;
use crate::error::{Result, SheetError};
use crate::geometry::{Geometry, LayoutConfig, Margins, PageConfig, PageSize};
use crate::render::PageStyle;

/// Physical page in points, with one margin on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self { width: consts::PAGE_W, height: consts::PAGE_H, margin: consts::MARGIN }
    }
}

impl PageSettings {
    pub fn size(&self) -> PageSize {
        PageSize { width: self.width, height: self.height }
    }

    pub fn margins(&self) -> Margins {
        Margins::uniform(self.margin)
    }
}

/// Optional TTF files; builtin Helvetica is used for any that are missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Page title; `{price}` is replaced by the group's price.
    pub title: String,
    /// chrono strftime format for the header date.
    pub date_format: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self { title: consts::TITLE_TEMPLATE.into(), date_format: consts::DATE_FORMAT.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeSettings {
    pub symbology: Symbology,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub prefix: String,
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { prefix: consts::FILE_PREFIX.into(), directory: PathBuf::from(".") }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub page: PageSettings,
    pub layout: LayoutConfig,
    pub style: PageStyle,
    pub fonts: FontPaths,
    pub labels: LabelSettings,
    pub barcode: BarcodeSettings,
    pub output: OutputSettings,
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SheetError::Configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn page_config(&self) -> PageConfig {
        PageConfig { size: self.page.size(), margins: self.page.margins(), layout: self.layout }
    }

    pub fn validate(&self) -> Result<()> {
        Geometry::resolve(&self.page_config())?;

        let style = &self.style;
        for (name, size) in [
            ("date font size", style.date_font_size),
            ("title font size", style.title_font_size),
            ("label font size", style.label_font_size),
            ("footer font size", style.footer_font_size),
        ] {
            if !(size.is_finite() && size > 0.0) {
                return Err(SheetError::Configuration(format!("{name} must be positive, got {size}")));
            }
        }

        if StrftimeItems::new(&self.labels.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(SheetError::Configuration(format!(
                "invalid date format {:?}",
                self.labels.date_format
            )));
        }

        let prefix = &self.output.prefix;
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(SheetError::Configuration(format!("invalid output prefix {prefix:?}")));
        }
        Ok(())
    }

    /// `<directory>/<prefix>-<timestamp>.pdf`; the timestamp avoids `:` so
    /// the name is valid on every platform.
    pub fn output_path(&self, generated_at: NaiveDateTime) -> PathBuf {
        let stamp = generated_at.format("%Y-%m-%dT%H-%M-%S");
        self.output.directory.join(format!("{}-{stamp}.pdf", self.output.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.layout.columns, 2);
        assert_eq!(config.labels.title, "Price: {price}");
        assert_eq!(config.barcode.symbology, Symbology::Code128);
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let config = Config::from_toml_str(
            r#"
            [layout]
            columns = 3
            barcode_width = 150.0

            [labels]
            title = "Price: ₪{price}"

            [barcode]
            symbology = "ean13"

            [fonts]
            regular = "fonts/Roboto-Regular.ttf"
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.columns, 3);
        assert_eq!(config.layout.barcode_height, consts::BARCODE_H);
        assert_eq!(config.labels.title, "Price: ₪{price}");
        assert_eq!(config.labels.date_format, "%B %Y");
        assert_eq!(config.barcode.symbology, Symbology::Ean13);
        assert_eq!(config.fonts.regular, Some(PathBuf::from("fonts/Roboto-Regular.ttf")));
        assert_eq!(config.fonts.bold, None);
    }

    #[test]
    fn test_infeasible_layout_is_rejected() {
        let err = Config::from_toml_str("[layout]\nheader_height = 900.0\n").unwrap_err();
        assert!(matches!(err, SheetError::Configuration(_)));
    }

    #[test]
    fn test_unknown_symbology_is_rejected() {
        assert!(Config::from_toml_str("[barcode]\nsymbology = \"qr\"\n").is_err());
    }

    #[test]
    fn test_bad_labels_and_prefix_are_rejected() {
        assert!(Config::from_toml_str("[labels]\ndate_format = \"%Q\"\n").is_err());
        assert!(Config::from_toml_str("[output]\nprefix = \"a/b\"\n").is_err());
        assert!(Config::from_toml_str("[style]\ntitle_font_size = 0.0\n").is_err());
    }

    #[test]
    fn test_output_path_has_prefix_and_timestamp() {
        let config = Config::default();
        let at = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(9, 5, 3).unwrap();
        assert_eq!(config.output_path(at), PathBuf::from("./barcodes-2026-10-19T09-05-03.pdf"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sheet.toml");

        let mut config = Config::default();
        config.page.margin = 36.0;
        config.output.prefix = "labels".into();
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
