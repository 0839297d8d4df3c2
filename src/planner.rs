//! Page planning: split price groups into fully packed pages.
//!
//! The planner is pure. It never sees a document writer, only the grouped
//! items and the resolved [`Geometry`], so it is tested without any backend.

use chrono::NaiveDate;
use tracing::debug;

use crate::geometry::Geometry;
use crate::group::PriceGroups;
use crate::item::BarcodeItem;

/// One planned page: a header plus the items drawn in its grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDescriptor {
    pub title: String,
    pub date_label: String,
    pub price: f64,
    pub items: Vec<BarcodeItem>,
}

/// Produces the page title for a price group.
pub trait TitleFormat {
    fn format_title(&self, price: f64) -> String;
}

impl<F> TitleFormat for F
where
    F: Fn(f64) -> String,
{
    fn format_title(&self, price: f64) -> String {
        self(price)
    }
}

/// Title from a template with a `{price}` placeholder, e.g. `"Price: ₪{price}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTitle {
    template: String,
}

impl PriceTitle {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }
}

impl TitleFormat for PriceTitle {
    fn format_title(&self, price: f64) -> String {
        // f64 Display prints 5.0 as "5" and 2.5 as "2.5"
        self.template.replace("{price}", &price.to_string())
    }
}

/// Month and year label for page headers, e.g. "October 2026" for `"%B %Y"`.
pub fn date_label(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Plan every page of the document.
///
/// Groups are taken in ascending price order and each is cut into chunks of
/// `items_per_page`; a page never mixes prices and the last page of a group
/// holds the remainder.
pub fn plan(
    groups: &PriceGroups,
    geometry: &Geometry,
    date_label: &str,
    titles: &dyn TitleFormat,
) -> Vec<PageDescriptor> {
    let per_page = geometry.items_per_page();
    let mut pages = Vec::new();

    for (price, items) in groups {
        let price = price.0;
        let title = titles.format_title(price);
        let before = pages.len();

        pages.extend(items.chunks(per_page).map(|chunk| PageDescriptor {
            title: title.clone(),
            date_label: date_label.to_string(),
            price,
            items: chunk.to_vec(),
        }));

        debug!(price, items = items.len(), pages = pages.len() - before, "planned price group");
    }

    pages
}
