use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::item::BarcodeItem;

/// Items keyed by price, iterated in ascending numeric order.
pub type PriceGroups = BTreeMap<OrderedFloat<f64>, Vec<BarcodeItem>>;

/// Stable partition of `items` by price.
pub fn group_by_price(items: &[BarcodeItem]) -> PriceGroups {
    let mut groups = PriceGroups::new();
    for item in items {
        // -0.0 + 0.0 == +0.0, so both zeros share one key and print as "0"
        let key = OrderedFloat(item.price + 0.0);
        groups.entry(key).or_default().push(item.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_no_groups() {
        assert!(group_by_price(&[]).is_empty());
    }

    #[test]
    fn test_groups_keep_input_order() {
        let items = vec![
            BarcodeItem::new("a", 5.0),
            BarcodeItem::new("b", 3.0),
            BarcodeItem::new("c", 5.0),
            BarcodeItem::new("d", 3.0),
        ];
        let groups = group_by_price(&items);
        let codes = |p: f64| -> Vec<&str> {
            groups[&OrderedFloat(p)].iter().map(|i| i.code.as_str()).collect()
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(codes(5.0), ["a", "c"]);
        assert_eq!(codes(3.0), ["b", "d"]);
    }

    #[test]
    fn test_keys_sort_numerically() {
        let items = vec![
            BarcodeItem::new("ten", 10.0),
            BarcodeItem::new("two", 2.0),
            BarcodeItem::new("half", 0.5),
        ];
        let keys: Vec<f64> = group_by_price(&items).keys().map(|k| k.0).collect();
        assert_eq!(keys, [0.5, 2.0, 10.0]);
    }

    #[test]
    fn test_signed_zeros_share_a_group() {
        let items = vec![BarcodeItem::new("a", -0.0), BarcodeItem::new("b", 0.0)];
        let groups = group_by_price(&items);
        assert_eq!(groups.len(), 1);
        let (key, group) = groups.iter().next().unwrap();
        assert!(key.0.is_sign_positive());
        assert_eq!(group.len(), 2);
    }
}
