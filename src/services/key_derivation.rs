//! 检索键生成
//!
//! 输出顺序：订单顺序 → 订单行顺序 → 数量重复顺序。不做排序或去重，
//! 下游以此顺序为每个键编号。

use crate::models::{Order, SearchKey};
use tracing::{debug, warn};

/// 单个订单行最多生成的检索键数量
pub const MAX_COPIES_PER_LINE: usize = 1000;

/// 为所有未发货订单生成检索键，每件商品一个
///
/// 数量小于等于 0 的订单行按 1 件处理，超过 [`MAX_COPIES_PER_LINE`] 的按上限处理。
pub fn derive_search_keys(orders: &[Order]) -> Vec<SearchKey> {
    let mut keys = Vec::new();

    for order in orders {
        if order.is_shipped() {
            debug!("跳过已发货订单 {}", order.order_id);
            continue;
        }

        for item in &order.items {
            let key = SearchKey::new(order.store_id(), &item.sku);
            let copies = copies_for(item.quantity);
            if copies as i64 != item.quantity.max(1) {
                warn!(
                    "⚠️ 订单 {} 的 {} 数量异常 ({})，只生成 {} 个检索键",
                    order.order_id, key, item.quantity, copies
                );
            }
            keys.extend(std::iter::repeat(key).take(copies));
        }
    }

    keys
}

fn copies_for(quantity: i64) -> usize {
    usize::try_from(quantity.max(1))
        .unwrap_or(MAX_COPIES_PER_LINE)
        .min(MAX_COPIES_PER_LINE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdvancedOptions, LineItem};

    fn order(id: i64, store_id: i64, shipped: bool, items: &[(&str, i64)]) -> Order {
        Order {
            order_id: id,
            order_number: None,
            ship_date: shipped.then(|| "2024-01-01T00:00:00".to_string()),
            advanced_options: AdvancedOptions { store_id },
            items: items
                .iter()
                .map(|(sku, quantity)| LineItem {
                    sku: sku.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    fn as_strings(keys: &[SearchKey]) -> Vec<&str> {
        keys.iter().map(SearchKey::as_str).collect()
    }

    #[test]
    fn shipped_orders_emit_nothing() {
        let orders = vec![order(1, 100, true, &[("SKUA", 5)]), order(2, 300, false, &[("SKUB", 2)])];

        let keys = derive_search_keys(&orders);

        assert_eq!(as_strings(&keys), vec!["300#SKUB", "300#SKUB"]);
    }

    #[test]
    fn non_positive_quantity_emits_once() {
        let orders = vec![order(1, 7, false, &[("ZERO", 0), ("NEG", -3), ("ONE", 1)])];

        let keys = derive_search_keys(&orders);

        assert_eq!(as_strings(&keys), vec!["7#ZERO", "7#NEG", "7#ONE"]);
    }

    #[test]
    fn keys_follow_order_then_item_then_quantity() {
        let orders = vec![
            order(1, 100, false, &[("SKU1", 1), ("SKU2", 2)]),
            order(2, 200, false, &[("SKU3", 1)]),
        ];

        let keys = derive_search_keys(&orders);

        assert_eq!(as_strings(&keys), vec!["100#SKU1", "100#SKU2", "100#SKU2", "200#SKU3"]);
        assert_eq!(derive_search_keys(&orders), keys);
    }

    #[test]
    fn absurd_quantity_is_capped() {
        let orders = vec![order(1, 9, false, &[("BULK", i64::MAX), ("ONE", 1)])];

        let keys = derive_search_keys(&orders);

        assert_eq!(keys.len(), MAX_COPIES_PER_LINE + 1);
        assert!(keys[..MAX_COPIES_PER_LINE].iter().all(|k| k.as_str() == "9#BULK"));
        assert_eq!(keys[MAX_COPIES_PER_LINE].as_str(), "9#ONE");
    }

    #[test]
    fn empty_input_yields_no_keys() {
        assert!(derive_search_keys(&[]).is_empty());
    }
}
