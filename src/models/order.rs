use serde::{Deserialize, Deserializer};

/// ShipStation `/orders` 接口的响应（单页）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub pages: Option<u64>,
}

/// 单个订单，只保留生成标签所需的字段
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub order_id: i64,
    #[serde(default)]
    pub order_number: Option<String>,
    /// 非空表示已发货
    #[serde(default)]
    pub ship_date: Option<String>,
    #[serde(default)]
    pub advanced_options: AdvancedOptions,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Order {
    pub fn is_shipped(&self) -> bool {
        self.ship_date.is_some()
    }

    pub fn store_id(&self) -> i64 {
        self.advanced_options.store_id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedOptions {
    #[serde(default)]
    pub store_id: i64,
}

/// 订单行
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sku: String,
    #[serde(default)]
    pub quantity: i64,
}

// sku 可能是 null
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_shipstation_payload_with_nulls() {
        let body = r#"{
            "orders": [{
                "orderId": 42,
                "orderNumber": "1001",
                "shipDate": null,
                "shipByDate": null,
                "customerNotes": null,
                "advancedOptions": { "storeId": 100, "customField1": null },
                "items": [
                    { "sku": "SKU1", "quantity": 2, "warehouseLocation": null },
                    { "sku": null, "quantity": 1 }
                ]
            }],
            "total": 1,
            "page": 1,
            "pages": 1
        }"#;

        let list: OrderList = serde_json::from_str(body).unwrap();
        assert_eq!(list.orders.len(), 1);
        let order = &list.orders[0];
        assert!(!order.is_shipped());
        assert_eq!(order.store_id(), 100);
        assert_eq!(order.items[0].sku, "SKU1");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[1].sku, "");
        assert_eq!(list.pages, Some(1));
    }

    #[test]
    fn ship_date_marks_order_as_shipped() {
        let order: Order =
            serde_json::from_str(r#"{ "orderId": 1, "shipDate": "2024-03-01", "items": [] }"#).unwrap();
        assert!(order.is_shipped());
        assert_eq!(order.store_id(), 0);
    }
}
