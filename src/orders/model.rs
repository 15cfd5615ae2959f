use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line item as produced by checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
    #[serde(alias = "unitPrice", alias = "price")]
    pub unit_price: Decimal,
    /// Size variant, when the product has one
    #[serde(default)]
    pub size: Option<String>,
}

/// An order as fetched from the persistence service.
///
/// Orders reach this layer from more than one producer, so several fields
/// carry serde aliases for the alternate vocabularies (`customerName`,
/// `totalAmount`, ...). The raw `status` string is preserved exactly as
/// stored; canonicalization happens at the engine and aggregator
/// boundaries via [`crate::orders::status::OrderStatus::normalize`].
///
/// Created once by checkout; this core only ever mutates `status` and
/// `assigned_to`. Cancellation is a terminal status, never a deletion.
/// Totals are trusted as produced (`subtotal + delivery_fee == total` at
/// creation) and not re-validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(alias = "orderNumber")]
    pub order_number: String,

    // Customer identity aliases; any subset may be present.
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default, alias = "customerName")]
    pub customer_name: Option<String>,
    #[serde(default, alias = "customerPhone", alias = "phone")]
    pub customer_phone: Option<String>,
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,

    #[serde(default)]
    pub items: Vec<OrderItem>,

    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default, alias = "deliveryFee")]
    pub delivery_fee: Decimal,
    #[serde(default)]
    pub total: Decimal,
    /// Secondary total used by one producer; consulted when `total` is
    /// absent or zero
    #[serde(default, alias = "totalAmount")]
    pub total_amount: Option<Decimal>,

    pub status: String,

    #[serde(default, alias = "assignedTo")]
    pub assigned_to: Option<String>,

    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Human-readable date from the legacy producer, e.g. "May 4, 2025"
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

impl Order {
    /// The order's effective total: `total` unless it is zero or absent,
    /// in which case the producer's secondary `total_amount` is used.
    pub fn effective_total(&self) -> Decimal {
        if !self.total.is_zero() {
            return self.total;
        }
        self.total_amount.unwrap_or(self.total)
    }

    /// Case-insensitive substring match over order number, customer name
    /// (both alias fields) and phone. An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let haystacks = [
            Some(self.order_number.as_str()),
            self.customer.as_deref(),
            self.customer_name.as_deref(),
            self.customer_phone.as_deref(),
        ];

        haystacks
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order() -> Order {
        Order {
            id: "ord_1".to_string(),
            order_number: "MD-1042".to_string(),
            customer: None,
            customer_name: Some("Dana Reyes".to_string()),
            customer_phone: Some("+1-555-0131".to_string()),
            user_id: None,
            items: Vec::new(),
            subtotal: dec!(18.00),
            delivery_fee: dec!(2.50),
            total: dec!(20.50),
            total_amount: None,
            status: "pending".to_string(),
            assigned_to: None,
            created_at: None,
            date: None,
            time: None,
        }
    }

    #[test]
    fn effective_total_prefers_primary_field() {
        let mut o = order();
        assert_eq!(o.effective_total(), dec!(20.50));

        o.total = Decimal::ZERO;
        o.total_amount = Some(dec!(21.00));
        assert_eq!(o.effective_total(), dec!(21.00));

        o.total_amount = None;
        assert_eq!(o.effective_total(), Decimal::ZERO);
    }

    #[test]
    fn query_matches_number_name_and_phone() {
        let o = order();
        assert!(o.matches_query("md-10"));
        assert!(o.matches_query("DANA"));
        assert!(o.matches_query("555-0131"));
        assert!(o.matches_query(""));
        assert!(!o.matches_query("burrito"));
    }

    #[test]
    fn deserializes_camel_case_producer() {
        let json = r#"{
            "id": "ord_9",
            "orderNumber": "MD-9",
            "customerName": "Lee",
            "customerPhone": "555-0100",
            "items": [{"id": "i1", "name": "Pad Thai", "quantity": 2, "unitPrice": "9.50"}],
            "deliveryFee": "1.00",
            "total_amount": "20.00",
            "status": "processing",
            "date": "May 4, 2025"
        }"#;
        let o: Order = serde_json::from_str(json).unwrap();
        assert_eq!(o.order_number, "MD-9");
        assert_eq!(o.customer_name.as_deref(), Some("Lee"));
        assert_eq!(o.items[0].unit_price, dec!(9.50));
        assert_eq!(o.effective_total(), dec!(20.00));
        assert_eq!(o.status, "processing");
    }
}
