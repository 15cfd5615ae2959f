/*!
 * # Stats Aggregator
 *
 * Pure functions over the current order set. No incremental caching:
 * everything is recomputed wholesale after every order-set change, so the
 * result always matches a full recompute by construction.
 */

use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::orders::model::Order;
use crate::orders::status::OrderStatus;

/// Dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub revenue: Decimal,
    pub order_count: usize,
    pub distinct_customers: usize,
    pub average_order_value: Decimal,
    /// Sun..Sat revenue histogram
    pub sales_by_weekday: [Decimal; 7],
}

impl DashboardStats {
    pub fn compute(orders: &[Order]) -> Self {
        let revenue = revenue(orders);
        let eligible = orders.iter().filter(|o| is_revenue_eligible(o)).count();
        let average_order_value = if eligible == 0 {
            Decimal::ZERO
        } else {
            revenue / Decimal::from(eligible as u64)
        };

        Self {
            revenue,
            order_count: order_count(orders),
            distinct_customers: distinct_customers(orders),
            average_order_value,
            sales_by_weekday: sales_by_weekday(orders),
        }
    }
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            revenue: Decimal::ZERO,
            order_count: 0,
            distinct_customers: 0,
            average_order_value: Decimal::ZERO,
            sales_by_weekday: [Decimal::ZERO; 7],
        }
    }
}

fn is_revenue_eligible(order: &Order) -> bool {
    OrderStatus::normalize(&order.status) != Some(OrderStatus::Cancelled)
}

/// Sum of effective totals over all non-cancelled orders.
pub fn revenue(orders: &[Order]) -> Decimal {
    orders
        .iter()
        .filter(|o| is_revenue_eligible(o))
        .map(|o| o.effective_total())
        .sum()
}

/// Raw order count; cancelled orders are counted here, unlike revenue.
pub fn order_count(orders: &[Order]) -> usize {
    orders.len()
}

/// Distinct customer keys across the order set.
///
/// Every non-empty identity field of an order contributes a key, so a
/// single order can add several entries when its aliases disagree. This
/// matches the producing system and is kept deliberately; see DESIGN.md
/// before changing it.
pub fn distinct_customers(orders: &[Order]) -> usize {
    let mut keys: HashSet<&str> = HashSet::new();
    for order in orders {
        let fields = [
            order.customer.as_deref(),
            order.customer_name.as_deref(),
            order.customer_phone.as_deref(),
            order.user_id.as_deref(),
        ];
        for value in fields.into_iter().flatten() {
            let value = value.trim();
            if !value.is_empty() {
                keys.insert(value);
            }
        }
    }
    keys.len()
}

/// Sun..Sat revenue histogram.
///
/// Cancelled orders and orders with no parseable date are skipped here
/// only; such orders still count toward `revenue` and `order_count` as
/// applicable.
pub fn sales_by_weekday(orders: &[Order]) -> [Decimal; 7] {
    let mut buckets = [Decimal::ZERO; 7];
    for order in orders {
        if !is_revenue_eligible(order) {
            continue;
        }
        let Some(weekday) = order_weekday(order) else {
            continue;
        };
        buckets[weekday.num_days_from_sunday() as usize] += order.effective_total();
    }
    buckets
}

fn order_weekday(order: &Order) -> Option<Weekday> {
    if let Some(created_at) = order.created_at {
        return Some(created_at.weekday());
    }
    parse_loose_date(order.date.as_deref()?.trim()).map(|d| d.weekday())
}

/// Accepts the date shapes the producers actually emit: RFC 3339,
/// `YYYY-MM-DD`, and the legacy "May 4, 2025" form.
fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn order(id: &str, status: &str, total: Decimal) -> Order {
        Order {
            id: id.to_string(),
            order_number: format!("MD-{}", id),
            customer: None,
            customer_name: None,
            customer_phone: None,
            user_id: None,
            items: Vec::new(),
            subtotal: total,
            delivery_fee: dec!(0.00),
            total,
            total_amount: None,
            status: status.to_string(),
            assigned_to: None,
            created_at: None,
            date: None,
            time: None,
        }
    }

    #[test]
    fn revenue_excludes_cancelled_orders() {
        let mut orders = vec![
            order("1", "pending", dec!(500)),
            order("2", "delivered", dec!(1000)),
        ];
        assert_eq!(revenue(&orders), dec!(1500));

        orders.push(order("3", "cancelled", dec!(300)));
        assert_eq!(revenue(&orders), dec!(1500));
        assert_eq!(order_count(&orders), 3);
    }

    #[test]
    fn revenue_falls_back_to_total_amount() {
        let mut o = order("1", "pending", Decimal::ZERO);
        o.total_amount = Some(dec!(42.00));
        assert_eq!(revenue(&[o]), dec!(42.00));
    }

    #[test]
    fn one_order_can_contribute_several_customer_keys() {
        let mut o = order("1", "pending", dec!(10));
        o.customer = Some("Dana".to_string());
        o.customer_phone = Some("555-0131".to_string());
        o.user_id = Some("u_9".to_string());
        assert_eq!(distinct_customers(&[o]), 3);
    }

    #[test]
    fn duplicate_keys_across_orders_count_once() {
        let mut a = order("1", "pending", dec!(10));
        a.customer_name = Some("Dana".to_string());
        let mut b = order("2", "delivered", dec!(10));
        b.customer_name = Some("Dana".to_string());
        assert_eq!(distinct_customers(&[a, b]), 1);
    }

    #[test]
    fn weekday_histogram_prefers_created_at() {
        let mut sunday = order("1", "delivered", dec!(100));
        // 2025-05-04 was a Sunday
        sunday.created_at = Some(Utc.with_ymd_and_hms(2025, 5, 4, 12, 0, 0).unwrap());

        let mut monday = order("2", "pending", dec!(50));
        monday.date = Some("May 5, 2025".to_string());

        let buckets = sales_by_weekday(&[sunday, monday]);
        assert_eq!(buckets[0], dec!(100));
        assert_eq!(buckets[1], dec!(50));
    }

    #[test]
    fn unparseable_dates_skip_histogram_but_not_revenue() {
        let mut o = order("1", "pending", dec!(75));
        o.date = Some("someday".to_string());

        let orders = vec![o];
        assert_eq!(sales_by_weekday(&orders).iter().copied().sum::<Decimal>(), Decimal::ZERO);
        assert_eq!(revenue(&orders), dec!(75));
    }

    #[test]
    fn compute_matches_component_functions() {
        let orders = vec![
            order("1", "pending", dec!(500)),
            order("2", "delivered", dec!(1000)),
            order("3", "cancelled", dec!(300)),
        ];
        let stats = DashboardStats::compute(&orders);
        assert_eq!(stats.revenue, dec!(1500));
        assert_eq!(stats.order_count, 3);
        assert_eq!(stats.average_order_value, dec!(750));
    }
}
