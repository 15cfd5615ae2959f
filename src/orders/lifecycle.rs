/*!
 * # Order Lifecycle Engine
 *
 * Moves orders along the canonical fulfillment flow and groups them into
 * pipeline columns for the kanban view. All writes go through the
 * external [`OrderStore`]; the engine itself holds no order state.
 */

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::errors::AdminError;
use crate::orders::model::Order;
use crate::orders::status::{OrderStatus, CANONICAL_FLOW};
use crate::orders::store::{OrderPatch, OrderStore};

/// Result of an `advance` request.
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    /// Status moved one stage along the fulfillment flow; carries the
    /// record the store confirmed.
    Advanced {
        from: OrderStatus,
        to: OrderStatus,
        order: Order,
    },
    /// Terminal or unrecognized status; nothing to do. Reported as
    /// success so bulk advancement is never interrupted by finished
    /// orders.
    NoChange,
}

impl AdvanceOutcome {
    pub fn advanced(&self) -> bool {
        matches!(self, Self::Advanced { .. })
    }
}

/// The single state-transition authority for orders.
#[derive(Clone)]
pub struct LifecycleEngine<S: OrderStore> {
    store: Arc<S>,
}

impl<S: OrderStore> LifecycleEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Advances an order one step along the canonical flow.
    ///
    /// `cancelled`, `delivered` and unrecognized statuses are a no-op,
    /// never an error, and the flow never advances past `delivered`. On
    /// success the store receives the canonical string of the next
    /// status.
    #[instrument(skip(self, order), fields(order_id = %order.id, status = %order.status))]
    pub async fn advance(&self, order: &Order) -> Result<AdvanceOutcome, AdminError> {
        let Some(current) = OrderStatus::normalize(&order.status) else {
            warn!("Unrecognized status; leaving order untouched");
            return Ok(AdvanceOutcome::NoChange);
        };
        let Some(next) = current.next_in_flow() else {
            return Ok(AdvanceOutcome::NoChange);
        };

        let updated = self
            .store
            .update_order(&order.id, OrderPatch::status(next.to_string()))
            .await?;

        info!(from = %current, to = %next, "Order advanced");

        Ok(AdvanceOutcome::Advanced {
            from: current,
            to: next,
            order: updated,
        })
    }

    /// Sets an order's status directly.
    ///
    /// No validation against the canonical flow: manual status pickers
    /// may correct a mis-click in either direction. The local caller
    /// only learns the new state from the store's confirmed record.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = %status))]
    pub async fn set_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, AdminError> {
        let updated = self
            .store
            .update_order(order_id, OrderPatch::status(status.to_string()))
            .await?;

        info!("Order status set");
        Ok(updated)
    }

    /// Advances every order in `orders` that has a next stage, skipping
    /// terminal and unrecognized ones. A store failure on one order is
    /// logged and does not stop the batch.
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn advance_all(&self, orders: &[Order]) -> Vec<Order> {
        let mut advanced = Vec::new();
        for order in orders {
            match self.advance(order).await {
                Ok(AdvanceOutcome::Advanced { order, .. }) => advanced.push(order),
                Ok(AdvanceOutcome::NoChange) => {}
                Err(e) => {
                    error!(order_id = %order.id, error = %e, "Failed to advance order");
                }
            }
        }
        info!(advanced = advanced.len(), "Bulk advance complete");
        advanced
    }
}

/// Case-insensitive substring filter over order number, customer name and
/// phone. `None` or an empty query keeps everything.
pub fn filter_orders<'a>(orders: &'a [Order], query: Option<&str>) -> Vec<&'a Order> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => orders.iter().filter(|o| o.matches_query(q)).collect(),
        None => orders.iter().collect(),
    }
}

/// Orders grouped into the six fulfillment columns, in flow order, after
/// applying the search filter.
///
/// Cancelled and unrecognized statuses join no column; they stay visible
/// in the flat list and in aggregate counts.
pub fn pipeline_buckets<'a>(
    orders: &'a [Order],
    query: Option<&str>,
) -> Vec<(OrderStatus, Vec<&'a Order>)> {
    let filtered = filter_orders(orders, query);
    CANONICAL_FLOW
        .iter()
        .map(|status| {
            let column: Vec<&Order> = filtered
                .iter()
                .copied()
                .filter(|o| OrderStatus::normalize(&o.status) == Some(*status))
                .collect();
            (*status, column)
        })
        .collect()
}

/// Per-status tallies for menu badges, cancelled included. Unrecognized
/// statuses are not tallied.
pub fn status_counts(orders: &[Order]) -> HashMap<OrderStatus, usize> {
    let mut counts = HashMap::new();
    for order in orders {
        if let Some(status) = OrderStatus::normalize(&order.status) {
            *counts.entry(status).or_insert(0) += 1;
        }
    }
    counts
}
