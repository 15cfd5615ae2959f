use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::errors::AdminError;
use crate::orders::model::Order;

/// Partial update accepted by the persistence service. Only the fields
/// this core ever mutates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl OrderPatch {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

/// Seam to the external order persistence service.
///
/// Calls may be in flight concurrently with user interaction; this core
/// does not serialize them, and the last response to arrive wins in the
/// local cache. A failure is reported as
/// [`AdminError::ExternalService`] and never retried here.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Returns the full order collection, newest first.
    async fn fetch_orders(&self) -> Result<Vec<Order>, AdminError>;

    /// Applies a partial update and returns the updated record.
    async fn update_order(&self, order_id: &str, patch: OrderPatch) -> Result<Order, AdminError>;
}

/// DashMap-backed store used by tests and by the rendering layer until a
/// real backend is wired in.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: DashMap<String, Order>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(orders: Vec<Order>) -> Self {
        let store = Self::new();
        for order in orders {
            store.insert(order);
        }
        store
    }

    pub fn insert(&self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.orders.get(order_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn fetch_orders(&self) -> Result<Vec<Order>, AdminError> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // Newest first, then order number for a stable tiebreak.
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.order_number.cmp(&b.order_number))
        });
        Ok(orders)
    }

    async fn update_order(&self, order_id: &str, patch: OrderPatch) -> Result<Order, AdminError> {
        let mut entry = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| AdminError::not_found(format!("Order {} not found", order_id)))?;

        if let Some(status) = patch.status {
            entry.status = status;
        }
        if let Some(assigned_to) = patch.assigned_to {
            entry.assigned_to = Some(assigned_to);
        }

        Ok(entry.clone())
    }
}
