//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use mealdesk::errors::AdminError;
use mealdesk::orders::model::Order;
use mealdesk::orders::store::{InMemoryOrderStore, OrderPatch, OrderStore};

/// Builder-ish helper for a minimal order.
pub fn order(id: &str, status: &str, total: Decimal) -> Order {
    Order {
        id: id.to_string(),
        order_number: format!("MD-{}", id),
        customer: None,
        customer_name: None,
        customer_phone: None,
        user_id: None,
        items: Vec::new(),
        subtotal: total,
        delivery_fee: Decimal::ZERO,
        total,
        total_amount: None,
        status: status.to_string(),
        assigned_to: None,
        created_at: None,
        date: None,
        time: None,
    }
}

pub fn order_for(
    id: &str,
    status: &str,
    total: Decimal,
    customer_name: &str,
    phone: &str,
) -> Order {
    let mut o = order(id, status, total);
    o.customer_name = Some(customer_name.to_string());
    o.customer_phone = Some(phone.to_string());
    o
}

pub fn order_at(id: &str, status: &str, total: Decimal, created_at: DateTime<Utc>) -> Order {
    let mut o = order(id, status, total);
    o.created_at = Some(created_at);
    o
}

/// In-memory store with switchable failure injection, standing in for a
/// persistence backend that times out or rejects.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryOrderStore,
    fail_fetch: AtomicBool,
    fail_update: AtomicBool,
}

impl FlakyStore {
    pub fn seeded(orders: Vec<Order>) -> Self {
        Self {
            inner: InMemoryOrderStore::seeded(orders),
            fail_fetch: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
        }
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.inner.get(order_id)
    }
}

#[async_trait]
impl OrderStore for FlakyStore {
    async fn fetch_orders(&self) -> Result<Vec<Order>, AdminError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AdminError::external("order service unreachable"));
        }
        self.inner.fetch_orders().await
    }

    async fn update_order(&self, order_id: &str, patch: OrderPatch) -> Result<Order, AdminError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(AdminError::external("order service rejected update"));
        }
        self.inner.update_order(order_id, patch).await
    }
}
