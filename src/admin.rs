/*!
 * # Admin Orchestrator
 *
 * Composition root for the back-office console. Resolves the current
 * principal's permissions, caches the externally-fetched order set,
 * routes every order action through the lifecycle engine, and re-derives
 * the dashboard statistics after each confirmed mutation.
 */

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::auth::capabilities::{self, consts, AdminModule, Capability};
use crate::auth::resolver::{
    self, NavSection, NavSectionId, Principal, ResolvedPermissions,
};
use crate::auth::roles::{CreateRoleRequest, Role, RolePatch, RoleRegistry};
use crate::errors::AdminError;
use crate::orders::lifecycle::{self, AdvanceOutcome, LifecycleEngine};
use crate::orders::model::Order;
use crate::orders::status::OrderStatus;
use crate::orders::store::OrderStore;
use crate::stats::DashboardStats;

/// Composes the permission resolver, the role registry, the order
/// lifecycle engine and the stats aggregator behind one surface the
/// rendering layer talks to.
///
/// Single-threaded, event-driven use is assumed: methods take `&mut
/// self` and each store call updates state exactly once on completion.
/// Concurrent store calls race last-write-wins; nothing here blocks.
pub struct AdminOrchestrator<S: OrderStore> {
    registry: RoleRegistry,
    engine: LifecycleEngine<S>,
    store: Arc<S>,
    principal: Option<Principal>,
    permissions: ResolvedPermissions,
    active_section: NavSectionId,
    orders: Vec<Order>,
    stats: DashboardStats,
    loading: bool,
}

impl<S: OrderStore> AdminOrchestrator<S> {
    pub fn new(store: Arc<S>, registry: RoleRegistry) -> Self {
        Self {
            registry,
            engine: LifecycleEngine::new(store.clone()),
            store,
            principal: None,
            permissions: ResolvedPermissions::anonymous(),
            active_section: NavSectionId::Dashboard,
            orders: Vec::new(),
            stats: DashboardStats::default(),
            loading: false,
        }
    }

    // ---- Principal & permissions ------------------------------------

    /// Signs a principal in (or out with `None`) and re-resolves
    /// permissions, snapping the active section back into the visible
    /// list if it fell out.
    pub fn set_principal(&mut self, principal: Option<Principal>) {
        match &principal {
            Some(p) => info!(principal = %p.id, role = ?p.role, "Principal signed in"),
            None => info!("Principal signed out"),
        }
        self.principal = principal;
        self.resolve_permissions();
    }

    pub fn permissions(&self) -> &ResolvedPermissions {
        &self.permissions
    }

    pub fn visible_sections(&self) -> Vec<&'static NavSection> {
        resolver::visible_sections(&self.permissions)
    }

    pub fn active_section(&self) -> NavSectionId {
        self.active_section
    }

    /// Selects a section; a request for a hidden section lands on the
    /// first visible one instead.
    pub fn set_active_section(&mut self, section: NavSectionId) -> NavSectionId {
        let visible = self.visible_sections();
        self.active_section = resolver::reconcile_active_section(section, &visible);
        self.active_section
    }

    fn resolve_permissions(&mut self) {
        self.permissions = resolver::resolve(self.principal.as_ref(), &self.registry);
        let visible = resolver::visible_sections(&self.permissions);
        self.active_section = resolver::reconcile_active_section(self.active_section, &visible);
    }

    fn require_capability(&self, capability: &str) -> Result<(), AdminError> {
        if self.permissions.can_access(capability) {
            return Ok(());
        }
        warn!(capability, "Action refused: capability not held");
        Err(AdminError::unauthorized(format!(
            "Missing capability '{}'",
            capability
        )))
    }

    // ---- Orders ------------------------------------------------------

    /// Fetches the full order set and replaces the local cache wholesale
    /// (no merge). On failure the previous cache and stats are kept.
    ///
    /// The loading flag is meant for the dashboard surface only; other
    /// sections render from whatever is cached.
    #[instrument(skip(self))]
    pub async fn refresh_orders(&mut self) -> Result<(), AdminError> {
        self.loading = true;
        let result = self.store.fetch_orders().await;
        self.loading = false;

        match result {
            Ok(orders) => {
                self.orders = orders;
                self.stats = DashboardStats::compute(&self.orders);
                info!(count = self.orders.len(), "Order cache refreshed");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Order fetch failed; keeping previous cache");
                Err(e)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Flat order list after the search filter.
    pub fn filtered_orders(&self, query: Option<&str>) -> Vec<&Order> {
        lifecycle::filter_orders(&self.orders, query)
    }

    /// Kanban columns after the search filter.
    pub fn pipeline(&self, query: Option<&str>) -> Vec<(OrderStatus, Vec<&Order>)> {
        lifecycle::pipeline_buckets(&self.orders, query)
    }

    /// Per-status tallies for menu badges.
    pub fn status_counts(&self) -> HashMap<OrderStatus, usize> {
        lifecycle::status_counts(&self.orders)
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Advances one order along the fulfillment flow.
    #[instrument(skip(self))]
    pub async fn advance_order(&mut self, order_id: &str) -> Result<AdvanceOutcome, AdminError> {
        self.require_capability(consts::MANAGE_ORDERS)?;

        let order = self
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| AdminError::not_found(format!("Order {} not found", order_id)))?;

        let outcome = self.engine.advance(&order).await?;
        if let AdvanceOutcome::Advanced { order, .. } = &outcome {
            self.apply_updated(order.clone());
        }
        Ok(outcome)
    }

    /// Sets an order's status directly (manual picker path).
    #[instrument(skip(self), fields(status = %status))]
    pub async fn set_order_status(
        &mut self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, AdminError> {
        self.require_capability(consts::MANAGE_ORDERS)?;

        let updated = self.engine.set_status(order_id, status).await?;
        self.apply_updated(updated.clone());
        Ok(updated)
    }

    /// Cancels an order. The confirmation step happens in the UI; this
    /// executes a pre-confirmed request unconditionally.
    #[instrument(skip(self))]
    pub async fn cancel_order(&mut self, order_id: &str) -> Result<Order, AdminError> {
        if !(self.permissions.can_access(consts::MANAGE_ORDERS)
            || self.permissions.can_access(consts::CANCEL_ORDERS))
        {
            warn!("Cancel refused: capability not held");
            return Err(AdminError::unauthorized(
                "Missing capability 'cancel_orders'",
            ));
        }

        let updated = self.engine.set_status(order_id, OrderStatus::Cancelled).await?;
        self.apply_updated(updated.clone());
        Ok(updated)
    }

    /// Bulk affordance: advances every cached order with a next stage.
    /// Returns how many actually moved.
    #[instrument(skip(self))]
    pub async fn advance_all(&mut self) -> Result<usize, AdminError> {
        self.require_capability(consts::MANAGE_ORDERS)?;

        let snapshot = self.orders.clone();
        let advanced = self.engine.advance_all(&snapshot).await;
        let count = advanced.len();
        for order in advanced {
            self.apply_updated_without_recompute(order);
        }
        self.stats = DashboardStats::compute(&self.orders);
        Ok(count)
    }

    /// Applies a store-confirmed record to the cache and re-derives the
    /// stats. Only called after success; failures leave state untouched.
    fn apply_updated(&mut self, updated: Order) {
        self.apply_updated_without_recompute(updated);
        self.stats = DashboardStats::compute(&self.orders);
    }

    fn apply_updated_without_recompute(&mut self, updated: Order) {
        match self.orders.iter_mut().find(|o| o.id == updated.id) {
            Some(slot) => *slot = updated,
            None => self.orders.push(updated),
        }
    }

    // ---- Roles -------------------------------------------------------

    pub fn roles(&self) -> Vec<&Role> {
        self.registry.list()
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// The capability catalog grouped by module, for the role editor.
    pub fn capability_catalog(&self) -> Vec<(AdminModule, Vec<&'static Capability>)> {
        capabilities::catalog_by_module()
    }

    pub fn create_role(&mut self, request: CreateRoleRequest) -> Result<Role, AdminError> {
        self.require_capability(consts::MANAGE_ROLES)?;
        let role = self.registry.create(request)?;
        self.resolve_permissions();
        Ok(role)
    }

    pub fn update_role(&mut self, role_id: &str, patch: RolePatch) -> Result<Role, AdminError> {
        self.require_capability(consts::MANAGE_ROLES)?;
        let role = self.registry.update(role_id, patch)?;
        // The edit may have touched the signed-in principal's own role.
        self.resolve_permissions();
        Ok(role)
    }

    pub fn delete_role(&mut self, role_id: &str) -> Result<(), AdminError> {
        self.require_capability(consts::MANAGE_ROLES)?;
        self.registry.delete(role_id)?;
        self.resolve_permissions();
        Ok(())
    }
}
