/*!
 * # Orders Module
 *
 * The order model as produced by checkout, status canonicalization across
 * producer vocabularies, the lifecycle engine that advances orders through
 * fulfillment, and the async seam to the external persistence service.
 */

pub mod lifecycle;
pub mod model;
pub mod status;
pub mod store;

pub use lifecycle::{AdvanceOutcome, LifecycleEngine};
pub use model::{Order, OrderItem};
pub use status::OrderStatus;
pub use store::{InMemoryOrderStore, OrderPatch, OrderStore};
