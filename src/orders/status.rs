use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Canonical order status vocabulary.
///
/// Producers disagree on three of these: `processing` means `preparing`,
/// `delivering` means `out-for-delivery`, and `completed` means
/// `delivered`. [`OrderStatus::normalize`] folds the aliases in at the
/// boundary so the engine and aggregator never compare raw strings, and
/// the stored raw value is only rewritten by an explicitly requested
/// transition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
}

/// The linear fulfillment sequence used by `advance`. `Cancelled` is not
/// part of it; it is terminal and reachable only through an explicit
/// status change.
pub const CANONICAL_FLOW: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
];

impl OrderStatus {
    /// Canonicalizes a raw producer status string.
    ///
    /// Returns `None` for values outside the recognized vocabulary; such
    /// orders render as "Unknown", join no pipeline column, and still
    /// count in raw totals.
    pub fn normalize(raw: &str) -> Option<OrderStatus> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "preparing" | "processing" => Some(OrderStatus::Preparing),
            "ready" => Some(OrderStatus::Ready),
            "out-for-delivery" | "out_for_delivery" | "delivering" => {
                Some(OrderStatus::OutForDelivery)
            }
            "delivered" | "completed" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Position in the linear flow; `None` for `Cancelled`.
    pub fn flow_index(self) -> Option<usize> {
        CANONICAL_FLOW.iter().position(|s| *s == self)
    }

    /// The next stage of the flow; `None` at `Delivered` and for
    /// `Cancelled`.
    pub fn next_in_flow(self) -> Option<OrderStatus> {
        let index = self.flow_index()?;
        CANONICAL_FLOW.get(index + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Display label for a raw status string; unrecognized values render
    /// as "Unknown".
    pub fn display_label(raw: &str) -> String {
        match Self::normalize(raw) {
            Some(status) => status.to_string(),
            None => "Unknown".to_string(),
        }
    }
}
