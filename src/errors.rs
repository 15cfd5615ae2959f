use serde::Serialize;

/// Error taxonomy for the admin core.
///
/// A no-op `advance` on a terminal or unrecognized status is deliberately
/// not represented here; it is reported as
/// [`crate::orders::lifecycle::AdvanceOutcome::NoChange`] so bulk
/// advancement is never interrupted by finished orders.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum AdminError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Role '{0}' is immutable and cannot be edited")]
    ImmutableRole(String),

    #[error("Role '{0}' is system-protected and cannot be deleted")]
    SystemRoleProtected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External service failure: {0}")]
    ExternalService(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AdminError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Whether the failure came from the persistence collaborator rather
    /// than from local validation or policy.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalService(_))
    }
}
