use tracing::warn;

use timeline_policy::{Capability, Grant, Requester, authorize};

use crate::error::ApiError;

/// The authorization check every mutating handler goes through.
pub fn check(requester: &Requester, capability: Capability) -> Result<Grant, ApiError> {
    authorize(requester, capability).map_err(|denied| {
        warn!(
            "Permission denied for user {} ({}): {}",
            requester.user_id, requester.role, denied
        );
        ApiError::PermissionDenied
    })
}
