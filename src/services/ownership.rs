//! Ownership guard: compares a record's owning-user reference with the
//! caller identity resolved by the auth layer.

use uuid::Uuid;

use crate::domain::OwnerRef;
use crate::error::AppError;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

/// Pure decision: the caller owns the record iff the normalized owner id
/// equals the caller id. A record without an owner reference is always
/// denied; this never fails.
pub fn authorize(owner: Option<&OwnerRef>, caller: Uuid) -> Decision {
    match owner {
        Some(owner) if owner.id() == caller => Decision::Allowed,
        _ => Decision::Denied,
    }
}

/// Handler-side guard: maps a denial to a 403 carrying the attempted action.
pub fn ensure_owner(owner: Option<&OwnerRef>, caller: Uuid, action: &str) -> Result<(), AppError> {
    match authorize(owner, caller) {
        Decision::Allowed => Ok(()),
        Decision::Denied => Err(AppError::Forbidden(format!(
            "no tienes permiso para {action}"
        ))),
    }
}
