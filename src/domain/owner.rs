use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner data attached when a record is read with its user expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Owning-user reference as stored records carry it: either the bare id or
/// the expanded user summary from a joined read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Id(Uuid),
    Expanded(UserSummary),
}

impl OwnerRef {
    /// Canonical owner id, whatever shape the reference has.
    pub fn id(&self) -> Uuid {
        match self {
            OwnerRef::Id(id) => *id,
            OwnerRef::Expanded(user) => user.id,
        }
    }
}
