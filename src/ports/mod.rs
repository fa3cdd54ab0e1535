//! Record store ports. The core and the handlers only ever talk to these
//! traits; Postgres and in-memory implementations live under `adapters`.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{EntryKind, Goal, LedgerEntry, User};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("registro no encontrado: {0}")]
    NotFound(String),

    #[error("fallo de almacenamiento: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                RepositoryError::NotFound("registro no encontrado".to_string())
            }
            other => RepositoryError::Storage(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Partial update for a ledger entry; `None` fields keep the stored value.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub amount: Option<BigDecimal>,
    pub kind: Option<EntryKind>,
    pub description: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Partial update for a goal; `None` fields keep the stored value.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<BigDecimal>,
    pub saved_amount: Option<BigDecimal>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn find_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<LedgerEntry>>;
    /// Single-record read; the owner reference comes back expanded.
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<LedgerEntry>>;
    async fn insert(&self, entry: &LedgerEntry) -> RepositoryResult<LedgerEntry>;
    async fn update_by_id(
        &self,
        id: Uuid,
        changes: EntryUpdate,
    ) -> RepositoryResult<Option<LedgerEntry>>;
    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<Option<LedgerEntry>>;
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn find_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<Goal>>;
    /// Single-record read; the owner reference comes back expanded.
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Goal>>;
    async fn insert(&self, goal: &Goal) -> RepositoryResult<Goal>;
    async fn update_by_id(&self, id: Uuid, changes: GoalUpdate)
        -> RepositoryResult<Option<Goal>>;
    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<Option<Goal>>;
}
