//! Postgres implementation of the ledger-entry repository.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{EntryKind, LedgerEntry, OwnerRef, UserSummary};
use crate::ports::{EntryRepository, EntryUpdate, RepositoryError, RepositoryResult};

#[derive(Clone)]
pub struct PostgresEntryRepository {
    pool: PgPool,
}

impl PostgresEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PostgresEntryRepository {
    async fn find_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(
            "SELECT * FROM finanzas WHERE user_id = $1 ORDER BY fecha ASC, created_at ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EntryRow::into_domain).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<LedgerEntry>> {
        let row = sqlx::query_as::<_, EntryWithOwnerRow>(
            r#"
            SELECT f.id, f.valor, f.tipo, f.descripcion, f.fecha, f.created_at, f.updated_at,
                   u.id AS owner_id, u.username AS owner_username, u.email AS owner_email
            FROM finanzas f
            JOIN users u ON u.id = f.user_id
            WHERE f.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryWithOwnerRow::into_domain).transpose()
    }

    async fn insert(&self, entry: &LedgerEntry) -> RepositoryResult<LedgerEntry> {
        let owner = entry
            .owner_id()
            .ok_or_else(|| RepositoryError::Storage("finanza sin propietario".to_string()))?;

        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            INSERT INTO finanzas (id, valor, tipo, descripcion, fecha, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, valor, tipo, descripcion, fecha, user_id, created_at, updated_at
            "#,
        )
        .bind(entry.id)
        .bind(&entry.amount)
        .bind(entry.kind.as_str())
        .bind(&entry.description)
        .bind(entry.occurred_at)
        .bind(owner)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_domain()
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: EntryUpdate,
    ) -> RepositoryResult<Option<LedgerEntry>> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE finanzas SET
                valor = COALESCE($2, valor),
                tipo = COALESCE($3, tipo),
                descripcion = COALESCE($4, descripcion),
                fecha = COALESCE($5, fecha),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, valor, tipo, descripcion, fecha, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.amount)
        .bind(changes.kind.map(|kind| kind.as_str().to_string()))
        .bind(changes.description)
        .bind(changes.occurred_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryRow::into_domain).transpose()
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<Option<LedgerEntry>> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            DELETE FROM finanzas
            WHERE id = $1
            RETURNING id, valor, tipo, descripcion, fecha, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryRow::into_domain).transpose()
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    valor: BigDecimal,
    tipo: String,
    descripcion: String,
    fecha: DateTime<Utc>,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntryRow {
    fn into_domain(self) -> RepositoryResult<LedgerEntry> {
        let kind = parse_kind(&self.tipo)?;
        Ok(LedgerEntry {
            id: self.id,
            amount: self.valor,
            kind,
            description: self.descripcion,
            occurred_at: self.fecha,
            owner: Some(OwnerRef::Id(self.user_id)),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row variant for single-record reads, with the owner expanded via join.
#[derive(Debug, sqlx::FromRow)]
struct EntryWithOwnerRow {
    id: Uuid,
    valor: BigDecimal,
    tipo: String,
    descripcion: String,
    fecha: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_username: String,
    owner_email: String,
}

impl EntryWithOwnerRow {
    fn into_domain(self) -> RepositoryResult<LedgerEntry> {
        let kind = parse_kind(&self.tipo)?;
        Ok(LedgerEntry {
            id: self.id,
            amount: self.valor,
            kind,
            description: self.descripcion,
            occurred_at: self.fecha,
            owner: Some(OwnerRef::Expanded(UserSummary {
                id: self.owner_id,
                username: self.owner_username,
                email: self.owner_email,
            })),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_kind(raw: &str) -> RepositoryResult<EntryKind> {
    raw.parse::<EntryKind>()
        .map_err(|err| RepositoryError::Storage(err.to_string()))
}
