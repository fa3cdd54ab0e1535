//! Postgres implementation of the goal repository.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Goal, OwnerRef, UserSummary};
use crate::ports::{GoalRepository, GoalUpdate, RepositoryError, RepositoryResult};

#[derive(Clone)]
pub struct PostgresGoalRepository {
    pool: PgPool,
}

impl PostgresGoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalRepository for PostgresGoalRepository {
    async fn find_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<Goal>> {
        let rows = sqlx::query_as::<_, GoalRow>(
            "SELECT * FROM metas WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GoalRow::into_domain).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Goal>> {
        let row = sqlx::query_as::<_, GoalWithOwnerRow>(
            r#"
            SELECT m.id, m.titulo, m.descripcion, m.valor_objetivo, m.valor_ahorro_actual,
                   m.created_at, m.updated_at,
                   u.id AS owner_id, u.username AS owner_username, u.email AS owner_email
            FROM metas m
            JOIN users u ON u.id = m.user_id
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GoalWithOwnerRow::into_domain))
    }

    async fn insert(&self, goal: &Goal) -> RepositoryResult<Goal> {
        let owner = goal
            .owner_id()
            .ok_or_else(|| RepositoryError::Storage("meta sin propietario".to_string()))?;

        let row = sqlx::query_as::<_, GoalRow>(
            r#"
            INSERT INTO metas (id, titulo, descripcion, valor_objetivo, valor_ahorro_actual,
                               user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, titulo, descripcion, valor_objetivo, valor_ahorro_actual,
                      user_id, created_at, updated_at
            "#,
        )
        .bind(goal.id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(&goal.target_amount)
        .bind(&goal.saved_amount)
        .bind(owner)
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_domain())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: GoalUpdate,
    ) -> RepositoryResult<Option<Goal>> {
        let row = sqlx::query_as::<_, GoalRow>(
            r#"
            UPDATE metas SET
                titulo = COALESCE($2, titulo),
                descripcion = COALESCE($3, descripcion),
                valor_objetivo = COALESCE($4, valor_objetivo),
                valor_ahorro_actual = COALESCE($5, valor_ahorro_actual),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, titulo, descripcion, valor_objetivo, valor_ahorro_actual,
                      user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.target_amount)
        .bind(changes.saved_amount)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GoalRow::into_domain))
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<Option<Goal>> {
        let row = sqlx::query_as::<_, GoalRow>(
            r#"
            DELETE FROM metas
            WHERE id = $1
            RETURNING id, titulo, descripcion, valor_objetivo, valor_ahorro_actual,
                      user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GoalRow::into_domain))
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct GoalRow {
    id: Uuid,
    titulo: String,
    descripcion: String,
    valor_objetivo: BigDecimal,
    valor_ahorro_actual: BigDecimal,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GoalRow {
    fn into_domain(self) -> Goal {
        Goal {
            id: self.id,
            title: self.titulo,
            description: self.descripcion,
            target_amount: self.valor_objetivo,
            saved_amount: self.valor_ahorro_actual,
            owner: Some(OwnerRef::Id(self.user_id)),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row variant for single-record reads, with the owner expanded via join.
#[derive(Debug, sqlx::FromRow)]
struct GoalWithOwnerRow {
    id: Uuid,
    titulo: String,
    descripcion: String,
    valor_objetivo: BigDecimal,
    valor_ahorro_actual: BigDecimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_username: String,
    owner_email: String,
}

impl GoalWithOwnerRow {
    fn into_domain(self) -> Goal {
        Goal {
            id: self.id,
            title: self.titulo,
            description: self.descripcion,
            target_amount: self.valor_objetivo,
            saved_amount: self.valor_ahorro_actual,
            owner: Some(OwnerRef::Expanded(UserSummary {
                id: self.owner_id,
                username: self.owner_username,
                email: self.owner_email,
            })),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
