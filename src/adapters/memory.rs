//! In-memory record store. Backs the integration suites and mirrors the
//! Postgres adapters' observable behavior, including owner expansion on
//! single-record reads. Insertion order is the store order.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Goal, LedgerEntry, OwnerRef, User, UserSummary};
use crate::ports::{
    EntryRepository, EntryUpdate, GoalRepository, GoalUpdate, RepositoryError, RepositoryResult,
    UserRepository,
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    entries: Mutex<Vec<LedgerEntry>>,
    goals: Mutex<Vec<Goal>>,
}

fn lock<T>(mutex: &Mutex<T>) -> RepositoryResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Storage("bloqueo del almacen envenenado".to_string()))
}

impl MemoryStore {
    fn expand_owner(&self, owner: Option<&OwnerRef>) -> RepositoryResult<Option<OwnerRef>> {
        let Some(owner) = owner else {
            return Ok(None);
        };

        let users = lock(&self.users)?;
        let expanded = users
            .iter()
            .find(|user| user.id == owner.id())
            .map(|user| {
                OwnerRef::Expanded(UserSummary {
                    id: user.id,
                    username: user.username.clone(),
                    email: user.email.clone(),
                })
            })
            .unwrap_or_else(|| owner.clone());

        Ok(Some(expanded))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> RepositoryResult<User> {
        lock(&self.users)?.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(lock(&self.users)?.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(lock(&self.users)?
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(lock(&self.users)?
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }
}

#[async_trait]
impl EntryRepository for MemoryStore {
    async fn find_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<LedgerEntry>> {
        Ok(lock(&self.entries)?
            .iter()
            .filter(|entry| entry.owner_id() == Some(owner))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<LedgerEntry>> {
        let found = lock(&self.entries)?
            .iter()
            .find(|entry| entry.id == id)
            .cloned();

        match found {
            Some(mut entry) => {
                let expanded = self.expand_owner(entry.owner.as_ref())?;
                entry.owner = expanded;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, entry: &LedgerEntry) -> RepositoryResult<LedgerEntry> {
        lock(&self.entries)?.push(entry.clone());
        Ok(entry.clone())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: EntryUpdate,
    ) -> RepositoryResult<Option<LedgerEntry>> {
        let mut entries = lock(&self.entries)?;
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            return Ok(None);
        };

        if let Some(amount) = changes.amount {
            entry.amount = amount;
        }
        if let Some(kind) = changes.kind {
            entry.kind = kind;
        }
        if let Some(description) = changes.description {
            entry.description = description;
        }
        if let Some(occurred_at) = changes.occurred_at {
            entry.occurred_at = occurred_at;
        }
        entry.updated_at = Utc::now();

        Ok(Some(entry.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<Option<LedgerEntry>> {
        let mut entries = lock(&self.entries)?;
        let position = entries.iter().position(|entry| entry.id == id);
        Ok(position.map(|index| entries.remove(index)))
    }
}

#[async_trait]
impl GoalRepository for MemoryStore {
    async fn find_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<Goal>> {
        Ok(lock(&self.goals)?
            .iter()
            .filter(|goal| goal.owner_id() == Some(owner))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Goal>> {
        let found = lock(&self.goals)?.iter().find(|goal| goal.id == id).cloned();

        match found {
            Some(mut goal) => {
                let expanded = self.expand_owner(goal.owner.as_ref())?;
                goal.owner = expanded;
                Ok(Some(goal))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, goal: &Goal) -> RepositoryResult<Goal> {
        lock(&self.goals)?.push(goal.clone());
        Ok(goal.clone())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: GoalUpdate,
    ) -> RepositoryResult<Option<Goal>> {
        let mut goals = lock(&self.goals)?;
        let Some(goal) = goals.iter_mut().find(|goal| goal.id == id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            goal.title = title;
        }
        if let Some(description) = changes.description {
            goal.description = description;
        }
        if let Some(target_amount) = changes.target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(saved_amount) = changes.saved_amount {
            goal.saved_amount = saved_amount;
        }
        goal.updated_at = Utc::now();

        Ok(Some(goal.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<Option<Goal>> {
        let mut goals = lock(&self.goals)?;
        let position = goals.iter().position(|goal| goal.id == id);
        Ok(position.map(|index| goals.remove(index)))
    }
}
