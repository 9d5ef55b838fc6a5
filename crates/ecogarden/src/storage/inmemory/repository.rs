//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use ecogarden_core::advice::{Advice, MonthYear, Period, User};
use ecogarden_core::storage::{
    AdviceRepository, PeriodBatch, RepositoryError, Result, UserRepository,
};

/// In-memory storage backend.
///
/// Advice records hold their periods inline. Locks are always taken users
/// first, then advice.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    advice: Arc<RwLock<HashMap<Uuid, Advice>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            advice: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn not_found(entity_type: &'static str, id: Uuid) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

/// Applies `batch` to a copy of `advice`, enforcing one period per
/// (month, year) and that deleted periods exist.
fn apply_batch(advice: &Advice, batch: &PeriodBatch) -> Result<Advice> {
    if let Some(missing) = batch
        .deletes
        .iter()
        .find(|id| !advice.periods.iter().any(|p| p.id == **id))
    {
        return Err(RepositoryError::CommitFailed(format!(
            "period {missing} does not belong to advice {}",
            advice.id
        )));
    }

    let mut next = advice.clone();
    next.apply_batch(batch);

    let mut keys: Vec<MonthYear> = next.periods.iter().map(Period::key).collect();
    keys.sort();
    if let Some(pair) = keys.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(RepositoryError::CommitFailed(format!(
            "advice {} already has period {}",
            advice.id, pair[0]
        )));
    }

    Ok(next)
}

#[async_trait]
impl AdviceRepository for InMemoryRepository {
    async fn get_advice(&self, id: Uuid) -> Result<Option<Advice>> {
        let advice = self.advice.read().await;
        Ok(advice.get(&id).cloned())
    }

    async fn list_advice_for_period(&self, period: MonthYear) -> Result<Vec<Advice>> {
        let advice = self.advice.read().await;
        let mut matching: Vec<Advice> = advice
            .values()
            .filter(|a| a.has_period(period))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn create_advice(&self, advice: &Advice) -> Result<()> {
        let users = self.users.read().await;
        if !users.contains_key(&advice.user_id) {
            return Err(RepositoryError::InvalidData(format!(
                "unknown author {}",
                advice.user_id
            )));
        }

        let mut store = self.advice.write().await;
        if store.contains_key(&advice.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Advice",
                id: advice.id.to_string(),
            });
        }
        store.insert(advice.id, advice.clone());
        Ok(())
    }

    async fn delete_advice(&self, id: Uuid) -> Result<()> {
        let mut advice = self.advice.write().await;
        advice
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Advice", id))
    }

    async fn find_period(&self, advice_id: Uuid, period: MonthYear) -> Result<Option<Period>> {
        let advice = self.advice.read().await;
        Ok(advice
            .get(&advice_id)
            .and_then(|a| a.find_period(period))
            .cloned())
    }

    async fn commit_period_batch(&self, batch: &PeriodBatch) -> Result<()> {
        let mut store = self.advice.write().await;
        let current = store
            .get(&batch.advice_id)
            .ok_or_else(|| not_found("Advice", batch.advice_id))?;

        let next = apply_batch(current, batch)?;
        store.insert(batch.advice_id, next);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) || users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(not_found("User", user.id));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        if users.remove(&id).is_none() {
            return Err(not_found("User", id));
        }

        let mut advice = self.advice.write().await;
        advice.retain(|_, a| a.user_id != id);
        Ok(())
    }
}
