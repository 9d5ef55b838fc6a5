use async_trait::async_trait;
use uuid::Uuid;

use crate::advice::{Advice, MonthYear, Period, User};

use super::{PeriodBatch, Result};

/// Repository for advice and their periods.
#[async_trait]
pub trait AdviceRepository: Send + Sync {
    /// Gets an advice, with its periods, by ID.
    async fn get_advice(&self, id: Uuid) -> Result<Option<Advice>>;

    /// Gets every advice having the given period, newest first.
    async fn list_advice_for_period(&self, period: MonthYear) -> Result<Vec<Advice>>;

    /// Creates a new advice together with its periods.
    async fn create_advice(&self, advice: &Advice) -> Result<()>;

    /// Deletes an advice and all of its periods.
    async fn delete_advice(&self, id: Uuid) -> Result<()>;

    /// Finds the period of `advice_id` matching (month, year).
    async fn find_period(&self, advice_id: Uuid, period: MonthYear) -> Result<Option<Period>>;

    /// Applies all creations, deletions and the content update of `batch`
    /// atomically. On error nothing is applied.
    async fn commit_period_batch(&self, batch: &PeriodBatch) -> Result<()>;
}

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Creates a new user. Fails with `AlreadyExists` if the email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Updates an existing user.
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Deletes a user and everything they authored.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}
