use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::PeriodBatch;

/// Account role. Admins may modify any resource, users only their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parses a stored role string. Unknown values fall back to `User`.
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Home city, used as the default weather location.
    pub city: String,
    pub postal_code: Option<String>,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new user with the `User` role.
    pub fn new(
        email: impl Into<String>,
        city: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            city: city.into(),
            postal_code: None,
            role: Role::User,
            password_hash: password_hash.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// A (month, year) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// A period during which an advice applies.
///
/// The owning advice is referenced by id only; the advice owns the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: Uuid,
    pub advice_id: Uuid,
    pub month: u32,
    pub year: i32,
}

impl Period {
    pub fn new(advice_id: Uuid, month: u32, year: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            advice_id,
            month,
            year,
        }
    }

    pub fn key(&self) -> MonthYear {
        MonthYear::new(self.month, self.year)
    }

    pub fn matches(&self, key: MonthYear) -> bool {
        self.month == key.month && self.year == key.year
    }
}

/// A piece of gardening advice authored by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub periods: Vec<Period>,
}

impl Advice {
    /// Creates a new advice with no periods.
    pub fn new(user_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content: content.into(),
            created_at: Utc::now(),
            updated_at: None,
            periods: Vec::new(),
        }
    }

    /// Sets a specific ID for this advice (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Attaches a period unless the same (month, year) is already present.
    ///
    /// Returns `true` when a period was added.
    pub fn add_period(&mut self, key: MonthYear) -> bool {
        if self.has_period(key) {
            return false;
        }
        self.periods.push(Period::new(self.id, key.month, key.year));
        true
    }

    /// Builder form of [`Advice::add_period`].
    pub fn with_period(mut self, month: u32, year: i32) -> Self {
        self.add_period(MonthYear::new(month, year));
        self
    }

    pub fn has_period(&self, key: MonthYear) -> bool {
        self.periods.iter().any(|p| p.matches(key))
    }

    pub fn find_period(&self, key: MonthYear) -> Option<&Period> {
        self.periods.iter().find(|p| p.matches(key))
    }

    /// Returns true if `user_id` authored this advice.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Mirrors a committed batch onto the in-memory record.
    pub fn apply_batch(&mut self, batch: &PeriodBatch) {
        self.periods.retain(|p| !batch.deletes.contains(&p.id));
        self.periods.extend(batch.creates.iter().cloned());
        if let Some(content) = &batch.content {
            self.content = content.clone();
        }
        if batch.updated_at.is_some() {
            self.updated_at = batch.updated_at;
        }
    }
}
