//! Account directory boundary - read-only resolution of a user id to its
//! identity and role.
//!
//! Registration, credentials, and sessions live outside this crate; the
//! wallet lifecycle only needs to know that an owner exists before opening a
//! wallet for them.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a user is allowed to be in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Operator with manual-adjustment powers
    Admin,
    /// Lists items and receives purchase credits
    Merchant,
    /// Buys items
    Customer,
}

/// A resolved user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRecord {
    /// Opaque user id
    pub id: i64,
    /// The user's role
    pub role: Role,
}

/// Read-only user lookup.
#[allow(async_fn_in_trait)]
pub trait AccountDirectory {
    /// Resolves a user id; `None` if the directory does not know it.
    async fn resolve_user(&self, user_id: i64) -> Result<Option<UserRecord>>;
}

/// In-memory directory fixture.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: HashMap<i64, Role>,
}

impl StaticDirectory {
    /// Adds a user, builder-style.
    #[must_use]
    pub fn with_user(mut self, id: i64, role: Role) -> Self {
        self.users.insert(id, role);
        self
    }
}

impl AccountDirectory for StaticDirectory {
    async fn resolve_user(&self, user_id: i64) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .get(&user_id)
            .map(|role| UserRecord { id: user_id, role: *role }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_static_directory_resolution() -> Result<()> {
        let directory = StaticDirectory::default()
            .with_user(1, Role::Customer)
            .with_user(2, Role::Merchant);

        let user = directory.resolve_user(1).await?.unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(directory.resolve_user(3).await?.is_none());
        Ok(())
    }
}
