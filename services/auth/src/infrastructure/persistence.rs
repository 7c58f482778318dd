//! 内存用户仓储
//!
//! 进程重启后数据丢失

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use parking_lot::RwLock;
use zipper_errors::{AppError, AppResult};
use zipper_otp::Identifier;

use crate::domain::{User, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Identifier, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_identifier(&self, identifier: &Identifier) -> AppResult<Option<User>> {
        Ok(self.users.read().get(identifier).cloned())
    }

    async fn exists(&self, identifier: &Identifier) -> AppResult<bool> {
        Ok(self.users.read().contains_key(identifier))
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        match self.users.write().entry(user.identifier.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "This account is already in the system.",
            )),
            Entry::Vacant(entry) => {
                entry.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        match self.users.write().get_mut(&user.identifier) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(AppError::not_found("User not found")),
        }
    }
}
