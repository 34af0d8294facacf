//! In-memory credential store
//!
//! Implements [`UserStore`] over a `HashMap` behind an `RwLock`. Used by
//! the test suite; also handy for running the service without a
//! database.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::users::{NewUser, UserPatch, UserRecord, UserStore};

/// Credential store backed by process memory
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, UserRecord>> {
        self.users.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, UserRecord>> {
        self.users.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let mut users = self.write();
        if users.values().any(|u| u.email == user.email) {
            anyhow::bail!("duplicate email: {}", user.email);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            image: user.image,
            designation: user.designation,
            refresh_token: user.refresh_token,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self.read().values().find(|u| u.email == email).cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .read()
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.read().values().any(|u| u.email == email))
    }

    async fn set_refresh_token(&self, email: &str, token: Option<&str>) -> Result<()> {
        let mut users = self.write();
        if let Some(user) = users.values_mut().find(|u| u.email == email) {
            user.refresh_token = token.map(str::to_string);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Option<UserRecord>> {
        let mut users = self.write();
        Ok(users.get_mut(&id).map(|user| {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn apply_patch(&self, id: Uuid, patch: UserPatch) -> Result<Option<UserRecord>> {
        let mut users = self.write();
        Ok(users.get_mut(&id).map(|user| {
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(image) = patch.image {
                user.image = Some(image);
            }
            if let Some(designation) = patch.designation {
                user.designation = Some(designation);
            }
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.write().remove(&id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let mut records: Vec<UserRecord> = self.read().values().cloned().collect();
        records.sort_by_key(|u| u.created_at);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            name: "A".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: "admin".to_string(),
            image: None,
            designation: None,
            refresh_token: Some("refresh-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_enforces_unique_email() {
        let store = MemoryUserStore::new();
        store.create(sample_user("a@x.com")).await.unwrap();
        assert!(store.create(sample_user("a@x.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_token_lookup_and_rotation() {
        let store = MemoryUserStore::new();
        let user = store.create(sample_user("a@x.com")).await.unwrap();

        let found = store.find_by_refresh_token("refresh-1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        // Rotating the token invalidates the previous value for lookup.
        store
            .set_refresh_token("a@x.com", Some("refresh-2"))
            .await
            .unwrap();
        assert!(store
            .find_by_refresh_token("refresh-1")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_refresh_token("refresh-2")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_clear_refresh_token_is_idempotent() {
        let store = MemoryUserStore::new();
        store.create(sample_user("a@x.com")).await.unwrap();

        store.set_refresh_token("a@x.com", None).await.unwrap();
        store.set_refresh_token("a@x.com", None).await.unwrap();

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert!(user.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_patch_retains_omitted_fields() {
        let store = MemoryUserStore::new();
        let mut user = sample_user("a@x.com");
        user.image = Some("https://example.com/a.png".to_string());
        user.designation = Some("Principal".to_string());
        let created = store.create(user).await.unwrap();

        let patched = store
            .apply_patch(
                created.id,
                UserPatch {
                    name: Some("B".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(patched.name, "B");
        assert_eq!(patched.image.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(patched.designation.as_deref(), Some("Principal"));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryUserStore::new();
        let created = store.create(sample_user("a@x.com")).await.unwrap();

        store.delete(created.id).await.unwrap();
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
        assert!(!store.email_exists("a@x.com").await.unwrap());
    }
}
