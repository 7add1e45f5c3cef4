use crate::users::repo::UserRepo;
use crate::users::repo_types::User;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// `UserRepo` over a map, used by tests in place of Postgres.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepo {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let mut rows: Vec<User> = self.users.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn insert(&self, user: &User) -> anyhow::Result<User> {
        let mut users = self.users.write().await;
        anyhow::ensure!(!users.contains_key(&user.id), "duplicate id {}", user.id);
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(row) => {
                *row = User {
                    created_at: row.created_at,
                    ..user.clone()
                };
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user(email: &str) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: email.into(),
            password: "hash".into(),
            role: "user".into(),
            company_id: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let repo = InMemoryUserRepo::new();
        let u = repo.insert(&user("a@x.com")).await.unwrap();
        assert_eq!(repo.find_by_id(u.id).await.unwrap().unwrap().email, "a@x.com");
        assert_eq!(repo.find_by_email("a@x.com").await.unwrap().unwrap().id, u.id);
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_row_is_none() {
        let repo = InMemoryUserRepo::new();
        assert!(repo.update(&user("a@x.com")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let repo = InMemoryUserRepo::new();
        let u = repo.insert(&user("a@x.com")).await.unwrap();
        assert!(repo.delete(u.id).await.unwrap());
        assert!(!repo.delete(u.id).await.unwrap());
    }
}
