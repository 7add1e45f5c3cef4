use crate::users::error::{UserError, UserResult};
use crate::users::password::{hash_password_async, verify_password_async};
use crate::users::repo::UserRepo;
use crate::users::repo_types::{NewUser, User, UserChanges, DEFAULT_ROLE};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Business rules for user records. Holds the repository it was built with;
/// cloning is cheap.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepo>,
}

/// Logs the full cause and replaces it with a fixed message for the caller.
fn store_err(msg: &'static str) -> impl FnOnce(anyhow::Error) -> UserError {
    move |e| {
        error!(error = ?e, "{}", msg);
        UserError::Store(msg)
    }
}

/// Empty strings count as absent.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self { repo }
    }

    pub async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(store_err("Error fetching user"))
    }

    pub async fn get_all(&self) -> UserResult<Vec<User>> {
        self.repo
            .list()
            .await
            .map_err(store_err("Error fetching users"))
    }

    pub async fn create(&self, input: NewUser) -> UserResult<User> {
        let existing = self
            .repo
            .find_by_email(&input.email)
            .await
            .map_err(store_err("Error creating user"))?;
        if existing.is_some() {
            warn!(email = %input.email, "email already registered");
            return Err(UserError::DuplicateEmail);
        }

        let password = hash_password_async(input.password)
            .await
            .map_err(store_err("Error creating user"))?;

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password,
            role: present(input.role).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            company_id: input.company_id.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let user = self
            .repo
            .insert(&user)
            .await
            .map_err(store_err("Error creating user"))?;
        info!(user_id = %user.id, email = %user.email, "user created");
        Ok(user)
    }

    /// Partial update. A new password is only accepted together with the
    /// current one, and both checks run before anything is written.
    pub async fn update(&self, id: Uuid, changes: UserChanges) -> UserResult<User> {
        let mut user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(store_err("Error updating user"))?
            .ok_or(UserError::NotFound)?;

        let new_hash = match present(changes.new_password) {
            Some(new_password) => {
                let current = present(changes.password).ok_or_else(|| {
                    warn!(user_id = %id, "new password without current password");
                    UserError::MissingOldPassword
                })?;
                let ok = verify_password_async(current, user.password.clone())
                    .await
                    .map_err(store_err("Error updating user"))?;
                if !ok {
                    warn!(user_id = %id, "current password did not verify");
                    return Err(UserError::IncorrectPassword);
                }
                Some(
                    hash_password_async(new_password)
                        .await
                        .map_err(store_err("Error updating user"))?,
                )
            }
            None => None,
        };

        if let Some(email) = present(changes.email) {
            if email != user.email {
                let taken = self
                    .repo
                    .find_by_email(&email)
                    .await
                    .map_err(store_err("Error updating user"))?
                    .is_some_and(|other| other.id != id);
                if taken {
                    warn!(user_id = %id, email = %email, "email already registered");
                    return Err(UserError::DuplicateEmail);
                }
            }
            user.email = email;
        }
        if let Some(name) = present(changes.name) {
            user.name = name;
        }
        if let Some(role) = present(changes.role) {
            user.role = role;
        }
        if let Some(company_id) = present(changes.company_id) {
            user.company_id = company_id;
        }
        if let Some(hash) = new_hash {
            user.password = hash;
        }
        user.updated_at = OffsetDateTime::now_utc();

        let user = self
            .repo
            .update(&user)
            .await
            .map_err(store_err("Error updating user"))?
            .ok_or(UserError::NotFound)?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(store_err("Error deleting user"))?;
        if deleted {
            info!(user_id = %id, "user deleted");
        }
        Ok(deleted)
    }
}
