use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::error::UserError;
use crate::users::repo_types::{NewUser, User, UserChanges};

/// Request body for POST /users. Fields are optional so that a missing
/// field yields our own 400 instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub company_id: Option<String>,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> Result<NewUser, UserError> {
        match (
            self.name.filter(|s| !s.is_empty()),
            self.email.filter(|s| !s.is_empty()),
            self.password.filter(|s| !s.is_empty()),
        ) {
            (Some(name), Some(email), Some(password)) => Ok(NewUser {
                name,
                email,
                password,
                role: self.role,
                company_id: self.company_id,
            }),
            _ => Err(UserError::Validation(
                "Name, email, and password are required".into(),
            )),
        }
    }
}

/// Request body for PATCH /users/:id.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub company_id: Option<String>,
    pub password: Option<String>,
    pub new_password: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            role: r.role,
            company_id: r.company_id,
            password: r.password,
            new_password: r.new_password,
        }
    }
}

/// Public view of a user, returned by the read endpoints.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub company_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            company_id: u.company_id,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub company_id: String,
}

impl From<User> for CreatedUserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            company_id: u.company_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatedUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub company_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UpdatedUserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            company_id: u.company_id,
            updated_at: u.updated_at,
        }
    }
}
