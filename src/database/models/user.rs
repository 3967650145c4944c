use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::sql::{FieldMap, SparseFields};
use crate::validation::{within_len, FieldErrors, Validate};

pub const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

pub static USER_FIELDS: FieldMap = FieldMap::new(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

/// User row including the password hash; never serialized
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub password: String,
}

impl From<UserCredentials> for User {
    fn from(row: UserCredentials) -> Self {
        Self {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            is_admin: row.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    /// Ids of the jobs this user applied to
    pub jobs: Vec<i32>,
}

fn is_email(s: &str) -> bool {
    within_len(s, 6, 60) && s.find('@').map_or(false, |at| at > 0 && at < s.len() - 1)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserNew {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Validate for UserNew {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check(within_len(&self.username, 1, 25), "username", "must be 1-25 characters")
            .check(within_len(&self.password, 5, 20), "password", "must be 5-20 characters")
            .check(within_len(&self.first_name, 1, 30), "firstName", "must be 1-30 characters")
            .check(within_len(&self.last_name, 1, 30), "lastName", "must be 1-30 characters")
            .check(is_email(&self.email), "email", "must be a valid email");
        errors.into_result()
    }
}

/// Fields a user (or an admin) may change; the username is fixed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn into_fields(self) -> SparseFields {
        let mut fields = SparseFields::new();
        if let Some(v) = self.first_name {
            fields.set("firstName", v);
        }
        if let Some(v) = self.last_name {
            fields.set("lastName", v);
        }
        if let Some(v) = self.password {
            fields.set("password", v);
        }
        if let Some(v) = self.email {
            fields.set("email", v);
        }
        if let Some(v) = self.is_admin {
            fields.set("isAdmin", v);
        }
        fields
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check(self.password.as_deref().map_or(true, |p| within_len(p, 5, 20)), "password", "must be 5-20 characters")
            .check(self.first_name.as_deref().map_or(true, |n| within_len(n, 1, 30)), "firstName", "must be 1-30 characters")
            .check(self.last_name.as_deref().map_or(true, |n| within_len(n, 1, 30)), "lastName", "must be 1-30 characters")
            .check(self.email.as_deref().map_or(true, is_email), "email", "must be a valid email");
        errors.into_result()
    }
}
