use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    /// Trim name and email, then reject blank or malformed fields.
    /// Email case is preserved.
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_owned();
        self.email = self.email.trim().to_owned();

        if self.name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::BadRequest("invalid email".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::BadRequest("password must not be empty".into()));
        }
        Ok(self)
    }
}

/// Request body for `PUT /users/{id}`. Absent (or null) fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn normalize(self) -> Result<Self, AppError> {
        let name = self.name.map(|n| n.trim().to_owned());
        let email = self.email.map(|e| e.trim().to_owned());

        if matches!(&name, Some(n) if n.is_empty()) {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        if matches!(&email, Some(e) if !is_valid_email(e)) {
            return Err(AppError::BadRequest("invalid email".into()));
        }
        Ok(Self { name, email })
    }
}
