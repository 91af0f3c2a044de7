use serde::{Deserialize, Serialize};

use crate::users::User;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Greeting built from the verified claims only.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
}
