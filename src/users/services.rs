use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    repo::UserRepository,
    repo_types::{NewUser, RepoError, User},
};
use crate::{
    auth::password::{hash_password_blocking, verify_password_blocking},
    error::{AppError, AppResult},
};

/// Business operations on users, as seen by the handlers.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, req: CreateUserRequest) -> AppResult<User>;
    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User>;
    async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> AppResult<User>;
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Check a login attempt. Unknown email and wrong password are both
    /// `Unauthorized`.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Conflict => AppError::AlreadyExists,
            RepoError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

/// User manager.
#[derive(Clone)]
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, req: CreateUserRequest) -> AppResult<User> {
        // Fast path only; the unique index decides races between creators.
        match self.repo.get_by_email(&req.email).await {
            Ok(_) => {
                warn!("create rejected: email already registered");
                return Err(AppError::AlreadyExists);
            }
            Err(RepoError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let hash = hash_password_blocking(req.password).await?;
        let new_user = NewUser {
            name: req.name,
            email: req.email,
        };
        let user = self.repo.create(new_user, &hash).await.map_err(|e| {
            if matches!(e, RepoError::Conflict) {
                warn!("create lost race on email uniqueness");
            }
            AppError::from(e)
        })?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User> {
        Ok(self.repo.get_by_id(id).await?)
    }

    async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> AppResult<User> {
        let mut user = self.repo.get_by_id(id).await?;

        if let Some(name) = req.name {
            user.name = name;
        }
        if let Some(email) = req.email {
            user.email = email;
        }

        let user = self.repo.update(id, &user).await?;
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.repo.get_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(user_id = %id, "user soft-deleted");
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.repo.list().await?)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let creds = match self.repo.get_by_email(email).await {
            Ok(creds) => creds,
            Err(RepoError::NotFound) => {
                warn!("login for unknown email");
                return Err(AppError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };

        let ok = verify_password_blocking(password.to_owned(), creds.password_hash).await?;
        if !ok || !creds.user.is_active {
            warn!(user_id = %creds.user.id, "login rejected");
            return Err(AppError::Unauthorized);
        }
        Ok(creds.user)
    }
}
