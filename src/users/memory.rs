//! In-memory [`UserRepository`] for tests. Mirrors the live-email unique index.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo::UserRepository;
use super::repo_types::{NewUser, RepoError, RepoResult, User, UserCredentials};

#[derive(Default)]
pub struct MemoryUserRepository {
    // insertion order == creation order
    rows: RwLock<Vec<UserCredentials>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row, soft-deleted ones included.
    pub async fn all_rows(&self) -> Vec<User> {
        self.rows.read().await.iter().map(|r| r.user.clone()).collect()
    }
}

fn is_live(row: &UserCredentials) -> bool {
    row.user.deleted_at.is_none()
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser, password_hash: &str) -> RepoResult<User> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| is_live(r) && r.user.email == user.email) {
            return Err(RepoError::Conflict);
        }
        let now = OffsetDateTime::now_utc();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(UserCredentials {
            user: created.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<User> {
        self.rows
            .read()
            .await
            .iter()
            .find(|r| is_live(r) && r.user.id == id)
            .map(|r| r.user.clone())
            .ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<UserCredentials> {
        self.rows
            .read()
            .await
            .iter()
            .find(|r| is_live(r) && r.user.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: Uuid, user: &User) -> RepoResult<User> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|r| is_live(r) && r.user.id != id && r.user.email == user.email)
        {
            return Err(RepoError::Conflict);
        }
        let row = rows
            .iter_mut()
            .find(|r| is_live(r) && r.user.id == id)
            .ok_or(RepoError::NotFound)?;
        row.user.name = user.name.clone();
        row.user.email = user.email.clone();
        row.user.updated_at = OffsetDateTime::now_utc();
        Ok(row.user.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| is_live(r) && r.user.id == id)
            .ok_or(RepoError::NotFound)?;
        let now = OffsetDateTime::now_utc();
        row.user.deleted_at = Some(now);
        row.user.updated_at = now;
        Ok(())
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| is_live(r))
            .map(|r| r.user.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.into(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn soft_delete_hides_row_but_keeps_it() {
        let repo = MemoryUserRepository::new();
        let user = repo.create(new_user("Ana", "ana@x.com"), "h").await.unwrap();

        repo.delete(user.id).await.unwrap();

        assert!(matches!(repo.get_by_id(user.id).await, Err(RepoError::NotFound)));
        assert!(matches!(repo.get_by_email("ana@x.com").await, Err(RepoError::NotFound)));
        assert!(matches!(repo.delete(user.id).await, Err(RepoError::NotFound)));
        assert!(repo.list().await.unwrap().is_empty());

        let rows = repo.all_rows().await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].deleted_at.is_some());
    }

    #[tokio::test]
    async fn email_is_reusable_after_soft_delete() {
        let repo = MemoryUserRepository::new();
        let first = repo.create(new_user("Ana", "ana@x.com"), "h").await.unwrap();
        assert!(matches!(
            repo.create(new_user("Ana", "ana@x.com"), "h").await,
            Err(RepoError::Conflict)
        ));

        repo.delete(first.id).await.unwrap();
        let second = repo.create(new_user("Ana", "ana@x.com"), "h").await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = MemoryUserRepository::new();
        let a = repo.create(new_user("A", "a@x.com"), "h").await.unwrap();
        let b = repo.create(new_user("B", "b@x.com"), "h").await.unwrap();

        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }
}
