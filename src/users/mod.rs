use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
pub mod repo;
mod repo_types;
pub mod services;

pub use repo::PgUserRepository;
pub use repo_types::User;
pub use services::{UserManager, UserService};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
