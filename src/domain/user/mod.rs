//! User aggregate (read-only here; role drives authorization)

pub mod model;
pub mod repository;

pub use model::{User, UserRole};
pub use repository::UserRepository;
