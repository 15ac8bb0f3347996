//! Session aggregate

pub mod model;
pub mod repository;

pub use model::{NewSession, Session, SessionRecord};
pub use repository::SessionRepository;
