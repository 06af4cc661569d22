//! Domain entities for the database layer

pub mod user;

pub use user::{User, UserUpdate};
