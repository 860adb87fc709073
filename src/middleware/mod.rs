pub mod auth;

pub use auth::{authenticate, authorize};
