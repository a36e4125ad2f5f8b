//! Authentication collaborators: password hashing and sessions

pub mod password;
pub mod session;

pub use password::{BcryptHasher, PasswordHasher, PlaintextHasher};
pub use session::SessionStore;
