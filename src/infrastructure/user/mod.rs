//! Password hashing and the in-memory user repository

mod password;
mod repository;

pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::InMemoryUserRepository;
