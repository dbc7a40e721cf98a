//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including the user entity, its public projection, field validation,
//! and the repository contract.

mod entity;
mod repository;
mod validation;

pub use entity::{PublicUser, Role, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, validate_email, validate_name, validate_password, UserValidationError,
};
