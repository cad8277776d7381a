//! Authentication logic: password hashing and password policy.

pub mod password;

pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
