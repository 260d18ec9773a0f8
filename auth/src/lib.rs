//! Credential primitives for the back-office service
//!
//! Provides reusable authentication infrastructure:
//! - Password hashing (Argon2id) with constant-time verification
//! - Signed, expiring bearer tokens (HS256)
//!
//! The service defines its own domain traits and adapts these implementations,
//! keeping domain logic out of the credential layer.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenService;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let token = tokens.issue("principal123").unwrap();
//! let subject = tokens.verify(&token).unwrap();
//! assert_eq!(subject, "principal123");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenService;
