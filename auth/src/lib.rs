//! Authentication primitives library
//!
//! Provides the reusable, storage-free pieces of authentication:
//! - Password hashing (Argon2id)
//! - Purpose-typed token signing and verification
//! - Token issuance with per-kind payloads and lifetimes
//!
//! Services own their routes, session bookkeeping and user storage; this
//! crate only guarantees that credentials and tokens are handled the same
//! way everywhere.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Purpose-Typed Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::TokenCodec;
//! use auth::TokenIdentity;
//! use auth::TokenIssuer;
//!
//! let codec = Arc::new(TokenCodec::new(b"secret_key_at_least_32_bytes_long!"));
//! let issuer = TokenIssuer::new(Arc::clone(&codec));
//!
//! let identity = TokenIdentity {
//!     id: 7,
//!     user_name: "alice".into(),
//!     group_id: 1,
//! };
//! let token = issuer.access(identity.clone()).unwrap();
//!
//! let claims = codec.verify(&token.encoded).unwrap();
//! assert_eq!(claims.into_access().unwrap(), identity);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::SignedToken;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenIdentity;
pub use token::TokenIssuer;
pub use token::TokenKind;
pub use token::TokenPayload;
