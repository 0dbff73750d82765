//! Identity management and user authentication for CareDesk
//!
//! This crate owns everything about *who* is making a request:
//! - Account registration with password confirmation and unique usernames
//! - Argon2 password hashing and verification
//! - Opaque session tokens with a normal and a "remember me" lifetime
//! - The two-valued [`Role`] that route gates compare against
//!
//! Storage is abstracted behind [`UserRepository`] and [`SessionRepository`];
//! `database-layer` provides the SQLite implementations and this crate ships
//! in-memory ones for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_identity::{IdentityConfig, IdentityService, SignupRequest};
//! use auth_identity::repository::{InMemorySessionRepository, InMemoryUserRepository};
//! use std::sync::Arc;
//!
//! # async fn run() -> auth_identity::Result<()> {
//! let service = IdentityService::new(
//!     Arc::new(InMemoryUserRepository::new()),
//!     Arc::new(InMemorySessionRepository::new()),
//!     IdentityConfig::default(),
//! );
//!
//! service.register_user(SignupRequest {
//!     username: "dr_grey".into(),
//!     password: "scalpel".into(),
//!     confirm_password: "scalpel".into(),
//!     role: "doctor".into(),
//! }).await?;
//!
//! let user = service.authenticate("dr_grey", "scalpel").await?;
//! let session = service.create_session(user.id, false).await?;
//! assert_eq!(service.validate_token(&session.token).await?.id, user.id);
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod repository;
pub mod service;
pub mod config;
pub mod error;

pub use models::*;
pub use repository::{SessionRepository, UserRepository};
pub use service::*;
pub use config::*;
pub use error::*;
