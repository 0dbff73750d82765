//! Common error handling utilities for CareDesk
//!
//! Library crates in the workspace keep their own error enums close to the code
//! that raises them (`IdentityError`, `DatabaseError`, `ApiError`). This crate
//! holds the process-level error that the server binary returns from `main`,
//! where failures are fatal: bad configuration, a store that cannot be opened,
//! a port that cannot be bound.
//!
//! # Example
//!
//! ```rust
//! use error_common::{CareDeskError, Result};
//!
//! fn parse_port(raw: &str) -> Result<u16> {
//!     raw.parse()
//!         .map_err(|e| CareDeskError::ConfigError(format!("invalid port {raw:?}: {e}")))
//! }
//!
//! assert!(parse_port("5000").is_ok());
//! assert!(parse_port("http").is_err());
//! ```

pub mod types;

pub use types::*;
