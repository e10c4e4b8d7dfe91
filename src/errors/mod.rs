//! Domain-specific error types for styledit
//!
//! # Error Categories
//!
//! - **CqlError**: CQL lexing and parsing failures
//! - **StyleError**: Style model operations (rules, palettes, naming)
//! - **BackendError**: REST collaborator failures (transport, status, decoding)
//!
//! Editor-level validation problems are not errors: they surface as
//! [`crate::editor::ValidationFlags`]. A CQL parse failure is caught by the
//! filter bridge and turns into expert mode.
//!
//! # Examples
//!
//! ```rust
//! use styledit::errors::{CqlError, StyleError};
//!
//! let err = CqlError::UnexpectedEnd;
//! assert_eq!(err.to_string(), "Unexpected end of CQL expression");
//!
//! let err = StyleError::RuleNotFound("default-rule-1".to_string());
//! assert!(err.to_string().contains("default-rule-1"));
//! ```

pub mod backend;
pub mod cql;
pub mod style;

pub use backend::BackendError;
pub use cql::CqlError;
pub use style::StyleError;
