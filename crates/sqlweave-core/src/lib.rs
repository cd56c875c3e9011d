//! Core types for sqlweave.
//!
//! This crate provides the foundational pieces shared by the statement
//! builders and the rendering engine:
//!
//! - `Value` for dynamically typed bound parameters
//! - `SqlType` hints attached to columns and forwarded to placeholder strategies
//! - `Error` / `Result` for build- and render-time failures
//! - `StatementConfiguration` for per-statement rendering switches

pub mod config;
pub mod error;
pub mod types;
pub mod value;

pub use config::StatementConfiguration;
pub use error::{
    BuildError, BuildErrorKind, Clause, ConfigError, Error, RenderError, RenderErrorKind, Result,
};
pub use types::SqlType;
pub use value::Value;
