//! vouch: small generic assertions for test suites.
//!
//! # Main Entry Points
//!
//! - [`assert`] - The assertions, the severity markers and the [`TestingT`] handle
//! - [`context`] - [`T`], a ready-made test context for `#[test]` functions
//! - [`prelude`] - Markers and macros for glob import
//!
//! The assertion sources are also exported as text ([`MAIN_FILE`],
//! [`PRELUDE_FILE`]) so `vouch-installer` can vendor them into another crate.

pub mod assert;
pub mod context;

pub use assert::prelude;
pub use assert::{
    Abort, Chain, Continue, ErrorValue, Param, Severity, TestingT, chain, error_as, error_is,
};
pub use context::{Failure, T};

/// Source of the [`assert`] module.
pub const MAIN_FILE: &str = include_str!("assert.rs");

/// Source of the [`prelude`] module.
pub const PRELUDE_FILE: &str = include_str!("assert/prelude.rs");

/// Module path the vendored sources use to refer to themselves. The installer
/// rewrites it to the path of the module they are copied into.
pub const VENDOR_PATH: &str = "crate::assert";
