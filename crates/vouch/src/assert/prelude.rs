//! Glob-import this module to use the assertions unqualified:
//! `use <path>::prelude::*;`.

pub use crate::assert::{Abort, Continue, TestingT};
pub use crate::{as_err, equal, is_err, no_err};
