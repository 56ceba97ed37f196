#![forbid(unsafe_code)]
//! relalg-core: the data model shared by every other crate.
//!
//! Pure data and validation only. Operators live in `relalg-operators`,
//! snapshot persistence in `relalg-io`.

pub mod config;
pub mod error;
pub mod matcher;
pub mod prelude;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
