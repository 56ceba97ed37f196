#![forbid(unsafe_code)]
//! relalg-operators: tables and the relational algebra over them.
//!
//! Design intent:
//! - Pure and synchronous. Every operator reads one or two tables and returns
//!   a fresh table; only `Table::insert` mutates.
//! - Each operator exposes a planning surface (`OpPlan`) describing the
//!   derived schema, so callers can inspect a result shape before evaluating.

pub mod display;
pub mod index;
pub mod plan;
pub mod table;
pub mod traits;

pub mod filter;
pub mod minus;
pub mod project;
pub mod union;

pub mod join;

pub use index::{build_index, KeyIndex};
pub use join::{Join, JoinStrategy, NaturalJoin};
pub use plan::OpPlan;
pub use table::Table;
pub use traits::{OpError, Operator};
