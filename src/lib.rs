#![forbid(unsafe_code)]
//! relalg: in-memory relational algebra over typed tables.
//!
//! ```
//! use relalg::prelude::*;
//!
//! let mut movie = Table::parse("movie", "title year", "String Integer", "title year")?;
//! movie.insert(relalg::tuple!["Star_Wars", 1977])?;
//! let titles = movie.project("title")?;
//! assert_eq!(titles.tuple_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use relalg_core as core;
pub use relalg_io as io;
pub use relalg_operators as operators;

pub use relalg_core::tuple;

pub mod prelude {
    pub use relalg_core::prelude::*;
    pub use relalg_io::{MemoryStorage, Storage, TableStore};
    pub use relalg_operators::{JoinStrategy, OpError, Operator, Table};
}
