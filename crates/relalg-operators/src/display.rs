//! Text rendering of tables and their key index.

use std::fmt::{self, Write as _};

use crate::table::Table;

/// Width of one rendered column.
const COL_WIDTH: usize = 15;

fn rule(f: &mut impl fmt::Write, cols: usize) -> fmt::Result {
    f.write_str("|-")?;
    for _ in 0..cols {
        f.write_str(&"-".repeat(COL_WIDTH))?;
    }
    f.write_str("-|\n")
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.schema().arity();
        writeln!(f, "\n Table {}", self.name())?;
        rule(f, cols)?;
        f.write_str("| ")?;
        for name in self.schema().names() {
            write!(f, "{name:>COL_WIDTH$}")?;
        }
        f.write_str(" |\n")?;
        rule(f, cols)?;
        for t in self.tuples() {
            f.write_str("| ")?;
            for v in t.iter() {
                write!(f, "{:>COL_WIDTH$}", v.to_string())?;
            }
            f.write_str(" |\n")?;
        }
        rule(f, cols)
    }
}

impl Table {
    /// Index contents as `key -> tuple` lines in ascending key order.
    pub fn render_index(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n Index for {} ({})", self.name(), self.index_kind());
        out.push_str("-------------------\n");
        for (key, tuple) in self.index().iter_sorted() {
            let _ = writeln!(out, "{key} -> {tuple}");
        }
        out.push_str("-------------------\n");
        out
    }
}
