//! Output formatting for allocation records.
//!
//! - [`csv`] - CSV serialization, the `--output` destination
//! - [`terminal`] - colored human-readable summary, the default when no
//!   `--output` path is given

mod csv;
mod terminal;

pub use csv::{render_csv, write_csv};
pub use terminal::{format_field, print_summary};
