// File I/O for record matching: CSV in, annotated CSV out.
// Everything between load and write is done by userlink-cluster.

pub mod classify;
pub mod csv;
pub mod error;
pub mod normalize;

pub use classify::classify_columns;
pub use csv::{default_output_path, load_table, load_table_from_str, write_annotated, Table};
pub use error::IoError;

/// Appended to the input file stem when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_with_user_ids";
