//! `userlink-cluster`: groups records that share an email or phone number.
//!
//! Pure engine crate: receives pre-loaded, normalized records and a column
//! classification, returns one group id (or none) per record.
//! No CLI or IO dependencies.

pub mod config;
pub mod disjoint_set;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod summary;

pub use config::{ColumnOverrides, MatchMode, RunConfig};
pub use disjoint_set::DisjointSet;
pub use engine::{cluster, run};
pub use error::ClusterError;
pub use extract::{extract_match_values, FieldRoles};
pub use model::{Assignment, ClusterOutcome, Group, GroupId, Record, RecordKey, RunResult};
