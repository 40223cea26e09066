//! Computes the total storage size of a BigQuery dataset.
//!
//! The pipeline is linear: list every table in the dataset (following
//! continuation tokens page by page), fetch each table's metadata
//! concurrently, parse the reported byte counts, and sum into a megabyte
//! total. [`display`] layers human-readable MB/GB/TB formatting on top.

pub mod display;
mod error;
mod size;
mod tables;

pub use error::Error;
pub use size::{MissingSize, SizeOptions, dataset_size_mb, total_megabytes};
pub use tables::DatasetTables;

pub type Result<T> = std::result::Result<T, Error>;
