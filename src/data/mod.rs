//! Data Module
//!
//! Provides the inputs the trainer consumes:
//! - Labeled examples and datasets, with CSV loading
//! - Initial-weight table files

mod dataset;
mod weights_file;

pub use dataset::{one_hot, Dataset, Example};
pub use weights_file::load_weight_table;
