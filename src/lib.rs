//! # Rust NN Classifier
//!
//! A from-scratch three-layer feedforward neural network classifier:
//! explicit bias units, ReLU hidden activations, softmax outputs with
//! cross-entropy loss, and per-example stochastic gradient descent via
//! hand-rolled backpropagation.
//!
//! ## Modules
//!
//! - `nn` - the unit graph, network construction, inference and training
//! - `data` - labeled examples, CSV ingestion, weight-table files
//! - `config` - application configuration
//! - `metrics` - accuracy, confusion matrices and evaluation reports

pub mod config;
pub mod data;
pub mod metrics;
pub mod nn;

pub use config::AppConfig;
pub use data::{Dataset, Example};
pub use metrics::EvaluationReport;
pub use nn::{Network, Unit, UnitRole};
