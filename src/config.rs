//! Application configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data loading configuration
    pub data: DataConfig,
    /// Training configuration
    pub training: TrainingConfig,
}

/// Data loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Whether CSV files carry a header row
    pub has_header: bool,
    /// Number of classes; inferred from the labels when absent
    pub num_classes: Option<usize>,
    /// Share of examples used for training, rest held out for evaluation
    pub train_fraction: f64,
}

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of hidden units (excluding the bias unit)
    pub hidden_units: usize,
    /// Fixed SGD learning rate
    pub learning_rate: f64,
    /// Number of training epochs
    pub max_epochs: usize,
    /// Seed for weight initialization and epoch shuffling
    pub seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                has_header: false,
                num_classes: None,
                train_fraction: 0.8,
            },
            training: TrainingConfig {
                hidden_units: 5,
                learning_rate: 0.01,
                max_epochs: 100,
                seed: 42,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.training.hidden_units, 5);
        assert_eq!(config.data.num_classes, None);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.training.max_epochs, loaded.training.max_epochs);
        assert_eq!(config.data.train_fraction, loaded.data.train_fraction);
    }
}
