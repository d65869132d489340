use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::ConfigError;

/// Hyperparameters of one training run, loadable from a JSON file.
///
/// Every field is optional in the file; missing fields fall back to
/// `RunConfig::default()` (the XOR setup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub shape: Vec<usize>,
    pub activation: Activation,
    pub learning_rate: f64,
    pub epochs: usize,
    pub seed: u64,
    pub shuffle: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig::xor()
    }
}

impl RunConfig {
    /// 2-6-4-1 sigmoid network, 100 000 passes over the XOR table.
    pub fn xor() -> Self {
        RunConfig {
            shape: vec![2, 6, 4, 1],
            activation: Activation::Sigmoid,
            learning_rate: 0.1,
            epochs: 100_000,
            seed: 0,
            shuffle: false,
        }
    }

    /// 784-30-10 sigmoid network, 10 passes over the digit images.
    pub fn digits() -> Self {
        RunConfig {
            shape: vec![784, 30, 10],
            epochs: 10,
            ..RunConfig::xor()
        }
    }

    /// Reads a JSON config.  Fields absent from the file keep the values of
    /// `base`.
    pub fn load_json(path: &Path, base: RunConfig) -> Result<RunConfig, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text, base).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json_str(text: &str, base: RunConfig) -> Result<RunConfig, serde_json::Error> {
        let mut merged = serde_json::to_value(base)?;
        let overrides: serde_json::Value = serde_json::from_str(text)?;
        if let (Some(target), serde_json::Value::Object(fields)) = (merged.as_object_mut(), overrides) {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        serde_json::from_value(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_base_values() {
        let config = RunConfig::from_json_str(
            r#"{ "epochs": 3, "activation": "tanh" }"#,
            RunConfig::digits(),
        ).unwrap();

        assert_eq!(config.epochs, 3);
        assert_eq!(config.activation, Activation::Tanh);
        assert_eq!(config.shape, vec![784, 30, 10]);
        assert_eq!(config.learning_rate, 0.1);
    }

    #[test]
    fn unknown_activation_is_a_parse_error() {
        let err = RunConfig::from_json_str(r#"{ "activation": "gelu" }"#, RunConfig::xor());
        assert!(err.is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RunConfig::load_json(Path::new("/nonexistent/graphnet.json"), RunConfig::xor())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("graphnet-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "shape": [2, 3, 1], "seed": 17 }"#).unwrap();

        let config = RunConfig::load_json(&path, RunConfig::xor()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.shape, vec![2, 3, 1]);
        assert_eq!(config.seed, 17);
        assert_eq!(config.epochs, 100_000);
    }
}
