//! Defaults read from the environment (and a `.env` file, if present).
//!
//! | variable                          | default       |
//! |-----------------------------------|---------------|
//! | `IMAGE_PROCESSOR_GRAY_WEIGHTS`    | `0.5,0.3,0.2` |
//! | `IMAGE_PROCESSOR_COMPRESS_FACTOR` | `2`           |
//! | `IMAGE_PROCESSOR_BATCH_DIR`       | `images`      |

use std::path::PathBuf;

use crate::error::{ImageProcessorError, Result};
use crate::transforms::GrayscaleWeights;

pub const GRAY_WEIGHTS_VAR: &str = "IMAGE_PROCESSOR_GRAY_WEIGHTS";
pub const COMPRESS_FACTOR_VAR: &str = "IMAGE_PROCESSOR_COMPRESS_FACTOR";
pub const BATCH_DIR_VAR: &str = "IMAGE_PROCESSOR_BATCH_DIR";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub gray_weights: GrayscaleWeights,
    pub compress_factor: u32,
    pub batch_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gray_weights: GrayscaleWeights::default(),
            compress_factor: 2,
            batch_dir: PathBuf::from("images"),
        }
    }
}

impl Config {
    /// Load `.env` (ignored when missing) and read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(GRAY_WEIGHTS_VAR) {
            config.gray_weights = raw.parse().map_err(|_| {
                ImageProcessorError::invalid(format!(
                    "{GRAY_WEIGHTS_VAR}: expected \"r,g,b\", got '{raw}'"
                ))
            })?;
        }
        if let Some(raw) = lookup(COMPRESS_FACTOR_VAR) {
            config.compress_factor = raw
                .trim()
                .parse()
                .ok()
                .filter(|&f: &u32| f >= 1)
                .ok_or_else(|| {
                    ImageProcessorError::invalid(format!(
                        "{COMPRESS_FACTOR_VAR}: expected a positive integer, got '{raw}'"
                    ))
                })?;
        }
        if let Some(raw) = lookup(BATCH_DIR_VAR) {
            config.batch_dir = PathBuf::from(raw);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (GRAY_WEIGHTS_VAR, "0.2,0.7,0.1"),
            (COMPRESS_FACTOR_VAR, " 4 "),
            (BATCH_DIR_VAR, "/tmp/pics"),
        ]))
        .unwrap();
        assert_eq!(config.gray_weights, GrayscaleWeights::new(0.2, 0.7, 0.1));
        assert_eq!(config.compress_factor, 4);
        assert_eq!(config.batch_dir, PathBuf::from("/tmp/pics"));
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = Config::from_lookup(lookup_from(&[(COMPRESS_FACTOR_VAR, "0")])).unwrap_err();
        assert!(err.to_string().contains(COMPRESS_FACTOR_VAR));

        let err = Config::from_lookup(lookup_from(&[(GRAY_WEIGHTS_VAR, "1,2")])).unwrap_err();
        assert!(err.to_string().contains(GRAY_WEIGHTS_VAR));
    }
}
