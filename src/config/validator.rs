use serde_json::{Map, Value};

use crate::config::interval::Interval;
use crate::errors::ConfigError;

/// A bounds or choice check targets either one config key or several keys
/// sharing the same constraint.
#[derive(Debug, Clone, Copy)]
pub enum ConfigKey<'a> {
    Single(&'a str),
    Many(&'a [&'a str]),
}

impl<'a> From<&'a str> for ConfigKey<'a> {
    fn from(key: &'a str) -> Self {
        ConfigKey::Single(key)
    }
}

impl<'a> From<&'a [&'a str]> for ConfigKey<'a> {
    fn from(keys: &'a [&'a str]) -> Self {
        ConfigKey::Many(keys)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for ConfigKey<'a> {
    fn from(keys: &'a [&'a str; N]) -> Self {
        ConfigKey::Many(keys)
    }
}

/// Validates node configuration values, typically thresholds, against
/// declarative bounds and choice sets. Owns nothing; borrows the node's
/// config mapping for the duration of the checks.
pub struct ConfigValidator<'a> {
    config: &'a Map<String, Value>,
}

impl<'a> ConfigValidator<'a> {
    #[must_use]
    pub fn new(config: &'a Map<String, Value>) -> Self {
        Self { config }
    }

    /// Checks that the value(s) named by `key` fall inside `interval`.
    ///
    /// `interval` uses bracket notation, e.g. `"[0.0, 1.0)"`; `[`/`]` make an
    /// endpoint inclusive, `(`/`)` exclusive, and `-inf`/`+inf` leave it
    /// unbounded. List values are checked element-wise.
    pub fn check_bounds<'k>(
        &self,
        key: impl Into<ConfigKey<'k>>,
        interval: &str,
    ) -> Result<(), ConfigError> {
        let interval: Interval = interval.parse()?;
        match key.into() {
            ConfigKey::Single(key) => self.check_key_bounds(key, &interval),
            ConfigKey::Many(keys) => {
                for key in keys {
                    self.check_key_bounds(key, &interval)?;
                }
                Ok(())
            }
        }
    }

    /// Checks that the value named by `key` is one of `choices`. Only a
    /// single key makes sense here; passing several is a key-type error.
    pub fn check_valid_choice<'k>(
        &self,
        key: impl Into<ConfigKey<'k>>,
        choices: &[Value],
    ) -> Result<(), ConfigError> {
        let ConfigKey::Single(key) = key.into() else {
            return Err(ConfigError::WrongKeyType);
        };
        let value = self
            .config
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        if !choices.contains(value) {
            return Err(ConfigError::InvalidChoice {
                key: key.to_string(),
                choices: choices.iter().map(Value::to_string).collect(),
            });
        }
        Ok(())
    }

    fn check_key_bounds(&self, key: &str, interval: &Interval) -> Result<(), ConfigError> {
        let value = self
            .config
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        match value {
            Value::Array(items) => {
                for item in items {
                    let number = as_number(key, item)?;
                    if !interval.contains(number) {
                        return Err(ConfigError::ElementsOutOfBounds {
                            key: key.to_string(),
                            expected: format!("between {interval}"),
                        });
                    }
                }
                Ok(())
            }
            scalar => {
                let number = as_number(key, scalar)?;
                if !interval.contains(number) {
                    return Err(ConfigError::OutOfBounds {
                        key: key.to_string(),
                        expected: format!("between {interval}"),
                    });
                }
                Ok(())
            }
        }
    }
}

fn as_number(key: &str, value: &Value) -> Result<f64, ConfigError> {
    value
        .as_f64()
        .ok_or_else(|| ConfigError::NotNumeric(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> Map<String, Value> {
        let Value::Object(map) = json!({
            "score_threshold": 0.5,
            "iou_threshold": 0.45,
            "scale_factors": [0.25, 0.5, 1.0],
            "model_format": "tensorflow",
            "max_detections": 100,
            "label": "person",
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn scalar_inside_bounds_passes() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        assert!(validator.check_bounds("score_threshold", "[0.0, 1.0]").is_ok());
        assert!(validator.check_bounds("max_detections", "(0, +inf)").is_ok());
    }

    #[test]
    fn scalar_outside_bounds_names_key_and_interval() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        let err = validator
            .check_bounds("score_threshold", "(0.5, 1.0]")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "score_threshold must be between (0.5, 1]"
        );
    }

    #[test]
    fn list_values_are_checked_element_wise() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        assert!(validator.check_bounds("scale_factors", "[0.0, 1.0]").is_ok());
        let err = validator
            .check_bounds("scale_factors", "[0.0, 1.0)")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ElementsOutOfBounds { .. }));
    }

    #[test]
    fn many_keys_share_one_bound() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        assert!(validator
            .check_bounds(&["score_threshold", "iou_threshold"], "[0, 1]")
            .is_ok());
        let err = validator
            .check_bounds(&["score_threshold", "iou_threshold"], "[0.5, 1]")
            .unwrap_err();
        assert_eq!(err.to_string(), "iou_threshold must be between [0.5, 1]");
    }

    #[test]
    fn malformed_interval_fails_before_lookup() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        let err = validator
            .check_bounds("no_such_key", "0.0,1.0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::BadIntervalFormat(_)));
    }

    #[test]
    fn inverted_bounds_fail_regardless_of_value() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        let err = validator
            .check_bounds("score_threshold", "[5, 1]")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBounds { .. }));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        let err = validator.check_bounds("label", "[0, 1]").unwrap_err();
        assert!(matches!(err, ConfigError::NotNumeric(_)));
    }

    #[test]
    fn choice_membership() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        let choices = [json!("tensorflow"), json!("onnx")];
        assert!(validator.check_valid_choice("model_format", &choices).is_ok());

        let choices = [json!("onnx")];
        let err = validator
            .check_valid_choice("model_format", &choices)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChoice { .. }));
    }

    #[test]
    fn choice_check_rejects_multiple_keys() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        let err = validator
            .check_valid_choice(&["model_format", "label"], &[json!("tensorflow")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::WrongKeyType));
    }

    #[test]
    fn missing_key_is_reported() {
        let config = config();
        let validator = ConfigValidator::new(&config);
        let err = validator.check_bounds("absent", "[0, 1]").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(_)));
    }
}
