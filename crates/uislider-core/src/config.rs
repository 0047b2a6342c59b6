//! Slider configuration: range, step and initial value.
//!
//! Configuration arrives from three places: builder calls, host element
//! attributes (`min`, `max`, `step`, `value`) and TOML files. Attribute
//! parsing is lenient by default, since a bad attribute in a page should
//! degrade rather than break the widget.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lower bound.
pub const DEFAULT_MIN: f64 = 0.0;
/// Default upper bound.
pub const DEFAULT_MAX: f64 = 100.0;

/// Errors from strict configuration parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An attribute held something other than a finite number.
    #[error("attribute `{attribute}` is not a finite number: {value:?}")]
    InvalidNumber {
        /// Attribute name
        attribute: String,
        /// Raw attribute value
        value: String,
    },
    /// The TOML document could not be parsed.
    #[error("invalid slider configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Range and quantization of a slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
    /// Step increment; `None` means continuous
    pub step: Option<f64>,
    /// Initial value; `None` starts at `min`
    pub value: Option<f64>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            step: None,
            value: None,
        }
    }
}

impl SliderConfig {
    /// Create a continuous configuration over `[min, max]`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
            value: None,
        }
    }

    /// Set the step increment. Non-positive or non-finite steps mean
    /// continuous.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = normalize_step(step);
        self
    }

    /// Set the initial value.
    #[must_use]
    pub const fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// A slider with `max <= min` cannot move.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        !(self.max > self.min)
    }

    /// Width of the value range (zero when inert).
    #[must_use]
    pub fn span(&self) -> f64 {
        if self.is_inert() {
            0.0
        } else {
            self.max - self.min
        }
    }

    /// Clamp a value into range. Inert sliders pin everything to `min`;
    /// NaN maps to `min` as well.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if self.is_inert() || value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Value the slider starts with.
    #[must_use]
    pub fn initial_value(&self) -> f64 {
        self.clamp(self.value.unwrap_or(self.min))
    }

    /// Parse a TOML document with `min`, `max`, `step` and `value` keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed documents or wrongly
    /// typed keys.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(source)?;
        config.step = config.step.and_then(normalize_step);
        Ok(config)
    }

    /// Apply host element attributes strictly.
    ///
    /// Unknown attributes are ignored. An empty `step` means continuous.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] for the first attribute that
    /// does not hold a finite number.
    pub fn try_apply_attributes<'a, I>(mut self, attributes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, raw) in attributes {
            self.apply_attribute(name, raw)?;
        }
        Ok(self)
    }

    /// Apply host element attributes, skipping malformed ones.
    ///
    /// Each rejected attribute is logged and the previous setting is kept.
    #[must_use]
    pub fn apply_attributes<'a, I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, raw) in attributes {
            if let Err(err) = self.apply_attribute(name, raw) {
                tracing::warn!(%err, "ignoring slider attribute");
            }
        }
        self
    }

    fn apply_attribute(&mut self, name: &str, raw: &str) -> Result<(), ConfigError> {
        match name {
            "min" => self.min = parse_number(name, raw)?,
            "max" => self.max = parse_number(name, raw)?,
            "value" => self.value = Some(parse_number(name, raw)?),
            "step" if raw.trim().is_empty() => self.step = None,
            "step" => self.step = normalize_step(parse_number(name, raw)?),
            _ => {}
        }
        Ok(())
    }
}

fn parse_number(attribute: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidNumber {
            attribute: attribute.to_string(),
            value: raw.to_string(),
        })
}

fn normalize_step(step: f64) -> Option<f64> {
    (step.is_finite() && step > 0.0).then_some(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // Defaults and range
    // =========================================================================

    #[test]
    fn test_default_range_is_zero_to_hundred() {
        let config = SliderConfig::default();
        assert_eq!(config.min, 0.0);
        assert_eq!(config.max, 100.0);
        assert_eq!(config.step, None);
        assert_eq!(config.initial_value(), 0.0);
    }

    #[test]
    fn test_inert_when_max_not_above_min() {
        assert!(SliderConfig::new(0.0, 0.0).is_inert());
        assert!(SliderConfig::new(10.0, 0.0).is_inert());
        assert!(!SliderConfig::new(-50.0, 50.0).is_inert());
        assert!(SliderConfig::new(0.0, f64::NAN).is_inert());
    }

    #[test]
    fn test_inert_pins_to_min() {
        let config = SliderConfig::new(10.0, 0.0).with_value(5.0);
        assert_eq!(config.initial_value(), 10.0);
        assert_eq!(config.clamp(100.0), 10.0);
        assert_eq!(config.span(), 0.0);
    }

    #[test]
    fn test_clamp_and_nan() {
        let config = SliderConfig::new(-50.0, 50.0);
        assert_eq!(config.clamp(70.0), 50.0);
        assert_eq!(config.clamp(-70.0), -50.0);
        assert_eq!(config.clamp(f64::NAN), -50.0);
    }

    #[test]
    fn test_step_normalization() {
        assert_eq!(SliderConfig::default().with_step(25.0).step, Some(25.0));
        assert_eq!(SliderConfig::default().with_step(0.0).step, None);
        assert_eq!(SliderConfig::default().with_step(-3.0).step, None);
        assert_eq!(SliderConfig::default().with_step(f64::INFINITY).step, None);
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[test]
    fn test_apply_attributes() {
        let config = SliderConfig::default().apply_attributes([
            ("min", "-50"),
            ("max", " 50 "),
            ("step", "25"),
            ("class", "ui-slider"),
        ]);
        assert_eq!(config.min, -50.0);
        assert_eq!(config.max, 50.0);
        assert_eq!(config.step, Some(25.0));
    }

    #[test]
    fn test_lenient_attributes_keep_previous_setting() {
        let config = SliderConfig::default().apply_attributes([("max", "lots"), ("min", "5")]);
        assert_eq!(config.max, 100.0);
        assert_eq!(config.min, 5.0);
    }

    #[test]
    fn test_strict_attributes_report_offender() {
        let err = SliderConfig::default()
            .try_apply_attributes([("min", "0"), ("max", "NaN")])
            .unwrap_err();
        match err {
            ConfigError::InvalidNumber { attribute, value } => {
                assert_eq!(attribute, "max");
                assert_eq!(value, "NaN");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_step_attribute_is_continuous() {
        let config = SliderConfig::default()
            .with_step(10.0)
            .apply_attributes([("step", "")]);
        assert_eq!(config.step, None);
    }

    // =========================================================================
    // TOML
    // =========================================================================

    #[test]
    fn test_from_toml() {
        let config = SliderConfig::from_toml("min = -50.0\nmax = 50.0\nstep = 5.0\nvalue = 10.0\n")
            .unwrap();
        assert_eq!(config, SliderConfig::new(-50.0, 50.0).with_step(5.0).with_value(10.0));
    }

    #[test]
    fn test_from_toml_defaults_missing_keys() {
        let config = SliderConfig::from_toml("step = 0.0").unwrap();
        assert_eq!(config.min, 0.0);
        assert_eq!(config.max, 100.0);
        assert_eq!(config.step, None);
    }

    #[test]
    fn test_from_toml_rejects_wrong_types() {
        let err = SliderConfig::from_toml("min = \"zero\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().starts_with("invalid slider configuration"));
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_in_range(min in -1e6f64..1e6, span in 0.001f64..1e6, v in proptest::num::f64::ANY) {
            let config = SliderConfig::new(min, min + span);
            let clamped = config.clamp(v);
            prop_assert!(clamped >= config.min && clamped <= config.max);
        }
    }
}
