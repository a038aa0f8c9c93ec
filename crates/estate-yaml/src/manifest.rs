//! Slider manifests.
//!
//! A manifest describes one range slider: its domain, initial selection,
//! geometry, styling and timing.
//!
//! ```yaml
//! min: 0
//! max: 50000000
//! step: 100000
//! low: 2500000
//! high: 15000000
//! show_markers: true
//! track_colors: ["#4f46e5", "#06b6d4"]
//! format:
//!   style: lakh
//!   prefix: "₹"
//! ```

use crate::error::ParseError;
use estate_core::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Label format as written in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum FormatSpec {
    /// Plain numbers
    #[default]
    Plain,
    /// Fixed decimals
    Fixed {
        /// Digits after the point
        decimals: usize,
    },
    /// K/M/B abbreviations
    Compact {
        /// Currency prefix
        #[serde(default)]
        prefix: String,
    },
    /// K/L/Cr abbreviations
    Lakh {
        /// Currency prefix
        #[serde(default)]
        prefix: String,
    },
}

/// A range slider loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SliderManifest {
    /// Domain minimum
    pub min: f64,
    /// Domain maximum
    pub max: f64,
    /// Quantization step
    #[serde(default = "default_step")]
    pub step: f64,
    /// Initial low value
    pub low: f64,
    /// Initial high value
    pub high: f64,
    /// Widget width in pixels
    #[serde(default = "default_width")]
    pub width: f32,
    /// Thumb radius in pixels
    #[serde(default = "default_thumb_radius")]
    pub thumb_radius: f32,
    /// Draw tick markers
    #[serde(default)]
    pub show_markers: bool,
    /// Hex colors for the active range
    #[serde(default)]
    pub track_colors: Vec<String>,
    /// Label format
    #[serde(default)]
    pub format: FormatSpec,
    /// Streaming notification delay
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Release notification delay
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u32,
    /// Test ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    /// Accessible name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

const fn default_step() -> f64 {
    1.0
}

const fn default_width() -> f32 {
    320.0
}

const fn default_thumb_radius() -> f32 {
    12.0
}

const fn default_debounce_ms() -> u32 {
    50
}

const fn default_settle_ms() -> u32 {
    10
}

impl SliderManifest {
    /// Parse and validate a manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the manifest fails
    /// [`validate`](Self::validate).
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        debug!(
            min = manifest.min,
            max = manifest.max,
            step = manifest.step,
            "slider manifest loaded"
        );
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    /// Serialize manifest to YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ParseError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check domain, values, geometry and colors.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ParseError> {
        for (field, value) in [
            ("min", self.min),
            ("max", self.max),
            ("step", self.step),
            ("low", self.low),
            ("high", self.high),
        ] {
            if !value.is_finite() {
                return Err(ParseError::invalid(field, "must be a finite number"));
            }
        }
        if self.min > self.max {
            return Err(ParseError::Validation(format!(
                "min ({}) is greater than max ({})",
                self.min, self.max
            )));
        }
        if self.step <= 0.0 {
            return Err(ParseError::invalid("step", "must be positive"));
        }
        for (field, value) in [("low", self.low), ("high", self.high)] {
            if value < self.min || value > self.max {
                return Err(ParseError::invalid(
                    field,
                    format!("{value} lies outside [{}, {}]", self.min, self.max),
                ));
            }
        }
        if self.low > self.high {
            return Err(ParseError::Validation(format!(
                "low ({}) is greater than high ({})",
                self.low, self.high
            )));
        }
        if self.thumb_radius.is_nan() || self.thumb_radius < 0.0 {
            return Err(ParseError::invalid("thumb_radius", "must not be negative"));
        }
        if self.width.is_nan() || self.width <= 2.0 * self.thumb_radius {
            return Err(ParseError::invalid(
                "width",
                "must be wider than both thumb halves",
            ));
        }
        self.colors()?;
        Ok(())
    }

    /// Parsed track colors.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Color`] for the first invalid entry.
    pub fn colors(&self) -> Result<Vec<Color>, ParseError> {
        self.track_colors
            .iter()
            .map(|hex| {
                Color::from_hex(hex).map_err(|source| ParseError::Color {
                    value: hex.clone(),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE_YAML: &str = r##"
min: 0
max: 50000000
step: 100000
low: 2500000
high: 15000000
show_markers: true
track_colors: ["#4f46e5", "#06b6d4"]
format:
  style: lakh
  prefix: "₹"
test_id: price
"##;

    // =========================================================================
    // Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_full_manifest() {
        let m = SliderManifest::from_yaml(PRICE_YAML).unwrap();
        assert!((m.step - 100_000.0).abs() < f64::EPSILON);
        assert!(m.show_markers);
        assert_eq!(
            m.format,
            FormatSpec::Lakh {
                prefix: "₹".into()
            }
        );
        assert_eq!(m.test_id.as_deref(), Some("price"));
        assert_eq!(m.colors().unwrap().len(), 2);
    }

    #[test]
    fn test_defaults() {
        let m = SliderManifest::from_yaml("min: 0\nmax: 10\nlow: 2\nhigh: 8\n").unwrap();
        assert!((m.step - 1.0).abs() < f64::EPSILON);
        assert!((m.width - 320.0).abs() < f32::EPSILON);
        assert!((m.thumb_radius - 12.0).abs() < f32::EPSILON);
        assert_eq!(m.debounce_ms, 50);
        assert_eq!(m.settle_ms, 10);
        assert_eq!(m.format, FormatSpec::Plain);
        assert!(m.track_colors.is_empty());
        assert!(m.label.is_none());
    }

    #[test]
    fn test_fixed_format() {
        let yaml = "min: 0\nmax: 10\nlow: 2\nhigh: 8\nformat:\n  style: fixed\n  decimals: 2\n";
        let m = SliderManifest::from_yaml(yaml).unwrap();
        assert_eq!(m.format, FormatSpec::Fixed { decimals: 2 });
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = SliderManifest::from_yaml("min: 0\nmax: 10\nlow: 2\nhigh: 8\nstpe: 2\n");
        assert!(matches!(result, Err(ParseError::Yaml(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let m = SliderManifest::from_yaml(PRICE_YAML).unwrap();
        let again = SliderManifest::from_yaml(&m.to_yaml().unwrap()).unwrap();
        assert_eq!(m, again);
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    fn base() -> SliderManifest {
        SliderManifest::from_yaml("min: 0\nmax: 100\nlow: 20\nhigh: 80\n").unwrap()
    }

    #[test]
    fn test_inverted_domain() {
        let m = SliderManifest { min: 100.0, max: 0.0, ..base() };
        assert!(matches!(m.validate(), Err(ParseError::Validation(_))));
    }

    #[test]
    fn test_bad_step() {
        let m = SliderManifest { step: 0.0, ..base() };
        match m.validate() {
            Err(ParseError::InvalidValue { field, .. }) => assert_eq!(field, "step"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_values_outside_domain() {
        let m = SliderManifest { high: 120.0, ..base() };
        match m.validate() {
            Err(ParseError::InvalidValue { field, .. }) => assert_eq!(field, "high"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_crossed_values() {
        let m = SliderManifest { low: 90.0, high: 10.0, ..base() };
        assert!(matches!(m.validate(), Err(ParseError::Validation(_))));
    }

    #[test]
    fn test_non_finite() {
        let m = SliderManifest { low: f64::NAN, ..base() };
        assert!(matches!(m.validate(), Err(ParseError::InvalidValue { .. })));
    }

    #[test]
    fn test_narrow_width() {
        let m = SliderManifest { width: 20.0, ..base() };
        match m.validate() {
            Err(ParseError::InvalidValue { field, .. }) => assert_eq!(field, "width"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_color() {
        let m = SliderManifest {
            track_colors: vec!["#ff0000".into(), "teal".into()],
            ..base()
        };
        match m.validate() {
            Err(ParseError::Color { value, .. }) => assert_eq!(value, "teal"),
            other => panic!("Expected Color, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_domain_allowed() {
        let m = SliderManifest { min: 0.0, max: 0.0, low: 0.0, high: 0.0, ..base() };
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = SliderManifest::load("/nonexistent/estate/slider.yaml");
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
