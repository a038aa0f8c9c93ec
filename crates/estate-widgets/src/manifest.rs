//! Building widgets from YAML manifests.

use crate::format::ValueFormat;
use crate::range_slider::{DomainRange, RangeError, RangeSlider};
use estate_yaml::{FormatSpec, ParseError, SliderManifest};
use thiserror::Error;

/// Why a manifest could not become a widget.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The manifest itself is invalid
    #[error(transparent)]
    Manifest(#[from] ParseError),
    /// The values do not form a valid range
    #[error("invalid range: {0}")]
    Range(#[from] RangeError),
}

impl From<&FormatSpec> for ValueFormat {
    fn from(spec: &FormatSpec) -> Self {
        match spec {
            FormatSpec::Plain => Self::Plain,
            FormatSpec::Fixed { decimals } => Self::Fixed(*decimals),
            FormatSpec::Compact { prefix } => Self::compact(prefix.as_str()),
            FormatSpec::Lakh { prefix } => Self::lakh(prefix.as_str()),
        }
    }
}

impl RangeSlider {
    /// Build a slider from a manifest. The track width is derived from the
    /// manifest width so the slider is usable before the first layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest fails validation or its values do
    /// not form a valid range.
    pub fn from_manifest(manifest: &SliderManifest) -> Result<Self, BuildError> {
        manifest.validate()?;
        let range = DomainRange::new(manifest.min, manifest.max, manifest.step)?;
        let mut slider = Self::new(range, manifest.low, manifest.high)?
            .thumb_radius(manifest.thumb_radius)
            .track_width(2.0f32.mul_add(-manifest.thumb_radius, manifest.width))
            .show_markers(manifest.show_markers)
            .track_colors(manifest.colors()?)
            .value_format(ValueFormat::from(&manifest.format))
            .debounce_ms(manifest.debounce_ms)
            .settle_ms(manifest.settle_ms);
        if let Some(id) = &manifest.test_id {
            slider = slider.with_test_id(id.as_str());
        }
        if let Some(label) = &manifest.label {
            slider = slider.with_accessible_name(label.as_str());
        }
        Ok(slider)
    }
}
