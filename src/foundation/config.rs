use crate::foundation::{
    error::{RevealError, RevealResult},
    math::DEFAULT_EPSILON,
};

/// Runtime configuration shared by every managed element.
///
/// All fields have defaults, so an empty JSON object deserializes to
/// [`RevealConfig::default`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealConfig {
    /// Pixel tolerance absorbing subpixel scroll/layout noise.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Class that marks elements for discovery.
    #[serde(default = "default_class_name")]
    pub class_name: String,
    /// Attribute carrying the current mode tag on managed elements.
    #[serde(default = "default_attr_name")]
    pub attr_name: String,
    /// Put elements back into plain flow (and drop the tag) when they are unmounted.
    #[serde(default)]
    pub restore_flow_on_unmount: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            class_name: default_class_name(),
            attr_name: default_attr_name(),
            restore_flow_on_unmount: false,
        }
    }
}

impl RevealConfig {
    /// Check field ranges.
    pub fn validate(&self) -> RevealResult<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(RevealError::validation(
                "epsilon must be finite and greater than zero",
            ));
        }
        if self.class_name.trim().is_empty() {
            return Err(RevealError::validation("class_name must be non-empty"));
        }
        if self.attr_name.trim().is_empty() {
            return Err(RevealError::validation("attr_name must be non-empty"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration object.
    pub fn from_json_str(s: &str) -> RevealResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_class_name() -> String {
    "sticky-reveal".to_string()
}

fn default_attr_name() -> String {
    "data-sticky-reveal".to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
