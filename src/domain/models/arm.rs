//! Arm domain model.
//!
//! An arm is one candidate generation configuration: a prompt template with a
//! single `{input}` placeholder plus the sampling parameters sent to the
//! backend. Arms are immutable once built.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{OptimizerError, OptimizerResult, TemplateError};

/// Placeholder substituted with the input text when rendering a template.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Sampling temperature (>= 0)
    pub temperature: f64,

    /// Maximum output length in tokens (> 0)
    pub max_tokens: u32,

    /// Nucleus-sampling breadth in [0, 1]
    pub top_p: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 256,
            top_p: 1.0,
        }
    }
}

impl Params {
    pub fn new(temperature: f64, max_tokens: u32, top_p: f64) -> Self {
        Self {
            temperature,
            max_tokens,
            top_p,
        }
    }

    /// Check the value ranges, naming the owning arm in the error.
    pub fn validate(&self, arm_id: &str) -> OptimizerResult<()> {
        let invalid = |reason: String| OptimizerError::InvalidParams {
            arm_id: arm_id.to_string(),
            reason,
        };

        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(invalid(format!("temperature {} must be >= 0", self.temperature)));
        }
        if self.max_tokens == 0 {
            return Err(invalid("max_tokens must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(invalid(format!("top_p {} must be within [0, 1]", self.top_p)));
        }
        Ok(())
    }
}

/// Reporting-only metadata attached to an arm.
///
/// Never consulted by selection. Unrecognised keys in serialized catalogs are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmMetadata {
    /// Phrasing variant tag (e.g. "plain", "math_hint")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrasing: Option<String>,

    /// Temperature echo for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ArmMetadata {
    pub fn phrasing_or_default(&self) -> &str {
        self.phrasing.as_deref().unwrap_or("-")
    }
}

/// A candidate configuration the optimizer chooses among.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arm {
    /// Unique identifier within the catalog
    pub id: String,

    /// Prompt template containing exactly one `{input}` placeholder
    pub template: String,

    /// Generation parameters
    #[serde(default)]
    pub params: Params,

    /// Reporting metadata
    #[serde(default)]
    pub metadata: ArmMetadata,
}

impl Arm {
    pub fn new(id: impl Into<String>, template: impl Into<String>, params: Params) -> Self {
        Self {
            id: id.into(),
            template: template.into(),
            params,
            metadata: ArmMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ArmMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Check that the template has exactly one placeholder.
    pub fn check_template(&self) -> Result<(), TemplateError> {
        match self.template.matches(INPUT_PLACEHOLDER).count() {
            0 => Err(TemplateError::MissingPlaceholder {
                arm_id: self.id.clone(),
            }),
            1 => Ok(()),
            count => Err(TemplateError::MultiplePlaceholders {
                arm_id: self.id.clone(),
                count,
            }),
        }
    }

    /// Substitute `input` into the template.
    pub fn render(&self, input: &str) -> Result<String, TemplateError> {
        self.check_template()?;
        Ok(self.template.replacen(INPUT_PLACEHOLDER, input, 1))
    }
}
