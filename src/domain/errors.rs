//! Domain errors for the prompt optimizer.

use thiserror::Error;

/// Failure to render an arm's prompt template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template for arm {arm_id} has no {{input}} placeholder")]
    MissingPlaceholder { arm_id: String },

    #[error("Template for arm {arm_id} has {count} {{input}} placeholders, expected exactly one")]
    MultiplePlaceholders { arm_id: String, count: usize },
}

/// Failure reported by a generation backend.
///
/// Every backend collapses its failures into this one kind; the executor
/// treats all of them as "round abandoned".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Generation timed out after {0}ms")]
    Timeout(u64),
}

/// Errors raised by the optimizer core.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OptimizerError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Invalid scoring weight {name}: {value} (must be finite and >= 0)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Invalid params for arm {arm_id}: {reason}")]
    InvalidParams { arm_id: String, reason: String },

    #[error("Duplicate arm id: {0}")]
    DuplicateArmId(String),

    #[error("Arm catalog is empty")]
    EmptyCatalog,

    #[error("Unknown arm: {0}")]
    UnknownArm(String),

    #[error("Dataset error: {0}")]
    Dataset(String),
}

pub type OptimizerResult<T> = Result<T, OptimizerError>;

impl From<serde_json::Error> for OptimizerError {
    fn from(err: serde_json::Error) -> Self {
        OptimizerError::Dataset(err.to_string())
    }
}

impl From<serde_yaml::Error> for OptimizerError {
    fn from(err: serde_yaml::Error) -> Self {
        OptimizerError::Dataset(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_converts() {
        let err: OptimizerError = GenerationError::Timeout(500).into();
        assert!(matches!(err, OptimizerError::Generation(GenerationError::Timeout(500))));
        assert_eq!(err.to_string(), "Generation error: Generation timed out after 500ms");
    }

    #[test]
    fn test_template_error_message() {
        let err = TemplateError::MissingPlaceholder { arm_id: "arm_3".to_string() };
        assert_eq!(err.to_string(), "Template for arm arm_3 has no {input} placeholder");
    }
}
