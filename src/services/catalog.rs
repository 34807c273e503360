//! Arm catalog: the fixed, ordered set of arms the optimizer chooses among.
//!
//! Catalog order is the cold-start order and the tie-break order everywhere.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::errors::{OptimizerError, OptimizerResult};
use crate::domain::models::{Arm, ArmMetadata, CatalogConfig, Params};

/// Chain-of-thought base template shared by every phrasing.
pub const BASE_TEMPLATE: &str = "Think step by step to reach the answer, but output only the final result.\n\
Return only the final answer prefixed by 'Final:'.\n\n\
Question: {input}\n";

pub const UNITS_HINT: &str = "\nIf relevant, include units in the final answer.";
pub const BULLET_HINT: &str = "\nInternally organize reasoning as bullet points.";
pub const MATH_HINT: &str = "\nWhen arithmetic appears, compute carefully.";

/// Phrasing variants appended to the base template, in catalog order.
pub const PHRASINGS: &[(&str, &str)] = &[
    ("plain", ""),
    ("units_hint", UNITS_HINT),
    ("bullet_pref", BULLET_HINT),
    ("math_hint", MATH_HINT),
];

/// Immutable, ordered arm set with unique ids.
#[derive(Debug, Clone)]
pub struct ArmCatalog {
    arms: Vec<Arm>,
    index: HashMap<String, usize>,
}

impl ArmCatalog {
    /// Build a catalog, checking for emptiness, duplicate ids, and parameter
    /// ranges. Templates are not checked here; see
    /// [`validate_templates`](Self::validate_templates).
    pub fn new(arms: Vec<Arm>) -> OptimizerResult<Self> {
        if arms.is_empty() {
            return Err(OptimizerError::EmptyCatalog);
        }
        let mut index = HashMap::with_capacity(arms.len());
        for (i, arm) in arms.iter().enumerate() {
            arm.params.validate(&arm.id)?;
            if index.insert(arm.id.clone(), i).is_some() {
                return Err(OptimizerError::DuplicateArmId(arm.id.clone()));
            }
        }
        Ok(Self { arms, index })
    }

    /// Reject any arm whose template lacks exactly one placeholder.
    pub fn validate_templates(self) -> OptimizerResult<Self> {
        for arm in &self.arms {
            arm.check_template()?;
        }
        Ok(self)
    }

    /// Load a YAML list of arms.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> OptimizerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OptimizerError::Dataset(format!("failed to read {}: {e}", path.display()))
        })?;
        let arms: Vec<Arm> = serde_yaml::from_str(&raw)?;
        Self::new(arms)?.validate_templates()
    }

    pub fn get(&self, arm_id: &str) -> Option<&Arm> {
        self.index.get(arm_id).map(|&i| &self.arms[i])
    }

    /// Catalog position of `arm_id`.
    pub fn position(&self, arm_id: &str) -> Option<usize> {
        self.index.get(arm_id).copied()
    }

    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.arms.iter().map(|a| a.id.as_str())
    }

    pub fn first(&self) -> &Arm {
        // Non-empty by construction.
        &self.arms[0]
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }
}

/// Phrasing × temperature grid, ids `arm_0..` in phrasing-major order.
pub fn build_arms(config: &CatalogConfig) -> Vec<Arm> {
    let mut arms = Vec::with_capacity(PHRASINGS.len() * config.temperatures.len());
    for (tag, suffix) in PHRASINGS {
        let template = format!("{BASE_TEMPLATE}{suffix}");
        for &temperature in &config.temperatures {
            let id = format!("arm_{}", arms.len());
            let params = Params::new(temperature, config.max_tokens, config.top_p);
            arms.push(Arm::new(id, template.clone(), params).with_metadata(ArmMetadata {
                phrasing: Some((*tag).to_string()),
                temperature: Some(temperature),
            }));
        }
    }
    arms
}

/// Catalog from config: the arms file when set, the prompt grid otherwise.
pub fn catalog_from_config(config: &CatalogConfig) -> OptimizerResult<ArmCatalog> {
    match &config.arms_file {
        Some(path) => ArmCatalog::from_yaml_file(path),
        None => ArmCatalog::new(build_arms(config))?.validate_templates(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_grid() {
        let arms = build_arms(&CatalogConfig::default());
        assert_eq!(arms.len(), 16);
        assert_eq!(arms[0].id, "arm_0");
        assert_eq!(arms[0].metadata.phrasing.as_deref(), Some("plain"));
        assert_eq!(arms[5].metadata.phrasing.as_deref(), Some("units_hint"));
        assert_eq!(arms[5].params.temperature, 0.2);
        assert!(arms[15].template.ends_with(MATH_HINT));
        assert_eq!(arms[15].params.max_tokens, 256);

        let catalog = ArmCatalog::new(arms).unwrap().validate_templates().unwrap();
        assert_eq!(catalog.position("arm_12"), Some(12));
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let arm = Arm::new("a", "{input}", Params::default());
        assert_eq!(
            ArmCatalog::new(vec![arm.clone(), arm]).unwrap_err(),
            OptimizerError::DuplicateArmId("a".to_string())
        );
        assert_eq!(ArmCatalog::new(vec![]).unwrap_err(), OptimizerError::EmptyCatalog);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let arm = Arm::new("hot", "{input}", Params::new(0.5, 16, 2.0));
        assert!(matches!(
            ArmCatalog::new(vec![arm]),
            Err(OptimizerError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_template_validation_is_separate() {
        let bad = Arm::new("bad", "no placeholder", Params::default());
        let catalog = ArmCatalog::new(vec![bad]).unwrap();
        assert!(matches!(
            catalog.validate_templates(),
            Err(OptimizerError::Template(_))
        ));
    }

    #[test]
    fn test_load_yaml_catalog() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "- id: terse\n  template: \"Answer: {{input}}\"\n  params:\n    temperature: 0.1\n    max_tokens: 64\n    top_p: 0.9\n  metadata:\n    phrasing: terse\n    owner: ignored\n- id: verbose\n  template: \"Explain then answer: {{input}}\""
        )
        .unwrap();
        file.flush().unwrap();

        let catalog = ArmCatalog::from_yaml_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("terse").unwrap().params.max_tokens, 64);
        assert_eq!(catalog.get("verbose").unwrap().params, Params::default());
    }
}
