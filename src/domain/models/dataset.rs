//! Input/reference datasets that drive the round loop.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::errors::{OptimizerError, OptimizerResult};

/// One (input, reference) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub reference: String,
}

impl Example {
    pub fn new(input: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reference: reference.into(),
        }
    }
}

/// Ordered collection of examples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    examples: Vec<Example>,
}

impl Dataset {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    /// Built-in demo questions.
    pub fn demo() -> Self {
        Self::new(vec![
            Example::new("Who wrote the Harry Potter Books?", "J.K. Rowling"),
            Example::new("Compute 13 + 31", "44"),
            Example::new("Capital of France?", "Paris"),
            Example::new("Derivative of x^3 + 3x^2?", "3x^2 + 6x"),
        ])
    }

    /// Load a dataset from a YAML or JSON file (chosen by extension).
    pub fn load(path: impl AsRef<Path>) -> OptimizerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OptimizerError::Dataset(format!("failed to read {}: {e}", path.display()))
        })?;

        let dataset: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw)?,
            Some("yaml" | "yml") => serde_yaml::from_str(&raw)?,
            other => {
                return Err(OptimizerError::Dataset(format!(
                    "unsupported dataset extension: {}",
                    other.unwrap_or("<none>")
                )))
            }
        };

        if dataset.is_empty() {
            return Err(OptimizerError::Dataset(format!(
                "{} contains no examples",
                path.display()
            )));
        }
        Ok(dataset)
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Append one example.
    pub fn with_example(mut self, example: Example) -> Self {
        self.examples.push(example);
        self
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Example> {
        self.examples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_demo_dataset() {
        let demo = Dataset::demo();
        assert_eq!(demo.len(), 4);
        assert_eq!(demo.examples()[2].reference, "Paris");
    }

    #[test]
    fn test_with_example_appends() {
        let extended = Dataset::demo().with_example(Example::new("What is 12 * 11?", "132"));
        assert_eq!(extended.len(), 5);
        assert_eq!(extended.examples()[4].reference, "132");
    }

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- input: \"Compute 2 + 2\"\n  reference: \"4\"").unwrap();
        file.flush().unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.examples(), &[Example::new("Compute 2 + 2", "4")]);
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"input": "Capital of Italy?", "reference": "Rome"}}]"#).unwrap();
        file.flush().unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_load_rejects_empty_and_unknown_extension() {
        let mut empty = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(empty, "[]").unwrap();
        empty.flush().unwrap();
        assert!(matches!(Dataset::load(empty.path()), Err(OptimizerError::Dataset(_))));

        let other = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        assert!(matches!(Dataset::load(other.path()), Err(OptimizerError::Dataset(_))));
    }
}
