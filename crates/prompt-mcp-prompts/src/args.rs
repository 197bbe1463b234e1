//! Caller-supplied prompt arguments.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{PromptDefinition, PromptError};

/// Argument values for one invocation.
///
/// Keys are kept sorted so validation errors are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationArgs {
    values: BTreeMap<String, String>,
}

impl InvocationArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Build from a JSON `arguments` object.
    ///
    /// `null` values count as absent; any other non-string value is rejected.
    ///
    /// # Errors
    /// Returns `NonStringArgument` naming the first offending key.
    pub fn from_json(arguments: &Map<String, Value>) -> Result<Self, PromptError> {
        let mut values = BTreeMap::new();
        for (name, value) in arguments {
            match value {
                Value::String(s) => {
                    values.insert(name.clone(), s.clone());
                }
                Value::Null => {}
                _ => return Err(PromptError::NonStringArgument(name.clone())),
            }
        }
        Ok(Self { values })
    }

    /// Raw value as supplied.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Trimmed value of a required argument.
    ///
    /// # Errors
    /// Returns `MissingArgument` if absent or blank.
    pub fn require(&self, name: &str) -> Result<String, PromptError> {
        match self.get(name).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(PromptError::MissingArgument(name.to_string())),
        }
    }

    /// Reject any name the definition does not declare.
    ///
    /// Callers `require` their arguments first so a missing value is
    /// reported before an unexpected one.
    ///
    /// # Errors
    /// Returns `UnexpectedArgument` naming the first undeclared key.
    pub fn reject_undeclared(&self, definition: &PromptDefinition) -> Result<(), PromptError> {
        match self.values.keys().find(|k| !definition.declares(k)) {
            Some(name) => Err(PromptError::UnexpectedArgument(name.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::PromptArgument;

    fn definition() -> PromptDefinition {
        PromptDefinition {
            name: "demo",
            title: "Demo",
            description: "demo prompt",
            arguments: vec![
                PromptArgument::required("first", "first"),
                PromptArgument::required("second", "second"),
                PromptArgument {
                    name: "extra",
                    description: "optional",
                    required: false,
                },
            ],
        }
    }

    #[test]
    fn test_require_trims() {
        let args = InvocationArgs::new().with("first", "  hello \n");
        assert_eq!(args.require("first").unwrap(), "hello");
    }

    #[test]
    fn test_require_rejects_blank_and_missing() {
        let args = InvocationArgs::new().with("first", "   ");
        assert_eq!(
            args.require("first"),
            Err(PromptError::MissingArgument("first".into()))
        );
        assert_eq!(
            args.require("second"),
            Err(PromptError::MissingArgument("second".into()))
        );
    }

    #[test]
    fn test_reject_undeclared() {
        let args = InvocationArgs::new()
            .with("first", "a")
            .with("zzz", "c")
            .with("yyy", "d");
        assert_eq!(
            args.reject_undeclared(&definition()),
            Err(PromptError::UnexpectedArgument("yyy".into()))
        );
    }

    #[test]
    fn test_reject_undeclared_accepts_optional() {
        let args = InvocationArgs::new()
            .with("first", "a")
            .with("second", "b")
            .with("extra", "c");
        assert!(args.reject_undeclared(&definition()).is_ok());
        // Missing required values are not this check's concern.
        assert!(InvocationArgs::new().reject_undeclared(&definition()).is_ok());
    }

    #[test]
    fn test_from_json() {
        let map = json!({"first": "a", "second": null});
        let args = InvocationArgs::from_json(map.as_object().unwrap()).unwrap();
        assert_eq!(args.get("first"), Some("a"));
        assert_eq!(args.get("second"), None);

        let map = json!({"first": 3});
        assert_eq!(
            InvocationArgs::from_json(map.as_object().unwrap()),
            Err(PromptError::NonStringArgument("first".into()))
        );
    }
}
