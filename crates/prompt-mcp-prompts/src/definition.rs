//! Prompt schemas advertised through `prompts/list`.

use serde::Serialize;

/// One declared argument of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

impl PromptArgument {
    #[must_use]
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: true,
        }
    }
}

/// Named, schema-described prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

impl PromptDefinition {
    /// Whether `name` is a declared argument.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.arguments.iter().any(|a| a.name == name)
    }
}
