//! Named prompt templates.

use crate::{
    EssayGrading, EssayLecture, InvocationArgs, MessageSequence, PromptAssets, PromptDefinition,
    PromptError,
};

/// A schema-described prompt handler.
///
/// Implementations must be pure: the same arguments always produce the same
/// sequence.
pub trait PromptTemplate: Send + Sync {
    /// Schema advertised to clients.
    fn definition(&self) -> &PromptDefinition;

    /// Validate `args` and assemble the message sequence.
    ///
    /// # Errors
    /// Returns the first argument error.
    fn invoke(&self, args: &InvocationArgs) -> Result<MessageSequence, PromptError>;
}

/// Read-only set of templates, in registration order.
#[derive(Default)]
pub struct PromptRegistry {
    templates: Vec<Box<dyn PromptTemplate>>,
}

impl PromptRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `essay-lecture` and `essay-grading`.
    #[must_use]
    pub fn essays(assets: PromptAssets) -> Self {
        Self::new()
            .with_template(EssayLecture::new(assets.lecture))
            .with_template(EssayGrading::new(assets.grading))
    }

    /// Register a template. A later template with the same name replaces
    /// the earlier one.
    #[must_use]
    pub fn with_template(mut self, template: impl PromptTemplate + 'static) -> Self {
        let name = template.definition().name;
        self.templates.retain(|t| t.definition().name != name);
        self.templates.push(Box::new(template));
        self
    }

    /// Definitions of all templates.
    #[must_use]
    pub fn list(&self) -> Vec<&PromptDefinition> {
        self.templates.iter().map(|t| t.definition()).collect()
    }

    /// Look up a template by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&dyn PromptTemplate> {
        self.templates
            .iter()
            .find(|t| t.definition().name == name)
            .map(|t| t.as_ref())
    }

    /// Invoke a template by name.
    ///
    /// # Errors
    /// Returns `UnknownPrompt` or the template's argument error.
    pub fn get(&self, name: &str, args: &InvocationArgs) -> Result<MessageSequence, PromptError> {
        let template = self
            .find(name)
            .ok_or_else(|| PromptError::UnknownPrompt(name.to_string()))?;
        let result = template.invoke(args);
        if let Err(e) = &result {
            tracing::debug!(prompt = name, "Prompt invocation rejected: {e}");
        }
        result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
