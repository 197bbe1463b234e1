//! Essay prompt templates and message assembly.
//!
//! Provides:
//! - `PromptDefinition` - schema advertised to clients
//! - `InvocationArgs` - caller-supplied arguments and their validation
//! - `MessageSequence` - ordered role-tagged output of a template
//! - `PromptRegistry` - named templates (`essay-lecture`, `essay-grading`)
//! - `PromptAssets` - instruction texts loaded once at startup

pub mod args;
pub mod assets;
pub mod definition;
pub mod essay;
pub mod message;
pub mod registry;

use thiserror::Error;

pub use args::InvocationArgs;
pub use assets::{AssetError, PromptAssets};
pub use definition::{PromptArgument, PromptDefinition};
pub use essay::{EssayGrading, EssayLecture, GradingArgs, LectureArgs};
pub use message::{MessageSequence, PromptMessage, Role};
pub use registry::{PromptRegistry, PromptTemplate};

/// Prompt invocation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
    #[error("Argument must be a string: {0}")]
    NonStringArgument(String),
    #[error("Prompt not found: {0}")]
    UnknownPrompt(String),
}

impl PromptError {
    /// Name of the offending argument, for argument errors.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::MissingArgument(name)
            | Self::UnexpectedArgument(name)
            | Self::NonStringArgument(name) => Some(name),
            Self::UnknownPrompt(_) => None,
        }
    }
}
