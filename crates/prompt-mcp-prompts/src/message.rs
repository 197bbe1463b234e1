//! Assembled prompt messages.

use serde::Serialize;

/// Speaker of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
}

/// Text content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: Content,
}

impl PromptMessage {
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Content::Text { text: text.into() },
        }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text { text: text.into() },
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        let Content::Text { text } = &self.content;
        text
    }
}

/// Ordered output of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageSequence(Vec<PromptMessage>);

impl MessageSequence {
    #[must_use]
    pub const fn new(messages: Vec<PromptMessage>) -> Self {
        Self(messages)
    }

    #[must_use]
    pub fn messages(&self) -> &[PromptMessage] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Join labeled sections into one user block.
///
/// Each section is `label\nvalue`; sections are separated by a blank line.
#[must_use]
pub fn labeled_sections(sections: &[(&str, &str)]) -> String {
    sections
        .iter()
        .map(|(label, value)| format!("{label}\n{value}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_labeled_sections_layout() {
        let block = labeled_sections(&[("[A]", "one"), ("[B]", "two")]);
        assert_eq!(block, "[A]\none\n\n[B]\ntwo");
    }

    #[test]
    fn test_message_serialization() {
        let seq = MessageSequence::new(vec![
            PromptMessage::system("rules"),
            PromptMessage::user("task"),
        ]);
        let value = serde_json::to_value(&seq).unwrap();
        assert_eq!(
            value,
            json!([
                {"role": "system", "content": {"type": "text", "text": "rules"}},
                {"role": "user", "content": {"type": "text", "text": "task"}},
            ])
        );
    }
}
