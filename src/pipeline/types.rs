use crate::error::GenerateError;
use serde::{Deserialize, Serialize};

/// The two things the popup can ask for: comment suggestions for a stored
/// post, or a fresh post draft on a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    Comment,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: RequestKind,
    /// Extracted post text (`Comment`) or a user-supplied topic (`Post`).
    pub input: String,
    pub tone: String,
}

impl GenerationRequest {
    pub fn comment(input: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Comment,
            input: input.into(),
            tone: tone.into(),
        }
    }

    pub fn post(topic: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Post,
            input: topic.into(),
            tone: tone.into(),
        }
    }
}

/// Classification of a surfaced failure. All kinds render the same generic
/// error panel; they exist so diagnostics can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Parse,
    Validation,
    Input,
}

impl From<&GenerateError> for FailureKind {
    fn from(err: &GenerateError) -> Self {
        match err {
            GenerateError::Transport { .. } => Self::Transport,
            GenerateError::Parse(_) => Self::Parse,
            GenerateError::Validation(_) => Self::Validation,
            GenerateError::Input(_) => Self::Input,
        }
    }
}

/// Outcome of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Suggestions(Vec<String>),
    PostDraft {
        text: String,
        /// The service was instructed to stay under the length cap but is
        /// not bound by it; an over-long draft is still usable content, so
        /// it comes back as success with this advisory set.
        over_length: bool,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl GenerationResult {
    pub(crate) fn from_error(err: &GenerateError) -> Self {
        Self::Failure {
            kind: FailureKind::from(err),
            message: err.to_string(),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failure { kind, .. } => Some(*kind),
            Self::Suggestions(_) | Self::PostDraft { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(RequestKind::Comment.to_string(), "comment");
        assert_eq!(FailureKind::Validation.to_string(), "validation");
    }

    #[test]
    fn failure_kind_maps_from_error() {
        let err = GenerateError::Parse("no text".into());
        assert_eq!(FailureKind::from(&err), FailureKind::Parse);
        let result = GenerationResult::from_error(&err);
        assert_eq!(result.failure_kind(), Some(FailureKind::Parse));
    }
}
