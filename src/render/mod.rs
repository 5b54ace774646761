//! Maps pipeline results onto what the user sees: suggestion cards, a draft
//! with an optional length advisory, or a generic error panel.

use crate::pipeline::{FailureKind, GenerationResult};
use crate::ui::style;

/// One rendered suggestion, numbered in reply order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionCard {
    pub index: usize,
    pub body: String,
}

/// Display-ready form of a generation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Cards(Vec<SuggestionCard>),
    Draft {
        text: String,
        advisory: Option<String>,
    },
    /// Every failure kind lands here with the same generic copy; the kinds
    /// are told apart in the logs, not in the panel.
    ErrorPanel {
        banner: String,
        body: String,
    },
}

pub fn render(result: &GenerationResult) -> Rendered {
    match result {
        GenerationResult::Suggestions(suggestions) => Rendered::Cards(
            suggestions
                .iter()
                .enumerate()
                .map(|(i, body)| SuggestionCard {
                    index: i + 1,
                    body: body.clone(),
                })
                .collect(),
        ),
        GenerationResult::PostDraft { text, over_length } => Rendered::Draft {
            text: text.clone(),
            advisory: over_length
                .then(|| "Draft runs over the length limit — consider trimming before posting.".to_string()),
        },
        GenerationResult::Failure { .. } => Rendered::ErrorPanel {
            banner: "Generation failed".to_string(),
            body: "Something went wrong while generating. Give it another try in a moment."
                .to_string(),
        },
    }
}

impl Rendered {
    /// Console-styled text for the CLI host.
    pub fn to_terminal(&self) -> String {
        match self {
            Self::Cards(cards) => {
                let mut out = style::header("Suggestions");
                for card in cards {
                    out.push_str(&format!(
                        "\n\n{} {}",
                        style::accent(format!("{}.", card.index)),
                        card.body
                    ));
                }
                out
            }
            Self::Draft { text, advisory } => {
                let mut out = format!("{}\n\n{text}", style::header("Draft"));
                if let Some(advisory) = advisory {
                    out.push_str(&format!("\n\n{}", style::warn(advisory)));
                }
                out
            }
            Self::ErrorPanel { banner, body } => {
                format!("{}\n{}", style::error(banner), style::dim(body))
            }
        }
    }
}
