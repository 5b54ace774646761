use super::schema::{OUTPUT_FIELD, SUGGESTIONS_FIELD};
use super::types::{GenerationResult, RequestKind};
use crate::error::GenerateError;
use serde_json::Value;

/// Decode the raw text payload of a reply envelope into a typed result.
///
/// The service was handed a response schema, but nothing guarantees it was
/// enforced server-side — this validator is the real contract boundary.
/// Non-JSON text is a parse failure; JSON of the wrong shape is a validation
/// failure, with "field absent" and "field present but wrong" reported
/// distinctly.
pub fn decode_reply(
    kind: RequestKind,
    raw_text: &str,
    max_post_chars: u32,
) -> Result<GenerationResult, GenerateError> {
    let value: Value = serde_json::from_str(raw_text)
        .map_err(|e| GenerateError::Parse(format!("reply text is not valid JSON: {e}")))?;

    match kind {
        RequestKind::Comment => decode_suggestions(&value),
        RequestKind::Post => decode_draft(&value, max_post_chars),
    }
}

fn decode_suggestions(value: &Value) -> Result<GenerationResult, GenerateError> {
    let field = value.get(SUGGESTIONS_FIELD).ok_or_else(|| {
        GenerateError::Validation(format!("`{SUGGESTIONS_FIELD}` field is absent"))
    })?;

    let items = field.as_array().ok_or_else(|| {
        GenerateError::Validation(format!(
            "`{SUGGESTIONS_FIELD}` is present but not an array of strings"
        ))
    })?;

    if items.is_empty() {
        return Err(GenerateError::Validation(format!(
            "`{SUGGESTIONS_FIELD}` is present but empty"
        )));
    }

    // The service is asked for exactly 3 but may return another count; any
    // non-zero number of strings renders. A non-string member still fails.
    let suggestions = items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_owned).ok_or_else(|| {
                GenerateError::Validation(format!(
                    "`{SUGGESTIONS_FIELD}` contains a non-string entry"
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GenerationResult::Suggestions(suggestions))
}

fn decode_draft(value: &Value, max_post_chars: u32) -> Result<GenerationResult, GenerateError> {
    let field = value
        .get(OUTPUT_FIELD)
        .ok_or_else(|| GenerateError::Validation(format!("`{OUTPUT_FIELD}` field is absent")))?;

    let text = field.as_str().ok_or_else(|| {
        GenerateError::Validation(format!("`{OUTPUT_FIELD}` is present but not a string"))
    })?;

    let length = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    Ok(GenerationResult::PostDraft {
        text: text.to_owned(),
        over_length: length > max_post_chars,
    })
}
