use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
    /// Asks the service for machine-parseable JSON instead of free text.
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    /// Structural constraint on the reply. The service is instructed, not
    /// bound: the local validator remains the real contract boundary.
    #[serde(rename = "responseSchema")]
    pub response_schema: ResponseSchema,
}

impl GenerateContentRequest {
    /// Assemble a structured-output request: system instruction, a single
    /// user turn, and the declared reply schema. The input text travels as
    /// data through serde, so quotes and braces in it cannot corrupt the
    /// request body.
    pub fn structured(
        system_instruction: &str,
        user_query: &str,
        response_schema: ResponseSchema,
        temperature: f64,
    ) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user_query.to_string(),
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: 8192,
                response_mime_type: "application/json".to_string(),
                response_schema,
            },
        }
    }
}

// ── Response schema ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
}

/// Declarative shape of the structured reply, in the generative-language
/// API's OpenAPI-subset schema format.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, ResponseSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u32>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl ResponseSchema {
    fn bare(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            properties: None,
            required: None,
            items: None,
            min_items: None,
            max_items: None,
            max_length: None,
        }
    }

    pub fn string() -> Self {
        Self::bare(SchemaType::String)
    }

    pub fn bounded_string(max_length: u32) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::bare(SchemaType::String)
        }
    }

    pub fn array_of(items: ResponseSchema, min_items: u32, max_items: u32) -> Self {
        Self {
            items: Some(Box::new(items)),
            min_items: Some(min_items),
            max_items: Some(max_items),
            ..Self::bare(SchemaType::Array)
        }
    }

    pub fn object(properties: impl IntoIterator<Item = (&'static str, ResponseSchema)>) -> Self {
        let properties: BTreeMap<String, ResponseSchema> = properties
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect();
        let required = properties.keys().cloned().collect();
        Self {
            properties: Some(properties),
            required: Some(required),
            ..Self::bare(SchemaType::Object)
        }
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

// ── Response envelope ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub error: Option<ApiError>,
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    pub prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount")]
    pub candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl GenerateContentResponse {
    /// The single text payload of the first candidate, parts joined with
    /// newlines. `None` when the envelope carries no usable text.
    pub fn first_text(&self) -> Option<String> {
        let text = self
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .map(|candidate| {
                let mut out = String::new();
                for part in &candidate.content.parts {
                    if let Some(t) = &part.text {
                        if !out.is_empty() {
                            out.push('\n');
                        }
                        out.push_str(t);
                    }
                }
                out
            })
            .unwrap_or_default();

        if text.is_empty() { None } else { Some(text) }
    }

    /// Wrap a bare text payload in a minimal envelope. Test scaffolding for
    /// scripted service doubles.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            candidates: Some(vec![Candidate {
                content: CandidateContent {
                    parts: vec![ResponsePart {
                        text: Some(text.into()),
                    }],
                },
                finish_reason: Some("STOP".to_string()),
            }]),
            error: None,
            usage_metadata: None,
        }
    }
}
