use super::types::RequestKind;
use crate::llm::gemini::types::ResponseSchema;

/// Field carrying comment suggestions in a structured reply.
pub const SUGGESTIONS_FIELD: &str = "suggestions";
/// Field carrying the post draft in a structured reply.
pub const OUTPUT_FIELD: &str = "output";
/// How many suggestions the service is asked for. The validator tolerates
/// other counts; the schema still pins the contract.
pub const SUGGESTION_COUNT: u32 = 3;

/// The declared reply shape for a request kind. Sent to the service as a
/// structural constraint and mirrored by the local validator in
/// [`super::validate`].
pub fn response_schema(kind: RequestKind, max_post_chars: u32) -> ResponseSchema {
    match kind {
        RequestKind::Comment => ResponseSchema::object([(
            SUGGESTIONS_FIELD,
            ResponseSchema::array_of(ResponseSchema::string(), SUGGESTION_COUNT, SUGGESTION_COUNT)
                .described("Three distinct comment suggestions"),
        )]),
        RequestKind::Post => ResponseSchema::object([(
            OUTPUT_FIELD,
            ResponseSchema::bounded_string(max_post_chars).described("The drafted post"),
        )]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_schema_requires_array_of_string() {
        let json = serde_json::to_value(response_schema(RequestKind::Comment, 300)).unwrap();
        assert_eq!(json["type"], "OBJECT");
        assert_eq!(json["required"], serde_json::json!(["suggestions"]));
        assert_eq!(json["properties"]["suggestions"]["type"], "ARRAY");
        assert_eq!(json["properties"]["suggestions"]["items"]["type"], "STRING");
        assert_eq!(json["properties"]["suggestions"]["minItems"], 3);
        assert_eq!(json["properties"]["suggestions"]["maxItems"], 3);
    }

    #[test]
    fn post_schema_requires_bounded_string() {
        let json = serde_json::to_value(response_schema(RequestKind::Post, 300)).unwrap();
        assert_eq!(json["type"], "OBJECT");
        assert_eq!(json["required"], serde_json::json!(["output"]));
        assert_eq!(json["properties"]["output"]["type"], "STRING");
        assert_eq!(json["properties"]["output"]["maxLength"], 300);
    }

    #[test]
    fn schemas_never_cross_kinds() {
        let comment = serde_json::to_value(response_schema(RequestKind::Comment, 300)).unwrap();
        let post = serde_json::to_value(response_schema(RequestKind::Post, 300)).unwrap();
        assert!(comment["properties"].get("output").is_none());
        assert!(post["properties"].get("suggestions").is_none());
    }
}
