//! Prompt and schema contract for date extraction

use chronosphere_domain::traits::{ChatMessage, CompletionRequest, FunctionSpec};
use chronosphere_domain::Granularity;
use serde_json::{json, Value};

/// Instruction sent as the system message of every request
pub const SYSTEM_PROMPT: &str =
    "Your task is to extract dates and related event information from the provided text.";

/// Description of the forced function
pub const FUNCTION_DESCRIPTION: &str = "Extracts dates and related information from text.";

/// Pattern every `date` must match: `-?YYYY(-MM(-DD)?)?`
pub const DATE_PATTERN: &str = "^-?[0-9]{4}(-[0-9]{2})?(-[0-9]{2})?$";

/// JSON Schema of the forced function's arguments
///
/// The arguments are an object whose `dates` array holds the events.
pub fn schema_contract() -> Value {
    let granularities: Vec<&str> = Granularity::ALL.iter().map(|g| g.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "dates": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "Title of the event, limited to 3 words."
                        },
                        "summary": {
                            "type": "string",
                            "description": "A brief summary of the event, do not repeat the title, limited to 3 sentences."
                        },
                        "dates": {
                            "type": "array",
                            "minItems": 1,
                            "items": {
                                "type": "object",
                                "properties": {
                                    "date": {
                                        "type": "string",
                                        "pattern": DATE_PATTERN,
                                        "description": "Date of the event in YYYY-MM-DD format. MM and DD are optional based on granularity."
                                    },
                                    "granularity": {
                                        "type": "string",
                                        "enum": granularities,
                                        "description": "Specifies the level of detail of the date: day, month, year, decade, century, or millennium."
                                    }
                                },
                                "required": ["date", "granularity"]
                            }
                        }
                    },
                    "required": ["title", "summary", "dates"]
                }
            }
        },
        "required": ["dates"]
    })
}

/// Build the two-message forced-call request for one narrative text
pub fn build_request(text: &str, function_name: &str) -> CompletionRequest {
    CompletionRequest {
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(text)],
        function: FunctionSpec {
            name: function_name.to_string(),
            description: FUNCTION_DESCRIPTION.to_string(),
            parameters: schema_contract(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosphere_domain::traits::Role;

    #[test]
    fn test_request_has_two_messages() {
        let request = build_request("In 1905 Alberta became a province.", "extract_dates");

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "In 1905 Alberta became a province.");
        assert_eq!(request.function.name, "extract_dates");
    }

    #[test]
    fn test_schema_lists_every_granularity() {
        let schema = schema_contract();
        let values = &schema["properties"]["dates"]["items"]["properties"]["dates"]["items"]
            ["properties"]["granularity"]["enum"];
        assert_eq!(
            values,
            &json!(["day", "month", "year", "decade", "century", "millennium"])
        );
    }

    #[test]
    fn test_schema_compiles() {
        assert!(jsonschema::validator_for(&schema_contract()).is_ok());
    }
}
