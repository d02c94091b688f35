//! Wire types for the game endpoints
//!
//! Request bodies use camelCase keys (`visitorId`); responses use the
//! service's snake_case (`debug_year`).

use serde::{Deserialize, Serialize};

use super::visitor::VisitorId;

pub const START_PATH: &str = "/api/game/start";
pub const QUESTION_PATH: &str = "/api/game/question";
pub const GUESS_PATH: &str = "/api/game/guess";

const STATUS_SUCCESS: &str = "success";

/// Body of POST /api/game/start
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest<'a> {
    pub visitor_id: &'a VisitorId,
}

/// Body of POST /api/game/question
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest<'a> {
    pub visitor_id: &'a VisitorId,
    pub question: &'a str,
}

/// Body of POST /api/game/guess
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest<'a> {
    pub visitor_id: &'a VisitorId,
    pub guess: i64,
}

/// Response shared by all three endpoints
///
/// Which optional fields are present depends on the endpoint and outcome.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub debug_year: Option<i64>,
}

impl ServerResponse {
    /// Anything other than the literal "success" is treated as an error
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_keys_are_camel_case() {
        let visitor = VisitorId::from_string("visitor-1");
        let body = serde_json::to_value(GuessRequest {
            visitor_id: &visitor,
            guess: 1995,
        })
        .unwrap();
        assert_eq!(body, json!({ "visitorId": "visitor-1", "guess": 1995 }));
    }

    #[test]
    fn test_parse_start_success() {
        let resp: ServerResponse =
            serde_json::from_str(r#"{"status":"success","debug_year":1995,"extra":true}"#).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.debug_year, Some(1995));
        assert_eq!(resp.message, None);
    }

    #[test]
    fn test_null_debug_year_is_absent() {
        let resp: ServerResponse =
            serde_json::from_str(r#"{"status":"success","debug_year":null}"#).unwrap();
        assert_eq!(resp.debug_year, None);
    }

    #[test]
    fn test_unknown_status_is_not_success() {
        let resp: ServerResponse = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert!(!resp.is_success());
    }
}
