use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Common ID types
pub type AthleteId = Uuid;
pub type RepresentativeId = Uuid;

/// Single field-rule violation, reported alongside its siblings so a
/// caller can fix every problem in one round-trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Response envelope shared by every endpoint:
/// `{status, message, data, errors}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseSchema<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ResponseSchema<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
            errors,
        }
    }
}

/// Paginated collection wrapper for listing endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct PagedData<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_serializes_field_type_as_type() {
        let response = ResponseSchema::<serde_json::Value>::error(
            "Validation failed",
            Some(vec![FieldError {
                field: "dni".to_string(),
                message: "bad".to_string(),
                kind: "regex".to_string(),
            }]),
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["errors"][0]["type"], "regex");
    }
}
