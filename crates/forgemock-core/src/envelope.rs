//! Wire response envelopes.
//!
//! Every handler produces an [`ApiResponse`]: an enumerated status plus an
//! optional JSON body. The shell owns serialization and transport headers;
//! nothing here knows about HTTP framing.

use serde::Serialize;
use serde_json::Value;

/// The enumerated response statuses the mock ever produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// 200 - success with a body.
    Ok,
    /// 201 - entity created.
    Created,
    /// 204 - success with no body.
    NoContent,
    /// 400 - validation or conflict failure.
    BadRequest,
    /// 401 - missing or malformed credential.
    Unauthorized,
    /// 404 - no entity at the requested key.
    NotFound,
    /// 500 - unexpected handler failure.
    InternalError,
}

impl ResponseStatus {
    /// The numeric wire code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }
}

/// A fully-formed response, ready for the shell to serialize.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Response status.
    pub status: ResponseStatus,
    /// JSON body, absent for 204 responses.
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Build a response from parts.
    #[must_use]
    pub const fn new(status: ResponseStatus, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// 200 with the given body.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::new(ResponseStatus::Ok, Some(body))
    }

    /// 200 with a serialized value.
    pub fn ok_json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self::ok(body),
            Err(e) => crate::error::MockError::Internal {
                message: format!("response serialization failed: {e}"),
                source: Some(Box::new(e)),
            }
            .into(),
        }
    }

    /// 201 with a serialized value.
    pub fn created_json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self::new(ResponseStatus::Created, Some(body)),
            Err(e) => crate::error::MockError::Internal {
                message: format!("response serialization failed: {e}"),
                source: Some(Box::new(e)),
            }
            .into(),
        }
    }

    /// 204 with no body.
    #[must_use]
    pub const fn no_content() -> Self {
        Self::new(ResponseStatus::NoContent, None)
    }
}

/// The platform's standard `{count, value}` list envelope.
///
/// `count` is the number of items in `value`, not the number of matches
/// before truncation.
#[derive(Debug, Clone, Serialize)]
pub struct ListEnvelope<T> {
    /// Number of items returned.
    pub count: usize,
    /// The items.
    pub value: Vec<T>,
}

impl<T> ListEnvelope<T> {
    /// Wrap a list of items.
    #[must_use]
    pub fn new(value: Vec<T>) -> Self {
        Self {
            count: value.len(),
            value,
        }
    }
}

impl<T: Serialize> From<ListEnvelope<T>> for ApiResponse {
    fn from(envelope: ListEnvelope<T>) -> Self {
        Self::ok_json(&envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes() {
        assert_eq!(ResponseStatus::Ok.code(), 200);
        assert_eq!(ResponseStatus::Created.code(), 201);
        assert_eq!(ResponseStatus::NoContent.code(), 204);
        assert_eq!(ResponseStatus::BadRequest.code(), 400);
        assert_eq!(ResponseStatus::Unauthorized.code(), 401);
        assert_eq!(ResponseStatus::NotFound.code(), 404);
        assert_eq!(ResponseStatus::InternalError.code(), 500);
    }

    #[test]
    fn test_list_envelope_counts_returned_items() {
        let envelope = ListEnvelope::new(vec![1, 2, 3]);
        assert_eq!(envelope.count, 3);

        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(json["count"], 3);
        assert_eq!(json["value"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_no_content_has_no_body() {
        let response = ApiResponse::no_content();
        assert_eq!(response.status, ResponseStatus::NoContent);
        assert!(response.body.is_none());
    }
}
