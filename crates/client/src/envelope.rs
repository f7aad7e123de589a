//! Normalization of the backend's JSON response envelope.
//!
//! Every endpoint wraps its payload as
//! `{ success, data?, meta?: { pagination?, requestId? }, error?: { code, message, details } }`.
//! Normalization is a pure function over (HTTP status, body text) so the
//! decision logic is testable without a network:
//!
//! - enveloped success unwraps to `data` (absent `data` decodes as null)
//! - enveloped failure becomes a typed [`ApiError::Api`]
//! - a body without a `success` key passes through unchanged (older
//!   endpoints predate the envelope)
//! - a 204 or empty body decodes as null, so request `Option<T>` or `()`

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Pagination block from the envelope's meta.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page index.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total matching items.
    pub total_items: u64,
    /// Total pages.
    pub total_pages: u32,
}

/// Meta block from the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Pagination, on list endpoints.
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// Correlation id for support/debugging.
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(default)]
    details: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

/// How many body bytes to quote in synthesized error messages.
const ERROR_SNIPPET_LEN: usize = 200;

fn snippet(body: &str) -> String {
    body.chars().take(ERROR_SNIPPET_LEN).collect()
}

/// Normalize a response into the requested type plus envelope meta.
///
/// # Errors
///
/// Returns [`ApiError::Api`] for enveloped failures and non-success statuses,
/// and [`ApiError::Decode`] when a successful body cannot be decoded as `T`.
pub fn normalize_with_meta<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<(T, Meta), ApiError> {
    let success_status = (200..300).contains(&status);

    // 204 / empty body: there is no data, by design.
    if status == 204 || body.trim().is_empty() {
        if success_status {
            let value = serde_json::from_value(Value::Null)?;
            return Ok((value, Meta::default()));
        }
        return Err(ApiError::api(
            "HTTP_ERROR".to_string(),
            format!("HTTP {status}"),
            status,
            None,
            None,
        ));
    }

    let raw = match serde_json::from_str::<Value>(body) {
        Ok(raw) => raw,
        // Non-JSON body. For error statuses synthesize a typed error; for
        // success statuses this is a broken response worth surfacing.
        Err(parse_err) => {
            if success_status {
                return Err(ApiError::Decode(parse_err));
            }
            return Err(ApiError::api(
                "HTTP_ERROR".to_string(),
                format!("HTTP {status}: {}", snippet(body)),
                status,
                None,
                None,
            ));
        }
    };

    // Bodies without a success key pass through for backward compatibility.
    let is_enveloped = raw
        .as_object()
        .is_some_and(|object| object.get("success").is_some_and(Value::is_boolean));

    if !is_enveloped {
        if success_status {
            let value = serde_json::from_value(raw)?;
            return Ok((value, Meta::default()));
        }
        return Err(ApiError::api(
            "HTTP_ERROR".to_string(),
            format!("HTTP {status}: {}", snippet(body)),
            status,
            None,
            None,
        ));
    }

    let envelope: Envelope = serde_json::from_value(raw)?;
    let meta = envelope.meta.unwrap_or_default();

    if envelope.success {
        let value = serde_json::from_value(envelope.data)?;
        return Ok((value, meta));
    }

    let (code, message, details) = envelope.error.map_or_else(
        || ("UNKNOWN".to_string(), format!("HTTP {status}"), None),
        |error| (error.code, error.message, error.details),
    );
    Err(ApiError::api(
        code,
        message,
        status,
        details,
        meta.request_id,
    ))
}

/// Normalize a response into the requested type, discarding meta.
///
/// # Errors
///
/// Same as [`normalize_with_meta`].
pub fn normalize<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    normalize_with_meta(status, body).map(|(value, _)| value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Widget {
        id: u32,
    }

    #[test]
    fn test_enveloped_success_unwraps_data() {
        let (widget, meta) = normalize_with_meta::<Widget>(
            200,
            r#"{"success": true, "data": {"id": 5}, "meta": {"requestId": "r-1"}}"#,
        )
        .unwrap();
        assert_eq!(widget, Widget { id: 5 });
        assert_eq!(meta.request_id.as_deref(), Some("r-1"));
    }

    #[test]
    fn test_enveloped_failure_becomes_typed_error() {
        let err = normalize::<Widget>(
            400,
            r#"{"success": false, "error": {"code": "X", "message": "Y"}, "meta": {"requestId": "z"}}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Api {
                code,
                message,
                status,
                request_id,
                ..
            } => {
                assert_eq!(code, "X");
                assert_eq!(message, "Y");
                assert_eq!(status, 400);
                assert_eq!(request_id.as_deref(), Some("z"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_details_carried_through() {
        let err = normalize::<Widget>(
            422,
            r#"{"success": false, "error": {"code": "VALIDATION", "message": "bad", "details": {"field": "email"}}}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Api { details, .. } => {
                assert_eq!(details.unwrap()["field"], "email");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_enveloped_body_passes_through() {
        let widget: Widget = normalize(200, r#"{"id": 9}"#).unwrap();
        assert_eq!(widget, Widget { id: 9 });
    }

    #[test]
    fn test_empty_body_is_null_data() {
        let nothing: Option<Widget> = normalize(204, "").unwrap();
        assert_eq!(nothing, None);
        let unit: () = normalize(200, "  ").unwrap();
        let _ = unit;
    }

    #[test]
    fn test_pagination_parsed() {
        let (_, meta) = normalize_with_meta::<Vec<Widget>>(
            200,
            r#"{"success": true, "data": [],
                "meta": {"pagination": {"page": 2, "perPage": 20, "totalItems": 55, "totalPages": 3}}}"#,
        )
        .unwrap();
        let pagination = meta.pagination.unwrap();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn test_non_json_error_body_synthesized() {
        let err = normalize::<Widget>(502, "Bad Gateway").unwrap_err();
        match err {
            ApiError::Api { code, status, .. } => {
                assert_eq!(code, "HTTP_ERROR");
                assert_eq!(status, 502);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_enveloped_error_status() {
        let err = normalize::<Widget>(404, r#"{"message": "nope"}"#).unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_missing_data_on_success_is_null() {
        let nothing: Option<Widget> = normalize(200, r#"{"success": true}"#).unwrap();
        assert_eq!(nothing, None);
    }
}
