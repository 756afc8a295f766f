//! Turns an [`HttpResponse`] into a typed value or a [`FetchError`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FetchError;
use crate::http::HttpResponse;

/// Whether `status` is in the 2xx range.
pub fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Interpret a completed response.
///
/// Non-2xx statuses become `Status`. A 2xx body must parse as JSON (`Decode`
/// otherwise) and be an object or array (`ShapeMismatch` otherwise). The
/// value is then converted to `T`; with `T = Value` that never fails. No
/// check is made that the value matches any particular shape of `T` beyond
/// what serde needs to build it.
pub fn interpret<T: DeserializeOwned>(response: HttpResponse) -> Result<T, FetchError> {
    let value = interpret_value(response)?;
    Ok(serde_json::from_value(value)?)
}

/// Like [`interpret`], returning the structured JSON value as-is.
pub fn interpret_value(response: HttpResponse) -> Result<Value, FetchError> {
    if !is_success(response.status) {
        return Err(FetchError::Status {
            status: response.status,
            status_text: response.status_text,
        });
    }
    let value: Value = serde_json::from_slice(&response.body)?;
    if !is_structured(&value) {
        return Err(FetchError::ShapeMismatch);
    }
    Ok(value)
}

fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        id: u64,
        name: String,
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(is_success(299));
        assert!(!is_success(199));
        assert!(!is_success(300));
        assert!(!is_success(404));
    }

    #[test]
    fn object_body_is_returned() {
        let value = interpret_value(ok(r#"{"id":1,"name":"widget"}"#)).unwrap();
        assert_eq!(value, serde_json::json!({"id": 1, "name": "widget"}));
    }

    #[test]
    fn array_body_is_accepted() {
        let value = interpret_value(ok("[1,2,3]")).unwrap();
        assert_eq!(value, serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn typed_object_body_is_decoded() {
        let widget: Widget = interpret(ok(r#"{"id":1,"name":"widget"}"#)).unwrap();
        assert_eq!(
            widget,
            Widget {
                id: 1,
                name: "widget".to_string()
            }
        );
    }

    #[test]
    fn not_found_reports_status_and_reason() {
        let response = HttpResponse {
            status: 404,
            status_text: "Not Found".to_string(),
            body: b"{\"error\":\"missing\"}".to_vec(),
        };
        let err = interpret_value(response).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch with status 404 and message Not Found"
        );
    }

    #[test]
    fn status_is_checked_before_body() {
        let response = HttpResponse {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            body: b"{invalid".to_vec(),
        };
        let err = interpret_value(response).unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn null_and_primitives_are_shape_mismatches() {
        for body in ["null", "42", r#""hello""#, "true"] {
            let err = interpret_value(ok(body)).unwrap_err();
            assert_eq!(err, FetchError::ShapeMismatch, "{body}");
        }
    }

    #[test]
    fn malformed_body_reports_parser_message() {
        let expected = serde_json::from_str::<Value>("{invalid").unwrap_err().to_string();
        let err = interpret_value(ok("{invalid")).unwrap_err();
        assert_eq!(err, FetchError::Decode(expected));
    }

    #[test]
    fn empty_body_is_a_decode_failure() {
        let err = interpret_value(ok("")).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("EOF"), "{err}");
    }

    #[test]
    fn invalid_utf8_is_a_decode_failure() {
        let mut response = ok("");
        response.body = vec![b'"', 0xff, b'"'];
        assert!(interpret_value(response).unwrap_err().is_decode());
    }

    #[test]
    fn typed_mismatch_is_a_decode_failure() {
        let err = interpret::<Widget>(ok(r#"{"id":"one"}"#)).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn array_passes_shape_check_even_for_object_type() {
        let err = interpret::<Widget>(ok("[]")).unwrap_err();
        assert!(err.is_decode());
        assert!(!err.is_shape_mismatch());
    }
}
