//! JSON extractor that reports every decoding failure as 400

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON extractor/responder.
///
/// Unlike `axum::Json` it does not require a `Content-Type` header and maps
/// syntax errors, type mismatches and missing fields alike to `400 Bad Request`.
/// Body transport failures keep their own status (e.g. 413 over the body limit).
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// Request body could not be decoded
#[derive(Debug)]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for DecodeError {
    fn into_response(self) -> Response {
        ApiError::bad_request(format!("Invalid JSON format: {}", self.message)).into_response()
    }
}

#[derive(Debug)]
pub enum JsonRejection {
    /// Body could not be read at all
    Body(BytesRejection),
    Decode(DecodeError),
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Body(rejection) => {
                ApiError::new(rejection.status(), rejection.body_text()).into_response()
            }
            Self::Decode(err) => err.into_response(),
        }
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(JsonRejection::Body)?;

        decode(&bytes).map(Json).map_err(JsonRejection::Decode)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(|e| DecodeError {
        message: e.to_string(),
    })
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        message: String,
    }

    async fn echo(Json(payload): Json<Payload>) -> String {
        payload.message
    }

    async fn post_body(body: impl Into<Body>) -> Response {
        Router::new()
            .route("/", post(echo))
            .oneshot(Request::post("/").body(body.into()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_decode_valid_body() {
        let payload: Payload = decode(br#"{"message": "hi"}"#).unwrap();
        assert_eq!(payload.message, "hi");
    }

    #[test]
    fn test_decode_rejects_syntax_and_shape_errors() {
        assert!(decode::<Payload>(b"not json").is_err());
        assert!(decode::<Payload>(b"{}").is_err());
        assert!(decode::<Payload>(b"").is_err());
    }

    #[test]
    fn test_decode_error_is_bad_request() {
        let err = decode::<Payload>(b"not json").unwrap_err();
        assert!(!err.message().is_empty());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extractor_accepts_body_without_content_type() {
        let response = post_body(r#"{"message": "hi"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_oversized_body_keeps_payload_too_large() {
        let body = format!(r#"{{"message": "{}"}}"#, "a".repeat(3 * 1024 * 1024));

        let response = post_body(body).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
