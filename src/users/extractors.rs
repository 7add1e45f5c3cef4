use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::users::error::UserError;

/// JSON body that treats a missing or blank body as `T::default()` and turns
/// every other failure into a `UserError`, so clients always get the JSON
/// error shape. The content type is not checked.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = UserError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "failed to read request body");
            UserError::Validation("Invalid request body".into())
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            warn!(error = %e, "malformed JSON body");
            UserError::Validation("Invalid request body".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Payload {
        name: Option<String>,
    }

    async fn extract(body: &'static str) -> Result<Payload, UserError> {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();
        JsonBody::<Payload>::from_request(req, &()).await.map(|JsonBody(b)| b)
    }

    #[tokio::test]
    async fn blank_body_is_default() {
        assert!(extract("").await.unwrap().name.is_none());
        assert!(extract("  \n").await.unwrap().name.is_none());
    }

    #[tokio::test]
    async fn parses_without_content_type() {
        let b = extract(r#"{"name":"A"}"#).await.unwrap();
        assert_eq!(b.name.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn malformed_body_is_validation_error() {
        for raw in ["{", r#"{"name":1}"#, "null"] {
            assert!(matches!(extract(raw).await, Err(UserError::Validation(_))));
        }
    }
}
