//! Write-payload extraction
//!
//! Write endpoints accept either a JSON body or a urlencoded form; both
//! decode into one JSON value handed to form validation. A missing body is
//! an empty object so that schemas with defaults can still validate.

use axum::{
    body::Bytes,
    extract::FromRequest,
    http::{header, Request},
};
use serde_json::{Map, Value};

use crate::errors::WebError;

/// The decoded write payload of a request.
#[derive(Debug, Clone)]
pub struct WritePayload(pub Value);

#[async_trait::async_trait]
impl<S> FromRequest<S> for WritePayload
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request<axum::body::Body>, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| WebError::bad_request(format!("unreadable request body: {}", err)))?;

        if bytes.is_empty() {
            return Ok(WritePayload(Value::Object(Map::new())));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let mut object = Map::new();
            for (key, value) in url::form_urlencoded::parse(&bytes) {
                object.insert(key.into_owned(), Value::from(value.into_owned()));
            }
            return Ok(WritePayload(Value::Object(object)));
        }

        // everything else is treated as JSON
        serde_json::from_slice(&bytes)
            .map(WritePayload)
            .map_err(|err| WebError::bad_request(format!("malformed JSON payload: {}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn extract(content_type: &str, body: &str) -> Result<Value, WebError> {
        let request = Request::builder()
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        WritePayload::from_request(request, &()).await.map(|p| p.0)
    }

    #[tokio::test]
    async fn json_bodies_decode() {
        let value = extract("application/json", r#"{"name": "Nigeria"}"#).await.unwrap();
        assert_eq!(value["name"], "Nigeria");
        assert!(extract("application/json", "{not json").await.is_err());
    }

    #[tokio::test]
    async fn form_bodies_decode_as_string_fields() {
        let value = extract("application/x-www-form-urlencoded", "name=Nigeria&enabled=true")
            .await
            .unwrap();
        assert_eq!(value["name"], "Nigeria");
        assert_eq!(value["enabled"], "true");
    }

    #[tokio::test]
    async fn empty_bodies_become_empty_objects() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let payload = WritePayload::from_request(request, &()).await.unwrap();
        assert_eq!(payload.0, Value::Object(Map::new()));
    }
}
