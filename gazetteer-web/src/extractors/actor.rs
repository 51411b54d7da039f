//! Current-actor extraction
//!
//! Authentication is external to the engine; whatever fronts it is expected
//! to identify the caller through the `X-Actor-Id` / `X-Actor-Name` headers.
//! Absent headers yield an anonymous request, which the permission policies
//! decide how to treat.

use axum::{extract::FromRequestParts, http::request::Parts};
use gazetteer_interfaces::Actor;

/// Optional current actor, resolved from request headers.
#[derive(Debug, Clone, Default)]
pub struct CurrentActor(pub Option<Actor>);

pub const ACTOR_ID_HEADER: &str = "X-Actor-Id";
pub const ACTOR_NAME_HEADER: &str = "X-Actor-Name";

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok());

        let actor = id.map(|id| Actor {
            id,
            name: parts
                .headers
                .get(ACTOR_NAME_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string(),
        });

        Ok(CurrentActor(actor))
    }
}
