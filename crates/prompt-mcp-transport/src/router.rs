//! HTTP surface: SSE stream leg, POST request leg and liveness.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::Stream;

use crate::{
    auth::{AuthGate, require_auth},
    coordinator::ChannelCoordinator,
    error::GatewayError,
};

/// Path shared by the stream leg (GET) and the request leg (POST).
pub const MCP_PATH: &str = "/mcp";

const SESSION_ID_PARAM: &str = "sessionId";
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Build the server router.
///
/// `GET /` is public; both `/mcp` legs sit behind the auth gate.
///
/// # Example
/// ```ignore
/// let app = create_mcp_router(coordinator, AuthGate::from_list("secret"));
/// axum::serve(listener, app).await?;
/// ```
pub fn create_mcp_router(coordinator: Arc<ChannelCoordinator>, gate: AuthGate) -> Router {
    let protected = Router::new()
        .route(MCP_PATH, get(open_stream).post(post_message))
        .route_layer(middleware::from_fn_with_state(gate, require_auth))
        .with_state(coordinator);

    Router::new().route("/", get(liveness)).merge(protected)
}

async fn liveness() -> &'static str {
    "OK"
}

async fn open_stream(
    State(coordinator): State<Arc<ChannelCoordinator>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let session = coordinator.open();
    Sse::new(session.stream.into_sse_stream())
        .keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

async fn post_message(
    State(coordinator): State<Arc<ChannelCoordinator>>,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), GatewayError> {
    let session_id = session_id_param(&params)?;
    coordinator.route(session_id, &body)?;
    Ok((StatusCode::ACCEPTED, "Accepted"))
}

/// Extract the correlation id. Absent, empty and repeated values are all
/// rejected before the registry is consulted.
fn session_id_param(params: &[(String, String)]) -> Result<&str, GatewayError> {
    let mut values = params
        .iter()
        .filter(|(key, _)| key == SESSION_ID_PARAM)
        .map(|(_, value)| value.as_str());

    match (values.next(), values.next()) {
        (Some(id), None) if !id.is_empty() => Ok(id),
        _ => Err(GatewayError::BadRequest("Missing sessionId".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_session_id_param() {
        assert_eq!(
            session_id_param(&params(&[("sessionId", "abc")])),
            Ok("abc")
        );
        assert_eq!(
            session_id_param(&params(&[("other", "1"), ("sessionId", "abc")])),
            Ok("abc")
        );
    }

    #[test]
    fn test_session_id_param_rejects() {
        let missing = Err(GatewayError::BadRequest("Missing sessionId".into()));
        assert_eq!(session_id_param(&params(&[])), missing);
        assert_eq!(session_id_param(&params(&[("sessionId", "")])), missing);
        assert_eq!(session_id_param(&params(&[("sessionid", "abc")])), missing);
        assert_eq!(
            session_id_param(&params(&[("sessionId", "a"), ("sessionId", "b")])),
            missing
        );
    }
}
