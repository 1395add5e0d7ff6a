//! Gateway: validate the posted CEP, then relay the weather service's answer.

use crate::GatewayState;
use crate::error::ApiError;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use lookup_clients::endpoint;
use lookup_clients::propagation::trace_headers;
use lookup_core::{Deadline, Identifier};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/", post(forward))
        .route("/echo", post(echo))
}

#[derive(Debug, Deserialize)]
struct CepRequest {
    cep: String,
}

/// Decode `{"cep": ...}` and validate it. `None` for anything unusable.
fn parse_cep(body: &[u8]) -> Option<Identifier> {
    if body.is_empty() {
        return None;
    }
    let request: CepRequest = serde_json::from_slice(body).ok()?;
    Identifier::parse(&request.cep).ok()
}

/// Downstream answer, relayed untouched.
struct Relayed {
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        (self.status, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
    }
}

async fn forward(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Relayed, ApiError> {
    let Some(cep) = body.ok().as_deref().and_then(parse_cep) else {
        info!("rejected gateway request with invalid zipcode");
        return Err(ApiError::InvalidZipcode);
    };

    let deadline = Deadline::after(state.request_budget);
    let _guard = deadline.guard();
    let url = endpoint(&state.weather_url, &format!("weather/{cep}"));

    let call = async {
        let response = state
            .client
            .get(&url)
            .headers(trace_headers())
            .send()
            .await?;
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;
        Ok::<_, reqwest::Error>(Relayed {
            status,
            content_type,
            body,
        })
    };

    match deadline.run(call).await {
        Ok(Ok(relayed)) => {
            info!(%cep, status = relayed.status.as_u16(), "relayed weather response");
            Ok(relayed)
        }
        Ok(Err(e)) => {
            warn!(%cep, %url, error = %e, "weather service call failed");
            Err(ApiError::WeatherUnavailable)
        }
        Err(e) => {
            warn!(%cep, %url, budget = ?state.request_budget, error = %e, "weather service deadline exceeded");
            Err(ApiError::WeatherUnavailable)
        }
    }
}

/// Diagnostic: report what the gateway received.
async fn echo(headers: HeaderMap, body: Result<Bytes, BytesRejection>) -> Json<Value> {
    let body = body.unwrap_or_default();
    let json_cep = serde_json::from_slice::<CepRequest>(&body)
        .map(|r| r.cep)
        .unwrap_or_default();
    let ctype = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    Json(json!({
        "raw": String::from_utf8_lossy(&body),
        "json_cep": json_cep,
        "len_bytes": body.len(),
        "ctype": ctype,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::gateway_router;
    use axum::body::{Body, to_bytes};
    use axum::extract::Path;
    use axum::http::Request;
    use axum::routing::get;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tower::ServiceExt;
    use url::Url;

    /// In-process stand-in for the weather service, counting calls.
    async fn spawn_weather_stub(calls: Arc<AtomicUsize>) -> SocketAddr {
        let app = Router::new().route(
            "/weather/{cep}",
            get(move |Path(cep): Path<String>| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if cep == "99999999" {
                        let mut response = Response::new(Body::from("can not find zipcode"));
                        *response.status_mut() = StatusCode::NOT_FOUND;
                        return response;
                    }
                    (
                        [(header::CONTENT_TYPE, "application/json")],
                        r#"{"city":"Goiania","temp_C":25,"temp_F":77,"temp_K":298}"#,
                    )
                        .into_response()
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn app(addr: SocketAddr) -> Router {
        gateway_router(GatewayState {
            client: reqwest::Client::new(),
            weather_url: Url::parse(&format!("http://{addr}")).unwrap(),
            request_budget: Duration::from_secs(8),
        })
    }

    async fn post(app: Router, uri: &str, body: &'static str) -> (StatusCode, Option<String>, Vec<u8>) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let ctype = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, ctype, body.to_vec())
    }

    #[test]
    fn test_parse_cep() {
        assert_eq!(parse_cep(br#"{"cep":"29902555"}"#).unwrap().as_str(), "29902555");
        assert!(parse_cep(b"").is_none());
        assert!(parse_cep(b"{").is_none());
        assert!(parse_cep(br#"{"cep":29902555}"#).is_none());
        assert!(parse_cep(br#"{"cep":"2990255"}"#).is_none());
        assert!(parse_cep(br#"{"zip":"29902555"}"#).is_none());
    }

    #[tokio::test]
    async fn test_relays_weather_response() {
        let calls = Arc::new(AtomicUsize::new(0));
        let addr = spawn_weather_stub(calls.clone()).await;

        let (status, ctype, body) = post(app(addr), "/", r#"{"cep":"74000000"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ctype.as_deref(), Some("application/json"));
        assert_eq!(body, br#"{"city":"Goiania","temp_C":25,"temp_F":77,"temp_K":298}"#);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_relays_error_status_with_default_content_type() {
        let calls = Arc::new(AtomicUsize::new(0));
        let addr = spawn_weather_stub(calls.clone()).await;

        let (status, ctype, body) = post(app(addr), "/", r#"{"cep":"99999999"}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(ctype.as_deref(), Some("application/json"));
        assert_eq!(body, b"can not find zipcode");
    }

    #[tokio::test]
    async fn test_invalid_body_makes_no_outbound_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let addr = spawn_weather_stub(calls.clone()).await;

        for body in ["", "{not json", r#"{"cep":"123"}"#, r#"{"cep":"abcdefgh"}"#, r#"{"cep":12345678}"#] {
            let (status, _, response) = post(app(addr), "/", body).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {body:?}");
            assert_eq!(response, b"invalid zipcode");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreachable_weather_service() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, _, body) = post(app(addr), "/", r#"{"cep":"74000000"}"#).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, b"service b unavailable");
    }

    #[tokio::test]
    async fn test_echo() {
        let calls = Arc::new(AtomicUsize::new(0));
        let addr = spawn_weather_stub(calls.clone()).await;

        let (status, _, body) = post(app(addr), "/echo", r#"{"cep":"29902555"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "raw": r#"{"cep":"29902555"}"#,
                "json_cep": "29902555",
                "len_bytes": 18,
                "ctype": "application/json",
            })
        );

        let (_, _, body) = post(app(addr), "/echo", "garbage").await;
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["json_cep"], "");
        assert_eq!(value["len_bytes"], 7);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejects_get() {
        let calls = Arc::new(AtomicUsize::new(0));
        let addr = spawn_weather_stub(calls).await;
        let response = app(addr)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
