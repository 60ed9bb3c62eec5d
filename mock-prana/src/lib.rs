//! In-process stand-in for the Prana sidecar's HTTP surface.
//!
//! # Design
//! Serves the three endpoints the client talks to. `/dynamicproperties` and
//! `/eureka/hosts` answer from a [`Sidecar`] fixture configured up front.
//! `/proxy` echoes the forwarded request back as JSON so tests can assert
//! exactly what crossed the wire, except for `/status/{code}` paths, which
//! answer with that bare status.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

/// One Eureka registration: a host serving `app` behind `vip`.
#[derive(Clone, Debug)]
struct Registration {
    app: String,
    vip: String,
    host: String,
}

/// Fixture data the mock answers from.
#[derive(Clone, Debug, Default)]
pub struct Sidecar {
    properties: HashMap<String, String>,
    registry: Vec<Registration>,
    properties_override: Option<(StatusCode, String)>,
}

impl Sidecar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dynamic property under `id`.
    pub fn property(mut self, id: &str, value: &str) -> Self {
        self.properties.insert(id.to_string(), value.to_string());
        self
    }

    /// Register `host` as UP for `app` behind `vip`.
    pub fn host(mut self, app: &str, vip: &str, host: &str) -> Self {
        self.registry.push(Registration {
            app: app.to_string(),
            vip: vip.to_string(),
            host: host.to_string(),
        });
        self
    }

    /// Force `/dynamicproperties` to answer with a fixed status and body,
    /// standing in for a degraded sidecar.
    pub fn properties_response(mut self, status: StatusCode, body: &str) -> Self {
        self.properties_override = Some((status, body.to_string()));
        self
    }
}

type Fixture = Arc<Sidecar>;

pub fn app(sidecar: Sidecar) -> Router {
    Router::new()
        .route("/dynamicproperties", get(dynamic_properties))
        .route("/proxy", any(proxy))
        .route("/eureka/hosts", get(hosts))
        .with_state(Arc::new(sidecar))
}

pub async fn run(listener: TcpListener, sidecar: Sidecar) -> Result<(), std::io::Error> {
    axum::serve(listener, app(sidecar)).await
}

/// First value for `key` among the raw query pairs.
fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

async fn dynamic_properties(
    State(sidecar): State<Fixture>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    if let Some((status, body)) = &sidecar.properties_override {
        return (*status, body.clone()).into_response();
    }

    let mut found = HashMap::new();
    for (key, id) in &params {
        if key == "id" {
            if let Some(value) = sidecar.properties.get(id) {
                found.insert(id.clone(), value.clone());
            }
        }
    }
    Json(found).into_response()
}

/// What `/proxy` echoes back for a forwarded request.
#[derive(Serialize)]
struct ProxyEcho {
    method: String,
    vip: String,
    path: String,
    headers: HashMap<String, String>,
    body: String,
}

async fn proxy(
    method: Method,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let (Some(vip), Some(path)) = (param(&params, "vip"), param(&params, "path")) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    if let Some(code) = path.strip_prefix("/status/") {
        let status = code.parse::<u16>().ok().and_then(|c| StatusCode::from_u16(c).ok());
        return match status {
            Some(status) => status.into_response(),
            None => StatusCode::BAD_REQUEST.into_response(),
        };
    }

    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    Json(ProxyEcho {
        method: method.to_string(),
        vip: vip.to_string(),
        path: path.to_string(),
        headers,
        body,
    })
    .into_response()
}

async fn hosts(
    State(sidecar): State<Fixture>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<String>>, StatusCode> {
    let Some(app) = param(&params, "appName") else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let vip = param(&params, "vip");

    if !sidecar.registry.iter().any(|r| r.app == app) {
        return Err(StatusCode::NOT_FOUND);
    }

    let hosts = sidecar
        .registry
        .iter()
        .filter(|r| r.app == app && vip.map_or(true, |vip| r.vip == vip))
        .map(|r| r.host.clone())
        .collect();

    Ok(Json(hosts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_builder_registers_fixture_data() {
        let sidecar = Sidecar::new().property("a", "1").host("app", "vip", "h1");
        assert_eq!(sidecar.properties["a"], "1");
        assert_eq!(sidecar.registry.len(), 1);
        assert!(sidecar.properties_override.is_none());
    }

    #[test]
    fn properties_response_overrides_the_endpoint() {
        let sidecar = Sidecar::new().properties_response(StatusCode::SERVICE_UNAVAILABLE, "down");
        let (status, body) = sidecar.properties_override.unwrap();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "down");
    }

    #[test]
    fn proxy_echo_serializes_to_json() {
        let echo = ProxyEcho {
            method: "GET".to_string(),
            vip: "quotes-vip".to_string(),
            path: "/api/quote".to_string(),
            headers: HashMap::from([("x-probe".to_string(), "42".to_string())]),
            body: String::new(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["vip"], "quotes-vip");
        assert_eq!(json["path"], "/api/quote");
        assert_eq!(json["headers"]["x-probe"], "42");
        assert_eq!(json["body"], "");
    }

    #[test]
    fn param_returns_first_match() {
        let params = vec![
            ("id".to_string(), "a".to_string()),
            ("id".to_string(), "b".to_string()),
        ];
        assert_eq!(param(&params, "id"), Some("a"));
        assert_eq!(param(&params, "vip"), None);
    }
}
