//! Synchronous client for the Prana sidecar HTTP API.
//!
//! # Design
//! `Client` holds a `base_url` pointing at the local sidecar and a
//! `ureq::Agent` that executes every round trip. No state is carried
//! between calls: each operation validates its arguments, formats one URL,
//! and performs a single blocking request. Query parameter values are not
//! percent-encoded; the sidecar expects the raw strings, and escaping them
//! would change what it parses.
//!
//! Response-body ownership is asymmetric on purpose. `dynamic_properties`
//! and `hosts` consume and decode the body themselves; `get`, `post`, and
//! `run` return the raw response and the caller owns its body (dropping the
//! response releases the connection).

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use tracing::debug;
use ureq::http::{Request, Response, StatusCode, Uri};
use ureq::{Agent, AsSendBody, Body, SendBody};

use crate::error::Error;

/// Default Prana sidecar port.
pub const DEFAULT_PORT: u16 = 8078;

/// Synchronous client for a Prana sidecar listening on localhost.
///
/// Cheap to clone; clones share the underlying agent and its connection
/// pool. All operations take `&self`, so one client can serve concurrent
/// callers.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    agent: Agent,
}

impl Client {
    /// Returns a client for the sidecar on `port`, with a default transport.
    ///
    /// No timeouts are configured: a call blocks until the sidecar answers
    /// or the connection fails. Construction itself cannot fail.
    pub fn new(port: u16) -> Self {
        // Non-2xx statuses must come back as responses, not transport
        // errors: the proxy operations hand them to the caller unmodified.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(port, agent)
    }

    /// Returns a client for the sidecar on `port` that executes requests
    /// through the caller's `agent`, for custom timeouts or pool settings.
    ///
    /// Build the agent with `http_status_as_error(false)`; otherwise the
    /// transport turns non-2xx proxy responses into errors instead of
    /// returning them for inspection.
    pub fn with_agent(port: u16, agent: Agent) -> Self {
        Self {
            base_url: format!("http://localhost:{port}"),
            agent,
        }
    }

    /// Fetches the dynamic configuration properties named by `ids` and
    /// returns the id-to-value mapping the sidecar answered with.
    ///
    /// Fails with `Error::InvalidArgument` when `ids` is empty, before any
    /// network activity, and with `Error::Status` when the sidecar answers
    /// anything other than 200 OK.
    pub fn dynamic_properties(&self, ids: &[&str]) -> Result<HashMap<String, String>, Error> {
        if ids.is_empty() {
            return Err(Error::InvalidArgument("ids"));
        }

        let url = self.properties_url(ids);
        debug!(%url, "requesting dynamic properties");
        let mut response = self.agent.get(&url).call()?;
        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "sidecar refused dynamic properties");
            return Err(Error::Status(response.status()));
        }

        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Sends a GET request to `path` on the service behind `vip` and
    /// returns the raw response, whatever its status.
    ///
    /// The caller owns the response body.
    pub fn get(&self, vip: &str, path: &str) -> Result<Response<Body>, Error> {
        ensure_target(vip, path)?;

        let url = self.proxy_url(vip, path);
        debug!(%url, "proxying GET");
        Ok(self.agent.get(&url).call()?)
    }

    /// Sends a POST request to `path` on the service behind `vip`, with
    /// `body_type` as its content type and `body` streamed through to the
    /// transport unmodified. The body is consumed by the call.
    ///
    /// Returns the raw response, whatever its status; the caller owns the
    /// response body.
    pub fn post(
        &self,
        vip: &str,
        path: &str,
        body_type: &str,
        mut body: impl Read,
    ) -> Result<Response<Body>, Error> {
        ensure_target(vip, path)?;

        let url = self.proxy_url(vip, path);
        debug!(%url, content_type = body_type, "proxying POST");
        Ok(self
            .agent
            .post(&url)
            .content_type(body_type)
            .send(SendBody::from_reader(&mut body))?)
    }

    /// Executes a caller-built request against `path` on the service behind
    /// `vip`. Only the request's URI is replaced; method, headers, and body
    /// are sent exactly as supplied.
    ///
    /// Returns the raw response, whatever its status; the caller owns the
    /// response body.
    pub fn run(
        &self,
        vip: &str,
        path: &str,
        mut request: Request<impl AsSendBody>,
    ) -> Result<Response<Body>, Error> {
        ensure_target(vip, path)?;

        let url = self.proxy_url(vip, path);
        *request.uri_mut() = url.parse::<Uri>()?;
        debug!(%url, method = %request.method(), "proxying prepared request");
        Ok(self.agent.run(request)?)
    }

    /// Lists the hostnames registered as UP for `app_name`, narrowed to the
    /// given `vip` when one is supplied.
    ///
    /// Fails with `Error::InvalidArgument` when `app_name` is empty, before
    /// any network activity, and with `Error::Status` when the sidecar
    /// answers anything other than 200 OK.
    pub fn hosts(&self, app_name: &str, vip: Option<&str>) -> Result<Vec<String>, Error> {
        if app_name.is_empty() {
            return Err(Error::InvalidArgument("appName"));
        }

        let url = self.hosts_url(app_name, vip);
        debug!(%url, "requesting registered hosts");
        let mut response = self.agent.get(&url).call()?;
        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), "sidecar refused host lookup");
            return Err(Error::Status(response.status()));
        }

        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn properties_url(&self, ids: &[&str]) -> String {
        let query: Vec<String> = ids.iter().map(|id| format!("id={id}")).collect();
        format!("{}/dynamicproperties?{}", self.base_url, query.join("&"))
    }

    fn proxy_url(&self, vip: &str, path: &str) -> String {
        format!("{}/proxy?vip={vip}&path={path}", self.base_url)
    }

    fn hosts_url(&self, app_name: &str, vip: Option<&str>) -> String {
        let mut url = format!("{}/eureka/hosts?appName={app_name}", self.base_url);
        if let Some(vip) = vip.filter(|vip| !vip.is_empty()) {
            url.push_str("&vip=");
            url.push_str(vip);
        }
        url
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Both proxy coordinates are required; the sidecar cannot route without them.
fn ensure_target(vip: &str, path: &str) -> Result<(), Error> {
    if vip.is_empty() || path.is_empty() {
        return Err(Error::InvalidArgument("vip or path"));
    }
    Ok(())
}
