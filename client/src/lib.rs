//! Synchronous client for the Prana service-discovery/proxy sidecar.
//!
//! # Overview
//! Prana runs next to the application as a local companion process. It
//! proxies HTTP requests to named virtual IPs (VIPs) through its
//! load-balancing layer, serves dynamic configuration properties, and
//! lists the hosts registered as UP in Eureka for an application. This
//! crate wraps that local HTTP surface with five calls: `get`, `post`, and
//! `run` forward requests through `/proxy`, `dynamic_properties` reads
//! `/dynamicproperties`, and `hosts` reads `/eureka/hosts`.
//!
//! # Design
//! - `Client` is immutable after construction and holds no call-scoped
//!   state; every operation is one blocking request/response round trip.
//! - Query parameter values cross the wire without percent-encoding,
//!   matching what the sidecar parses.
//! - `dynamic_properties` and `hosts` consume the response body and require
//!   200 OK; the proxy operations return the raw response for any status
//!   and the caller owns its body.
//! - No retries, caching, or default timeouts; transport tuning belongs to
//!   the agent passed to `Client::with_agent`.
//!
//! # Examples
//! ```no_run
//! use prana_client::{Client, DEFAULT_PORT};
//!
//! fn main() -> Result<(), prana_client::Error> {
//!     let client = Client::new(DEFAULT_PORT);
//!     let mut response = client.get("quotes-vip", "/api/quote/random")?;
//!     println!("{}", response.body_mut().read_to_string()?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

pub use client::{Client, DEFAULT_PORT};
pub use error::Error;

// Callers build `run()` requests and `with_agent` configs against the exact
// ureq (and embedded `http`) version this crate links.
pub use ureq;
