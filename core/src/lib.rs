//! Path-scoped JSON requests over HTTP.
//!
//! # Overview
//! Issues GET/POST/PUT/DELETE requests, picks a sub-value out of the JSON
//! response by a dotted key path (`"data.user"`), and decodes only that
//! fragment into a caller-supplied serde model. Results arrive through a
//! one-shot success callback or a single-method error delegate; async
//! callers can use [`Client::fetch`] instead.
//!
//! # Design
//! - `request` builds an `HttpRequest` from plain inputs and never does I/O.
//! - `transport` is the only place bytes cross the network.
//! - `response` turns a transport outcome into a model or an `ApiError`.
//! - `Client` glues the three together, one detached task per request.
//! - No retries, caching or timeouts of its own; configure those on the
//!   `reqwest::Client` handed to `ReqwestTransport::with_client`.

pub mod client;
pub mod delegate;
pub mod error;
pub mod http;
pub mod keypath;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{Client, Delegate};
pub use delegate::ErrorDelegate;
pub use error::{ApiError, ErrorType, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use keypath::KeyPath;
pub use request::{build_request, StringMap};
pub use response::{extract, parse_response};
pub use transport::{ReqwestTransport, Transport};
