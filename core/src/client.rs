//! Callback-style entry points and the async `fetch` they are built on.
//!
//! # Design
//! `Client` holds only a transport and a tokio runtime handle, and carries
//! no state between calls. Each entry point builds its request on the
//! calling thread, so an unusable URL or header is reported before anything is
//! spawned, then moves the request, key path and callbacks into one
//! detached task. That task invokes exactly one of the success callback or
//! the delegate and is dropped when it finishes.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use url::Url;

use crate::delegate::ErrorDelegate;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::keypath::KeyPath;
use crate::request::{build_request, StringMap};
use crate::response::parse_response;
use crate::transport::{ReqwestTransport, Transport};

/// Shared handle to an error delegate.
pub type Delegate = Arc<dyn ErrorDelegate>;

#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    runtime: Handle,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Client that sends with a default `reqwest::Client` and runs
    /// completions on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self::with_transport(runtime, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(runtime: Handle, transport: Arc<dyn Transport>) -> Self {
        Self { transport, runtime }
    }

    pub fn get<M, F>(
        &self,
        delegate: Option<Delegate>,
        path: &str,
        url: &str,
        headers: Option<&StringMap>,
        parameters: Option<&StringMap>,
        success: F,
    ) where
        M: DeserializeOwned + Send + 'static,
        F: FnOnce(M) + Send + 'static,
    {
        self.dispatch(delegate, HttpMethod::Get, path, url, headers, parameters, success);
    }

    pub fn post<M, F>(
        &self,
        delegate: Option<Delegate>,
        path: &str,
        url: &str,
        headers: Option<&StringMap>,
        parameters: Option<&StringMap>,
        success: F,
    ) where
        M: DeserializeOwned + Send + 'static,
        F: FnOnce(M) + Send + 'static,
    {
        self.dispatch(delegate, HttpMethod::Post, path, url, headers, parameters, success);
    }

    pub fn put<M, F>(
        &self,
        delegate: Option<Delegate>,
        path: &str,
        url: &str,
        headers: Option<&StringMap>,
        parameters: Option<&StringMap>,
        success: F,
    ) where
        M: DeserializeOwned + Send + 'static,
        F: FnOnce(M) + Send + 'static,
    {
        self.dispatch(delegate, HttpMethod::Put, path, url, headers, parameters, success);
    }

    pub fn delete<M, F>(
        &self,
        delegate: Option<Delegate>,
        path: &str,
        url: &str,
        headers: Option<&StringMap>,
        success: F,
    ) where
        M: DeserializeOwned + Send + 'static,
        F: FnOnce(M) + Send + 'static,
    {
        self.dispatch(delegate, HttpMethod::Delete, path, url, headers, None, success);
    }

    /// Build, send and decode one request, returning the model or the
    /// detailed error instead of invoking callbacks.
    pub async fn fetch<M: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        url: &str,
        headers: Option<&StringMap>,
        parameters: Option<&StringMap>,
    ) -> Result<M, ApiError> {
        let request = build_request(method, url, headers, parameters)?;
        execute(self.transport.as_ref(), request, &KeyPath::new(path)).await
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch<M, F>(
        &self,
        delegate: Option<Delegate>,
        method: HttpMethod,
        path: &str,
        url: &str,
        headers: Option<&StringMap>,
        parameters: Option<&StringMap>,
        success: F,
    ) where
        M: DeserializeOwned + Send + 'static,
        F: FnOnce(M) + Send + 'static,
    {
        let request = match build_request(method, url, headers, parameters) {
            Ok(request) => request,
            Err(err) => {
                report(delegate.as_deref(), &err);
                return;
            }
        };

        let key_path = KeyPath::new(path);
        let transport = Arc::clone(&self.transport);
        self.runtime.spawn(async move {
            match execute::<M>(transport.as_ref(), request, &key_path).await {
                Ok(model) => success(model),
                Err(err) => report(delegate.as_deref(), &err),
            }
        });
    }
}

async fn execute<M: DeserializeOwned>(
    transport: &dyn Transport,
    request: HttpRequest,
    path: &KeyPath,
) -> Result<M, ApiError> {
    let method = request.method;
    let endpoint = log_target(&request.url);
    debug!(%method, %endpoint, path = %path, "sending request");
    let result = parse_response(transport.execute(request).await, path);
    if let Err(err) = &result {
        debug!(%method, %endpoint, error = %err, "request failed");
    }
    result
}

/// Host and path only. Query strings and userinfo may carry credentials.
fn log_target(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or_default(), url.path())
}

fn report(delegate: Option<&dyn ErrorDelegate>, err: &ApiError) {
    match delegate {
        Some(delegate) => delegate.on_error(err.kind()),
        None => warn!(kind = ?err.kind(), error = %err, "request failed with no error delegate"),
    }
}
