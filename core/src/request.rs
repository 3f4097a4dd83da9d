//! Request construction.
//!
//! Turns a method, URL string and optional header/parameter maps into an
//! [`HttpRequest`]. GET parameters go to the query string; every other
//! method sends them as a JSON object body. Nothing is added that the caller
//! did not pass, so there is no implicit `content-type`. Header names and
//! values are checked here so a request that could never be sent fails
//! before any task is spawned.

use std::collections::BTreeMap;

use reqwest::header::{HeaderName, HeaderValue};
use serde_json::{Map, Value};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

/// String-to-string map used for headers and parameters.
///
/// Ordered so that query strings and bodies come out the same on every run.
pub type StringMap = BTreeMap<String, String>;

/// Build a request, failing when `url` is not an absolute http(s) URL or a
/// header is not valid on the wire.
pub fn build_request(
    method: HttpMethod,
    url: &str,
    headers: Option<&StringMap>,
    parameters: Option<&StringMap>,
) -> Result<HttpRequest, ApiError> {
    let mut url = parse_url(url)?;
    let mut body = None;

    match (method, parameters) {
        (_, None) => {}
        (_, Some(params)) if params.is_empty() => {}
        (HttpMethod::Get, Some(params)) => {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        (_, Some(params)) => {
            body = Some(json_body(params));
        }
    }

    let headers = match headers {
        Some(h) => h
            .iter()
            .map(|(k, v)| check_header(k, v).map(|()| (k.clone(), v.clone())))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(HttpRequest {
        method,
        url,
        headers,
        body,
    })
}

fn parse_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw).map_err(|source| ApiError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::UnsupportedScheme(other.to_string())),
    }
}

fn check_header(name: &str, value: &str) -> Result<(), ApiError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ApiError::InvalidRequest(format!("header name {name:?}: {e}")))?;
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::InvalidRequest(format!("header {name:?} value: {e}")))?;
    Ok(())
}

fn json_body(params: &StringMap) -> String {
    let object: Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    Value::Object(object).to_string()
}
