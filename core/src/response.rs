//! Response validation and path-scoped decoding.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, TransportError};
use crate::http::HttpResponse;
use crate::keypath::KeyPath;

/// Turn one transport outcome into exactly one result.
///
/// Transport failures are classified first, then the status, and only a 2xx
/// body is ever parsed.
pub fn parse_response<M: DeserializeOwned>(
    outcome: Result<HttpResponse, TransportError>,
    path: &KeyPath,
) -> Result<M, ApiError> {
    let response = outcome?;
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
        });
    }
    extract(&response.body, path)
}

/// Parse `body` as JSON and decode the fragment found at `path`.
pub fn extract<M: DeserializeOwned>(body: &[u8], path: &KeyPath) -> Result<M, ApiError> {
    let document: Value = serde_json::from_slice(body).map_err(ApiError::MalformedBody)?;
    let fragment = path
        .resolve(&document)
        .ok_or_else(|| ApiError::PathNotFound(path.to_string()))?;
    serde_json::from_value(fragment).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        full_name: String,
        #[serde(default)]
        nick_name: Option<String>,
    }

    fn ok(body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(200, body))
    }

    #[test]
    fn decodes_fragment_at_path() {
        let person: Person =
            parse_response(ok(r#"{"data":{"name":"Ada"}}"#), &KeyPath::new("data")).unwrap();
        assert_eq!(person.name, "Ada");
    }

    #[test]
    fn missing_path_is_bad_parsing() {
        let err = parse_response::<Person>(ok(r#"{"data":{"name":"Ada"}}"#), &KeyPath::new("missing"))
            .unwrap_err();
        assert!(matches!(err, ApiError::PathNotFound(ref p) if p == "missing"));
        assert_eq!(err.kind(), ErrorType::BadParsing);
    }

    #[test]
    fn non_json_body_is_bad_parsing() {
        let err = parse_response::<Person>(ok("not json"), &KeyPath::new("data")).unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
        assert_eq!(err.kind(), ErrorType::BadParsing);
    }

    #[test]
    fn type_mismatch_is_bad_parsing() {
        let err = parse_response::<Person>(ok(r#"{"data":{"name":42}}"#), &KeyPath::new("data"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert_eq!(err.kind(), ErrorType::BadParsing);
    }

    #[test]
    fn missing_required_field_is_bad_parsing() {
        let err = parse_response::<Person>(ok(r#"{"data":{}}"#), &KeyPath::new("data")).unwrap_err();
        assert_eq!(err.kind(), ErrorType::BadParsing);
    }

    #[test]
    fn non_2xx_is_unknown_even_with_valid_body() {
        let outcome = Ok(HttpResponse::new(404, r#"{"data":{"name":"Ada"}}"#));
        let err = parse_response::<Person>(outcome, &KeyPath::new("data")).unwrap_err();
        assert_eq!(err.kind(), ErrorType::Unknown);
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn redirect_and_server_errors_are_unknown() {
        for status in [301, 500, 503] {
            let outcome = Ok(HttpResponse::new(status, "{}"));
            let err = parse_response::<Person>(outcome, &KeyPath::new("data")).unwrap_err();
            assert_eq!(err.kind(), ErrorType::Unknown, "{status}");
        }
    }

    #[test]
    fn transport_failures_keep_their_kind() {
        let err = parse_response::<Person>(
            Err(TransportError::Connection("refused".into())),
            &KeyPath::new("data"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorType::Network);

        let err = parse_response::<Person>(
            Err(TransportError::Incomplete("body cut short".into())),
            &KeyPath::new("data"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorType::Server);
    }

    #[test]
    fn snake_case_keys_map_to_fields() {
        let body = r#"{"data":{"profile":{"full_name":"Ada Lovelace"}}}"#;
        let profile: Profile = extract(body.as_bytes(), &KeyPath::new("data.profile")).unwrap();
        assert_eq!(
            profile,
            Profile {
                full_name: "Ada Lovelace".to_string(),
                nick_name: None,
            }
        );
    }

    #[test]
    fn only_the_fragment_is_decoded() {
        // The sibling `meta` would not decode as Person; it must be ignored.
        let body = r#"{"meta":{"name":1},"data":{"name":"Ada"}}"#;
        let person: Person = extract(body.as_bytes(), &KeyPath::new("data")).unwrap();
        assert_eq!(person.name, "Ada");
    }

    #[test]
    fn array_fragments_decode_into_vec() {
        let body = r#"{"data":{"users":[{"name":"Ada"},{"name":"Grace"}]}}"#;
        let people: Vec<Person> = extract(body.as_bytes(), &KeyPath::new("data.users")).unwrap();
        assert_eq!(people.len(), 2);
        let names: Vec<String> = extract(body.as_bytes(), &KeyPath::new("data.users.name")).unwrap();
        assert_eq!(names, ["Ada", "Grace"]);
    }

    #[test]
    fn empty_path_looks_up_the_empty_key() {
        let person: Person = extract(br#"{"":{"name":"Ada"}}"#, &KeyPath::new("")).unwrap();
        assert_eq!(person.name, "Ada");

        let err = extract::<Person>(br#"{"name":"Ada"}"#, &KeyPath::new("")).unwrap_err();
        assert!(matches!(err, ApiError::PathNotFound(ref p) if p.is_empty()));
        assert_eq!(err.kind(), ErrorType::BadParsing);
    }

    #[test]
    fn null_fragment_decodes_into_option() {
        let value: Option<Person> = extract(br#"{"data":null}"#, &KeyPath::new("data")).unwrap();
        assert!(value.is_none());
    }
}
