//! HTTP Basic admin gate, checked on every admin request.

use std::sync::Arc;

use api_ingress::problem::{internal_error, ProblemResponse};
use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::{header, request::Parts, HeaderValue};
use axum::response::{IntoResponse, Response};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::api::rest::error::map_domain_error;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub const BASIC_REALM: &str = r#"Basic realm="rsvp-admin""#;

/// Proof that the request carried the configured admin credentials.
#[derive(Debug, Clone)]
pub struct AdminGuard {
    pub username: String,
}

/// `(username, password)` from an `Authorization: Basic ...` value.
pub fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

pub fn basic_header_value(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// 401 problem plus the `WWW-Authenticate` challenge.
fn challenge(problem: ProblemResponse) -> Response {
    let mut resp = problem.into_response();
    resp.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static(BASIC_REALM),
    );
    resp
}

impl<S> FromRequestParts<S> for AdminGuard
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<Arc<Service>>()
            .cloned()
            .ok_or_else(|| {
                internal_error("rsvp service is not wired into the router").into_response()
            })?;

        let credentials = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_basic);

        let instance = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path().to_string(), |u| u.0.path().to_string());
        let Some((username, password)) = credentials else {
            return Err(challenge(map_domain_error(&DomainError::Unauthorized, &instance)));
        };
        service
            .verify_admin(&username, &password)
            .map_err(|e| challenge(map_domain_error(&e, &instance)))?;

        Ok(AdminGuard { username })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_round_trip_keeps_special_characters() {
        let header = basic_header_value("cla&ago", "29082026");
        assert_eq!(
            parse_basic(&header),
            Some(("cla&ago".to_string(), "29082026".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
        // no colon after decoding
        assert_eq!(parse_basic(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
    }

    #[test]
    fn password_may_contain_colons() {
        let header = basic_header_value("admin", "a:b");
        assert_eq!(parse_basic(&header).map(|(_, p)| p), Some("a:b".to_string()));
    }
}
