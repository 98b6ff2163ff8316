//! Authentication challenge responses.
//!
//! # Responsibilities
//! - Mark a response as 401 Unauthorized
//! - Add a `Basic` challenge unless one is already set
//!
//! # Design Decisions
//! - An existing `WWW-Authenticate` challenge is never overwritten
//! - `Authorization` is removed from the response so no credential is echoed
//! - Applying the challenge twice leaves the same state as applying it once

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::context::ResponseContext;

/// Turns the response into an authentication challenge.
pub fn set_unauthorized<C>(ctx: &mut C)
where
    C: ResponseContext + ?Sized,
{
    if ctx.response_header(&header::WWW_AUTHENTICATE).is_none() {
        ctx.set_response_header(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
    }

    ctx.remove_response_header(&header::AUTHORIZATION);
    ctx.set_status(StatusCode::UNAUTHORIZED);

    tracing::debug!("Response marked unauthorized");
}

/// Empty 401 response carrying the authentication challenge.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::empty());
        set_unauthorized(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::tests::FakeContext;

    #[test]
    fn test_sets_challenge_and_status() {
        let mut ctx = FakeContext::default();
        set_unauthorized(&mut ctx);

        assert_eq!(
            ctx.response_headers.get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Basic"))
        );
        assert!(ctx.response_headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(ctx.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_keeps_existing_challenge() {
        let mut ctx = FakeContext::default();
        ctx.response_headers.insert(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static("Bearer realm=\"api\""),
        );

        set_unauthorized(&mut ctx);

        assert_eq!(
            ctx.response_headers.get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Bearer realm=\"api\""))
        );
        assert_eq!(ctx.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_removes_existing_authorization() {
        let mut ctx = FakeContext::default();
        ctx.response_headers
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer secret"));

        set_unauthorized(&mut ctx);

        assert!(ctx.response_headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_idempotent() {
        let mut once = FakeContext::default();
        set_unauthorized(&mut once);

        let mut twice = FakeContext::default();
        set_unauthorized(&mut twice);
        set_unauthorized(&mut twice);

        assert_eq!(once.response_headers, twice.response_headers);
        assert_eq!(once.status, twice.status);
        assert_eq!(twice.response_headers.len(), 1);
    }

    #[test]
    fn test_unauthorized_into_response() {
        let response = Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Basic"))
        );
        assert!(response.headers().get(header::AUTHORIZATION).is_none());
    }
}
