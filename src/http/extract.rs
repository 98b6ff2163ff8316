//! Axum extractors for request origin.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::http::request::{is_local_request, request_ip};

/// Originating client IP, if any source reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(request_ip(&*parts)))
    }
}

/// Whether the request came from this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalRequest(pub bool);

impl<S> FromRequestParts<S> for LocalRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(is_local_request(&*parts)))
    }
}
