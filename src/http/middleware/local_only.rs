//! Local-only Middleware.
//! Restricts routes to requests originating on this machine.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::http::context::RequestContext;
use crate::http::request::is_local_request;
use crate::http::response::Unauthorized;

/// Passes requests from this machine through; everything else gets the
/// 401 `Basic` challenge.
///
/// Locality comes from the connection addresses only. A router served
/// without connect info has neither address, and such requests count as
/// local, so the gate lets them through. Serve with
/// `into_make_service_with_connect_info::<ConnectionInfo>()`.
pub async fn require_local_request(request: Request, next: Next) -> Response {
    if is_local_request(&request) {
        return next.run(request).await;
    }

    warn!(
        remote = ?request.remote_ip(),
        local = ?request.local_ip(),
        path = %request.uri().path(),
        "Rejected non-local request"
    );
    Unauthorized.into_response()
}
