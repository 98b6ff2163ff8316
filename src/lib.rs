//! Request context helpers for axum services.
//!
//! Classifies whether a request came from the server's own machine,
//! resolves the originating client IP from proxy headers, and marks
//! responses as requiring authentication.

pub mod config;
pub mod http;
pub mod observability;

pub use config::schema::ServerConfig;
pub use http::context::{ConnectionInfo, RequestContext, ResponseContext};
pub use http::request::{is_local_request, request_ip};
pub use http::response::{set_unauthorized, Unauthorized};
pub use http::HttpServer;
