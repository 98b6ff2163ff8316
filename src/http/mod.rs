//! HTTP request context subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect info captured at accept)
//!     → context.rs (remote/local address + header access)
//!     → request.rs (local classification, client IP resolution)
//!     → middleware/ (local-only gate)
//!     → response.rs (401 challenge)
//!     → Send to client
//! ```

pub mod context;
pub mod extract;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use context::{ConnectionInfo, RequestContext, ResponseContext};
pub use extract::{ClientIp, LocalRequest};
pub use request::{is_local_request, request_ip, CF_CONNECTING_IP, X_FORWARDED_FOR};
pub use response::{set_unauthorized, Unauthorized};
pub use server::HttpServer;
