//! Request gating middleware.

pub mod local_only;

pub use local_only::require_local_request;
