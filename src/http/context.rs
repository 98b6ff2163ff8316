//! Request and response capabilities consumed by the helpers.
//!
//! # Responsibilities
//! - Expose the connection's remote and local addresses
//! - Expose request header lookup
//! - Expose response header and status mutation
//!
//! # Design Decisions
//! - Read and write sides are separate traits so helpers only borrow what they touch
//! - Addresses are optional everywhere; absence is a valid state
//! - Connection addresses travel in request extensions via axum's `ConnectInfo`

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{
        connect_info::{Connected, MockConnectInfo},
        ConnectInfo,
    },
    http::{request::Parts, Extensions, HeaderName, HeaderValue, Request, Response, StatusCode},
    serve::IncomingStream,
};
use tokio::net::TcpListener;

/// Read access to an inbound request and its connection.
pub trait RequestContext {
    /// Address of the peer that opened the connection.
    fn remote_ip(&self) -> Option<IpAddr>;

    /// Address the server accepted the connection on.
    fn local_ip(&self) -> Option<IpAddr>;

    /// First value of the named request header.
    fn request_header(&self, name: &HeaderName) -> Option<&HeaderValue>;
}

/// Write access to an outbound response.
pub trait ResponseContext {
    fn response_header(&self, name: &HeaderName) -> Option<&HeaderValue>;

    /// Replaces every existing value of the header.
    fn set_response_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Drops every value of the header.
    fn remove_response_header(&mut self, name: &HeaderName);

    fn set_status(&mut self, status: StatusCode);
}

/// Both ends of a connection, captured when the server accepts it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub remote: Option<SocketAddr>,
    pub local: Option<SocketAddr>,
}

impl ConnectionInfo {
    pub fn new(remote: Option<SocketAddr>, local: Option<SocketAddr>) -> Self {
        Self { remote, local }
    }

    /// Resolve connection addresses from request extensions.
    ///
    /// Prefers a full `ConnectionInfo`; a bare `SocketAddr` only yields the
    /// remote side. `MockConnectInfo` is consulted after the real value, the
    /// same fallback axum's `ConnectInfo` extractor uses.
    pub fn from_extensions(extensions: &Extensions) -> Self {
        let full = extensions
            .get::<ConnectInfo<ConnectionInfo>>()
            .map(|ConnectInfo(info)| *info)
            .or_else(|| {
                extensions
                    .get::<MockConnectInfo<ConnectionInfo>>()
                    .map(|MockConnectInfo(info)| *info)
            });
        if let Some(info) = full {
            return info;
        }

        let remote = extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
            .or_else(|| {
                extensions
                    .get::<MockConnectInfo<SocketAddr>>()
                    .map(|MockConnectInfo(addr)| *addr)
            });

        Self { remote, local: None }
    }
}

impl Connected<IncomingStream<'_, TcpListener>> for ConnectionInfo {
    fn connect_info(stream: IncomingStream<'_, TcpListener>) -> Self {
        let local = match stream.io().local_addr() {
            Ok(addr) => Some(addr),
            Err(e) => {
                tracing::debug!(error = %e, "Local address unavailable for connection");
                None
            }
        };

        Self {
            remote: Some(*stream.remote_addr()),
            local,
        }
    }
}

impl<B> RequestContext for Request<B> {
    fn remote_ip(&self) -> Option<IpAddr> {
        ConnectionInfo::from_extensions(self.extensions())
            .remote
            .map(|addr| addr.ip())
    }

    fn local_ip(&self) -> Option<IpAddr> {
        ConnectionInfo::from_extensions(self.extensions())
            .local
            .map(|addr| addr.ip())
    }

    fn request_header(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers().get(name)
    }
}

impl RequestContext for Parts {
    fn remote_ip(&self) -> Option<IpAddr> {
        ConnectionInfo::from_extensions(&self.extensions)
            .remote
            .map(|addr| addr.ip())
    }

    fn local_ip(&self) -> Option<IpAddr> {
        ConnectionInfo::from_extensions(&self.extensions)
            .local
            .map(|addr| addr.ip())
    }

    fn request_header(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers.get(name)
    }
}

impl<B> ResponseContext for Response<B> {
    fn response_header(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers().get(name)
    }

    fn set_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers_mut().insert(name, value);
    }

    fn remove_response_header(&mut self, name: &HeaderName) {
        self.headers_mut().remove(name);
    }

    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }
}
