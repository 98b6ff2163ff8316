//! Shared utilities for integration testing.

use std::net::SocketAddr;

use http_context_ext::config::ServerConfig;
use http_context_ext::http::HttpServer;
use tokio::net::TcpListener;

/// Start the server on an ephemeral loopback port and return its address.
pub async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();

    tokio::spawn(async move {
        HttpServer::new(config).run(listener).await.unwrap();
    });

    addr
}
