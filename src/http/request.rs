//! Request origin classification.
//!
//! # Responsibilities
//! - Decide whether a request came from the server's own machine
//! - Resolve the originating client IP from proxy headers
//!
//! # Design Decisions
//! - Both operations are total; missing addresses are answered, not rejected
//! - `CF-Connecting-IP` wins over `X-Forwarded-For`, which wins over the socket peer
//! - Header values are returned as sent; no IP syntax validation

use std::borrow::Cow;
use std::net::IpAddr;

use axum::http::{HeaderName, HeaderValue};

use crate::http::context::RequestContext;

/// Client address as reported by Cloudflare.
pub const CF_CONNECTING_IP: HeaderName = HeaderName::from_static("cf-connecting-ip");

/// Comma-separated proxy chain, client first.
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Returns true when the request originated on this machine.
///
/// A request is local when neither address is known, when the remote
/// address equals the local one, or when the remote address is loopback.
/// A missing remote address with a known local address is not local.
pub fn is_local_request<C>(ctx: &C) -> bool
where
    C: RequestContext + ?Sized,
{
    let local = ctx.local_ip();

    let Some(remote) = ctx.remote_ip() else {
        return local.is_none();
    };

    Some(remote) == local || is_loopback(remote)
}

/// Resolves the originating client IP.
///
/// Headers are trusted as sent: any client can forge `CF-Connecting-IP` or
/// the first `X-Forwarded-For` entry unless a proxy in front of this
/// service overwrites them.
///
/// When a header is repeated only its first line is used, so two
/// `CF-Connecting-IP` lines `1.1.1.1` and `2.2.2.2` yield `1.1.1.1` rather
/// than the comma-joined list.
pub fn request_ip<C>(ctx: &C) -> Option<String>
where
    C: RequestContext + ?Sized,
{
    if let Some(cf_ip) = ctx.request_header(&CF_CONNECTING_IP) {
        tracing::trace!(header = %CF_CONNECTING_IP, "Client IP from header");
        return Some(header_text(cf_ip).into_owned());
    }

    if let Some(forwarded) = ctx.request_header(&X_FORWARDED_FOR) {
        tracing::trace!(header = %X_FORWARDED_FOR, "Client IP from header");
        let forwarded = header_text(forwarded);
        let first = match forwarded.split_once(',') {
            Some((first, _)) => first,
            None => forwarded.as_ref(),
        };
        return Some(first.trim().to_string());
    }

    ctx.remote_ip().map(|ip| ip.to_string())
}

/// `::ffff:127.0.0.1` counts as loopback alongside 127.0.0.0/8 and `::1`.
fn is_loopback(ip: IpAddr) -> bool {
    ip.to_canonical().is_loopback()
}

fn header_text(value: &HeaderValue) -> Cow<'_, str> {
    String::from_utf8_lossy(value.as_bytes())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};

    use crate::http::context::ResponseContext;

    /// In-memory stand-in for a framework request context.
    #[derive(Debug, Default)]
    pub(crate) struct FakeContext {
        pub remote: Option<IpAddr>,
        pub local: Option<IpAddr>,
        pub request_headers: HeaderMap,
        pub response_headers: HeaderMap,
        pub status: StatusCode,
    }

    impl FakeContext {
        pub fn with_addrs(remote: Option<&str>, local: Option<&str>) -> Self {
            Self {
                remote: remote.map(|ip| ip.parse().unwrap()),
                local: local.map(|ip| ip.parse().unwrap()),
                ..Default::default()
            }
        }

        pub fn header(mut self, name: HeaderName, value: &'static str) -> Self {
            self.request_headers
                .append(name, HeaderValue::from_static(value));
            self
        }
    }

    impl RequestContext for FakeContext {
        fn remote_ip(&self) -> Option<IpAddr> {
            self.remote
        }

        fn local_ip(&self) -> Option<IpAddr> {
            self.local
        }

        fn request_header(&self, name: &HeaderName) -> Option<&HeaderValue> {
            self.request_headers.get(name)
        }
    }

    impl ResponseContext for FakeContext {
        fn response_header(&self, name: &HeaderName) -> Option<&HeaderValue> {
            self.response_headers.get(name)
        }

        fn set_response_header(&mut self, name: HeaderName, value: HeaderValue) {
            self.response_headers.insert(name, value);
        }

        fn remove_response_header(&mut self, name: &HeaderName) {
            self.response_headers.remove(name);
        }

        fn set_status(&mut self, status: StatusCode) {
            self.status = status;
        }
    }

    #[test]
    fn test_local_when_no_addresses() {
        assert!(is_local_request(&FakeContext::with_addrs(None, None)));
    }

    #[test]
    fn test_not_local_when_only_local_known() {
        assert!(!is_local_request(&FakeContext::with_addrs(None, Some("10.0.0.5"))));
    }

    #[test]
    fn test_loopback_remote_is_local() {
        let ctx = FakeContext::with_addrs(Some("127.0.0.1"), Some("10.0.0.5"));
        assert!(is_local_request(&ctx));

        let ctx = FakeContext::with_addrs(Some("127.8.9.10"), Some("10.0.0.5"));
        assert!(is_local_request(&ctx));

        let ctx = FakeContext::with_addrs(Some("::1"), Some("10.0.0.5"));
        assert!(is_local_request(&ctx));

        let ctx = FakeContext::with_addrs(Some("::ffff:127.0.0.1"), Some("10.0.0.5"));
        assert!(is_local_request(&ctx));
    }

    #[test]
    fn test_loopback_remote_without_local_is_local() {
        let ctx = FakeContext::with_addrs(Some("127.0.0.1"), None);
        assert!(is_local_request(&ctx));
    }

    #[test]
    fn test_same_address_is_local() {
        let ctx = FakeContext::with_addrs(Some("10.0.0.5"), Some("10.0.0.5"));
        assert!(is_local_request(&ctx));

        let ctx = FakeContext::with_addrs(Some("fe80::1"), Some("fe80::1"));
        assert!(is_local_request(&ctx));
    }

    #[test]
    fn test_remote_address_is_not_local() {
        let ctx = FakeContext::with_addrs(Some("8.8.8.8"), Some("10.0.0.5"));
        assert!(!is_local_request(&ctx));

        let ctx = FakeContext::with_addrs(Some("8.8.8.8"), None);
        assert!(!is_local_request(&ctx));
    }

    #[test]
    fn test_cf_connecting_ip_wins() {
        let ctx = FakeContext::with_addrs(Some("9.9.9.9"), None)
            .header(X_FORWARDED_FOR, "5.6.7.8")
            .header(CF_CONNECTING_IP, "1.2.3.4");

        assert_eq!(request_ip(&ctx).as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn test_cf_connecting_ip_is_verbatim() {
        let ctx = FakeContext::default().header(CF_CONNECTING_IP, " not-an-ip ");
        assert_eq!(request_ip(&ctx).as_deref(), Some(" not-an-ip "));
    }

    #[test]
    fn test_forwarded_for_first_entry() {
        let ctx = FakeContext::with_addrs(Some("9.9.9.9"), None)
            .header(X_FORWARDED_FOR, "1.2.3.4, 5.6.7.8");

        assert_eq!(request_ip(&ctx).as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn test_forwarded_for_single_entry_trimmed() {
        let ctx = FakeContext::default().header(X_FORWARDED_FOR, "  1.2.3.4 ");
        assert_eq!(request_ip(&ctx).as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn test_forwarded_for_empty_first_entry() {
        let ctx = FakeContext::default().header(X_FORWARDED_FOR, " , 5.6.7.8");
        assert_eq!(request_ip(&ctx).as_deref(), Some(""));
    }

    #[test]
    fn test_cf_connecting_ip_uses_first_header_line() {
        let ctx = FakeContext::default()
            .header(CF_CONNECTING_IP, "1.1.1.1")
            .header(CF_CONNECTING_IP, "2.2.2.2");

        assert_eq!(request_ip(&ctx).as_deref(), Some("1.1.1.1"));
    }

    #[test]
    fn test_forwarded_for_uses_first_header_line() {
        let ctx = FakeContext::default()
            .header(X_FORWARDED_FOR, "1.2.3.4")
            .header(X_FORWARDED_FOR, "5.6.7.8");

        assert_eq!(request_ip(&ctx).as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn test_falls_back_to_remote_address() {
        let ctx = FakeContext::with_addrs(Some("9.9.9.9"), None);
        assert_eq!(request_ip(&ctx).as_deref(), Some("9.9.9.9"));

        let ctx = FakeContext::with_addrs(Some("2001:db8::1"), None);
        assert_eq!(request_ip(&ctx).as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn test_no_source_yields_none() {
        assert_eq!(request_ip(&FakeContext::default()), None);
    }
}
