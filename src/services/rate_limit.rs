use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap, Request};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_governor::{key_extractor::KeyExtractor, GovernorError};

/// Client address of a request.
///
/// With `trust_proxy_headers` set, `X-Forwarded-For` (first hop) and
/// `X-Real-IP` are consulted before the peer address. Otherwise only the
/// peer address counts, since any client can write those headers. Requests
/// with no usable address share the loopback bucket.
#[must_use]
pub fn client_ip(
    headers: &HeaderMap,
    extensions: &Extensions,
    trust_proxy_headers: bool,
) -> IpAddr {
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let proxied = || {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|ip| ip.trim().parse::<IpAddr>().ok());

        forwarded.or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
        })
    };

    let proxied = if trust_proxy_headers { proxied() } else { None };

    proxied
        .or(peer)
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Keys login rate limiting by [`client_ip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(
            req.headers(),
            req.extensions(),
            self.trust_proxy_headers,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn proxied_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.7, 172.16.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        headers
    }

    fn peer(addr: &str) -> Extensions {
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(addr.parse::<SocketAddr>().unwrap()));
        extensions
    }

    #[test]
    fn trusted_proxy_headers_win_over_peer() {
        assert_eq!(
            client_ip(&proxied_headers(), &peer("192.168.1.20:5555"), true),
            "10.0.0.7".parse::<IpAddr>().unwrap()
        );

        let mut real_ip_only = proxied_headers();
        real_ip_only.remove("x-forwarded-for");
        assert_eq!(
            client_ip(&real_ip_only, &Extensions::new(), true),
            "10.0.0.9".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn untrusted_proxy_headers_are_ignored() {
        assert_eq!(
            client_ip(&proxied_headers(), &peer("192.168.1.20:5555"), false),
            "192.168.1.20".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            client_ip(&proxied_headers(), &Extensions::new(), false),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
    }

    #[test]
    fn falls_back_to_peer_then_loopback() {
        assert_eq!(
            client_ip(&HeaderMap::new(), &Extensions::new(), true),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
        assert_eq!(
            client_ip(&HeaderMap::new(), &peer("192.168.1.20:5555"), true),
            "192.168.1.20".parse::<IpAddr>().unwrap()
        );
    }
}
