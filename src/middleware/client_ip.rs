use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use ipnet::IpNet;

use crate::state::SharedState;

/// Extractor form of [`extract`], for handlers that audit with the caller's
/// address.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl FromRequestParts<SharedState> for ClientIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip());
        Ok(ClientIp(extract(
            &parts.headers,
            peer,
            &state.config.trusted_proxies,
        )))
    }
}

/// Resolve the client address for audit rows. X-Forwarded-For is only
/// honored when the direct peer is a trusted proxy.
pub fn extract(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> String {
    let peer = peer_addr.unwrap_or(IpAddr::from([127, 0, 0, 1]));

    if !trusted_proxies.is_empty() && trusted_proxies.iter().any(|net| net.contains(&peer)) {
        if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            // Take the first (leftmost) IP that isn't a trusted proxy
            for ip_str in xff.split(',').map(|s| s.trim()) {
                if let Ok(ip) = ip_str.parse::<IpAddr>() {
                    if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
                        return ip.to_string();
                    }
                }
            }
        }
    }

    peer.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", value.parse().unwrap());
        headers
    }

    #[test]
    fn ignores_forwarded_header_from_untrusted_peer() {
        let headers = headers_with_xff("203.0.113.9");
        let ip = extract(&headers, Some("198.51.100.1".parse().unwrap()), &[]);
        assert_eq!(ip, "198.51.100.1");
    }

    #[test]
    fn honors_forwarded_header_from_trusted_proxy() {
        let headers = headers_with_xff("203.0.113.9, 10.0.0.1");
        let proxies = vec!["10.0.0.0/8".parse().unwrap()];
        let ip = extract(&headers, Some("10.0.0.1".parse().unwrap()), &proxies);
        assert_eq!(ip, "203.0.113.9");
    }

    #[test]
    fn falls_back_to_peer_when_chain_is_all_proxies() {
        let headers = headers_with_xff("10.0.0.2");
        let proxies = vec!["10.0.0.0/8".parse().unwrap()];
        let ip = extract(&headers, Some("10.0.0.1".parse().unwrap()), &proxies);
        assert_eq!(ip, "10.0.0.1");
    }
}
