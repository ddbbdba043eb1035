use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN: &str = "unknown";

/// Address of the visitor as recorded in the access log.
///
/// The TCP peer by default; the first `X-Forwarded-For` hop when the state
/// trusts that header and the hop is an IP address (with or without a
/// port). Falls back to `"unknown"` when neither is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

fn parse_hop(hop: &str) -> Option<IpAddr> {
    hop.parse::<IpAddr>()
        .ok()
        .or_else(|| hop.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let hop = headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|hop| !hop.is_empty())?;
    parse_hop(hop)
}

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.trust_forwarded_for() {
            if let Some(ip) = forwarded_for(&parts.headers) {
                return Ok(Self(ip.to_string()));
            }
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        Ok(Self(peer.unwrap_or_else(|| UNKNOWN.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn first_forwarded_hop_wins() {
        let ip = forwarded_for(&headers(" 203.0.113.7 , 10.0.0.1"));
        assert_eq!(ip, Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn hops_with_ports_keep_the_address() {
        assert_eq!(
            forwarded_for(&headers("203.0.113.7:51000")),
            Some("203.0.113.7".parse().unwrap())
        );
        assert_eq!(
            forwarded_for(&headers("[2001:db8::1]:443, 10.0.0.1")),
            Some("2001:db8::1".parse().unwrap())
        );
        assert_eq!(
            forwarded_for(&headers("2001:db8::1")),
            Some("2001:db8::1".parse().unwrap())
        );
    }

    #[test]
    fn missing_or_blank_header_is_ignored() {
        assert_eq!(forwarded_for(&HeaderMap::new()), None);
        assert_eq!(forwarded_for(&headers(" , ")), None);
    }

    #[test]
    fn non_address_hops_are_rejected() {
        let long = "x".repeat(80);
        let mut map = HeaderMap::new();
        map.insert(X_FORWARDED_FOR, HeaderValue::from_str(&long).unwrap());

        assert_eq!(forwarded_for(&map), None);
        assert_eq!(forwarded_for(&headers("unknown, 10.0.0.1")), None);
        assert_eq!(forwarded_for(&headers("203.0.113.7/24")), None);
    }
}
