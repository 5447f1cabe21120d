//! Client identity for rate limiting and audit records
//!
//! The gateway runs behind `trusted_proxy_count` proxies. Each of them appends
//! the address it received the connection from to `X-Forwarded-For`, so the
//! client is the entry written by the outermost proxy: `N` hops from the end of
//! the chain. Everything before that entry is client-supplied and ignored. With
//! no proxies in front, forwarding headers are client-supplied too and only the
//! socket address counts.

use crate::state::AppState;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{request::Parts, HeaderMap};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Identity used when no address can be determined. All such callers share
/// one rate-limit bucket.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the client address from proxy headers, then the socket peer.
pub fn extract_client_ip(
    headers: &HeaderMap,
    socket_addr: Option<&SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    if trusted_proxy_count > 0 {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|chain| client_from_forwarded_chain(chain, trusted_proxy_count));
        if let Some(ip) = forwarded {
            return ip.to_string();
        }

        let real_ip = header_str(headers, "x-real-ip")
            .map(str::trim)
            .and_then(|value| value.parse::<IpAddr>().ok());
        if let Some(ip) = real_ip {
            return ip.to_string();
        }
    }

    socket_addr
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Pick the client out of `spoofed..., client, proxy2, ..., proxyN-1`.
///
/// The last `trusted_proxy_count` entries were written by our proxies and the
/// first of them is the client. A chain shorter than that means some proxy did
/// not append; the earliest entry is the best remaining guess.
fn client_from_forwarded_chain(chain: &str, trusted_proxy_count: usize) -> Option<IpAddr> {
    let hops: Vec<&str> = chain
        .split(',')
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .collect();

    let position = hops.len().saturating_sub(trusted_proxy_count);
    hops.get(position)?.parse().ok()
}

/// Extractor yielding the caller's rate-limit identity
///
/// Never rejects: when nothing identifies the caller the identity is
/// [`UNKNOWN_CLIENT`].
#[derive(Debug, Clone)]
pub struct ClientIdentity(pub String);

impl FromRequestParts<Arc<AppState>> for ClientIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(ClientIdentity(client_ip_from_parts(
            parts,
            state.trusted_proxy_count(),
        )))
    }
}

pub fn client_ip_from_parts(parts: &Parts, trusted_proxy_count: usize) -> String {
    let socket_addr = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    extract_client_ip(&parts.headers, socket_addr.as_ref(), trusted_proxy_count)
}
