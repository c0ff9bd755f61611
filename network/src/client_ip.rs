//! Resolve the identity string of the client behind a connection.

use tracing::trace;

use crate::TrustedProxies;

/// Strip a port from an address string.
///
/// Handles `host:port` (exactly one colon) and `[v6]:port` / `[v6]`. An
/// empty port (`host:`) is stripped too. Anything else, bare IPv6 included,
/// is returned unchanged. The address is
/// not otherwise canonicalized.
pub fn normalize_identity(raw: &str) -> &str {
    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            if tail.is_empty() || tail.strip_prefix(':').is_some_and(is_port) {
                return host;
            }
        }
        return raw;
    }

    match raw.split_once(':') {
        Some((host, port)) if !port.contains(':') && is_port(port) => host,
        _ => raw,
    }
}

/// Digits only. Empty counts, so a dangling colon is dropped.
fn is_port(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Pick the client identity for a request.
///
/// With proxy trust disabled, or no forwarded header, the peer address is
/// used. Otherwise the first `X-Forwarded-For` entry wins, but only when the
/// peer is itself inside a trusted range. Never fails; odd input degrades to
/// best-effort normalization.
pub fn resolve_client_identity(
    peer: &str,
    forwarded_for: Option<&str>,
    proxies: &TrustedProxies,
) -> String {
    let peer_host = normalize_identity(peer);

    if !proxies.is_enabled() {
        return peer_host.to_string();
    }

    let Some(first) = forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        return peer_host.to_string();
    };

    if proxies.contains_host(peer_host) {
        normalize_identity(first).to_string()
    } else {
        trace!(peer = peer_host, "forwarded header from untrusted peer ignored");
        peer_host.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_TRUSTED_PROXY_CIDRS;

    fn trusted() -> TrustedProxies {
        TrustedProxies::parse_list(DEFAULT_TRUSTED_PROXY_CIDRS).unwrap()
    }

    #[test]
    fn strips_ipv4_port() {
        assert_eq!(normalize_identity("10.0.0.5:54321"), "10.0.0.5");
    }

    #[test]
    fn strips_bracketed_ipv6_port() {
        assert_eq!(normalize_identity("[2001:db8::1]:443"), "2001:db8::1");
        assert_eq!(normalize_identity("[2001:db8::1]"), "2001:db8::1");
    }

    #[test]
    fn bare_addresses_unchanged() {
        assert_eq!(normalize_identity("10.0.0.5"), "10.0.0.5");
        assert_eq!(
            normalize_identity("2001:0db8:85a3::8a2e:0370:7334"),
            "2001:0db8:85a3::8a2e:0370:7334"
        );
    }

    #[test]
    fn garbage_passes_through() {
        assert_eq!(normalize_identity("not-an-ip"), "not-an-ip");
        assert_eq!(normalize_identity("host:http"), "host:http");
        assert_eq!(normalize_identity("[::1"), "[::1");
        assert_eq!(normalize_identity("[::1]x"), "[::1]x");
        assert_eq!(normalize_identity("[::1]:http"), "[::1]:http");
    }

    #[test]
    fn empty_port_is_stripped() {
        assert_eq!(normalize_identity("10.0.0.5:"), "10.0.0.5");
        assert_eq!(normalize_identity("[::1]:"), "::1");
        assert_eq!(
            resolve_client_identity(
                "10.0.0.1:1234",
                Some("203.0.113.5:"),
                &TrustedProxies::parse_list(DEFAULT_TRUSTED_PROXY_CIDRS).unwrap(),
            ),
            "203.0.113.5"
        );
    }

    #[test]
    fn disabled_trust_uses_peer() {
        let ip = resolve_client_identity(
            "10.0.0.1:1234",
            Some("203.0.113.5"),
            &TrustedProxies::disabled(),
        );
        assert_eq!(ip, "10.0.0.1");
    }

    #[test]
    fn trusted_peer_uses_first_forwarded_entry() {
        let ip = resolve_client_identity(
            "10.0.0.1:1234",
            Some(" 203.0.113.5 , 10.0.0.9"),
            &trusted(),
        );
        assert_eq!(ip, "203.0.113.5");
    }

    #[test]
    fn forwarded_entry_is_normalized() {
        let ip = resolve_client_identity("192.168.0.2:80", Some("203.0.113.5:9999"), &trusted());
        assert_eq!(ip, "203.0.113.5");
    }

    #[test]
    fn untrusted_peer_falls_back() {
        let ip = resolve_client_identity("8.8.8.8:1234", Some("203.0.113.5"), &trusted());
        assert_eq!(ip, "8.8.8.8");
    }

    #[test]
    fn missing_or_empty_header_falls_back() {
        assert_eq!(resolve_client_identity("10.0.0.1:1", None, &trusted()), "10.0.0.1");
        assert_eq!(resolve_client_identity("10.0.0.1:1", Some(" ,1.2.3.4"), &trusted()), "10.0.0.1");
    }

    #[test]
    fn mapped_ipv6_peer_is_trusted() {
        let ip = resolve_client_identity("[::ffff:10.0.0.1]:80", Some("203.0.113.7"), &trusted());
        assert_eq!(ip, "203.0.113.7");
    }
}
