#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use voteweb_network::{resolve_client_identity, TrustedProxies, DEFAULT_TRUSTED_PROXY_CIDRS};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    peer: &'a str,
    forwarded: Option<&'a str>,
    trust: bool,
}

fuzz_target!(|input: Input<'_>| {
    let proxies = if input.trust {
        match TrustedProxies::parse_list(DEFAULT_TRUSTED_PROXY_CIDRS) {
            Ok(proxies) => proxies,
            Err(_) => return,
        }
    } else {
        TrustedProxies::disabled()
    };
    let identity = resolve_client_identity(input.peer, input.forwarded, &proxies);
    if !input.trust {
        assert!(input.peer.contains(identity.as_str()));
    }
});
