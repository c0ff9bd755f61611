//! CIDR ranges describing trusted reverse proxies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::NetworkError;

/// Private ranges trusted when proxy trust is enabled and no list is configured.
pub const DEFAULT_TRUSTED_PROXY_CIDRS: &str = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16";

/// An IPv4 or IPv6 network in prefix notation.
///
/// The stored address is masked to the prefix, so `10.1.2.3/8` and
/// `10.0.0.0/8` are the same range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cidr {
    network: IpAddr,
    prefix: u8,
}

impl Cidr {
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    /// Whether `ip` falls inside this range. IPv4-mapped IPv6 addresses are
    /// matched against IPv4 ranges.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.network, ip.to_canonical()) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = v4_mask(self.prefix);
                u32::from(net) & mask == u32::from(ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = v6_mask(self.prefix);
                u128::from(net) & mask == u128::from(ip) & mask
            }
            _ => false,
        }
    }
}

fn v4_mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    }
}

fn v6_mask(prefix: u8) -> u128 {
    if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(prefix))
    }
}

impl FromStr for Cidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| NetworkError::InvalidCidr {
            cidr: s.to_string(),
            reason: reason.to_string(),
        };

        let (addr, prefix) = s.trim().split_once('/').ok_or_else(|| invalid("missing prefix length"))?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid("bad address"))?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid("bad prefix length"))?;

        let network = match addr {
            IpAddr::V4(v4) => {
                if prefix > 32 {
                    return Err(invalid("prefix length exceeds 32"));
                }
                IpAddr::V4((u32::from(v4) & v4_mask(prefix)).into())
            }
            IpAddr::V6(v6) => {
                if prefix > 128 {
                    return Err(invalid("prefix length exceeds 128"));
                }
                IpAddr::V6((u128::from(v6) & v6_mask(prefix)).into())
            }
        };

        Ok(Self { network, prefix })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl Serialize for Cidr {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Proxy trust policy: whether forwarded headers are honoured at all, and
/// from which peers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrustedProxies {
    enabled: bool,
    ranges: Vec<Cidr>,
}

impl TrustedProxies {
    /// Never trust forwarded headers.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Trust forwarded headers from peers inside `ranges`.
    pub fn new(ranges: Vec<Cidr>) -> Self {
        Self {
            enabled: true,
            ranges,
        }
    }

    /// Parse a comma-separated CIDR list. Blank entries are skipped; any
    /// malformed entry fails the whole list.
    pub fn parse_list(list: &str) -> Result<Self, NetworkError> {
        let ranges = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Cidr>, _>>()?;
        Ok(Self::new(ranges))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ranges(&self) -> &[Cidr] {
        &self.ranges
    }

    /// Whether `host` parses as an address inside any trusted range.
    /// Unparseable hosts are never trusted.
    pub fn contains_host(&self, host: &str) -> bool {
        match host.parse::<IpAddr>() {
            Ok(ip) => self.ranges.iter().any(|cidr| cidr.contains(&ip)),
            Err(_) => false,
        }
    }
}
