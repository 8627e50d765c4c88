//! Address classification ahead of bucket hashing.
//!
//! SECURITY-CRITICAL: decides how much of an address an attacker gets to
//! vary before two addresses land in the same bucket.

use std::hash::Hasher;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Coarse equivalence class of an IP address.
///
/// Loopback and private-range addresses each collapse to a single group, so
/// many local-looking addresses cannot fill many distinct buckets. Public
/// addresses group by /16 (IPv4) or /32 (IPv6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressGroup {
    /// 127.0.0.0/8, 0.0.0.0, `::1`, `::`.
    Loopback,
    /// RFC 1918, link-local, carrier-grade NAT and IPv6 unique-local ranges.
    Private,
    /// Public IPv4, first two octets.
    Ipv4([u8; 2]),
    /// Public IPv6, first four octets.
    Ipv6([u8; 4]),
}

impl AddressGroup {
    /// Classify an IP address.
    pub fn of(ip: &IpAddr) -> Self {
        match canonical_ip(ip) {
            IpAddr::V4(v4) => {
                if v4.is_loopback() || v4.is_unspecified() {
                    Self::Loopback
                } else if is_private_v4(&v4) {
                    Self::Private
                } else {
                    let [a, b, _, _] = v4.octets();
                    Self::Ipv4([a, b])
                }
            }
            IpAddr::V6(v6) => {
                if v6.is_loopback() || v6.is_unspecified() {
                    Self::Loopback
                } else if is_private_v6(&v6) {
                    Self::Private
                } else {
                    let o = v6.octets();
                    Self::Ipv6([o[0], o[1], o[2], o[3]])
                }
            }
        }
    }

    /// Whether this group stands for a whole class of addresses rather than a
    /// routable prefix.
    pub fn is_collapsed(&self) -> bool {
        matches!(self, Self::Loopback | Self::Private)
    }

    /// Feed the group's canonical representation into `hasher`.
    pub(crate) fn hash_into<H: Hasher>(&self, hasher: &mut H) {
        match self {
            Self::Loopback => hasher.write_u8(0),
            Self::Private => hasher.write_u8(1),
            Self::Ipv4(prefix) => {
                hasher.write_u8(2);
                hasher.write(prefix);
            }
            Self::Ipv6(prefix) => {
                hasher.write_u8(3);
                hasher.write(prefix);
            }
        }
    }
}

/// Unwrap IPv4-mapped IPv6 addresses so they classify as IPv4.
pub fn canonical_ip(ip: &IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(*v6),
        },
        v4 => *v4,
    }
}

fn is_private_v4(ip: &Ipv4Addr) -> bool {
    let [a, b, _, _] = ip.octets();
    // 100.64.0.0/10
    let shared = a == 100 && (b & 0xc0) == 64;
    ip.is_private() || ip.is_link_local() || shared
}

fn is_private_v6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    // fc00::/7 unique-local, fe80::/10 link-local
    (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
}
