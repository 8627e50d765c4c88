//! # Bucket Addressing
//!
//! Maps `(secret, address, table kind, bucket count)` to a bucket index.
//!
//! ## Anti-Eclipse Properties
//!
//! 1. Keyed SipHash: placement is unpredictable without the node's secret
//! 2. New table hashes the address group only, so one subnet clusters into
//!    the same few buckets
//! 3. Tried table hashes the full IP, port excluded, for an even spread
//! 4. Loopback and private addresses collapse to one canonical input each
//!
//! Reference: Bitcoin Core's `addrman.h` (`GetNewBucket` / `GetTriedBucket`)

mod network;

pub use network::{canonical_ip, AddressGroup};

use std::hash::Hasher;
use std::net::IpAddr;

use siphasher::sip::SipHasher24;

use crate::domain::{PeerAddress, Secret, TableKind};

/// Bucket index for `target` in a table of `kind` with `bucket_count`
/// buckets.
///
/// Returns `None` when `bucket_count` is zero; callers treat that as "no
/// valid bucket".
pub fn bucket_id(
    secret: &Secret,
    target: &PeerAddress,
    kind: TableKind,
    bucket_count: usize,
) -> Option<usize> {
    if bucket_count == 0 {
        return None;
    }

    let (k0, k1) = secret.sip_keys();
    let mut hasher = SipHasher24::new_with_keys(k0, k1);
    hasher.write_u8(kind.tag());

    let group = AddressGroup::of(&target.ip);
    group.hash_into(&mut hasher);

    if kind == TableKind::Tried && !group.is_collapsed() {
        match canonical_ip(&target.ip) {
            IpAddr::V4(v4) => hasher.write(&v4.octets()),
            IpAddr::V6(v6) => hasher.write(&v6.octets()),
        }
    }

    Some((hasher.finish() % bucket_count as u64) as usize)
}
