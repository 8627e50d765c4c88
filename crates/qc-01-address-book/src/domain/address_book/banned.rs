//! Timed IP bans and their unban schedule.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::net::IpAddr;
use std::time::Instant;

/// Banned IPs, each with exactly one pending unban deadline.
///
/// Deadlines sit in a min-heap so the earliest one is always at hand for the
/// unban task.
#[derive(Debug, Clone, Default)]
pub struct BannedAddresses {
    until: HashMap<IpAddr, Instant>,
    schedule: BinaryHeap<Reverse<(Instant, IpAddr)>>,
}

impl BannedAddresses {
    /// Create an empty ban set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ban `ip` until `deadline`.
    ///
    /// Returns `false` without touching the schedule if `ip` is already
    /// banned.
    pub fn ban(&mut self, ip: IpAddr, deadline: Instant) -> bool {
        if self.until.contains_key(&ip) {
            return false;
        }
        self.until.insert(ip, deadline);
        self.schedule.push(Reverse((deadline, ip)));
        true
    }

    /// Check if `ip` is banned.
    pub fn is_banned(&self, ip: &IpAddr) -> bool {
        self.until.contains_key(ip)
    }

    /// When the ban on `ip` lifts.
    pub fn deadline(&self, ip: &IpAddr) -> Option<Instant> {
        self.until.get(ip).copied()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.peek().map(|Reverse((deadline, _))| *deadline)
    }

    /// Lift every ban whose deadline is at or before `now`.
    pub fn release_expired(&mut self, now: Instant) -> Vec<IpAddr> {
        let mut released = Vec::new();
        while let Some(Reverse((deadline, ip))) = self.schedule.peek().copied() {
            if deadline > now {
                break;
            }
            self.schedule.pop();
            if self.until.get(&ip) == Some(&deadline) {
                self.until.remove(&ip);
                released.push(ip);
            }
        }
        released
    }

    /// Drop every ban and pending deadline.
    pub fn clear(&mut self) -> usize {
        let count = self.until.len();
        self.until.clear();
        self.schedule.clear();
        count
    }

    /// Banned IPs in ascending order.
    pub fn addresses(&self) -> Vec<IpAddr> {
        let mut ips: Vec<IpAddr> = self.until.keys().copied().collect();
        ips.sort();
        ips
    }

    /// Get count of active bans
    pub fn len(&self) -> usize {
        self.until.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.until.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(40, 0, 0, last))
    }

    #[test]
    fn test_second_ban_keeps_first_deadline() {
        let start = Instant::now();
        let mut banned = BannedAddresses::new();

        assert!(banned.ban(ip(1), start + Duration::from_secs(10)));
        assert!(!banned.ban(ip(1), start + Duration::from_secs(99)));

        assert_eq!(banned.len(), 1);
        assert_eq!(banned.deadline(&ip(1)), Some(start + Duration::from_secs(10)));
        assert_eq!(banned.schedule.len(), 1);
    }

    #[test]
    fn test_release_in_deadline_order() {
        let start = Instant::now();
        let mut banned = BannedAddresses::new();
        banned.ban(ip(3), start + Duration::from_secs(30));
        banned.ban(ip(1), start + Duration::from_secs(10));
        banned.ban(ip(2), start + Duration::from_secs(20));

        assert_eq!(banned.next_deadline(), Some(start + Duration::from_secs(10)));
        assert!(banned.release_expired(start).is_empty());

        let released = banned.release_expired(start + Duration::from_secs(20));
        assert_eq!(released, vec![ip(1), ip(2)]);
        assert!(banned.is_banned(&ip(3)));
        assert!(!banned.is_banned(&ip(1)));
        assert_eq!(banned.next_deadline(), Some(start + Duration::from_secs(30)));
    }

    #[test]
    fn test_clear_drops_schedule() {
        let start = Instant::now();
        let mut banned = BannedAddresses::new();
        banned.ban(ip(1), start);
        banned.ban(ip(2), start);

        assert_eq!(banned.clear(), 2);
        assert!(banned.is_empty());
        assert_eq!(banned.next_deadline(), None);
        assert!(banned.release_expired(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_rebanning_after_release() {
        let start = Instant::now();
        let mut banned = BannedAddresses::new();
        banned.ban(ip(1), start);
        assert_eq!(banned.release_expired(start), vec![ip(1)]);
        assert!(banned.ban(ip(1), start + Duration::from_secs(5)));
        assert_eq!(banned.addresses(), vec![ip(1)]);
    }
}
