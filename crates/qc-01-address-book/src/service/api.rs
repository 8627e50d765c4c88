use std::net::IpAddr;
use std::time::Duration;

use crate::domain::{
    AddPeerOutcome, AddressBookError, AddressBookStats, AdvertisedPeer, PeerAddress, PeerEntry,
    PeerInfo,
};
use crate::ports::AddressBookApi;
use crate::service::AddressBookService;

impl AddressBookApi for AddressBookService {
    fn add_peer(&self, info: PeerInfo) -> Result<AddPeerOutcome, AddressBookError> {
        self.mutate(|book| book.add_peer(info))
    }

    fn upgrade_peer(&self, address: &PeerAddress) -> bool {
        self.mutate(|book| book.upgrade_peer(address))
    }

    fn downgrade_peer(&self, address: &PeerAddress) -> bool {
        self.mutate(|book| book.downgrade_peer(address))
    }

    fn update_peer(&self, info: PeerInfo) -> bool {
        self.mutate(|book| book.update_peer(info))
    }

    fn remove_peer(&self, address: &PeerAddress) -> bool {
        self.mutate(|book| book.remove_peer(address)).is_some()
    }

    fn add_banned_peer(&self, address: &PeerAddress, ban_time: Duration) {
        self.ban_peer(address, ban_time);
    }

    fn get_peer(&self, address: &PeerAddress) -> Option<PeerEntry> {
        self.read(|book| book.get_peer(address).cloned())
    }

    fn has_peer(&self, address: &PeerAddress) -> bool {
        self.read(|book| book.has_peer(address))
    }

    fn all_peers(&self) -> Vec<PeerEntry> {
        self.read(|book| book.all_peers())
    }

    fn new_peers(&self) -> Vec<PeerEntry> {
        self.read(|book| book.new_peers())
    }

    fn tried_peers(&self) -> Vec<PeerEntry> {
        self.read(|book| book.tried_peers())
    }

    fn advertised_peers(&self) -> Vec<AdvertisedPeer> {
        self.read(|book| book.advertised_peers())
    }

    fn randomized_peer_list(&self, min: usize, max: usize) -> Vec<PeerEntry> {
        self.read(|book| book.randomized_peer_list(min, max))
    }

    fn banned_addresses(&self) -> Vec<IpAddr> {
        self.read(|book| book.banned_addresses())
    }

    fn stats(&self) -> AddressBookStats {
        self.read(|book| book.stats())
    }
}
