use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::unban::run_unban_schedule;
use crate::adapters::SeededRandomSource;
use crate::domain::{AddressBook, AddressBookEvent, ConfigError, PeerAddress};
use crate::ports::{ConfigProvider, TimeSource};

/// Events buffered per subscriber before slow receivers start lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Address Book Service implementing the driving port.
///
/// Wraps the domain `AddressBook` behind a single read/write lock and owns
/// the task that lifts expired bans.
///
/// # Example
///
/// ```rust,ignore
/// use qc_01_address_book::adapters::{StaticConfigProvider, SystemTimeSource};
/// use qc_01_address_book::service::AddressBookService;
/// use qc_01_address_book::ports::AddressBookApi;
///
/// let service = AddressBookService::from_provider(
///     &StaticConfigProvider::new(),
///     Arc::new(SystemTimeSource::new()),
/// )?;
/// let candidates = service.randomized_peer_list(8, 32);
/// ```
pub struct AddressBookService {
    pub(crate) book: Arc<RwLock<AddressBook>>,
    events: broadcast::Sender<AddressBookEvent>,
    unban_wakeup: Arc<Notify>,
    unban_task: Mutex<Option<JoinHandle<()>>>,
}

impl AddressBookService {
    /// Wrap `book` and start its unban task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(book: AddressBook) -> Self {
        Self::spawn_with_capacity(book, DEFAULT_EVENT_CAPACITY)
    }

    /// Like [`spawn`](Self::spawn) with a custom event channel capacity.
    pub fn spawn_with_capacity(book: AddressBook, event_capacity: usize) -> Self {
        let book = Arc::new(RwLock::new(book));
        let (events, _) = broadcast::channel(event_capacity.max(1));
        let unban_wakeup = Arc::new(Notify::new());
        let task = tokio::spawn(run_unban_schedule(
            Arc::clone(&book),
            events.clone(),
            Arc::clone(&unban_wakeup),
        ));

        Self {
            book,
            events,
            unban_wakeup,
            unban_task: Mutex::new(Some(task)),
        }
    }

    /// Build the book from `provider` with an entropy-seeded random source
    /// and start the service.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if the provided config fails validation.
    pub fn from_provider(
        provider: &dyn ConfigProvider,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, ConfigError> {
        let book = AddressBook::new(
            provider.address_book_config(),
            provider.peer_lists(),
            time_source,
            Arc::new(SeededRandomSource::from_entropy()),
        )?;
        Ok(Self::spawn(book))
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AddressBookEvent> {
        self.events.subscribe()
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&AddressBook) -> R) -> R {
        f(&self.book.read())
    }

    /// Run `f` under the write lock, then publish the events it caused.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut AddressBook) -> R) -> R {
        let (result, events) = {
            let mut book = self.book.write();
            let result = f(&mut book);
            (result, book.drain_events())
        };
        self.publish(events);
        result
    }

    fn publish(&self, events: Vec<AddressBookEvent>) {
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }

    /// Ban the IP of `address` for `ban_time`.
    ///
    /// Returns the unban deadline, or `None` if the IP is protected or
    /// already banned.
    pub fn ban_peer(&self, address: &PeerAddress, ban_time: Duration) -> Option<Instant> {
        let now = tokio::time::Instant::now().into_std();
        let until = self.mutate(|book| book.add_banned_peer(address, ban_time, now));
        if until.is_some() {
            self.unban_wakeup.notify_one();
        }
        until
    }

    /// Ban for the configured default ban time.
    pub fn add_banned_peer_default(&self, address: &PeerAddress) -> Option<Instant> {
        let ban_time = self.read(|book| book.config().default_ban_time);
        self.ban_peer(address, ban_time)
    }

    /// Check if `ip` is under a timed ban.
    pub fn is_banned(&self, ip: &IpAddr) -> bool {
        self.read(|book| book.is_banned(ip))
    }

    /// Stop the unban task and drop every pending ban.
    ///
    /// Idempotent. The book stays usable; new bans are recorded but no
    /// longer lifted automatically.
    pub fn shutdown(&self) {
        if let Some(task) = self.unban_task.lock().take() {
            task.abort();
            debug!("Unban task stopped");
        }
        let cleared = self.book.write().clear_bans();
        info!(cleared, "Address book service shut down");
    }
}

impl Drop for AddressBookService {
    fn drop(&mut self) {
        if let Some(task) = self.unban_task.get_mut().take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for AddressBookService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressBookService")
            .field("book", &*self.book.read())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}
