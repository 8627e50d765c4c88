//! Unban schedule driver.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, Notify};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::domain::{AddressBook, AddressBookEvent};

/// Sleep until the earliest ban deadline, lift every due ban, repeat.
///
/// `wakeup` is signalled whenever a ban is scheduled, since it may be
/// earlier than the deadline currently slept on.
pub(crate) async fn run_unban_schedule(
    book: Arc<RwLock<AddressBook>>,
    events: broadcast::Sender<AddressBookEvent>,
    wakeup: Arc<Notify>,
) {
    loop {
        let next = book.read().next_unban_deadline();
        let Some(deadline) = next else {
            wakeup.notified().await;
            continue;
        };

        tokio::select! {
            () = sleep_until(Instant::from_std(deadline)) => {
                let now = Instant::now().into_std();
                let drained = {
                    let mut book = book.write();
                    let released = book.release_expired_bans(now);
                    debug!(count = released.len(), "Ban deadlines reached");
                    book.drain_events()
                };
                for event in drained {
                    let _ = events.send(event);
                }
            }
            () = wakeup.notified() => {}
        }
    }
}
