//! Bounded queue pairs backing the shared command channel.
//!
//! Uses `embassy-sync` bounded MPMC channels. Capacity mirrors the
//! small hardware queue; under the one-exchange-at-a-time discipline
//! a sender never actually blocks on a full queue.
//!
//! `Link::new()` is `const` so the application can place the whole
//! table in a `static` reachable from both execution contexts.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;

use super::ChannelId;
use super::codec::LinkFrame;
use super::endpoint::{Endpoint, Side};

/// Depth of each direction's queue.
pub(crate) const QUEUE_DEPTH: usize = 4;

pub(crate) type Queue = Channel<CriticalSectionRawMutex, LinkFrame, QUEUE_DEPTH>;
pub(crate) type ExchangeMutex = Mutex<CriticalSectionRawMutex, ()>;

/// Both directions of one logical channel plus its exchange mutex.
pub(crate) struct ChannelPair {
    pub(crate) to_agent: Queue,
    pub(crate) to_controller: Queue,
    pub(crate) exchange: ExchangeMutex,
}

impl ChannelPair {
    const fn new() -> Self {
        Self {
            to_agent: Channel::new(),
            to_controller: Channel::new(),
            exchange: Mutex::new(()),
        }
    }
}

/// The shared command channel: one [`ChannelPair`] per [`ChannelId`].
pub struct Link {
    pairs: [ChannelPair; ChannelId::COUNT],
}

impl Link {
    pub const fn new() -> Self {
        Self {
            pairs: [
                ChannelPair::new(),
                ChannelPair::new(),
                ChannelPair::new(),
                ChannelPair::new(),
            ],
        }
    }

    /// Controller-side handle for one logical channel.
    pub fn controller(&self, id: ChannelId) -> Endpoint<'_> {
        Endpoint::new(&self.pairs[id.index()], Side::Controller)
    }

    /// Agent-side handle for one logical channel.
    pub fn agent(&self, id: ChannelId) -> Endpoint<'_> {
        Endpoint::new(&self.pairs[id.index()], Side::Agent)
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}
