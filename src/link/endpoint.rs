//! Side-oriented channel handles and the exchange primitives.
//!
//! An [`Endpoint`] views one logical channel from one side: `send`
//! enqueues toward the peer, the wait primitives dequeue from it.
//! Three waiting flavors exist:
//!
//! - [`Endpoint::wait_value`] — suspend on the queue, wake on arrival;
//! - [`Endpoint::try_value`] — non-blocking poll, caller retries later;
//! - [`Endpoint::wait_value_polled`] — poll in a loop, yielding to
//!   sibling tasks between checks.
//!
//! The `exchange_*` helpers wrap a full request/response pair in the
//! channel's exchange mutex. The mutex is held across the response wait
//! and nowhere else, so at most one exchange is in flight per channel
//! system-wide. There is no timeout: a peer that never answers blocks
//! the exchange forever, which this design treats as fatal.

use futures_lite::future::yield_now;
use log::warn;

use crate::error::Result;

use super::channels::{ChannelPair, ExchangeMutex, Queue};
use super::codec::{self, LinkFrame, RegCommand};

/// Which side of the channel an [`Endpoint`] speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Controller,
    Agent,
}

/// One side's handle to one logical channel.
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    tx: &'a Queue,
    rx: &'a Queue,
    exchange: &'a ExchangeMutex,
}

impl<'a> Endpoint<'a> {
    pub(crate) fn new(pair: &'a ChannelPair, side: Side) -> Self {
        let (tx, rx) = match side {
            Side::Controller => (&pair.to_agent, &pair.to_controller),
            Side::Agent => (&pair.to_controller, &pair.to_agent),
        };
        Self {
            tx,
            rx,
            exchange: &pair.exchange,
        }
    }

    /// Enqueue a bare word toward the peer.
    ///
    /// Awaits only if the queue is full, which the exchange discipline
    /// makes unreachable in practice.
    pub async fn send_value(&self, word: u32) {
        self.tx.send(LinkFrame::Value(word)).await;
    }

    /// Enqueue a register command via the byte-payload path.
    pub async fn send_data(&self, cmd: &RegCommand) -> Result<()> {
        let payload = codec::encode_reg_command(cmd)?;
        self.tx.send(LinkFrame::Data(payload)).await;
        Ok(())
    }

    /// Enqueue an already-built frame toward the peer.
    pub async fn send_frame(&self, frame: LinkFrame) {
        self.tx.send(frame).await;
    }

    /// Dequeue the next frame of any kind, suspending until one arrives.
    pub async fn wait_frame(&self) -> LinkFrame {
        self.rx.receive().await
    }

    /// Suspend until a word arrives and return it.
    pub async fn wait_value(&self) -> u32 {
        loop {
            match self.rx.receive().await {
                LinkFrame::Value(word) => return word,
                LinkFrame::Data(_) => warn!("link: dropping payload frame while awaiting word"),
            }
        }
    }

    /// Non-blocking check for an available word.
    pub fn try_value(&self) -> Option<u32> {
        match self.rx.try_receive() {
            Ok(LinkFrame::Value(word)) => Some(word),
            Ok(LinkFrame::Data(_)) => {
                warn!("link: dropping payload frame while polling for word");
                None
            }
            Err(_) => None,
        }
    }

    /// Poll for a word in a loop, yielding to sibling tasks between checks.
    pub async fn wait_value_polled(&self) -> u32 {
        loop {
            if let Some(word) = self.try_value() {
                return word;
            }
            yield_now().await;
        }
    }

    /// One full exchange: send a command word, return the response word.
    pub async fn exchange_value(&self, word: u32) -> u32 {
        let _guard = self.exchange.lock().await;
        self.tx.send(LinkFrame::Value(word)).await;
        self.wait_value().await
    }

    /// Like [`Endpoint::exchange_value`] but waits by polling.
    pub async fn exchange_value_polled(&self, word: u32) -> u32 {
        let _guard = self.exchange.lock().await;
        self.tx.send(LinkFrame::Value(word)).await;
        self.wait_value_polled().await
    }

    /// One full exchange over the byte-payload path.
    pub async fn exchange_data(&self, cmd: &RegCommand) -> Result<u32> {
        let _guard = self.exchange.lock().await;
        let payload = codec::encode_reg_command(cmd)?;
        self.tx.send(LinkFrame::Data(payload)).await;
        Ok(self.wait_value().await)
    }
}
