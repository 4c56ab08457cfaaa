//! The blocking, tagged, point-to-point transport between the tracker and its
//! peers.
//!
//! Every process of the closed world is identified by a [`Rank`]. A process
//! can:
//!
//! - [`send`](Transport::send) a payload to another rank under a [`Tag`].
//! - [`recv`](Transport::recv) the oldest message matching a [`Source`] and a
//!   [`TagFilter`], blocking until one arrives.
//! - [`probe`](Transport::probe) for the oldest matching message without
//!   consuming it.
//! - Wait on a [`barrier`](Transport::barrier) until every process has reached
//!   it.
//!
//! Messages between a given pair of processes are never reordered. The payload
//! is opaque to the transport: the message catalog and its encoding live in
//! the wire protocol package.
//!
//! The [`local`] module provides an in-memory implementation where each
//! process is a thread of the same OS process.
pub mod error;
pub mod local;

use derive_more::{Constructor, Display, From};
use mockall::automock;
use swarmshare_primitives::Rank;

pub use crate::error::Error;
pub use crate::local::LocalTransport;

/// The kind of a message, as seen by the transport.
#[derive(Clone, Copy, Debug, Display, From, Constructor, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u32);

impl Tag {
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Which senders a receive operation accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Any,
    Rank(Rank),
}

impl Source {
    #[must_use]
    pub fn matches(&self, rank: Rank) -> bool {
        match self {
            Source::Any => true,
            Source::Rank(expected) => *expected == rank,
        }
    }
}

impl From<Rank> for Source {
    fn from(rank: Rank) -> Self {
        Source::Rank(rank)
    }
}

/// Which tags a receive operation accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagFilter {
    Any,
    Only(Tag),
    /// Accepts any of the listed tags. It lets two workers sharing a mailbox
    /// wait only for the messages each of them handles.
    OneOf(Vec<Tag>),
}

impl TagFilter {
    #[must_use]
    pub fn matches(&self, tag: Tag) -> bool {
        match self {
            TagFilter::Any => true,
            TagFilter::Only(expected) => *expected == tag,
            TagFilter::OneOf(expected) => expected.contains(&tag),
        }
    }
}

impl From<Tag> for TagFilter {
    fn from(tag: Tag) -> Self {
        TagFilter::Only(tag)
    }
}

/// A delivered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub source: Rank,
    pub tag: Tag,
    pub payload: Vec<u8>,
}

/// What a probe found: the sender and tag of the next matching message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    pub source: Rank,
    pub tag: Tag,
    pub len: usize,
}

/// A process endpoint in a closed world of ranked processes.
///
/// All operations block until they can complete. Implementations must be
/// shareable between the threads of one process: a peer's downloader and
/// uploader use the same endpoint.
#[automock]
pub trait Transport: Send + Sync {
    /// The rank of this endpoint.
    fn rank(&self) -> Rank;

    /// Number of processes in the world, the tracker included.
    fn size(&self) -> usize;

    /// Delivers `payload` to `destination` under `tag`.
    ///
    /// # Errors
    ///
    /// Will return an error if the destination is not part of the world or if
    /// the world has been shut down.
    fn send(&self, destination: Rank, tag: Tag, payload: Vec<u8>) -> Result<(), Error>;

    /// Removes and returns the oldest message matching `source` and `filter`,
    /// waiting for one if there is none.
    ///
    /// # Errors
    ///
    /// Will return an error if the world is shut down while waiting.
    fn recv(&self, source: Source, filter: TagFilter) -> Result<Envelope, Error>;

    /// Like [`recv`](Transport::recv) but leaves the message in place.
    ///
    /// # Errors
    ///
    /// Will return an error if the world is shut down while waiting.
    fn probe(&self, source: Source, filter: TagFilter) -> Result<Status, Error>;

    /// Blocks until every process of the world has called `barrier`.
    ///
    /// # Errors
    ///
    /// Will return an error if the world is shut down while waiting.
    fn barrier(&self) -> Result<(), Error>;
}
