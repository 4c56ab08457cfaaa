//! Swarm data structures.
//!
//! A swarm is the set of processes associated with one file. The tracker keeps
//! one [`Swarm`] per file name and hands out copies of it; peers cache the
//! copy they got for the file they are downloading.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{FileDescriptor, Rank};

/// Which processes fully own a file and which are still downloading it.
///
/// A rank is never in both sets. Reclassification only goes upward: a peer can
/// become a seed, a seed never goes back to being a peer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmMembership {
    seeds: BTreeSet<Rank>,
    peers: BTreeSet<Rank>,
}

impl SwarmMembership {
    /// Records `rank` as a seed, removing it from the peers if it was one.
    ///
    /// Returns `true` if the rank was not already a seed.
    pub fn add_seed(&mut self, rank: Rank) -> bool {
        self.peers.remove(&rank);
        self.seeds.insert(rank)
    }

    /// Records `rank` as a peer unless it is already a seed.
    ///
    /// Returns `true` if the rank was added.
    pub fn add_peer(&mut self, rank: Rank) -> bool {
        if self.seeds.contains(&rank) {
            return false;
        }
        self.peers.insert(rank)
    }

    #[must_use]
    pub fn is_seed(&self, rank: Rank) -> bool {
        self.seeds.contains(&rank)
    }

    #[must_use]
    pub fn is_peer(&self, rank: Rank) -> bool {
        self.peers.contains(&rank)
    }

    #[must_use]
    pub fn contains(&self, rank: Rank) -> bool {
        self.is_seed(rank) || self.is_peer(rank)
    }

    /// Seeds in ascending rank order.
    pub fn seeds(&self) -> impl Iterator<Item = Rank> + '_ {
        self.seeds.iter().copied()
    }

    /// Peers in ascending rank order.
    pub fn peers(&self) -> impl Iterator<Item = Rank> + '_ {
        self.peers.iter().copied()
    }

    #[must_use]
    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty() && self.peers.is_empty()
    }
}

/// The metadata and the membership of one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swarm {
    pub metadata: FileDescriptor,
    pub membership: SwarmMembership,
}

impl Swarm {
    /// A swarm for `metadata` with no members yet.
    #[must_use]
    pub fn new(metadata: FileDescriptor) -> Self {
        Self {
            metadata,
            membership: SwarmMembership::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name()
    }
}
