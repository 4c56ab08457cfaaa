//! Process identities.
use derive_more::{Constructor, Display, From};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The rank reserved for the tracker.
pub const TRACKER_RANK: Rank = Rank(0);

/// The identity of one process in the closed world.
///
/// Ranks are dense: a world of `size` processes uses ranks `0..size`, with
/// [`TRACKER_RANK`] being the tracker and every other rank a peer.
#[derive(Clone, Copy, Debug, Display, From, Constructor, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(u32);

impl Rank {
    #[must_use]
    pub fn is_tracker(self) -> bool {
        self == TRACKER_RANK
    }

    /// The position of this rank in a per-process table.
    #[must_use]
    pub fn as_index(self) -> usize {
        self.0 as usize
    }

    /// All peer ranks of a world with `peer_count` peers, in ascending order.
    ///
    /// # Errors
    ///
    /// Will return [`Error::TooManyPeers`] if the last peer would not have a
    /// rank.
    pub fn peers(peer_count: usize) -> Result<impl Iterator<Item = Rank>, Error> {
        let last = u32::try_from(peer_count).map_err(|_| Error::TooManyPeers { count: peer_count })?;

        Ok((1..=last).map(Rank))
    }
}

impl TryFrom<usize> for Rank {
    type Error = std::num::TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u32::try_from(value).map(Rank)
    }
}

#[cfg(test)]
mod tests {
    use super::{Rank, TRACKER_RANK};
    use crate::Error;

    #[test]
    fn the_tracker_should_be_rank_zero() {
        assert!(TRACKER_RANK.is_tracker());
        assert!(!Rank::new(1).is_tracker());
    }

    #[test]
    fn it_should_enumerate_the_peer_ranks_skipping_the_tracker() {
        let peers: Vec<Rank> = Rank::peers(3).unwrap().collect();

        assert_eq!(peers, vec![Rank::new(1), Rank::new(2), Rank::new(3)]);
    }

    #[test]
    fn a_world_without_peers_should_have_no_peer_ranks() {
        assert_eq!(Rank::peers(0).unwrap().count(), 0);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn it_should_fail_enumerating_more_peers_than_there_are_ranks() {
        let count = u32::MAX as usize + 1;

        let result = Rank::peers(count);

        assert!(matches!(result, Err(Error::TooManyPeers { count: c }) if c == count));
    }

    #[test]
    fn it_should_be_displayed_as_a_plain_number() {
        assert_eq!(Rank::new(7).to_string(), "7");
    }
}
