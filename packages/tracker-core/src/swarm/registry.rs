use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use swarmshare_primitives::{FileDescriptor, Rank, Swarm, SwarmMembership};

/// The swarms known to the tracker, indexed by file name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwarmRegistry {
    swarms: BTreeMap<String, Swarm>,
}

/// The outcome of registering a file reported by one of its owners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// The file was not known: the report created its swarm.
    New,

    /// The file was known and the report agrees with the stored metadata.
    Joined,

    /// The file was known but the report lists other chunks. The first report
    /// is kept; the reporter is still recorded as a seed.
    Diverged { kept_chunks: usize, reported_chunks: usize },
}

impl SwarmRegistry {
    /// Registers `reporter` as a seed of `file`, creating the swarm if needed.
    ///
    /// The first report of a file wins: later reports never replace the stored
    /// metadata. Registering the same report twice is a no-op.
    pub fn register_owned(&mut self, file: FileDescriptor, reporter: Rank) -> Registration {
        match self.swarms.entry(file.name().to_string()) {
            Entry::Vacant(entry) => {
                let mut swarm = Swarm::new(file);
                swarm.membership.add_seed(reporter);
                entry.insert(swarm);
                Registration::New
            }
            Entry::Occupied(mut entry) => {
                let swarm = entry.get_mut();
                swarm.membership.add_seed(reporter);

                if swarm.metadata == file {
                    Registration::Joined
                } else {
                    Registration::Diverged {
                        kept_chunks: swarm.metadata.total_chunks(),
                        reported_chunks: file.total_chunks(),
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Swarm> {
        self.swarms.get(name)
    }

    /// The current membership of a swarm, empty if the file is unknown.
    #[must_use]
    pub fn membership(&self, name: &str) -> SwarmMembership {
        self.swarms
            .get(name)
            .map(|swarm| swarm.membership.clone())
            .unwrap_or_default()
    }

    /// Records `rank` as downloading the file. Seeds stay seeds.
    ///
    /// Returns `false` if the file is unknown.
    pub fn mark_peer(&mut self, name: &str, rank: Rank) -> bool {
        match self.swarms.get_mut(name) {
            Some(swarm) => {
                swarm.membership.add_peer(rank);
                true
            }
            None => false,
        }
    }

    /// Promotes `rank` to seed of the file.
    ///
    /// Returns `false` if the file is unknown.
    pub fn mark_seed(&mut self, name: &str, rank: Rank) -> bool {
        match self.swarms.get_mut(name) {
            Some(swarm) => {
                swarm.membership.add_seed(rank);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.swarms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.swarms.is_empty()
    }

    /// Swarms in file name order.
    pub fn iter(&self) -> impl Iterator<Item = &Swarm> {
        self.swarms.values()
    }

    /// Logs every swarm at `debug` level.
    pub fn debug_dump(&self) {
        for swarm in self.iter() {
            tracing::debug!(
                file = swarm.name(),
                total_chunks = swarm.metadata.total_chunks(),
                seeds = ?swarm.membership.seeds().collect::<Vec<_>>(),
                peers = ?swarm.membership.peers().collect::<Vec<_>>(),
                "swarm"
            );
        }
    }
}
