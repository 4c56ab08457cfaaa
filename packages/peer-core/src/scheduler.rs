//! Source selection for the next chunk of a file.
//!
//! The scheduler picks which member of a swarm to ask for a chunk. It knows
//! nothing about the chunk itself: the downloader always asks for the lowest
//! index it misses and tells the scheduler which sources refused it.
//!
//! Candidates are scanned in two classes, seeds first and then peers. In each
//! class the scan starts at a random offset into the ordered list of
//! candidates and stops after `scan_limit` of them. Each candidate is scored
//! with the number of chunks already taken from it while downloading the
//! current file, plus `peer_penalty` when it is a peer. The lowest score wins
//! and ties go to the candidate scanned first, so a seed wins over a peer with
//! the same score.
//!
//! Usage counters are halved across the board as soon as one of them reaches
//! `usage_decay_threshold`, so old history weighs less than recent one.
use std::collections::{BTreeSet, HashMap};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swarmshare_configuration::SchedulerPolicy;
use swarmshare_primitives::{Rank, SwarmMembership};

pub struct ChunkScheduler {
    own_rank: Rank,
    policy: SchedulerPolicy,
    rng: StdRng,
    usage: HashMap<Rank, u32>,
}

impl ChunkScheduler {
    #[must_use]
    pub fn new(own_rank: Rank, policy: SchedulerPolicy) -> Self {
        let rng = match policy.rng_seed {
            // Peers sharing a seed still scan from different offsets.
            Some(seed) => StdRng::seed_from_u64(seed ^ own_rank.as_index() as u64),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Self {
            own_rank,
            policy,
            rng,
            usage: HashMap::new(),
        }
    }

    /// Forgets the usage collected while downloading the previous file.
    pub fn reset(&mut self) {
        self.usage.clear();
    }

    #[must_use]
    pub fn usage(&self, rank: Rank) -> u32 {
        self.usage.get(&rank).copied().unwrap_or_default()
    }

    /// Picks the source to ask next, skipping the `refused` ones.
    ///
    /// Returns `None` when no member of the swarm is left to ask.
    pub fn select(&mut self, membership: &SwarmMembership, refused: &BTreeSet<Rank>) -> Option<Rank> {
        let mut best: Option<(Rank, u32)> = None;

        for (members, penalty) in [
            (membership.seeds().collect::<Vec<_>>(), 0),
            (membership.peers().collect::<Vec<_>>(), self.policy.peer_penalty),
        ] {
            let candidates: Vec<Rank> = members
                .into_iter()
                .filter(|rank| *rank != self.own_rank && !refused.contains(rank))
                .collect();

            if candidates.is_empty() {
                continue;
            }

            let offset = self.rng.random_range(0..candidates.len());

            for rank in candidates
                .iter()
                .cycle()
                .skip(offset)
                .take(self.policy.scan_limit.min(candidates.len()))
            {
                let score = self.usage(*rank).saturating_add(penalty);

                if best.map_or(true, |(_, best_score)| score < best_score) {
                    best = Some((*rank, score));
                }
            }
        }

        best.map(|(rank, _)| rank)
    }

    /// Records that a chunk was acquired from `rank`.
    pub fn record_acquisition(&mut self, rank: Rank) {
        let count = self.usage.entry(rank).or_default();
        *count = count.saturating_add(1);

        if *count >= self.policy.usage_decay_threshold {
            for count in self.usage.values_mut() {
                *count /= 2;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::rstest;
    use swarmshare_configuration::SchedulerPolicy;
    use swarmshare_primitives::{Rank, SwarmMembership};

    use super::ChunkScheduler;

    fn policy() -> SchedulerPolicy {
        SchedulerPolicy {
            rng_seed: Some(7),
            ..SchedulerPolicy::default()
        }
    }

    fn membership(seeds: &[u32], peers: &[u32]) -> SwarmMembership {
        let mut membership = SwarmMembership::default();
        for seed in seeds {
            membership.add_seed(Rank::new(*seed));
        }
        for peer in peers {
            membership.add_peer(Rank::new(*peer));
        }
        membership
    }

    #[test]
    fn it_should_never_select_the_requesting_process() {
        let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());

        let selected = scheduler.select(&membership(&[1], &[]), &BTreeSet::new());

        assert_eq!(selected, None);
    }

    #[test]
    fn it_should_never_select_a_source_that_refused_the_chunk() {
        let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());
        let refused = BTreeSet::from([Rank::new(2)]);

        for _ in 0..20 {
            assert_eq!(
                scheduler.select(&membership(&[2], &[3]), &refused),
                Some(Rank::new(3))
            );
        }
    }

    #[test]
    fn it_should_prefer_a_seed_to_an_unused_peer() {
        let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());

        let selected = scheduler.select(&membership(&[2], &[3]), &BTreeSet::new());

        assert_eq!(selected, Some(Rank::new(2)));
    }

    #[test]
    fn it_should_prefer_a_peer_once_the_seed_is_used_beyond_the_peer_penalty() {
        let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());
        for _ in 0..3 {
            scheduler.record_acquisition(Rank::new(2));
        }

        let selected = scheduler.select(&membership(&[2], &[3]), &BTreeSet::new());

        assert_eq!(selected, Some(Rank::new(3)));
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(42)]
    #[case(2024)]
    fn a_one_candidate_window_should_start_anywhere_and_pick_whatever_it_lands_on(#[case] rng_seed: u64) {
        let mut scheduler = ChunkScheduler::new(
            Rank::new(1),
            SchedulerPolicy {
                scan_limit: 1,
                rng_seed: Some(rng_seed),
                ..SchedulerPolicy::default()
            },
        );
        for _ in 0..10 {
            scheduler.record_acquisition(Rank::new(2));
        }
        let swarm = membership(&[2, 3, 4, 5, 6, 7, 8, 9], &[]);

        let picks: BTreeSet<Rank> = (0..200)
            .map(|_| scheduler.select(&swarm, &BTreeSet::new()).unwrap())
            .collect();

        assert!(picks.len() > 1, "the scan should not always start at the same seed");
        assert!(
            picks.contains(&Rank::new(2)),
            "the most used seed should be picked when it is the only one scanned"
        );
    }

    #[rstest]
    #[case(2, 0, Rank::new(2))]
    #[case(3, 0, Rank::new(3))]
    fn a_seed_should_win_while_its_extra_usage_is_at_most_the_peer_penalty(
        #[case] seed_usage: u32,
        #[case] peer_usage: u32,
        #[case] expected: Rank,
    ) {
        let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());
        for _ in 0..seed_usage {
            scheduler.record_acquisition(Rank::new(2));
        }
        for _ in 0..peer_usage {
            scheduler.record_acquisition(Rank::new(3));
        }

        let selected = scheduler.select(&membership(&[2], &[3]), &BTreeSet::new());

        assert_eq!(selected, Some(expected));
    }

    #[test]
    fn it_should_spread_the_requests_between_seeds() {
        let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());
        let swarm = membership(&[2, 3, 4], &[]);

        for _ in 0..30 {
            let rank = scheduler.select(&swarm, &BTreeSet::new()).unwrap();
            scheduler.record_acquisition(rank);
        }

        for seed in [2, 3, 4] {
            assert_eq!(scheduler.usage(Rank::new(seed)), 10);
        }
    }

    #[test]
    fn it_should_halve_every_counter_when_one_reaches_the_decay_threshold() {
        let mut scheduler = ChunkScheduler::new(
            Rank::new(1),
            SchedulerPolicy {
                usage_decay_threshold: 4,
                ..policy()
            },
        );

        scheduler.record_acquisition(Rank::new(3));
        scheduler.record_acquisition(Rank::new(3));
        for _ in 0..4 {
            scheduler.record_acquisition(Rank::new(2));
        }

        assert_eq!(scheduler.usage(Rank::new(2)), 2);
        assert_eq!(scheduler.usage(Rank::new(3)), 1);
    }

    #[test]
    fn resetting_should_forget_the_usage_of_the_previous_file() {
        let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());
        scheduler.record_acquisition(Rank::new(2));

        scheduler.reset();

        assert_eq!(scheduler.usage(Rank::new(2)), 0);
    }

    #[rstest]
    #[case(&[], &[])]
    #[case(&[1], &[])]
    #[case(&[2], &[3])]
    fn it_should_find_nothing_when_every_candidate_refused(#[case] seeds: &[u32], #[case] peers: &[u32]) {
        let mut scheduler = ChunkScheduler::new(Rank::new(1), policy());
        let refused = BTreeSet::from([Rank::new(2), Rank::new(3)]);

        assert_eq!(scheduler.select(&membership(seeds, peers), &refused), None);
    }

    #[test]
    fn two_schedulers_with_the_same_seed_and_rank_should_make_the_same_choices() {
        let swarm = membership(&[2, 3, 4, 5, 6, 7], &[]);
        let mut first = ChunkScheduler::new(Rank::new(1), SchedulerPolicy { scan_limit: 1, ..policy() });
        let mut second = ChunkScheduler::new(Rank::new(1), SchedulerPolicy { scan_limit: 1, ..policy() });

        for _ in 0..10 {
            assert_eq!(
                first.select(&swarm, &BTreeSet::new()),
                second.select(&swarm, &BTreeSet::new())
            );
        }
    }
}
