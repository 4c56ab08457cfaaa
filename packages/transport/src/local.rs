//! In-memory transport.
//!
//! Every process of the world is an endpoint with its own mailbox. Sending
//! pushes an [`Envelope`] to the destination mailbox and wakes its waiters;
//! receiving scans the own mailbox for the oldest matching envelope.
//!
//! ```text
//!  rank 0 ──send──▶ ┌──────────────┐
//!  rank 2 ──send──▶ │ mailbox of 1 │ ◀──recv/probe── rank 1 (downloader, uploader)
//!                   └──────────────┘
//! ```
//!
//! A world can be [`shut down`](LocalTransport::shutdown): every blocked and
//! future operation then fails with [`Error::WorldClosed`]. This is how the
//! launcher tears the world down when one of its processes fails.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use swarmshare_primitives::Rank;

use crate::{Envelope, Error, Source, Status, Tag, TagFilter, Transport};

/// An endpoint of an in-memory world.
#[derive(Clone, Debug)]
pub struct LocalTransport {
    rank: Rank,
    world: Arc<World>,
}

impl LocalTransport {
    /// Creates a world of `size` processes and returns one endpoint per rank,
    /// in rank order.
    #[must_use]
    pub fn world(size: usize) -> Vec<LocalTransport> {
        let world = Arc::new(World {
            mailboxes: (0..size).map(|_| Mailbox::default()).collect(),
            barrier: Rendezvous::new(size),
            closed: AtomicBool::new(false),
        });

        (0..size)
            .filter_map(|index| Rank::try_from(index).ok())
            .map(|rank| LocalTransport {
                rank,
                world: world.clone(),
            })
            .collect()
    }

    /// Shuts the whole world down, waking every blocked operation.
    pub fn shutdown(&self) {
        self.world.closed.store(true, Ordering::SeqCst);

        for mailbox in &self.world.mailboxes {
            let _queue = mailbox.queue.lock();
            mailbox.arrived.notify_all();
        }

        let _state = self.world.barrier.state.lock();
        self.world.barrier.released.notify_all();
    }

    /// Number of messages waiting in this endpoint's mailbox.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.mailbox().queue.lock().len()
    }

    fn mailbox(&self) -> &Mailbox {
        &self.world.mailboxes[self.rank.as_index()]
    }

    fn is_closed(&self) -> bool {
        self.world.closed.load(Ordering::SeqCst)
    }
}

impl Transport for LocalTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.world.mailboxes.len()
    }

    fn send(&self, destination: Rank, tag: Tag, payload: Vec<u8>) -> Result<(), Error> {
        let Some(mailbox) = self.world.mailboxes.get(destination.as_index()) else {
            return Err(Error::UnknownRank {
                rank: destination,
                size: self.size(),
            });
        };

        if self.is_closed() {
            return Err(Error::WorldClosed);
        }

        tracing::trace!(source = %self.rank, %destination, %tag, len = payload.len(), "send");

        mailbox.queue.lock().push_back(Envelope {
            source: self.rank,
            tag,
            payload,
        });
        mailbox.arrived.notify_all();

        Ok(())
    }

    fn recv(&self, source: Source, filter: TagFilter) -> Result<Envelope, Error> {
        let mailbox = self.mailbox();
        let mut queue = mailbox.queue.lock();

        loop {
            let found = queue
                .iter()
                .position(|envelope| source.matches(envelope.source) && filter.matches(envelope.tag));

            if let Some(envelope) = found.and_then(|position| queue.remove(position)) {
                tracing::trace!(rank = %self.rank, source = %envelope.source, tag = %envelope.tag, "recv");
                return Ok(envelope);
            }

            if self.is_closed() {
                return Err(Error::WorldClosed);
            }

            mailbox.arrived.wait(&mut queue);
        }
    }

    fn probe(&self, source: Source, filter: TagFilter) -> Result<Status, Error> {
        let mailbox = self.mailbox();
        let mut queue = mailbox.queue.lock();

        loop {
            let found = queue
                .iter()
                .find(|envelope| source.matches(envelope.source) && filter.matches(envelope.tag));

            if let Some(envelope) = found {
                return Ok(Status {
                    source: envelope.source,
                    tag: envelope.tag,
                    len: envelope.payload.len(),
                });
            }

            if self.is_closed() {
                return Err(Error::WorldClosed);
            }

            mailbox.arrived.wait(&mut queue);
        }
    }

    fn barrier(&self) -> Result<(), Error> {
        self.world.barrier.wait(&self.world.closed)
    }
}

#[derive(Debug)]
struct World {
    mailboxes: Vec<Mailbox>,
    barrier: Rendezvous,
    closed: AtomicBool,
}

#[derive(Debug, Default)]
struct Mailbox {
    queue: Mutex<VecDeque<Envelope>>,
    arrived: Condvar,
}

/// A reusable barrier that can be interrupted by a world shutdown.
#[derive(Debug)]
struct Rendezvous {
    parties: usize,
    state: Mutex<RendezvousState>,
    released: Condvar,
}

#[derive(Debug, Default)]
struct RendezvousState {
    arrived: usize,
    generation: u64,
}

impl Rendezvous {
    fn new(parties: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(RendezvousState::default()),
            released: Condvar::new(),
        }
    }

    fn wait(&self, closed: &AtomicBool) -> Result<(), Error> {
        let mut state = self.state.lock();

        if closed.load(Ordering::SeqCst) {
            return Err(Error::WorldClosed);
        }

        let generation = state.generation;
        state.arrived += 1;

        if state.arrived >= self.parties {
            state.arrived = 0;
            state.generation += 1;
            self.released.notify_all();
            return Ok(());
        }

        while state.generation == generation {
            if closed.load(Ordering::SeqCst) {
                return Err(Error::WorldClosed);
            }
            self.released.wait(&mut state);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use swarmshare_primitives::Rank;

    use crate::{Error, LocalTransport, Source, Tag, TagFilter, Transport};

    fn two_process_world() -> (LocalTransport, LocalTransport) {
        let mut world = LocalTransport::world(2);
        let second = world.pop().unwrap();
        let first = world.pop().unwrap();
        (first, second)
    }

    #[test]
    fn it_should_assign_dense_ranks_to_the_endpoints() {
        let world = LocalTransport::world(3);

        let ranks: Vec<Rank> = world.iter().map(Transport::rank).collect();

        assert_eq!(ranks, vec![Rank::new(0), Rank::new(1), Rank::new(2)]);
        assert!(world.iter().all(|endpoint| endpoint.size() == 3));
    }

    #[test]
    fn it_should_deliver_a_message_with_its_source_and_tag() {
        let (tracker, peer) = two_process_world();

        tracker.send(Rank::new(1), Tag::new(5), b"hello".to_vec()).unwrap();

        let envelope = peer.recv(Source::Any, TagFilter::Any).unwrap();

        assert_eq!(envelope.source, Rank::new(0));
        assert_eq!(envelope.tag, Tag::new(5));
        assert_eq!(envelope.payload, b"hello".to_vec());
    }

    #[test]
    fn it_should_keep_the_order_of_the_messages_sent_between_two_processes() {
        let (tracker, peer) = two_process_world();

        for value in 0..5u8 {
            tracker.send(Rank::new(1), Tag::new(1), vec![value]).unwrap();
        }

        let received: Vec<u8> = (0..5)
            .map(|_| peer.recv(Source::Any, TagFilter::Any).unwrap().payload[0])
            .collect();

        assert_eq!(received, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn it_should_skip_the_messages_that_do_not_match_the_tag_filter() {
        let (tracker, peer) = two_process_world();

        tracker.send(Rank::new(1), Tag::new(1), vec![1]).unwrap();
        tracker.send(Rank::new(1), Tag::new(2), vec![2]).unwrap();

        let envelope = peer.recv(Source::Any, TagFilter::Only(Tag::new(2))).unwrap();

        assert_eq!(envelope.payload, vec![2]);
        assert_eq!(peer.pending(), 1);
    }

    #[test]
    fn probing_should_not_consume_the_message() {
        let (tracker, peer) = two_process_world();

        tracker.send(Rank::new(1), Tag::new(9), vec![1, 2, 3]).unwrap();

        let status = peer.probe(Source::Any, TagFilter::Any).unwrap();

        assert_eq!(status.source, Rank::new(0));
        assert_eq!(status.tag, Tag::new(9));
        assert_eq!(status.len, 3);
        assert_eq!(peer.pending(), 1);
    }

    #[test]
    fn it_should_fail_sending_to_a_rank_outside_the_world() {
        let (tracker, _peer) = two_process_world();

        let result = tracker.send(Rank::new(7), Tag::new(1), vec![]);

        assert_eq!(result, Err(Error::UnknownRank { rank: Rank::new(7), size: 2 }));
    }

    #[test]
    fn a_receive_should_block_until_a_matching_message_arrives() {
        let (tracker, peer) = two_process_world();

        let receiver = thread::spawn(move || peer.recv(Source::Rank(Rank::new(0)), TagFilter::Only(Tag::new(3))));

        tracker.send(Rank::new(1), Tag::new(3), vec![42]).unwrap();

        assert_eq!(receiver.join().unwrap().unwrap().payload, vec![42]);
    }

    #[test]
    fn the_barrier_should_release_every_process_once_all_of_them_arrived() {
        let world = LocalTransport::world(4);

        let handles: Vec<_> = world
            .into_iter()
            .map(|endpoint| {
                thread::spawn(move || {
                    endpoint.barrier()?;
                    endpoint.barrier()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(()));
        }
    }

    #[test]
    fn shutting_the_world_down_should_wake_up_a_blocked_receive() {
        let (tracker, peer) = two_process_world();

        let receiver = thread::spawn(move || peer.recv(Source::Any, TagFilter::Any));

        tracker.shutdown();

        assert_eq!(receiver.join().unwrap(), Err(Error::WorldClosed));
    }

    #[test]
    fn shutting_the_world_down_should_release_a_process_waiting_on_the_barrier() {
        let (tracker, peer) = two_process_world();

        let waiter = thread::spawn(move || peer.barrier());

        tracker.shutdown();

        assert_eq!(waiter.join().unwrap(), Err(Error::WorldClosed));
    }
}
