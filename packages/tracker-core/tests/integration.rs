use std::sync::Arc;
use std::thread::{self, JoinHandle};

use swarmshare_primitives::{ChunkId, FileDescriptor, Rank, Swarm, SwarmMembership, HASH_SIZE, TRACKER_RANK};
use swarmshare_tracker_core::{Coordinator, Shutdown};
use swarmshare_transport::{LocalTransport, Source, Transport};
use swarmshare_wire_protocol::{Message, MessageKind, MessageTransport};

/// # Panics
///
/// Will panic if the name is not a valid file name.
#[must_use]
pub fn sample_file(name: &str) -> FileDescriptor {
    let chunks = [b'1', b'2', b'3']
        .into_iter()
        .map(|fill| ChunkId::from_bytes([fill; HASH_SIZE]))
        .collect();
    FileDescriptor::new(name, chunks).expect("it should be a valid file name")
}

/// A peer that follows a fixed script instead of downloading anything.
struct ScriptedPeer {
    transport: LocalTransport,
}

impl ScriptedPeer {
    fn report(&self, owned: &[FileDescriptor]) {
        let owned_files = u32::try_from(owned.len()).unwrap();
        self.transport
            .send_message(TRACKER_RANK, &Message::InitCount { owned_files })
            .unwrap();
        self.transport.barrier().unwrap();
        for file in owned {
            self.transport
                .send_message(TRACKER_RANK, &Message::InitFile(file.clone()))
                .unwrap();
        }
        self.transport.barrier().unwrap();
    }

    fn expect(&self, kind: MessageKind) -> Message {
        self.transport.recv_kind(Source::Rank(TRACKER_RANK), kind).unwrap().1
    }

    fn request_swarm(&self, name: &str) -> Option<Swarm> {
        self.transport
            .send_message(TRACKER_RANK, &Message::ReqFullSwarm { name: name.to_string() })
            .unwrap();
        match self.expect(MessageKind::SwarmData) {
            Message::SwarmData(swarm) => swarm,
            other => panic!("expected swarm data, got {other:?}"),
        }
    }

    fn refresh_swarm(&self, name: &str) -> SwarmMembership {
        self.transport
            .send_message(TRACKER_RANK, &Message::ReqUpdateSwarm { name: name.to_string() })
            .unwrap();
        match self.expect(MessageKind::UpdateSwarm) {
            Message::UpdateSwarm(membership) => membership,
            other => panic!("expected a membership, got {other:?}"),
        }
    }

    fn complete(&self, name: &str) {
        self.transport
            .send_message(TRACKER_RANK, &Message::FileDone { name: name.to_string() })
            .unwrap();
    }

    fn finish(&self) -> Message {
        self.transport.send_message(TRACKER_RANK, &Message::AllDone).unwrap();
        self.expect(MessageKind::StopSignal)
    }
}

fn launch(peers: usize) -> (JoinHandle<Shutdown>, Vec<ScriptedPeer>) {
    let mut world = LocalTransport::world(peers + 1).into_iter();
    let tracker = world.next().unwrap();

    let coordinator = thread::spawn(move || Coordinator::new(Arc::new(tracker)).run().unwrap());
    let peers = world.map(|transport| ScriptedPeer { transport }).collect();

    (coordinator, peers)
}

#[test]
fn it_should_hand_out_the_swarm_of_a_file_and_stop_every_peer_once_all_finished() {
    let (coordinator, mut peers) = launch(2);
    let downloader = peers.pop().unwrap();
    let owner = peers.pop().unwrap();

    let owner = thread::spawn(move || {
        owner.report(&[sample_file("f")]);
        assert_eq!(owner.expect(MessageKind::StartSignal), Message::StartSignal);
        owner.finish()
    });

    let downloader = thread::spawn(move || {
        downloader.report(&[]);
        downloader.expect(MessageKind::StartSignal);

        let swarm = downloader.request_swarm("f").unwrap();
        assert_eq!(swarm.metadata, sample_file("f"));
        assert_eq!(swarm.membership.seeds().collect::<Vec<_>>(), vec![Rank::new(1)]);

        let membership = downloader.refresh_swarm("f");
        assert!(membership.is_peer(Rank::new(2)));

        downloader.complete("f");
        downloader.finish()
    });

    assert_eq!(owner.join().unwrap(), Message::StopSignal);
    assert_eq!(downloader.join().unwrap(), Message::StopSignal);

    let shutdown = coordinator.join().unwrap();

    assert_eq!(shutdown.stop_signals_sent, 2);
    let membership = shutdown.registry.membership("f");
    assert!(membership.is_seed(Rank::new(1)));
    assert!(membership.is_seed(Rank::new(2)));
    assert_eq!(membership.peer_count(), 0);
    assert_eq!(shutdown.metrics.peers_finished, 2);
    assert_eq!(shutdown.metrics.files_completed, 1);
}

#[test]
fn it_should_reply_a_null_swarm_for_a_file_nobody_owns() {
    let (coordinator, mut peers) = launch(1);
    let peer = peers.pop().unwrap();

    peer.report(&[]);
    peer.expect(MessageKind::StartSignal);

    assert!(peer.request_swarm("ghost").is_none());
    assert!(peer.refresh_swarm("ghost").is_empty());
    assert_eq!(peer.finish(), Message::StopSignal);

    let shutdown = coordinator.join().unwrap();

    assert!(shutdown.registry.is_empty());
    assert_eq!(shutdown.metrics.unknown_swarm_requests, 1);
}

#[test]
fn it_should_keep_a_single_swarm_when_a_file_is_reported_twice() {
    let (coordinator, mut peers) = launch(1);
    let peer = peers.pop().unwrap();

    peer.report(&[sample_file("f"), sample_file("f")]);
    peer.expect(MessageKind::StartSignal);
    peer.finish();

    let shutdown = coordinator.join().unwrap();

    assert_eq!(shutdown.registry.len(), 1);
    assert_eq!(shutdown.registry.membership("f").seed_count(), 1);
    assert_eq!(shutdown.metrics.files_registered, 2);
    assert_eq!(shutdown.metrics.divergent_reports, 0);
}

#[test]
fn it_should_not_stop_anyone_before_every_peer_has_finished() {
    let (coordinator, mut peers) = launch(2);
    let late = peers.pop().unwrap();
    let early = peers.pop().unwrap();

    let early = thread::spawn(move || {
        early.report(&[sample_file("f")]);
        early.expect(MessageKind::StartSignal);
        early.transport.send_message(TRACKER_RANK, &Message::AllDone).unwrap();
        early
    });

    late.report(&[]);
    late.expect(MessageKind::StartSignal);
    let early = early.join().unwrap();

    // The late peer is still working: a refresh is served and nobody is stopped.
    let membership = late.refresh_swarm("f");
    assert!(membership.is_seed(Rank::new(1)));
    assert_eq!(early.transport.pending(), 0);

    assert_eq!(late.finish(), Message::StopSignal);
    assert_eq!(early.expect(MessageKind::StopSignal), Message::StopSignal);
    assert_eq!(coordinator.join().unwrap().stop_signals_sent, 2);
}
