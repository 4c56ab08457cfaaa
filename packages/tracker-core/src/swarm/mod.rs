//! Swarm data structures.
//!
//! This module holds the data the tracker stores about each file. In
//! `BitTorrent` terminology a "swarm" is the collection of processes that are
//! sharing or downloading a given file. Here a swarm has two parts:
//!
//! - **Metadata** (`FileDescriptor`): the file name and its ordered chunk
//!   hashes, as reported by the first process that owned the file.
//! - **Membership** (`SwarmMembership`): the processes that own every chunk of
//!   the file ("seeds") and the processes still downloading it ("peers").
//!
//! We can represent the data stored in memory by the tracker with this JSON
//! object:
//!
//! ```json
//! {
//!     "file1": {
//!         "metadata": {
//!             "name": "file1",
//!             "chunks": ["9e2ef3c0a8a9cd6a6ccdd8e5f1d7b3a1", "..."],
//!             "total_chunks": 3
//!         },
//!         "membership": {
//!             "seeds": [1],
//!             "peers": [2, 3]
//!         }
//!     }
//! }
//! ```
//!
//! That JSON object does not exist, it's only a representation of the
//! [`SwarmRegistry`](registry::SwarmRegistry) content.
//!
//! The registry is owned by the coordinator loop, which is single-threaded,
//! so it needs no locking.
pub mod registry;
