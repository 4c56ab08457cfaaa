//! The message catalog exchanged between the swarm tracker and its peers.
//!
//! Every message travels as a transport [`Tag`](swarmshare_transport::Tag)
//! identifying its [`MessageKind`] plus a JSON payload. Signals (start, stop,
//! all done) carry an empty payload.
//!
//! | Kind             | Tag   | Direction    | Payload                          |
//! |------------------|-------|--------------|----------------------------------|
//! | `InitCount`      | 10000 | peer→tracker | `{"owned_files": 2}`             |
//! | `InitFile`       | 10001 | peer→tracker | file descriptor                  |
//! | `StartSignal`    | 20000 | tracker→peer | empty                            |
//! | `ReqFullSwarm`   | 20001 | peer→tracker | `{"name": "file1"}`              |
//! | `ReqUpdateSwarm` | 20002 | peer→tracker | `{"name": "file1"}`              |
//! | `SwarmData`      | 20003 | tracker→peer | swarm, or `null` if unknown      |
//! | `UpdateSwarm`    | 20004 | tracker→peer | swarm membership                 |
//! | `ChunkRequest`   | 20005 | peer→peer    | `{"filename": .., "chunk_index": ..}` |
//! | `ChunkResponse`  | 20006 | peer→peer    | `{"has_chunk": .., "hash": ..}`  |
//! | `FileDone`       | 20007 | peer→tracker | `{"name": "file1"}`              |
//! | `AllDone`        | 20008 | peer→tracker | empty                            |
//! | `StopSignal`     | 20009 | tracker→peer | empty                            |
//!
//! The [`MessageTransport`] extension trait sends and receives typed
//! [`Message`]s over any [`Transport`](swarmshare_transport::Transport).
pub mod error;
pub mod kind;
pub mod message;
pub mod transport_ext;

pub use crate::error::Error;
pub use crate::kind::MessageKind;
pub use crate::message::{ChunkRequest, ChunkResponse, Message};
pub use crate::transport_ext::MessageTransport;
