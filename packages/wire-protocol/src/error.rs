//! Wire protocol errors.
use swarmshare_transport::Tag;

use crate::MessageKind;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The tag does not belong to the message catalog.
    #[error("Unknown message tag: {tag}")]
    UnknownTag { tag: Tag },

    #[error("Unable to encode a {kind} message: {source}")]
    Encode { kind: MessageKind, source: serde_json::Error },

    #[error("Malformed {kind} payload: {source}")]
    Decode { kind: MessageKind, source: serde_json::Error },

    /// A message of a known kind arrived where another kind was expected.
    #[error("Expected a {expected} message, got {actual}")]
    UnexpectedKind { expected: MessageKind, actual: MessageKind },

    #[error(transparent)]
    Transport(#[from] swarmshare_transport::Error),
}
