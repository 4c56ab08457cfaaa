//! Message kinds and their transport tags.
use std::fmt;

use swarmshare_transport::{Tag, TagFilter};

use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    InitCount,
    InitFile,
    StartSignal,
    ReqFullSwarm,
    ReqUpdateSwarm,
    SwarmData,
    UpdateSwarm,
    ChunkRequest,
    ChunkResponse,
    FileDone,
    AllDone,
    StopSignal,
}

impl MessageKind {
    pub const ALL: [MessageKind; 12] = [
        MessageKind::InitCount,
        MessageKind::InitFile,
        MessageKind::StartSignal,
        MessageKind::ReqFullSwarm,
        MessageKind::ReqUpdateSwarm,
        MessageKind::SwarmData,
        MessageKind::UpdateSwarm,
        MessageKind::ChunkRequest,
        MessageKind::ChunkResponse,
        MessageKind::FileDone,
        MessageKind::AllDone,
        MessageKind::StopSignal,
    ];

    #[must_use]
    pub fn tag(self) -> Tag {
        Tag::new(match self {
            MessageKind::InitCount => 10_000,
            MessageKind::InitFile => 10_001,
            MessageKind::StartSignal => 20_000,
            MessageKind::ReqFullSwarm => 20_001,
            MessageKind::ReqUpdateSwarm => 20_002,
            MessageKind::SwarmData => 20_003,
            MessageKind::UpdateSwarm => 20_004,
            MessageKind::ChunkRequest => 20_005,
            MessageKind::ChunkResponse => 20_006,
            MessageKind::FileDone => 20_007,
            MessageKind::AllDone => 20_008,
            MessageKind::StopSignal => 20_009,
        })
    }

    /// A filter accepting only this kind.
    #[must_use]
    pub fn filter(self) -> TagFilter {
        TagFilter::Only(self.tag())
    }

    /// A filter accepting any of `kinds`.
    #[must_use]
    pub fn any_of(kinds: &[MessageKind]) -> TagFilter {
        TagFilter::OneOf(kinds.iter().map(|kind| kind.tag()).collect())
    }

    /// Signals carry no payload.
    #[must_use]
    pub fn is_signal(self) -> bool {
        matches!(
            self,
            MessageKind::StartSignal | MessageKind::AllDone | MessageKind::StopSignal
        )
    }
}

impl TryFrom<Tag> for MessageKind {
    type Error = Error;

    fn try_from(tag: Tag) -> Result<Self, Self::Error> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or(Error::UnknownTag { tag })
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
