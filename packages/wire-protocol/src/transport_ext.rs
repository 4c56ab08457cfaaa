//! Typed messaging over a raw transport.
use swarmshare_primitives::Rank;
use swarmshare_transport::{Source, TagFilter, Transport};

use crate::{Error, Message, MessageKind};

/// Sends and receives [`Message`]s instead of raw tagged payloads.
pub trait MessageTransport {
    /// Encodes `message` and sends it to `destination` under its kind's tag.
    ///
    /// # Errors
    ///
    /// Will return an error if the message can't be encoded or delivered.
    fn send_message(&self, destination: Rank, message: &Message) -> Result<(), Error>;

    /// Receives and decodes the oldest message matching `source` and `filter`.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails, if the tag is not part of
    /// the catalog or if the payload is malformed. The message is consumed in
    /// every case.
    fn recv_message(&self, source: Source, filter: TagFilter) -> Result<(Rank, Message), Error>;

    /// Receives the next message of `kind` from `source`.
    ///
    /// # Errors
    ///
    /// Same as [`recv_message`](MessageTransport::recv_message).
    fn recv_kind(&self, source: Source, kind: MessageKind) -> Result<(Rank, Message), Error> {
        self.recv_message(source, kind.filter())
    }
}

impl<T: Transport + ?Sized> MessageTransport for T {
    fn send_message(&self, destination: Rank, message: &Message) -> Result<(), Error> {
        let kind = message.kind();
        let payload = message.encode()?;

        tracing::debug!(source = %self.rank(), %destination, %kind, "sending message");

        self.send(destination, kind.tag(), payload)?;
        Ok(())
    }

    fn recv_message(&self, source: Source, filter: TagFilter) -> Result<(Rank, Message), Error> {
        let envelope = self.recv(source, filter)?;
        let kind = MessageKind::try_from(envelope.tag)?;
        let message = Message::decode(kind, &envelope.payload)?;

        tracing::debug!(rank = %self.rank(), source = %envelope.source, %kind, "received message");

        Ok((envelope.source, message))
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use swarmshare_primitives::Rank;
    use swarmshare_transport::{Envelope, MockTransport, Source, Tag, TagFilter};

    use crate::{Error, Message, MessageKind, MessageTransport};

    #[test]
    fn it_should_send_a_message_under_the_tag_of_its_kind() {
        let mut transport = MockTransport::new();
        transport.expect_rank().return_const(Rank::new(1));
        transport
            .expect_send()
            .with(
                eq(Rank::new(0)),
                eq(MessageKind::FileDone.tag()),
                eq(br#"{"name":"file1"}"#.to_vec()),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        transport
            .send_message(
                Rank::new(0),
                &Message::FileDone {
                    name: "file1".to_string(),
                },
            )
            .unwrap();
    }

    #[test]
    fn it_should_decode_a_received_message_according_to_its_tag() {
        let mut transport = MockTransport::new();
        transport.expect_rank().return_const(Rank::new(1));
        transport
            .expect_recv()
            .with(eq(Source::Rank(Rank::new(0))), eq(MessageKind::StartSignal.filter()))
            .times(1)
            .returning(|_, _| {
                Ok(Envelope {
                    source: Rank::new(0),
                    tag: MessageKind::StartSignal.tag(),
                    payload: vec![],
                })
            });

        let (source, message) = transport
            .recv_kind(Source::Rank(Rank::new(0)), MessageKind::StartSignal)
            .unwrap();

        assert_eq!(source, Rank::new(0));
        assert_eq!(message, Message::StartSignal);
    }

    #[test]
    fn it_should_report_a_tag_outside_the_catalog() {
        let mut transport = MockTransport::new();
        transport.expect_rank().return_const(Rank::new(0));
        transport.expect_recv().returning(|_, _| {
            Ok(Envelope {
                source: Rank::new(2),
                tag: Tag::new(12345),
                payload: vec![],
            })
        });

        let result = transport.recv_message(Source::Any, TagFilter::Any);

        assert!(matches!(result, Err(Error::UnknownTag { .. })));
    }
}
