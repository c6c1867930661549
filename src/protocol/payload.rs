//! Payload framer
//!
//! After a `MSG` header the parser knows the body length `N`. The framer then
//! consumes exactly `N + 2` bytes (body plus the trailing CR LF), possibly
//! spread over many deliveries, and hands back whatever follows as surplus for
//! the next frame.
//!
//! ```text
//!  delivery 1        delivery 2
//! ┌──────────┐ ┌─────────────────────────────┐
//! │ hello wo │ │ rld \r\n MSG foo 1 3\r\n... │
//! └──────────┘ └─────────────────────────────┘
//!   body (8)    body (3) trailer   surplus
//! ```

use bytes::BytesMut;

use crate::error::ProtocolError;

use super::constants::{CRLF, CRLF_LEN};
use super::message::Message;

/// Upper bound on the up-front body allocation; larger bodies grow on demand
const MAX_INITIAL_CAPACITY: usize = 64 * 1024;

/// A message whose header has been parsed but whose body is still arriving
#[derive(Debug)]
pub struct PendingMessage {
    subject: String,
    sid: String,
    reply_to: Option<String>,
    declared_len: usize,
    total_len: usize,
    consumed: usize,
    body: BytesMut,
}

/// Result of feeding bytes into a [`PendingMessage`]
#[derive(Debug, PartialEq, Eq)]
pub struct Framed<'a> {
    /// The body and its trailer have been fully consumed
    pub complete: bool,
    /// Bytes past the end of this frame, belonging to the next one
    pub surplus: &'a [u8],
}

impl PendingMessage {
    /// Start a message from its header fields
    ///
    /// Fails with [`ProtocolError::FramingDesync`] when the frame size
    /// (`declared_len` plus the trailer) is not representable.
    pub fn new(
        subject: String,
        sid: String,
        reply_to: Option<String>,
        declared_len: usize,
    ) -> Result<Self, ProtocolError> {
        let Some(total_len) = declared_len.checked_add(CRLF_LEN) else {
            return Err(ProtocolError::FramingDesync {
                sid,
                reason: format!("declared length {declared_len} overflows the frame size"),
            });
        };

        Ok(Self {
            subject,
            sid,
            reply_to,
            declared_len,
            total_len,
            consumed: 0,
            body: BytesMut::with_capacity(declared_len.min(MAX_INITIAL_CAPACITY)),
        })
    }

    /// Subscription id from the header
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Body length declared by the server
    pub fn declared_len(&self) -> usize {
        self.declared_len
    }

    /// Bytes consumed so far, trailer included
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Bytes still needed to complete the frame
    pub fn remaining(&self) -> usize {
        self.total_len - self.consumed
    }

    /// Consume as much of `data` as this frame needs
    ///
    /// The trailer must be exactly CR LF; anything else means the declared
    /// length does not line up with the stream and is reported as a
    /// [`ProtocolError::FramingDesync`].
    pub fn consume<'a>(&mut self, data: &'a [u8]) -> Result<Framed<'a>, ProtocolError> {
        let take = self.remaining().min(data.len());
        let (chunk, surplus) = data.split_at(take);

        let body_room = self.declared_len.saturating_sub(self.consumed);
        let body_part = &chunk[..body_room.min(chunk.len())];
        self.body.extend_from_slice(body_part);

        let trailer = &chunk[body_part.len()..];
        if !trailer.is_empty() {
            let offset = (self.consumed + body_part.len()) - self.declared_len;
            if trailer != &CRLF[offset..offset + trailer.len()] {
                return Err(self.desync(format!(
                    "expected CRLF after {} byte body, found {:?}",
                    self.declared_len,
                    String::from_utf8_lossy(trailer)
                )));
            }
        }

        self.consumed += take;

        Ok(Framed {
            complete: self.consumed == self.total_len,
            surplus,
        })
    }

    /// Finish the frame, yielding the delivered message
    pub fn into_message(self) -> Message {
        Message {
            subject: self.subject,
            sid: self.sid,
            reply_to: self.reply_to,
            payload: self.body.freeze(),
        }
    }

    fn desync(&self, reason: String) -> ProtocolError {
        ProtocolError::FramingDesync {
            sid: self.sid.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(len: usize) -> PendingMessage {
        PendingMessage::new("foo.bar".into(), "1".into(), None, len).unwrap()
    }

    #[test]
    fn test_single_delivery() {
        let mut msg = pending(11);
        let framed = msg.consume(b"hello world\r\n").unwrap();

        assert!(framed.complete);
        assert!(framed.surplus.is_empty());

        let message = msg.into_message();
        assert_eq!(message.subject, "foo.bar");
        assert_eq!(&message.payload[..], b"hello world");
    }

    #[test]
    fn test_surplus_returned() {
        let mut msg = pending(3);
        let framed = msg.consume(b"abc\r\nPING\r\n").unwrap();

        assert!(framed.complete);
        assert_eq!(framed.surplus, b"PING\r\n");
    }

    #[test]
    fn test_split_inside_trailer() {
        let mut msg = pending(3);

        let framed = msg.consume(b"abc\r").unwrap();
        assert!(!framed.complete);
        assert_eq!(msg.remaining(), 1);

        let framed = msg.consume(b"\nMSG").unwrap();
        assert!(framed.complete);
        assert_eq!(framed.surplus, b"MSG");
        assert_eq!(&msg.into_message().payload[..], b"abc");
    }

    #[test]
    fn test_body_may_contain_crlf() {
        let mut msg = pending(4);
        let framed = msg.consume(b"a\r\nb\r\n").unwrap();

        assert!(framed.complete);
        assert_eq!(&msg.into_message().payload[..], b"a\r\nb");
    }

    #[test]
    fn test_zero_length_body() {
        let mut msg = pending(0);
        let framed = msg.consume(b"\r\n").unwrap();

        assert!(framed.complete);
        assert!(msg.into_message().payload.is_empty());
    }

    #[test]
    fn test_empty_delivery_is_noop() {
        let mut msg = pending(2);
        let framed = msg.consume(b"").unwrap();

        assert!(!framed.complete);
        assert_eq!(msg.consumed(), 0);
    }

    #[test]
    fn test_bad_trailer_is_desync() {
        let mut msg = pending(3);
        let err = msg.consume(b"abcd\r\n").unwrap_err();

        assert!(matches!(err, ProtocolError::FramingDesync { ref sid, .. } if sid == "1"));
    }

    #[test]
    fn test_unrepresentable_length_is_desync() {
        let err = PendingMessage::new("a".into(), "7".into(), None, usize::MAX).unwrap_err();

        assert!(matches!(err, ProtocolError::FramingDesync { ref sid, .. } if sid == "7"));
    }

    #[test]
    fn test_largest_representable_length_accepted() {
        let msg = PendingMessage::new("a".into(), "1".into(), None, usize::MAX - CRLF_LEN).unwrap();

        assert_eq!(msg.remaining(), usize::MAX);
        assert_eq!(msg.consumed(), 0);
    }

    #[test]
    fn test_bad_trailer_second_byte_is_desync() {
        let mut msg = pending(3);
        msg.consume(b"abc\r").unwrap();

        assert!(msg.consume(b"x").is_err());
    }
}
