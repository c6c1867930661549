//! Streaming frame parser
//!
//! Turns an arbitrarily fragmented byte stream into [`ParsedEvent`]s. Bytes
//! are appended to an internal buffer and drained by a single loop that
//! alternates between two states:
//!
//! ```text
//!            MSG header line
//!   ┌─────────────────────────────────┐
//!   │                                 ▼
//! AwaitingControl              AwaitingPayload(PendingMessage)
//!   ▲                                 │
//!   └─────────────────────────────────┘
//!        N + 2 bytes consumed, surplus stays in the buffer
//! ```
//!
//! Every complete frame in the buffer is processed before `feed` returns; a
//! partial control line or partial payload waits for the next delivery.

use bytes::{Buf, BytesMut};

use crate::error::ProtocolError;

use super::constants::{
    CRLF, CRLF_LEN, DEFAULT_MAX_CONTROL_LINE, DEFAULT_MAX_PAYLOAD, OP_ERR, OP_INFO, OP_MSG, OP_OK, OP_PING, OP_PONG,
};
use super::message::ParsedEvent;
use super::payload::PendingMessage;

/// Where the parser is within the current frame
#[derive(Debug)]
pub enum ParserState {
    /// Waiting for a complete control line
    AwaitingControl,
    /// Collecting the body of a `MSG` frame
    AwaitingPayload(PendingMessage),
}

/// Incremental parser for the server-to-client byte stream
#[derive(Debug)]
pub struct FrameParser {
    buf: BytesMut,
    state: ParserState,
    max_control_line: usize,
    max_payload: usize,
    failed: bool,
}

/// Fields of a `MSG` control line
struct MsgHeader {
    subject: String,
    sid: String,
    reply_to: Option<String>,
    declared_len: usize,
}

/// What a single control line turned into
enum Control {
    Header(MsgHeader),
    Event(ParsedEvent),
}

impl FrameParser {
    /// Create a parser with the default control line limit
    pub fn new() -> Self {
        Self::with_max_control_line(DEFAULT_MAX_CONTROL_LINE)
    }

    /// Create a parser that rejects control lines longer than `limit` bytes
    pub fn with_max_control_line(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            state: ParserState::AwaitingControl,
            max_control_line: limit,
            max_payload: DEFAULT_MAX_PAYLOAD,
            failed: false,
        }
    }

    /// Reject `MSG` frames declaring a body longer than `limit` bytes
    pub fn with_max_payload(mut self, limit: usize) -> Self {
        self.max_payload = limit;
        self
    }

    /// Current parser state
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Check if the parser is in the middle of a message body
    pub fn is_awaiting_payload(&self) -> bool {
        matches!(self.state, ParserState::AwaitingPayload(_))
    }

    /// Number of received bytes not yet consumed
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Feed one delivery of bytes
    ///
    /// Parsed events are appended to `events` in stream order. On error the
    /// events decoded before the failure are still in `events`, and the
    /// parser refuses all further input: the connection must be abandoned.
    pub fn feed(
        &mut self,
        data: &[u8],
        events: &mut Vec<ParsedEvent>,
    ) -> Result<(), ProtocolError> {
        if self.failed {
            return Err(ProtocolError::Desynchronized);
        }

        self.buf.extend_from_slice(data);

        let result = self.drain(events);
        if let Err(ref e) = result {
            tracing::error!(error = %e, buffered = self.buf.len(), "Frame parser failed");
            self.failed = true;
            self.buf.clear();
            self.state = ParserState::AwaitingControl;
        }
        result
    }

    fn drain(&mut self, events: &mut Vec<ParsedEvent>) -> Result<(), ProtocolError> {
        loop {
            match &mut self.state {
                ParserState::AwaitingControl => {
                    let Some(end) = find_crlf(&self.buf) else {
                        // A trailing CR may be the first half of the terminator
                        let partial = match self.buf.last() {
                            Some(b'\r') => self.buf.len() - 1,
                            _ => self.buf.len(),
                        };
                        if partial > self.max_control_line {
                            return Err(ProtocolError::ControlLineTooLong {
                                limit: self.max_control_line,
                            });
                        }
                        return Ok(());
                    };

                    if end > self.max_control_line {
                        return Err(ProtocolError::ControlLineTooLong {
                            limit: self.max_control_line,
                        });
                    }

                    let line = self.buf.split_to(end);
                    self.buf.advance(CRLF_LEN);

                    match classify(&line) {
                        Control::Header(header) => {
                            let pending = self.start_message(header)?;
                            self.state = ParserState::AwaitingPayload(pending);
                        }
                        Control::Event(event) => events.push(event),
                    }
                }
                ParserState::AwaitingPayload(pending) => {
                    if self.buf.is_empty() {
                        return Ok(());
                    }

                    let framed = pending.consume(&self.buf)?;
                    let used = self.buf.len() - framed.surplus.len();
                    let complete = framed.complete;
                    self.buf.advance(used);

                    if complete {
                        let state =
                            std::mem::replace(&mut self.state, ParserState::AwaitingControl);
                        if let ParserState::AwaitingPayload(pending) = state {
                            events.push(ParsedEvent::Message(pending.into_message()));
                        }
                    }
                }
            }
        }
    }

    fn start_message(&self, header: MsgHeader) -> Result<PendingMessage, ProtocolError> {
        if header.declared_len > self.max_payload {
            return Err(ProtocolError::FramingDesync {
                sid: header.sid,
                reason: format!(
                    "declared length {} exceeds the {} byte payload limit",
                    header.declared_len, self.max_payload
                ),
            });
        }

        PendingMessage::new(
            header.subject,
            header.sid,
            header.reply_to,
            header.declared_len,
        )
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(CRLF_LEN).position(|w| w == CRLF)
}

/// Classify one control line (terminator already stripped)
fn classify(line: &[u8]) -> Control {
    let Ok(text) = std::str::from_utf8(line) else {
        return Control::Event(ParsedEvent::Unrecognized(
            String::from_utf8_lossy(line).into_owned(),
        ));
    };

    tracing::trace!(line = text, "Control line");

    let (op, args) = match text.split_once(|c: char| c == ' ' || c == '\t') {
        Some((op, args)) => (op, args.trim()),
        None => (text.trim_end(), ""),
    };

    if op.eq_ignore_ascii_case(OP_MSG) {
        if let Some(header) = parse_msg_header(args) {
            return Control::Header(header);
        }
    } else if op.eq_ignore_ascii_case(OP_OK) && args.is_empty() {
        return Control::Event(ParsedEvent::Ok);
    } else if op.eq_ignore_ascii_case(OP_ERR) {
        return Control::Event(ParsedEvent::ServerError(unquote(args).to_string()));
    } else if op.eq_ignore_ascii_case(OP_PING) && args.is_empty() {
        return Control::Event(ParsedEvent::Ping);
    } else if op.eq_ignore_ascii_case(OP_PONG) && args.is_empty() {
        return Control::Event(ParsedEvent::Pong);
    } else if op.eq_ignore_ascii_case(OP_INFO) && !args.is_empty() {
        return Control::Event(ParsedEvent::Info(args.to_string()));
    }

    Control::Event(ParsedEvent::Unrecognized(text.to_string()))
}

/// `<subject> <sid> [reply-to] <#bytes>`
fn parse_msg_header(args: &str) -> Option<MsgHeader> {
    let tokens: Vec<&str> = args.split_ascii_whitespace().collect();

    let (subject, sid, reply_to, len) = match tokens.as_slice() {
        [subject, sid, len] => (*subject, *sid, None, *len),
        [subject, sid, reply_to, len] => (*subject, *sid, Some(*reply_to), *len),
        _ => return None,
    };

    let declared_len = len.parse::<usize>().ok()?;

    Some(MsgHeader {
        subject: subject.to_string(),
        sid: sid.to_string(),
        reply_to: reply_to.map(str::to_string),
        declared_len,
    })
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(s)
}
