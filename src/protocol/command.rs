//! Outbound command encoding
//!
//! Pure functions that render client commands as the exact bytes written to
//! the wire. Validation of subjects and patterns happens in the caller.

use std::fmt::Display;

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use super::constants::{CRLF, CRLF_LEN, OP_CONNECT, OP_PUB, OP_SUB, OP_UNSUB};

/// JSON body of the `CONNECT` command
///
/// Field order is the serialization order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectInfo {
    /// Ask the server to acknowledge every command with `+OK`
    pub verbose: bool,
    /// Ask the server for strict subject checking
    pub pedantic: bool,
    /// Username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
    /// Client name shown in server monitoring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ConnectInfo {
    /// Credentials with verbose and pedantic off
    pub fn with_credentials(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            pass: Some(pass.into()),
            ..Default::default()
        }
    }
}

/// `CONNECT <json>\r\n`
pub fn connect_frame(info: &ConnectInfo) -> serde_json::Result<Bytes> {
    let json = serde_json::to_vec(info)?;

    let mut buf = BytesMut::with_capacity(OP_CONNECT.len() + 1 + json.len() + CRLF_LEN);
    buf.put_slice(OP_CONNECT.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(&json);
    buf.put_slice(CRLF);
    Ok(buf.freeze())
}

/// `SUB <pattern> <sid>\r\n`
pub fn subscribe_frame(pattern: &str, sid: impl Display) -> Bytes {
    Bytes::from(format!("{OP_SUB} {pattern} {sid}\r\n"))
}

/// `UNSUB <sid>\r\n`
pub fn unsubscribe_frame(sid: impl Display) -> Bytes {
    Bytes::from(format!("{OP_UNSUB} {sid}\r\n"))
}

/// `PUB <subject> [reply_to] <len>\r\n<payload>\r\n`
///
/// The length is the payload's byte count.
pub fn publish_frame(subject: &str, reply_to: Option<&str>, payload: &[u8]) -> Bytes {
    let header = match reply_to {
        Some(reply) => format!("{OP_PUB} {subject} {reply} {}\r\n", payload.len()),
        None => format!("{OP_PUB} {subject} {}\r\n", payload.len()),
    };

    let mut buf = BytesMut::with_capacity(header.len() + payload.len() + CRLF_LEN);
    buf.put_slice(header.as_bytes());
    buf.put_slice(payload);
    buf.put_slice(CRLF);
    buf.freeze()
}

/// `PING\r\n`
pub fn ping_frame() -> Bytes {
    Bytes::from_static(b"PING\r\n")
}

/// `PONG\r\n`
pub fn pong_frame() -> Bytes {
    Bytes::from_static(b"PONG\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_frame() {
        let info = ConnectInfo::with_credentials("alice", "secret");
        let frame = connect_frame(&info).unwrap();

        assert_eq!(
            &frame[..],
            b"CONNECT {\"verbose\":false,\"pedantic\":false,\"user\":\"alice\",\"pass\":\"secret\"}\r\n"
        );
    }

    #[test]
    fn test_connect_frame_escapes_credentials() {
        let info = ConnectInfo::with_credentials("bob", "p\"w\\d");
        let frame = connect_frame(&info).unwrap();
        let text = std::str::from_utf8(&frame).unwrap();

        assert!(text.contains(r#""pass":"p\"w\\d""#));
        assert!(text.ends_with("}\r\n"));
    }

    #[test]
    fn test_connect_frame_without_credentials() {
        let frame = connect_frame(&ConnectInfo::default()).unwrap();
        assert_eq!(&frame[..], b"CONNECT {\"verbose\":false,\"pedantic\":false}\r\n");
    }

    #[test]
    fn test_connect_frame_with_name() {
        let info = ConnectInfo {
            name: Some("worker".into()),
            verbose: true,
            ..Default::default()
        };
        let frame = connect_frame(&info).unwrap();
        assert_eq!(
            &frame[..],
            b"CONNECT {\"verbose\":true,\"pedantic\":false,\"name\":\"worker\"}\r\n"
        );
    }

    #[test]
    fn test_subscribe_frame() {
        assert_eq!(&subscribe_frame("foo.*", 1)[..], b"SUB foo.* 1\r\n");
    }

    #[test]
    fn test_unsubscribe_frame() {
        assert_eq!(&unsubscribe_frame(42)[..], b"UNSUB 42\r\n");
    }

    #[test]
    fn test_publish_frame() {
        let frame = publish_frame("foo.bar", None, b"hello world");
        assert_eq!(&frame[..], b"PUB foo.bar 11\r\nhello world\r\n");
    }

    #[test]
    fn test_publish_frame_with_reply() {
        let frame = publish_frame("foo", Some("_INBOX.1"), b"hi");
        assert_eq!(&frame[..], b"PUB foo _INBOX.1 2\r\nhi\r\n");
    }

    #[test]
    fn test_publish_frame_counts_bytes_not_chars() {
        let payload = "héllo".as_bytes();
        let frame = publish_frame("greet", None, payload);
        assert_eq!(payload.len(), 6);
        assert!(frame.starts_with(b"PUB greet 6\r\n"));
        assert!(frame.ends_with(b"\r\n"));
        assert_eq!(frame.len(), "PUB greet 6\r\n".len() + 6 + 2);
    }

    #[test]
    fn test_publish_frame_empty_payload() {
        assert_eq!(&publish_frame("foo", None, b"")[..], b"PUB foo 0\r\n\r\n");
    }

    #[test]
    fn test_ping_pong_frames() {
        assert_eq!(&ping_frame()[..], b"PING\r\n");
        assert_eq!(&pong_frame()[..], b"PONG\r\n");
    }
}
