//! NATS protocol constants

use std::time::Duration;

/// Line terminator used by every control line and payload trailer
pub const CRLF: &[u8] = b"\r\n";

/// Length of [`CRLF`]
pub const CRLF_LEN: usize = 2;

/// Well-known client port
pub const DEFAULT_PORT: u16 = 4222;

/// Default upper bound for a single inbound control line
pub const DEFAULT_MAX_CONTROL_LINE: usize = 4096;

/// Default upper bound for a single inbound message body (64MB, the server's hard limit)
pub const DEFAULT_MAX_PAYLOAD: usize = 64 * 1024 * 1024;

/// Default wait between reconnect attempts
pub const DEFAULT_RECONNECT_WAIT: Duration = Duration::from_secs(2);

/// Default number of reconnect attempts
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;

// Operation keywords
pub const OP_MSG: &str = "MSG";
pub const OP_OK: &str = "+OK";
pub const OP_ERR: &str = "-ERR";
pub const OP_PING: &str = "PING";
pub const OP_PONG: &str = "PONG";
pub const OP_INFO: &str = "INFO";
pub const OP_CONNECT: &str = "CONNECT";
pub const OP_PUB: &str = "PUB";
pub const OP_SUB: &str = "SUB";
pub const OP_UNSUB: &str = "UNSUB";

/// Subject token separator
pub const SUBJECT_SEPARATOR: char = '.';

/// Wildcard matching exactly one token
pub const WILDCARD_ONE: &str = "*";

/// Wildcard matching one or more trailing tokens
pub const WILDCARD_TAIL: &str = ">";
