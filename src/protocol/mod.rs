//! NATS text protocol
//!
//! Wire-level pieces with no I/O of their own:
//!
//! - [`parser`] turns inbound bytes into [`ParsedEvent`]s
//! - [`payload`] frames `MSG` bodies across deliveries
//! - [`command`] renders outbound commands
//! - [`subject`] validates and matches subjects
//!
//! Reference: <https://docs.nats.io/reference/reference-protocols/nats-protocol>

pub mod command;
pub mod constants;
pub mod message;
pub mod parser;
pub mod payload;
pub mod subject;

pub use command::ConnectInfo;
pub use message::{Message, ParsedEvent, ServerInfo};
pub use parser::{FrameParser, ParserState};
pub use payload::{Framed, PendingMessage};
pub use subject::Subject;
