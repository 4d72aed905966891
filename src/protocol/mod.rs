//! Line Protocol Implementation
//!
//! This module implements EmberKV's plain-text wire protocol.
//!
//! ## Overview
//!
//! Clients send one command per line (`\n` or `\r\n` terminated). Tokens are
//! separated by whitespace, the command name is case-insensitive, and every
//! reply is a single CRLF-terminated line.
//!
//! ## Modules
//!
//! - `types`: Defines the `Command` and `Reply` enums and reply serialization
//! - `parser`: Line framing and command parsing
//!
//! ## Example
//!
//! ```
//! use emberkv::protocol::{parse_command, split_line, Command, Reply};
//! use bytes::{Bytes, BytesMut};
//!
//! // Parsing incoming data
//! let mut buf = BytesMut::from(&b"GET name\r\n"[..]);
//! let line = split_line(&mut buf).unwrap();
//! let cmd = parse_command(&line).unwrap();
//! assert_eq!(cmd, Command::Get { key: Bytes::from("name") });
//!
//! // Creating replies
//! let reply = Reply::Value(Bytes::from("Ariz"));
//! assert_eq!(reply.serialize(), b"VALUE: Ariz\r\n");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{is_blank, parse_command, split_line, ParseError, ParseResult, MAX_LINE_LENGTH};
pub use types::{Command, Reply};
