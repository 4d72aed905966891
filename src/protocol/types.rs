//! Command and Reply Types
//!
//! EmberKV speaks a plain-text, line-based protocol. Every request is one
//! line of whitespace-separated tokens; every reply is one line terminated
//! by CRLF.
//!
//! ## Examples
//!
//! ```text
//! SET name Ariz          →  OK
//! SET token abc EX 60    →  OK
//! GET name               →  VALUE: Ariz
//! GET missing            →  NOT FOUND
//! EXISTS name            →  1
//! DEL name               →  OK
//! FOO                    →  ERR unknown command 'FOO'
//! ```

use bytes::Bytes;
use std::fmt;
use std::time::Duration;

/// The line terminator appended to every reply
pub const CRLF: &[u8] = b"\r\n";

/// A structured request produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SET key value [EX seconds | PX milliseconds]`
    Set {
        key: Bytes,
        value: Bytes,
        /// `None` stores the key without expiry
        ttl: Option<Duration>,
    },

    /// `GET key`
    Get { key: Bytes },

    /// `DEL key`
    Del { key: Bytes },

    /// `EXISTS key`
    Exists { key: Bytes },
}

impl Command {
    /// The upper-case command name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
        }
    }

    /// The key this command operates on.
    pub fn key(&self) -> &Bytes {
        match self {
            Command::Set { key, .. }
            | Command::Get { key }
            | Command::Del { key }
            | Command::Exists { key } => key,
        }
    }
}

/// A reply sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `OK`
    Ok,

    /// `VALUE: <v>`
    Value(Bytes),

    /// `NOT FOUND`
    NotFound,

    /// `1` or `0`
    Exists(bool),

    /// `ERR <message>`
    Error(String),
}

impl Reply {
    /// Creates a new error reply.
    ///
    /// # Example
    /// ```
    /// use emberkv::protocol::Reply;
    /// let err = Reply::error("unknown command 'FOO'");
    /// assert_eq!(err.serialize(), b"ERR unknown command 'FOO'\r\n");
    /// ```
    pub fn error(msg: impl Into<String>) -> Self {
        Reply::Error(msg.into())
    }

    /// Serializes the reply to bytes for sending over the wire.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the reply into an existing buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Reply::Ok => buf.extend_from_slice(b"OK"),
            Reply::Value(value) => {
                buf.extend_from_slice(b"VALUE: ");
                buf.extend_from_slice(value);
            }
            Reply::NotFound => buf.extend_from_slice(b"NOT FOUND"),
            Reply::Exists(true) => buf.push(b'1'),
            Reply::Exists(false) => buf.push(b'0'),
            Reply::Error(msg) => {
                buf.extend_from_slice(b"ERR ");
                buf.extend_from_slice(msg.as_bytes());
            }
        }
        buf.extend_from_slice(CRLF);
    }

    /// Returns true if this reply is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Value(value) => write!(f, "VALUE: {}", String::from_utf8_lossy(value)),
            Reply::NotFound => write!(f, "NOT FOUND"),
            Reply::Exists(found) => write!(f, "{}", u8::from(*found)),
            Reply::Error(msg) => write!(f, "ERR {}", msg),
        }
    }
}
