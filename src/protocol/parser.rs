//! Line Protocol Parser
//!
//! This module turns raw client input into [`Command`]s.
//!
//! ## How the Parser Works
//!
//! Parsing happens in two steps:
//!
//! 1. **Framing**: [`split_line`] looks for a `\n` in the connection buffer.
//!    If one is found, the line (without `\n` or a trailing `\r`) is split
//!    off the buffer and returned; otherwise the caller reads more data.
//! 2. **Tokenizing**: [`parse_command`] splits the line on ASCII whitespace
//!    and validates the command name and argument count.
//!
//! Tokens are zero-copy slices of the line (`Bytes::slice_ref`), so keys and
//! values travel into the store without being copied again.
//!
//! A line that fails to parse is consumed anyway; the caller reports the
//! error to the client and moves on to the next line.

use crate::protocol::types::Command;
use bytes::{Bytes, BytesMut};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while parsing a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line contained no tokens
    #[error("no input provided")]
    EmptyInput,

    /// Token 0 is not a known command
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Right command, wrong number of tokens
    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    /// `SET key value <opt> n` where `<opt>` is not EX or PX
    #[error("syntax error: expected EX or PX, got '{0}'")]
    InvalidTtlOption(String),

    /// The TTL is not a non-negative integer, or is too large
    #[error("invalid expire time '{0}'")]
    InvalidTtl(String),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum length of a single command line (64 KB)
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Splits the next complete line off the front of `buf`.
///
/// Returns `None` if `buf` does not contain a `\n` yet. The returned line
/// has its `\n` and an optional preceding `\r` stripped.
pub fn split_line(buf: &mut BytesMut) -> Option<Bytes> {
    let newline = buf.iter().position(|&b| b == b'\n')?;

    let mut line = buf.split_to(newline + 1);
    line.truncate(newline);
    if line.last() == Some(&b'\r') {
        line.truncate(newline - 1);
    }

    Some(line.freeze())
}

/// Parses one command line.
///
/// # Example
///
/// ```
/// use emberkv::protocol::{parse_command, Command};
/// use bytes::Bytes;
/// use std::time::Duration;
///
/// let cmd = parse_command(&Bytes::from("set session abc PX 1500")).unwrap();
/// assert_eq!(
///     cmd,
///     Command::Set {
///         key: Bytes::from("session"),
///         value: Bytes::from("abc"),
///         ttl: Some(Duration::from_millis(1500)),
///     }
/// );
/// ```
pub fn parse_command(line: &Bytes) -> ParseResult<Command> {
    let tokens: Vec<Bytes> = line
        .split(is_separator)
        .filter(|t| !t.is_empty())
        .map(|t| line.slice_ref(t))
        .collect();

    let (name, args) = match tokens.split_first() {
        Some(split) => split,
        None => return Err(ParseError::EmptyInput),
    };

    if name.eq_ignore_ascii_case(b"SET") {
        parse_set(args)
    } else if name.eq_ignore_ascii_case(b"GET") {
        single_key(args, "GET").map(|key| Command::Get { key })
    } else if name.eq_ignore_ascii_case(b"DEL") {
        single_key(args, "DEL").map(|key| Command::Del { key })
    } else if name.eq_ignore_ascii_case(b"EXISTS") {
        single_key(args, "EXISTS").map(|key| Command::Exists { key })
    } else {
        Err(ParseError::UnknownCommand(lossy(name)))
    }
}

/// SET key value [EX seconds | PX milliseconds]
fn parse_set(args: &[Bytes]) -> ParseResult<Command> {
    match args {
        [key, value] => Ok(Command::Set {
            key: key.clone(),
            value: value.clone(),
            ttl: None,
        }),
        [key, value, unit, amount] => Ok(Command::Set {
            key: key.clone(),
            value: value.clone(),
            ttl: Some(parse_ttl(unit, amount)?),
        }),
        _ => Err(ParseError::WrongArity("SET")),
    }
}

/// Converts `EX n` / `PX n` into a duration.
fn parse_ttl(unit: &Bytes, amount: &Bytes) -> ParseResult<Duration> {
    let n: u64 = std::str::from_utf8(amount)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::InvalidTtl(lossy(amount)))?;

    if unit.eq_ignore_ascii_case(b"EX") {
        let millis = n
            .checked_mul(1000)
            .ok_or_else(|| ParseError::InvalidTtl(lossy(amount)))?;
        Ok(Duration::from_millis(millis))
    } else if unit.eq_ignore_ascii_case(b"PX") {
        Ok(Duration::from_millis(n))
    } else {
        Err(ParseError::InvalidTtlOption(lossy(unit)))
    }
}

/// Token separators: ASCII whitespace plus vertical tab.
#[inline]
fn is_separator(b: &u8) -> bool {
    b.is_ascii_whitespace() || *b == 0x0B
}

/// Returns true if `line` holds no tokens at all.
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(is_separator)
}

fn single_key(args: &[Bytes], command: &'static str) -> ParseResult<Bytes> {
    match args {
        [key] => Ok(key.clone()),
        _ => Err(ParseError::WrongArity(command)),
    }
}

fn lossy(token: &[u8]) -> String {
    String::from_utf8_lossy(token).into_owned()
}
