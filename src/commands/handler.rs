//! Command Handler Module
//!
//! This module implements the commands supported by EmberKV.
//! It receives parsed [`Command`]s, executes them against the cache store,
//! and renders the [`Reply`] sent back to the client.
//!
//! ## Supported Commands
//!
//! - `SET key value [EX seconds | PX milliseconds]` - Set a key → `OK`
//! - `GET key` - Get a key's value → `VALUE: <v>` or `NOT FOUND`
//! - `DEL key` - Delete a key → `OK` (whether or not it existed)
//! - `EXISTS key` - Check if a key exists → `1` or `0`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │   parse()   │───>│  execute()  │───>│   Reply     │      │
//! │  └─────────────┘    └──────┬──────┘    └─────────────┘      │
//! │                            │                                │
//! │                            ▼                                │
//! │                       CacheStore                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::protocol::{parse_command, Command, Reply};
use crate::storage::CacheStore;
use bytes::Bytes;
use std::sync::Arc;
use tracing::trace;

/// Executes commands against a shared cache store.
///
/// Cheap to clone: every connection gets its own handle to the same store.
#[derive(Clone, Debug)]
pub struct CommandHandler {
    /// The cache store
    storage: Arc<CacheStore>,
}

impl CommandHandler {
    /// Creates a new command handler with the given cache store.
    pub fn new(storage: Arc<CacheStore>) -> Self {
        Self { storage }
    }

    /// Returns the store this handler executes against.
    pub fn storage(&self) -> &Arc<CacheStore> {
        &self.storage
    }

    /// Executes a command and returns the reply.
    pub fn execute(&self, command: Command) -> Reply {
        trace!(command = command.name(), key = ?command.key(), "Executing command");

        match command {
            Command::Set { key, value, ttl } => self.cmd_set(key, value, ttl),
            Command::Get { key } => self.cmd_get(&key),
            Command::Del { key } => self.cmd_del(&key),
            Command::Exists { key } => self.cmd_exists(&key),
        }
    }

    /// Parses one raw line and executes it.
    ///
    /// A parse error becomes an error reply; the store is not touched.
    pub fn execute_line(&self, line: &Bytes) -> Reply {
        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(e) => Reply::error(e.to_string()),
        }
    }

    /// SET key value [EX seconds | PX milliseconds]
    fn cmd_set(&self, key: Bytes, value: Bytes, ttl: Option<std::time::Duration>) -> Reply {
        match ttl {
            Some(duration) => self.storage.set_with_ttl(key, value, duration),
            None => self.storage.set(key, value),
        }
        Reply::Ok
    }

    /// GET key
    fn cmd_get(&self, key: &Bytes) -> Reply {
        match self.storage.get(key) {
            Some(value) => Reply::Value(value),
            None => Reply::NotFound,
        }
    }

    /// DEL key
    fn cmd_del(&self, key: &Bytes) -> Reply {
        self.storage.del(key);
        Reply::Ok
    }

    /// EXISTS key
    fn cmd_exists(&self, key: &Bytes) -> Reply {
        Reply::Exists(self.storage.exists(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PolicyKind;
    use std::time::Duration;

    fn create_handler(capacity: usize, kind: PolicyKind) -> CommandHandler {
        let storage = Arc::new(CacheStore::new(capacity, kind));
        CommandHandler::new(storage)
    }

    fn run(handler: &CommandHandler, line: &str) -> Reply {
        handler.execute_line(&Bytes::from(line.to_string()))
    }

    #[test]
    fn test_set_get() {
        let handler = create_handler(10, PolicyKind::Lru);

        assert_eq!(run(&handler, "SET key value"), Reply::Ok);
        assert_eq!(
            run(&handler, "GET key"),
            Reply::Value(Bytes::from("value"))
        );
    }

    #[test]
    fn test_get_nonexistent() {
        let handler = create_handler(10, PolicyKind::Lru);

        assert_eq!(run(&handler, "GET nonexistent"), Reply::NotFound);
    }

    #[test]
    fn test_del() {
        let handler = create_handler(10, PolicyKind::Lfu);

        run(&handler, "SET key1 value1");

        assert_eq!(run(&handler, "DEL key1"), Reply::Ok);
        assert_eq!(run(&handler, "GET key1"), Reply::NotFound);

        // Deleting again is still OK
        assert_eq!(run(&handler, "DEL key1"), Reply::Ok);
    }

    #[test]
    fn test_exists() {
        let handler = create_handler(10, PolicyKind::Lru);

        run(&handler, "SET key1 value1");

        assert_eq!(run(&handler, "EXISTS key1"), Reply::Exists(true));
        assert_eq!(run(&handler, "EXISTS nonexistent"), Reply::Exists(false));
    }

    #[test]
    fn test_set_with_px_expires() {
        let handler = create_handler(10, PolicyKind::Lru);

        assert_eq!(run(&handler, "SET key value PX 30"), Reply::Ok);
        assert_eq!(
            run(&handler, "GET key"),
            Reply::Value(Bytes::from("value"))
        );

        std::thread::sleep(Duration::from_millis(60));

        assert_eq!(run(&handler, "GET key"), Reply::NotFound);
        assert_eq!(run(&handler, "EXISTS key"), Reply::Exists(false));
    }

    #[test]
    fn test_set_with_ex_zero_is_gone() {
        let handler = create_handler(10, PolicyKind::Lfu);

        assert_eq!(run(&handler, "SET key value EX 0"), Reply::Ok);
        assert_eq!(run(&handler, "GET key"), Reply::NotFound);
    }

    #[test]
    fn test_eviction_through_commands() {
        let handler = create_handler(1, PolicyKind::Lru);

        run(&handler, "SET k1 v1");
        run(&handler, "SET k2 v2");

        assert_eq!(run(&handler, "EXISTS k1"), Reply::Exists(false));
        assert_eq!(run(&handler, "EXISTS k2"), Reply::Exists(true));
    }

    #[test]
    fn test_parse_errors_do_not_touch_store() {
        let handler = create_handler(10, PolicyKind::Lru);

        let reply = run(&handler, "SET only-key");
        assert_eq!(
            reply,
            Reply::error("wrong number of arguments for 'SET' command")
        );

        let reply = run(&handler, "UNKNOWN key");
        assert!(reply.is_error());

        let reply = run(&handler, "SET k v EX soon");
        assert!(reply.is_error());

        assert!(handler.storage().is_empty());
        assert_eq!(handler.storage().stats().sets, 0);
    }

    #[test]
    fn test_execute_structured_command() {
        let handler = create_handler(10, PolicyKind::Lfu);

        let reply = handler.execute(Command::Set {
            key: Bytes::from("k"),
            value: Bytes::from("v"),
            ttl: Some(Duration::from_secs(60)),
        });
        assert_eq!(reply, Reply::Ok);

        let reply = handler.execute(Command::Get {
            key: Bytes::from("k"),
        });
        assert_eq!(reply, Reply::Value(Bytes::from("v")));
    }
}
