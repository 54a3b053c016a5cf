//! Spool-directory messaging endpoint
//!
//! Each accepted message is written to `<outbox>/<message-id>.json`, where the
//! message id is a freshly generated UUID v4. A downstream mailer consumes the
//! `*.json` files of the directory.
//!
//! Bodies are staged in a hidden `.pending-*.tmp` file in the same directory
//! and renamed into place once fully written, so the mailer only ever sees
//! complete messages. A failed send leaves nothing behind.

use crate::core::{MessageSender, SendError};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::Builder;
use uuid::Uuid;

/// Message queue backed by a spool directory
#[derive(Debug, Clone)]
pub struct SpoolQueue {
    dir: PathBuf,
}

impl SpoolQueue {
    /// Open a spool queue, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a message with `message_id` is spooled to
    pub fn message_path(&self, message_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", message_id))
    }

    /// Spool `body` under `message_id`
    ///
    /// Never replaces an existing message. On error the staged file is removed.
    pub fn spool(&self, message_id: &str, body: &str) -> io::Result<PathBuf> {
        let mut staged = Builder::new()
            .prefix(".pending-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        staged.write_all(body.as_bytes())?;
        staged.as_file().sync_all()?;

        let path = self.message_path(message_id);
        staged.persist_noclobber(&path).map_err(|e| e.error)?;
        Ok(path)
    }
}

impl MessageSender for SpoolQueue {
    fn send(&self, body: &str) -> Result<String, SendError> {
        let message_id = Uuid::new_v4().to_string();

        self.spool(&message_id, body).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied | ErrorKind::NotFound => {
                SendError::Permanent(e.to_string())
            }
            _ => SendError::Transient(e.to_string()),
        })?;

        Ok(message_id)
    }
}
