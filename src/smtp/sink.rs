//! Line accumulation and commit for one inbound message.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use crate::datetime;
use crate::Result;

/// Capability the session framework drives while receiving message data
/// for one accepted recipient.
///
/// Completion and abandonment consume the sink, so a deposit can be
/// finished exactly once.
pub trait MessageSink {
    /// Append one received line (without its terminator) to the buffer.
    ///
    /// Never fails: bytes that are not valid UTF-8 are replaced rather
    /// than aborting the deposit.
    fn append_line(&mut self, line: &[u8]);

    /// Message complete: persist the buffered lines as one new file and
    /// return its path.
    fn completed(self: Box<Self>) -> Result<PathBuf>;

    /// Connection lost: discard the buffer without writing anything.
    fn abandoned(self: Box<Self>);
}

/// Sink depositing into `<root>/<domain>/<local>`.
#[derive(Debug)]
pub struct DepositSink {
    dir: PathBuf,
    lines: Vec<String>,
}

impl DepositSink {
    /// Create a sink bound to one recipient's mailbox directory.
    pub fn new(storage_root: impl AsRef<Path>, domain: &str, local: &str) -> Self {
        let dir = storage_root.as_ref().join(domain).join(local);
        Self {
            dir,
            lines: Vec::new(),
        }
    }

    /// Target directory of this deposit.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of buffered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Append one received line, replacing invalid UTF-8 sequences.
    pub fn append_line(&mut self, line: &[u8]) {
        self.lines.push(String::from_utf8_lossy(line).into_owned());
    }

    /// Join the buffered lines with `\n` and write them as one new file.
    ///
    /// Every missing path segment is created. The file name carries a
    /// millisecond timestamp prefix so directory listings sort roughly
    /// chronologically, plus a random suffix so concurrent commits into
    /// the same mailbox never overwrite each other.
    pub fn commit(self) -> Result<PathBuf> {
        let message = self.lines.join("\n");
        let filename = format!(
            "message_{}_{}.eml",
            datetime::epoch_millis(),
            Uuid::new_v4().simple()
        );
        let path = self.dir.join(filename);

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, message)?;

        info!("message stored at {:?}", path);
        Ok(path)
    }

    /// Discard the buffered lines without writing.
    pub fn abandon(self) {
        debug!(
            "deposit into {:?} abandoned with {} buffered lines",
            self.dir,
            self.lines.len()
        );
    }
}

impl MessageSink for DepositSink {
    fn append_line(&mut self, line: &[u8]) {
        DepositSink::append_line(self, line);
    }

    fn completed(self: Box<Self>) -> Result<PathBuf> {
        (*self).commit()
    }

    fn abandoned(self: Box<Self>) {
        (*self).abandon();
    }
}
