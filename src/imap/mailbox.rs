//! Directory-backed mailbox access.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PostboxError, Result};
use crate::imap::message::{FetchItem, StoredMessage};
use crate::imap::sequence::SequenceSet;

/// Read-side view of a single mailbox.
///
/// Message numbers are 1-based positions in the mailbox's current snapshot.
/// Methods that take `&mut self` re-list the backing store first, so the
/// numbering they answer with is as fresh as that listing and no fresher.
pub trait Mailbox {
    /// Validity token for the current UID assignment.
    fn uid_validity(&self) -> u32;

    /// Predicted next UID. Refreshes first.
    fn uid_next(&mut self) -> Result<u32>;

    /// Number of messages currently present. Refreshes first.
    fn message_count(&mut self) -> Result<usize>;

    /// Messages with the recent flag. Always zero; recency is not tracked.
    fn recent_count(&self) -> usize;

    /// Messages without the seen flag. Always zero; seen state is not
    /// tracked.
    fn unseen_count(&self) -> usize;

    /// Flags clients may set. Always empty.
    fn supported_flags(&self) -> Vec<String>;

    /// Separator for mailbox name hierarchies.
    fn hierarchy_delimiter(&self) -> &str;

    /// Whether the mailbox accepts writes.
    fn is_writable(&self) -> bool;

    /// Message numbers of every message, in mailbox order. Refreshes first.
    fn list_messages(&mut self) -> Result<Vec<u32>>;

    /// A single message by number. Refreshes first.
    fn message(&mut self, seq: u32) -> Result<StoredMessage>;

    /// Retrieve every message a sequence set names.
    ///
    /// The whole batch runs against one snapshot. Each requested number gets
    /// its own slot in the output, failing slots included, and the batch
    /// returns only after every slot was attempted. With `uid` true the
    /// requested numbers are UIDs rather than positions.
    fn fetch(&mut self, set: &SequenceSet, uid: bool) -> Result<Vec<(u32, Result<FetchItem>)>>;

    /// Counters for the named status fields.
    ///
    /// Field names are matched case-insensitively; recognized ones come back
    /// under their canonical uppercase name and unrecognized ones are left
    /// out.
    fn status(&mut self, fields: &[&str]) -> Result<BTreeMap<String, u64>>;
}

/// [`Mailbox`] over a directory of message files.
pub struct DirMailbox {
    path: PathBuf,
    snapshot: Vec<PathBuf>,
    uid_validity: u32,
}

impl DirMailbox {
    /// Open the mailbox directory at `path` and take an initial snapshot.
    ///
    /// # Errors
    ///
    /// - [`PostboxError::MailboxNotFound`] when `path` is not a directory
    /// - [`PostboxError::Io`] when the directory cannot be listed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(PostboxError::MailboxNotFound(path.display().to_string()));
        }

        let mut mailbox = Self {
            path,
            snapshot: Vec::new(),
            uid_validity: 1,
        };
        mailbox.refresh()?;
        Ok(mailbox)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-list the directory: regular files only, ordered by file name.
    /// Message numbers and UIDs are recomputed from the new listing.
    pub fn refresh(&mut self) -> Result<()> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        debug!(
            path = %self.path.display(),
            messages = files.len(),
            "mailbox refreshed"
        );
        self.snapshot = files;
        Ok(())
    }

    // UID policy: a message's UID is its 1-based position in the current
    // snapshot. Both directions live here so a different scheme would only
    // touch these two functions.
    fn uid_at(&self, seq: u32) -> u32 {
        seq
    }

    fn seq_for_uid(&self, uid: u32) -> u32 {
        uid
    }

    fn next_uid_value(&self) -> u32 {
        self.uid_validity + self.snapshot.len() as u32 + 1
    }

    /// Read the message at `seq` from the current snapshot, without
    /// refreshing. Out-of-range numbers and unreadable files both come back
    /// as [`PostboxError::NoSuchMessage`]; the underlying cause is logged.
    fn read_at(&self, seq: u32) -> Result<StoredMessage> {
        if seq < 1 || seq as usize > self.snapshot.len() {
            return Err(PostboxError::NoSuchMessage(seq));
        }

        let path = &self.snapshot[(seq - 1) as usize];
        match fs::read_to_string(path) {
            Ok(content) => Ok(StoredMessage::new(content, self.uid_at(seq))),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "message unreadable");
                Err(PostboxError::NoSuchMessage(seq))
            }
        }
    }
}

impl Mailbox for DirMailbox {
    fn uid_validity(&self) -> u32 {
        self.uid_validity
    }

    fn uid_next(&mut self) -> Result<u32> {
        self.refresh()?;
        Ok(self.next_uid_value())
    }

    fn message_count(&mut self) -> Result<usize> {
        self.refresh()?;
        Ok(self.snapshot.len())
    }

    fn recent_count(&self) -> usize {
        0
    }

    fn unseen_count(&self) -> usize {
        0
    }

    fn supported_flags(&self) -> Vec<String> {
        Vec::new()
    }

    fn hierarchy_delimiter(&self) -> &str {
        "/"
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn list_messages(&mut self) -> Result<Vec<u32>> {
        self.refresh()?;
        Ok((1..=self.snapshot.len() as u32).collect())
    }

    fn message(&mut self, seq: u32) -> Result<StoredMessage> {
        self.refresh()?;
        self.read_at(seq)
    }

    fn fetch(&mut self, set: &SequenceSet, uid: bool) -> Result<Vec<(u32, Result<FetchItem>)>> {
        self.refresh()?;

        let mut results = Vec::new();
        for number in set.resolve(self.snapshot.len()) {
            let seq = if uid { self.seq_for_uid(number) } else { number };
            let slot = self.read_at(seq).map(|msg| FetchItem {
                seq,
                uid: msg.uid(),
                flags: msg.flags(),
                rfc822: msg.rfc822().to_string(),
            });
            results.push((number, slot));
        }

        Ok(results)
    }

    fn status(&mut self, fields: &[&str]) -> Result<BTreeMap<String, u64>> {
        self.refresh()?;
        let count = self.snapshot.len() as u64;

        let mut status = BTreeMap::new();
        for field in fields {
            match field.to_uppercase().as_str() {
                "MESSAGES" => {
                    status.insert("MESSAGES".to_string(), count);
                }
                "RECENT" => {
                    status.insert("RECENT".to_string(), self.recent_count() as u64);
                }
                "UIDNEXT" => {
                    status.insert("UIDNEXT".to_string(), u64::from(self.next_uid_value()));
                }
                "UIDVALIDITY" => {
                    status.insert("UIDVALIDITY".to_string(), u64::from(self.uid_validity));
                }
                "UNSEEN" => {
                    status.insert("UNSEEN".to_string(), self.unseen_count() as u64);
                }
                // Unrecognized field names are left out of the answer
                _ => {}
            }
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imap::sequence::SeqRange;
    use tempfile::TempDir;

    fn mailbox_with(files: &[(&str, &str)]) -> (TempDir, DirMailbox) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let mailbox = DirMailbox::open(dir.path()).unwrap();
        (dir, mailbox)
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = DirMailbox::open(dir.path().join("nope"));

        assert!(matches!(result, Err(PostboxError::MailboxNotFound(_))));
    }

    #[test]
    fn test_messages_ordered_by_file_name() {
        let (_dir, mut mailbox) = mailbox_with(&[("b.eml", "second"), ("a.eml", "first")]);

        assert_eq!(mailbox.list_messages().unwrap(), vec![1, 2]);
        assert_eq!(mailbox.message(1).unwrap().rfc822(), "first");
        assert_eq!(mailbox.message(2).unwrap().rfc822(), "second");
    }

    #[test]
    fn test_message_out_of_range() {
        let (_dir, mut mailbox) = mailbox_with(&[("a.eml", "first")]);

        assert!(matches!(
            mailbox.message(0),
            Err(PostboxError::NoSuchMessage(0))
        ));
        assert!(matches!(
            mailbox.message(2),
            Err(PostboxError::NoSuchMessage(2))
        ));
    }

    #[test]
    fn test_unreadable_message_conflates_to_no_such_message() {
        let (dir, mut mailbox) = mailbox_with(&[]);
        fs::write(dir.path().join("a.eml"), [0xff, 0xfe, 0xfd]).unwrap();

        assert!(matches!(
            mailbox.message(1),
            Err(PostboxError::NoSuchMessage(1))
        ));
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let (dir, mut mailbox) = mailbox_with(&[("a.eml", "first")]);
        fs::create_dir(dir.path().join("sub")).unwrap();

        assert_eq!(mailbox.message_count().unwrap(), 1);
    }

    #[test]
    fn test_uid_follows_position_after_removal() {
        let (_dir, mut mailbox) =
            mailbox_with(&[("a.eml", "first"), ("b.eml", "second"), ("c.eml", "third")]);
        assert_eq!(mailbox.message(1).unwrap().uid(), 1);

        fs::remove_file(mailbox.path().join("a.eml")).unwrap();

        // The survivors slide down and take new numbers
        let msg = mailbox.message(1).unwrap();
        assert_eq!(msg.uid(), 1);
        assert_eq!(msg.rfc822(), "second");
        assert_eq!(mailbox.message_count().unwrap(), 2);
    }

    #[test]
    fn test_uid_next() {
        let (_dir, mut mailbox) = mailbox_with(&[("a.eml", "x"), ("b.eml", "y")]);

        assert_eq!(mailbox.uid_validity(), 1);
        assert_eq!(mailbox.uid_next().unwrap(), 4);
    }

    #[test]
    fn test_fetch_batch() {
        let (_dir, mut mailbox) = mailbox_with(&[("a.eml", "first"), ("b.eml", "second")]);

        let results = mailbox.fetch(&"1:2".parse().unwrap(), false).unwrap();

        assert_eq!(results.len(), 2);
        let first = results[0].1.as_ref().unwrap();
        assert_eq!((results[0].0, first.seq, first.uid), (1, 1, 1));
        assert_eq!(first.rfc822, "first");
        assert!(first.flags.is_empty());
        assert_eq!(results[1].1.as_ref().unwrap().rfc822, "second");
    }

    #[test]
    fn test_fetch_reports_failing_slots() {
        let (_dir, mut mailbox) =
            mailbox_with(&[("a.eml", "first"), ("b.eml", "second"), ("c.eml", "third")]);

        let results = mailbox.fetch(&"2,99".parse().unwrap(), false).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 2);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, 99);
        assert!(matches!(
            results[1].1,
            Err(PostboxError::NoSuchMessage(99))
        ));
    }

    #[test]
    fn test_fetch_open_range() {
        let (_dir, mut mailbox) =
            mailbox_with(&[("a.eml", "first"), ("b.eml", "second"), ("c.eml", "third")]);

        let results = mailbox.fetch(&"2:*".parse().unwrap(), false).unwrap();

        let numbers: Vec<u32> = results.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert!(results.iter().all(|(_, slot)| slot.is_ok()));
    }

    #[test]
    fn test_fetch_with_prebuilt_set() {
        let (_dir, mut mailbox) =
            mailbox_with(&[("a.eml", "first"), ("b.eml", "second"), ("c.eml", "third")]);

        let set = SequenceSet::new(vec![SeqRange::Single(1), SeqRange::From(3)]);
        let results = mailbox.fetch(&set, false).unwrap();

        let numbers: Vec<u32> = results.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(results[1].1.as_ref().unwrap().rfc822, "third");
    }

    #[test]
    fn test_fetch_by_uid_matches_position() {
        let (_dir, mut mailbox) = mailbox_with(&[("a.eml", "first"), ("b.eml", "second")]);

        let by_seq = mailbox.fetch(&SequenceSet::single(2), false).unwrap();
        let by_uid = mailbox.fetch(&SequenceSet::single(2), true).unwrap();

        assert_eq!(
            by_seq[0].1.as_ref().unwrap().rfc822,
            by_uid[0].1.as_ref().unwrap().rfc822
        );
    }

    #[test]
    fn test_status_all_fields() {
        let (_dir, mut mailbox) = mailbox_with(&[("a.eml", "x"), ("b.eml", "y")]);

        let status = mailbox
            .status(&["MESSAGES", "RECENT", "UIDNEXT", "UIDVALIDITY", "UNSEEN", "BOGUS"])
            .unwrap();

        assert_eq!(status.len(), 5);
        assert_eq!(status["MESSAGES"], 2);
        assert_eq!(status["RECENT"], 0);
        assert_eq!(status["UIDNEXT"], 4);
        assert_eq!(status["UIDVALIDITY"], 1);
        assert_eq!(status["UNSEEN"], 0);
    }

    #[test]
    fn test_status_matches_case_insensitively() {
        let (_dir, mut mailbox) = mailbox_with(&[("a.eml", "x")]);

        let status = mailbox.status(&["messages", "UidNext"]).unwrap();

        assert_eq!(status["MESSAGES"], 1);
        assert_eq!(status["UIDNEXT"], 3);
    }

    #[test]
    fn test_fixed_answers() {
        let (_dir, mailbox) = mailbox_with(&[]);

        assert_eq!(mailbox.recent_count(), 0);
        assert_eq!(mailbox.unseen_count(), 0);
        assert!(mailbox.supported_flags().is_empty());
        assert_eq!(mailbox.hierarchy_delimiter(), "/");
        assert!(mailbox.is_writable());
    }
}
