//! Mailbox read path.
//!
//! - `account`: per-user namespaces and address resolution
//! - `mailbox`: directory-backed mailboxes with positional numbering
//! - `message`: stored message accessors
//! - `sequence`: sequence-set parsing and expansion

mod account;
mod mailbox;
mod message;
mod sequence;

pub use account::{Account, AccountResolver, DirAccount};
pub use mailbox::{DirMailbox, Mailbox};
pub use message::{FetchItem, StoredMessage};
pub use sequence::{SeqRange, SequenceSet};
