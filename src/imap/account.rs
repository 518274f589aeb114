//! Per-user account views and address resolution.

use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::error::{PostboxError, Result};
use crate::imap::mailbox::{DirMailbox, Mailbox};
use crate::smtp::split_address;

/// Mailbox namespace of one authenticated user.
///
/// The namespace holds exactly one mailbox, INBOX. Listing and selection
/// only ever surface that mailbox; operations that would change the
/// namespace are rejected.
pub trait Account {
    /// Mailbox names matching `pattern`.
    ///
    /// Only the literal patterns `*` and `INBOX` match; anything else comes
    /// back empty. INBOX is always subscribed, so `subscribed_only` cannot
    /// narrow the listing.
    fn list_mailboxes(&self, subscribed_only: bool, pattern: &str) -> Vec<String>;

    /// Select a mailbox by name, case-insensitively.
    fn select(&mut self, mailbox: &str) -> Result<&mut dyn Mailbox>;

    /// Create a mailbox. INBOX already exists, so creating it succeeds;
    /// any other name is rejected.
    fn create(&mut self, name: &str) -> Result<()>;

    /// Delete a mailbox. Always rejected.
    fn delete(&mut self, name: &str) -> Result<()>;

    /// Rename a mailbox. Always rejected.
    fn rename(&mut self, old_name: &str, new_name: &str) -> Result<()>;

    /// Subscribe to a mailbox. Accepted and ignored.
    fn subscribe(&mut self, name: &str) -> Result<()>;

    /// Unsubscribe from a mailbox. Accepted and ignored.
    fn unsubscribe(&mut self, name: &str) -> Result<()>;

    /// Whether the named mailbox is subscribed.
    fn is_subscribed(&self, name: &str) -> bool;
}

/// [`Account`] backed by a single on-disk INBOX.
pub struct DirAccount {
    inbox: DirMailbox,
}

impl DirAccount {
    pub fn new(inbox: DirMailbox) -> Self {
        Self { inbox }
    }

    pub fn inbox(&mut self) -> &mut DirMailbox {
        &mut self.inbox
    }
}

impl Account for DirAccount {
    fn list_mailboxes(&self, _subscribed_only: bool, pattern: &str) -> Vec<String> {
        if pattern == "*" || pattern == "INBOX" {
            vec!["INBOX".to_string()]
        } else {
            Vec::new()
        }
    }

    fn select(&mut self, mailbox: &str) -> Result<&mut dyn Mailbox> {
        if mailbox.eq_ignore_ascii_case("INBOX") {
            Ok(&mut self.inbox)
        } else {
            Err(PostboxError::MailboxNotFound(mailbox.to_string()))
        }
    }

    fn create(&mut self, name: &str) -> Result<()> {
        if name.eq_ignore_ascii_case("INBOX") {
            Ok(())
        } else {
            Err(PostboxError::Unsupported("creating mailboxes".to_string()))
        }
    }

    fn delete(&mut self, _name: &str) -> Result<()> {
        Err(PostboxError::Unsupported("deleting mailboxes".to_string()))
    }

    fn rename(&mut self, _old_name: &str, _new_name: &str) -> Result<()> {
        Err(PostboxError::Unsupported("renaming mailboxes".to_string()))
    }

    fn subscribe(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn unsubscribe(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn is_subscribed(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case("INBOX")
    }
}

/// Maps authenticated addresses to their on-disk account.
///
/// An address `local@domain` resolves to the mailbox directory
/// `<storage root>/<domain>/<local>`, the same layout the deposit path
/// writes into.
pub struct AccountResolver {
    storage_root: PathBuf,
}

impl AccountResolver {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.storage.root)
    }

    /// Resolve an address to its account.
    ///
    /// # Errors
    ///
    /// - [`PostboxError::MalformedAddress`] unless the address contains
    ///   exactly one `@`
    /// - [`PostboxError::MailboxNotFound`] when no mailbox directory exists
    ///   for the address
    pub fn resolve(&self, address: &str) -> Result<DirAccount> {
        let Some((local, domain)) = split_address(address) else {
            return Err(PostboxError::MalformedAddress(address.to_string()));
        };

        let path = self.storage_root.join(domain).join(local);
        let inbox = DirMailbox::open(path)?;
        debug!(address, "account resolved");
        Ok(DirAccount::new(inbox))
    }
}
