//! Postbox - Mail Storage Engine
//!
//! A file-backed mail store shared by an SMTP-facing deposit path and an
//! IMAP-facing read path, exposed to embedding servers through capability
//! traits.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod error;
pub mod imap;
pub mod logging;
pub mod smtp;

pub use auth::{CredentialChecker, CredentialStore};
pub use config::Config;
pub use error::{PostboxError, Result};
pub use imap::{
    Account, AccountResolver, DirAccount, DirMailbox, FetchItem, Mailbox, SeqRange, SequenceSet,
    StoredMessage,
};
pub use smtp::{
    deposit_all, load_recipients, parse_recipients, DepositSink, DomainRouter, MailDelivery,
    MessageDelivery, MessageSink, MessageTemplate, Recipient,
};
