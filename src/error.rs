//! Error types for postbox.

use thiserror::Error;

/// Common error type for postbox.
#[derive(Error, Debug)]
pub enum PostboxError {
    /// Authentication failure.
    ///
    /// Deliberately carries no detail: a wrong password and an unknown
    /// address must be indistinguishable to the client.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Recipient rejected at deposit time (domain not served, or the
    /// address is not shaped like `local@domain`).
    #[error("unacceptable recipient: {0}")]
    UnacceptableRecipient(String),

    /// Message number out of range, or the backing file could not be read.
    #[error("no such message: {0}")]
    NoSuchMessage(u32),

    /// Mailbox directory absent, or an unknown mailbox name was requested.
    #[error("mailbox not found: {0}")]
    MailboxNotFound(String),

    /// Address does not contain exactly one `@` separator.
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    /// Mailbox mutation the store does not support (create, delete, rename).
    #[error("operation not permitted: {0}")]
    Unsupported(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for postbox operations.
pub type Result<T> = std::result::Result<T, PostboxError>;
