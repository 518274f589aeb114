//! Authentication module for postbox.
//!
//! This module provides the credential table backing login checks:
//! one-time load of a delimited address/password file, exact-match
//! plaintext verification, and the `CredentialChecker` capability the
//! session framework drives.

mod credentials;

pub use credentials::{CredentialChecker, CredentialStore};
