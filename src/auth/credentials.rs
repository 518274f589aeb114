//! Credential table loading and authentication for postbox.
//!
//! Credentials live in a delimited text file with a header row naming an
//! `email` and a `password` column. The table is loaded once and is
//! read-only afterwards; secrets are compared verbatim.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::{PostboxError, Result};

/// Capability the session framework drives to authenticate a login.
pub trait CredentialChecker {
    /// Check an address/secret pair, returning the authenticated identity.
    ///
    /// A wrong secret and an unknown address fail with the same error.
    fn authenticate(&self, address: &str, secret: &str) -> Result<String>;
}

/// In-memory credential table keyed by exact address string.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Load the credential table from a delimited file.
    ///
    /// The first non-blank line is the header; the `email` and `password`
    /// columns are located by name, so column order and extra columns do
    /// not matter. Values are trimmed of surrounding whitespace. A later
    /// row for the same address overwrites the earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The header lacks an `email` or `password` column
    /// - A row has fewer fields than the header requires
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let store = Self::parse(&content)?;
        info!(
            "loaded {} credential entries from {:?}",
            store.users.len(),
            path
        );
        Ok(store)
    }

    /// Parse a credential table from its text content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| PostboxError::Config("credential file is empty".to_string()))?;

        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let email_idx = column_index(&columns, "email")?;
        let password_idx = column_index(&columns, "password")?;
        let required = email_idx.max(password_idx) + 1;

        let mut users = HashMap::new();
        for (line_no, line) in lines {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < required {
                return Err(PostboxError::Config(format!(
                    "credential file line {line_no}: expected at least {required} fields, got {}",
                    fields.len()
                )));
            }
            let address = fields[email_idx].trim().to_string();
            let secret = fields[password_idx].trim().to_string();
            users.insert(address, secret);
        }

        Ok(Self { users })
    }

    /// Build a store from in-memory entries (embedders and tests).
    pub fn from_entries<I, A, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, S)>,
        A: Into<String>,
        S: Into<String>,
    {
        let users = entries
            .into_iter()
            .map(|(a, s)| (a.into(), s.into()))
            .collect();
        Self { users }
    }

    /// Number of loaded entries.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn column_index(columns: &[&str], name: &str) -> Result<usize> {
    columns.iter().position(|c| *c == name).ok_or_else(|| {
        PostboxError::Config(format!("credential file is missing a '{name}' column"))
    })
}

impl CredentialChecker for CredentialStore {
    fn authenticate(&self, address: &str, secret: &str) -> Result<String> {
        match self.users.get(address) {
            Some(stored) if stored == secret => {
                debug!("authenticated {address}");
                Ok(address.to_string())
            }
            _ => {
                debug!("authentication rejected for {address}");
                Err(PostboxError::InvalidCredentials)
            }
        }
    }
}
