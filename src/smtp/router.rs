//! Recipient validation for inbound deposits.

use tracing::debug;

use crate::{PostboxError, Result};

/// Storage-path key for one accepted recipient.
///
/// Both parts are kept exactly as received; no normalization or alias
/// expansion happens on the deposit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Domain part of the address.
    pub domain: String,
    /// Local part of the address.
    pub local: String,
}

impl Recipient {
    /// Recompose the `local@domain` form.
    pub fn address(&self) -> String {
        format!("{}@{}", self.local, self.domain)
    }
}

/// Checks inbound recipient addresses against the served domain set.
#[derive(Debug, Clone)]
pub struct DomainRouter {
    /// Served domains, lowercased at construction.
    domains: Vec<String>,
}

impl DomainRouter {
    /// Create a router serving the given domains.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let domains = domains
            .into_iter()
            .map(|d| d.into().to_lowercase())
            .collect();
        Self { domains }
    }

    /// Whether deposits for this domain are accepted (case-insensitive).
    pub fn accepts(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.domains.iter().any(|d| *d == domain)
    }

    /// Split and validate a recipient address.
    ///
    /// # Errors
    ///
    /// Returns `UnacceptableRecipient` if the address is not shaped like
    /// `local@domain` or its domain is not served. Deposit for that
    /// recipient is aborted; other recipients of the same transmission are
    /// unaffected.
    pub fn route(&self, recipient: &str) -> Result<Recipient> {
        let Some((local, domain)) = split_address(recipient) else {
            debug!("rejecting malformed recipient {recipient:?}");
            return Err(PostboxError::UnacceptableRecipient(recipient.to_string()));
        };

        if !self.accepts(domain) {
            debug!("rejecting recipient {recipient:?}: domain not served");
            return Err(PostboxError::UnacceptableRecipient(recipient.to_string()));
        }

        Ok(Recipient {
            domain: domain.to_string(),
            local: local.to_string(),
        })
    }
}

/// Split on the address separator; `None` unless exactly one `@` is present.
pub(crate) fn split_address(address: &str) -> Option<(&str, &str)> {
    if address.matches('@').count() != 1 {
        return None;
    }
    address.split_once('@')
}
