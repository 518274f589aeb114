//! Delivery contract for the inbound SMTP path.

use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::datetime;
use crate::Result;

use super::router::DomainRouter;
use super::sink::{DepositSink, MessageSink};

/// Capability set the SMTP session framework drives for inbound mail.
pub trait MessageDelivery {
    /// Produce the Received header line for a transmission.
    fn received_header(&self, helo: &str, origin: &str, recipients: &[String]) -> String;

    /// Validate the envelope sender. Always accepts.
    fn validate_sender(&self, sender: &str) -> Result<()>;

    /// Validate one envelope recipient, vending a sink bound to its
    /// mailbox directory, or reject with `UnacceptableRecipient`.
    fn validate_recipient(&self, recipient: &str) -> Result<Box<dyn MessageSink>>;
}

/// Delivery service writing accepted messages under a storage root.
pub struct MailDelivery {
    router: DomainRouter,
    storage_root: PathBuf,
    hostname: String,
}

impl MailDelivery {
    /// Create a delivery service.
    pub fn new(
        router: DomainRouter,
        storage_root: impl Into<PathBuf>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            router,
            storage_root: storage_root.into(),
            hostname: hostname.into(),
        }
    }

    /// Create a delivery service from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DomainRouter::new(config.smtp.domains.iter().cloned()),
            config.storage.root.clone(),
            config.smtp.hostname.clone(),
        )
    }

    /// The recipient router in use.
    pub fn router(&self) -> &DomainRouter {
        &self.router
    }
}

impl MessageDelivery for MailDelivery {
    fn received_header(&self, helo: &str, origin: &str, recipients: &[String]) -> String {
        let mut header = format!(
            "Received: from {} by {} (envelope-from <{}>)",
            helo, self.hostname, origin
        );
        if !recipients.is_empty() {
            let list: Vec<String> = recipients.iter().map(|r| format!("<{r}>")).collect();
            header.push_str(&format!(" for {}", list.join(", ")));
        }
        header.push_str(&format!("; {}", datetime::rfc2822_now()));
        header
    }

    fn validate_sender(&self, sender: &str) -> Result<()> {
        debug!("accepting sender {sender:?}");
        Ok(())
    }

    fn validate_recipient(&self, recipient: &str) -> Result<Box<dyn MessageSink>> {
        let recipient = self.router.route(recipient)?;
        debug!("accepted recipient {}", recipient.address());
        Ok(Box::new(DepositSink::new(
            &self.storage_root,
            &recipient.domain,
            &recipient.local,
        )))
    }
}
