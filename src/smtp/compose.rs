//! Local composition and bulk deposit of personalized messages.
//!
//! Renders a subject/body template once per recipient (substituting the
//! recipient's display name) and pushes each rendered message through the
//! delivery contract, collecting a per-recipient outcome.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::datetime;
use crate::Result;

use super::delivery::MessageDelivery;

/// Subject/body template for personalized messages.
///
/// The body may contain a `{name}` placeholder; `render` substitutes it
/// with the recipient's display name.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    subject: String,
    body: String,
}

impl MessageTemplate {
    /// Create a template from a subject and a body.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Load the body from a file.
    pub fn from_file(subject: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let body = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::new(subject, body))
    }

    /// Render the full message text for one recipient: Subject, From, To
    /// and Date headers, a blank separator line, then the personalized
    /// body.
    pub fn render(&self, sender: &str, recipient: &str, name: &str) -> String {
        format!(
            "Subject: {}\nFrom: {}\nTo: {}\nDate: {}\n\n{}",
            self.subject,
            sender,
            recipient,
            datetime::rfc2822_now(),
            self.body.replace("{name}", name)
        )
    }
}

/// Parse a headerless recipient table: one `address,name` row per line.
///
/// Rows with fewer than two fields are skipped and fields past the name
/// are ignored; values are trimmed.
pub fn parse_recipients(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 2 {
                return None;
            }
            let address = fields[0].trim();
            let name = fields[1].trim();
            if address.is_empty() {
                return None;
            }
            Some((address.to_string(), name.to_string()))
        })
        .collect()
}

/// Load a recipient table from a file.
pub fn load_recipients(path: impl AsRef<Path>) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(parse_recipients(&content))
}

/// Render and deposit the template for every recipient.
///
/// Each recipient is handled independently: a rejection or commit failure
/// records that recipient's error and the batch carries on. The returned
/// outcomes are in input order and the call returns only after every
/// recipient was attempted.
pub fn deposit_all<D>(
    delivery: &D,
    sender: &str,
    recipients: &[(String, String)],
    template: &MessageTemplate,
) -> Vec<(String, Result<PathBuf>)>
where
    D: MessageDelivery + ?Sized,
{
    let mut outcomes = Vec::with_capacity(recipients.len());

    for (address, name) in recipients {
        let outcome = deposit_one(delivery, sender, address, name, template);
        match &outcome {
            Ok(path) => info!("deposited message for {} at {:?}", address, path),
            Err(e) => warn!("deposit for {} failed: {}", address, e),
        }
        outcomes.push((address.clone(), outcome));
    }

    outcomes
}

fn deposit_one<D>(
    delivery: &D,
    sender: &str,
    address: &str,
    name: &str,
    template: &MessageTemplate,
) -> Result<PathBuf>
where
    D: MessageDelivery + ?Sized,
{
    delivery.validate_sender(sender)?;
    let mut sink = delivery.validate_recipient(address)?;

    let message = template.render(sender, address, name);
    for line in message.split('\n') {
        sink.append_line(line.as_bytes());
    }
    sink.completed()
}
