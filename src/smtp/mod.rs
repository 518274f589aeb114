//! SMTP-facing deposit module for postbox.
//!
//! This module provides the inbound mail path:
//! - Recipient validation against the served domain set
//! - Line accumulation and commit of deposited messages
//! - The delivery and sink contracts the session framework drives
//! - Bulk deposit of locally composed personalized messages

mod compose;
mod delivery;
mod router;
mod sink;

pub use compose::{deposit_all, load_recipients, parse_recipients, MessageTemplate};
pub use delivery::{MailDelivery, MessageDelivery};
pub use router::{DomainRouter, Recipient};
pub(crate) use router::split_address;
pub use sink::{DepositSink, MessageSink};
