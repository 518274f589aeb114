//! Message representation for the read path.

use crate::datetime;

/// One persisted message as enumerated by a mailbox snapshot.
///
/// The text is immutable; the UID is the message's 1-based position in the
/// snapshot that produced it and is only meaningful until the next refresh.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    content: String,
    uid: u32,
    deleted: bool,
}

impl StoredMessage {
    pub(crate) fn new(content: String, uid: u32) -> Self {
        Self {
            content,
            uid,
            deleted: false,
        }
    }

    /// Position-derived UID within the snapshot that produced this message.
    pub fn uid(&self) -> u32 {
        self.uid
    }

    /// Current flag set; empty unless this instance was marked deleted.
    pub fn flags(&self) -> Vec<String> {
        if self.deleted {
            vec!["\\Deleted".to_string()]
        } else {
            Vec::new()
        }
    }

    /// Mark this instance deleted.
    ///
    /// The mark shows up in `flags` but no file is removed, and the mark
    /// does not survive a refresh.
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// Whether this instance carries the deletion mark.
    pub fn is_marked_deleted(&self) -> bool {
        self.deleted
    }

    /// Full message text.
    pub fn rfc822(&self) -> &str {
        &self.content
    }

    /// The text before the first blank line; the whole text when no blank
    /// line is present.
    pub fn header_block(&self) -> &str {
        match self.content.split_once("\n\n") {
            Some((headers, _)) => headers,
            None => &self.content,
        }
    }

    /// The text after the first blank line; empty when no blank line is
    /// present.
    pub fn body(&self) -> &str {
        match self.content.split_once("\n\n") {
            Some((_, body)) => body,
            None => "",
        }
    }

    /// Size of the full text in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Internal date, RFC 2822, computed at access time.
    pub fn internal_date(&self) -> String {
        datetime::rfc2822_now()
    }

    /// Always false: multipart structure is not parsed.
    pub fn is_multipart(&self) -> bool {
        false
    }

    /// Header (name, value) pairs, filtered by name.
    ///
    /// With `negate` false only the named fields are kept; with `negate`
    /// true they are dropped. Matching is case-insensitive, and an empty
    /// field list returns every header. Folded continuation lines are
    /// joined into the preceding header's value.
    pub fn headers(&self, negate: bool, fields: &[&str]) -> Vec<(String, String)> {
        let parsed = parse_headers(self.header_block());
        if fields.is_empty() {
            return parsed;
        }

        let wanted: Vec<String> = fields.iter().map(|f| f.to_lowercase()).collect();
        parsed
            .into_iter()
            .filter(|(name, _)| {
                let named = wanted.contains(&name.to_lowercase());
                named != negate
            })
            .collect()
    }
}

/// Result bundle for one fetched message.
#[derive(Debug, Clone)]
pub struct FetchItem {
    /// Message number the request asked for.
    pub seq: u32,
    /// UID under the snapshot the fetch ran against.
    pub uid: u32,
    /// Flag set at fetch time.
    pub flags: Vec<String>,
    /// Full message text.
    pub rfc822: String,
}

fn parse_headers(block: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in block.lines() {
        // Folded continuation line
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim_start());
            }
            continue;
        }

        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    headers
}
