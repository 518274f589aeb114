//! Test helpers for E2E tests.
//!
//! Provides mail storage fixtures, credential files, and test configuration.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use postbox::Config;

/// Create an empty temporary storage root.
pub fn mail_storage() -> TempDir {
    TempDir::new().unwrap()
}

/// Drop a message file straight into a mailbox directory, creating the
/// directory as needed. Bypasses the deposit path so read-side tests can
/// control file names and ordering.
pub fn place_message(root: &Path, domain: &str, local: &str, name: &str, content: &str) {
    let dir = root.join(domain).join(local);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

/// Write a credential table into `dir` and return its path.
pub fn write_credentials(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("credentials.csv");
    fs::write(&path, content).unwrap();
    path
}

/// Create a test configuration rooted at the given storage directory.
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.root = root.display().to_string();
    config.smtp.hostname = "mail.example.com".to_string();
    config.smtp.domains = vec!["example.com".to_string(), "example.org".to_string()];
    config.logging.level = "warn".to_string();
    config.logging.file = String::new(); // No file logging for tests
    config
}

/// Every regular file below a storage root, sorted by path.
pub fn message_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files(root, &mut files);
    files.sort();
    files
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config() {
        let storage = mail_storage();
        let config = test_config(storage.path());

        assert_eq!(config.smtp.hostname, "mail.example.com");
        assert!(config.validate().is_ok());
    }
}
