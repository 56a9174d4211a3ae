//! Key-path composition.
//!
//! Paths keep the schema's original spelling so encode output reads
//! `virtualHW.version`; lookups go through [`KeyPath::lookup_key`], which
//! lowercases, so decode matches `virtualhw.version` as well.

use std::fmt;

/// Separator between a parent key and a child key.
pub const PATH_SEPARATOR: char = '.';

/// Fully-qualified external key for one position in a schema tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    text: String,
}

impl KeyPath {
    /// Path of the top-level record.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Whether this is the top-level path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.text.is_empty()
    }

    /// Path of a field below this one: `parent.key`, or `key` at the root.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        if self.text.is_empty() {
            return Self {
                text: key.to_owned(),
            };
        }
        let mut text = String::with_capacity(self.text.len() + 1 + key.len());
        text.push_str(&self.text);
        text.push(PATH_SEPARATOR);
        text.push_str(key);
        Self { text }
    }

    /// Path of a sequence element: the index token is appended as-is, so
    /// `ethernet` + `1` is `ethernet1` and `scsi` + `0:1` is `scsi0:1`.
    #[must_use]
    pub fn element(&self, token: &str) -> Self {
        let mut text = String::with_capacity(self.text.len() + token.len());
        text.push_str(&self.text);
        text.push_str(token);
        Self { text }
    }

    /// Path as composed from the schema keys.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-normalized key used for every lookup and comparison.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        normalize_key(&self.text)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

impl From<&str> for KeyPath {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_owned(),
        }
    }
}

/// Lowercase a key for lookups.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_child_keeps_key_unchanged() {
        let path = KeyPath::root().child("displayName");
        assert_eq!(path.as_str(), "displayName");
        assert_eq!(path.lookup_key(), "displayname");
    }

    #[test]
    fn nested_child_inserts_separator() {
        let path = KeyPath::root().child("virtualHW").child("productCompatibility");
        assert_eq!(path.as_str(), "virtualHW.productCompatibility");
        assert_eq!(path.lookup_key(), "virtualhw.productcompatibility");
    }

    #[test]
    fn leading_dot_keys_stay_literal_at_root() {
        let path = KeyPath::root().child(".encoding");
        assert_eq!(path.as_str(), ".encoding");
    }

    #[test]
    fn element_appends_token_without_separator() {
        let ethernet = KeyPath::root().child("ethernet");
        assert_eq!(ethernet.element("1").child("present").as_str(), "ethernet1.present");

        let scsi = KeyPath::root().child("scsi");
        assert_eq!(scsi.element("0:1").child("fileName").as_str(), "scsi0:1.fileName");
    }

    #[test]
    fn element_below_struct() {
        let path = KeyPath::root()
            .child("devices")
            .child("pciBridge")
            .element("4")
            .child("virtualDev");
        assert_eq!(path.as_str(), "devices.pciBridge4.virtualDev");
        assert!(!path.is_root());
        assert!(KeyPath::root().is_root());
    }
}
