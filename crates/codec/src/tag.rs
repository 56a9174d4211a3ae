//! Field tag grammar.
//!
//! A tag annotation looks like `vmx:"displayName,omitempty"`: the `vmx`
//! namespace, a `:` separator, and a double-quoted segment holding the
//! external key followed by comma-separated options. Only `omitempty` is
//! recognized; unknown options are accepted and ignored.

use thiserror::Error;

/// Namespace every annotation must carry.
pub const TAG_NAMESPACE: &str = "vmx";

/// Key literal marking a field as intentionally unmapped.
pub const UNMAPPED_KEY: &str = "-";

const OMIT_EMPTY_OPTION: &str = "omitempty";

/// Parsed field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    key: String,
    omit_empty: bool,
}

impl FieldTag {
    /// External key exactly as written in the annotation.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether zero values are dropped on encode.
    #[must_use]
    pub const fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// Whether the field opts out of mapping with `-`.
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.key == UNMAPPED_KEY
    }
}

/// Reasons an annotation fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// No `:` separator, or nothing after it.
    #[error("invalid tag `{tag}`: missing `:` separator")]
    MissingSeparator {
        /// Raw annotation.
        tag: String,
    },
    /// Namespace other than `vmx`.
    #[error("invalid tag `{tag}`: unknown namespace `{namespace}`")]
    UnknownNamespace {
        /// Raw annotation.
        tag: String,
        /// Namespace found before the separator.
        namespace: String,
    },
    /// The quoted segment or its key part is empty.
    #[error("tag name is missing: `{tag}`")]
    EmptyKey {
        /// Raw annotation.
        tag: String,
    },
    /// The key does not start with a double quote.
    #[error("tag name has to be enclosed in double quotes: `{tag}`")]
    NotQuoted {
        /// Raw annotation.
        tag: String,
    },
}

/// Parse a raw annotation into its key and options.
///
/// A missing closing quote is tolerated; `vmx:"displayname,omitempty`
/// parses the same as the properly closed form.
pub fn parse_tag(raw: &str) -> Result<FieldTag, TagError> {
    let Some((namespace, rest)) = raw.split_once(':') else {
        return Err(TagError::MissingSeparator {
            tag: raw.to_owned(),
        });
    };
    if rest.is_empty() {
        return Err(TagError::MissingSeparator {
            tag: raw.to_owned(),
        });
    }
    if namespace.trim() != TAG_NAMESPACE {
        return Err(TagError::UnknownNamespace {
            tag: raw.to_owned(),
            namespace: namespace.to_owned(),
        });
    }

    let Some(quoted) = rest.strip_prefix('"') else {
        return Err(TagError::NotQuoted {
            tag: raw.to_owned(),
        });
    };
    let segment = quoted.split_once('"').map_or(quoted, |(inner, _)| inner);

    let mut parts = segment.split(',');
    let key = parts.next().unwrap_or_default();
    if key.is_empty() {
        return Err(TagError::EmptyKey {
            tag: raw.to_owned(),
        });
    }
    let omit_empty = parts.any(|option| option == OMIT_EMPTY_OPTION);

    Ok(FieldTag {
        key: key.to_owned(),
        omit_empty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_and_omitempty() -> Result<(), TagError> {
        let tag = parse_tag(r#"vmx:"displayname,omitempty""#)?;
        assert_eq!(tag.key(), "displayname");
        assert!(tag.omit_empty());
        assert!(!tag.is_unmapped());
        Ok(())
    }

    #[test]
    fn tolerates_missing_closing_quote() -> Result<(), TagError> {
        let tag = parse_tag(r#"vmx:"displayname,omitempty"#)?;
        assert_eq!(tag.key(), "displayname");
        assert!(tag.omit_empty());
        Ok(())
    }

    #[test]
    fn ignores_unknown_options() -> Result<(), TagError> {
        let tag = parse_tag(r#"vmx:"displayname,blah""#)?;
        assert_eq!(tag.key(), "displayname");
        assert!(!tag.omit_empty());

        let tag = parse_tag(r#"vmx:"displayname,blah,omitempty""#)?;
        assert!(tag.omit_empty());
        Ok(())
    }

    #[test]
    fn dash_marks_unmapped() -> Result<(), TagError> {
        let tag = parse_tag(r#"vmx:"-""#)?;
        assert_eq!(tag.key(), "-");
        assert!(!tag.omit_empty());
        assert!(tag.is_unmapped());
        Ok(())
    }

    #[test]
    fn keeps_colon_indexed_keys_intact() -> Result<(), TagError> {
        let tag = parse_tag(r#"vmx:"ide1:0""#)?;
        assert_eq!(tag.key(), "ide1:0");
        Ok(())
    }

    #[test]
    fn rejects_unquoted_key() {
        let error = parse_tag("vmx:displayname").err();
        assert_eq!(
            error,
            Some(TagError::NotQuoted {
                tag: "vmx:displayname".to_owned()
            })
        );
        assert_eq!(
            error.map(|error| error.to_string()).as_deref(),
            Some("tag name has to be enclosed in double quotes: `vmx:displayname`")
        );
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(matches!(
            parse_tag("vm"),
            Err(TagError::MissingSeparator { .. })
        ));
        assert!(matches!(
            parse_tag("vmx:"),
            Err(TagError::MissingSeparator { .. })
        ));
    }

    #[test]
    fn rejects_empty_key() {
        assert!(matches!(
            parse_tag(r#"vmx:"""#),
            Err(TagError::EmptyKey { .. })
        ));
        assert!(matches!(
            parse_tag(r#"vmx:",omitempty""#),
            Err(TagError::EmptyKey { .. })
        ));
    }

    #[test]
    fn rejects_foreign_namespace() {
        assert!(matches!(
            parse_tag(r#"json:"displayname""#),
            Err(TagError::UnknownNamespace { ref namespace, .. }) if namespace == "json"
        ));
    }
}
