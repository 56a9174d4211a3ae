//! Encode entry point.

use crate::error::Error;
use crate::options::CodecOptions;
use crate::record::Record;
use crate::schema::check_tree;
use crate::store::RawPair;
use crate::text::write_pairs;
use crate::walk::{EncodeWalk, WalkContext};
use tracing::debug;

/// Flattens records into raw pairs.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    options: CodecOptions,
}

impl Encoder {
    /// Encoder with the given options.
    #[must_use]
    pub const fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Every mapped value of `source` as an ordered pair list.
    pub fn encode_pairs<T: Record>(&self, source: &T) -> Result<Vec<RawPair>, Error> {
        let schema = check_tree(T::record_schema)?;
        let mut walk = EncodeWalk::new(&self.options);
        walk.record(source, &WalkContext::root())?;
        let pairs = walk.finish();
        debug!(record = schema.type_name(), pairs = pairs.len(), "encoded record");
        Ok(pairs)
    }

    /// `source` as VMX text, one `key = "value"` line per pair.
    pub fn encode_string<T: Record>(&self, source: &T) -> Result<String, Error> {
        let pairs = self.encode_pairs(source)?;
        Ok(write_pairs(&pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vmx;
    use crate::error::SchemaError;
    use std::collections::HashMap;
    use std::error::Error as StdError;

    #[derive(Debug, Default, Vmx)]
    struct Tools {
        #[vmx("syncTime")]
        sync_time: bool,
        #[vmx("upgrade.policy,omitempty")]
        upgrade_policy: String,
        #[vmx("labels")]
        labels: HashMap<String, String>,
    }

    #[derive(Debug, Default, Vmx)]
    struct Broken {
        #[vmx(tag = "vmx:name")]
        name: String,
    }

    #[derive(Debug, Default, Vmx)]
    struct Cached {
        #[vmx("syncTime")]
        sync_time: bool,
        #[vmx(tag = "vmx:\"-\"")]
        last_sync: std::time::Duration,
    }

    #[test]
    fn raw_dash_tag_skips_field_of_any_type() -> Result<(), Box<dyn StdError>> {
        let cached = Cached {
            sync_time: true,
            last_sync: std::time::Duration::from_secs(5),
        };
        let pairs = Encoder::default().encode_pairs(&cached)?;
        assert_eq!(pairs, vec![RawPair::new("syncTime", "true")]);
        assert_eq!(cached.last_sync.as_secs(), 5);
        Ok(())
    }

    #[test]
    fn writes_zero_values_without_omitempty() -> Result<(), Box<dyn StdError>> {
        let pairs = Encoder::default().encode_pairs(&Tools::default())?;
        assert_eq!(pairs, vec![RawPair::new("syncTime", "false")]);
        Ok(())
    }

    #[test]
    fn encode_string_quotes_values() -> Result<(), Box<dyn StdError>> {
        let tools = Tools {
            sync_time: true,
            upgrade_policy: "upgradeAtPowerCycle".to_owned(),
            labels: HashMap::new(),
        };
        let text = Encoder::default().encode_string(&tools)?;
        assert_eq!(
            text,
            "syncTime = \"true\"\nupgrade.policy = \"upgradeAtPowerCycle\"\n"
        );
        Ok(())
    }

    #[test]
    fn malformed_tags_fail_encode() {
        let result = Encoder::default().encode_pairs(&Broken::default());
        assert!(matches!(
            result,
            Err(Error::Schema(SchemaError::MalformedTag { field: "name", .. }))
        ));
    }
}
