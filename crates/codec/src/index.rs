//! Index discovery for sequence fields.
//!
//! Repeated keys such as `ethernet0.present` and `ethernet1.present` share a
//! prefix (`ethernet`); the run between the prefix and the next `.` is the
//! element's index token (`0`, `1`, `0:1`, `:0`). Tokens are opaque: they are
//! never parsed as numbers, only compared and appended back to the prefix.
//!
//! A run that does not start with a digit (or `:` and a digit) belongs to a
//! sibling key: `identity` next to `ide0.present`, `usb_xhci.present` next to
//! `usb:0.present`.

use crate::path::{PATH_SEPARATOR, normalize_key};
use crate::store::FlatStore;
use indexmap::IndexSet;

/// Distinct index tokens under `prefix`, in first-seen store order.
#[must_use]
pub fn discover_indices(store: &FlatStore, prefix: &str) -> Vec<String> {
    let prefix = normalize_key(prefix);
    let mut tokens: IndexSet<&str> = IndexSet::new();

    for key in store.keys() {
        let Some(rest) = key.strip_prefix(prefix.as_str()) else {
            continue;
        };
        let token = rest
            .split_once(PATH_SEPARATOR)
            .map_or(rest, |(token, _)| token);
        if is_index_token(token) {
            tokens.insert(token);
        }
    }

    tokens.into_iter().map(str::to_owned).collect()
}

fn is_index_token(token: &str) -> bool {
    let digits = token.strip_prefix(':').unwrap_or(token);
    digits.as_bytes().first().is_some_and(u8::is_ascii_digit)
}
