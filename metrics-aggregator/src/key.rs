use std::collections::BTreeMap;
use std::fmt;

use crate::error::Error;
use crate::labels::LabelSet;

/// Canonical, order-independent identity of a [`LabelSet`].
///
/// A label key is the label set serialized as a JSON object with its names sorted
/// lexicographically, e.g. `{"a":"1","b":"2"}`.  Two label sets produce the same key if, and only
/// if, they contain the same name/value pairs.  The empty label set maps to [`LabelKey::EMPTY`].
///
/// Keys compare by their full canonical text, never by a digest, so distinct label sets can never
/// collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey(String);

impl LabelKey {
    /// Sentinel text of the key for the empty label set.
    pub const EMPTY: &'static str = "__EMPTY__";

    /// Derives the key for `labels`.
    pub fn of(labels: &LabelSet) -> LabelKey {
        if labels.is_empty() {
            return LabelKey::empty();
        }

        let sorted = labels.iter().collect::<BTreeMap<_, _>>();
        LabelKey(serde_json::to_string(&sorted).expect("string maps always serialize"))
    }

    /// The key of the empty label set.
    pub fn empty() -> LabelKey {
        LabelKey(LabelKey::EMPTY.to_string())
    }

    /// Parses a key from its textual form.
    ///
    /// Accepts the [`EMPTY`][LabelKey::EMPTY] sentinel, the empty string, or any JSON object of
    /// string values; the result is re-canonicalized, so `{"b":"2","a":"1"}` parses to the same
    /// key as `{"a":"1","b":"2"}`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidKeyType`] if `s` is none of the above.
    pub fn parse(s: &str) -> Result<LabelKey, Error> {
        if s.is_empty() || s == LabelKey::EMPTY {
            return Ok(LabelKey::empty());
        }

        let labels = serde_json::from_str::<LabelSet>(s)
            .map_err(|_| Error::InvalidKeyType { key: s.to_string() })?;
        Ok(LabelKey::of(&labels))
    }

    /// Returns `true` if this is the key of the empty label set.
    pub fn is_empty(&self) -> bool {
        self.0 == LabelKey::EMPTY
    }

    /// Decodes this key back into the label set it was derived from.
    pub fn labels(&self) -> LabelSet {
        if self.is_empty() {
            return LabelSet::new();
        }

        serde_json::from_str(&self.0).expect("label keys always hold canonical JSON")
    }

    /// Gets the canonical text of this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the canonical key for `labels`.
///
/// Shorthand for [`LabelKey::of`].
pub fn key_of(labels: &LabelSet) -> LabelKey {
    LabelKey::of(labels)
}
