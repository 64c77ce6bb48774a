//! Bounded ASCII text for titles, descriptions and group names.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Maximum length in bytes of any text field.
pub const MAX_TEXT_LEN: usize = 64;

/// ASCII text of at most [`MAX_TEXT_LEN`] bytes.
///
/// The bound is checked on construction and again on deserialization, so a
/// value of this type is always valid.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BoundedText(String);

impl BoundedText {
    /// Validate and wrap a string.
    pub fn new(text: impl Into<String>) -> Result<Self, CoreError> {
        let text = text.into();
        if !text.is_ascii() {
            return Err(CoreError::NonAscii);
        }
        if text.len() > MAX_TEXT_LEN {
            return Err(CoreError::TextTooLong {
                len: text.len(),
                max: MAX_TEXT_LEN,
            });
        }
        Ok(Self(text))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for BoundedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BoundedText::new(raw).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&str> for BoundedText {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        BoundedText::new(s)
    }
}

impl TryFrom<String> for BoundedText {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        BoundedText::new(s)
    }
}

impl AsRef<str> for BoundedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BoundedText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BoundedText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for BoundedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for BoundedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_max_length() {
        let text = "x".repeat(MAX_TEXT_LEN);
        assert_eq!(BoundedText::new(text).unwrap().len(), MAX_TEXT_LEN);
    }

    #[test]
    fn test_rejects_over_length() {
        let result = BoundedText::new("x".repeat(MAX_TEXT_LEN + 1));
        assert_eq!(
            result,
            Err(CoreError::TextTooLong {
                len: MAX_TEXT_LEN + 1,
                max: MAX_TEXT_LEN
            })
        );
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert_eq!(BoundedText::new("Dokumënt"), Err(CoreError::NonAscii));
    }

    #[test]
    fn test_empty_is_valid() {
        assert!(BoundedText::new("").unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_enforces_bound() {
        let ok: BoundedText = serde_json::from_str("\"Encrypted Document\"").unwrap();
        assert_eq!(ok, "Encrypted Document");

        let too_long = format!("\"{}\"", "y".repeat(MAX_TEXT_LEN + 1));
        assert!(serde_json::from_str::<BoundedText>(&too_long).is_err());
    }

    proptest! {
        #[test]
        fn test_ascii_within_bound_accepted(s in "[ -~]{0,64}") {
            let text = BoundedText::new(s.clone()).unwrap();
            prop_assert_eq!(text.as_str(), s.as_str());
        }

        #[test]
        fn test_ascii_over_bound_rejected(s in "[ -~]{65,128}") {
            let rejected = matches!(
                BoundedText::new(s),
                Err(CoreError::TextTooLong { max: MAX_TEXT_LEN, .. })
            );
            prop_assert!(rejected);
        }
    }
}
