use std::fmt;

use uuid::Uuid;

/// The store's canonical record identifier: exactly 24 lowercase
/// hexadecimal characters.
///
/// External ids arrive as arbitrary strings on the URL path; [`ObjectId::parse`]
/// is the only way to turn one into something the store layer will accept, so
/// a malformed id can never travel past the handler boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub const LEN: usize = 24;

    /// Coerce an external string into a canonical identifier.
    ///
    /// Returns `None` for anything malformed (wrong length, non-hex bytes,
    /// uppercase hex, empty input). Never panics, never allocates on failure.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != Self::LEN {
            return None;
        }
        if !raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return None;
        }
        Some(ObjectId(raw.to_string()))
    }

    /// Produce a fresh well-formed identifier.
    ///
    /// Uniqueness rides on the v4 UUID's random bits; the simple encoding is
    /// already 32 lowercase hex chars, of which the first 24 are kept.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        ObjectId(hex[..Self::LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
