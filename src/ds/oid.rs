use std::{fmt, str::FromStr};
use thiserror::Error;

/// A 12 byte document identifier.
///
/// The identifier is opaque to the conversion machinery; it is the extension leaf binary
/// document formats carry alongside the JSON primitives.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// let id: ObjectId = "5f2b6c1e9d3a4b0012345678".parse().unwrap();
/// assert_eq!(id.to_string(), "5f2b6c1e9d3a4b0012345678");
/// assert_eq!(id.bytes()[0], 0x5f);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Wrap the raw bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId(bytes)
    }

    /// The raw bytes.
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }
}

/// The string is not 24 hexadecimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id '{0}': expecting 24 hexadecimal digits")]
pub struct ParseObjectIdError(String);

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseObjectIdError(s.to_string());

        if s.len() != 24 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let mut bytes = [0u8; 12];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| err())?;
        }

        Ok(ObjectId(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ObjectId(\"{}\")", self)
    }
}
